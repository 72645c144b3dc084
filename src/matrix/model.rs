use super::error::ModelError;

/// Weight given to a criterion when none is specified.
pub const DEFAULT_WEIGHT: f64 = 1.0;

/// A named, weighted evaluation dimension.
#[derive(Debug, Clone, PartialEq)]
pub struct Criterion {
    pub name: String,
    pub weight: f64,
}

impl Criterion {
    pub fn new(name: impl Into<String>, weight: f64) -> Self {
        Self {
            name: name.into(),
            weight,
        }
    }
}

/// A candidate with one score per criterion, aligned by index.
#[derive(Debug, Clone, PartialEq)]
pub struct Alternative {
    pub name: String,
    pub scores: Vec<f64>,
}

/// The decision matrix: ordered criteria plus alternatives in insertion order.
///
/// Every alternative's score vector has exactly one entry per criterion.
/// The fields are private so that every edit goes through a method that
/// keeps the vectors aligned with `criteria`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoreModel {
    criteria: Vec<Criterion>,
    alternatives: Vec<Alternative>,
}

impl ScoreModel {
    /// Create an empty model with no criteria and no alternatives
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a model seeded with criteria of default weight
    pub fn with_default_criteria<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            criteria: names
                .into_iter()
                .map(|name| Criterion::new(name, DEFAULT_WEIGHT))
                .collect(),
            alternatives: Vec::new(),
        }
    }

    pub fn criteria(&self) -> &[Criterion] {
        &self.criteria
    }

    pub fn alternatives(&self) -> &[Alternative] {
        &self.alternatives
    }

    pub fn criterion_names(&self) -> impl Iterator<Item = &str> {
        self.criteria.iter().map(|c| c.name.as_str())
    }

    pub fn alternative_names(&self) -> impl Iterator<Item = &str> {
        self.alternatives.iter().map(|a| a.name.as_str())
    }

    pub fn weights(&self) -> Vec<f64> {
        self.criteria.iter().map(|c| c.weight).collect()
    }

    pub fn criterion_count(&self) -> usize {
        self.criteria.len()
    }

    pub fn alternative_count(&self) -> usize {
        self.alternatives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.criteria.is_empty() && self.alternatives.is_empty()
    }

    pub fn contains_alternative(&self, name: &str) -> bool {
        self.alternative_index(name).is_some()
    }

    /// Score vector of an alternative, aligned with `criteria()`
    pub fn scores(&self, name: &str) -> Option<&[f64]> {
        self.alternative_index(name)
            .map(|idx| self.alternatives[idx].scores.as_slice())
    }

    /// Append a criterion and give every alternative a zero score for it.
    ///
    /// Duplicate names are accepted.
    pub fn add_criterion(&mut self, name: impl Into<String>, weight: f64) {
        self.criteria.push(Criterion::new(name, weight));
        for alternative in &mut self.alternatives {
            alternative.scores.push(0.0);
        }
    }

    /// Remove the first criterion called `name` along with its score column.
    pub fn remove_criterion(&mut self, name: &str) -> Result<Criterion, ModelError> {
        let idx = self
            .criterion_index(name)
            .ok_or_else(|| ModelError::criterion_not_found(name))?;
        let removed = self.criteria.remove(idx);
        for alternative in &mut self.alternatives {
            alternative.scores.remove(idx);
        }
        Ok(removed)
    }

    /// Change the weight of the first criterion called `name`
    pub fn set_weight(&mut self, name: &str, weight: f64) -> Result<(), ModelError> {
        let idx = self
            .criterion_index(name)
            .ok_or_else(|| ModelError::criterion_not_found(name))?;
        self.criteria[idx].weight = weight;
        Ok(())
    }

    /// Add an alternative, with all-zero scores unless `initial_scores` is given.
    pub fn add_alternative(
        &mut self,
        name: impl Into<String>,
        initial_scores: Option<Vec<f64>>,
    ) -> Result<(), ModelError> {
        let name = name.into();
        if self.contains_alternative(&name) {
            return Err(ModelError::Duplicate { name });
        }

        let scores = match initial_scores {
            Some(scores) => {
                self.check_len(&scores, || format!("scores for '{}'", name))?;
                scores
            }
            None => vec![0.0; self.criteria.len()],
        };

        self.alternatives.push(Alternative { name, scores });
        Ok(())
    }

    pub fn remove_alternative(&mut self, name: &str) -> Result<Alternative, ModelError> {
        let idx = self
            .alternative_index(name)
            .ok_or_else(|| ModelError::alternative_not_found(name))?;
        Ok(self.alternatives.remove(idx))
    }

    /// Set one cell of the matrix. The criterion is matched by first occurrence.
    pub fn set_score(
        &mut self,
        alternative: &str,
        criterion: &str,
        score: f64,
    ) -> Result<(), ModelError> {
        let alt_idx = self
            .alternative_index(alternative)
            .ok_or_else(|| ModelError::alternative_not_found(alternative))?;
        let crit_idx = self
            .criterion_index(criterion)
            .ok_or_else(|| ModelError::criterion_not_found(criterion))?;
        self.alternatives[alt_idx].scores[crit_idx] = score;
        Ok(())
    }

    /// Overwrite the whole model, as after reloading an edited table.
    ///
    /// Every input is checked before anything is touched, so a failed call
    /// leaves the previous contents in place.
    pub fn replace_all(
        &mut self,
        criteria_names: Vec<String>,
        weights: Vec<f64>,
        alternatives: Vec<(String, Vec<f64>)>,
    ) -> Result<(), ModelError> {
        let expected = criteria_names.len();
        if weights.len() != expected {
            return Err(ModelError::Shape {
                context: "weights".to_string(),
                expected,
                actual: weights.len(),
            });
        }

        for (idx, (name, scores)) in alternatives.iter().enumerate() {
            if scores.len() != expected {
                return Err(ModelError::Shape {
                    context: format!("scores for '{}'", name),
                    expected,
                    actual: scores.len(),
                });
            }
            if alternatives[..idx].iter().any(|(other, _)| other == name) {
                return Err(ModelError::Duplicate { name: name.clone() });
            }
        }

        self.criteria = criteria_names
            .into_iter()
            .zip(weights)
            .map(|(name, weight)| Criterion { name, weight })
            .collect();
        self.alternatives = alternatives
            .into_iter()
            .map(|(name, scores)| Alternative { name, scores })
            .collect();
        Ok(())
    }

    fn criterion_index(&self, name: &str) -> Option<usize> {
        self.criteria.iter().position(|c| c.name == name)
    }

    fn alternative_index(&self, name: &str) -> Option<usize> {
        self.alternatives.iter().position(|a| a.name == name)
    }

    fn check_len<F>(&self, scores: &[f64], context: F) -> Result<(), ModelError>
    where
        F: FnOnce() -> String,
    {
        if scores.len() == self.criteria.len() {
            Ok(())
        } else {
            Err(ModelError::Shape {
                context: context(),
                expected: self.criteria.len(),
                actual: scores.len(),
            })
        }
    }
}
