use serde::Serialize;

use crate::matrix::{ModelError, ScoreModel};

/// An alternative with its weighted total.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredAlternative {
    pub name: String,
    pub score: f64,
}

/// Weighted total of one alternative: `sum(score[i] * weight[i])`.
///
/// Terms are accumulated in criterion order so results are reproducible
/// bit for bit.
pub fn weighted_score(model: &ScoreModel, name: &str) -> Result<f64, ModelError> {
    let scores = model
        .scores(name)
        .ok_or_else(|| ModelError::alternative_not_found(name))?;
    Ok(dot(scores, model))
}

/// Weighted totals for every alternative, in insertion order.
pub fn weighted_scores(model: &ScoreModel) -> Vec<ScoredAlternative> {
    model
        .alternatives()
        .iter()
        .map(|alternative| ScoredAlternative {
            name: alternative.name.clone(),
            score: dot(&alternative.scores, model),
        })
        .collect()
}

/// Sort scored alternatives best first. Ties keep their original order.
///
/// Uses the IEEE total order, so a `NaN` total sorts to one end instead of
/// breaking the sort.
pub fn rank(mut scored: Vec<ScoredAlternative>) -> Vec<ScoredAlternative> {
    scored.sort_by(|a, b| b.score.total_cmp(&a.score));
    scored
}

fn dot(scores: &[f64], model: &ScoreModel) -> f64 {
    scores
        .iter()
        .zip(model.criteria())
        .fold(0.0, |total, (score, criterion)| total + score * criterion.weight)
}
