use serde::Serialize;
use std::collections::HashMap;

use crate::matrix::{ModelError, ScoreModel};

/// A set of alternatives bought together and what they cost in total.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Combination {
    /// Member names, in the model's insertion order
    pub members: Vec<String>,
    pub total_price: f64,
}

/// Every non-empty subset of alternatives whose summed price is within `budget`.
///
/// Subsets come out smallest first; within one size they follow the
/// lexicographic order of alternative indices (`[0,1]`, `[0,2]`, `[1,2]`, ...).
/// The search is exhaustive over `2^n - 1` subsets, so callers facing
/// arbitrary input should use [`feasible_combinations_capped`].
pub fn feasible_combinations(
    model: &ScoreModel,
    prices: &HashMap<String, f64>,
    budget: f64,
) -> Result<Vec<Combination>, ModelError> {
    let names: Vec<&str> = model.alternative_names().collect();
    let item_prices = names
        .iter()
        .map(|name| {
            prices
                .get(*name)
                .copied()
                .ok_or_else(|| ModelError::MissingPrice {
                    name: (*name).to_string(),
                })
        })
        .collect::<Result<Vec<f64>, _>>()?;

    let mut feasible = Vec::new();
    for size in 1..=names.len() {
        let mut indices: Vec<usize> = (0..size).collect();
        loop {
            let total_price = indices
                .iter()
                .fold(0.0, |total, &idx| total + item_prices[idx]);
            if total_price <= budget {
                feasible.push(Combination {
                    members: indices.iter().map(|&idx| names[idx].to_string()).collect(),
                    total_price,
                });
            }
            if !next_combination(&mut indices, names.len()) {
                break;
            }
        }
    }

    Ok(feasible)
}

/// Same as [`feasible_combinations`], refusing models with more than
/// `max_alternatives` alternatives.
pub fn feasible_combinations_capped(
    model: &ScoreModel,
    prices: &HashMap<String, f64>,
    budget: f64,
    max_alternatives: usize,
) -> Result<Vec<Combination>, ModelError> {
    let count = model.alternative_count();
    if count > max_alternatives {
        return Err(ModelError::TooManyAlternatives {
            count,
            limit: max_alternatives,
        });
    }
    feasible_combinations(model, prices, budget)
}

/// Advance `indices` to the next k-combination of `0..n` in lexicographic order.
/// Returns false once the last combination has been produced.
fn next_combination(indices: &mut [usize], n: usize) -> bool {
    let k = indices.len();
    let mut i = k;
    while i > 0 {
        i -= 1;
        if indices[i] != i + n - k {
            indices[i] += 1;
            for j in i + 1..k {
                indices[j] = indices[j - 1] + 1;
            }
            return true;
        }
    }
    false
}
