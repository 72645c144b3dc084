pub mod combinations;
pub mod engine;

pub use combinations::{feasible_combinations, feasible_combinations_capped, Combination};
pub use engine::{rank, weighted_score, weighted_scores, ScoredAlternative};
