pub mod error;
pub mod model;

pub use error::{EntityKind, ModelError};
pub use model::{Alternative, Criterion, ScoreModel, DEFAULT_WEIGHT};
