//! Tabular persistence of a [`ScoreModel`](crate::matrix::ScoreModel).
//!
//! Layout: the first column holds criterion names under the header `需求`,
//! the second their weights under `權重`, and every further column is one
//! alternative whose header is the alternative's name. One row per criterion.

pub mod codec;
pub mod storage;

pub use codec::{read_into, read_model, write_model, TableError, REQUIREMENT_HEADER, WEIGHT_HEADER};
pub use storage::{load_model, save_model};
