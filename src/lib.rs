//! Weighted average decision matrix.
//!
//! A [`ScoreModel`](matrix::ScoreModel) holds weighted criteria and the
//! alternatives scored against them. [`scoring`] turns it into weighted
//! totals and budget-feasible combinations, [`table`] reads and writes the
//! CSV layout, and [`output`] renders results for the terminal.

pub mod config;
pub mod matrix;
pub mod output;
pub mod scoring;
pub mod table;
