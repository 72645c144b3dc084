pub mod formatter;

pub use formatter::{
    format_combinations, format_matrix, format_number, format_scores_table, format_tsv,
    should_use_colors,
};
