use owo_colors::OwoColorize;
use std::io::IsTerminal;
use terminal_size::{terminal_size, Width};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::matrix::ScoreModel;
use crate::scoring::{Combination, ScoredAlternative};

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Format a number without trailing zeros: 5, 2.5, 0.333
/// At most three decimals are shown.
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    if !value.is_finite() {
        return value.to_string();
    }

    let formatted = format!("{:.3}", value);
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
    if trimmed == "-0" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Columns a string occupies in a terminal. CJK, fullwidth forms and emoji count double.
fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

fn char_width(c: char) -> usize {
    UnicodeWidthChar::width(c).unwrap_or(0)
}

/// Left-align `s` in a column of `width` terminal cells
fn pad_right(s: &str, width: usize) -> String {
    let pad = width.saturating_sub(display_width(s));
    format!("{}{}", s, " ".repeat(pad))
}

/// Right-align `s` in a column of `width` terminal cells
fn pad_left(s: &str, width: usize) -> String {
    let pad = width.saturating_sub(display_width(s));
    format!("{}{}", " ".repeat(pad), s)
}

/// Truncate a name to fit available width, accounting for wide characters
fn truncate_name(name: &str, max_width: usize) -> String {
    if display_width(name) <= max_width {
        return name.to_string();
    }

    let budget = if max_width > 3 { max_width - 3 } else { max_width };
    let mut used = 0;
    let mut out = String::new();
    for c in name.chars() {
        let w = char_width(c);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(c);
    }
    if max_width > 3 {
        out.push_str("...");
    }
    out
}

/// Format the whole decision matrix: one row per criterion, one column per alternative.
pub fn format_matrix(model: &ScoreModel, use_colors: bool) -> String {
    if model.criterion_count() == 0 && model.alternative_count() == 0 {
        return "Decision table is empty.".to_string();
    }

    let mut header: Vec<String> = vec!["Criterion".to_string(), "Weight".to_string()];
    header.extend(model.alternative_names().map(str::to_string));

    let rows: Vec<Vec<String>> = model
        .criteria()
        .iter()
        .enumerate()
        .map(|(row, criterion)| {
            let mut cells = vec![criterion.name.clone(), format_number(criterion.weight)];
            cells.extend(
                model
                    .alternatives()
                    .iter()
                    .map(|alternative| format_number(alternative.scores[row])),
            );
            cells
        })
        .collect();

    let widths: Vec<usize> = (0..header.len())
        .map(|col| {
            rows.iter()
                .map(|cells| display_width(&cells[col]))
                .chain(std::iter::once(display_width(&header[col])))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let separator = "  ";
    let render = |cells: &[String]| -> String {
        cells
            .iter()
            .enumerate()
            .map(|(col, cell)| {
                if col == 0 {
                    pad_right(cell, widths[col])
                } else {
                    pad_left(cell, widths[col])
                }
            })
            .collect::<Vec<_>>()
            .join(separator)
            .trim_end()
            .to_string()
    };

    let mut lines = Vec::with_capacity(rows.len() + 1);
    let header_line = render(&header);
    if use_colors {
        lines.push(header_line.bold().to_string());
    } else {
        lines.push(header_line);
    }
    for cells in &rows {
        lines.push(render(cells));
    }
    lines.join("\n")
}

/// Format weighted totals with columns: Index, Score, Name
/// Index column: 3 chars (fits "99."), right-aligned
/// Score column is right-aligned, 9 chars wide
pub fn format_scores_table(scores: &[ScoredAlternative], use_colors: bool) -> String {
    if scores.is_empty() {
        return "No alternatives defined.".to_string();
    }

    let term_width = get_terminal_width();
    let index_width = 3;
    let score_width = 9;
    let separator = "  ";

    scores
        .iter()
        .enumerate()
        .map(|(idx, scored)| {
            let index_str = format!("{:>2}.", idx + 1);
            let score_padded = format!(
                "{:>width$}",
                format_number(scored.score),
                width = score_width
            );

            let fixed_width = index_width + 1 + score_width + separator.len();
            let name = match term_width {
                Some(width) if width > fixed_width + 10 => {
                    truncate_name(&scored.name, width - fixed_width)
                }
                Some(_) => truncate_name(&scored.name, 20),
                None => scored.name.clone(),
            };

            if use_colors {
                format!(
                    "{} {}{}{}",
                    index_str.dimmed(),
                    score_padded.bold(),
                    separator,
                    name
                )
            } else {
                format!("{} {}{}{}", index_str, score_padded, separator, name)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format weighted totals as tab-separated values for scripting
/// Columns: name, score (no headers, no colors)
pub fn format_tsv(scores: &[ScoredAlternative]) -> String {
    scores
        .iter()
        .map(|scored| format!("{}\t{}", scored.name, scored.score))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format feasible combinations, one per line: "{A, B}  total 300"
pub fn format_combinations(combos: &[Combination], budget: f64, use_colors: bool) -> String {
    if combos.is_empty() {
        return format!(
            "No combination fits the budget of {}.",
            format_number(budget)
        );
    }

    combos
        .iter()
        .enumerate()
        .map(|(idx, combo)| {
            let index_str = format!("{:>2}.", idx + 1);
            let members = format!("{{{}}}", combo.members.join(", "));
            let total = format!("total {}", format_number(combo.total_price));
            if use_colors {
                format!("{} {}  {}", index_str.dimmed(), members, total.bold())
            } else {
                format!("{} {}  {}", index_str, members, total)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
