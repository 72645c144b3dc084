use std::io::{Read, Write};
use thiserror::Error;

use crate::matrix::{ModelError, ScoreModel};

/// Header of the criterion-name column ("requirement")
pub const REQUIREMENT_HEADER: &str = "需求";
/// Header of the weight column ("weight")
pub const WEIGHT_HEADER: &str = "權重";

const REQUIREMENT_ALIAS: &str = "requirement";
const WEIGHT_ALIAS: &str = "weight";

#[derive(Debug, Error)]
pub enum TableError {
    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("table needs at least the '需求' and '權重' columns")]
    MissingColumns,

    #[error("column {column} must be headed '{expected}', found '{found}'")]
    BadHeader {
        column: usize,
        expected: &'static str,
        found: String,
    },

    #[error("line {line}: expected {expected} cells, found {found}")]
    RaggedRow {
        line: u64,
        expected: usize,
        found: usize,
    },

    #[error("line {line}, column '{column}': '{value}' is not a number")]
    InvalidNumber {
        line: u64,
        column: String,
        value: String,
    },

    #[error(transparent)]
    Model(#[from] ModelError),
}

/// Parse a table into a fresh model.
pub fn read_model<R: Read>(reader: R) -> Result<ScoreModel, TableError> {
    let mut model = ScoreModel::new();
    read_into(reader, &mut model)?;
    Ok(model)
}

/// Parse a table and replace the contents of `model` with it.
///
/// Parsing finishes before the model is touched, and the final swap goes
/// through [`ScoreModel::replace_all`], so on any error `model` is unchanged.
pub fn read_into<R: Read>(reader: R, model: &mut ScoreModel) -> Result<(), TableError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    if headers.len() < 2 {
        return Err(TableError::MissingColumns);
    }
    check_header(&headers[0], 0, REQUIREMENT_HEADER, REQUIREMENT_ALIAS)?;
    check_header(&headers[1], 1, WEIGHT_HEADER, WEIGHT_ALIAS)?;

    let alternative_names: Vec<String> = headers.iter().skip(2).map(str::to_string).collect();
    let mut criteria = Vec::new();
    let mut weights = Vec::new();
    let mut columns: Vec<Vec<f64>> = vec![Vec::new(); alternative_names.len()];

    for (idx, record) in csv_reader.records().enumerate() {
        let record = record?;
        let line = record
            .position()
            .map(|p| p.line())
            .unwrap_or(idx as u64 + 2);

        if record.len() != headers.len() {
            return Err(TableError::RaggedRow {
                line,
                expected: headers.len(),
                found: record.len(),
            });
        }

        criteria.push(record[0].to_string());
        weights.push(parse_cell(&record[1], line, &headers[1])?);
        for (col, column) in columns.iter_mut().enumerate() {
            column.push(parse_cell(&record[col + 2], line, &alternative_names[col])?);
        }
    }

    tracing::debug!(
        criteria = criteria.len(),
        alternatives = alternative_names.len(),
        "parsed table"
    );

    model.replace_all(
        criteria,
        weights,
        alternative_names.into_iter().zip(columns).collect(),
    )?;
    Ok(())
}

/// Serialize `model` in the tabular layout, always using the original headers.
pub fn write_model<W: Write>(writer: W, model: &ScoreModel) -> Result<(), TableError> {
    let mut csv_writer = csv::WriterBuilder::new().from_writer(writer);

    let mut header = vec![REQUIREMENT_HEADER.to_string(), WEIGHT_HEADER.to_string()];
    header.extend(model.alternative_names().map(str::to_string));
    csv_writer.write_record(&header)?;

    for (row, criterion) in model.criteria().iter().enumerate() {
        let mut record = Vec::with_capacity(header.len());
        record.push(criterion.name.clone());
        record.push(criterion.weight.to_string());
        for alternative in model.alternatives() {
            record.push(alternative.scores[row].to_string());
        }
        csv_writer.write_record(&record)?;
    }

    csv_writer.flush()?;
    Ok(())
}

fn check_header(
    found: &str,
    column: usize,
    expected: &'static str,
    alias: &str,
) -> Result<(), TableError> {
    let found = found.trim_start_matches('\u{feff}').trim();
    if found == expected || found.eq_ignore_ascii_case(alias) {
        Ok(())
    } else {
        Err(TableError::BadHeader {
            column: column + 1,
            expected,
            found: found.to_string(),
        })
    }
}

/// Parse one numeric cell. `NaN` and infinities are rejected along with
/// non-numbers, since they would poison every weighted total they touch.
fn parse_cell(value: &str, line: u64, column: &str) -> Result<f64, TableError> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .ok_or_else(|| TableError::InvalidNumber {
            line,
            column: column.to_string(),
            value: value.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_model() -> ScoreModel {
        let mut model = ScoreModel::new();
        model.add_criterion("投入預算", 2.0);
        model.add_criterion("舒適度", 0.5);
        model.add_criterion("油耗", -1.0);
        model
            .add_alternative("Toyota Corolla", Some(vec![3.0, 4.5, 2.0]))
            .unwrap();
        model
            .add_alternative("本田, Civic", Some(vec![4.0, 3.0, 0.1]))
            .unwrap();
        model
    }

    fn to_csv(model: &ScoreModel) -> String {
        let mut buf = Vec::new();
        write_model(&mut buf, model).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_write_layout() {
        let mut model = ScoreModel::with_default_criteria(["Budget", "Comfort"]);
        model.add_alternative("X", Some(vec![1.0, 2.5])).unwrap();

        assert_eq!(to_csv(&model), "需求,權重,X\nBudget,1,1\nComfort,1,2.5\n");
    }

    #[test]
    fn test_write_then_read_preserves_model() {
        let model = sample_model();
        let parsed = read_model(to_csv(&model).as_bytes()).unwrap();
        assert_eq!(parsed, model);
    }

    #[test]
    fn test_read_english_headers() {
        let csv = "Requirement,Weight,A,B\nPrice,2,1,3\nSpeed,1,4,0\n";
        let model = read_model(csv.as_bytes()).unwrap();

        assert_eq!(
            model.criterion_names().collect::<Vec<_>>(),
            vec!["Price", "Speed"]
        );
        assert_eq!(model.weights(), vec![2.0, 1.0]);
        assert_eq!(model.scores("A"), Some(&[1.0, 4.0][..]));
        assert_eq!(model.scores("B"), Some(&[3.0, 0.0][..]));
    }

    #[test]
    fn test_read_strips_byte_order_mark() {
        let csv = "\u{feff}需求,權重,A\nPrice,1,5\n";
        let model = read_model(csv.as_bytes()).unwrap();
        assert_eq!(model.scores("A"), Some(&[5.0][..]));
    }

    #[test]
    fn test_read_headers_only() {
        let model = read_model("需求,權重,A,B\n".as_bytes()).unwrap();
        assert_eq!(model.criterion_count(), 0);
        assert_eq!(model.alternative_count(), 2);
        assert_eq!(model.scores("B"), Some(&[][..]));
    }

    #[test]
    fn test_read_rejects_wrong_header() {
        let err = read_model("name,權重,A\nx,1,1\n".as_bytes()).unwrap_err();
        assert!(matches!(err, TableError::BadHeader { column: 1, .. }));
    }

    #[test]
    fn test_read_rejects_missing_columns() {
        let err = read_model("需求\nx\n".as_bytes()).unwrap_err();
        assert!(matches!(err, TableError::MissingColumns));
    }

    #[test]
    fn test_read_rejects_ragged_row() {
        let err = read_model("需求,權重,A\nPrice,1\n".as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            TableError::RaggedRow {
                line: 2,
                expected: 3,
                found: 2
            }
        ));
    }

    #[test]
    fn test_read_rejects_non_numeric_score() {
        let err = read_model("需求,權重,A\nPrice,1,great\n".as_bytes()).unwrap_err();
        match err {
            TableError::InvalidNumber { line, column, value } => {
                assert_eq!(line, 2);
                assert_eq!(column, "A");
                assert_eq!(value, "great");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_read_rejects_non_finite_cells() {
        for cell in ["NaN", "nan", "inf", "-inf", "infinity"] {
            let csv = format!("需求,權重,A\nPrice,1,{}\n", cell);
            let err = read_model(csv.as_bytes()).unwrap_err();
            match err {
                TableError::InvalidNumber { column, value, .. } => {
                    assert_eq!(column, "A");
                    assert_eq!(value, cell);
                }
                other => panic!("unexpected error for '{cell}': {other}"),
            }
        }
    }

    #[test]
    fn test_read_rejects_non_finite_weight() {
        let err = read_model("需求,權重,A\nPrice,inf,1\n".as_bytes()).unwrap_err();
        assert!(matches!(err, TableError::InvalidNumber { line: 2, .. }));
    }

    #[test]
    fn test_read_rejects_duplicate_alternative_headers() {
        let err = read_model("需求,權重,A,A\nPrice,1,1,2\n".as_bytes()).unwrap_err();
        assert!(matches!(err, TableError::Model(ModelError::Duplicate { .. })));
    }

    #[test]
    fn test_read_into_failure_leaves_model_unchanged() {
        let mut model = sample_model();
        let before = model.clone();

        let result = read_into("需求,權重,A\nPrice,1,oops\n".as_bytes(), &mut model);

        assert!(result.is_err());
        assert_eq!(model, before);
    }
}
