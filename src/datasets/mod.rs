//! Bundled datasets.
//!
//! The diabetes progression dataset (Efron et al., 2004) ships inside the
//! binary: 442 patients, ten baseline variables already mean-centred and
//! scaled by the standard deviation times `sqrt(n_samples)`, and a
//! quantitative measure of disease progression one year after baseline.

use crate::error::{ProgressionError, Result};
use crate::primitives::{Matrix, Vector};

/// Feature columns of the diabetes dataset, in model input order.
pub const FEATURE_NAMES: [&str; 10] = [
    "age", "sex", "bmi", "bp", "s1", "s2", "s3", "s4", "s5", "s6",
];

const DIABETES_CSV: &str = include_str!("../../data/diabetes.csv");

/// A feature matrix with its target vector and column names.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub data: Matrix<f32>,
    pub target: Vector<f32>,
    pub feature_names: Vec<String>,
}

impl Dataset {
    #[must_use]
    pub fn n_samples(&self) -> usize {
        self.data.n_rows()
    }

    #[must_use]
    pub fn n_features(&self) -> usize {
        self.data.n_cols()
    }
}

/// Loads the bundled diabetes dataset.
///
/// # Errors
///
/// Returns an error only if the embedded CSV is malformed.
///
/// # Examples
///
/// ```
/// use progression::datasets::load_diabetes;
///
/// let ds = load_diabetes().unwrap();
/// assert_eq!(ds.data.shape(), (442, 10));
/// assert_eq!(ds.feature_names[2], "bmi");
/// ```
pub fn load_diabetes() -> Result<Dataset> {
    parse_csv(DIABETES_CSV, "target")
}

/// Parses a headered numeric CSV whose `target_column` becomes the target.
///
/// # Errors
///
/// Returns an error on a missing target column, ragged rows, non-numeric
/// cells, or an input without data rows.
pub fn parse_csv(text: &str, target_column: &str) -> Result<Dataset> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers = reader.headers()?.clone();
    let target_idx = headers
        .iter()
        .position(|name| name == target_column)
        .ok_or_else(|| ProgressionError::FormatError {
            message: format!(
                "csv has no '{target_column}' column; available columns: {:?}",
                headers.iter().collect::<Vec<_>>()
            ),
        })?;

    let feature_names: Vec<String> = headers
        .iter()
        .enumerate()
        .filter(|&(i, _)| i != target_idx)
        .map(|(_, name)| name.to_string())
        .collect();

    let mut features = Vec::new();
    let mut target = Vec::new();
    for record in reader.records() {
        let record = record?;
        let line = record.position().map_or(0, csv::Position::line);
        for (i, cell) in record.iter().enumerate() {
            let value: f32 = cell.parse().map_err(|_| ProgressionError::FormatError {
                message: format!("csv line {line}: '{cell}' is not a number"),
            })?;
            if i == target_idx {
                target.push(value);
            } else {
                features.push(value);
            }
        }
    }

    if target.is_empty() {
        return Err(ProgressionError::empty_input("csv has no data rows"));
    }

    Ok(Dataset {
        data: Matrix::from_vec(target.len(), feature_names.len(), features)?,
        target: Vector::from_vec(target),
        feature_names,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diabetes_shape_and_names() {
        let ds = load_diabetes().unwrap();
        assert_eq!(ds.n_samples(), 442);
        assert_eq!(ds.n_features(), 10);
        assert_eq!(ds.target.len(), 442);
        assert_eq!(ds.feature_names, FEATURE_NAMES.map(String::from).to_vec());
    }

    #[test]
    fn test_diabetes_first_row() {
        let ds = load_diabetes().unwrap();
        assert!((ds.data.get(0, 0) - 0.038_075_905).abs() < 1e-7);
        assert!((ds.target[0] - 151.0).abs() < 1e-6);
    }

    #[test]
    fn test_diabetes_targets_in_known_range() {
        let ds = load_diabetes().unwrap();
        let min = ds.target.iter().copied().fold(f32::INFINITY, f32::min);
        let max = ds.target.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        assert_eq!(min, 25.0);
        assert_eq!(max, 346.0);
    }

    #[test]
    fn test_diabetes_features_are_centred() {
        let ds = load_diabetes().unwrap();
        for j in 0..ds.n_features() {
            let mean = ds.data.column(j).mean();
            assert!(mean.abs() < 1e-6, "column {j} mean {mean}");
        }
    }

    #[test]
    fn test_parse_csv_target_in_middle() {
        let ds = parse_csv("a,y,b\n1,10,2\n3,20,4\n", "y").unwrap();
        assert_eq!(ds.feature_names, vec!["a", "b"]);
        assert_eq!(ds.data.as_slice(), &[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(ds.target.as_slice(), &[10.0, 20.0]);
    }

    #[test]
    fn test_parse_csv_trims_cells_and_skips_blank_lines() {
        let ds = parse_csv(" a , y \n 1 , 10 \n\n3,20\n", "y").unwrap();
        assert_eq!(ds.feature_names, vec!["a"]);
        assert_eq!(ds.target.as_slice(), &[10.0, 20.0]);
    }

    #[test]
    fn test_parse_csv_ragged_row_is_format_error() {
        let err = parse_csv("a,y\n1,2\n3\n", "y").unwrap_err();
        assert!(matches!(err, ProgressionError::FormatError { .. }), "{err}");
    }

    #[test]
    fn test_parse_csv_errors() {
        assert!(parse_csv("", "y").is_err());
        assert!(parse_csv("a,b\n1,2\n", "y").is_err());
        assert!(parse_csv("a,y\n1\n", "y").is_err());
        assert!(parse_csv("a,y\n1,x\n", "y").is_err());
        assert!(parse_csv("a,y\n", "y").is_err());
    }
}
