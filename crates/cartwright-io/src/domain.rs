//! Domain types for cartwright-io.

use std::fmt;

/// How one predictor is derived from a CSV column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnSpec {
    /// The column parsed as a finite float.
    Numeric(String),
    /// 1.0 when the cell equals `value`, else 0.0.
    Indicator {
        /// Header name of the source column.
        column: String,
        /// The cell text that maps to 1.0.
        value: String,
    },
}

impl ColumnSpec {
    /// Parse `name` as a numeric column or `name=value` as an indicator.
    #[must_use]
    pub fn parse(spec: &str) -> Self {
        match spec.split_once('=') {
            Some((column, value)) => ColumnSpec::Indicator {
                column: column.trim().to_string(),
                value: value.trim().to_string(),
            },
            None => ColumnSpec::Numeric(spec.trim().to_string()),
        }
    }

    /// Return the header name of the source column.
    #[must_use]
    pub fn column(&self) -> &str {
        match self {
            ColumnSpec::Numeric(column) | ColumnSpec::Indicator { column, .. } => column,
        }
    }
}

impl fmt::Display for ColumnSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnSpec::Numeric(column) => f.write_str(column),
            ColumnSpec::Indicator { column, value } => write!(f, "{column}={value}"),
        }
    }
}

/// What to do with a row that has an empty cell in a selected column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingPolicy {
    /// Fail with [`IoError::MissingValue`](crate::IoError::MissingValue).
    #[default]
    Reject,
    /// Leave the row out of the dataset.
    Skip,
}

/// A column-major numeric dataset read from CSV.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    /// One name per predictor, in the order requested.
    pub predictor_names: Vec<String>,
    /// `predictors[predictor][row]`.
    pub predictors: Vec<Vec<f64>>,
    /// The response column, when one was requested.
    pub responses: Option<Vec<f64>>,
    /// Zero-based data-row index in the source file of each kept row.
    pub source_rows: Vec<usize>,
    /// Rows left out under [`MissingPolicy::Skip`].
    pub n_skipped: usize,
}

impl Dataset {
    /// Return the number of rows kept.
    #[must_use]
    pub fn n_rows(&self) -> usize {
        self.source_rows.len()
    }

    /// Return the dataset as row-major predictor vectors.
    #[must_use]
    pub fn rows(&self) -> Vec<Vec<f64>> {
        (0..self.n_rows())
            .map(|i| self.predictors.iter().map(|column| column[i]).collect())
            .collect()
    }
}
