//! CSV table reader with column selection and input validation.

use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use crate::IoError;
use crate::domain::{ColumnSpec, Dataset, MissingPolicy};

/// Reads selected columns of a headed CSV file into a [`Dataset`].
///
/// Cells are trimmed before use. An empty cell in any selected column counts
/// as missing; what happens next depends on the [`MissingPolicy`].
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`IoError::FileNotFound`] | File doesn't exist or is unreadable |
/// | [`IoError::CsvParse`] | Malformed CSV record |
/// | [`IoError::MissingColumn`] | A requested column is not in the header |
/// | [`IoError::InconsistentRowLength`] | Row has different column count than header |
/// | [`IoError::MissingValue`] | Empty selected cell under [`MissingPolicy::Reject`] |
/// | [`IoError::NonFiniteValue`] | Numeric cell is NaN, Inf, or unparseable |
/// | [`IoError::EmptyDataset`] | Zero rows kept |
pub struct TableReader {
    path: PathBuf,
    predictors: Vec<ColumnSpec>,
    response: Option<String>,
    missing: MissingPolicy,
}

/// A requested column resolved against the header.
struct Resolved<'a> {
    spec: &'a ColumnSpec,
    index: usize,
}

impl TableReader {
    /// Create a reader for `path` that extracts the given predictors.
    pub fn new(path: &Path, predictors: Vec<ColumnSpec>) -> Self {
        Self {
            path: path.to_path_buf(),
            predictors,
            response: None,
            missing: MissingPolicy::default(),
        }
    }

    /// Also extract the named numeric column as the response.
    #[must_use]
    pub fn with_response(mut self, column: impl Into<String>) -> Self {
        self.response = Some(column.into());
        self
    }

    /// Set how rows with empty selected cells are handled.
    #[must_use]
    pub fn with_missing_policy(mut self, missing: MissingPolicy) -> Self {
        self.missing = missing;
        self
    }

    /// Read and validate the CSV file, returning a [`Dataset`].
    #[instrument(skip(self), fields(path = %self.path.display(), n_predictors = self.predictors.len()))]
    pub fn read(&self) -> Result<Dataset, IoError> {
        let file = std::fs::File::open(&self.path).map_err(|e| IoError::FileNotFound {
            path: self.path.clone(),
            source: e,
        })?;

        // flexible(true) lets InconsistentRowLength fire instead of a CsvParse error.
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(file);

        let header = rdr.headers().map_err(|e| self.parse_error(e))?.clone();
        let expected_cols = header.len();
        debug!(expected_cols, "read CSV header");

        let find = |column: &str| {
            header
                .iter()
                .position(|h| h == column)
                .ok_or_else(|| IoError::MissingColumn {
                    path: self.path.clone(),
                    column: column.to_string(),
                })
        };
        let resolved = self
            .predictors
            .iter()
            .map(|spec| find(spec.column()).map(|index| Resolved { spec, index }))
            .collect::<Result<Vec<_>, _>>()?;
        let response_index = self.response.as_deref().map(find).transpose()?;

        let mut predictors = vec![Vec::new(); resolved.len()];
        let mut responses = response_index.map(|_| Vec::new());
        let mut source_rows = Vec::new();
        let mut n_skipped = 0;
        let mut row = Vec::with_capacity(resolved.len());

        for (row_index, result) in rdr.records().enumerate() {
            let record = result.map_err(|e| self.parse_error(e))?;
            if record.len() != expected_cols {
                return Err(IoError::InconsistentRowLength {
                    path: self.path.clone(),
                    row_index,
                    expected: expected_cols,
                    got: record.len(),
                });
            }

            row.clear();
            let mut complete = true;
            for column in &resolved {
                match self.cell(&record[column.index], column.spec, row_index)? {
                    Some(value) => row.push(value),
                    None => {
                        complete = false;
                        break;
                    }
                }
            }
            let response = match (&self.response, response_index) {
                (Some(name), Some(index)) if complete => {
                    let numeric = ColumnSpec::Numeric(name.clone());
                    let value = self.cell(&record[index], &numeric, row_index)?;
                    complete = value.is_some();
                    value
                }
                _ => None,
            };

            if !complete {
                n_skipped += 1;
                continue;
            }
            for (column, &value) in predictors.iter_mut().zip(&row) {
                column.push(value);
            }
            if let (Some(responses), Some(value)) = (responses.as_mut(), response) {
                responses.push(value);
            }
            source_rows.push(row_index);
        }

        let dataset = Dataset {
            predictor_names: self.predictors.iter().map(ToString::to_string).collect(),
            predictors,
            responses,
            source_rows,
            n_skipped,
        };
        if dataset.n_rows() == 0 {
            return Err(IoError::EmptyDataset {
                path: self.path.clone(),
            });
        }

        info!(
            n_rows = dataset.n_rows(),
            n_predictors = dataset.predictors.len(),
            n_skipped,
            "loaded dataset"
        );
        Ok(dataset)
    }

    /// Convert one cell, returning `None` for a skipped missing value.
    fn cell(&self, raw: &str, spec: &ColumnSpec, row_index: usize) -> Result<Option<f64>, IoError> {
        if raw.is_empty() {
            return match self.missing {
                MissingPolicy::Skip => Ok(None),
                MissingPolicy::Reject => Err(IoError::MissingValue {
                    path: self.path.clone(),
                    row_index,
                    column: spec.column().to_string(),
                }),
            };
        }
        match spec {
            ColumnSpec::Indicator { value, .. } => Ok(Some(f64::from(u8::from(raw == value.as_str())))),
            ColumnSpec::Numeric(column) => match raw.parse::<f64>() {
                Ok(value) if value.is_finite() => Ok(Some(value)),
                _ => Err(IoError::NonFiniteValue {
                    path: self.path.clone(),
                    row_index,
                    column: column.clone(),
                    raw: raw.to_string(),
                }),
            },
        }
    }

    fn parse_error(&self, e: csv::Error) -> IoError {
        IoError::CsvParse {
            path: self.path.clone(),
            offset: e.position().map_or(0, |p| p.byte()),
            source: e,
        }
    }
}
