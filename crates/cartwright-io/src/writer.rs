//! CSV writer for tree predictions.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use crate::IoError;

/// Writes one `row,prediction` record per predicted row.
///
/// `row` is the zero-based data-row index in the input file, so rows dropped
/// while reading leave gaps rather than shifting later labels.
///
/// Creates the parent directory on construction if it does not exist.
pub struct PredictionWriter {
    path: PathBuf,
}

impl PredictionWriter {
    /// Create a new writer targeting the given file.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::OutputDirCreate`] if the parent directory cannot be created.
    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn new(path: &Path) -> Result<Self, IoError> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|e| IoError::OutputDirCreate {
                path: dir.to_path_buf(),
                source: e,
            })?;
            debug!("output directory ready");
        }
        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    /// Return the target path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write `predictions`, labelling each with the matching entry of `source_rows`.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`IoError::RowCountMismatch`] | `source_rows` and `predictions` differ in length |
    /// | [`IoError::WriteFile`] | the file cannot be written |
    #[instrument(skip_all, fields(path = %self.path.display(), n_rows = predictions.len()))]
    pub fn write(&self, source_rows: &[usize], predictions: &[f64]) -> Result<(), IoError> {
        if source_rows.len() != predictions.len() {
            return Err(IoError::RowCountMismatch {
                path: self.path.clone(),
                n_rows: source_rows.len(),
                n_predictions: predictions.len(),
            });
        }
        let write_error = |source: csv::Error| IoError::WriteFile {
            path: self.path.clone(),
            source,
        };

        let mut wtr = csv::Writer::from_path(&self.path).map_err(write_error)?;
        wtr.write_record(["row", "prediction"])
            .map_err(write_error)?;
        for (row, prediction) in source_rows.iter().zip(predictions) {
            wtr.write_record([row.to_string(), prediction.to_string()])
                .map_err(write_error)?;
        }
        wtr.flush().map_err(|e| write_error(e.into()))?;

        info!("predictions written");
        Ok(())
    }
}
