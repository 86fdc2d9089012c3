use std::path::PathBuf;

/// Errors from regression tree construction, growth, evaluation and persistence.
#[derive(Debug, thiserror::Error)]
pub enum TreeError {
    /// Returned when the response column has zero rows.
    #[error("training dataset has zero rows")]
    EmptyDataset,

    /// Returned when a predictor column length differs from the response length.
    #[error("list lengths differ: {expected} responses, but predictor {predictor} has {got} values")]
    ColumnLengthMismatch {
        /// The zero-based index of the offending predictor column.
        predictor: usize,
        /// The response length every predictor must match.
        expected: usize,
        /// The length of the offending predictor column.
        got: usize,
    },

    /// Returned when a training value is NaN or infinite.
    #[error("non-finite value at row {row} of {}", column_label(*predictor))]
    NonFiniteValue {
        /// The offending predictor column, or `None` for the response column.
        predictor: Option<usize>,
        /// The zero-based row index of the offending value.
        row: usize,
    },

    /// Returned when a split search names a predictor the tree does not have.
    #[error("predictor index {index} out of range, should be in [0, {n_predictors})")]
    PredictorOutOfRange {
        /// The requested predictor index.
        index: usize,
        /// The number of predictor columns in the tree.
        n_predictors: usize,
    },

    /// Returned when a prediction row has the wrong number of values.
    #[error("prediction input has {got} values, expected {expected}")]
    PredictionArityMismatch {
        /// The number of predictors the tree was trained on.
        expected: usize,
        /// The number of values in the prediction input.
        got: usize,
    },

    /// Returned when min_rows_per_node is zero.
    #[error("min_rows_per_node must be at least 1, got {min_rows_per_node}")]
    InvalidMinRowsPerNode {
        /// The invalid value provided.
        min_rows_per_node: usize,
    },

    /// Returned when a split tolerance is negative or non-finite.
    #[error("split tolerance {name} must be finite and non-negative, got {value}")]
    InvalidTolerance {
        /// Which tolerance was rejected (`relative` or `absolute`).
        name: &'static str,
        /// The rejected value.
        value: f64,
    },

    /// Returned when the cross-validation accuracy tolerance is not finite and positive.
    #[error("accuracy tolerance must be finite and positive, got {value}")]
    InvalidAccuracyTolerance {
        /// The rejected value.
        value: f64,
    },

    /// Returned when n_folds is less than 2.
    #[error("n_folds must be at least 2, got {n_folds}")]
    InvalidFoldCount {
        /// The invalid n_folds value provided.
        n_folds: usize,
    },

    /// Returned when a cross-validation fold would have no training or validation rows.
    #[error("fold {fold} of {n_folds} is empty for {n_rows} rows")]
    EmptyFold {
        /// The zero-based fold index.
        fold: usize,
        /// The requested number of folds.
        n_folds: usize,
        /// The number of rows in the dataset.
        n_rows: usize,
    },

    /// Returned when model serialization fails.
    #[error("failed to serialize model")]
    SerializeModel {
        /// The underlying bincode error.
        source: Box<bincode::ErrorKind>,
    },

    /// Returned when model deserialization fails.
    #[error("failed to deserialize model from {path}")]
    DeserializeModel {
        /// Path to the model file that could not be deserialized.
        path: PathBuf,
        /// The underlying bincode error.
        source: Box<bincode::ErrorKind>,
    },

    /// Returned when writing the model file fails.
    #[error("failed to write model to {path}")]
    WriteModel {
        /// Path to the file that could not be written.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Returned when reading the model file fails.
    #[error("failed to read model from {path}")]
    ReadModel {
        /// Path to the file that could not be read.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Returned when a decoded model's node arena is not a well-formed tree.
    #[error("invalid model in {path}: {reason}")]
    InvalidModel {
        /// Path to the model file.
        path: PathBuf,
        /// What the arena check found.
        reason: String,
    },

    /// Returned when loading a model with an incompatible format version.
    #[error("incompatible model version in {path}: expected {expected}, found {found}")]
    IncompatibleModelVersion {
        /// The model format version this build expects.
        expected: u32,
        /// The model format version found in the file.
        found: u32,
        /// Path to the model file with the incompatible version.
        path: PathBuf,
    },
}

fn column_label(predictor: Option<usize>) -> String {
    match predictor {
        Some(index) => format!("predictor {index}"),
        None => "the response column".to_string(),
    }
}
