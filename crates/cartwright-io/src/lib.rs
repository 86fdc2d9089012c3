//! CSV loading and prediction output for cartwright.

mod domain;
mod error;
mod reader;
mod writer;

pub use domain::{ColumnSpec, Dataset, MissingPolicy};
pub use error::IoError;
pub use reader::TableReader;
pub use writer::PredictionWriter;
