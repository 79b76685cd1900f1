//! Error types for table transformation.

use polars::prelude::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransformError {
    #[error("polars error: {0}")]
    Polars(#[from] PolarsError),

    /// Two axes resolve to the same column name.
    #[error("duplicate column name '{name}' after renaming")]
    DuplicateColumn { name: String },

    /// A chart or filter refers to a column the table does not have.
    #[error("column '{column}' not found in table")]
    MissingColumn { column: String },

    #[error("unknown display type '{0}'")]
    UnknownDisplayType(String),
}

pub type Result<T> = std::result::Result<T, TransformError>;
