//! Error types for response ingestion.

use std::path::PathBuf;
use thiserror::Error;

use estat_model::ModelError;

/// Errors that can occur while loading or checking a statistics response.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// Failed to read the response file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === Shape Errors ===
    /// The body is not a `getStatsData` response of the expected shape.
    #[error("failed to parse statistics response: {0}")]
    Parse(#[from] ModelError),

    /// Valid JSON, but not a `getStatsData` body.
    #[error("not a getStatsData response (missing GET_STATS_DATA)")]
    NotStatsData,

    /// The API reported success but sent no `STATISTICAL_DATA`.
    #[error("response has no STATISTICAL_DATA section")]
    MissingStatisticalData,

    // === Envelope Errors ===
    /// The API reported a non-zero status.
    #[error("e-Stat API returned status {status}: {message}")]
    ApiStatus { status: i64, message: String },

    /// The table has more rows than the configured limit allows.
    #[error("table has {total} rows, more than the limit of {limit}")]
    RowLimitExceeded { total: u64, limit: u64 },
}

pub type Result<T> = std::result::Result<T, IngestError>;
