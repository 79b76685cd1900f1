//! Loading and envelope checks for `getStatsData` responses.
//!
//! The API answers HTTP 200 even when nothing was found; success is signalled
//! by `RESULT.STATUS == 0` inside the body. Row counts are checked here so the
//! normalizer only ever sees tables the viewer is willing to hold in memory.

use std::path::Path;

use tracing::{debug, info};

use serde_json::Value;

use estat_model::{ModelError, StatisticalData, StatsResponse};

use crate::detect::is_stats_data;
use crate::error::{IngestError, Result};

/// Parse a response body.
///
/// Bodies that are valid JSON but not a `getStatsData` payload (search
/// results, meta info) are rejected before the shape is checked.
pub fn parse_response(text: &str) -> Result<StatsResponse> {
    let value: Value = serde_json::from_str(text).map_err(ModelError::from)?;
    if !is_stats_data(&value) {
        return Err(IngestError::NotStatsData);
    }
    Ok(StatsResponse::from_value(value)?)
}

/// Read and parse a response saved to disk.
pub fn read_response(path: &Path) -> Result<StatsResponse> {
    let text = std::fs::read_to_string(path).map_err(|source| IngestError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), bytes = text.len(), "read statistics response");
    parse_response(&text)
}

/// Check the API status and row count, returning the statistical section.
///
/// A response without `RESULT_INF` is accepted; the limit can only be
/// enforced when the API reports a total.
pub fn check_response(response: &StatsResponse, row_limit: u64) -> Result<&StatisticalData> {
    let result = response.result();
    if !result.is_success() {
        return Err(IngestError::ApiStatus {
            status: result.status,
            message: result.error_message.clone().unwrap_or_default(),
        });
    }
    let data = response
        .statistical_data()
        .ok_or(IngestError::MissingStatisticalData)?;
    if let Some(total) = data.total_count() {
        info!(total, row_limit, "statistics response total");
        if total > row_limit {
            return Err(IngestError::RowLimitExceeded {
                total,
                limit: row_limit,
            });
        }
    }
    Ok(data)
}
