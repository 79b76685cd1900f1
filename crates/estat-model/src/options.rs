//! Configuration options for the statistics viewer.

use serde::{Deserialize, Serialize};

/// Largest response (in rows) the viewer accepts by default.
pub const DEFAULT_ROW_LIMIT: u64 = 10_000;

/// Rows shown in a table preview by default.
pub const DEFAULT_PREVIEW_ROWS: usize = 20;

/// Options controlling ingestion limits and display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewerOptions {
    /// Responses whose `TOTAL_NUMBER` exceeds this are rejected.
    pub row_limit: u64,
    /// Number of rows printed for table output.
    pub preview_rows: usize,
}

impl Default for ViewerOptions {
    fn default() -> Self {
        Self {
            row_limit: DEFAULT_ROW_LIMIT,
            preview_rows: DEFAULT_PREVIEW_ROWS,
        }
    }
}

impl ViewerOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_row_limit(mut self, limit: u64) -> Self {
        self.row_limit = limit;
        self
    }

    #[must_use]
    pub fn with_preview_rows(mut self, rows: usize) -> Self {
        self.preview_rows = rows;
        self
    }
}
