//! Data model for e-Stat statistics responses.
//!
//! - **response**: serde types for the `getStatsData` wire shape
//! - **columns**: fixed column names of a normalized table
//! - **options**: viewer configuration

pub mod columns;
pub mod error;
pub mod options;
pub mod response;

pub use columns::{NO_UNIT, UNIT_COLUMN, VALUE_COLUMN};
pub use error::{ModelError, Result};
pub use options::{DEFAULT_PREVIEW_ROWS, DEFAULT_ROW_LIMIT, ViewerOptions};
pub use response::{
    ApiResult, ClassDefinition, ClassEntry, ClassInf, DataInf, GetStatsData, ResultInf,
    StatisticalData, StatsResponse, TableInf, ValueRecord,
};
