//! e-Stat response ingestion: loading saved responses, checking the API
//! envelope and recognizing statistics payloads.

pub mod detect;
pub mod error;
pub mod response;

pub use detect::{extract_stats_data_id, is_stats_data, strip_newlines};
pub use error::{IngestError, Result};
pub use response::{check_response, parse_response, read_response};
