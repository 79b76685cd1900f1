//! Recognizing statistics payloads and table ids.

use serde_json::Value;

const STATS_DATA_KEY: &str = "GET_STATS_DATA";
const STATDISP_PARAM: &str = "statdisp_id=";

/// Returns true when a JSON value is a `getStatsData` response body.
pub fn is_stats_data(value: &Value) -> bool {
    value
        .as_object()
        .is_some_and(|map| map.contains_key(STATS_DATA_KEY))
}

/// Remove CR and LF characters.
pub fn strip_newlines(text: &str) -> String {
    text.chars().filter(|ch| *ch != '\n' && *ch != '\r').collect()
}

/// Extract the statistics table id from an e-Stat page URL.
///
/// # Examples
///
/// ```
/// use estat_ingest::extract_stats_data_id;
///
/// let url = "https://www.e-stat.go.jp/dbview?sid=0003448237&statdisp_id=0003448237&lang=J";
/// assert_eq!(extract_stats_data_id(url).as_deref(), Some("0003448237"));
/// assert_eq!(extract_stats_data_id("https://www.e-stat.go.jp/"), None);
/// ```
pub fn extract_stats_data_id(url: &str) -> Option<String> {
    let (_, tail) = url.split_once(STATDISP_PARAM)?;
    let id = tail.split('&').next().unwrap_or_default();
    Some(strip_newlines(id))
}
