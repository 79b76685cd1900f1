//! Polars AnyValue and column helpers.
//!
//! Normalized statistics tables keep every cell as nullable text; these
//! helpers move values in and out of that representation.

use polars::prelude::*;

/// Converts a Polars `AnyValue` to its display text.
///
/// Returns an empty string for `Null` and formats floats without trailing zeros.
///
/// # Examples
///
/// ```
/// use polars::prelude::AnyValue;
/// use estat_common::any_to_string;
///
/// assert_eq!(any_to_string(AnyValue::Null), "");
/// assert_eq!(any_to_string(AnyValue::Float64(15.0)), "15");
/// assert_eq!(any_to_string(AnyValue::String("東京都")), "東京都");
/// ```
pub fn any_to_string(value: AnyValue<'_>) -> String {
    cell_text(value).unwrap_or_default()
}

/// Converts a Polars `AnyValue` to text, keeping `Null` distinct as `None`.
pub fn cell_text(value: AnyValue<'_>) -> Option<String> {
    match value {
        AnyValue::Null => None,
        AnyValue::String(s) => Some(s.to_string()),
        AnyValue::StringOwned(s) => Some(s.to_string()),
        AnyValue::Float32(v) => Some(format_numeric(f64::from(v))),
        AnyValue::Float64(v) => Some(format_numeric(v)),
        AnyValue::Boolean(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    }
}

/// Formats a floating-point number as a string without trailing zeros.
///
/// # Examples
///
/// ```
/// use estat_common::format_numeric;
///
/// assert_eq!(format_numeric(1.0), "1");
/// assert_eq!(format_numeric(3.50), "3.5");
/// assert_eq!(format_numeric(0.0), "0");
/// ```
pub fn format_numeric(v: f64) -> String {
    if v == 0.0 {
        return "0".to_string();
    }
    let s = format!("{v}");
    if !s.contains('.') {
        return s;
    }
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

/// Parses a string as `f64`, returning `None` for invalid or empty strings.
pub fn parse_f64(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok()
}

/// Lenient numeric coercion used wherever measurement values are summed.
///
/// Missing, unparseable and NaN values become `0.0`; this never fails.
///
/// # Examples
///
/// ```
/// use estat_common::coerce_f64;
///
/// assert_eq!(coerce_f64(Some("10")), 10.0);
/// assert_eq!(coerce_f64(Some("***")), 0.0);
/// assert_eq!(coerce_f64(None), 0.0);
/// ```
pub fn coerce_f64(value: Option<&str>) -> f64 {
    match value.and_then(parse_f64) {
        Some(v) if !v.is_nan() => v,
        _ => 0.0,
    }
}

/// Builds a nullable string column.
pub fn string_column(name: &str, values: Vec<Option<String>>) -> Column {
    Column::new(name.into(), values)
}

/// Reads every cell of a column as nullable text, whatever its dtype.
pub fn column_texts(df: &DataFrame, name: &str) -> PolarsResult<Vec<Option<String>>> {
    let column = df.column(name)?;
    (0..column.len())
        .map(|idx| column.get(idx).map(cell_text))
        .collect()
}
