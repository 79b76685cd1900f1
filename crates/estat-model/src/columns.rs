//! Fixed column names of a normalized statistics table.

/// Column holding the raw measurement (`$` on the wire).
pub const VALUE_COLUMN: &str = "値";

/// Column holding the unit of measurement (`@unit` on the wire).
pub const UNIT_COLUMN: &str = "単位";

/// Unit label used when a record carries no unit.
pub const NO_UNIT: &str = "なし";

/// Wire key of the measurement value.
pub const RAW_VALUE_KEY: &str = "$";

/// Wire key of the unit attribute.
pub const RAW_UNIT_KEY: &str = "@unit";

/// Prefix that turns an axis id into its wire key (`cat01` -> `@cat01`).
pub const AXIS_KEY_PREFIX: char = '@';

/// Wire key for an axis id.
///
/// ```
/// use estat_model::columns::axis_key;
///
/// assert_eq!(axis_key("cat01"), "@cat01");
/// ```
pub fn axis_key(id: &str) -> String {
    format!("{AXIS_KEY_PREFIX}{id}")
}
