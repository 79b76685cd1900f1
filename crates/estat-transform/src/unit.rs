//! Unit partitioning.
//!
//! One table may mix incompatible units (yen and counts, say). Display and
//! aggregation always work on the rows of a single unit.

use polars::prelude::{DataFrame, DataType, IntoLazy, col, lit};

use estat_model::UNIT_COLUMN;

use crate::error::Result;
use crate::normalize::NormalizedTable;

/// Rows of the table whose unit equals `unit`.
///
/// Without a unit column the whole table is returned. No match yields an
/// empty frame, not an error.
pub fn partition_by_unit(table: &NormalizedTable, unit: &str) -> Result<DataFrame> {
    partition_frame(table.data(), unit)
}

/// Frame-level form of [`partition_by_unit`].
pub fn partition_frame(df: &DataFrame, unit: &str) -> Result<DataFrame> {
    if df.column(UNIT_COLUMN).is_err() {
        return Ok(df.clone());
    }
    // A null unit compares as null and is dropped.
    let partition = df
        .clone()
        .lazy()
        .filter(col(UNIT_COLUMN).cast(DataType::String).eq(lit(unit)))
        .collect()?;
    Ok(partition)
}
