//! Table normalization for statistics responses.
//!
//! Flattens `DATA_INF.VALUE` into a [`DataFrame`] with one row per record,
//! resolves axis codes to labels, renames columns to their axis names and
//! derives the column roles used for chart axis choices.

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};

use polars::prelude::{Column, DataFrame};
use serde::Serialize;
use tracing::debug;

use estat_common::string_column;
use estat_model::columns::{AXIS_KEY_PREFIX, RAW_UNIT_KEY};
use estat_model::{
    ClassDefinition, NO_UNIT, StatisticalData, UNIT_COLUMN, VALUE_COLUMN, ValueRecord,
};

use crate::error::{Result, TransformError};
use crate::metadata::{ResolvedMetadata, resolve_metadata};

/// How the columns of a normalized table may be used in charts.
///
/// Computed once at normalization and never recomputed, even when the
/// table's rows are replaced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnRoles {
    /// `cat*` axes (axis order), then area, then time. Used for color and
    /// category axes.
    pub category_columns: Vec<String>,
    /// Time first, then `cat*` axes. Candidate x-axes for line charts.
    pub continuous_values: Vec<String>,
    pub value_column: String,
    pub unit_column: String,
}

impl ColumnRoles {
    fn from_metadata(metadata: &ResolvedMetadata) -> Self {
        let category_axes: Vec<&str> = metadata
            .rename_map()
            .iter()
            .filter(|(raw, _)| raw.starts_with(&format!("{AXIS_KEY_PREFIX}cat")))
            .map(|(_, name)| name.as_str())
            .collect();
        let area = metadata.axis_column("area");
        let time = metadata.axis_column("time");

        let mut category_columns: Vec<String> = Vec::new();
        for name in category_axes.iter().copied().chain(area).chain(time) {
            if !category_columns.iter().any(|existing| existing == name) {
                category_columns.push(name.to_string());
            }
        }

        let continuous_values = time
            .into_iter()
            .chain(category_axes.iter().copied())
            .map(str::to_string)
            .collect();

        Self {
            category_columns,
            continuous_values,
            value_column: VALUE_COLUMN.to_string(),
            unit_column: UNIT_COLUMN.to_string(),
        }
    }
}

static NEXT_TABLE_ID: AtomicU64 = AtomicU64::new(0);

/// A statistics table ready for filtering and charting.
#[derive(Debug, Clone)]
pub struct NormalizedTable {
    id: u64,
    data: DataFrame,
    roles: ColumnRoles,
    unit_types: Vec<String>,
    generation: u64,
}

impl NormalizedTable {
    pub fn data(&self) -> &DataFrame {
        &self.data
    }

    pub fn roles(&self) -> &ColumnRoles {
        &self.roles
    }

    /// Distinct units in first-seen order, or `["なし"]` without a unit column.
    pub fn unit_types(&self) -> &[String] {
        &self.unit_types
    }

    pub fn has_unit_column(&self) -> bool {
        self.data.column(UNIT_COLUMN).is_ok()
    }

    pub fn row_count(&self) -> usize {
        self.data.height()
    }

    /// Identity of the table, unique per normalization and kept across
    /// [`replace_data`](Self::replace_data).
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Incremented every time the rows are replaced.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Swap in reshaped rows (e.g. from an external formatting step).
    ///
    /// Column roles and unit types are kept as they were computed from the
    /// original response.
    pub fn replace_data(&mut self, data: DataFrame) {
        debug!(
            rows = data.height(),
            generation = self.generation + 1,
            "replacing table rows; column roles kept"
        );
        self.data = data;
        self.generation += 1;
    }
}

/// Normalize the statistical section of a response.
pub fn normalize(data: &StatisticalData) -> Result<NormalizedTable> {
    normalize_records(data.class_definitions(), data.values())
}

/// Normalize class definitions and value records into a table.
///
/// Pure and deterministic: the same input always yields the same table and
/// roles, and the input is not modified.
pub fn normalize_records(
    definitions: &[ClassDefinition],
    values: &[ValueRecord],
) -> Result<NormalizedTable> {
    let metadata = resolve_metadata(definitions);
    let raw_keys = record_keys(values);

    let mut seen_names: HashSet<&str> = HashSet::with_capacity(raw_keys.len());
    let mut columns: Vec<Column> = Vec::with_capacity(raw_keys.len());
    let mut unit_cells: Option<Vec<Option<String>>> = None;

    for raw_key in &raw_keys {
        let name = metadata.renamed(raw_key).unwrap_or(raw_key.as_str());
        if !seen_names.insert(name) {
            return Err(TransformError::DuplicateColumn {
                name: name.to_string(),
            });
        }

        let axis_id = raw_key.strip_prefix(AXIS_KEY_PREFIX);
        let cells: Vec<Option<String>> = values
            .iter()
            .map(|record| {
                let text = match axis_id {
                    Some(id) if metadata.labels_for(id).is_some() => record
                        .text(raw_key)
                        .map(|code| metadata.resolve_code(id, &code).to_string()),
                    _ => record.text(raw_key),
                };
                if raw_key == RAW_UNIT_KEY {
                    Some(text.unwrap_or_else(|| NO_UNIT.to_string()))
                } else {
                    text
                }
            })
            .collect();

        if raw_key == RAW_UNIT_KEY {
            unit_cells = Some(cells.clone());
        }
        columns.push(string_column(name, cells));
    }

    let unit_types = match unit_cells {
        Some(cells) => distinct_in_order(cells.into_iter().flatten()),
        None => vec![NO_UNIT.to_string()],
    };
    let data = DataFrame::new(columns)?;
    let roles = ColumnRoles::from_metadata(&metadata);

    debug!(
        rows = data.height(),
        columns = data.width(),
        category_columns = roles.category_columns.len(),
        unit_types = unit_types.len(),
        "normalized statistics table"
    );

    Ok(NormalizedTable {
        id: NEXT_TABLE_ID.fetch_add(1, Ordering::Relaxed),
        data,
        roles,
        unit_types,
        generation: 0,
    })
}

/// Union of record keys in first-seen order.
fn record_keys(values: &[ValueRecord]) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut keys = Vec::new();
    for record in values {
        for key in record.keys() {
            if seen.insert(key) {
                keys.push(key.to_string());
            }
        }
    }
    keys
}

fn distinct_in_order(values: impl Iterator<Item = String>) -> Vec<String> {
    let mut seen = HashSet::new();
    values.filter(|value| seen.insert(value.clone())).collect()
}
