//! Column/value inclusion filters.
//!
//! A row survives when, for every filtered column, its value is one of the
//! allowed values (AND across columns, OR within a column). A column with no
//! allowed values does not constrain anything.

use std::collections::{BTreeMap, BTreeSet};

use polars::prelude::{DataFrame, DataType, Expr, IntoLazy, col, lit};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use estat_common::column_texts;

use crate::error::Result;

/// Filter selections of one displayed table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    selected_columns: Vec<String>,
    selected_values: BTreeMap<String, BTreeSet<String>>,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Columns chosen for filtering, in selection order.
    pub fn selected_columns(&self) -> &[String] {
        &self.selected_columns
    }

    pub fn select_column(&mut self, column: &str) {
        if !self.selected_columns.iter().any(|c| c == column) {
            self.selected_columns.push(column.to_string());
        }
    }

    /// Drop a column from the selection together with its allowed values.
    pub fn deselect_column(&mut self, column: &str) {
        self.selected_columns.retain(|c| c != column);
        self.selected_values.remove(column);
    }

    /// Replace the allowed values of a column, selecting it if needed.
    pub fn set_values<I, S>(&mut self, column: &str, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.select_column(column);
        self.selected_values.insert(
            column.to_string(),
            values.into_iter().map(Into::into).collect(),
        );
    }

    pub fn allowed_values(&self, column: &str) -> Option<&BTreeSet<String>> {
        self.selected_values.get(column)
    }

    /// Columns with at least one allowed value.
    pub fn constraints(&self) -> impl Iterator<Item = (&str, &BTreeSet<String>)> {
        self.selected_values
            .iter()
            .filter(|(_, allowed)| !allowed.is_empty())
            .map(|(column, allowed)| (column.as_str(), allowed))
    }

    /// True when applying this state leaves a table unchanged.
    pub fn is_unconstrained(&self) -> bool {
        self.constraints().next().is_none()
    }

    pub fn reset(&mut self) {
        self.selected_columns.clear();
        self.selected_values.clear();
    }
}

/// Apply inclusion filters to a frame.
///
/// Columns the frame does not have are skipped; selections can outlive the
/// rows they were made on when a table is reshaped.
pub fn apply_filters(df: &DataFrame, state: &FilterState) -> Result<DataFrame> {
    if state.is_unconstrained() {
        return Ok(df.clone());
    }
    let mut predicate: Option<Expr> = None;
    for (column, allowed) in state.constraints() {
        if df.column(column).is_err() {
            warn!(column, "filter column not in table; skipping");
            continue;
        }
        let any_allowed = allowed
            .iter()
            .map(|value| col(column).cast(DataType::String).eq(lit(value.as_str())))
            .reduce(Expr::or);
        predicate = match (predicate, any_allowed) {
            (Some(all), Some(any)) => Some(all.and(any)),
            (all, any) => all.or(any),
        };
    }
    // Null cells compare as null and are dropped with the non-matching rows.
    let Some(predicate) = predicate else {
        return Ok(df.clone());
    };
    let filtered = df.clone().lazy().filter(predicate).collect()?;
    debug!(
        rows_in = df.height(),
        rows_out = filtered.height(),
        "applied filters"
    );
    Ok(filtered)
}

/// Distinct values of a column in first-seen order, for building selections.
pub fn column_choices(df: &DataFrame, column: &str) -> Result<Vec<String>> {
    let mut seen = BTreeSet::new();
    Ok(column_texts(df, column)?
        .into_iter()
        .flatten()
        .filter(|value| seen.insert(value.clone()))
        .collect())
}
