//! Per-table view state.
//!
//! Each displayed table keeps its own display type, unit, filters and axis
//! choices across renders. States live in a [`ViewStore`] keyed by table
//! instance; nothing is global.

use std::collections::HashMap;

use polars::prelude::DataFrame;
use tracing::debug;

use crate::chart::{AxisSelection, ChartOutcome, DisplayType, prepare_chart};
use crate::error::Result;
use crate::filter::{FilterState, apply_filters};
use crate::normalize::{ColumnRoles, NormalizedTable};
use crate::unit::partition_by_unit;

/// Inputs the cached filtered frame was computed from.
#[derive(Debug, Clone, PartialEq)]
struct CacheKey {
    table: u64,
    unit: String,
    filter: FilterState,
    generation: u64,
}

#[derive(Debug, Clone, Default)]
pub struct ViewState {
    pub display_type: DisplayType,
    selected_unit: Option<String>,
    filter: FilterState,
    pub axes: AxisSelection,
    filtered: Option<(CacheKey, DataFrame)>,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected_unit(&self) -> Option<&str> {
        self.selected_unit.as_deref()
    }

    /// Choose a unit. Filters are kept; rows outside the unit are dropped on
    /// the next render.
    pub fn select_unit(&mut self, unit: impl Into<String>) {
        self.selected_unit = Some(unit.into());
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn filter_mut(&mut self) -> &mut FilterState {
        &mut self.filter
    }

    /// Clear all filters; the next render shows the whole unit partition.
    pub fn reset_filters(&mut self) {
        self.filter.reset();
        self.filtered = None;
    }

    /// The unit to display: the selected one if still present, else the
    /// first unit type of the table.
    fn resolve_unit(&self, table: &NormalizedTable) -> String {
        let units = table.unit_types();
        self.selected_unit
            .as_ref()
            .filter(|unit| units.contains(unit))
            .or_else(|| units.first())
            .cloned()
            .unwrap_or_default()
    }

    /// Unit partition of the table with the current filters applied.
    ///
    /// The result is cached and reused until the table, its rows, the unit or
    /// the filters change.
    pub fn filtered_frame(&mut self, table: &NormalizedTable) -> Result<DataFrame> {
        let key = CacheKey {
            table: table.id(),
            unit: self.resolve_unit(table),
            filter: self.filter.clone(),
            generation: table.generation(),
        };
        if let Some((cached_key, frame)) = &self.filtered
            && *cached_key == key
        {
            debug!(unit = %key.unit, "reusing filtered frame");
            return Ok(frame.clone());
        }

        let partition = partition_by_unit(table, &key.unit)?;
        let frame = apply_filters(&partition, &self.filter)?;
        debug!(
            unit = %key.unit,
            partition_rows = partition.height(),
            filtered_rows = frame.height(),
            "computed filtered frame"
        );
        self.filtered = Some((key, frame.clone()));
        Ok(frame)
    }
}

/// Everything a renderer needs for one table.
#[derive(Debug, Clone)]
pub struct Presentation {
    pub unit: String,
    pub outcome: ChartOutcome,
    pub roles: ColumnRoles,
    pub unit_types: Vec<String>,
}

/// Partition, filter and prepare chart data for a table under its view state.
pub fn present(table: &NormalizedTable, state: &mut ViewState) -> Result<Presentation> {
    let frame = state.filtered_frame(table)?;
    let outcome = prepare_chart(&frame, table.roles(), state.display_type, &state.axes)?;
    Ok(Presentation {
        unit: state.resolve_unit(table),
        outcome,
        roles: table.roles().clone(),
        unit_types: table.unit_types().to_vec(),
    })
}

/// View states of all displayed tables, keyed by table instance.
#[derive(Debug, Default)]
pub struct ViewStore {
    views: HashMap<usize, ViewState>,
}

impl ViewStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// State for a table, created with defaults on first access.
    pub fn view(&mut self, key: usize) -> &mut ViewState {
        self.views.entry(key).or_default()
    }

    pub fn get(&self, key: usize) -> Option<&ViewState> {
        self.views.get(&key)
    }

    pub fn remove(&mut self, key: usize) -> Option<ViewState> {
        self.views.remove(&key)
    }

    pub fn clear(&mut self) {
        self.views.clear();
    }

    /// Drop every state except the one for `key`.
    pub fn retain_latest(&mut self, key: usize) {
        self.views.retain(|k, _| *k == key);
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }
}
