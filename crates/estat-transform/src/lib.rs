//! Transformation pipeline for e-Stat statistics tables.
//!
//! - **metadata**: axis code dictionaries and column renames
//! - **normalize**: records to a [`polars::prelude::DataFrame`] plus column roles
//! - **unit**: single-unit row partitions
//! - **filter**: column/value inclusion filters
//! - **chart**: display dispatch and bar aggregation
//! - **view_state**: per-table display state and [`present`]

pub mod chart;
pub mod error;
pub mod filter;
pub mod metadata;
pub mod normalize;
pub mod unit;
pub mod view_state;

pub use chart::{
    AxisSelection, AxisTotal, BarChart, BarSegment, ChartOutcome, ChartWarning, DisplayType,
    SeriesChart, coerce_values, compact_labels, prepare_chart,
};
pub use error::{Result, TransformError};
pub use filter::{FilterState, apply_filters, column_choices};
pub use metadata::{ResolvedMetadata, resolve_metadata};
pub use normalize::{ColumnRoles, NormalizedTable, normalize, normalize_records};
pub use unit::{partition_by_unit, partition_frame};
pub use view_state::{Presentation, ViewState, ViewStore, present};
