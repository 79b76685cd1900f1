//! Chart-data preparation.
//!
//! Every display type has its own handler; [`prepare_chart`] dispatches with
//! an exhaustive match so a new variant cannot be silently ignored.
//!
//! Invalid axis choices are user-input problems, not failures: they come back
//! as [`ChartOutcome::Warning`] and no chart data is produced.

use std::fmt;
use std::str::FromStr;

use polars::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use estat_common::{coerce_f64, column_texts};
use estat_model::VALUE_COLUMN;

use crate::error::{Result, TransformError};
use crate::normalize::ColumnRoles;

/// How a table is displayed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayType {
    #[default]
    Table,
    Line,
    Scatter,
    Bar,
}

impl DisplayType {
    pub const ALL: [DisplayType; 4] = [Self::Table, Self::Line, Self::Scatter, Self::Bar];

    /// Label shown to the user.
    pub fn label(self) -> &'static str {
        match self {
            Self::Table => "テーブル",
            Self::Line => "折れ線グラフ",
            Self::Scatter => "散布図",
            Self::Bar => "棒グラフ",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Table => "table",
            Self::Line => "line",
            Self::Scatter => "scatter",
            Self::Bar => "bar",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|display| display.label() == label)
    }
}

impl fmt::Display for DisplayType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for DisplayType {
    type Err = TransformError;

    /// Accepts the English name (any case) or the Japanese label.
    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|display| display.name().eq_ignore_ascii_case(trimmed))
            .or_else(|| Self::from_label(trimmed))
            .ok_or_else(|| TransformError::UnknownDisplayType(s.to_string()))
    }
}

/// Requested chart axes. `None` picks the first candidate column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AxisSelection {
    pub x: Option<String>,
    pub color: Option<String>,
}

impl AxisSelection {
    pub fn new(x: Option<String>, color: Option<String>) -> Self {
        Self { x, color }
    }
}

/// A user-facing reason why no chart was produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChartWarning {
    #[error("x軸と色分けのカテゴリは異なる値を選択してください")]
    SameAxis { column: String },

    #[error("グラフに使用できる列がありません")]
    NoCandidates,

    #[error("列 '{column}' はこのグラフでは選択できません")]
    InvalidAxis { column: String },
}

/// Line and scatter data: the raw rows plus the resolved axis columns.
#[derive(Debug, Clone)]
pub struct SeriesChart {
    pub data: DataFrame,
    pub x: String,
    pub y: String,
    pub color: String,
}

/// One summed bar segment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarSegment {
    pub x: String,
    pub color: String,
    pub value: f64,
}

/// Sum of all segments at one x position, with its compact label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisTotal {
    pub category: String,
    pub total: f64,
    pub label: String,
}

/// Stacked bar data aggregated by (x, color).
#[derive(Debug, Clone)]
pub struct BarChart {
    /// Aggregated frame sorted by x, then color.
    pub data: DataFrame,
    pub x: String,
    pub y: String,
    pub color: String,
    pub segments: Vec<BarSegment>,
    pub totals: Vec<AxisTotal>,
}

impl BarChart {
    pub fn segment(&self, x: &str, color: &str) -> Option<f64> {
        self.segments
            .iter()
            .find(|segment| segment.x == x && segment.color == color)
            .map(|segment| segment.value)
    }
}

#[derive(Debug, Clone)]
pub enum ChartOutcome {
    Table(DataFrame),
    Line(SeriesChart),
    Scatter(SeriesChart),
    Bar(BarChart),
    Warning(ChartWarning),
}

impl ChartOutcome {
    pub fn warning(&self) -> Option<&ChartWarning> {
        match self {
            Self::Warning(warning) => Some(warning),
            _ => None,
        }
    }
}

/// Prepare display data for a filtered, single-unit frame.
pub fn prepare_chart(
    df: &DataFrame,
    roles: &ColumnRoles,
    display: DisplayType,
    axes: &AxisSelection,
) -> Result<ChartOutcome> {
    match display {
        DisplayType::Table => Ok(ChartOutcome::Table(df.clone())),
        DisplayType::Line => prepare_line(df, roles, axes),
        DisplayType::Scatter => prepare_scatter(df, roles, axes),
        DisplayType::Bar => prepare_bar(df, roles, axes),
    }
}

fn prepare_line(df: &DataFrame, roles: &ColumnRoles, axes: &AxisSelection) -> Result<ChartOutcome> {
    let (x, color) = match resolve_axes(
        axes,
        &roles.continuous_values,
        &roles.category_columns,
    ) {
        Ok(resolved) => resolved,
        Err(warning) => return Ok(ChartOutcome::Warning(warning)),
    };
    Ok(ChartOutcome::Line(series_chart(df, x, color)?))
}

fn prepare_scatter(
    df: &DataFrame,
    roles: &ColumnRoles,
    axes: &AxisSelection,
) -> Result<ChartOutcome> {
    let (x, color) = match resolve_axes(axes, &roles.category_columns, &roles.category_columns) {
        Ok(resolved) => resolved,
        Err(warning) => return Ok(ChartOutcome::Warning(warning)),
    };
    Ok(ChartOutcome::Scatter(series_chart(df, x, color)?))
}

fn prepare_bar(df: &DataFrame, roles: &ColumnRoles, axes: &AxisSelection) -> Result<ChartOutcome> {
    let (x, color) = match resolve_axes(axes, &roles.category_columns, &roles.category_columns) {
        Ok(resolved) => resolved,
        Err(warning) => return Ok(ChartOutcome::Warning(warning)),
    };
    if x == color {
        debug!(column = %x, "bar chart x and color are the same column");
        return Ok(ChartOutcome::Warning(ChartWarning::SameAxis { column: x }));
    }
    ensure_columns(df, &[x.as_str(), color.as_str(), VALUE_COLUMN])?;

    let coerced = coerce_values(df)?;
    let data = coerced
        .clone()
        .lazy()
        .filter(col(x.as_str()).is_not_null().and(col(color.as_str()).is_not_null()))
        .group_by([col(x.as_str()), col(color.as_str())])
        .agg([col(VALUE_COLUMN).sum()])
        .sort_by_exprs(
            [col(x.as_str()), col(color.as_str())],
            SortMultipleOptions::default(),
        )
        .collect()?;

    let xs = column_texts(&data, &x)?;
    let colors = column_texts(&data, &color)?;
    let sums = data.column(VALUE_COLUMN)?.f64()?;
    let segments: Vec<BarSegment> = xs
        .into_iter()
        .zip(colors)
        .zip(sums.into_iter())
        .map(|((x, color), value)| BarSegment {
            x: x.unwrap_or_default(),
            color: color.unwrap_or_default(),
            value: value.unwrap_or(0.0),
        })
        .collect();
    let totals = axis_totals(&coerced, &x)?;

    debug!(
        x = %x,
        color = %color,
        segments = segments.len(),
        "aggregated bar chart"
    );
    Ok(ChartOutcome::Bar(BarChart {
        data,
        x,
        y: VALUE_COLUMN.to_string(),
        color,
        segments,
        totals,
    }))
}

fn series_chart(df: &DataFrame, x: String, color: String) -> Result<SeriesChart> {
    ensure_columns(df, &[x.as_str(), color.as_str(), VALUE_COLUMN])?;
    Ok(SeriesChart {
        data: df.clone(),
        x,
        y: VALUE_COLUMN.to_string(),
        color,
    })
}

/// Resolve requested axes against their candidate lists.
fn resolve_axes(
    axes: &AxisSelection,
    x_candidates: &[String],
    color_candidates: &[String],
) -> std::result::Result<(String, String), ChartWarning> {
    let x = resolve_axis(axes.x.as_deref(), x_candidates)?;
    let color = resolve_axis(axes.color.as_deref(), color_candidates)?;
    Ok((x, color))
}

fn resolve_axis(
    requested: Option<&str>,
    candidates: &[String],
) -> std::result::Result<String, ChartWarning> {
    match requested {
        Some(column) if candidates.iter().any(|c| c == column) => Ok(column.to_string()),
        Some(column) => Err(ChartWarning::InvalidAxis {
            column: column.to_string(),
        }),
        None => candidates.first().cloned().ok_or(ChartWarning::NoCandidates),
    }
}

fn ensure_columns(df: &DataFrame, columns: &[&str]) -> Result<()> {
    for column in columns {
        if df.column(column).is_err() {
            return Err(TransformError::MissingColumn {
                column: (*column).to_string(),
            });
        }
    }
    Ok(())
}

/// Replace the value column with its lenient `f64` coercion.
pub fn coerce_values(df: &DataFrame) -> Result<DataFrame> {
    let values: Vec<f64> = column_texts(df, VALUE_COLUMN)?
        .iter()
        .map(|cell| coerce_f64(cell.as_deref()))
        .collect();
    let mut coerced = df.clone();
    coerced.with_column(Column::new(VALUE_COLUMN.into(), values))?;
    Ok(coerced)
}

/// Per-x totals of a coerced frame, sorted by x.
///
/// Grouped by x alone, so rows with a null color still count.
fn axis_totals(coerced: &DataFrame, x: &str) -> Result<Vec<AxisTotal>> {
    let grouped = coerced
        .clone()
        .lazy()
        .filter(col(x).is_not_null())
        .group_by([col(x)])
        .agg([col(VALUE_COLUMN).sum()])
        .sort_by_exprs([col(x)], SortMultipleOptions::default())
        .collect()?;
    let categories = column_texts(&grouped, x)?;
    let sums: Vec<f64> = grouped
        .column(VALUE_COLUMN)?
        .f64()?
        .into_iter()
        .map(|sum| sum.unwrap_or(0.0))
        .collect();
    let labels = compact_labels(&sums);
    Ok(categories
        .into_iter()
        .zip(sums)
        .zip(labels)
        .map(|((category, total), label)| AxisTotal {
            category: category.unwrap_or_default(),
            total,
            label,
        })
        .collect())
}

/// Compact labels for a set of totals, all at the same scale.
///
/// If any total reaches a million every label is in millions (`1.2M`),
/// else if any reaches a thousand every label is in thousands (`3.4K`),
/// otherwise plain values with one decimal.
pub fn compact_labels(totals: &[f64]) -> Vec<String> {
    let (divisor, suffix) = if totals.iter().any(|v| *v >= 1e6) {
        (1e6, "M")
    } else if totals.iter().any(|v| *v >= 1e3) {
        (1e3, "K")
    } else {
        (1.0, "")
    };
    totals
        .iter()
        .map(|v| format!("{:.1}{suffix}", v / divisor))
        .collect()
}
