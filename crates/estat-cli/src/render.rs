//! Terminal, JSON and CSV rendering of presentations.

use std::io::Write;

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use polars::prelude::{DataFrame, PolarsError};
use serde_json::{Map, Value, json};
use thiserror::Error;

use estat_common::column_texts;
use estat_model::VALUE_COLUMN;
use estat_transform::{BarChart, ChartOutcome, ColumnRoles, Presentation, SeriesChart};

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("polars error: {0}")]
    Polars(#[from] PolarsError),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, RenderError>;

/// Render a presentation as terminal text.
pub fn render_text(presentation: &Presentation, max_rows: usize) -> Result<String> {
    let mut out = String::new();
    out.push_str(&format!("単位: {}\n", presentation.unit));
    match &presentation.outcome {
        ChartOutcome::Table(df) => {
            out.push_str(&frame_table(df, max_rows)?.to_string());
            out.push_str(&row_footer(df.height(), max_rows));
        }
        ChartOutcome::Line(chart) | ChartOutcome::Scatter(chart) => {
            out.push_str(&format!(
                "x: {}  y: {}  色: {}\n",
                chart.x, chart.y, chart.color
            ));
            let points = series_points(chart)?;
            out.push_str(&frame_table(&points, max_rows)?.to_string());
            out.push_str(&row_footer(points.height(), max_rows));
        }
        ChartOutcome::Bar(bar) => {
            out.push_str(&bar_table(bar).to_string());
            out.push('\n');
            out.push_str(&totals_table(bar).to_string());
        }
        ChartOutcome::Warning(warning) => {
            out.push_str(&format!("警告: {warning}"));
        }
    }
    out.push('\n');
    Ok(out)
}

/// Render the first `max_rows` rows of a frame, every cell as text.
pub fn frame_table(df: &DataFrame, max_rows: usize) -> Result<Table> {
    let (names, columns) = text_columns(df)?;
    let mut table = Table::new();
    table.set_header(names.iter().map(|name| header_cell(name)));
    apply_table_style(&mut table);
    for row in 0..df.height().min(max_rows) {
        table.add_row(columns.iter().map(|cells| match &cells[row] {
            Some(text) => Cell::new(text),
            None => dim_cell("-"),
        }));
    }
    if let Some(index) = names.iter().position(|name| name == VALUE_COLUMN) {
        align_column(&mut table, index, CellAlignment::Right);
    }
    Ok(table)
}

fn series_points(chart: &SeriesChart) -> Result<DataFrame> {
    Ok(chart
        .data
        .select([chart.x.as_str(), chart.color.as_str(), chart.y.as_str()])?)
}

pub fn bar_table(bar: &BarChart) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell(&bar.x),
        header_cell(&bar.color),
        header_cell(&bar.y),
    ]);
    apply_summary_style(&mut table);
    for segment in &bar.segments {
        table.add_row(vec![
            Cell::new(&segment.x),
            Cell::new(&segment.color),
            Cell::new(estat_common::format_numeric(segment.value)),
        ]);
    }
    align_column(&mut table, 2, CellAlignment::Right);
    table
}

pub fn totals_table(bar: &BarChart) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell(&bar.x), header_cell("合計")]);
    apply_summary_style(&mut table);
    for total in &bar.totals {
        table.add_row(vec![
            Cell::new(&total.category),
            Cell::new(&total.label)
                .fg(Color::Cyan)
                .add_attribute(Attribute::Bold),
        ]);
    }
    align_column(&mut table, 1, CellAlignment::Right);
    table
}

/// Summary of a normalized table for `inspect`.
pub fn roles_table(roles: &ColumnRoles, unit_types: &[String]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("役割"), header_cell("列")]);
    apply_summary_style(&mut table);
    table.add_row(vec![
        Cell::new("カテゴリ列"),
        list_cell(&roles.category_columns),
    ]);
    table.add_row(vec![
        Cell::new("連続値の列"),
        list_cell(&roles.continuous_values),
    ]);
    table.add_row(vec![Cell::new("値の列"), Cell::new(&roles.value_column)]);
    table.add_row(vec![Cell::new("単位の列"), Cell::new(&roles.unit_column)]);
    table.add_row(vec![Cell::new("単位"), list_cell(unit_types)]);
    table
}

/// Rows as JSON objects keyed by column name, nulls kept.
pub fn records_json(df: &DataFrame) -> Result<Vec<Map<String, Value>>> {
    let (names, columns) = text_columns(df)?;
    Ok((0..df.height())
        .map(|row| {
            names
                .iter()
                .zip(&columns)
                .map(|(name, cells)| {
                    let value = cells[row].clone().map_or(Value::Null, Value::String);
                    (name.clone(), value)
                })
                .collect()
        })
        .collect())
}

/// Machine-readable form of a presentation.
pub fn presentation_json(presentation: &Presentation) -> Result<Value> {
    let outcome = match &presentation.outcome {
        ChartOutcome::Table(df) => json!({
            "display": "table",
            "rows": records_json(df)?,
        }),
        ChartOutcome::Line(chart) => series_json("line", chart)?,
        ChartOutcome::Scatter(chart) => series_json("scatter", chart)?,
        ChartOutcome::Bar(bar) => json!({
            "display": "bar",
            "x": bar.x,
            "y": bar.y,
            "color": bar.color,
            "segments": bar.segments,
            "totals": bar.totals,
        }),
        ChartOutcome::Warning(warning) => json!({
            "display": "warning",
            "message": warning.to_string(),
        }),
    };
    Ok(json!({
        "unit": presentation.unit,
        "unit_types": presentation.unit_types,
        "roles": presentation.roles,
        "outcome": outcome,
    }))
}

fn series_json(display: &str, chart: &SeriesChart) -> Result<Value> {
    Ok(json!({
        "display": display,
        "x": chart.x,
        "y": chart.y,
        "color": chart.color,
        "rows": records_json(&chart.data)?,
    }))
}

/// Write a frame as CSV with a header row. Nulls become empty fields.
pub fn write_csv<W: Write>(df: &DataFrame, writer: W) -> Result<()> {
    let (names, columns) = text_columns(df)?;
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(&names)?;
    for row in 0..df.height() {
        csv_writer.write_record(columns.iter().map(|cells| cells[row].as_deref().unwrap_or("")))?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Column names and their cells as text, in frame order.
fn text_columns(df: &DataFrame) -> Result<(Vec<String>, Vec<Vec<Option<String>>>)> {
    let names: Vec<String> = df
        .get_column_names()
        .into_iter()
        .map(|name| name.to_string())
        .collect();
    let columns = names
        .iter()
        .map(|name| column_texts(df, name))
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok((names, columns))
}

fn row_footer(total: usize, max_rows: usize) -> String {
    if total > max_rows {
        format!("\n{max_rows} / {total} 行を表示")
    } else {
        format!("\n{total} 行")
    }
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
}

fn apply_summary_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

fn list_cell(values: &[String]) -> Cell {
    if values.is_empty() {
        dim_cell("-")
    } else {
        Cell::new(values.join(", "))
    }
}
