//! Chart-data preparation tests.

mod common;

use estat_model::VALUE_COLUMN;
use estat_transform::{
    AxisSelection, ChartOutcome, ChartWarning, ColumnRoles, DisplayType, coerce_values,
    compact_labels, prepare_chart,
};
use polars::prelude::*;

use common::population_table;

fn roles() -> ColumnRoles {
    ColumnRoles {
        category_columns: vec!["区分".to_string(), "系列".to_string()],
        continuous_values: vec!["区分".to_string()],
        value_column: VALUE_COLUMN.to_string(),
        unit_column: "単位".to_string(),
    }
}

fn axes(x: &str, color: &str) -> AxisSelection {
    AxisSelection::new(Some(x.to_string()), Some(color.to_string()))
}

#[test]
fn bar_sums_coerced_values() {
    let df = df!(
        "区分" => ["A", "A", "A"],
        "系列" => ["P", "P", "Q"],
        VALUE_COLUMN => ["10", "5", "foo"]
    )
    .unwrap();

    let outcome = prepare_chart(&df, &roles(), DisplayType::Bar, &axes("区分", "系列")).unwrap();
    let ChartOutcome::Bar(bar) = outcome else {
        panic!("expected bar chart");
    };
    assert_eq!(bar.segments.len(), 2);
    assert_eq!(bar.segment("A", "P"), Some(15.0));
    assert_eq!(bar.segment("A", "Q"), Some(0.0));
    assert_eq!(bar.totals.len(), 1);
    assert_eq!(bar.totals[0].total, 15.0);
    assert_eq!(bar.totals[0].label, "15.0");
}

#[test]
fn bar_totals_count_rows_without_a_color() {
    let df = df!(
        "区分" => [Some("A"), Some("A"), None],
        "系列" => [Some("P"), None, Some("P")],
        VALUE_COLUMN => ["10", "5", "99"]
    )
    .unwrap();

    let outcome = prepare_chart(&df, &roles(), DisplayType::Bar, &axes("区分", "系列")).unwrap();
    let ChartOutcome::Bar(bar) = outcome else {
        panic!("expected bar chart");
    };
    assert_eq!(bar.segments.len(), 1);
    assert_eq!(bar.segment("A", "P"), Some(10.0));
    assert_eq!(bar.totals.len(), 1);
    assert_eq!(bar.totals[0].category, "A");
    assert_eq!(bar.totals[0].total, 15.0);
}

#[test]
fn bar_with_same_axes_warns() {
    let df = df!("区分" => ["A"], "系列" => ["P"], VALUE_COLUMN => ["1"]).unwrap();
    let outcome = prepare_chart(&df, &roles(), DisplayType::Bar, &axes("区分", "区分")).unwrap();
    assert_eq!(
        outcome.warning(),
        Some(&ChartWarning::SameAxis {
            column: "区分".to_string()
        })
    );
}

#[test]
fn axis_outside_candidates_warns() {
    let df = df!("区分" => ["A"], "系列" => ["P"], VALUE_COLUMN => ["1"]).unwrap();
    let outcome =
        prepare_chart(&df, &roles(), DisplayType::Scatter, &axes(VALUE_COLUMN, "系列")).unwrap();
    assert!(matches!(
        outcome,
        ChartOutcome::Warning(ChartWarning::InvalidAxis { .. })
    ));
}

#[test]
fn table_display_passes_rows_through() {
    let table = population_table();
    let outcome = prepare_chart(
        table.data(),
        table.roles(),
        DisplayType::Table,
        &AxisSelection::default(),
    )
    .unwrap();
    let ChartOutcome::Table(df) = outcome else {
        panic!("expected table");
    };
    assert!(df.equals_missing(table.data()));
}

#[test]
fn bar_defaults_and_sorting_on_real_table() {
    let table = population_table();
    let outcome = prepare_chart(
        table.data(),
        table.roles(),
        DisplayType::Bar,
        &AxisSelection::new(Some("地域".into()), Some("男女別".into())),
    )
    .unwrap();
    let ChartOutcome::Bar(bar) = outcome else {
        panic!("expected bar chart");
    };
    let keys: Vec<(&str, &str)> = bar
        .segments
        .iter()
        .map(|s| (s.x.as_str(), s.color.as_str()))
        .collect();
    assert_eq!(
        keys,
        vec![("大阪府", "女"), ("大阪府", "男"), ("東京都", "女"), ("東京都", "男")]
    );
    let labels: Vec<&str> = bar.totals.iter().map(|t| t.label.as_str()).collect();
    assert_eq!(labels, vec!["5.1K", "0.2K"]);
}

#[test]
fn coercion_never_fails() {
    let df = df!(VALUE_COLUMN => [Some("10"), Some("abc"), None, Some("3.5")]).unwrap();
    let coerced = coerce_values(&df).unwrap();
    let values: Vec<Option<f64>> = coerced
        .column(VALUE_COLUMN)
        .unwrap()
        .f64()
        .unwrap()
        .into_iter()
        .collect();
    assert_eq!(values, vec![Some(10.0), Some(0.0), Some(0.0), Some(3.5)]);
}

#[test]
fn compact_labels_share_one_scale() {
    insta::assert_snapshot!(
        compact_labels(&[2_500_000.0, 40_000.0, 12.0]).join(", "),
        @"2.5M, 0.0M, 0.0M"
    );
    insta::assert_snapshot!(
        compact_labels(&[1500.0, 260.0]).join(", "),
        @"1.5K, 0.3K"
    );
    insta::assert_snapshot!(compact_labels(&[999.0, 0.31]).join(", "), @"999.0, 0.3");
}
