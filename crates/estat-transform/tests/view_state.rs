//! View state and presentation tests.

mod common;

use estat_common::column_texts;
use estat_model::VALUE_COLUMN;
use estat_transform::{AxisSelection, ChartOutcome, DisplayType, ViewStore, present};

use serde_json::json;

use common::{normalized, population_table};

#[test]
fn presentation_defaults_to_first_unit() {
    let table = population_table();
    let mut store = ViewStore::new();
    let presentation = present(&table, store.view(0)).unwrap();

    assert_eq!(presentation.unit, "人");
    assert_eq!(presentation.unit_types, vec!["人", "円"]);
    let ChartOutcome::Table(df) = presentation.outcome else {
        panic!("expected table");
    };
    assert_eq!(df.height(), 3);
}

#[test]
fn selections_persist_between_renders() {
    let table = population_table();
    let mut store = ViewStore::new();
    {
        let view = store.view(7);
        view.select_unit("人");
        view.filter_mut().set_values("地域", ["東京都"]);
        view.display_type = DisplayType::Bar;
        view.axes = AxisSelection::new(Some("地域".into()), Some("男女別".into()));
    }

    let first = present(&table, store.view(7)).unwrap();
    let second = present(&table, store.view(7)).unwrap();
    for presentation in [first, second] {
        let ChartOutcome::Bar(bar) = presentation.outcome else {
            panic!("expected bar chart");
        };
        assert_eq!(bar.totals.len(), 1);
        assert_eq!(bar.totals[0].category, "東京都");
        assert_eq!(bar.totals[0].total, 220.0);
    }
    assert_eq!(store.len(), 1);
}

#[test]
fn reset_reverts_to_unit_partition() {
    let table = population_table();
    let mut store = ViewStore::new();
    let view = store.view(1);
    view.filter_mut().set_values("男女別", ["女"]);
    assert_eq!(view.filtered_frame(&table).unwrap().height(), 1);

    view.reset_filters();
    assert_eq!(view.filtered_frame(&table).unwrap().height(), 3);
}

#[test]
fn filter_changes_invalidate_cached_frame() {
    let table = population_table();
    let mut store = ViewStore::new();
    let view = store.view(1);
    assert_eq!(view.filtered_frame(&table).unwrap().height(), 3);

    view.filter_mut().set_values("地域", ["大阪府"]);
    let frame = view.filtered_frame(&table).unwrap();
    assert_eq!(
        column_texts(&frame, VALUE_COLUMN).unwrap(),
        vec![Some("80".to_string())]
    );
}

#[test]
fn replaced_rows_are_picked_up() {
    let mut table = population_table();
    let mut store = ViewStore::new();
    assert_eq!(store.view(3).filtered_frame(&table).unwrap().height(), 3);

    let reshaped = table.data().head(Some(1));
    table.replace_data(reshaped);
    assert_eq!(store.view(3).filtered_frame(&table).unwrap().height(), 1);
}

#[test]
fn unknown_selected_unit_falls_back_to_first() {
    let table = population_table();
    let mut store = ViewStore::new();
    store.view(2).select_unit("kg");
    let presentation = present(&table, store.view(2)).unwrap();
    assert_eq!(presentation.unit, "人");
}

#[test]
fn reused_view_shows_rows_of_the_table_it_is_given() {
    let population = population_table();
    let income = normalized(json!({
        "CLASS_INF": {"CLASS_OBJ": [
            {"@id": "area", "@name": "地域", "CLASS": {"@code": "01000", "@name": "北海道"}}
        ]},
        "DATA_INF": {"VALUE": {"@area": "01000", "@unit": "人", "$": "42"}}
    }));
    let mut store = ViewStore::new();

    let first = present(&population, store.view(0)).unwrap();
    let ChartOutcome::Table(df) = first.outcome else {
        panic!("expected table");
    };
    assert_eq!(df.height(), 3);

    let second = present(&income, store.view(0)).unwrap();
    let ChartOutcome::Table(df) = second.outcome else {
        panic!("expected table");
    };
    assert_eq!(df.height(), 1);
    assert_eq!(
        column_texts(&df, VALUE_COLUMN).unwrap(),
        vec![Some("42".to_string())]
    );
}
