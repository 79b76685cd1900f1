//! Rendering tests for the viewer CLI.

use estat_cli::render::{presentation_json, records_json, render_text, write_csv};
use estat_model::StatisticalData;
use estat_transform::{AxisSelection, DisplayType, NormalizedTable, ViewStore, normalize, present};
use serde_json::json;

fn table() -> NormalizedTable {
    let data: StatisticalData = serde_json::from_value(json!({
        "CLASS_INF": {"CLASS_OBJ": [
            {"@id": "cat01", "@name": "品目", "CLASS": [
                {"@code": "a", "@name": "米"},
                {"@code": "b", "@name": "麦"}
            ]},
            {"@id": "area", "@name": "地域", "CLASS": [
                {"@code": "01", "@name": "北海道"},
                {"@code": "13", "@name": "東京都"}
            ]}
        ]},
        "DATA_INF": {"VALUE": [
            {"@cat01": "a", "@area": "01", "@unit": "t", "$": "1200"},
            {"@cat01": "b", "@area": "01", "@unit": "t", "$": "300"},
            {"@cat01": "a", "@area": "13", "@unit": "t", "$": "-"}
        ]}
    }))
    .unwrap();
    normalize(&data).unwrap()
}

#[test]
fn bar_presentation_json() {
    let table = table();
    let mut store = ViewStore::new();
    let view = store.view(0);
    view.display_type = DisplayType::Bar;
    view.axes = AxisSelection::new(Some("地域".into()), Some("品目".into()));
    let presentation = present(&table, view).unwrap();

    let value = presentation_json(&presentation).unwrap();
    assert_eq!(value["unit"], "t");
    assert_eq!(value["outcome"]["display"], "bar");
    insta::assert_json_snapshot!(value["outcome"]["totals"], @r###"
    [
      {
        "category": "北海道",
        "total": 1500.0,
        "label": "1.5K"
      },
      {
        "category": "東京都",
        "total": 0.0,
        "label": "0.0K"
      }
    ]
    "###);
}

#[test]
fn same_axis_renders_warning_text() {
    let table = table();
    let mut store = ViewStore::new();
    let view = store.view(0);
    view.display_type = DisplayType::Bar;
    view.axes = AxisSelection::new(Some("品目".into()), Some("品目".into()));
    let presentation = present(&table, view).unwrap();

    let text = render_text(&presentation, 20).unwrap();
    assert!(text.contains("x軸と色分けのカテゴリは異なる値を選択してください"));
}

#[test]
fn table_text_reports_truncation() {
    let table = table();
    let mut store = ViewStore::new();
    let presentation = present(&table, store.view(0)).unwrap();
    let text = render_text(&presentation, 2).unwrap();
    assert!(text.contains("北海道"));
    assert!(text.contains("2 / 3"));
}

#[test]
fn records_keep_column_order() {
    let table = table();
    let records = records_json(table.data()).unwrap();
    assert_eq!(records.len(), 3);
    let keys: Vec<&str> = records[0].keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["品目", "地域", "単位", "値"]);
    assert_eq!(records[2]["値"], "-");
}

#[test]
fn csv_export_writes_header_and_rows() {
    let table = table();
    let mut buffer = Vec::new();
    write_csv(table.data(), &mut buffer).unwrap();
    let text = String::from_utf8(buffer).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "品目,地域,単位,値");
    assert_eq!(lines[1], "米,北海道,t,1200");
    assert_eq!(lines.len(), 4);
}

#[test]
fn csv_export_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.csv");
    let file = std::fs::File::create(&path).unwrap();
    write_csv(table().data(), file).unwrap();
    let written = std::fs::read_to_string(&path).unwrap();
    assert!(written.starts_with("品目,地域,単位,値\n"));
}
