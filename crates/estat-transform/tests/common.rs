//! Shared fixtures for transform integration tests.

#![allow(dead_code)]

use estat_model::StatisticalData;
use estat_transform::{NormalizedTable, normalize};
use serde_json::{Value, json};

pub fn statistical_data(value: Value) -> StatisticalData {
    serde_json::from_value(value).expect("statistical data fixture")
}

pub fn normalized(value: Value) -> NormalizedTable {
    normalize(&statistical_data(value)).expect("normalize fixture")
}

/// Two regions over two years, with mixed units.
pub fn population_table() -> NormalizedTable {
    normalized(json!({
        "CLASS_INF": {"CLASS_OBJ": [
            {"@id": "cat01", "@name": "男女別", "CLASS": [
                {"@code": "1", "@name": "男"},
                {"@code": "2", "@name": "女"}
            ]},
            {"@id": "area", "@name": "地域", "CLASS": [
                {"@code": "13000", "@name": "東京都"},
                {"@code": "27000", "@name": "大阪府"}
            ]},
            {"@id": "time", "@name": "時間軸", "CLASS": [
                {"@code": "2020000000", "@name": "2020年"},
                {"@code": "2021000000", "@name": "2021年"}
            ]}
        ]},
        "DATA_INF": {"VALUE": [
            {"@cat01": "1", "@area": "13000", "@time": "2020000000", "@unit": "人", "$": "100"},
            {"@cat01": "2", "@area": "13000", "@time": "2020000000", "@unit": "人", "$": "120"},
            {"@cat01": "1", "@area": "27000", "@time": "2021000000", "@unit": "人", "$": "80"},
            {"@cat01": "2", "@area": "27000", "@time": "2021000000", "@unit": "円", "$": "5000"}
        ]}
    }))
}
