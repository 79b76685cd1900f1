//! Wire model of the e-Stat `getStatsData` response.
//!
//! The API serializes a collection with exactly one member as a bare object
//! instead of a one-element array. Every such field is normalized into a
//! `Vec` while deserializing, so nothing downstream has to care about the
//! difference.

use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::columns::axis_key;

/// Top-level envelope returned by `getStatsData`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsResponse {
    #[serde(rename = "GET_STATS_DATA")]
    pub get_stats_data: GetStatsData,
}

impl StatsResponse {
    /// Convert a parsed body. Missing `@id`/`@name`/`@code` fields fail here.
    pub fn from_value(value: Value) -> crate::Result<Self> {
        Ok(serde_json::from_value(value)?)
    }

    pub fn result(&self) -> &ApiResult {
        &self.get_stats_data.result
    }

    pub fn statistical_data(&self) -> Option<&StatisticalData> {
        self.get_stats_data.statistical_data.as_ref()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetStatsData {
    #[serde(rename = "RESULT")]
    pub result: ApiResult,
    /// Absent when the API reports a failure status.
    #[serde(rename = "STATISTICAL_DATA", default)]
    pub statistical_data: Option<StatisticalData>,
}

/// Outcome reported by the API itself (HTTP 200 is returned even on failure).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResult {
    #[serde(rename = "STATUS")]
    pub status: i64,
    #[serde(rename = "ERROR_MSG", default)]
    pub error_message: Option<String>,
    #[serde(rename = "DATE", default)]
    pub date: Option<String>,
}

impl ApiResult {
    pub fn is_success(&self) -> bool {
        self.status == 0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatisticalData {
    #[serde(rename = "RESULT_INF", default)]
    pub result_inf: Option<ResultInf>,
    #[serde(rename = "TABLE_INF", default)]
    pub table_inf: Option<TableInf>,
    #[serde(rename = "CLASS_INF")]
    pub class_inf: ClassInf,
    #[serde(rename = "DATA_INF")]
    pub data_inf: DataInf,
}

impl StatisticalData {
    /// Total number of matching rows before the request limit was applied.
    pub fn total_count(&self) -> Option<u64> {
        self.result_inf.as_ref().map(|inf| inf.total_number)
    }

    pub fn class_definitions(&self) -> &[ClassDefinition] {
        &self.class_inf.class_obj
    }

    pub fn values(&self) -> &[ValueRecord] {
        &self.data_inf.value
    }

    pub fn title(&self) -> Option<String> {
        self.table_inf.as_ref().and_then(TableInf::title_text)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultInf {
    #[serde(rename = "TOTAL_NUMBER")]
    pub total_number: u64,
    #[serde(rename = "FROM_NUMBER", default)]
    pub from_number: Option<u64>,
    #[serde(rename = "TO_NUMBER", default)]
    pub to_number: Option<u64>,
}

/// Descriptive table metadata. Only the parts used for display are typed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableInf {
    #[serde(rename = "@id", default)]
    pub id: Option<String>,
    #[serde(rename = "STAT_NAME", default)]
    pub stat_name: Option<Value>,
    #[serde(rename = "STATISTICS_NAME", default)]
    pub statistics_name: Option<String>,
    #[serde(rename = "TITLE", default)]
    pub title: Option<Value>,
}

impl TableInf {
    /// Table title; the API sends either a plain string or `{"@no": .., "$": ..}`.
    pub fn title_text(&self) -> Option<String> {
        match self.title.as_ref()? {
            Value::String(text) => Some(text.clone()),
            Value::Object(map) => map.get("$").and_then(Value::as_str).map(str::to_string),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassInf {
    #[serde(rename = "CLASS_OBJ", deserialize_with = "one_or_many")]
    pub class_obj: Vec<ClassDefinition>,
}

/// One categorical axis of the table (region, period, category, ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassDefinition {
    #[serde(rename = "@id")]
    pub id: String,
    #[serde(rename = "@name")]
    pub name: String,
    #[serde(rename = "CLASS", deserialize_with = "one_or_many")]
    pub entries: Vec<ClassEntry>,
}

impl ClassDefinition {
    /// Key under which value records carry this axis' code.
    pub fn value_key(&self) -> String {
        axis_key(&self.id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassEntry {
    #[serde(rename = "@code")]
    pub code: String,
    #[serde(rename = "@name")]
    pub name: String,
    #[serde(rename = "@level", default)]
    pub level: Option<String>,
    #[serde(rename = "@unit", default)]
    pub unit: Option<String>,
    #[serde(rename = "@parentCode", default)]
    pub parent_code: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataInf {
    #[serde(rename = "VALUE", default, deserialize_with = "one_or_many")]
    pub value: Vec<ValueRecord>,
}

/// One observation: `@<axis>` codes, `$` value, optional `@unit`, in wire order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValueRecord(pub Map<String, Value>);

impl ValueRecord {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Cell text for a field. Strings are kept verbatim, other scalars use
    /// their JSON text, `null` and missing fields are `None`.
    pub fn text(&self, key: &str) -> Option<String> {
        match self.0.get(key)? {
            Value::Null => None,
            Value::String(text) => Some(text.clone()),
            other => Some(other.to_string()),
        }
    }
}

/// Deserialize a field that is either `T` or `[T]` into `Vec<T>`.
fn one_or_many<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .map(|item| serde_json::from_value(item).map_err(D::Error::custom))
            .collect(),
        Value::Null => Ok(Vec::new()),
        single => serde_json::from_value(single)
            .map(|item| vec![item])
            .map_err(D::Error::custom),
    }
}
