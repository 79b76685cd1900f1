//! Metadata resolution: class definitions to code labels and column names.

use std::collections::{BTreeMap, HashMap};

use tracing::warn;

use estat_model::columns::{RAW_UNIT_KEY, RAW_VALUE_KEY, axis_key};
use estat_model::{ClassDefinition, UNIT_COLUMN, VALUE_COLUMN};

/// Code dictionaries and the raw-key to column-name map of one response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedMetadata {
    /// Axis id -> (code -> label).
    code_labels: BTreeMap<String, HashMap<String, String>>,
    /// Raw record key -> column name, in resolution order.
    renames: Vec<(String, String)>,
}

impl ResolvedMetadata {
    /// Code -> label dictionary of an axis.
    pub fn labels_for(&self, axis_id: &str) -> Option<&HashMap<String, String>> {
        self.code_labels.get(axis_id)
    }

    /// Label for a code; unknown codes pass through unchanged.
    pub fn resolve_code<'a>(&'a self, axis_id: &str, code: &'a str) -> &'a str {
        self.labels_for(axis_id)
            .and_then(|labels| labels.get(code))
            .map_or(code, String::as_str)
    }

    /// Column name for a raw record key, if it is renamed.
    pub fn renamed(&self, raw_key: &str) -> Option<&str> {
        self.renames
            .iter()
            .find(|(raw, _)| raw == raw_key)
            .map(|(_, name)| name.as_str())
    }

    /// Column name of an axis (`cat01` -> its `@name`).
    pub fn axis_column(&self, axis_id: &str) -> Option<&str> {
        self.renamed(&axis_key(axis_id))
    }

    /// The ordered rename map.
    pub fn rename_map(&self) -> &[(String, String)] {
        &self.renames
    }

    fn set_rename(&mut self, raw_key: String, name: String) {
        match self.renames.iter_mut().find(|(raw, _)| *raw == raw_key) {
            Some(entry) => entry.1 = name,
            None => self.renames.push((raw_key, name)),
        }
    }
}

/// Build code dictionaries and the rename map from class definitions.
///
/// The fixed entries `$` -> `値` and `@unit` -> `単位` always win; an axis
/// whose id would rename either of them is ignored for renaming.
pub fn resolve_metadata(definitions: &[ClassDefinition]) -> ResolvedMetadata {
    let mut resolved = ResolvedMetadata::default();
    resolved.set_rename(RAW_VALUE_KEY.to_string(), VALUE_COLUMN.to_string());
    resolved.set_rename(RAW_UNIT_KEY.to_string(), UNIT_COLUMN.to_string());

    for definition in definitions {
        let labels = resolved
            .code_labels
            .entry(definition.id.clone())
            .or_default();
        for entry in &definition.entries {
            labels.insert(entry.code.clone(), entry.name.clone());
        }

        let key = definition.value_key();
        if key == RAW_VALUE_KEY || key == RAW_UNIT_KEY {
            warn!(axis = %definition.id, "axis id collides with a fixed column; keeping fixed name");
            continue;
        }
        resolved.set_rename(key, definition.name.clone());
    }
    resolved
}
