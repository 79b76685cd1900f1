//! Parsing of `--filter COLUMN=V1,V2` arguments.

use std::str::FromStr;

use thiserror::Error;

use estat_transform::FilterState;

/// One `--filter` occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterArg {
    pub column: String,
    pub values: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterArgError {
    #[error("expected COLUMN=VALUE[,VALUE...], got '{0}'")]
    MissingSeparator(String),
    #[error("filter column name is empty in '{0}'")]
    EmptyColumn(String),
}

impl FromStr for FilterArg {
    type Err = FilterArgError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (column, values) = s
            .split_once('=')
            .ok_or_else(|| FilterArgError::MissingSeparator(s.to_string()))?;
        let column = column.trim();
        if column.is_empty() {
            return Err(FilterArgError::EmptyColumn(s.to_string()));
        }
        let values = values
            .split(',')
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
            .collect();
        Ok(Self {
            column: column.to_string(),
            values,
        })
    }
}

/// Build a filter state; repeated columns accumulate their values.
pub fn filter_state(args: &[FilterArg]) -> FilterState {
    let mut state = FilterState::new();
    for arg in args {
        let mut values: Vec<String> = state
            .allowed_values(&arg.column)
            .map(|existing| existing.iter().cloned().collect())
            .unwrap_or_default();
        values.extend(arg.values.iter().cloned());
        state.set_values(&arg.column, values);
    }
    state
}
