//! Shared utilities for the e-Stat viewer crates.
//!
//! This crate provides Polars helpers used across the workspace: reading
//! cells as text, building string columns and lenient numeric coercion.

pub mod polars;

pub use polars::{
    any_to_string, cell_text, coerce_f64, column_texts, format_numeric, parse_f64, string_column,
};
