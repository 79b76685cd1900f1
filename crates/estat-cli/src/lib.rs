//! CLI library components for the e-Stat viewer.

pub mod args;
pub mod logging;
pub mod render;
