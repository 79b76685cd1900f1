//! CLI argument definitions for the e-Stat viewer.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use tracing::level_filters::LevelFilter;

use estat_cli::args::FilterArg;
use estat_cli::logging::LogFormat;
use estat_model::{DEFAULT_PREVIEW_ROWS, DEFAULT_ROW_LIMIT};
use estat_transform::DisplayType;

#[derive(Parser)]
#[command(
    name = "estat-viewer",
    version,
    about = "Inspect and chart e-Stat getStatsData responses",
    long_about = "Inspect and chart e-Stat getStatsData responses.\n\n\
                  Reads a saved JSON response, resolves axis codes to labels and\n\
                  shows one unit of measurement at a time as a table or chart data."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Check a response and print its column roles and units.
    Inspect(InspectArgs),

    /// Display one unit of a response as a table or chart data.
    Show(ShowArgs),

    /// Print the statsDataId embedded in an e-Stat table URL.
    ExtractId(ExtractIdArgs),
}

#[derive(Parser)]
pub struct InspectArgs {
    /// Saved getStatsData JSON response.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Reject responses reporting more rows than this.
    #[arg(long = "row-limit", value_name = "N", default_value_t = DEFAULT_ROW_LIMIT)]
    pub row_limit: u64,
}

#[derive(Parser)]
pub struct ShowArgs {
    /// Saved getStatsData JSON responses, each shown as its own table.
    #[arg(value_name = "FILE", required = true)]
    pub files: Vec<PathBuf>,

    /// Display type: table, line, scatter or bar (Japanese labels also accepted).
    #[arg(long = "display", value_name = "TYPE", default_value = "table")]
    pub display: DisplayType,

    /// Unit to display (default: first unit in the response).
    #[arg(long = "unit", value_name = "UNIT")]
    pub unit: Option<String>,

    /// X-axis column (default: first candidate for the display type).
    #[arg(long = "x", value_name = "COLUMN")]
    pub x: Option<String>,

    /// Color grouping column (default: first category column).
    #[arg(long = "color", value_name = "COLUMN")]
    pub color: Option<String>,

    /// Keep rows whose COLUMN is one of the listed values. Repeatable.
    #[arg(long = "filter", value_name = "COLUMN=V1,V2")]
    pub filters: Vec<FilterArg>,

    /// Number of rows to print for tables and series.
    #[arg(long = "rows", value_name = "N", default_value_t = DEFAULT_PREVIEW_ROWS)]
    pub rows: usize,

    /// Print JSON instead of tables.
    #[arg(long = "json")]
    pub json: bool,

    /// Export the filtered rows of the last table to a CSV file.
    #[arg(long = "csv", value_name = "PATH")]
    pub csv: Option<PathBuf>,

    /// Reject responses reporting more rows than this.
    #[arg(long = "row-limit", value_name = "N", default_value_t = DEFAULT_ROW_LIMIT)]
    pub row_limit: u64,

    /// Show only the last file; earlier tables are dropped.
    #[arg(long = "latest-only")]
    pub latest_only: bool,
}

#[derive(Parser)]
pub struct ExtractIdArgs {
    /// e-Stat table page URL containing `statdisp_id=`.
    #[arg(value_name = "URL")]
    pub url: String,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

impl From<LogLevelArg> for LevelFilter {
    fn from(level: LogLevelArg) -> Self {
        match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        }
    }
}

impl From<LogFormatArg> for LogFormat {
    fn from(format: LogFormatArg) -> Self {
        match format {
            LogFormatArg::Pretty => LogFormat::Pretty,
            LogFormatArg::Compact => LogFormat::Compact,
            LogFormatArg::Json => LogFormat::Json,
        }
    }
}
