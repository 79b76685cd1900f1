//! Logging infrastructure using `tracing` and `tracing-subscriber`.
//!
//! # Log Levels
//!
//! - `error`: rendering failures, fatal errors
//! - `warn`: skipped filter columns, rename collisions
//! - `info`: response status and row counts
//! - `debug`: per-stage row and column counts
//! - `trace`: unused for now
//!
//! # Usage
//!
//! ```ignore
//! use estat_cli::logging::{init_logging, LogConfig};
//!
//! let config = LogConfig::default().with_format(LogFormat::Compact);
//! init_logging(&config)?;
//! ```

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, MakeWriter},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

/// Workspace crates that get the configured level by default.
const WORKSPACE_TARGETS: [&str; 5] = [
    "estat_cli",
    "estat_common",
    "estat_ingest",
    "estat_model",
    "estat_transform",
];

/// Configuration for logging behavior.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Level applied to the workspace crates.
    pub level_filter: LevelFilter,
    /// Let `RUST_LOG` replace the default directives.
    pub use_env_filter: bool,
    pub with_timestamps: bool,
    /// Include the module path of each event.
    pub with_target: bool,
    pub with_spans: bool,
    pub with_ansi: bool,
    pub format: LogFormat,
    /// When set, logs are appended to this file instead of stderr.
    pub log_file: Option<PathBuf>,
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable format with colors.
    #[default]
    Pretty,
    /// Single-line format.
    Compact,
    /// JSON lines for machine parsing.
    Json,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level_filter: LevelFilter::WARN,
            use_env_filter: true,
            with_timestamps: false,
            with_target: false,
            with_spans: true,
            with_ansi: true,
            format: LogFormat::default(),
            log_file: None,
        }
    }
}

/// Logging flags as given on the command line.
#[derive(Debug, Clone)]
pub struct LogFlags {
    /// Level from `-v`/`-q`.
    pub verbosity: LevelFilter,
    /// Whether `-v` or `-q` was passed at all.
    pub verbosity_given: bool,
    /// Explicit `--log-level`; wins over `-v`/`-q`.
    pub log_level: Option<LevelFilter>,
    pub format: LogFormat,
    pub log_file: Option<PathBuf>,
    /// Forced color on or off; `None` means detect.
    pub color: Option<bool>,
}

impl Default for LogFlags {
    fn default() -> Self {
        Self {
            verbosity: LevelFilter::WARN,
            verbosity_given: false,
            log_level: None,
            format: LogFormat::default(),
            log_file: None,
            color: None,
        }
    }
}

impl LogConfig {
    /// Apply flag precedence: `--log-level` over `-v`/`-q` over `RUST_LOG`.
    ///
    /// `RUST_LOG` is only honored when no level flag was given. Detected color
    /// is off when logging to a file or when stderr is not a terminal.
    pub fn from_cli_flags(flags: LogFlags, stderr_is_terminal: bool) -> Self {
        let use_env_filter = !(flags.verbosity_given || flags.log_level.is_some());
        let with_ansi = flags
            .color
            .unwrap_or(flags.log_file.is_none() && stderr_is_terminal);
        Self {
            level_filter: flags.log_level.unwrap_or(flags.verbosity),
            use_env_filter,
            with_ansi,
            format: flags.format,
            log_file: flags.log_file,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_level(mut self, level_filter: LevelFilter) -> Self {
        self.level_filter = level_filter;
        self
    }

    #[must_use]
    pub fn with_timestamps(mut self, enable: bool) -> Self {
        self.with_timestamps = enable;
        self
    }

    #[must_use]
    pub fn with_target(mut self, enable: bool) -> Self {
        self.with_target = enable;
        self
    }

    #[must_use]
    pub fn with_ansi(mut self, enable: bool) -> Self {
        self.with_ansi = enable;
        self
    }

    #[must_use]
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Set the log file path (writes to stderr when None).
    #[must_use]
    pub fn with_log_file(mut self, path: Option<PathBuf>) -> Self {
        self.log_file = path;
        self
    }
}

/// Initialize the global tracing subscriber. Call once at startup.
///
/// # Errors
///
/// Returns an error if the log file cannot be opened.
pub fn init_logging(config: &LogConfig) -> io::Result<()> {
    if let Some(path) = &config.log_file {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        init_logging_with_writer(config, SharedFileWriter::new(file));
    } else {
        init_logging_with_writer(config, io::stderr);
    }
    Ok(())
}

/// Initialize logging with a custom writer.
pub fn init_logging_with_writer<W>(config: &LogConfig, writer: W)
where
    W: for<'writer> MakeWriter<'writer> + Send + Sync + 'static,
{
    let filter = build_env_filter(config);

    match config.format {
        LogFormat::Json => {
            let layer = fmt::layer()
                .json()
                .with_writer(writer)
                .with_target(config.with_target)
                .with_span_events(if config.with_spans {
                    fmt::format::FmtSpan::CLOSE
                } else {
                    fmt::format::FmtSpan::NONE
                });

            tracing_subscriber::registry()
                .with(filter)
                .with(layer)
                .init();
        }
        LogFormat::Compact => {
            let layer = fmt::layer()
                .compact()
                .with_writer(writer)
                .with_ansi(config.with_ansi)
                .with_target(config.with_target);

            if config.with_timestamps {
                tracing_subscriber::registry()
                    .with(filter)
                    .with(layer)
                    .init();
            } else {
                tracing_subscriber::registry()
                    .with(filter)
                    .with(layer.without_time())
                    .init();
            }
        }
        LogFormat::Pretty => {
            let layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(config.with_ansi)
                .with_target(config.with_target);

            if config.with_timestamps {
                tracing_subscriber::registry()
                    .with(filter)
                    .with(layer)
                    .init();
            } else {
                tracing_subscriber::registry()
                    .with(filter)
                    .with(layer.without_time())
                    .init();
            }
        }
    }
}

#[derive(Clone)]
struct SharedFileWriter {
    file: Arc<Mutex<std::fs::File>>,
}

impl SharedFileWriter {
    fn new(file: std::fs::File) -> Self {
        Self {
            file: Arc::new(Mutex::new(file)),
        }
    }
}

struct SharedFileGuard {
    file: Arc<Mutex<std::fs::File>>,
}

impl Write for SharedFileGuard {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut guard = self
            .file
            .lock()
            .map_err(|_| io::Error::other("log file lock poisoned"))?;
        guard.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut guard = self
            .file
            .lock()
            .map_err(|_| io::Error::other("log file lock poisoned"))?;
        guard.flush()
    }
}

impl<'a> MakeWriter<'a> for SharedFileWriter {
    type Writer = SharedFileGuard;

    fn make_writer(&'a self) -> Self::Writer {
        SharedFileGuard {
            file: Arc::clone(&self.file),
        }
    }
}

/// Default directives: dependencies at `warn`, workspace crates at the
/// configured level.
pub fn default_directives(level_filter: LevelFilter) -> String {
    let level = level_filter.to_string().to_lowercase();
    let mut directives = vec!["warn".to_string()];
    directives.extend(
        WORKSPACE_TARGETS
            .iter()
            .map(|target| format!("{target}={level}")),
    );
    directives.join(",")
}

fn build_env_filter(config: &LogConfig) -> EnvFilter {
    let defaults = || EnvFilter::new(default_directives(config.level_filter));
    if config.use_env_filter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| defaults())
    } else {
        defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directives_cover_workspace_crates() {
        let directives = default_directives(LevelFilter::DEBUG);
        assert!(directives.starts_with("warn,"));
        assert!(directives.contains("estat_transform=debug"));
        assert!(directives.contains("estat_ingest=debug"));
    }

    #[test]
    fn off_level_is_a_valid_directive() {
        let directives = default_directives(LevelFilter::OFF);
        assert!(directives.contains("estat_cli=off"));
        assert!(EnvFilter::try_new(directives).is_ok());
    }

    #[test]
    fn explicit_level_wins_and_disables_env_filter() {
        let config = LogConfig::from_cli_flags(
            LogFlags {
                verbosity: LevelFilter::INFO,
                verbosity_given: true,
                log_level: Some(LevelFilter::TRACE),
                ..LogFlags::default()
            },
            true,
        );
        assert_eq!(config.level_filter, LevelFilter::TRACE);
        assert!(!config.use_env_filter);
    }

    #[test]
    fn without_level_flags_rust_log_is_honored() {
        let config = LogConfig::from_cli_flags(
            LogFlags {
                verbosity: LevelFilter::WARN,
                ..LogFlags::default()
            },
            true,
        );
        assert_eq!(config.level_filter, LevelFilter::WARN);
        assert!(config.use_env_filter);
        assert!(config.with_ansi);
    }

    #[test]
    fn detected_color_is_off_for_files_and_pipes() {
        let to_file = LogFlags {
            log_file: Some(PathBuf::from("viewer.log")),
            ..LogFlags::default()
        };
        assert!(!LogConfig::from_cli_flags(to_file.clone(), true).with_ansi);
        assert!(!LogConfig::from_cli_flags(LogFlags::default(), false).with_ansi);

        let forced = LogFlags {
            color: Some(true),
            ..to_file
        };
        assert!(LogConfig::from_cli_flags(forced, false).with_ansi);
    }
}
