//! e-Stat statistics viewer CLI.

use clap::{ColorChoice, Parser};
use estat_cli::logging::{LogConfig, LogFlags, init_logging};
use std::io::{self, IsTerminal};
use tracing::level_filters::LevelFilter;

mod cli;
mod commands;

use crate::cli::{Cli, Command};
use crate::commands::{run_extract_id, run_inspect, run_show};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let exit_code = match &cli.command {
        Command::Inspect(args) => exit_code_of(run_inspect(args)),
        Command::Show(args) => match run_show(args) {
            Ok(code) => code,
            Err(error) => {
                eprintln!("error: {error:#}");
                1
            }
        },
        Command::ExtractId(args) => exit_code_of(run_extract_id(args)),
    };
    std::process::exit(exit_code);
}

fn exit_code_of(result: anyhow::Result<()>) -> i32 {
    match result {
        Ok(()) => 0,
        Err(error) => {
            eprintln!("error: {error:#}");
            1
        }
    }
}

fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let flags = LogFlags {
        verbosity: cli.verbosity.tracing_level_filter(),
        verbosity_given: cli.verbosity.is_present(),
        log_level: cli.log_level.map(LevelFilter::from),
        format: cli.log_format.into(),
        log_file: cli.log_file.clone(),
        color: match cli.color.color {
            ColorChoice::Always => Some(true),
            ColorChoice::Never => Some(false),
            ColorChoice::Auto => None,
        },
    };
    LogConfig::from_cli_flags(flags, io::stderr().is_terminal())
}
