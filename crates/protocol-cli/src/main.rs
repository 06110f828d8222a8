//! Legacy protocol ingestion CLI.

use std::io::{self, IsTerminal};

use clap::{ColorChoice, Parser};
use protocol_cli::logging::{LogConfig, LogFormat, init_logging};
use tracing::level_filters::LevelFilter;

mod cli;
mod commands;
mod summary;
mod types;

use crate::cli::{Cli, Command, LogFormatArg, LogLevelArg};
use crate::commands::{run_decode, run_lookup, run_medications, run_resolve, run_seed_catalog};
use crate::summary::{
    print_decode_summary, print_lookup, print_medication_summary, print_resolve_summary,
    print_seed_summary,
};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let outcome = match &cli.command {
        Command::Decode(args) => run_decode(args).map(|result| {
            print_decode_summary(&result);
            result.has_failures()
        }),
        Command::Medications(args) => run_medications(args).map(|result| {
            print_medication_summary(&result);
            result.has_failures()
        }),
        Command::Resolve(args) => run_resolve(args).map(|result| {
            print_resolve_summary(&result);
            !result.report.failures.is_empty()
        }),
        Command::Lookup(args) => run_lookup(args).map(|result| {
            print_lookup(&result);
            false
        }),
        Command::SeedCatalog(args) => run_seed_catalog(args).map(|result| {
            print_seed_summary(&result);
            false
        }),
    };
    let exit_code = match outcome {
        Ok(false) => 0,
        Ok(true) => 1,
        Err(error) => {
            eprintln!("error: {error:#}");
            1
        }
    };
    std::process::exit(exit_code);
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        use_env_filter: !(cli.verbosity.is_present() || cli.log_level.is_some()),
        log_data: cli.log_data,
        ..LogConfig::default()
    };
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.log_file = cli.log_file.clone();
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
