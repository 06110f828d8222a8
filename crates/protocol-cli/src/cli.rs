//! CLI argument definitions for the legacy protocol ingester.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use protocol_dbf::{DEFAULT_HEADER_LEN, DEFAULT_RECORD_LEN};
use protocol_store::DEFAULT_BATCH_SIZE;

#[derive(Parser)]
#[command(
    name = "protocol-ingest",
    version,
    about = "Ingest legacy protocol data into the dashboard store",
    long_about = "Decode the legacy fixed-width item table, parse free-text medication\n\
                  notes, resolve drug names against the catalog, and write the results\n\
                  to the relational store."
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

    /// Allow verbatim clinical text in trace-level logs.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Decode a legacy item table and emit or apply the upsert script.
    Decode(DecodeArgs),

    /// Parse visit medication notes, resolve them and re-derive stored lines.
    Medications(MedicationArgs),

    /// Re-resolve every stored medication line against the current catalog.
    Resolve(ResolveArgs),

    /// Show how a single drug name resolves.
    Lookup(LookupArgs),

    /// Seed the drug catalog from a sheet.
    SeedCatalog(SeedArgs),
}

#[derive(Args)]
pub struct StoreArgs {
    /// Path to the SQLite store (created when missing).
    #[arg(long = "db", value_name = "PATH")]
    pub db: PathBuf,
}

#[derive(Args)]
pub struct TieArgs {
    /// Break resolution ties by lowest drug id instead of catalog storage order.
    #[arg(long = "deterministic-ties")]
    pub deterministic_ties: bool,
}

#[derive(Parser)]
pub struct DecodeArgs {
    /// Legacy table file.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Header length in bytes.
    #[arg(long = "header-len", default_value_t = DEFAULT_HEADER_LEN)]
    pub header_len: usize,

    /// Record length in bytes, deletion marker included.
    #[arg(long = "record-len", default_value_t = DEFAULT_RECORD_LEN)]
    pub record_len: usize,

    /// Write the upsert script to this file.
    #[arg(long = "script", value_name = "OUT")]
    pub script: Option<PathBuf>,

    /// Rows per INSERT statement.
    #[arg(long = "batch-size", default_value_t = DEFAULT_BATCH_SIZE)]
    pub batch_size: usize,

    /// Apply the script to this SQLite store.
    #[arg(long = "db", value_name = "PATH")]
    pub db: Option<PathBuf>,
}

#[derive(Parser)]
pub struct MedicationArgs {
    /// Visit sheet exported as CSV.
    #[arg(value_name = "SHEET")]
    pub sheet: PathBuf,

    #[command(flatten)]
    pub store: StoreArgs,

    /// Column holding the visit id.
    #[arg(long = "visit-column", default_value = "visit_id")]
    pub visit_column: String,

    /// Column holding the visit date.
    #[arg(long = "date-column", default_value = "visit_date")]
    pub date_column: String,

    /// Column holding the free-text medication notes.
    #[arg(long = "text-column", default_value = "medications")]
    pub text_column: String,

    /// Write distinct unresolved names to this JSON file.
    #[arg(long = "unresolved-out", value_name = "PATH")]
    pub unresolved_out: Option<PathBuf>,

    #[command(flatten)]
    pub ties: TieArgs,
}

#[derive(Parser)]
pub struct ResolveArgs {
    #[command(flatten)]
    pub store: StoreArgs,

    /// Write distinct unresolved names to this JSON file.
    #[arg(long = "unresolved-out", value_name = "PATH")]
    pub unresolved_out: Option<PathBuf>,

    #[command(flatten)]
    pub ties: TieArgs,
}

#[derive(Parser)]
pub struct LookupArgs {
    /// Drug name as written in the notes.
    #[arg(value_name = "NAME")]
    pub name: String,

    #[command(flatten)]
    pub store: StoreArgs,

    #[command(flatten)]
    pub ties: TieArgs,
}

#[derive(Parser)]
pub struct SeedArgs {
    /// Catalog sheet exported as CSV.
    #[arg(value_name = "SHEET")]
    pub sheet: PathBuf,

    #[command(flatten)]
    pub store: StoreArgs,
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
