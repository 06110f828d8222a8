//! Logging setup on top of `tracing-subscriber`.
//!
//! Library crates only emit events; this module decides where they go.
//!
//! # Log Levels
//!
//! - `error`: failed statements, unreadable inputs
//! - `warn`: skipped rows, duplicates, encoding placeholders (default)
//! - `info`: stage progress and summary counts
//! - `debug`: per-visit and per-batch detail
//! - `trace`: verbatim note text, redacted unless `--log-data` is given

use std::fs::OpenOptions;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    EnvFilter, Layer, Registry,
    fmt::{self, MakeWriter, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

static LOG_DATA_ENABLED: AtomicBool = AtomicBool::new(false);

/// Placeholder used when verbatim text logging is disabled.
pub const REDACTED_VALUE: &str = "[REDACTED]";

/// Crates whose events follow the configured level; everything else stays at warn.
const OWN_CRATES: [&str; 6] = [
    "protocol_cli",
    "protocol_dbf",
    "protocol_ingest",
    "protocol_model",
    "protocol_resolve",
    "protocol_store",
];

pub fn log_data_enabled() -> bool {
    LOG_DATA_ENABLED.load(Ordering::Relaxed)
}

/// Returns the input when clinical text logging is enabled, otherwise a redacted token.
pub fn redact_value(value: &str) -> &str {
    if log_data_enabled() {
        value
    } else {
        REDACTED_VALUE
    }
}

#[derive(Debug, Clone)]
pub struct LogConfig {
    pub level_filter: LevelFilter,
    /// Let `RUST_LOG` replace the level when set.
    pub use_env_filter: bool,
    pub with_timestamps: bool,
    pub with_target: bool,
    /// Emit span close events (json only).
    pub with_spans: bool,
    pub with_ansi: bool,
    pub format: LogFormat,
    /// Write to this file instead of stderr.
    pub log_file: Option<PathBuf>,
    pub log_data: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Pretty,
    Compact,
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
            log_data: false,
        }
    }
}

/// Install the global subscriber. Call once at startup.
///
/// # Errors
///
/// Returns an error if the log file cannot be opened.
pub fn init_logging(config: &LogConfig) -> io::Result<()> {
    LOG_DATA_ENABLED.store(config.log_data, Ordering::Release);
    let layer = match &config.log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            output_layer(config, Mutex::new(file))
        }
        None => output_layer(config, io::stderr),
    };
    tracing_subscriber::registry()
        .with(layer)
        .with(build_env_filter(config))
        .init();
    Ok(())
}

type OutputLayer = Box<dyn Layer<Registry> + Send + Sync + 'static>;

fn output_layer<W>(config: &LogConfig, writer: W) -> OutputLayer
where
    W: for<'writer> MakeWriter<'writer> + Send + Sync + 'static,
{
    let base = fmt::layer()
        .with_writer(writer)
        .with_target(config.with_target);
    match config.format {
        LogFormat::Json => {
            let spans = if config.with_spans {
                FmtSpan::CLOSE
            } else {
                FmtSpan::NONE
            };
            base.json().with_span_events(spans).boxed()
        }
        LogFormat::Compact if config.with_timestamps => {
            base.compact().with_ansi(config.with_ansi).boxed()
        }
        LogFormat::Compact => base
            .compact()
            .with_ansi(config.with_ansi)
            .without_time()
            .boxed(),
        LogFormat::Pretty if config.with_timestamps => base.with_ansi(config.with_ansi).boxed(),
        LogFormat::Pretty => base.with_ansi(config.with_ansi).without_time().boxed(),
    }
}

/// Default directives: our crates at `level`, dependencies at warn.
pub fn default_directives(level: LevelFilter) -> String {
    let level = level.to_string().to_lowercase();
    let mut directives = String::from("warn");
    for name in OWN_CRATES {
        directives.push_str(&format!(",{name}={level}"));
    }
    directives
}

fn build_env_filter(config: &LogConfig) -> EnvFilter {
    let fallback = || EnvFilter::new(default_directives(config.level_filter));
    if config.use_env_filter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| fallback())
    } else {
        fallback()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directives_cover_own_crates() {
        let directives = default_directives(LevelFilter::DEBUG);
        assert!(directives.starts_with("warn,"));
        assert!(directives.contains("protocol_store=debug"));
        assert!(directives.contains("protocol_cli=debug"));
    }

    #[test]
    fn test_redacts_by_default() {
        assert_eq!(redact_value("PARACETAMOL 500"), REDACTED_VALUE);
    }

    #[test]
    fn test_every_format_builds_a_layer() {
        for format in [LogFormat::Pretty, LogFormat::Compact, LogFormat::Json] {
            for with_timestamps in [false, true] {
                let config = LogConfig {
                    format,
                    with_timestamps,
                    ..LogConfig::default()
                };
                let _layer = output_layer(&config, io::sink);
            }
        }
    }
}
