//! Upsert script generation for the legacy item catalog.
//!
//! Each batch is one multi-row `INSERT` keyed by `(category_code,
//! item_code)` that skips rows already present, so applying a script any
//! number of times leaves the same rows.

use std::io::Write;

use protocol_model::LegacyRecord;
use tracing::{error, info, info_span};

use crate::error::{Result, check_identifier};
use crate::rederive::StatementFailure;
use crate::session::StoreSession;

/// Rows per `INSERT` statement.
pub const DEFAULT_BATCH_SIZE: usize = 5000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptOptions {
    /// Target table.
    pub table: String,
    /// Rows per statement; zero is treated as one.
    pub batch_size: usize,
}

impl Default for ScriptOptions {
    fn default() -> Self {
        Self {
            table: "legacy_item".to_string(),
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

impl ScriptOptions {
    #[must_use]
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    #[must_use]
    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScriptSummary {
    pub rows: usize,
    pub batches: usize,
}

/// Quote a string literal, doubling embedded quotes.
fn sql_text(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

fn sql_number(value: Option<f64>) -> String {
    match value {
        Some(value) if value.is_finite() => value.to_string(),
        _ => "NULL".to_string(),
    }
}

fn values_row(record: &LegacyRecord) -> String {
    format!(
        "({}, {}, {}, {}, {})",
        sql_text(&record.category_code),
        record.item_code,
        sql_text(&record.description),
        sql_number(record.rate),
        sql_text(&record.unit)
    )
}

/// One batch as a single statement, without the terminating semicolon.
fn batch_statement(table: &str, batch: &[LegacyRecord]) -> String {
    let rows = batch.iter().map(values_row).collect::<Vec<_>>().join(",\n");
    format!(
        "INSERT INTO {table} (category_code, item_code, description, rate, unit) VALUES\n\
         {rows}\n\
         ON CONFLICT (category_code, item_code) DO NOTHING"
    )
}

/// Write the upsert script for `records`.
pub fn write_upsert_script<W: Write>(
    writer: &mut W,
    records: &[LegacyRecord],
    options: &ScriptOptions,
) -> Result<ScriptSummary> {
    check_identifier(&options.table)?;
    let mut summary = ScriptSummary::default();
    for batch in records.chunks(options.batch_size.max(1)) {
        writeln!(writer, "{};", batch_statement(&options.table, batch))?;
        summary.batches += 1;
        summary.rows += batch.len();
    }
    writer.flush()?;
    info!(
        table = %options.table,
        rows = summary.rows,
        batches = summary.batches,
        "upsert script written"
    );
    Ok(summary)
}

/// Outcome of applying upsert batches to a store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplyReport {
    pub batches: usize,
    /// Rows actually inserted; rows with an existing key are not counted.
    pub inserted: usize,
    /// Batches that failed; `index` is the batch number.
    pub failures: Vec<StatementFailure>,
}

impl ApplyReport {
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// Execute the upsert batches against `session`, one statement per batch.
///
/// A failing batch is recorded and the remaining batches still run.
pub fn apply_upsert_script(
    session: &StoreSession,
    records: &[LegacyRecord],
    options: &ScriptOptions,
) -> Result<ApplyReport> {
    check_identifier(&options.table)?;
    let batch_size = options.batch_size.max(1);
    let span = info_span!("apply_script", table = %options.table, rows = records.len());
    let _guard = span.enter();

    let conn = session.connection();
    let mut report = ApplyReport::default();
    for (index, batch) in records.chunks(batch_size).enumerate() {
        report.batches += 1;
        match conn.execute(&batch_statement(&options.table, batch), []) {
            Ok(inserted) => report.inserted += inserted,
            Err(err) => {
                let first = index * batch_size;
                let row = format!("rows {}..{}", first, first + batch.len());
                error!(index, %row, error = %err, "batch failed");
                report.failures.push(StatementFailure {
                    index,
                    row,
                    message: err.to_string(),
                });
            }
        }
    }
    info!(
        batches = report.batches,
        inserted = report.inserted,
        failures = report.failures.len(),
        "upsert batches applied"
    );
    Ok(report)
}

/// Render the upsert script into a string.
pub fn render_upsert_script(records: &[LegacyRecord], options: &ScriptOptions) -> Result<String> {
    let mut buffer = Vec::new();
    write_upsert_script(&mut buffer, records, options)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}
