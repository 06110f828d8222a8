//! Direct re-derivation of a relation: delete everything, insert again.
//!
//! Rows are inserted one statement at a time without an enclosing
//! transaction. A run that stops half-way is repaired by running again.

use protocol_model::{LegacyRecord, ResolvedMedication};
use rusqlite::{Statement, params};
use tracing::{error, info, info_span, warn};

use crate::error::{Result, is_duplicate_key};
use crate::session::StoreSession;

/// A relation that is fully recomputed from source rows.
pub trait DerivedRelation {
    /// Table the rows belong to.
    const TABLE: &'static str;
    /// Insert statement with positional parameters.
    const INSERT_SQL: &'static str;

    /// Bind this row to the prepared insert and execute it.
    fn insert(&self, stmt: &mut Statement<'_>) -> rusqlite::Result<usize>;

    /// Short description used in failure reports.
    fn label(&self) -> String;
}

/// A statement that failed for a reason other than a duplicate key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatementFailure {
    /// Position of the row in the input.
    pub index: usize,
    pub row: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RederiveReport {
    pub table: &'static str,
    pub deleted: usize,
    pub inserted: usize,
    pub duplicates: usize,
    pub failures: Vec<StatementFailure>,
}

impl RederiveReport {
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// Replace every row of `R::TABLE` with `rows`.
///
/// Only a failing delete or prepare aborts; insert failures are recorded
/// and the remaining rows are still inserted.
pub fn rederive<R: DerivedRelation>(session: &StoreSession, rows: &[R]) -> Result<RederiveReport> {
    let span = info_span!("rederive", table = R::TABLE, rows = rows.len());
    let _guard = span.enter();

    let conn = session.connection();
    let deleted = conn.execute(&format!("DELETE FROM {}", R::TABLE), [])?;
    let mut stmt = conn.prepare(R::INSERT_SQL)?;
    let mut report = RederiveReport {
        table: R::TABLE,
        deleted,
        ..RederiveReport::default()
    };
    for (index, row) in rows.iter().enumerate() {
        match row.insert(&mut stmt) {
            Ok(_) => report.inserted += 1,
            Err(err) if is_duplicate_key(&err) => {
                report.duplicates += 1;
                warn!(index, row = %row.label(), "duplicate row skipped");
            }
            Err(err) => {
                error!(index, row = %row.label(), error = %err, "insert failed");
                report.failures.push(StatementFailure {
                    index,
                    row: row.label(),
                    message: err.to_string(),
                });
            }
        }
    }
    info!(
        deleted = report.deleted,
        inserted = report.inserted,
        duplicates = report.duplicates,
        failures = report.failures.len(),
        "re-derivation complete"
    );
    Ok(report)
}

impl DerivedRelation for ResolvedMedication {
    const TABLE: &'static str = "raw_medication_line";
    const INSERT_SQL: &'static str = "INSERT INTO raw_medication_line
         (visit_id, verbatim_text, source_code, medication_name, quantity, unit, resolved_drug_id)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)";

    fn insert(&self, stmt: &mut Statement<'_>) -> rusqlite::Result<usize> {
        let fields = &self.line.fields;
        stmt.execute(params![
            self.line.visit_id,
            self.line.verbatim_text,
            fields.source_code,
            fields.medication_name,
            fields.quantity,
            fields.unit,
            self.drug_id(),
        ])
    }

    fn label(&self) -> String {
        format!("visit {}", self.line.visit_id)
    }
}

impl DerivedRelation for LegacyRecord {
    const TABLE: &'static str = "legacy_item";
    const INSERT_SQL: &'static str = "INSERT INTO legacy_item
         (category_code, item_code, description, rate, unit)
         VALUES (?1, ?2, ?3, ?4, ?5)";

    fn insert(&self, stmt: &mut Statement<'_>) -> rusqlite::Result<usize> {
        stmt.execute(params![
            self.category_code,
            self.item_code,
            self.description,
            self.rate,
            self.unit,
        ])
    }

    fn label(&self) -> String {
        format!("{}/{}", self.category_code, self.item_code)
    }
}
