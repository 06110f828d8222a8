//! Wholesale re-resolution of stored medication lines.

use std::collections::HashMap;

use protocol_model::Resolution;
use protocol_resolve::{DrugResolver, ResolutionReport};
use rusqlite::params;
use tracing::{error, info, info_span};

use crate::error::Result;
use crate::rederive::StatementFailure;
use crate::session::StoreSession;

#[derive(Debug, Clone, Default)]
pub struct ReresolveReport {
    pub resolution: ResolutionReport,
    pub updated: usize,
    pub failures: Vec<StatementFailure>,
}

/// Recompute `resolved_drug_id` for every stored line from its parsed name.
///
/// Each update is its own statement; failures are recorded and the pass
/// continues.
pub fn reresolve_stored_lines(
    session: &StoreSession,
    resolver: &DrugResolver,
) -> Result<ReresolveReport> {
    let span = info_span!("reresolve");
    let _guard = span.enter();

    let conn = session.connection();
    let mut stmt = conn.prepare("SELECT id, medication_name FROM raw_medication_line")?;
    let rows = stmt.query_map([], |row| {
        Ok((row.get::<_, i64>(0)?, row.get::<_, Option<String>>(1)?))
    })?;
    let mut lines = Vec::new();
    for row in rows {
        lines.push(row?);
    }

    let mut update =
        conn.prepare("UPDATE raw_medication_line SET resolved_drug_id = ?1 WHERE id = ?2")?;
    let mut cache: HashMap<String, Resolution> = HashMap::new();
    let mut report = ReresolveReport::default();
    for (index, (id, name)) in lines.into_iter().enumerate() {
        let name = name
            .map(|name| name.trim().to_uppercase())
            .filter(|name| !name.is_empty());
        let resolution = match &name {
            Some(name) => cache
                .entry(name.clone())
                .or_insert_with(|| resolver.resolve(name))
                .clone(),
            None => Resolution::Unresolved,
        };
        report.resolution.record(name.as_deref(), &resolution);
        match update.execute(params![resolution.drug_id(), id]) {
            Ok(changed) => report.updated += changed,
            Err(err) => {
                error!(line_id = id, error = %err, "update failed");
                report.failures.push(StatementFailure {
                    index,
                    row: format!("line {id}"),
                    message: err.to_string(),
                });
            }
        }
    }
    info!(
        updated = report.updated,
        resolved = report.resolution.resolved(),
        unresolved = report.resolution.unresolved,
        failures = report.failures.len(),
        "stored lines re-resolved"
    );
    Ok(report)
}
