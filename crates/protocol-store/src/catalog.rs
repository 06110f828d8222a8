//! Drug catalog access.

use std::collections::HashMap;

use protocol_model::{DrugCatalogEntry, TradeName};
use rusqlite::params;
use tracing::{info, warn};

use crate::error::Result;
use crate::session::StoreSession;

/// Load every drug with its aliases, inactive rows included.
///
/// Rows come back in storage order (no `ORDER BY`); the resolver's default
/// tie-break depends on it.
pub fn load_catalog(session: &StoreSession) -> Result<Vec<DrugCatalogEntry>> {
    let conn = session.connection();
    let mut stmt = conn.prepare("SELECT id, generic_name, active FROM drug")?;
    let rows = stmt.query_map([], |row| {
        Ok(DrugCatalogEntry::new(row.get(0)?, row.get::<_, String>(1)?)
            .with_active(row.get::<_, i64>(2)? != 0))
    })?;
    let mut entries = Vec::new();
    for row in rows {
        entries.push(row?);
    }

    let positions: HashMap<i64, usize> = entries
        .iter()
        .enumerate()
        .map(|(idx, entry)| (entry.id, idx))
        .collect();
    let mut stmt = conn.prepare("SELECT drug_id, name, active FROM trade_name")?;
    let rows = stmt.query_map([], |row| {
        Ok((
            row.get::<_, i64>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, i64>(2)? != 0,
        ))
    })?;
    let mut aliases = 0usize;
    for row in rows {
        let (drug_id, name, active) = row?;
        let Some(&idx) = positions.get(&drug_id) else {
            warn!(drug_id, "trade name refers to a missing drug");
            continue;
        };
        entries[idx].trade_names.push(TradeName { name, active });
        aliases += 1;
    }
    info!(drugs = entries.len(), aliases, "catalog loaded");
    Ok(entries)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub drugs_inserted: usize,
    pub aliases_inserted: usize,
}

/// Insert catalog entries, skipping drugs and aliases that already exist.
pub fn seed_catalog(session: &StoreSession, entries: &[DrugCatalogEntry]) -> Result<SeedReport> {
    let conn = session.connection();
    let mut drug_stmt = conn.prepare(
        "INSERT INTO drug (id, generic_name, active) VALUES (?1, ?2, ?3)
         ON CONFLICT (id) DO NOTHING",
    )?;
    let mut alias_stmt = conn.prepare(
        "INSERT INTO trade_name (drug_id, name, active) VALUES (?1, ?2, ?3)
         ON CONFLICT (drug_id, name) DO NOTHING",
    )?;
    let mut report = SeedReport::default();
    for entry in entries {
        report.drugs_inserted +=
            drug_stmt.execute(params![entry.id, entry.generic_name, entry.active])?;
        for trade in &entry.trade_names {
            report.aliases_inserted +=
                alias_stmt.execute(params![entry.id, trade.name, trade.active])?;
        }
    }
    info!(
        drugs = report.drugs_inserted,
        aliases = report.aliases_inserted,
        "catalog seeded"
    );
    Ok(report)
}
