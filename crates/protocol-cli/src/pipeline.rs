//! Stage helpers shared by the subcommands.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use protocol_dbf::{DecodeOutcome, FieldMapping, RecordLayout, read_legacy_file};
use protocol_ingest::{LineParser, SheetColumns, read_sheet, read_visit_medications};
use protocol_model::RawMedicationLine;
use protocol_resolve::{DrugResolver, ResolutionReport, ResolverOptions, TieBreak};
use protocol_store::{StoreSession, load_catalog};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, info_span, trace, warn};

use crate::logging::redact_value;

/// Decode a legacy item table with the given lengths and the default fields.
pub fn decode_legacy(path: &Path, header_len: usize, record_len: usize) -> Result<DecodeOutcome> {
    let layout = RecordLayout::legacy_items()
        .with_lengths(header_len, record_len)
        .context("invalid record layout")?;
    read_legacy_file(path, &layout, &FieldMapping::default())
        .with_context(|| format!("decode {}", path.display()))
}

/// Medication lines parsed from a visit sheet.
#[derive(Debug, Default)]
pub struct VisitLines {
    pub visits: usize,
    /// Sheet rows without a usable visit id.
    pub skipped: usize,
    pub lines: Vec<RawMedicationLine>,
}

pub fn load_visit_lines(path: &Path, columns: &SheetColumns) -> Result<VisitLines> {
    let span = info_span!("parse", sheet = %path.display());
    let _guard = span.enter();

    let table = read_sheet(path).with_context(|| format!("read {}", path.display()))?;
    let sheet = read_visit_medications(&table, columns).context("read visit columns")?;
    let parser = LineParser::default();
    let mut lines = Vec::new();
    for visit in &sheet.visits {
        let parsed = parser.parse_blob(visit.visit_id, &visit.blob);
        debug!(
            visit_id = visit.visit_id,
            visit_date = ?visit.visit_date,
            lines = parsed.len(),
            "visit parsed"
        );
        for line in &parsed {
            trace!(
                visit_id = line.visit_id,
                rule = %line.rule,
                text = redact_value(&line.verbatim_text),
                "medication line"
            );
        }
        lines.extend(parsed);
    }
    info!(
        visits = sheet.visits.len(),
        skipped = sheet.skipped,
        lines = lines.len(),
        "visit sheet parsed"
    );
    Ok(VisitLines {
        visits: sheet.visits.len(),
        skipped: sheet.skipped,
        lines,
    })
}

pub fn open_store(path: &Path) -> Result<StoreSession> {
    StoreSession::open(path).with_context(|| format!("open store {}", path.display()))
}

/// Build a resolver over the stored catalog.
pub fn build_resolver(session: &StoreSession, deterministic_ties: bool) -> Result<DrugResolver> {
    let catalog = load_catalog(session).context("load drug catalog")?;
    let tie_break = if deterministic_ties {
        TieBreak::LowestId
    } else {
        TieBreak::StorageOrder
    };
    let options = ResolverOptions::default().with_tie_break(tie_break);
    let resolver = DrugResolver::with_options(&catalog, options);
    if resolver.index().drug_count() == 0 {
        warn!("no active drugs in the catalog; every name will be unresolved");
    }
    Ok(resolver)
}

/// Unresolved names written for manual review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnresolvedNames {
    pub total: usize,
    pub unresolved: usize,
    pub names: Vec<String>,
}

impl From<&ResolutionReport> for UnresolvedNames {
    fn from(report: &ResolutionReport) -> Self {
        Self {
            total: report.total,
            unresolved: report.unresolved,
            names: report.unresolved_names.iter().cloned().collect(),
        }
    }
}

pub fn write_unresolved(path: &Path, report: &ResolutionReport) -> Result<()> {
    let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, &UnresolvedNames::from(report))
        .context("serialize unresolved names")?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    info!(
        path = %path.display(),
        names = report.unresolved_names.len(),
        "unresolved names written"
    );
    Ok(())
}
