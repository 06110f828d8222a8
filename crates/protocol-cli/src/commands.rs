use std::fs::File;
use std::io::BufWriter;
use std::time::Instant;

use anyhow::{Context, Result};
use protocol_cli::pipeline::{
    build_resolver, decode_legacy, load_visit_lines, open_store, write_unresolved,
};
use protocol_ingest::{SheetColumns, read_catalog_entries, read_sheet};
use protocol_store::{
    ScriptOptions, apply_upsert_script, rederive, reresolve_stored_lines, seed_catalog,
    write_upsert_script,
};
use tracing::{info, info_span};

use crate::cli::{DecodeArgs, LookupArgs, MedicationArgs, ResolveArgs, SeedArgs};
use crate::types::{DecodeResult, LookupResult, MedicationResult, ResolveResult, SeedResult};

pub fn run_decode(args: &DecodeArgs) -> Result<DecodeResult> {
    let span = info_span!("decode_command", file = %args.file.display());
    let _guard = span.enter();
    let start = Instant::now();

    let outcome = decode_legacy(&args.file, args.header_len, args.record_len)?;
    let options = ScriptOptions::default().with_batch_size(args.batch_size);

    let script = match &args.script {
        Some(path) => {
            let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            let summary = write_upsert_script(&mut writer, &outcome.records, &options)
                .with_context(|| format!("write {}", path.display()))?;
            Some((path.clone(), summary))
        }
        None => None,
    };

    let (applied, stored_rows) = match &args.db {
        Some(db) => {
            let session = open_store(db)?;
            let report = apply_upsert_script(&session, &outcome.records, &options)
                .context("apply upsert batches")?;
            let rows = session.count_rows(&options.table)?;
            session.close()?;
            (Some(report), Some(rows))
        }
        None => (None, None),
    };

    info!(
        emitted = outcome.stats.emitted,
        duration_ms = start.elapsed().as_millis(),
        "decode command complete"
    );
    Ok(DecodeResult {
        file: args.file.clone(),
        stats: outcome.stats,
        script,
        applied,
        stored_rows,
    })
}

pub fn run_medications(args: &MedicationArgs) -> Result<MedicationResult> {
    let span = info_span!("medications_command", sheet = %args.sheet.display());
    let _guard = span.enter();
    let start = Instant::now();

    let columns = SheetColumns {
        visit_id: args.visit_column.clone(),
        visit_date: args.date_column.clone(),
        medications: args.text_column.clone(),
    };
    let visit_lines = load_visit_lines(&args.sheet, &columns)?;

    let session = open_store(&args.store.db)?;
    let resolver = build_resolver(&session, args.ties.deterministic_ties)?;
    let (resolved, report) = resolver.resolve_lines(visit_lines.lines);
    let rederived = rederive(&session, &resolved).context("re-derive medication lines")?;
    session.close()?;

    if let Some(path) = &args.unresolved_out {
        write_unresolved(path, &report)?;
    }
    info!(
        lines = report.total,
        failures = rederived.failures.len(),
        duration_ms = start.elapsed().as_millis(),
        "medications command complete"
    );
    Ok(MedicationResult {
        visits: visit_lines.visits,
        skipped_rows: visit_lines.skipped,
        report,
        rederive: rederived,
        unresolved_out: args.unresolved_out.clone(),
    })
}

pub fn run_resolve(args: &ResolveArgs) -> Result<ResolveResult> {
    let session = open_store(&args.store.db)?;
    let resolver = build_resolver(&session, args.ties.deterministic_ties)?;
    let report = reresolve_stored_lines(&session, &resolver).context("re-resolve stored lines")?;
    session.close()?;
    if let Some(path) = &args.unresolved_out {
        write_unresolved(path, &report.resolution)?;
    }
    Ok(ResolveResult {
        report,
        unresolved_out: args.unresolved_out.clone(),
    })
}

pub fn run_lookup(args: &LookupArgs) -> Result<LookupResult> {
    let session = open_store(&args.store.db)?;
    let resolver = build_resolver(&session, args.ties.deterministic_ties)?;
    let name = args.name.trim().to_uppercase();
    let resolution = resolver.resolve(&name);
    Ok(LookupResult { name, resolution })
}

pub fn run_seed_catalog(args: &SeedArgs) -> Result<SeedResult> {
    let table =
        read_sheet(&args.sheet).with_context(|| format!("read {}", args.sheet.display()))?;
    let sheet = read_catalog_entries(&table).context("read catalog columns")?;
    let session = open_store(&args.store.db)?;
    let report = seed_catalog(&session, &sheet.entries).context("seed catalog")?;
    session.close()?;
    Ok(SeedResult {
        entries: sheet.entries.len(),
        skipped_rows: sheet.skipped,
        report,
    })
}
