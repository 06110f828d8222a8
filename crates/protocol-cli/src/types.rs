use std::path::PathBuf;

use protocol_dbf::DecodeStats;
use protocol_model::Resolution;
use protocol_resolve::ResolutionReport;
use protocol_store::{ApplyReport, RederiveReport, ReresolveReport, ScriptSummary, SeedReport};

#[derive(Debug)]
pub struct DecodeResult {
    pub file: PathBuf,
    pub stats: DecodeStats,
    pub script: Option<(PathBuf, ScriptSummary)>,
    pub applied: Option<ApplyReport>,
    /// Rows in the store after the batches were applied.
    pub stored_rows: Option<i64>,
}

impl DecodeResult {
    pub fn has_failures(&self) -> bool {
        self.applied.as_ref().is_some_and(ApplyReport::has_failures)
    }
}

#[derive(Debug)]
pub struct MedicationResult {
    pub visits: usize,
    pub skipped_rows: usize,
    pub report: ResolutionReport,
    pub rederive: RederiveReport,
    pub unresolved_out: Option<PathBuf>,
}

impl MedicationResult {
    pub fn has_failures(&self) -> bool {
        self.rederive.has_failures()
    }
}

#[derive(Debug)]
pub struct ResolveResult {
    pub report: ReresolveReport,
    pub unresolved_out: Option<PathBuf>,
}

#[derive(Debug)]
pub struct LookupResult {
    pub name: String,
    pub resolution: Resolution,
}

#[derive(Debug)]
pub struct SeedResult {
    pub entries: usize,
    pub skipped_rows: usize,
    pub report: SeedReport,
}
