//! Three-tier drug name resolution.
//!
//! Tiers run in strict order (exact, prefix, contains). Within a tier each
//! name variant is tried in order, and for each variant trade names are
//! searched before generic names. The first combination with at least one
//! candidate ends the search.
//!
//! # Ties
//!
//! When several drugs match in the winning combination, the default
//! [`TieBreak::StorageOrder`] takes the first one in catalog storage order.
//! Storage order is whatever the store returns, so the winner among ties is
//! not guaranteed to be stable across catalog rebuilds. [`TieBreak::LowestId`]
//! picks the smallest identifier instead.

use std::collections::HashMap;

use protocol_model::{
    DrugCatalogEntry, DrugMatch, MatchSource, MatchTier, RawMedicationLine, Resolution,
    ResolvedMedication,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, info_span};

use crate::catalog::{CatalogIndex, normalize};
use crate::report::ResolutionReport;
use crate::variants::name_variants;

/// Queries shorter than this (in characters) skip the contains tier.
pub const MIN_CONTAINS_LEN: usize = 5;

const SOURCES: [MatchSource; 2] = [MatchSource::TradeName, MatchSource::GenericName];

/// How to choose among several candidates in the winning combination.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// First candidate in catalog storage order.
    #[default]
    StorageOrder,
    /// Smallest drug identifier.
    LowestId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolverOptions {
    pub tie_break: TieBreak,
    pub min_contains_len: usize,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            tie_break: TieBreak::default(),
            min_contains_len: MIN_CONTAINS_LEN,
        }
    }
}

impl ResolverOptions {
    #[must_use]
    pub fn with_tie_break(mut self, tie_break: TieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }
}

fn tier_matches(tier: MatchTier, value: &str, query: &str) -> bool {
    match tier {
        MatchTier::Exact => value == query,
        MatchTier::Prefix => value.starts_with(query),
        MatchTier::Contains => value.contains(query),
    }
}

/// Resolves free-text drug names against a catalog snapshot.
#[derive(Debug, Clone)]
pub struct DrugResolver {
    index: CatalogIndex,
    options: ResolverOptions,
}

impl DrugResolver {
    pub fn new(entries: &[DrugCatalogEntry]) -> Self {
        Self::with_options(entries, ResolverOptions::default())
    }

    pub fn with_options(entries: &[DrugCatalogEntry], options: ResolverOptions) -> Self {
        Self {
            index: CatalogIndex::new(entries),
            options,
        }
    }

    pub fn index(&self) -> &CatalogIndex {
        &self.index
    }

    /// Resolve one name. Never fails; no match is [`Resolution::Unresolved`].
    pub fn resolve(&self, name: &str) -> Resolution {
        let query = normalize(name);
        if query.is_empty() {
            return Resolution::Unresolved;
        }
        let variants = name_variants(&query);
        for tier in MatchTier::ALL {
            for (variant, text) in &variants {
                if tier == MatchTier::Contains
                    && text.chars().count() < self.options.min_contains_len
                {
                    continue;
                }
                for source in SOURCES {
                    let candidates = self.candidates(tier, source, text);
                    let Some(drug_id) = self.pick(&candidates) else {
                        continue;
                    };
                    if candidates.len() > 1 {
                        debug!(
                            tier = %tier,
                            candidates = candidates.len(),
                            drug_id,
                            "several catalog candidates matched"
                        );
                    }
                    return Resolution::Resolved(DrugMatch {
                        drug_id,
                        tier,
                        source,
                        variant: *variant,
                        candidates: candidates.len(),
                    });
                }
            }
        }
        Resolution::Unresolved
    }

    /// Distinct drug ids matching in one combination, in storage order.
    fn candidates(&self, tier: MatchTier, source: MatchSource, query: &str) -> Vec<i64> {
        let mut ids: Vec<i64> = Vec::new();
        for (value, id) in self.index.values(source) {
            if tier_matches(tier, value, query) && !ids.contains(id) {
                ids.push(*id);
            }
        }
        ids
    }

    fn pick(&self, candidates: &[i64]) -> Option<i64> {
        match self.options.tie_break {
            TieBreak::StorageOrder => candidates.first().copied(),
            TieBreak::LowestId => candidates.iter().min().copied(),
        }
    }

    /// Resolve every line, reusing results for repeated names.
    pub fn resolve_lines(
        &self,
        lines: Vec<RawMedicationLine>,
    ) -> (Vec<ResolvedMedication>, ResolutionReport) {
        let span = info_span!("resolve", lines = lines.len(), drugs = self.index.drug_count());
        let _guard = span.enter();

        let mut cache: HashMap<String, Resolution> = HashMap::new();
        let mut report = ResolutionReport::default();
        let mut resolved = Vec::with_capacity(lines.len());
        for line in lines {
            let name = line.lookup_name();
            let resolution = match &name {
                Some(name) => cache
                    .entry(name.clone())
                    .or_insert_with(|| self.resolve(name))
                    .clone(),
                None => Resolution::Unresolved,
            };
            report.record(name.as_deref(), &resolution);
            resolved.push(ResolvedMedication { line, resolution });
        }
        info!(
            total = report.total,
            resolved = report.resolved(),
            unresolved = report.unresolved,
            distinct_unresolved = report.unresolved_names.len(),
            "resolution complete"
        );
        (resolved, report)
    }
}
