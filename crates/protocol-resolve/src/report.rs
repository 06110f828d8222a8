use std::collections::{BTreeMap, BTreeSet};

use protocol_model::{MatchTier, Resolution};
use serde::{Deserialize, Serialize};

/// Outcome counts of one resolution pass.
///
/// Distinct unresolved names are kept for manual review.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionReport {
    pub total: usize,
    pub by_tier: BTreeMap<MatchTier, usize>,
    pub unresolved: usize,
    pub unresolved_names: BTreeSet<String>,
}

impl ResolutionReport {
    pub fn record(&mut self, name: Option<&str>, resolution: &Resolution) {
        self.total += 1;
        match resolution {
            Resolution::Resolved(found) => {
                *self.by_tier.entry(found.tier).or_insert(0) += 1;
            }
            Resolution::Unresolved => {
                self.unresolved += 1;
                if let Some(name) = name {
                    self.unresolved_names.insert(name.to_string());
                }
            }
        }
    }

    pub fn resolved(&self) -> usize {
        self.by_tier.values().sum()
    }

    pub fn tier_count(&self, tier: MatchTier) -> usize {
        self.by_tier.get(&tier).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use protocol_model::{DrugMatch, MatchSource, NameVariant};

    #[test]
    fn test_counts_and_dedupes() {
        let hit = Resolution::Resolved(DrugMatch {
            drug_id: 1,
            tier: MatchTier::Prefix,
            source: MatchSource::TradeName,
            variant: NameVariant::Original,
            candidates: 1,
        });
        let mut report = ResolutionReport::default();
        report.record(Some("A"), &hit);
        report.record(Some("XYZ"), &Resolution::Unresolved);
        report.record(Some("XYZ"), &Resolution::Unresolved);
        report.record(None, &Resolution::Unresolved);

        assert_eq!(report.total, 4);
        assert_eq!(report.resolved(), 1);
        assert_eq!(report.tier_count(MatchTier::Prefix), 1);
        assert_eq!(report.tier_count(MatchTier::Exact), 0);
        assert_eq!(report.unresolved, 3);
        assert_eq!(report.unresolved_names.len(), 1);
    }
}
