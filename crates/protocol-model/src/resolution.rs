use serde::{Deserialize, Serialize};

use crate::medication::RawMedicationLine;

/// Matching tier, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchTier {
    Exact,
    Prefix,
    Contains,
}

impl MatchTier {
    pub const ALL: [MatchTier; 3] = [Self::Exact, Self::Prefix, Self::Contains];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Exact => "exact",
            Self::Prefix => "prefix",
            Self::Contains => "contains",
        }
    }
}

impl std::fmt::Display for MatchTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Catalog column a match was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchSource {
    TradeName,
    GenericName,
}

impl MatchSource {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TradeName => "trade_name",
            Self::GenericName => "generic_name",
        }
    }
}

impl std::fmt::Display for MatchSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which name variant produced the match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NameVariant {
    /// The query as given.
    Original,
    /// The query with its dosage suffix stripped.
    Base,
}

impl NameVariant {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Original => "original",
            Self::Base => "base",
        }
    }
}

impl std::fmt::Display for NameVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrugMatch {
    pub drug_id: i64,
    pub tier: MatchTier,
    pub source: MatchSource,
    pub variant: NameVariant,
    /// Distinct drug ids that matched in the winning combination.
    pub candidates: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Resolution {
    Resolved(DrugMatch),
    Unresolved,
}

impl Resolution {
    pub fn drug_id(&self) -> Option<i64> {
        match self {
            Self::Resolved(found) => Some(found.drug_id),
            Self::Unresolved => None,
        }
    }
}

/// A medication line paired with its resolution outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedMedication {
    pub line: RawMedicationLine,
    pub resolution: Resolution,
}

impl ResolvedMedication {
    pub fn drug_id(&self) -> Option<i64> {
        self.resolution.drug_id()
    }
}
