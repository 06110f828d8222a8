//! Data model shared by the legacy protocol ingestion crates.
//!
//! Every structure here lives only for the duration of one run; the
//! relational store is the durable source of truth between runs.

pub mod catalog;
pub mod error;
pub mod legacy;
pub mod medication;
pub mod resolution;

pub use catalog::{DrugCatalogEntry, TradeName};
pub use error::{ModelError, Result};
pub use legacy::LegacyRecord;
pub use medication::{LineRule, ParsedFields, RawMedicationLine};
pub use resolution::{
    DrugMatch, MatchSource, MatchTier, NameVariant, Resolution, ResolvedMedication,
};
