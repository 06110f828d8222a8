//! Drug entity resolution.
//!
//! Maps free-text medication names to catalog identifiers with a strict
//! three-tier policy: exact, prefix, then substring containment. See
//! [`DrugResolver`] for the search order and tie handling.

pub mod catalog;
pub mod report;
pub mod resolver;
pub mod variants;

pub use catalog::CatalogIndex;
pub use report::ResolutionReport;
pub use resolver::{DrugResolver, MIN_CONTAINS_LEN, ResolverOptions, TieBreak};
pub use variants::{DOSAGE_UNITS, name_variants, strip_dosage};
