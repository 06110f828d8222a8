//! Name variants tried during resolution.

use std::sync::LazyLock;

use protocol_model::NameVariant;
use regex::Regex;

/// Units that end a dosage suffix.
pub const DOSAGE_UNITS: [&str; 14] = [
    "mg", "gm", "ml", "mcg", "%", "g", "iu", "unit", "tab", "cap", "amp", "vial", "syringe",
    "prefill",
];

/// A number directly followed by a unit token, plus everything after it.
static DOSAGE_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    let units = DOSAGE_UNITS
        .iter()
        .map(|unit| regex::escape(unit))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(
        r"(?i)^(.*?)\s*\d+(?:\.\d+)?\s*(?:{units})s?(?:[^a-z].*)?$"
    ))
    .expect("dosage suffix pattern")
});

/// Strip a trailing dosage/strength suffix.
///
/// Returns `None` when nothing was stripped or nothing would remain.
pub fn strip_dosage(name: &str) -> Option<String> {
    let caps = DOSAGE_SUFFIX.captures(name)?;
    let base = caps[1].trim();
    if base.is_empty() || base == name.trim() {
        return None;
    }
    Some(base.to_string())
}

/// Variants in the order they are tried: original first, then base.
pub fn name_variants(query: &str) -> Vec<(NameVariant, String)> {
    let mut variants = vec![(NameVariant::Original, query.to_string())];
    if let Some(base) = strip_dosage(query) {
        variants.push((NameVariant::Base, base));
    }
    variants
}
