//! Structural rules for a single medication segment.
//!
//! Each rule is an independent [`LineMatcher`]. The parser tries them in
//! order and keeps the first match.

use std::sync::LazyLock;

use protocol_model::{LineRule, ParsedFields};
use regex::Regex;

static CODE_NAME_QUANTITY_UNIT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+)\s+-\s*(.+?)\s+(\d+(?:\.\d+)?)\s+([A-Za-z]+)\s*(?:\([^)]*\))?$")
        .expect("code/name/quantity/unit pattern")
});

static CODE_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\s+-\s*(.+)$").expect("code/name pattern"));

static NAME_QUANTITY_UNIT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z][A-Za-z\s-]*?)\s+(\d+(?:\.\d+)?)\s+([A-Za-z]+)$")
        .expect("name/quantity/unit pattern")
});

static TRAILING_NOTE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\([^)]*\)\s*$").expect("trailing note pattern"));

/// One structural rule.
pub trait LineMatcher: Send + Sync {
    /// Rule reported for lines this matcher accepts.
    fn rule(&self) -> LineRule;

    /// Extract fields from a trimmed, non-empty segment.
    fn try_match(&self, segment: &str) -> Option<ParsedFields>;
}

/// `<code> - <name> <quantity> <unit> [(note)]`
#[derive(Debug, Clone, Copy, Default)]
pub struct CodeNameQuantityUnit;

impl LineMatcher for CodeNameQuantityUnit {
    fn rule(&self) -> LineRule {
        LineRule::CodeNameQuantityUnit
    }

    fn try_match(&self, segment: &str) -> Option<ParsedFields> {
        let caps = CODE_NAME_QUANTITY_UNIT.captures(segment)?;
        Some(ParsedFields {
            source_code: Some(caps[1].to_string()),
            medication_name: Some(caps[2].trim().to_string()),
            quantity: caps[3].parse().ok(),
            unit: Some(caps[4].to_string()),
        })
    }
}

/// `<code> - <name>`
#[derive(Debug, Clone, Copy, Default)]
pub struct CodeName;

impl LineMatcher for CodeName {
    fn rule(&self) -> LineRule {
        LineRule::CodeName
    }

    fn try_match(&self, segment: &str) -> Option<ParsedFields> {
        let caps = CODE_NAME.captures(segment)?;
        let name = caps[2].trim();
        let stripped = TRAILING_NOTE.replace(name, "");
        // A name made only of a note stays as written.
        let name = if stripped.trim().is_empty() {
            name.to_string()
        } else {
            stripped.trim().to_string()
        };
        Some(ParsedFields {
            source_code: Some(caps[1].to_string()),
            medication_name: Some(name),
            quantity: None,
            unit: None,
        })
    }
}

/// `<name> <quantity> <unit>` with a letters/spaces/hyphens name.
#[derive(Debug, Clone, Copy, Default)]
pub struct NameQuantityUnit;

impl LineMatcher for NameQuantityUnit {
    fn rule(&self) -> LineRule {
        LineRule::NameQuantityUnit
    }

    fn try_match(&self, segment: &str) -> Option<ParsedFields> {
        let caps = NAME_QUANTITY_UNIT.captures(segment)?;
        Some(ParsedFields {
            source_code: None,
            medication_name: Some(caps[1].trim().to_string()),
            quantity: caps[2].parse().ok(),
            unit: Some(caps[3].to_string()),
        })
    }
}

/// Whole segment as the name. Always matches.
#[derive(Debug, Clone, Copy, Default)]
pub struct Fallback;

impl LineMatcher for Fallback {
    fn rule(&self) -> LineRule {
        LineRule::Fallback
    }

    fn try_match(&self, segment: &str) -> Option<ParsedFields> {
        Some(ParsedFields::name_only(segment))
    }
}

/// Rules in priority order.
pub fn default_matchers() -> Vec<Box<dyn LineMatcher>> {
    vec![
        Box::new(CodeNameQuantityUnit),
        Box::new(CodeName),
        Box::new(NameQuantityUnit),
        Box::new(Fallback),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_name_quantity_unit_drops_note() {
        let fields = CodeNameQuantityUnit
            .try_match("12345 - PARACETAMOL 500 10 TAB (take after meal)")
            .expect("match");
        assert_eq!(fields.source_code.as_deref(), Some("12345"));
        assert_eq!(fields.medication_name.as_deref(), Some("PARACETAMOL 500"));
        assert_eq!(fields.quantity, Some(10.0));
        assert_eq!(fields.unit.as_deref(), Some("TAB"));
    }

    #[test]
    fn test_code_name_quantity_unit_needs_unit() {
        assert!(CodeNameQuantityUnit.try_match("12345 - PARACETAMOL 500").is_none());
    }

    #[test]
    fn test_code_name_strips_note() {
        let fields = CodeName
            .try_match("2001 - ONDANSETRON INJ (before chemo)")
            .expect("match");
        assert_eq!(fields.source_code.as_deref(), Some("2001"));
        assert_eq!(fields.medication_name.as_deref(), Some("ONDANSETRON INJ"));
        assert_eq!(fields.quantity, None);
    }

    #[test]
    fn test_code_name_keeps_note_only_name() {
        let fields = CodeName.try_match("2001 - (see chart)").expect("match");
        assert_eq!(fields.medication_name.as_deref(), Some("(see chart)"));
    }

    #[test]
    fn test_code_name_requires_spaced_dash() {
        assert!(CodeName.try_match("5-FU 500 MG").is_none());
    }

    #[test]
    fn test_name_quantity_unit_without_code() {
        let fields = NameQuantityUnit
            .try_match("Dexa-methasone 4 mg")
            .expect("match");
        assert_eq!(fields.source_code, None);
        assert_eq!(fields.medication_name.as_deref(), Some("Dexa-methasone"));
        assert_eq!(fields.quantity, Some(4.0));
        assert_eq!(fields.unit.as_deref(), Some("mg"));
    }

    #[test]
    fn test_name_quantity_unit_rejects_digits_in_name() {
        assert!(NameQuantityUnit.try_match("VIT B12 1 AMP").is_none());
    }

    #[test]
    fn test_fallback_always_matches() {
        let fields = Fallback.try_match("??? 5-FU").expect("match");
        assert_eq!(fields.medication_name.as_deref(), Some("??? 5-FU"));
    }
}
