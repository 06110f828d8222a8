#![allow(missing_docs)]

use proptest::prelude::*;
use protocol_ingest::{parse_medication_blob, split_entries};
use protocol_model::LineRule;

#[test]
fn test_segments_mixed_separators() {
    assert_eq!(split_entries("A\nB|C\n\nD"), vec!["A", "B", "C", "D"]);
}

#[test]
fn test_parses_full_entry() {
    let lines = parse_medication_blob(1, "12345 - PARACETAMOL 500 10 TAB (take after meal)");
    assert_eq!(lines.len(), 1);
    let line = &lines[0];
    assert_eq!(line.rule, LineRule::CodeNameQuantityUnit);
    assert_eq!(line.verbatim_text, "12345 - PARACETAMOL 500 10 TAB (take after meal)");
    assert_eq!(line.fields.source_code.as_deref(), Some("12345"));
    assert_eq!(line.fields.medication_name.as_deref(), Some("PARACETAMOL 500"));
    assert_eq!(line.fields.quantity, Some(10.0));
    assert_eq!(line.fields.unit.as_deref(), Some("TAB"));
}

#[test]
fn test_keeps_verbatim_text_for_fallback() {
    let lines = parse_medication_blob(2, r"  5-FU 500 mg/m2 IV  \n|");
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].rule, LineRule::Fallback);
    assert_eq!(lines[0].verbatim_text, "5-FU 500 mg/m2 IV");
    assert_eq!(lines[0].fields.medication_name.as_deref(), Some("5-FU 500 mg/m2 IV"));
    assert_eq!(lines[0].fields.source_code, None);
}

#[test]
fn test_empty_blob_yields_nothing() {
    assert!(parse_medication_blob(3, "").is_empty());
    assert!(parse_medication_blob(3, r"\n\n||").is_empty());
}

proptest! {
    #[test]
    fn test_verbatim_text_is_preserved(segment in "[A-Za-z0-9 ().-]{1,40}") {
        let trimmed = segment.trim();
        prop_assume!(!trimmed.is_empty());
        let lines = parse_medication_blob(7, &segment);
        prop_assert_eq!(lines.len(), 1);
        prop_assert_eq!(lines[0].verbatim_text.as_str(), trimmed);
        prop_assert!(lines[0].fields.medication_name.is_some());
    }
}
