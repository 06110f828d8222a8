#![allow(missing_docs)]

use protocol_model::{LegacyRecord, LineRule, ModelError, ParsedFields, RawMedicationLine};

#[test]
fn test_legacy_record_requires_category() {
    let result = LegacyRecord::from_fields("  ", "10", "SALINE", "5", "BAG");
    assert!(matches!(result, Err(ModelError::EmptyCategory)));
}

#[test]
fn test_legacy_record_requires_integer_item_code() {
    let result = LegacyRecord::from_fields("LAB", "12A", "CBC", "150", "TEST");
    assert!(matches!(result, Err(ModelError::InvalidItemCode(code)) if code == "12A"));
}

#[test]
fn test_legacy_record_trims_and_parses_rate() {
    let record = LegacyRecord::from_fields("DRG ", " 0042", " NSS 1000 ML ", "1,250.50", "BAG")
        .expect("valid record");
    assert_eq!(record.key(), ("DRG", 42));
    assert_eq!(record.description, "NSS 1000 ML");
    assert_eq!(record.rate, Some(1250.5));
}

#[test]
fn test_legacy_record_blank_rate_is_none() {
    let record = LegacyRecord::from_fields("DRG", "1", "X", "   ", "").expect("valid record");
    assert_eq!(record.rate, None);
}

#[test]
fn test_lookup_name_is_uppercased() {
    let line = RawMedicationLine {
        visit_id: 1,
        verbatim_text: "femara 2.5 mg".to_string(),
        rule: LineRule::Fallback,
        fields: ParsedFields::name_only("  femara 2.5 mg "),
    };
    assert_eq!(line.lookup_name().as_deref(), Some("FEMARA 2.5 MG"));
}
