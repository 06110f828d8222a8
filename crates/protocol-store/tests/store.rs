#![allow(missing_docs)]

use protocol_dbf::{DEFAULT_HEADER_LEN, FieldMapping, RecordLayout, decode_legacy_records};
use protocol_model::{
    DrugCatalogEntry, DrugMatch, LegacyRecord, LineRule, MatchSource, MatchTier, NameVariant,
    ParsedFields, RawMedicationLine, Resolution, ResolvedMedication, TradeName,
};
use protocol_resolve::DrugResolver;
use protocol_store::{
    ScriptOptions, StoreSession, apply_upsert_script, load_catalog, rederive,
    render_upsert_script, reresolve_stored_lines, seed_catalog,
};

fn record(category: &str, code: &str, description: &str, rate: &str) -> LegacyRecord {
    LegacyRecord::from_fields(category, code, description, rate, "TAB").unwrap()
}

fn legacy_records() -> Vec<LegacyRecord> {
    vec![
        record("A", "1", "PARACETAMOL 500 MG", "1.50"),
        record("A", "2", "O'BRIEN SOLUTION", ""),
        record("B", "1", "ONDANSETRON 8 MG", "1,250.00"),
    ]
}

fn catalog() -> Vec<DrugCatalogEntry> {
    vec![
        DrugCatalogEntry::new(101, "LETROZOLE")
            .with_trade_name(TradeName::active("FEMARA"))
            .with_trade_name(TradeName::inactive("LETROZ")),
        DrugCatalogEntry::new(102, "ONDANSETRON").with_trade_name(TradeName::active("ZOFRAN")),
        DrugCatalogEntry::new(103, "RETIRED AGENT").with_active(false),
    ]
}

fn line(visit_id: i64, text: &str, name: &str) -> RawMedicationLine {
    RawMedicationLine {
        visit_id,
        verbatim_text: text.to_string(),
        rule: LineRule::Fallback,
        fields: ParsedFields::name_only(name),
    }
}

fn unresolved(line: RawMedicationLine) -> ResolvedMedication {
    ResolvedMedication {
        line,
        resolution: Resolution::Unresolved,
    }
}

fn resolved_to(line: RawMedicationLine, drug_id: i64) -> ResolvedMedication {
    ResolvedMedication {
        line,
        resolution: Resolution::Resolved(DrugMatch {
            drug_id,
            tier: MatchTier::Exact,
            source: MatchSource::GenericName,
            variant: NameVariant::Original,
            candidates: 1,
        }),
    }
}

fn legacy_rows(session: &StoreSession) -> Vec<(String, i64, String, Option<f64>)> {
    let mut stmt = session
        .connection()
        .prepare(
            "SELECT category_code, item_code, description, rate FROM legacy_item
             ORDER BY category_code, item_code",
        )
        .unwrap();
    stmt.query_map([], |row| {
        Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
    })
    .unwrap()
    .collect::<Result<Vec<_>, _>>()
    .unwrap()
}

#[test]
fn test_upsert_script_snapshot() {
    let options = ScriptOptions::default().with_batch_size(2);
    let script = render_upsert_script(&legacy_records(), &options).unwrap();
    insta::assert_snapshot!(script, @r"
INSERT INTO legacy_item (category_code, item_code, description, rate, unit) VALUES
('A', 1, 'PARACETAMOL 500 MG', 1.5, 'TAB'),
('A', 2, 'O''BRIEN SOLUTION', NULL, 'TAB')
ON CONFLICT (category_code, item_code) DO NOTHING;
INSERT INTO legacy_item (category_code, item_code, description, rate, unit) VALUES
('B', 1, 'ONDANSETRON 8 MG', 1250, 'TAB')
ON CONFLICT (category_code, item_code) DO NOTHING;
");
}

#[test]
fn test_applying_script_twice_keeps_row_count() {
    let session = StoreSession::open_in_memory().unwrap();
    let options = ScriptOptions::default().with_batch_size(2);
    let script = render_upsert_script(&legacy_records(), &options).unwrap();

    session.apply_script(&script).unwrap();
    let first = legacy_rows(&session);
    session.apply_script(&script).unwrap();

    assert_eq!(session.count_rows("legacy_item").unwrap(), 3);
    assert_eq!(legacy_rows(&session), first);
    assert_eq!(first[1].3, None);
}

#[test]
fn test_script_keeps_existing_rows() {
    let session = StoreSession::open_in_memory().unwrap();
    let options = ScriptOptions::default();
    let original = render_upsert_script(&legacy_records(), &options).unwrap();
    session.apply_script(&original).unwrap();

    let changed = vec![record("A", "1", "RENAMED", "9.99")];
    let script = render_upsert_script(&changed, &options).unwrap();
    session.apply_script(&script).unwrap();

    let rows = legacy_rows(&session);
    assert_eq!(rows[0].2, "PARACETAMOL 500 MG");
    assert_eq!(rows[0].3, Some(1.5));
}

/// One live record in the default legacy item layout.
fn legacy_file(name: &[u8]) -> Vec<u8> {
    let mut data = vec![0u8; DEFAULT_HEADER_LEN];
    data.push(b' ');
    let fields: [(&[u8], usize); 5] = [
        (b"IV", 4),
        (b"9", 10),
        (name, 250),
        (b"40", 12),
        (b"BAG", 28),
    ];
    for (value, width) in fields {
        let mut field = value.to_vec();
        field.resize(width, b' ');
        data.extend_from_slice(&field);
    }
    data
}

#[test]
fn test_decoded_record_with_nul_is_applied() {
    let data = legacy_file(b"SALINE\0OLD");
    let layout = RecordLayout::legacy_items();
    let outcome = decode_legacy_records(&data, &layout, &FieldMapping::default()).unwrap();
    assert_eq!(outcome.stats.placeholders, 1);

    let session = StoreSession::open_in_memory().unwrap();
    let report =
        apply_upsert_script(&session, &outcome.records, &ScriptOptions::default()).unwrap();

    assert!(!report.has_failures());
    assert_eq!(report.inserted, 1);
    assert_eq!(session.count_rows("legacy_item").unwrap(), 1);
}

#[test]
fn test_failed_batch_does_not_stop_later_batches() {
    let mut records = legacy_records();
    records[1].description = "SALINE\0OLD".to_string();
    let options = ScriptOptions::default().with_batch_size(1);
    let session = StoreSession::open_in_memory().unwrap();

    let report = apply_upsert_script(&session, &records, &options).unwrap();

    assert_eq!(report.batches, 3);
    assert_eq!(report.inserted, 2);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].index, 1);
    assert_eq!(report.failures[0].row, "rows 1..2");
    let keys: Vec<(String, i64)> = legacy_rows(&session)
        .into_iter()
        .map(|(category, code, _, _)| (category, code))
        .collect();
    assert_eq!(keys, vec![("A".to_string(), 1), ("B".to_string(), 1)]);
}

#[test]
fn test_applying_batches_twice_inserts_nothing_new() {
    let session = StoreSession::open_in_memory().unwrap();
    let options = ScriptOptions::default().with_batch_size(2);

    let first = apply_upsert_script(&session, &legacy_records(), &options).unwrap();
    let second = apply_upsert_script(&session, &legacy_records(), &options).unwrap();

    assert_eq!(first.batches, 2);
    assert_eq!(first.inserted, 3);
    assert_eq!(second.inserted, 0);
    assert_eq!(session.count_rows("legacy_item").unwrap(), 3);
}

#[test]
fn test_script_rejects_bad_table_name() {
    let options = ScriptOptions::default().with_table("items; DROP TABLE drug");
    assert!(render_upsert_script(&legacy_records(), &options).is_err());
}

#[test]
fn test_rederive_twice_converges() {
    let session = StoreSession::open_in_memory().unwrap();
    let records = legacy_records();

    let first = rederive(&session, &records).unwrap();
    assert_eq!(first.table, "legacy_item");
    assert_eq!(first.deleted, 0);
    assert_eq!(first.inserted, 3);
    let rows = legacy_rows(&session);

    let second = rederive(&session, &records).unwrap();
    assert_eq!(second.deleted, 3);
    assert_eq!(second.inserted, 3);
    assert!(!second.has_failures());
    assert_eq!(legacy_rows(&session), rows);
}

#[test]
fn test_rederive_counts_duplicates_and_collects_failures() {
    let session = StoreSession::open_in_memory().unwrap();
    seed_catalog(&session, &catalog()).unwrap();

    let rows = vec![
        resolved_to(line(1, "ZOFRAN 2 AMP", "ZOFRAN"), 102),
        unresolved(line(1, "ZOFRAN 2 AMP", "ZOFRAN")),
        resolved_to(line(2, "MYSTERY", "MYSTERY"), 999),
        unresolved(line(3, "UNKNOWN TONIC", "UNKNOWN TONIC")),
    ];
    let report = rederive(&session, &rows).unwrap();

    assert_eq!(report.table, "raw_medication_line");
    assert_eq!(report.inserted, 2);
    assert_eq!(report.duplicates, 1);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].index, 2);
    assert_eq!(report.failures[0].row, "visit 2");
    assert_eq!(session.count_rows("raw_medication_line").unwrap(), 2);
}

#[test]
fn test_seed_and_load_catalog() {
    let session = StoreSession::open_in_memory().unwrap();
    let entries = catalog();

    let first = seed_catalog(&session, &entries).unwrap();
    assert_eq!(first.drugs_inserted, 3);
    assert_eq!(first.aliases_inserted, 3);
    let again = seed_catalog(&session, &entries).unwrap();
    assert_eq!(again.drugs_inserted, 0);
    assert_eq!(again.aliases_inserted, 0);

    let loaded = load_catalog(&session).unwrap();
    assert_eq!(loaded, entries);
    assert!(!loaded[2].active);
}

#[test]
fn test_reresolve_updates_stored_lines() {
    let session = StoreSession::open_in_memory().unwrap();
    seed_catalog(&session, &catalog()).unwrap();
    let rows = vec![
        unresolved(line(1, "FEMARA 2.5 MG", "femara 2.5 mg")),
        unresolved(line(1, "ZOFRAN 2 AMP", "ZOFRAN")),
        unresolved(line(2, "HERBAL TEA", "HERBAL TEA")),
    ];
    rederive(&session, &rows).unwrap();

    let resolver = DrugResolver::new(&load_catalog(&session).unwrap());
    let report = reresolve_stored_lines(&session, &resolver).unwrap();

    assert_eq!(report.updated, 3);
    assert!(report.failures.is_empty());
    assert_eq!(report.resolution.total, 3);
    assert_eq!(report.resolution.resolved(), 2);
    assert!(report.resolution.unresolved_names.contains("HERBAL TEA"));

    let mut stmt = session
        .connection()
        .prepare("SELECT verbatim_text, resolved_drug_id FROM raw_medication_line ORDER BY id")
        .unwrap();
    let stored: Vec<(String, Option<i64>)> = stmt
        .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(
        stored,
        vec![
            ("FEMARA 2.5 MG".to_string(), Some(101)),
            ("ZOFRAN 2 AMP".to_string(), Some(102)),
            ("HERBAL TEA".to_string(), None),
        ]
    );
}
