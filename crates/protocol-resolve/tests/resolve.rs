#![allow(missing_docs)]

use protocol_ingest::parse_medication_blob;
use protocol_model::{DrugCatalogEntry, MatchSource, MatchTier, NameVariant, Resolution, TradeName};
use protocol_resolve::DrugResolver;

fn oncology_catalog() -> Vec<DrugCatalogEntry> {
    vec![
        DrugCatalogEntry::new(101, "LETROZOLE")
            .with_trade_name(TradeName::active("FEMARA"))
            .with_trade_name(TradeName::inactive("LETROZ")),
        DrugCatalogEntry::new(102, "CHLORAMBUCIL ORAL FLORA BALANCE MIXTURE"),
        DrugCatalogEntry::new(103, "ONDANSETRON").with_trade_name(TradeName::active("ZOFRAN")),
        DrugCatalogEntry::new(104, "DEXAMETHASONE"),
        DrugCatalogEntry::new(105, "RETIRED AGENT")
            .with_trade_name(TradeName::active("OLDBRAND"))
            .with_active(false),
    ]
}

#[test]
fn test_resolves_through_base_variant() {
    let resolver = DrugResolver::new(&oncology_catalog());
    let Resolution::Resolved(found) = resolver.resolve("FEMARA 2.5 MG") else {
        panic!("FEMARA 2.5 MG should resolve");
    };
    assert_eq!(found.drug_id, 101);
    assert_eq!(found.tier, MatchTier::Exact);
    assert_eq!(found.source, MatchSource::TradeName);
    assert_eq!(found.variant, NameVariant::Base);
}

#[test]
fn test_short_query_skips_contains_tier() {
    let resolver = DrugResolver::new(&oncology_catalog());
    assert_eq!(resolver.resolve("LORA"), Resolution::Unresolved);
    // Five characters are long enough.
    let Resolution::Resolved(found) = resolver.resolve("FLORA") else {
        panic!("FLORA should match by containment");
    };
    assert_eq!(found.tier, MatchTier::Contains);
    assert_eq!(found.drug_id, 102);
}

#[test]
fn test_inactive_rows_do_not_participate() {
    let resolver = DrugResolver::new(&oncology_catalog());
    // The inactive alias is ignored; the generic name still matches by prefix.
    let Resolution::Resolved(found) = resolver.resolve("LETROZ") else {
        panic!("LETROZ should match the generic name");
    };
    assert_eq!(found.drug_id, 101);
    assert_eq!(found.tier, MatchTier::Prefix);
    assert_eq!(found.source, MatchSource::GenericName);

    assert_eq!(resolver.resolve("OLDBRAND"), Resolution::Unresolved);
    assert_eq!(resolver.resolve("RETIRED AGENT"), Resolution::Unresolved);
}

#[test]
fn test_resolves_parsed_lines_and_reports_unresolved() {
    let lines = parse_medication_blob(
        42,
        "1001 - ZOFRAN 2 AMP (before chemo)|DEXAMETHASONE 4 MG\\nMYSTERY TONIC|MYSTERY TONIC",
    );
    let resolver = DrugResolver::new(&oncology_catalog());
    let (resolved, report) = resolver.resolve_lines(lines);

    let ids: Vec<Option<i64>> = resolved.iter().map(|item| item.drug_id()).collect();
    assert_eq!(ids, vec![Some(103), Some(104), None, None]);
    assert_eq!(report.total, 4);
    assert_eq!(report.resolved(), 2);
    assert_eq!(report.unresolved, 2);
    assert_eq!(
        report.unresolved_names.iter().collect::<Vec<_>>(),
        vec!["MYSTERY TONIC"]
    );

    let json = serde_json::to_string(&report).expect("serialize report");
    assert!(json.contains("MYSTERY TONIC"));
}
