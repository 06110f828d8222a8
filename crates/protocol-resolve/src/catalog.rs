//! Matchable view of the drug catalog.

use protocol_model::{DrugCatalogEntry, MatchSource};

/// Upper-cased catalog values in storage order.
///
/// Only active drugs contribute; trade names contribute only when both the
/// alias and its drug are active.
#[derive(Debug, Clone, Default)]
pub struct CatalogIndex {
    trade_names: Vec<(String, i64)>,
    generic_names: Vec<(String, i64)>,
}

impl CatalogIndex {
    pub fn new(entries: &[DrugCatalogEntry]) -> Self {
        let mut index = Self::default();
        for entry in entries.iter().filter(|entry| entry.active) {
            for name in entry.active_trade_names() {
                index.trade_names.push((normalize(name), entry.id));
            }
            index
                .generic_names
                .push((normalize(&entry.generic_name), entry.id));
        }
        index
    }

    /// Values of one source, in storage order.
    pub fn values(&self, source: MatchSource) -> &[(String, i64)] {
        match source {
            MatchSource::TradeName => &self.trade_names,
            MatchSource::GenericName => &self.generic_names,
        }
    }

    /// Number of active drugs.
    pub fn drug_count(&self) -> usize {
        self.generic_names.len()
    }
}

/// Upper-cased, trimmed form used on both sides of a comparison.
pub fn normalize(value: &str) -> String {
    value.trim().to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use protocol_model::TradeName;

    #[test]
    fn test_skips_inactive_rows() {
        let entries = vec![
            DrugCatalogEntry::new(1, "letrozole")
                .with_trade_name(TradeName::active("Femara"))
                .with_trade_name(TradeName::inactive("Letara")),
            DrugCatalogEntry::new(2, "old drug")
                .with_trade_name(TradeName::active("Gone"))
                .with_active(false),
        ];
        let index = CatalogIndex::new(&entries);
        assert_eq!(
            index.values(MatchSource::TradeName),
            &[("FEMARA".to_string(), 1)]
        );
        assert_eq!(
            index.values(MatchSource::GenericName),
            &[("LETROZOLE".to_string(), 1)]
        );
        assert_eq!(index.drug_count(), 1);
    }
}
