use serde::{Deserialize, Serialize};

/// Trade-name alias owned by a catalog drug.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeName {
    pub name: String,
    pub active: bool,
}

impl TradeName {
    pub fn active(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            active: true,
        }
    }

    pub fn inactive(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            active: false,
        }
    }
}

/// Canonical drug in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrugCatalogEntry {
    pub id: i64,
    pub generic_name: String,
    pub active: bool,
    pub trade_names: Vec<TradeName>,
}

impl DrugCatalogEntry {
    pub fn new(id: i64, generic_name: impl Into<String>) -> Self {
        Self {
            id,
            generic_name: generic_name.into(),
            active: true,
            trade_names: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_trade_name(mut self, trade_name: TradeName) -> Self {
        self.trade_names.push(trade_name);
        self
    }

    #[must_use]
    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    /// Trade names that may take part in matching.
    pub fn active_trade_names(&self) -> impl Iterator<Item = &str> {
        self.trade_names
            .iter()
            .filter(|trade| self.active && trade.active)
            .map(|trade| trade.name.as_str())
    }
}
