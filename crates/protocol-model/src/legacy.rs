use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// One row of the legacy item catalog.
///
/// Keyed by the composite natural key `(category_code, item_code)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegacyRecord {
    pub category_code: String,
    pub item_code: i64,
    pub description: String,
    pub rate: Option<f64>,
    pub unit: String,
}

impl LegacyRecord {
    /// Build a record from decoded text fields, enforcing the key invariants.
    ///
    /// The category code must be non-empty and the item code must parse as an
    /// integer. A blank, unparsable or non-finite rate becomes `None`.
    pub fn from_fields(
        category_code: &str,
        item_code: &str,
        description: &str,
        rate: &str,
        unit: &str,
    ) -> Result<Self> {
        let category_code = category_code.trim();
        if category_code.is_empty() {
            return Err(ModelError::EmptyCategory);
        }
        let item_code = item_code
            .trim()
            .parse::<i64>()
            .map_err(|_| ModelError::InvalidItemCode(item_code.trim().to_string()))?;
        let rate = rate
            .trim()
            .replace(',', "")
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite());
        Ok(Self {
            category_code: category_code.to_string(),
            item_code,
            description: description.trim().to_string(),
            rate,
            unit: unit.trim().to_string(),
        })
    }

    /// Composite natural key.
    pub fn key(&self) -> (&str, i64) {
        (&self.category_code, self.item_code)
    }
}
