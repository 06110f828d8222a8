use serde::{Deserialize, Serialize};

/// Structural rule that produced the parsed fields of a medication line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineRule {
    /// `<code> - <name> <quantity> <unit>`
    CodeNameQuantityUnit,
    /// `<code> - <name>`
    CodeName,
    /// `<name> <quantity> <unit>`
    NameQuantityUnit,
    /// Whole segment taken as the name.
    Fallback,
}

impl LineRule {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CodeNameQuantityUnit => "code_name_quantity_unit",
            Self::CodeName => "code_name",
            Self::NameQuantityUnit => "name_quantity_unit",
            Self::Fallback => "fallback",
        }
    }
}

impl std::fmt::Display for LineRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fields extracted from one medication mention.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedFields {
    pub source_code: Option<String>,
    pub medication_name: Option<String>,
    pub quantity: Option<f64>,
    pub unit: Option<String>,
}

impl ParsedFields {
    pub fn name_only(name: impl Into<String>) -> Self {
        Self {
            medication_name: Some(name.into()),
            ..Self::default()
        }
    }
}

/// One free-text medication mention belonging to a source visit.
///
/// The verbatim text is always kept, whatever rule produced the fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawMedicationLine {
    pub visit_id: i64,
    pub verbatim_text: String,
    pub rule: LineRule,
    pub fields: ParsedFields,
}

impl RawMedicationLine {
    /// Name used for catalog resolution (upper-cased and trimmed).
    pub fn lookup_name(&self) -> Option<String> {
        self.fields
            .medication_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_uppercase)
    }
}
