//! Record layouts and field mappings.

use std::collections::BTreeSet;

use crate::error::{DbfError, Result};

/// Header length of the legacy item file.
pub const DEFAULT_HEADER_LEN: usize = 488;
/// Record length of the legacy item file.
pub const DEFAULT_RECORD_LEN: usize = 305;
/// Marker byte flagging a deleted record.
pub const DELETED_MARKER: u8 = b'*';

/// A named fixed-width field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: String,
    pub length: usize,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, length: usize) -> Self {
        Self {
            name: name.into(),
            length,
        }
    }
}

/// Physical layout of a legacy table file.
///
/// Each record starts with a one-byte deletion marker followed by the
/// declared fields in order. Any bytes after the last field are ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordLayout {
    header_len: usize,
    record_len: usize,
    deleted_marker: u8,
    fields: Vec<FieldSpec>,
}

impl RecordLayout {
    /// Create a validated layout.
    pub fn new(header_len: usize, record_len: usize, fields: Vec<FieldSpec>) -> Result<Self> {
        if fields.is_empty() {
            return Err(DbfError::EmptyLayout);
        }
        let mut seen = BTreeSet::new();
        for field in &fields {
            if field.length == 0 {
                return Err(DbfError::ZeroLength {
                    name: field.name.clone(),
                });
            }
            if !seen.insert(field.name.to_ascii_uppercase()) {
                return Err(DbfError::DuplicateField {
                    name: field.name.clone(),
                });
            }
        }
        let required = 1 + fields.iter().map(|field| field.length).sum::<usize>();
        if required > record_len {
            return Err(DbfError::FieldsExceedRecord {
                required,
                record_len,
            });
        }
        Ok(Self {
            header_len,
            record_len,
            deleted_marker: DELETED_MARKER,
            fields,
        })
    }

    /// Layout of the legacy item catalog file.
    pub fn legacy_items() -> Self {
        Self {
            header_len: DEFAULT_HEADER_LEN,
            record_len: DEFAULT_RECORD_LEN,
            deleted_marker: DELETED_MARKER,
            fields: vec![
                FieldSpec::new("GROUP", 4),
                FieldSpec::new("CODE", 10),
                FieldSpec::new("NAME", 250),
                FieldSpec::new("PRICE", 12),
                FieldSpec::new("UNIT", 28),
            ],
        }
    }

    /// Same fields with a different header and record length.
    pub fn with_lengths(&self, header_len: usize, record_len: usize) -> Result<Self> {
        let mut layout = Self::new(header_len, record_len, self.fields.clone())?;
        layout.deleted_marker = self.deleted_marker;
        Ok(layout)
    }

    #[must_use]
    pub fn with_deleted_marker(mut self, marker: u8) -> Self {
        self.deleted_marker = marker;
        self
    }

    pub fn header_len(&self) -> usize {
        self.header_len
    }

    pub fn record_len(&self) -> usize {
        self.record_len
    }

    pub fn deleted_marker(&self) -> u8 {
        self.deleted_marker
    }

    /// Position of a field by case-insensitive name.
    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields
            .iter()
            .position(|field| field.name.eq_ignore_ascii_case(name))
    }

    /// Byte ranges of every field within a record, after the marker byte.
    pub fn field_ranges(&self) -> Vec<std::ops::Range<usize>> {
        let mut offset = 1usize;
        self.fields
            .iter()
            .map(|field| {
                let range = offset..offset + field.length;
                offset += field.length;
                range
            })
            .collect()
    }
}

impl Default for RecordLayout {
    fn default() -> Self {
        Self::legacy_items()
    }
}

/// Which layout fields carry the parts of a [`protocol_model::LegacyRecord`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMapping {
    pub category: String,
    pub item_code: String,
    pub description: String,
    pub rate: String,
    pub unit: String,
}

impl Default for FieldMapping {
    fn default() -> Self {
        Self {
            category: "GROUP".to_string(),
            item_code: "CODE".to_string(),
            description: "NAME".to_string(),
            rate: "PRICE".to_string(),
            unit: "UNIT".to_string(),
        }
    }
}

/// Field mapping resolved to positions within a layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldPositions {
    pub category: usize,
    pub item_code: usize,
    pub description: usize,
    pub rate: usize,
    pub unit: usize,
}

impl FieldMapping {
    pub(crate) fn positions(&self, layout: &RecordLayout) -> Result<FieldPositions> {
        let find = |name: &str| {
            layout
                .field_index(name)
                .ok_or_else(|| DbfError::UnknownField {
                    name: name.to_string(),
                })
        };
        Ok(FieldPositions {
            category: find(&self.category)?,
            item_code: find(&self.item_code)?,
            description: find(&self.description)?,
            rate: find(&self.rate)?,
            unit: find(&self.unit)?,
        })
    }
}
