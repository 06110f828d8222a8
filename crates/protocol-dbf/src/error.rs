//! Error types for legacy table decoding.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when preparing or reading a legacy table.
///
/// Record content never produces an error: malformed and deleted records are
/// skipped and counted in [`crate::DecodeStats`].
#[derive(Debug, Error)]
pub enum DbfError {
    /// File not found.
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Layout declares no fields.
    #[error("record layout must declare at least one field")]
    EmptyLayout,

    /// Field has zero length.
    #[error("field {name} has zero length")]
    ZeroLength { name: String },

    /// Duplicate field name.
    #[error("duplicate field name: {name}")]
    DuplicateField { name: String },

    /// Fields plus the deletion marker do not fit into one record.
    #[error("fields need {required} bytes but records are {record_len} bytes long")]
    FieldsExceedRecord { required: usize, record_len: usize },

    /// Field mapping refers to a field the layout does not declare.
    #[error("field mapping refers to unknown field: {name}")]
    UnknownField { name: String },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for decoder operations.
pub type Result<T> = std::result::Result<T, DbfError>;
