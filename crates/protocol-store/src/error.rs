//! Error types for store operations.

use thiserror::Error;

/// Errors that abort a store operation.
///
/// Individual statement failures during re-derivation are not errors; they
/// are collected in the operation's report.
#[derive(Debug, Error)]
pub enum StoreError {
    /// SQLite error.
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Table or column name that cannot be used in generated SQL.
    #[error("invalid SQL identifier: {0:?}")]
    InvalidIdentifier(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Whether an error is a unique or primary-key constraint violation.
pub fn is_duplicate_key(error: &rusqlite::Error) -> bool {
    match error {
        rusqlite::Error::SqliteFailure(failure, _) => {
            failure.code == rusqlite::ErrorCode::ConstraintViolation
                && matches!(
                    failure.extended_code,
                    rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                        | rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
                )
        }
        _ => false,
    }
}

/// Reject anything but plain (optionally schema-qualified) identifiers.
pub(crate) fn check_identifier(name: &str) -> Result<()> {
    let valid = !name.is_empty()
        && name.split('.').all(|part| {
            let mut chars = part.chars();
            chars
                .next()
                .is_some_and(|first| first.is_ascii_alphabetic() || first == '_')
                && chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
        });
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidIdentifier(name.to_string()))
    }
}
