//! Decoder for the superseded fixed-width legacy table format.
//!
//! A file is a fixed-length header followed by fixed-length records. Byte 0
//! of every record is a deletion marker (`*` means deleted); the remaining
//! bytes are split into declared fields. Text is stored in a single-byte
//! Thai encoding and converted to Unicode on the fly.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use protocol_dbf::{FieldMapping, RecordLayout, read_legacy_file};
//!
//! let layout = RecordLayout::legacy_items();
//! let outcome = read_legacy_file(Path::new("items.dbf"), &layout, &FieldMapping::default())
//!     .unwrap();
//! println!("{} records, {} malformed", outcome.records.len(), outcome.stats.malformed);
//! ```

mod error;
mod layout;
mod reader;
mod slices;
pub mod thai;

pub use error::{DbfError, Result};
pub use layout::{
    DEFAULT_HEADER_LEN, DEFAULT_RECORD_LEN, DELETED_MARKER, FieldMapping, FieldSpec, RecordLayout,
};
pub use reader::{
    DecodeOutcome, DecodeStats, DecodedRow, LegacyTable, Rows, decode_legacy_records,
    read_legacy_file,
};
pub use slices::RecordSlices;
