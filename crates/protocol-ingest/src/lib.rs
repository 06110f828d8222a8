//! Ingestion of free-text medication entries and spreadsheet exports.
//!
//! - [`segment`] splits multi-entry blobs on escaped newlines, newlines and pipes.
//! - [`rules`] holds the ordered structural matchers for one segment.
//! - [`medication`] combines both into a total line parser.
//! - [`sheet`] and [`dates`] read CSV exports of the source spreadsheets.

pub mod dates;
pub mod error;
pub mod medication;
pub mod rules;
pub mod segment;
pub mod sheet;

pub use dates::{SERIAL_UNIX_EPOCH_OFFSET, parse_sheet_date, serial_to_date};
pub use error::{IngestError, Result};
pub use medication::{LineParser, parse_medication_blob};
pub use rules::{
    CodeName, CodeNameQuantityUnit, Fallback, LineMatcher, NameQuantityUnit, default_matchers,
};
pub use segment::split_entries;
pub use sheet::{
    CatalogSheet, SheetColumns, SheetTable, VisitMedications, VisitSheet, parse_flag,
    read_catalog_entries, read_sheet, read_sheet_from_reader, read_visit_medications,
};
