//! Tabular spreadsheet input (CSV exports).

use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use csv::ReaderBuilder;
use protocol_model::{DrugCatalogEntry, TradeName};
use tracing::{debug, info};

use crate::dates::parse_sheet_date;
use crate::error::{IngestError, Result};

/// Headers and trimmed cells of a sheet.
#[derive(Debug, Clone, Default)]
pub struct SheetTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

fn normalize_header(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('\u{feff}').trim();
    trimmed.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn normalize_cell(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').to_string()
}

impl SheetTable {
    /// Case-insensitive column lookup on normalized headers.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        let wanted = normalize_header(name);
        self.headers
            .iter()
            .position(|header| header.eq_ignore_ascii_case(&wanted))
    }

    fn require_column(&self, name: &str) -> Result<usize> {
        self.column_index(name)
            .ok_or_else(|| IngestError::MissingColumn {
                name: name.to_string(),
            })
    }
}

fn cell(row: &[String], idx: usize) -> &str {
    row.get(idx).map_or("", String::as_str)
}

/// Read a sheet from any reader. The first non-blank row is the header.
pub fn read_sheet_from_reader<R: Read>(reader: R) -> Result<SheetTable> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);
    let mut records = Vec::new();
    for record in reader.records() {
        let record = record?;
        if record.iter().all(|value| value.trim().is_empty()) {
            continue;
        }
        records.push(record);
    }
    let Some((header_row, data_rows)) = records.split_first() else {
        return Ok(SheetTable::default());
    };
    let headers: Vec<String> = header_row.iter().map(normalize_header).collect();
    let rows: Vec<Vec<String>> = data_rows
        .iter()
        .map(|record| {
            (0..headers.len())
                .map(|idx| record.get(idx).map(normalize_cell).unwrap_or_default())
                .collect::<Vec<String>>()
        })
        .collect();
    Ok(SheetTable { headers, rows })
}

/// Read a sheet file.
pub fn read_sheet(path: &Path) -> Result<SheetTable> {
    let file = File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            IngestError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            IngestError::Io(e)
        }
    })?;
    let table = read_sheet_from_reader(file)?;
    debug!(
        path = %path.display(),
        columns = table.headers.len(),
        rows = table.rows.len(),
        "read sheet"
    );
    Ok(table)
}

/// Column names of a visit sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetColumns {
    pub visit_id: String,
    pub visit_date: String,
    pub medications: String,
}

impl Default for SheetColumns {
    fn default() -> Self {
        Self {
            visit_id: "visit_id".to_string(),
            visit_date: "visit_date".to_string(),
            medications: "medications".to_string(),
        }
    }
}

/// The raw medication blob recorded for one visit.
#[derive(Debug, Clone, PartialEq)]
pub struct VisitMedications {
    pub visit_id: i64,
    pub visit_date: Option<NaiveDate>,
    pub blob: String,
}

#[derive(Debug, Clone, Default)]
pub struct VisitSheet {
    pub visits: Vec<VisitMedications>,
    /// Rows dropped for a missing or non-integer visit id.
    pub skipped: usize,
}

/// Extract visit medication blobs. The date column is optional.
pub fn read_visit_medications(table: &SheetTable, columns: &SheetColumns) -> Result<VisitSheet> {
    let id_idx = table.require_column(&columns.visit_id)?;
    let text_idx = table.require_column(&columns.medications)?;
    let date_idx = table.column_index(&columns.visit_date);

    let mut sheet = VisitSheet::default();
    for row in &table.rows {
        let Ok(visit_id) = cell(row, id_idx).parse::<i64>() else {
            sheet.skipped += 1;
            continue;
        };
        let visit_date = date_idx.and_then(|idx| parse_sheet_date(cell(row, idx)));
        sheet.visits.push(VisitMedications {
            visit_id,
            visit_date,
            blob: cell(row, text_idx).to_string(),
        });
    }
    info!(
        visits = sheet.visits.len(),
        skipped = sheet.skipped,
        "visit sheet loaded"
    );
    Ok(sheet)
}

#[derive(Debug, Clone, Default)]
pub struct CatalogSheet {
    pub entries: Vec<DrugCatalogEntry>,
    /// Rows dropped for a non-integer id or a blank generic name.
    pub skipped: usize,
}

/// Interpret a yes/no cell; blank counts as yes.
pub fn parse_flag(cell: &str) -> bool {
    !matches!(
        cell.trim().to_uppercase().as_str(),
        "N" | "NO" | "FALSE" | "0" | "INACTIVE"
    )
}

fn split_names(cell: &str) -> impl Iterator<Item = &str> {
    cell.split(';').map(str::trim).filter(|name| !name.is_empty())
}

/// Extract drug catalog entries.
///
/// Columns: `drug_id`, `generic_name`, `trade_names` (`;` separated), and
/// the optional `active` and `inactive_trade_names`.
pub fn read_catalog_entries(table: &SheetTable) -> Result<CatalogSheet> {
    let id_idx = table.require_column("drug_id")?;
    let generic_idx = table.require_column("generic_name")?;
    let trade_idx = table.column_index("trade_names");
    let inactive_idx = table.column_index("inactive_trade_names");
    let active_idx = table.column_index("active");

    let mut sheet = CatalogSheet::default();
    for row in &table.rows {
        let generic = cell(row, generic_idx);
        let Ok(id) = cell(row, id_idx).parse::<i64>() else {
            sheet.skipped += 1;
            continue;
        };
        if generic.is_empty() {
            sheet.skipped += 1;
            continue;
        }
        let active = active_idx.is_none_or(|idx| parse_flag(cell(row, idx)));
        let mut entry = DrugCatalogEntry::new(id, generic.to_uppercase()).with_active(active);
        if let Some(idx) = trade_idx {
            for name in split_names(cell(row, idx)) {
                entry = entry.with_trade_name(TradeName::active(name.to_uppercase()));
            }
        }
        if let Some(idx) = inactive_idx {
            for name in split_names(cell(row, idx)) {
                entry = entry.with_trade_name(TradeName::inactive(name.to_uppercase()));
            }
        }
        sheet.entries.push(entry);
    }
    info!(
        drugs = sheet.entries.len(),
        skipped = sheet.skipped,
        "catalog sheet loaded"
    );
    Ok(sheet)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_whitespace_is_normalized() {
        let csv = "\u{feff} visit_id ,  visit   date ,medications\n1,2,3\n";
        let table = read_sheet_from_reader(csv.as_bytes()).unwrap();
        assert_eq!(table.headers, vec!["visit_id", "visit date", "medications"]);
        assert_eq!(table.column_index("VISIT DATE"), Some(1));
        assert_eq!(table.column_index(" Visit_ID "), Some(0));
    }

    #[test]
    fn test_short_rows_are_padded() {
        let table = read_sheet_from_reader("a,b,c\n1\n".as_bytes()).unwrap();
        assert_eq!(table.rows, vec![vec!["1".to_string(), String::new(), String::new()]]);
    }

    #[test]
    fn test_flags() {
        assert!(parse_flag(""));
        assert!(parse_flag("Y"));
        assert!(!parse_flag(" no "));
        assert!(!parse_flag("0"));
    }
}
