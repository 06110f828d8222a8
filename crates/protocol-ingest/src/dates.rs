//! Date cells from spreadsheet exports.
//!
//! Spreadsheet dates arrive either as text or as a day-count serial. Serial
//! day 0 is 1899-12-30, which puts the Unix epoch at serial
//! [`SERIAL_UNIX_EPOCH_OFFSET`].

use chrono::{NaiveDate, TimeDelta};

/// Serial day number of 1970-01-01.
pub const SERIAL_UNIX_EPOCH_OFFSET: i64 = 25_569;

/// Convert a day-count serial to a calendar date. Any time fraction is dropped.
pub fn serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() {
        return None;
    }
    let days = serial.floor() as i64 - SERIAL_UNIX_EPOCH_OFFSET;
    NaiveDate::from_ymd_opt(1970, 1, 1)?.checked_add_signed(TimeDelta::try_days(days)?)
}

/// Parse a date cell: ISO `YYYY-MM-DD`, `DD/MM/YYYY`, or a serial number.
pub fn parse_sheet_date(cell: &str) -> Option<NaiveDate> {
    let trimmed = cell.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%d/%m/%Y") {
        return Some(date);
    }
    trimmed.parse::<f64>().ok().and_then(serial_to_date)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serial_epochs() {
        assert_eq!(serial_to_date(0.0), NaiveDate::from_ymd_opt(1899, 12, 30));
        assert_eq!(
            serial_to_date(SERIAL_UNIX_EPOCH_OFFSET as f64),
            NaiveDate::from_ymd_opt(1970, 1, 1)
        );
        assert_eq!(serial_to_date(45292.75), NaiveDate::from_ymd_opt(2024, 1, 1));
    }

    #[test]
    fn test_parses_text_formats() {
        let expected = NaiveDate::from_ymd_opt(2019, 3, 7);
        assert_eq!(parse_sheet_date("2019-03-07"), expected);
        assert_eq!(parse_sheet_date(" 07/03/2019 "), expected);
        assert_eq!(parse_sheet_date(""), None);
        assert_eq!(parse_sheet_date("soon"), None);
        assert_eq!(parse_sheet_date("NaN"), None);
    }
}
