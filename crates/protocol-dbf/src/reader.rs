//! Legacy table reader.
//!
//! Decodes fixed-width records into field rows and [`LegacyRecord`]s.

use std::fs::File;
use std::io::{BufReader, Read};
use std::ops::Range;
use std::path::Path;

use protocol_model::LegacyRecord;
use tracing::{debug, info, info_span, warn};

use crate::error::{DbfError, Result};
use crate::layout::{FieldMapping, RecordLayout};
use crate::slices::RecordSlices;
use crate::thai::decode_field;

/// Counters reported after decoding a table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodeStats {
    /// Complete records found after the header.
    pub record_slots: usize,
    /// Records carrying the deletion marker.
    pub deleted: usize,
    /// Records dropped for a missing or invalid key field.
    pub malformed: usize,
    /// Records converted successfully.
    pub emitted: usize,
    /// Bytes replaced with the placeholder character.
    pub placeholders: usize,
    /// Bytes after the last complete record.
    pub trailing_bytes: usize,
}

impl DecodeStats {
    pub fn has_issues(&self) -> bool {
        self.malformed > 0 || self.placeholders > 0
    }
}

/// One live record decoded into text fields.
#[derive(Debug, Clone)]
pub struct DecodedRow<'a> {
    layout: &'a RecordLayout,
    /// Zero-based position of the record in the file, deleted ones included.
    pub index: usize,
    pub values: Vec<String>,
}

impl DecodedRow<'_> {
    /// Field value by case-insensitive name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.layout
            .field_index(name)
            .and_then(|idx| self.values.get(idx))
            .map(String::as_str)
    }
}

/// Iterator over live records; deleted records are skipped and counted.
pub struct Rows<'a> {
    slices: RecordSlices<'a>,
    layout: &'a RecordLayout,
    ranges: Vec<Range<usize>>,
    index: usize,
    stats: DecodeStats,
}

impl<'a> Rows<'a> {
    /// Counters accumulated so far.
    pub fn stats(&self) -> DecodeStats {
        self.stats
    }
}

impl<'a> Iterator for Rows<'a> {
    type Item = DecodedRow<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let record = self.slices.next()?;
            let index = self.index;
            self.index += 1;
            self.stats.record_slots += 1;
            if record.first() == Some(&self.layout.deleted_marker()) {
                self.stats.deleted += 1;
                continue;
            }
            let mut values = Vec::with_capacity(self.ranges.len());
            for range in &self.ranges {
                let decoded = decode_field(&record[range.clone()]);
                self.stats.placeholders += decoded.placeholders;
                values.push(decoded.text);
            }
            return Some(DecodedRow {
                layout: self.layout,
                index,
                values,
            });
        }
    }
}

/// A legacy table backed by an in-memory buffer.
///
/// Holds no iteration state; every call to [`LegacyTable::rows`] starts over.
#[derive(Debug, Clone, Copy)]
pub struct LegacyTable<'a> {
    data: &'a [u8],
    layout: &'a RecordLayout,
}

/// Records converted from a table plus the counters gathered on the way.
#[derive(Debug, Clone, Default)]
pub struct DecodeOutcome {
    pub records: Vec<LegacyRecord>,
    pub stats: DecodeStats,
}

impl<'a> LegacyTable<'a> {
    pub fn new(data: &'a [u8], layout: &'a RecordLayout) -> Self {
        Self { data, layout }
    }

    /// Raw fixed-size record slices, deleted records included.
    pub fn slices(&self) -> RecordSlices<'a> {
        RecordSlices::new(self.data, self.layout.header_len(), self.layout.record_len())
    }

    /// Live records decoded into text fields.
    pub fn rows(&self) -> Rows<'a> {
        let slices = self.slices();
        let stats = DecodeStats {
            trailing_bytes: slices.trailing_len(),
            ..DecodeStats::default()
        };
        Rows {
            slices,
            layout: self.layout,
            ranges: self.layout.field_ranges(),
            index: 0,
            stats,
        }
    }

    /// Convert every live record into a [`LegacyRecord`].
    ///
    /// Only a mapping that names fields missing from the layout is an error;
    /// content problems are skipped and counted.
    pub fn decode_records(&self, mapping: &FieldMapping) -> Result<DecodeOutcome> {
        let positions = mapping.positions(self.layout)?;
        let span = info_span!(
            "decode",
            header_len = self.layout.header_len(),
            record_len = self.layout.record_len()
        );
        let _guard = span.enter();

        let mut rows = self.rows();
        let mut records = Vec::new();
        let mut malformed = 0usize;
        for row in rows.by_ref() {
            let value = |idx: usize| row.values.get(idx).map_or("", String::as_str);
            match LegacyRecord::from_fields(
                value(positions.category),
                value(positions.item_code),
                value(positions.description),
                value(positions.rate),
                value(positions.unit),
            ) {
                Ok(record) => records.push(record),
                Err(error) => {
                    malformed += 1;
                    debug!(record_index = row.index, %error, "skipping malformed record");
                }
            }
        }

        let mut stats = rows.stats();
        stats.malformed = malformed;
        stats.emitted = records.len();
        log_stats(&stats);
        Ok(DecodeOutcome { records, stats })
    }
}

fn log_stats(stats: &DecodeStats) {
    if stats.has_issues() {
        warn!(
            record_slots = stats.record_slots,
            deleted = stats.deleted,
            malformed = stats.malformed,
            emitted = stats.emitted,
            placeholders = stats.placeholders,
            trailing_bytes = stats.trailing_bytes,
            "decode finished with skipped records or unmapped bytes"
        );
    } else {
        info!(
            record_slots = stats.record_slots,
            deleted = stats.deleted,
            emitted = stats.emitted,
            trailing_bytes = stats.trailing_bytes,
            "decode complete"
        );
    }
}

/// Decode a buffer with the given layout and mapping.
pub fn decode_legacy_records(
    data: &[u8],
    layout: &RecordLayout,
    mapping: &FieldMapping,
) -> Result<DecodeOutcome> {
    LegacyTable::new(data, layout).decode_records(mapping)
}

/// Read a legacy table file fully and decode it.
pub fn read_legacy_file(
    path: &Path,
    layout: &RecordLayout,
    mapping: &FieldMapping,
) -> Result<DecodeOutcome> {
    let data = read_all_bytes(path)?;
    decode_legacy_records(&data, layout, mapping)
}

fn read_all_bytes(path: &Path) -> Result<Vec<u8>> {
    let file = File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            DbfError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            DbfError::Io(e)
        }
    })?;
    let mut data = Vec::new();
    BufReader::new(file).read_to_end(&mut data)?;
    Ok(data)
}
