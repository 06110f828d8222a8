//! Lazy fixed-size record slicing.

/// Iterator over consecutive fixed-size records of a byte buffer.
///
/// Stops as soon as fewer than `record_len` bytes remain; the remainder is
/// never yielded. Cloning restarts from the current position, and a fresh
/// iterator can always be built from the same buffer.
#[derive(Debug, Clone)]
pub struct RecordSlices<'a> {
    data: &'a [u8],
    record_len: usize,
    offset: usize,
}

impl<'a> RecordSlices<'a> {
    /// Slice `data` after skipping `header_len` bytes.
    ///
    /// A buffer shorter than the header yields nothing.
    pub fn new(data: &'a [u8], header_len: usize, record_len: usize) -> Self {
        let body = data.get(header_len..).unwrap_or_default();
        Self {
            data: body,
            record_len,
            offset: 0,
        }
    }

    /// Bytes left over after the last complete record.
    pub fn trailing_len(&self) -> usize {
        if self.record_len == 0 {
            return self.data.len();
        }
        self.data.len() % self.record_len
    }
}

impl<'a> Iterator for RecordSlices<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<Self::Item> {
        if self.record_len == 0 {
            return None;
        }
        let end = self.offset.checked_add(self.record_len)?;
        let record = self.data.get(self.offset..end)?;
        self.offset = end;
        Some(record)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = if self.record_len == 0 {
            0
        } else {
            (self.data.len() - self.offset) / self.record_len
        };
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for RecordSlices<'_> {}
