//! Legacy single-byte Thai text decoding.
//!
//! | Byte range | Output |
//! |------------|--------|
//! | `0x00..=0x7F` | ASCII |
//! | `0xA1..=0xFB` | `U+0E01 + (byte - 0xA1)` |
//! | anything else | [`PLACEHOLDER`] |
//!
//! Inside a field, control bytes left after trimming are replaced with
//! [`PLACEHOLDER`] as well.

/// First byte of the Thai block.
pub const THAI_FIRST_BYTE: u8 = 0xA1;
/// Last byte of the Thai block.
pub const THAI_LAST_BYTE: u8 = 0xFB;
/// Code point the first Thai byte maps to.
pub const THAI_BASE_CODE_POINT: u32 = 0x0E01;
/// Substituted for bytes outside the known ranges.
pub const PLACEHOLDER: char = char::REPLACEMENT_CHARACTER;

/// Decode one byte. Returns `None` when the byte has no mapping.
#[must_use]
pub fn decode_byte(byte: u8) -> Option<char> {
    match byte {
        0x00..=0x7F => Some(char::from(byte)),
        THAI_FIRST_BYTE..=THAI_LAST_BYTE => {
            char::from_u32(THAI_BASE_CODE_POINT + u32::from(byte - THAI_FIRST_BYTE))
        }
        _ => None,
    }
}

/// Decoded text plus the number of bytes replaced by [`PLACEHOLDER`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedText {
    pub text: String,
    pub placeholders: usize,
}

/// Decode a byte slice. Never fails.
#[must_use]
pub fn decode_bytes(bytes: &[u8]) -> DecodedText {
    let mut text = String::with_capacity(bytes.len());
    let mut placeholders = 0usize;
    for &byte in bytes {
        match decode_byte(byte) {
            Some(ch) => text.push(ch),
            None => {
                placeholders += 1;
                text.push(PLACEHOLDER);
            }
        }
    }
    DecodedText { text, placeholders }
}

/// Decode a field, trim its padding (spaces and NULs) and replace interior
/// control characters with [`PLACEHOLDER`].
#[must_use]
pub fn decode_field(bytes: &[u8]) -> DecodedText {
    let decoded = decode_bytes(bytes);
    let trimmed = decoded
        .text
        .trim_matches(|ch: char| ch == '\0' || ch.is_whitespace());
    let mut placeholders = decoded.placeholders;
    let text = trimmed
        .chars()
        .map(|ch| {
            if ch.is_ascii_control() {
                placeholders += 1;
                PLACEHOLDER
            } else {
                ch
            }
        })
        .collect();
    DecodedText { text, placeholders }
}
