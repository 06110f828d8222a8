//! Splitting of multi-entry text blobs.

use std::sync::LazyLock;

use regex::Regex;

/// Escaped newline (`\` + `n`), literal newline, or pipe, repeated.
static SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:\\n|\r?\n|\|)+").expect("separator pattern"));

/// Split a blob into trimmed, non-empty segments.
///
/// Runs of separators count as one boundary.
pub fn split_entries(blob: &str) -> Vec<&str> {
    SEPARATORS
        .split(blob)
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_splits_mixed_separators() {
        assert_eq!(split_entries("A\nB|C\n\nD"), vec!["A", "B", "C", "D"]);
    }

    #[test]
    fn test_splits_escaped_newlines() {
        assert_eq!(
            split_entries(r"PARA 500 MG\nFEMARA 2.5 MG\n\n|ZOFRAN"),
            vec!["PARA 500 MG", "FEMARA 2.5 MG", "ZOFRAN"]
        );
    }

    #[test]
    fn test_drops_blank_segments() {
        assert!(split_entries("|| \n \r\n |").is_empty());
        assert!(split_entries("").is_empty());
    }
}
