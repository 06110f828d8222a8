//! Free-text clinical medication line parser.

use protocol_model::{LineRule, ParsedFields, RawMedicationLine};
use tracing::trace;

use crate::rules::{LineMatcher, default_matchers};
use crate::segment::split_entries;

/// Ordered list of structural rules applied to each segment.
///
/// Parsing is total: every non-empty segment yields a line, falling back to
/// the whole segment as the name when no rule matches.
pub struct LineParser {
    matchers: Vec<Box<dyn LineMatcher>>,
}

impl Default for LineParser {
    fn default() -> Self {
        Self::new(default_matchers())
    }
}

impl LineParser {
    pub fn new(matchers: Vec<Box<dyn LineMatcher>>) -> Self {
        Self { matchers }
    }

    /// Parse one trimmed, non-empty segment.
    pub fn parse_segment(&self, segment: &str) -> (LineRule, ParsedFields) {
        for matcher in &self.matchers {
            if let Some(fields) = matcher.try_match(segment) {
                return (matcher.rule(), fields);
            }
        }
        (LineRule::Fallback, ParsedFields::name_only(segment))
    }

    /// Split a blob and parse every segment into a line for `visit_id`.
    pub fn parse_blob(&self, visit_id: i64, blob: &str) -> Vec<RawMedicationLine> {
        split_entries(blob)
            .into_iter()
            .map(|segment| {
                let (rule, fields) = self.parse_segment(segment);
                trace!(visit_id, rule = %rule, "parsed medication segment");
                RawMedicationLine {
                    visit_id,
                    verbatim_text: segment.to_string(),
                    rule,
                    fields,
                }
            })
            .collect()
    }
}

/// Parse a blob with the default rules.
pub fn parse_medication_blob(visit_id: i64, blob: &str) -> Vec<RawMedicationLine> {
    LineParser::default().parse_blob(visit_id, blob)
}
