//! Correction Response Parser
//!
//! Splits a correction response into (original span, justification) pairs
//! using the bracket-delimited convention: the shortest run of any characters
//! (including line breaks) immediately followed by a `[...]` justification.
//! Whatever trails the last match is kept as a final segment without a
//! justification.
//!
//! Parsing model output is inherently best-effort; the exact non-greedy,
//! DOTALL matching semantics are the contract and are isolated behind this
//! interface.

use regex::Regex;

/// One parsed span of the correction response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorrectionSegment {
    /// Original (possibly corrected) text span
    pub text: String,
    /// Bracket-delimited justification following the span, when present.
    /// `Some("")` for an empty `[]` pair - matched, but empty.
    pub justification: Option<String>,
}

impl CorrectionSegment {
    pub fn justified(text: impl Into<String>, justification: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            justification: Some(justification.into()),
        }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            justification: None,
        }
    }
}

/// Ordered segments parsed from one correction response
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CorrectionResult {
    pub segments: Vec<CorrectionSegment>,
}

impl CorrectionResult {
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Reassemble the exact source text this result was parsed from.
    /// Justifications reappear inside their literal brackets.
    pub fn flatten(&self) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            out.push_str(&segment.text);
            if let Some(justification) = &segment.justification {
                out.push('[');
                out.push_str(justification);
                out.push(']');
            }
        }
        out
    }
}

/// Parser for bracket-justified correction responses
pub struct CorrectionParser {
    pattern: Regex,
}

impl Default for CorrectionParser {
    fn default() -> Self {
        Self::new()
    }
}

impl CorrectionParser {
    pub fn new() -> Self {
        // (?s) makes '.' match newlines; both runs are non-greedy so each
        // justification binds to the nearest preceding span.
        Self {
            pattern: Regex::new(r"(?s)(.*?)\[(.*?)\]").expect("correction pattern is valid"),
        }
    }

    /// Parse a correction response into ordered segments.
    ///
    /// Each match yields one (text, justification) pair. The remaining tail -
    /// matched regions removed - is appended untrimmed as a final segment
    /// with no justification iff it is non-empty after trimming. An unmatched
    /// trailing `[` never closes a justification and stays in the tail.
    pub fn parse(&self, text: &str) -> CorrectionResult {
        let mut segments = Vec::new();
        let mut last_end = 0;

        for captures in self.pattern.captures_iter(text) {
            let whole = captures.get(0).expect("group 0 always present");
            let original = captures.get(1).map(|m| m.as_str()).unwrap_or_default();
            let justification = captures.get(2).map(|m| m.as_str()).unwrap_or_default();

            segments.push(CorrectionSegment::justified(original, justification));
            last_end = whole.end();
        }

        let remainder = &text[last_end..];
        if !remainder.trim().is_empty() {
            segments.push(CorrectionSegment::plain(remainder));
        }

        CorrectionResult { segments }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn parse(text: &str) -> CorrectionResult {
        CorrectionParser::new().parse(text)
    }

    #[test]
    fn test_single_justified_pair_with_remainder() {
        let result = parse("Hola [corrección ortográfica] mundo");

        assert_eq!(result.segments.len(), 2);
        assert_eq!(
            result.segments[0],
            CorrectionSegment::justified("Hola ", "corrección ortográfica")
        );
        // Remainder keeps its leading whitespace
        assert_eq!(result.segments[1], CorrectionSegment::plain(" mundo"));
    }

    #[test]
    fn test_no_brackets_yields_single_plain_segment() {
        let result = parse("sin cambios");

        assert_eq!(result.segments.len(), 1);
        assert_eq!(result.segments[0], CorrectionSegment::plain("sin cambios"));
    }

    #[test]
    fn test_multiple_pairs_preserve_order() {
        let result = parse("uno [a] dos [b] tres");

        assert_eq!(result.segments.len(), 3);
        assert_eq!(result.segments[0], CorrectionSegment::justified("uno ", "a"));
        assert_eq!(
            result.segments[1],
            CorrectionSegment::justified(" dos ", "b")
        );
        assert_eq!(result.segments[2], CorrectionSegment::plain(" tres"));
    }

    #[test]
    fn test_justification_spans_line_breaks() {
        let result = parse("línea una\nlínea dos [cambio\nde ritmo]");

        assert_eq!(result.segments.len(), 1);
        assert_eq!(
            result.segments[0],
            CorrectionSegment::justified("línea una\nlínea dos ", "cambio\nde ritmo")
        );
    }

    #[test]
    fn test_unclosed_bracket_stays_in_remainder() {
        let result = parse("texto [ok] cola [sin cierre");

        assert_eq!(result.segments.len(), 2);
        assert_eq!(
            result.segments[0],
            CorrectionSegment::justified("texto ", "ok")
        );
        assert_eq!(
            result.segments[1],
            CorrectionSegment::plain(" cola [sin cierre")
        );
    }

    #[test]
    fn test_empty_brackets_match_as_empty_justification() {
        let result = parse("hola[] mundo");

        assert_eq!(result.segments[0], CorrectionSegment::justified("hola", ""));
        assert_eq!(result.segments[0].justification, Some(String::new()));
        assert_eq!(result.segments[1], CorrectionSegment::plain(" mundo"));
    }

    #[test]
    fn test_whitespace_only_remainder_is_dropped() {
        let result = parse("hola [x]   \n ");
        assert_eq!(result.segments.len(), 1);
    }

    #[test]
    fn test_empty_input() {
        assert!(parse("").is_empty());
        assert!(parse("   ").is_empty());
    }

    #[test]
    fn test_flatten_reproduces_source() {
        let source = "Hola [corrección] mundo";
        assert_eq!(parse(source).flatten(), source);
    }

    #[test]
    fn test_reparse_of_flattened_text_is_stable() {
        let source = "uno [a]\ndos [b] resto final";
        let first = parse(source);
        let second = parse(&first.flatten());
        assert_eq!(first, second);
    }

    proptest! {
        /// Re-parsing flattened output reproduces the same segmentation for
        /// any bracket-free spans and justifications.
        #[test]
        fn prop_parse_is_idempotent_on_flattened_text(
            pairs in prop::collection::vec(
                ("[^\\[\\]]{1,12}", "[^\\[\\]]{0,12}"),
                0..5
            ),
            tail in "[^\\[\\]]{0,12}",
        ) {
            let mut source = String::new();
            for (text, justification) in &pairs {
                source.push_str(text);
                source.push('[');
                source.push_str(justification);
                source.push(']');
            }
            source.push_str(&tail);

            let first = parse(&source);
            let second = parse(&first.flatten());
            prop_assert_eq!(first, second);
        }
    }
}
