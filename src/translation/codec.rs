//! Numbered-line wire format.
//!
//! A batch is sent as `[1] first line`, `[2] second line`, ... and the reply
//! is expected to carry the same markers. The markers are the only thing
//! that keeps the translation aligned with the source, so decoding is
//! tolerant: anything that does not resolve to a fresh, in-range index is
//! dropped without error.

use regex::Regex;
use std::sync::LazyLock;

// Content stops at the end of the physical line; `[3] ` followed by a
// newline is an empty entry, not a pointer to the next line.
#[allow(clippy::expect_used)]
static LINE_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    // expect is safe: pattern is a compile-time constant
    Regex::new(r"\[(\d+)\][ \t]*([^\r\n]*)").expect("valid line marker pattern")
});

/// Renders lines as a numbered payload, one `[i] text` entry per line.
pub fn encode<S: AsRef<str>>(lines: &[S]) -> String {
    lines
        .iter()
        .enumerate()
        .map(|(i, line)| format!("[{}] {}", i + 1, line.as_ref()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// A reply decoded against a batch of known size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedReply {
    /// One slot per source line; unfilled slots are empty.
    pub lines: Vec<String>,
    /// Number of distinct slots that received a marker.
    pub filled: usize,
}

impl DecodedReply {
    /// Every slot was filled and no filled slot is blank.
    pub fn is_complete(&self) -> bool {
        self.filled == self.lines.len() && self.lines.iter().all(|line| !line.is_empty())
    }
}

/// Decodes a free-text reply into `expected` slots.
///
/// The first occurrence of each index wins. Index 0, indices past
/// `expected`, and numbers too large to parse are ignored.
pub fn decode(reply: &str, expected: usize) -> DecodedReply {
    let mut lines = vec![String::new(); expected];
    let mut seen = vec![false; expected];
    let mut filled = 0;

    for caps in LINE_MARKER.captures_iter(reply) {
        let Ok(number) = caps[1].parse::<usize>() else {
            continue;
        };
        let Some(slot) = number.checked_sub(1).filter(|&i| i < expected) else {
            continue;
        };
        if seen[slot] {
            continue;
        }
        seen[slot] = true;
        lines[slot] = caps[2].trim().to_string();
        filled += 1;
    }

    DecodedReply { lines, filled }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owned(lines: &[&str]) -> Vec<String> {
        lines.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_encode_numbers_from_one() {
        assert_eq!(encode(&["Hello", "World"]), "[1] Hello\n[2] World");
    }

    #[test]
    fn test_encode_empty_batch() {
        let empty: [&str; 0] = [];
        assert_eq!(encode(&empty), "");
    }

    #[test]
    fn test_decode_restores_order_from_permuted_reply() {
        let source = owned(&["one", "two", "three", "four"]);
        let reply = "[3] three\n[1] one\n[4] four\n[2] two";

        let decoded = decode(reply, source.len());

        assert_eq!(decoded.lines, source);
        assert_eq!(decoded.filled, 4);
        assert!(decoded.is_complete());
    }

    #[test]
    fn test_decode_echo_of_encoded_payload() {
        let source = owned(&["a", "b c", "  padded  "]);
        let decoded = decode(&encode(&source), source.len());
        assert_eq!(decoded.lines, vec!["a", "b c", "padded"]);
        assert!(decoded.is_complete());
    }

    #[test]
    fn test_decode_zero_lines_is_complete() {
        let decoded = decode("anything at all", 0);
        assert!(decoded.lines.is_empty());
        assert!(decoded.is_complete());
    }

    #[test]
    fn test_decode_duplicate_keeps_first() {
        let decoded = decode("[1] first\n[1] second\n[2] other", 2);
        assert_eq!(decoded.lines, vec!["first", "other"]);
        assert_eq!(decoded.filled, 2);
    }

    #[test]
    fn test_decode_ignores_out_of_range() {
        let decoded = decode("[0] zero\n[1] one\n[3] three", 2);
        assert_eq!(decoded.lines, vec!["one", ""]);
        assert_eq!(decoded.filled, 1);
        assert!(!decoded.is_complete());
    }

    #[test]
    fn test_decode_ignores_unparseable_index() {
        let decoded = decode("[99999999999999999999999] big\n[1] one", 1);
        assert_eq!(decoded.lines, vec!["one"]);
        assert_eq!(decoded.filled, 1);
    }

    #[test]
    fn test_decode_empty_content_is_incomplete() {
        let decoded = decode("[1] one\n[2] \n[3] three", 3);
        assert_eq!(decoded.filled, 3);
        assert_eq!(decoded.lines[1], "");
        assert!(!decoded.is_complete());
    }

    #[test]
    fn test_decode_content_does_not_cross_lines() {
        let decoded = decode("[1]\n[2] two", 2);
        assert_eq!(decoded.lines, vec!["", "two"]);
        assert_eq!(decoded.filled, 2);
    }

    #[test]
    fn test_decode_tolerates_missing_space_and_chatter() {
        let reply = "Sure! Here you go:\n[1]Bonjour\n[2]   le monde  \nHope this helps.";
        let decoded = decode(reply, 2);
        assert_eq!(decoded.lines, vec!["Bonjour", "le monde"]);
        assert!(decoded.is_complete());
    }

    #[test]
    fn test_decode_garbage_fills_nothing() {
        let decoded = decode("no markers here [x] [ 1 ]", 3);
        assert_eq!(decoded.filled, 0);
        assert_eq!(decoded.lines, vec!["", "", ""]);
    }

    #[test]
    fn test_decode_excess_entries_do_not_grow_output() {
        let reply: String = (1..=8)
            .map(|i| format!("[{i}] line {i}"))
            .collect::<Vec<_>>()
            .join("\n");
        let decoded = decode(&reply, 3);
        assert_eq!(decoded.lines.len(), 3);
        assert!(decoded.is_complete());
    }

    #[test]
    fn test_decode_crlf_reply() {
        let decoded = decode("[1] one\r\n[2] two\r\n", 2);
        assert_eq!(decoded.lines, vec!["one", "two"]);
    }
}
