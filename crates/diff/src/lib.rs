//! Readable differences between expected and actual values
//!
//! Failure messages for equality checks show where two renderings differ:
//!
//! ```text
//! Expected: hello <world><     >
//! Actual  : hello <     ><there>
//! ```
//!
//! The pipeline is a character-level Myers diff, a semantic cleanup that
//! merges fragmented edits, and bracket rendering. Strings are diffed as one
//! sequence; multi-line input is not split into lines.
//!
//! # Example
//!
//! ```
//! use stipulate_diff::{diff, Operation};
//!
//! let result = diff("hello world", "hello there");
//! assert_eq!(result.expected(), "hello <world><     >");
//! assert_eq!(result.actual(), "hello <     ><there>");
//! assert_eq!(result.segments()[0].op, Operation::Equal);
//!
//! assert!(diff("same", "same").is_unchanged());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod cleanup;
mod myers;
mod render;

/// A run of one operation, as chars, while the script is being cleaned up
pub(crate) type Chunk = (Operation, Vec<char>);

/// Edit operation of a diff segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Text present on both sides
    Equal,
    /// Text present only in the actual value
    Insert,
    /// Text present only in the expected value
    Delete,
}

/// A run of text sharing one operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// The operation
    pub op: Operation,
    /// The text it applies to
    pub text: String,
}

impl Segment {
    /// Create a segment
    pub fn new(op: Operation, text: impl Into<String>) -> Self {
        Segment {
            op,
            text: text.into(),
        }
    }
}

/// Result of diffing an expected and an actual rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffResult {
    segments: Vec<Segment>,
    expected: String,
    actual: String,
}

impl DiffResult {
    /// Segments in order; empty when both inputs are equal
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Expected value with deletions bracketed
    pub fn expected(&self) -> &str {
        &self.expected
    }

    /// Actual value with insertions bracketed
    pub fn actual(&self) -> &str {
        &self.actual
    }

    /// True if the inputs were equal
    pub fn is_unchanged(&self) -> bool {
        self.segments.is_empty()
    }

    /// Number of inserted or deleted segments
    pub fn edit_count(&self) -> usize {
        self.segments
            .iter()
            .filter(|s| s.op != Operation::Equal)
            .count()
    }
}

/// Diff two renderings.
///
/// Deterministic for a given pair. Equal inputs produce no segments and are
/// returned unannotated.
pub fn diff(expected: &str, actual: &str) -> DiffResult {
    if expected == actual {
        return DiffResult {
            segments: Vec::new(),
            expected: expected.to_string(),
            actual: actual.to_string(),
        };
    }

    let a: Vec<char> = expected.chars().collect();
    let b: Vec<char> = actual.chars().collect();
    let mut chunks = myers::edit_script(&a, &b);
    cleanup::merge(&mut chunks);
    cleanup::semantic(&mut chunks);

    let segments: Vec<Segment> = chunks
        .into_iter()
        .map(|(op, text)| Segment {
            op,
            text: text.into_iter().collect(),
        })
        .collect();
    let (expected, actual) = render::render(&segments);
    DiffResult {
        segments,
        expected,
        actual,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // === Rendering Tests ===

    #[test]
    fn test_replaced_word() {
        let result = diff("hello world", "hello there");
        assert_eq!(
            result.segments(),
            &[
                Segment::new(Operation::Equal, "hello "),
                Segment::new(Operation::Delete, "world"),
                Segment::new(Operation::Insert, "there"),
            ]
        );
        assert_eq!(result.expected(), "hello <world><     >");
        assert_eq!(result.actual(), "hello <     ><there>");
    }

    #[test]
    fn test_single_char_change() {
        let result = diff("abc", "abd");
        assert_eq!(result.expected(), "ab<c>< >");
        assert_eq!(result.actual(), "ab< ><d>");
        assert_eq!(result.edit_count(), 2);
    }

    #[test]
    fn test_pure_insertion() {
        let result = diff("ac", "abc");
        assert_eq!(result.expected(), "a< >c");
        assert_eq!(result.actual(), "a<b>c");
    }

    #[test]
    fn test_empty_sides() {
        let result = diff("", "x");
        assert_eq!(result.expected(), "< >");
        assert_eq!(result.actual(), "<x>");

        let result = diff("x", "");
        assert_eq!(result.expected(), "<x>");
        assert_eq!(result.actual(), "< >");
    }

    #[test]
    fn test_equal_inputs_skip_rendering() {
        let result = diff("same", "same");
        assert!(result.is_unchanged());
        assert_eq!(result.edit_count(), 0);
        assert_eq!(result.expected(), "same");
        assert_eq!(result.actual(), "same");
    }

    #[test]
    fn test_case_only_difference() {
        let result = diff("Name", "name");
        assert_eq!(result.expected(), "<N>< >ame");
        assert_eq!(result.actual(), "< ><n>ame");
    }

    #[test]
    fn test_multiline_is_one_sequence() {
        let result = diff("a\nb", "a\nc");
        assert_eq!(result.expected(), "a\n<b>< >");
        assert_eq!(result.actual(), "a\n< ><c>");
    }
}
