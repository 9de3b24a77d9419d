//! Bracket rendering
//!
//! Deleted text is bracketed in the expected rendering, inserted text in the
//! actual rendering. The opposite side gets brackets around blanks of the
//! same width, so the two renderings line up column for column.

use crate::{Operation, Segment};

const OPEN: char = '<';
const CLOSE: char = '>';

fn bracket(out: &mut String, text: &str) {
    out.push(OPEN);
    out.push_str(text);
    out.push(CLOSE);
}

fn filler(out: &mut String, width: usize) {
    out.push(OPEN);
    out.extend(std::iter::repeat(' ').take(width));
    out.push(CLOSE);
}

/// Render `(expected, actual)` from diff segments.
pub(crate) fn render(segments: &[Segment]) -> (String, String) {
    let mut expected = String::new();
    let mut actual = String::new();
    for segment in segments {
        let width = segment.text.chars().count();
        match segment.op {
            Operation::Equal => {
                expected.push_str(&segment.text);
                actual.push_str(&segment.text);
            }
            Operation::Delete => {
                bracket(&mut expected, &segment.text);
                filler(&mut actual, width);
            }
            Operation::Insert => {
                filler(&mut expected, width);
                bracket(&mut actual, &segment.text);
            }
        }
    }
    (expected, actual)
}
