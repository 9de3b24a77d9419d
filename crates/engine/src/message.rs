//! Failure message layout
//!
//! ```text
//! age may not be negative.
//! Actual : -1
//! request: r-17
//! ```
//!
//! A header sentence, then `key: value` lines with the colons aligned. Lines
//! added by the check come first, followed by the configuration's context.

use std::any::Any;
use std::fmt::{Debug, Write};

use smallvec::SmallVec;
use stipulate_core::Configuration;

pub(crate) struct Message<'a> {
    config: &'a Configuration,
    header: String,
    lines: SmallVec<[(String, String); 4]>,
}

impl<'a> Message<'a> {
    pub(crate) fn new(config: &'a Configuration, header: impl Into<String>) -> Self {
        Message {
            config,
            header: header.into(),
            lines: SmallVec::new(),
        }
    }

    pub(crate) fn line(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.lines.push((key.into(), value.into()));
        self
    }

    /// Add an `Actual` line rendering `value`
    pub(crate) fn actual<T: Debug + Any>(self, value: &T) -> Self {
        let rendered = self.config.stringify(value);
        self.line("Actual", rendered)
    }

    /// Add `Expected` and `Actual` lines, bracket-annotated when diffs are
    /// enabled and the renderings differ
    pub(crate) fn comparison(self, expected: String, actual: String) -> Self {
        if self.config.diff_enabled() && expected != actual {
            let diff = stipulate_diff::diff(&expected, &actual);
            self.line("Expected", diff.expected())
                .line("Actual", diff.actual())
        } else {
            self.line("Expected", expected).line("Actual", actual)
        }
    }

    pub(crate) fn build(self) -> String {
        let context = self.config.context();
        let width = self
            .lines
            .iter()
            .chain(context)
            .map(|(key, _)| key.chars().count())
            .max()
            .unwrap_or(0);
        let mut out = self.header;
        for (key, value) in self.lines.iter().chain(context) {
            // Writing to a String cannot fail
            let _ = write!(out, "\n{key:<width$}: {value}");
        }
        out
    }
}

/// Render a sequence of values as `[a, b, c]`
pub(crate) fn list<'v, E>(config: &Configuration, items: impl IntoIterator<Item = &'v E>) -> String
where
    E: Debug + Any + 'v,
{
    let parts: Vec<String> = items.into_iter().map(|item| config.stringify(item)).collect();
    format!("[{}]", parts.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use stipulate_core::{resolve, ConfigLayer};

    fn config(layer: ConfigLayer) -> Configuration {
        resolve(&ConfigLayer::new(), &ConfigLayer::new(), &layer)
    }

    #[test]
    fn test_lines_are_aligned() {
        let config = Configuration::default();
        let text = Message::new(&config, "x had an unexpected value.")
            .line("Expected", "1")
            .line("Actual", "2")
            .build();
        assert_eq!(text, "x had an unexpected value.\nExpected: 1\nActual  : 2");
    }

    #[test]
    fn test_context_follows_check_lines() {
        let config = config(ConfigLayer::new().add_context("request", "r-17").unwrap());
        let text = Message::new(&config, "age may not be negative.")
            .actual(&-1)
            .build();
        assert_eq!(text, "age may not be negative.\nActual : -1\nrequest: r-17");
    }

    #[test]
    fn test_comparison_with_and_without_diff() {
        let config = Configuration::default();
        let text = Message::new(&config, "h")
            .comparison("abc".to_string(), "abd".to_string())
            .build();
        assert_eq!(text, "h\nExpected: ab<c>< >\nActual  : ab< ><d>");

        let config = self::config(ConfigLayer::new().without_diff());
        let text = Message::new(&config, "h")
            .comparison("abc".to_string(), "abd".to_string())
            .build();
        assert_eq!(text, "h\nExpected: abc\nActual  : abd");
    }

    #[test]
    fn test_list_rendering() {
        let config = Configuration::default();
        assert_eq!(list(&config, &[1, 2, 3]), "[1, 2, 3]");
        assert_eq!(list::<i32>(&config, &[]), "[]");
    }
}
