//! Failure records and the deferred-mode collector
//!
//! A [`ValidationFailure`] is the immutable record of one failed check. In
//! collecting mode the records pile up in a [`ValidationFailureCollector`]
//! owned by one chain; nothing is raised until the caller materializes them.

use std::fmt;
use std::panic::Location;

use serde::{Deserialize, Serialize};

use crate::exception::{Cause, ExceptionFactory, ExceptionType, Violation};

/// Which default error a failure maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FailureKind {
    /// The value is present but violates the invariant
    InvalidArgument,
    /// The value is absent
    MissingValue,
    /// Several failures combined into one
    Multiple,
}

impl FailureKind {
    /// Stable name for reports
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::InvalidArgument => "InvalidArgument",
            FailureKind::MissingValue => "MissingValue",
            FailureKind::Multiple => "Multiple",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// ValidationFailure
// ============================================================================

/// One failed check.
#[derive(Debug, Clone)]
pub struct ValidationFailure {
    message: String,
    kind: FailureKind,
    exception: Option<ExceptionType>,
    cause: Option<Cause>,
    location: &'static Location<'static>,
    nested: Vec<ValidationFailure>,
}

impl ValidationFailure {
    /// Create a failure record
    pub fn new(
        kind: FailureKind,
        message: impl Into<String>,
        location: &'static Location<'static>,
    ) -> Self {
        ValidationFailure {
            message: message.into(),
            kind,
            exception: None,
            cause: None,
            location,
            nested: Vec::new(),
        }
    }

    /// Combine several failures into one [`FailureKind::Multiple`] record.
    ///
    /// The combined record reports the location of the first failure.
    pub fn combine(failures: Vec<ValidationFailure>) -> Self {
        let location = failures
            .first()
            .map(|f| f.location)
            .unwrap_or_else(|| Location::caller());
        let mut message = format!("{} validation failures", failures.len());
        for (i, failure) in failures.iter().enumerate() {
            message.push_str(&format!("\n\n{}. {}", i + 1, failure.message));
        }
        ValidationFailure {
            message,
            kind: FailureKind::Multiple,
            exception: None,
            cause: None,
            location,
            nested: failures,
        }
    }

    /// Attach the exception override in force when the check ran
    pub fn with_exception(mut self, exception: Option<ExceptionType>) -> Self {
        self.exception = exception;
        self
    }

    /// Attach the error that caused this failure
    pub fn with_cause(mut self, cause: Cause) -> Self {
        self.cause = Some(cause);
        self
    }

    /// The rendered message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Default error kind
    pub fn kind(&self) -> FailureKind {
        self.kind
    }

    /// Exception override captured at record time
    pub fn exception(&self) -> Option<&ExceptionType> {
        self.exception.as_ref()
    }

    /// Name of the error this failure materializes into
    pub fn exception_name(&self) -> &str {
        match (&self.exception, self.kind) {
            (Some(ty), kind) if kind != FailureKind::Multiple => ty.name(),
            (_, kind) => kind.as_str(),
        }
    }

    /// The wrapped cause, if any
    pub fn cause(&self) -> Option<&Cause> {
        self.cause.as_ref()
    }

    /// Call site of the failing check
    pub fn location(&self) -> &'static Location<'static> {
        self.location
    }

    /// Failures folded into a combined record
    pub fn nested(&self) -> &[ValidationFailure] {
        &self.nested
    }
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

// ============================================================================
// Collector
// ============================================================================

/// How collected failures become errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Materialize {
    /// One violation per failure, in recording order
    Each,
    /// Only the first failure
    First,
    /// A single violation: the failure itself if there is one, a combined
    /// failure if there are several
    Combined,
}

/// Append-only list of failures recorded by one collecting chain.
///
/// # Examples
///
/// ```
/// use std::panic::Location;
/// use stipulate_core::{FailureKind, Materialize, ValidationFailure, ValidationFailureCollector};
///
/// let mut collector = ValidationFailureCollector::new();
/// collector.record(ValidationFailure::new(FailureKind::InvalidArgument, "a is bad", Location::caller()));
/// collector.record(ValidationFailure::new(FailureKind::MissingValue, "b is missing", Location::caller()));
///
/// assert_eq!(collector.messages(), vec!["a is bad", "b is missing"]);
/// assert_eq!(collector.to_exceptions(Materialize::Each).len(), 2);
/// assert_eq!(collector.to_exceptions(Materialize::Combined).len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct ValidationFailureCollector {
    failures: Vec<ValidationFailure>,
    clean_stack_trace: bool,
}

impl Default for ValidationFailureCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl ValidationFailureCollector {
    /// Create an empty collector that materializes without backtraces
    pub fn new() -> Self {
        ValidationFailureCollector {
            failures: Vec::new(),
            clean_stack_trace: true,
        }
    }

    /// Set whether materialized violations omit the full backtrace
    pub fn with_clean_stack_trace(mut self, clean: bool) -> Self {
        self.clean_stack_trace = clean;
        self
    }

    /// Change whether materialized violations omit the full backtrace
    pub fn set_clean_stack_trace(&mut self, clean: bool) {
        self.clean_stack_trace = clean;
    }

    /// Append a failure
    pub fn record(&mut self, failure: ValidationFailure) {
        tracing::trace!(
            target: "stipulate::check",
            kind = %failure.kind(),
            index = self.failures.len(),
            "recorded failure"
        );
        self.failures.push(failure);
    }

    /// Append every failure of another collector, keeping order
    pub fn merge(&mut self, other: ValidationFailureCollector) {
        self.failures.extend(other.failures);
    }

    /// Number of failures recorded
    pub fn len(&self) -> usize {
        self.failures.len()
    }

    /// True if no check failed
    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }

    /// All failures, in recording order
    pub fn failures(&self) -> &[ValidationFailure] {
        &self.failures
    }

    /// Take the failures out of the collector
    pub fn into_failures(self) -> Vec<ValidationFailure> {
        self.failures
    }

    /// Messages of all failures, in recording order
    pub fn messages(&self) -> Vec<&str> {
        self.failures.iter().map(|f| f.message()).collect()
    }

    /// Convert failures into violations without consuming the collector.
    pub fn to_exceptions(&self, policy: Materialize) -> Vec<Violation> {
        let build = |failure: &ValidationFailure| {
            ExceptionFactory::build(failure.clone(), self.clean_stack_trace)
        };
        match policy {
            Materialize::Each => self.failures.iter().map(build).collect(),
            Materialize::First => self.failures.first().map(build).into_iter().collect(),
            Materialize::Combined => match self.failures.len() {
                0 => Vec::new(),
                1 => vec![build(&self.failures[0])],
                _ => vec![ExceptionFactory::build(
                    ValidationFailure::combine(self.failures.clone()),
                    self.clean_stack_trace,
                )],
            },
        }
    }

    /// `Ok` if nothing failed; otherwise the single or combined violation.
    pub fn into_result(self) -> Result<(), Violation> {
        let clean = self.clean_stack_trace;
        let mut failures = self.failures;
        match failures.len() {
            0 => Ok(()),
            1 => Err(ExceptionFactory::build(failures.remove(0), clean)),
            _ => Err(ExceptionFactory::build(
                ValidationFailure::combine(failures),
                clean,
            )),
        }
    }

    /// Serializable snapshot of the failures
    pub fn report(&self) -> FailureReport {
        FailureReport {
            failures: self
                .failures
                .iter()
                .map(|f| FailureEntry {
                    message: f.message().to_string(),
                    kind: f.kind(),
                    exception: f.exception_name().to_string(),
                    location: f.location().to_string(),
                })
                .collect(),
        }
    }
}

// ============================================================================
// Reports
// ============================================================================

/// Serializable list of collected failures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureReport {
    /// Failures in recording order
    pub failures: Vec<FailureEntry>,
}

/// One entry of a [`FailureReport`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureEntry {
    /// Rendered failure message
    pub message: String,
    /// Default error kind
    pub kind: FailureKind,
    /// Name of the error the failure materializes into
    pub exception: String,
    /// `file:line:column` of the failing check
    pub location: String,
}

impl FailureReport {
    /// Pretty-printed JSON rendering
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exception::ContractError;

    fn failure(kind: FailureKind, message: &str) -> ValidationFailure {
        ValidationFailure::new(kind, message, Location::caller())
    }

    fn collector_with(messages: &[&str]) -> ValidationFailureCollector {
        let mut collector = ValidationFailureCollector::new();
        for m in messages {
            collector.record(failure(FailureKind::InvalidArgument, m));
        }
        collector
    }

    // === ValidationFailure Tests ===

    #[test]
    fn test_combine_numbers_messages() {
        let combined = ValidationFailure::combine(vec![
            failure(FailureKind::InvalidArgument, "first"),
            failure(FailureKind::MissingValue, "second"),
        ]);
        assert_eq!(combined.kind(), FailureKind::Multiple);
        assert_eq!(
            combined.message(),
            "2 validation failures\n\n1. first\n\n2. second"
        );
        assert_eq!(combined.nested().len(), 2);
    }

    #[test]
    fn test_exception_name_prefers_override() {
        let plain = failure(FailureKind::MissingValue, "m");
        assert_eq!(plain.exception_name(), "MissingValue");

        let ty = crate::ExceptionType::builder("Rejected")
            .message(|m| ContractError::InvalidArgument {
                message: m,
                cause: None,
            })
            .build()
            .unwrap();
        let overridden = plain.with_exception(Some(ty));
        assert_eq!(overridden.exception_name(), "Rejected");
    }

    // === Collector Tests ===

    #[test]
    fn test_empty_collector() {
        let collector = ValidationFailureCollector::new();
        assert!(collector.is_empty());
        assert!(collector.to_exceptions(Materialize::Each).is_empty());
        assert!(collector.to_exceptions(Materialize::Combined).is_empty());
        assert!(collector.into_result().is_ok());
    }

    #[test]
    fn test_messages_keep_order() {
        let collector = collector_with(&["a", "b", "c"]);
        assert_eq!(collector.len(), 3);
        assert_eq!(collector.messages(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_materialize_policies() {
        let collector = collector_with(&["a", "b"]);

        let each = collector.to_exceptions(Materialize::Each);
        assert_eq!(each.len(), 2);
        assert_eq!(each[1].message(), "b");

        let first = collector.to_exceptions(Materialize::First);
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].message(), "a");

        let combined = collector.to_exceptions(Materialize::Combined);
        assert_eq!(combined.len(), 1);
        assert_eq!(combined[0].kind(), FailureKind::Multiple);

        // Materializing does not drain the collector
        assert_eq!(collector.len(), 2);
    }

    #[test]
    fn test_into_result_single_failure_keeps_kind() {
        let mut collector = ValidationFailureCollector::new();
        collector.record(failure(FailureKind::MissingValue, "x may not be null"));
        let err = collector.into_result().unwrap_err();
        assert_eq!(err.kind(), FailureKind::MissingValue);
        assert_eq!(err.to_string(), "x may not be null");
    }

    #[test]
    fn test_into_result_many_failures_combines() {
        let err = collector_with(&["a", "b"]).into_result().unwrap_err();
        assert_eq!(err.kind(), FailureKind::Multiple);
    }

    #[test]
    fn test_merge_appends_in_order() {
        let mut left = collector_with(&["a"]);
        left.merge(collector_with(&["b", "c"]));
        assert_eq!(left.messages(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_report_serializes_to_json() {
        let report = collector_with(&["age may not be negative."]).report();
        let json = report.to_json().unwrap();
        assert!(json.contains("\"kind\": \"InvalidArgument\""));
        assert!(json.contains("age may not be negative."));

        let parsed: FailureReport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, report);
    }
}
