//! Entry points

use crate::dispatch::Assertion;
use crate::sink::{Collecting, Eager};
use crate::verifier::Verifier;

/// Check a value, failing on the first violated requirement.
///
/// Each check returns `Result<_, Violation>`, so a chain composes with `?`.
///
/// # Panics
///
/// If `name` is empty or whitespace.
#[track_caller]
pub fn require_that<T>(value: T, name: impl Into<String>) -> Verifier<T, Eager> {
    Verifier::new(value, name)
}

/// Check a value, recording every violated requirement.
///
/// # Panics
///
/// If `name` is empty or whitespace.
#[track_caller]
pub fn validate_that<T>(value: T, name: impl Into<String>) -> Verifier<T, Collecting> {
    Verifier::new(value, name)
}

/// Check a value only while assertions are enabled.
///
/// With assertions disabled the value is dropped immediately and every check
/// passes without being evaluated.
///
/// # Panics
///
/// If `name` is empty or whitespace.
#[track_caller]
pub fn assert_that<T>(value: T, name: impl Into<String>) -> Assertion<T, Eager> {
    Assertion::new(value, name)
}
