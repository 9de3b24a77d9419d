//! Check chain integration tests
//!
//! These exercise the engine through its public entry points:
//! - eager and collecting chains agree on the first failure
//! - failures point at the caller's line
//! - exception overrides reach eager errors and collected failures
//! - collecting chains merge and materialize in order
//! - full backtraces are captured only when stack cleaning is off

use proptest::prelude::*;
use stipulate_core::{
    ConfigLayer, ContractException, ExceptionType, FailureKind, Materialize, ThreadConfiguration,
};
use stipulate_engine::prelude::*;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("rejected: {0}")]
struct Rejected(String);

impl ContractException for Rejected {
    fn from_message(message: String) -> Self {
        Rejected(message)
    }
}

fn run_eager(value: i64, low: i64, high: i64) -> Option<String> {
    let result = (|| {
        require_that(value, "value")
            .is_not_negative()?
            .is_greater_than_or_equal_to(low)?
            .is_less_than(high)?
            .is_not_zero()?;
        Ok::<_, stipulate_core::Violation>(())
    })();
    result.err().map(|e| e.message().to_string())
}

fn run_collecting(value: i64, low: i64, high: i64) -> Vec<String> {
    validate_that(value, "value")
        .is_not_negative()
        .is_greater_than_or_equal_to(low)
        .is_less_than(high)
        .is_not_zero()
        .messages()
        .into_iter()
        .map(str::to_string)
        .collect()
}

// === Sink Equivalence Tests ===

#[test]
fn test_eager_stops_where_collecting_starts() {
    let eager = run_eager(-5, 0, 10);
    let collected = run_collecting(-5, 0, 10);
    assert_eq!(collected.len(), 2);
    assert_eq!(eager.as_deref(), Some(collected[0].as_str()));
}

proptest! {
    /// The eager error equals the first collected failure, and both agree
    /// on whether anything failed
    #[test]
    fn eager_matches_first_collected(value in -20i64..20, low in -10i64..10, high in -10i64..30) {
        let eager = run_eager(value, low, high);
        let collected = run_collecting(value, low, high);
        prop_assert_eq!(eager, collected.first().cloned());
    }
}

// === Location Tests ===

#[test]
fn test_failure_location_is_the_callers_line() {
    let line = line!() + 1;
    let err = require_that(vec![1, 2], "ids").contains(3).unwrap_err();
    assert_eq!(err.location().file(), file!());
    assert_eq!(err.location().line(), line);
}

#[test]
fn test_collected_location_is_the_callers_line() {
    let v = validate_that("abc", "code");
    let line = line!() + 1;
    let v = v.starts_with("x");
    assert_eq!(v.failures()[0].location().line(), line);
}

#[test]
fn test_eager_backtrace_follows_clean_stack_trace() {
    let clean = require_that(-1i64, "offset").is_positive().unwrap_err();
    assert!(clean.backtrace().is_none());

    let full = require_that(-1i64, "offset")
        .configure(ConfigLayer::without_clean_stack_trace)
        .is_positive()
        .unwrap_err();
    assert!(full.backtrace().is_some());
    assert_eq!(full.message(), clean.message());
}

#[test]
fn test_collected_backtrace_follows_clean_stack_trace() {
    let collector = validate_that(-1i64, "offset")
        .is_positive()
        .configure(ConfigLayer::without_clean_stack_trace)
        .is_zero()
        .into_collector();
    let violations = collector.to_exceptions(Materialize::Each);
    assert_eq!(violations.len(), 2);
    assert!(violations.iter().all(|v| v.backtrace().is_some()));

    let single = validate_that(-1i64, "offset")
        .configure(ConfigLayer::without_clean_stack_trace)
        .is_positive()
        .into_result()
        .unwrap_err();
    assert!(single.backtrace().is_some());

    let clean = validate_that(-1i64, "offset").is_positive().into_result().unwrap_err();
    assert!(clean.backtrace().is_none());
}

// === Exception Override Tests ===

#[test]
fn test_override_reaches_eager_error() {
    let err = require_that(3, "x")
        .with_exception(ExceptionType::of::<Rejected>())
        .is_equal_to(4)
        .unwrap_err();
    let rejected = err.downcast_ref::<Rejected>().expect("override type");
    assert!(rejected.0.starts_with("x had an unexpected value."));
    assert_eq!(err.kind(), FailureKind::InvalidArgument);
}

#[test]
fn test_thread_override_applies_to_new_chains() {
    let _scope =
        ThreadConfiguration::scoped(ConfigLayer::new().with_exception(ExceptionType::of::<Rejected>()));
    let err = require_that("", "title").is_not_empty().unwrap_err();
    assert!(err.to_string().starts_with("rejected: title may not be empty."));

    let v = validate_that("", "title").is_not_empty();
    assert_eq!(v.failures()[0].exception_name(), ExceptionType::of::<Rejected>().name());
}

#[test]
fn test_instance_override_wins_over_thread() {
    let _scope =
        ThreadConfiguration::scoped(ConfigLayer::new().with_exception(ExceptionType::of::<Rejected>()));
    let err = require_that(1, "x")
        .configure(ConfigLayer::with_default_exception)
        .is_equal_to(2)
        .unwrap_err();
    assert!(err.downcast_ref::<Rejected>().is_none());
}

// === Materialization Tests ===

#[test]
fn test_merged_chains_materialize_in_order() {
    let name = validate_that(String::new(), "name").is_not_blank();
    let age = validate_that(-3i32, "age").is_not_negative();
    let collector = name.and(age).into_collector();
    assert_eq!(collector.len(), 2);

    let each = collector.to_exceptions(Materialize::Each);
    assert_eq!(each.len(), 2);
    assert!(each[0].message().starts_with("name may not be blank."));
    assert!(each[1].message().starts_with("age may not be negative."));

    let combined = collector.into_result().unwrap_err();
    assert_eq!(combined.kind(), FailureKind::Multiple);
    assert!(combined.message().starts_with("2 validation failures\n\n1. name"));
}

#[test]
fn test_collecting_into_result_returns_value() {
    let value = validate_that(vec![3, 1, 2], "ids")
        .is_not_empty()
        .does_not_contain_duplicates()
        .into_result()
        .unwrap();
    assert_eq!(value, vec![3, 1, 2]);
}

#[test]
fn test_context_lines_follow_check_lines() {
    let _scope = ThreadConfiguration::scoped(
        ConfigLayer::new().add_context("tenant", "acme").unwrap(),
    );
    let err = require_that(-1i32, "age")
        .with_context("request", "r-17")
        .is_not_negative()
        .unwrap_err();
    assert_eq!(
        err.message(),
        "age may not be negative.\nActual : -1\ntenant : acme\nrequest: r-17"
    );
}
