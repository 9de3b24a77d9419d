//! End-to-end scenarios
//!
//! These run through the facade crate only, the way an application would:
//! - fail-fast and collecting chains over the same checks
//! - order-insensitive collection equality
//! - assertions switched off globally
//! - configuration precedence across layers
//! - exception overrides and their required shape
//!
//! Every test holds `GLOBAL_LOCK`: chains read the global layer, and some
//! tests publish one through a `GlobalScope`, which restores it even when
//! an assertion fails.

use std::sync::atomic::{AtomicU32, Ordering};

use parking_lot::{const_mutex, Mutex};
use stipulate::prelude::*;
use stipulate::{
    ConfigLayer, ContractError, ContractException, Eager, ExceptionType, FailureKind,
    GlobalConfiguration, NoOp, StringConverter, ThreadConfiguration, UsageError, Violation,
};
use thiserror::Error;

static GLOBAL_LOCK: Mutex<()> = const_mutex(());

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .try_init();
}

#[derive(Debug, Error)]
#[error("bad request: {message}")]
struct BadRequest {
    message: String,
}

impl ContractException for BadRequest {
    fn from_message(message: String) -> Self {
        BadRequest { message }
    }
}

// === Age Scenario ===

#[test]
fn test_negative_age_fails_fast() {
    let _guard = GLOBAL_LOCK.lock();
    init_tracing();
    let err = require_that(-1i32, "age")
        .without_diff()
        .is_not_negative()
        .unwrap_err();
    assert_eq!(err.kind(), FailureKind::InvalidArgument);
    assert!(err.message().contains("age"));
    assert!(err.message().contains("-1"));
    assert!(!err.message().contains('<'));
    assert!(matches!(
        err.downcast_ref::<ContractError>(),
        Some(ContractError::InvalidArgument { .. })
    ));
}

#[test]
fn test_negative_age_is_collected() {
    let _guard = GLOBAL_LOCK.lock();
    init_tracing();
    let eager = require_that(-1i32, "age")
        .without_diff()
        .is_not_negative()
        .unwrap_err();
    let collector = validate_that(-1i32, "age")
        .without_diff()
        .is_not_negative()
        .into_collector();
    assert_eq!(collector.len(), 1);
    assert_eq!(collector.messages(), vec![eager.message()]);
    assert_eq!(collector.failures()[0].kind(), FailureKind::InvalidArgument);
}

// === Collection Scenario ===

#[test]
fn test_contains_exactly_ignores_order() {
    let _guard = GLOBAL_LOCK.lock();
    assert!(require_that(vec![1, 2, 3], "ids")
        .contains_exactly(&[3, 2, 1])
        .is_ok());
}

#[test]
fn test_contains_exactly_reports_extra_element() {
    let _guard = GLOBAL_LOCK.lock();
    let err = require_that(vec![1, 2, 3], "ids")
        .contains_exactly(&[1, 2])
        .unwrap_err();
    let unwanted = err
        .message()
        .lines()
        .find(|line| line.starts_with("Unwanted"))
        .expect("unwanted line");
    assert!(unwanted.ends_with("[3]"));
}

// === Equivalence Scenario ===

#[test]
fn test_eager_error_matches_first_collected_failure() {
    let _guard = GLOBAL_LOCK.lock();
    let check = |name: &str| -> Result<(), Violation> {
        require_that(name.to_string(), "username")
            .is_not_blank()?
            .starts_with("@")?
            .length()
            .is_less_than_or_equal_to(8usize)?;
        Ok(())
    };
    let collected = validate_that("bob the builder".to_string(), "username")
        .is_not_blank()
        .starts_with("@")
        .length()
        .is_less_than_or_equal_to(8usize)
        .into_collector();

    let err = check("bob the builder").unwrap_err();
    assert_eq!(collected.len(), 2);
    assert_eq!(err.message(), collected.messages()[0]);
    assert_eq!(
        collected.messages()[1],
        "username.length() must be less than or equal to 8.\nActual: 15"
    );
}

// === Assertion Scenario ===

static COMPARISONS: AtomicU32 = AtomicU32::new(0);

#[derive(Debug)]
struct Tripwire;

impl PartialEq for Tripwire {
    fn eq(&self, _other: &Self) -> bool {
        COMPARISONS.fetch_add(1, Ordering::SeqCst);
        false
    }
}

#[test]
fn test_disabled_assertions_do_nothing() {
    let _guard = GLOBAL_LOCK.lock();
    init_tracing();
    let _global = GlobalConfiguration::scoped(ConfigLayer::new().without_assertions());

    let assertion = assert_that(-5i32, "delta");
    assert!(!assertion.is_active());
    let passed = assertion.is_not_negative().and_then(|a| a.is_positive());

    assert!(passed.is_ok());
    assert_eq!(std::mem::size_of::<NoOp<String, Eager>>(), 0);
}

#[test]
fn test_disabled_assertions_never_compare() {
    let _guard = GLOBAL_LOCK.lock();
    let _global = GlobalConfiguration::scoped(ConfigLayer::new().without_assertions());

    let equal = assert_that(Tripwire, "wire").is_equal_to(Tripwire);
    let exact = assert_that(vec![1, 2, 3], "ids").contains_exactly(&[9]);

    assert!(equal.is_ok());
    assert!(exact.is_ok());
    assert_eq!(COMPARISONS.load(Ordering::SeqCst), 0);
}

#[test]
fn test_enabled_assertions_fail_fast() {
    let _guard = GLOBAL_LOCK.lock();
    let _global = GlobalConfiguration::scoped(ConfigLayer::new().with_assertions());

    let err = assert_that(-5i32, "delta").is_not_negative().unwrap_err();
    assert_eq!(err.message(), "delta may not be negative.\nActual: -5");
}

// === Configuration Scenario ===

#[test]
fn test_layer_precedence() {
    let _guard = GLOBAL_LOCK.lock();
    let _global = GlobalConfiguration::scoped(
        ConfigLayer::new()
            .without_diff()
            .add_context("service", "billing")
            .expect("valid context"),
    );

    let global_only = require_that("abc", "code").is_equal_to("abd").unwrap_err();

    let thread_diff = {
        let _scope = ThreadConfiguration::scoped(ConfigLayer::new().with_diff());
        require_that("abc", "code").is_equal_to("abd").unwrap_err()
    };

    let instance_off = {
        let _scope = ThreadConfiguration::scoped(ConfigLayer::new().with_diff());
        require_that("abc", "code")
            .without_diff()
            .is_equal_to("abd")
            .unwrap_err()
    };

    assert_eq!(
        global_only.message(),
        "code had an unexpected value.\nExpected: \"abd\"\nActual  : \"abc\"\nservice : billing"
    );
    assert!(thread_diff.message().contains("Expected: \"ab<d>< >\""));
    assert!(instance_off.message().contains("Expected: \"abd\""));
}

#[test]
fn test_global_update_can_run_checks() {
    let _guard = GLOBAL_LOCK.lock();
    let _global = GlobalConfiguration::scoped(ConfigLayer::new());

    GlobalConfiguration::update(|layer| {
        if require_that(3i32, "retries").is_positive().is_ok() {
            layer.without_diff()
        } else {
            layer
        }
    });

    let err = require_that("abc", "code").is_equal_to("abd").unwrap_err();
    assert!(err.message().contains("Expected: \"abd\""));
}

#[test]
fn test_string_converter_renders_values() {
    let _guard = GLOBAL_LOCK.lock();
    #[derive(Debug, PartialEq)]
    struct Cents(i64);

    let converter = StringConverter::of::<Cents, _>(|c: &Cents| {
        format!("${}.{:02}", c.0 / 100, c.0 % 100)
    });
    let err = require_that(Cents(250), "price")
        .configure(|layer| layer.without_diff().with_string_converter(converter))
        .is_equal_to(Cents(199))
        .unwrap_err();
    assert_eq!(
        err.message(),
        "price had an unexpected value.\nExpected: $1.99\nActual  : $2.50"
    );
}

// === Exception Scenario ===

#[test]
fn test_override_type_is_raised() {
    let _guard = GLOBAL_LOCK.lock();
    let err = require_that(Some(3), "token")
        .with_exception(ExceptionType::of::<BadRequest>())
        .is_null()
        .unwrap_err();
    let bad = err.downcast_ref::<BadRequest>().expect("override applies");
    assert!(bad.message.starts_with("token must be None."));
    assert!(err.to_string().starts_with("bad request: "));
}

#[test]
fn test_override_without_message_constructor_is_rejected() {
    let _guard = GLOBAL_LOCK.lock();
    let result = ExceptionType::builder("Incomplete")
        .cause(|message: String, _cause| BadRequest { message })
        .build();
    assert_eq!(
        result.unwrap_err(),
        UsageError::MissingMessageConstructor("Incomplete".to_string())
    );
}

#[test]
fn test_failure_report_serializes() {
    let _guard = GLOBAL_LOCK.lock();
    let report = validate_that(vec![1, 1], "ids")
        .does_not_contain_duplicates()
        .has_size(3)
        .into_collector()
        .report();
    let json: serde_json::Value =
        serde_json::from_str(&report.to_json().expect("serializable")).expect("valid json");
    let failures = json["failures"].as_array().expect("failure list");
    assert_eq!(failures.len(), 2);
    assert_eq!(failures[0]["kind"], "InvalidArgument");
}
