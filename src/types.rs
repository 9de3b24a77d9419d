//! Public types for the stipulate API.
//!
//! This module re-exports types from internal crates with a clean public interface.

// ============================================================================
// Check chains
// ============================================================================

// Subjects and sinks
pub use stipulate_engine::{Assertion, Collecting, Eager, FailureSink, NoOp, Verifier};

// Capability families and the value domains they apply to
pub use stipulate_engine::{
    ComparableChecks, Container, ContainerChecks, Map, MapChecks, NonZeroChecks, NonZeroNumber,
    ObjectChecks, OptionChecks, Outcome, SignedChecks, SignedNumber, Sizable, SizedChecks,
    StringChecks, Subject, Text, UnsignedChecks, UnsignedNumber,
};

// ============================================================================
// Configuration
// ============================================================================

pub use stipulate_core::{
    ConfigLayer, Configuration, GlobalConfiguration, GlobalScope, StringConverter,
    ThreadConfiguration, ThreadScope,
};

// ============================================================================
// Failures and errors
// ============================================================================

pub use stipulate_core::{
    ContractError, ContractException, ExceptionType, ExceptionTypeBuilder, FailureEntry,
    FailureKind, FailureReport, Materialize, UsageError, ValidationFailure,
    ValidationFailureCollector, Violation,
};

// ============================================================================
// Diff rendering
// ============================================================================

pub use stipulate_diff::{DiffResult, Operation, Segment};
