//! Check engine for stipulate
//!
//! This crate turns a value and a name into a chain of checks:
//! - Verifier: the subject of a chain and its single check primitive
//! - Sinks: eager chains stop at the first failure, collecting chains record them all
//! - Capabilities: the families of checks, chosen by the value's type
//! - NoOp / Assertion: chains that can be switched off without evaluating anything
//!
//! ```
//! use stipulate_engine::prelude::*;
//!
//! let v = validate_that(-1i32, "age")
//!     .without_diff()
//!     .is_not_negative()
//!     .is_greater_than(17);
//! assert_eq!(v.failures().len(), 2);
//! assert_eq!(v.messages()[0], "age may not be negative.\nActual: -1");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod capability;
mod checks;
pub mod dispatch;
pub mod entry;
mod message;
pub mod noop;
pub mod sink;
pub mod verifier;

pub use capability::{
    ComparableChecks, Container, ContainerChecks, Map, MapChecks, NonZeroChecks, NonZeroNumber,
    ObjectChecks, OptionChecks, Outcome, SignedChecks, SignedNumber, Sizable, SizedChecks,
    StringChecks, Subject, Text, UnsignedChecks, UnsignedNumber,
};
pub use dispatch::Assertion;
pub use entry::{assert_that, require_that, validate_that};
pub use noop::NoOp;
pub use sink::{Collecting, Eager, FailureSink};
pub use verifier::Verifier;

/// Entry points and every check family, for glob import.
pub mod prelude {
    pub use crate::capability::{
        ComparableChecks, ContainerChecks, MapChecks, NonZeroChecks, ObjectChecks, OptionChecks,
        SignedChecks, SizedChecks, StringChecks, UnsignedChecks,
    };
    pub use crate::entry::{assert_that, require_that, validate_that};
}
