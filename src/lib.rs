//! Contract validation with fluent checks
//!
//! Name a value, chain the requirements it must meet, and choose what a
//! failure does:
//!
//! - [`require_that`] fails fast: every check returns `Result<_, Violation>`.
//! - [`validate_that`] collects: every failure is recorded and the chain
//!   keeps going, so one pass reports all violations.
//! - [`assert_that`] is a fail-fast chain that becomes a no-op when
//!   assertions are disabled.
//!
//! ```
//! use stipulate::prelude::*;
//!
//! fn parse_port(port: i64) -> Result<u16, stipulate::Violation> {
//!     let port = require_that(port, "port").is_between_closed(1, 65535)?.into_value();
//!     Ok(port as u16)
//! }
//!
//! assert_eq!(parse_port(8080).unwrap(), 8080);
//! let err = parse_port(0).unwrap_err();
//! assert_eq!(err.message(), "port must be in the range [1, 65535].\nActual: 0");
//! ```
//!
//! Failure messages render values with `Debug`, or with a
//! [`StringConverter`] registered for the exact type. Failed equality
//! checks show a bracketed diff of the two renderings unless diffs are
//! turned off. Settings come from three layers, resolved once per chain:
//! [`GlobalConfiguration`], [`ThreadConfiguration`], and the chain's own
//! adjustments.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod types;

pub use types::*;

pub use stipulate_diff::diff;
pub use stipulate_engine::{assert_that, require_that, validate_that};

/// Entry points and every check family, for glob import.
pub mod prelude {
    pub use stipulate_engine::prelude::*;
}
