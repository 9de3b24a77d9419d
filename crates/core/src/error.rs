//! Usage defects
//!
//! A usage defect means the code calling the validation API is wrong: a blank
//! subject name, a context entry without a key, an exception type that cannot
//! be constructed from a message. These are never validation failures.
//! Configuration builders return them as `Err`; check chains raise them as
//! panics, so they can never be mistaken for a [`Violation`](crate::Violation).

use thiserror::Error;

/// Errors caused by misuse of the validation API itself.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UsageError {
    /// A subject or variable name was empty or whitespace
    #[error("name may not be empty")]
    BlankName,

    /// A context entry was added without a key
    #[error("context name may not be empty")]
    BlankContextKey,

    /// A custom exception type was built without a message constructor
    #[error("exception type \"{0}\" does not provide a message constructor")]
    MissingMessageConstructor(String),

    /// A range whose lower bound lies above its upper bound
    #[error("{name}: lower bound ({lower}) may not be greater than upper bound ({upper})")]
    InvertedRange {
        /// Subject the range was checked against
        name: String,
        /// Rendered lower bound
        lower: String,
        /// Rendered upper bound
        upper: String,
    },

    /// A named comparison reused the subject's own name
    #[error("\"{0}\" may not be compared against a value of the same name")]
    NameCollision(String),
}

impl UsageError {
    /// Abort the current check chain.
    ///
    /// Usage defects are programming errors in the caller, so they unwind
    /// instead of flowing through the failure sink.
    #[track_caller]
    pub fn raise(self) -> ! {
        tracing::error!(target: "stipulate::check", error = %self, "usage defect");
        panic!("{self}")
    }
}

/// Reject names that are empty after trimming whitespace.
pub fn require_name(name: &str) -> Result<(), UsageError> {
    if name.trim().is_empty() {
        return Err(UsageError::BlankName);
    }
    Ok(())
}
