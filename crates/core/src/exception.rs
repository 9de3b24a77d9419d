//! Exception construction
//!
//! Every failed check ends in an error value built here. The failure carries a
//! [`FailureKind`]; the effective configuration may replace the default error
//! for that kind with a caller-supplied [`ExceptionType`].
//!
//! # Constructor shape
//!
//! An exception type must be constructible from a message, and may also accept
//! a message plus a causal error. Types implementing [`ContractException`] get
//! this checked by the compiler. Types assembled from closures through
//! [`ExceptionType::builder`] are checked when the builder is finished.
//!
//! # Location
//!
//! The failure location is the caller's own call site, captured through
//! `#[track_caller]`, so no frames of this library appear in it. When frame
//! cleaning is disabled the factory additionally captures a full
//! [`Backtrace`], library frames included.

use std::any::{self, TypeId};
use std::backtrace::Backtrace;
use std::error::Error;
use std::fmt;
use std::panic::Location;
use std::sync::Arc;

use thiserror::Error;

use crate::error::UsageError;
use crate::failure::{FailureKind, ValidationFailure};

/// A causal error wrapped by a failure
pub type Cause = Arc<dyn Error + Send + Sync + 'static>;

/// A constructed exception instance
pub type BoxError = Box<dyn Error + Send + Sync + 'static>;

type MessageCtor = dyn Fn(String) -> BoxError + Send + Sync;
type CauseCtor = dyn Fn(String, Cause) -> BoxError + Send + Sync;

// ============================================================================
// Exception types
// ============================================================================

/// An error type that check failures can be converted into.
///
/// # Examples
///
/// ```
/// use stipulate_core::{ContractException, ExceptionType};
///
/// #[derive(Debug, thiserror::Error)]
/// #[error("rejected: {0}")]
/// struct Rejected(String);
///
/// impl ContractException for Rejected {
///     fn from_message(message: String) -> Self {
///         Rejected(message)
///     }
/// }
///
/// let ty = ExceptionType::of::<Rejected>();
/// let err = ty.construct("x must be positive".to_string(), None);
/// assert_eq!(err.to_string(), "rejected: x must be positive");
/// ```
pub trait ContractException: Error + Send + Sync + Sized + 'static {
    /// Build the error from a failure message
    fn from_message(message: String) -> Self;

    /// Build the error from a failure message and the error that caused it.
    ///
    /// Types that cannot hold a cause keep the default, which drops it.
    fn from_message_and_cause(message: String, cause: Cause) -> Self {
        let _ = cause;
        Self::from_message(message)
    }
}

/// A registered exception constructor, used to override the default error of
/// every failure kind except [`FailureKind::Multiple`].
#[derive(Clone)]
pub struct ExceptionType {
    name: Arc<str>,
    origin: Option<TypeId>,
    message: Arc<MessageCtor>,
    cause: Option<Arc<CauseCtor>>,
}

impl ExceptionType {
    /// Register a type implementing [`ContractException`].
    pub fn of<E: ContractException>() -> Self {
        ExceptionType {
            name: Arc::from(any::type_name::<E>()),
            origin: Some(TypeId::of::<E>()),
            message: Arc::new(|message| Box::new(E::from_message(message)) as BoxError),
            cause: Some(Arc::new(|message, cause| {
                Box::new(E::from_message_and_cause(message, cause)) as BoxError
            })),
        }
    }

    /// Assemble an exception type from constructor closures.
    pub fn builder(name: impl Into<String>) -> ExceptionTypeBuilder {
        ExceptionTypeBuilder {
            name: name.into(),
            message: None,
            cause: None,
        }
    }

    /// Name used in logs and reports
    pub fn name(&self) -> &str {
        &self.name
    }

    /// True if a cause constructor is registered
    pub fn accepts_cause(&self) -> bool {
        self.cause.is_some()
    }

    /// Build an instance.
    ///
    /// The cause constructor is used only when a cause is present and one is
    /// registered; otherwise the message constructor is used.
    pub fn construct(&self, message: String, cause: Option<Cause>) -> BoxError {
        match (cause, &self.cause) {
            (Some(cause), Some(ctor)) => ctor(message, cause),
            _ => (self.message)(message),
        }
    }
}

impl PartialEq for ExceptionType {
    fn eq(&self, other: &Self) -> bool {
        match (self.origin, other.origin) {
            (Some(a), Some(b)) => a == b,
            _ => Arc::ptr_eq(&self.message, &other.message),
        }
    }
}

impl fmt::Debug for ExceptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExceptionType")
            .field("name", &self.name)
            .field("accepts_cause", &self.accepts_cause())
            .finish()
    }
}

/// Builder for closure-based exception types.
pub struct ExceptionTypeBuilder {
    name: String,
    message: Option<Arc<MessageCtor>>,
    cause: Option<Arc<CauseCtor>>,
}

impl ExceptionTypeBuilder {
    /// Set the required message constructor
    pub fn message<E, F>(mut self, ctor: F) -> Self
    where
        E: Error + Send + Sync + 'static,
        F: Fn(String) -> E + Send + Sync + 'static,
    {
        self.message = Some(Arc::new(move |message| Box::new(ctor(message)) as BoxError));
        self
    }

    /// Set the optional message-and-cause constructor
    pub fn cause<E, F>(mut self, ctor: F) -> Self
    where
        E: Error + Send + Sync + 'static,
        F: Fn(String, Cause) -> E + Send + Sync + 'static,
    {
        self.cause = Some(Arc::new(move |message, cause| {
            Box::new(ctor(message, cause)) as BoxError
        }));
        self
    }

    /// Finish the type.
    ///
    /// # Errors
    ///
    /// [`UsageError::MissingMessageConstructor`] if no message constructor was set.
    pub fn build(self) -> Result<ExceptionType, UsageError> {
        let message = self
            .message
            .ok_or_else(|| UsageError::MissingMessageConstructor(self.name.clone()))?;
        Ok(ExceptionType {
            name: Arc::from(self.name),
            origin: None,
            message,
            cause: self.cause,
        })
    }
}

// ============================================================================
// Default errors
// ============================================================================

/// Errors produced when no exception override is configured.
#[derive(Debug, Error)]
pub enum ContractError {
    /// A value did not satisfy a declared invariant
    #[error("{message}")]
    InvalidArgument {
        /// Rendered failure message
        message: String,
        /// Error that caused the failure, if any
        #[source]
        cause: Option<Cause>,
    },

    /// A required value was absent
    #[error("{message}")]
    MissingValue {
        /// Rendered failure message
        message: String,
        /// Error that caused the failure, if any
        #[source]
        cause: Option<Cause>,
    },

    /// Several failures materialized together
    #[error("{message}")]
    Multiple {
        /// Combined message of every failure
        message: String,
        /// The individual failures, in recording order
        failures: Vec<ValidationFailure>,
    },
}

impl ContractError {
    /// The failure kind this error represents
    pub fn kind(&self) -> FailureKind {
        match self {
            ContractError::InvalidArgument { .. } => FailureKind::InvalidArgument,
            ContractError::MissingValue { .. } => FailureKind::MissingValue,
            ContractError::Multiple { .. } => FailureKind::Multiple,
        }
    }
}

// ============================================================================
// Violation
// ============================================================================

/// A failed check, materialized into an error.
///
/// Returned by eager check chains and by
/// [`ValidationFailureCollector::to_exceptions`](crate::ValidationFailureCollector::to_exceptions).
#[derive(Debug)]
pub struct Violation {
    failure: ValidationFailure,
    error: BoxError,
    backtrace: Option<Backtrace>,
}

impl Violation {
    /// The failure record this violation was built from
    pub fn failure(&self) -> &ValidationFailure {
        &self.failure
    }

    /// The rendered failure message
    pub fn message(&self) -> &str {
        self.failure.message()
    }

    /// Kind of the underlying failure
    pub fn kind(&self) -> FailureKind {
        self.failure.kind()
    }

    /// Where the failing check was invoked
    pub fn location(&self) -> &'static Location<'static> {
        self.failure.location()
    }

    /// Full backtrace, captured only when frame cleaning is disabled
    pub fn backtrace(&self) -> Option<&Backtrace> {
        self.backtrace.as_ref()
    }

    /// The constructed error
    pub fn error(&self) -> &(dyn Error + Send + Sync + 'static) {
        self.error.as_ref()
    }

    /// Downcast the constructed error to a concrete type
    pub fn downcast_ref<E: Error + 'static>(&self) -> Option<&E> {
        self.error.downcast_ref::<E>()
    }

    /// Take ownership of the constructed error
    pub fn into_error(self) -> BoxError {
        self.error
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.error, f)
    }
}

impl Error for Violation {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.error.source()
    }
}

// ============================================================================
// Factory
// ============================================================================

/// Builds the error instance for a failure.
pub struct ExceptionFactory;

impl ExceptionFactory {
    /// Materialize a failure into a [`Violation`].
    pub fn build(failure: ValidationFailure, clean_stack_trace: bool) -> Violation {
        let error = Self::construct(&failure);
        let backtrace = if clean_stack_trace {
            None
        } else {
            Some(Backtrace::force_capture())
        };
        tracing::debug!(
            target: "stipulate::exception",
            kind = ?failure.kind(),
            exception = failure.exception_name(),
            location = %failure.location(),
            "built violation"
        );
        Violation {
            failure,
            error,
            backtrace,
        }
    }

    /// Construct the error instance only.
    ///
    /// The configured override wins over the default error of the failure's
    /// kind, except for combined failures, which always produce
    /// [`ContractError::Multiple`].
    pub fn construct(failure: &ValidationFailure) -> BoxError {
        let message = failure.message().to_string();
        let cause = failure.cause().cloned();
        if let Some(ty) = failure.exception() {
            if failure.kind() != FailureKind::Multiple {
                return ty.construct(message, cause);
            }
        }
        let error = match failure.kind() {
            FailureKind::InvalidArgument => ContractError::InvalidArgument { message, cause },
            FailureKind::MissingValue => ContractError::MissingValue { message, cause },
            FailureKind::Multiple => ContractError::Multiple {
                message,
                failures: failure.nested().to_vec(),
            },
        };
        Box::new(error)
    }
}

/// Signal a check that can never fail, or can never pass, for its subject's
/// domain: for example asking whether a length is negative.
#[track_caller]
pub fn impossible_check(name: &str, expectation: &str) -> ! {
    tracing::error!(
        target: "stipulate::exception",
        subject = name,
        expectation,
        location = %Location::caller(),
        "impossible check invoked"
    );
    panic!("{name} can never {expectation}")
}
