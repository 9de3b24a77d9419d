use std::any::{self, Any, TypeId};
use std::error::Error;
use std::fmt::Debug;
use std::panic::Location;
use std::sync::Arc;

use stipulate_core::{FailureKind, ValidationFailure};

use crate::capability::{ObjectChecks, OptionChecks, Outcome};
use crate::message::list;
use crate::sink::FailureSink;
use crate::verifier::Verifier;

impl<T, K> ObjectChecks for Verifier<T, K>
where
    T: Debug + Any,
    K: FailureSink,
{
    #[track_caller]
    fn is_equal_to<E>(self, expected: E) -> Outcome<Self>
    where
        T: PartialEq<E>,
        E: Debug + Any,
    {
        let passed = self.value() == &expected;
        self.check(passed, FailureKind::InvalidArgument, |s| {
            s.message(format!("{} had an unexpected value.", s.name()))
                .comparison(s.render(&expected), s.render(s.value()))
                .build()
        })
    }

    #[track_caller]
    fn is_equal_to_named<E>(self, expected: E, name: &str) -> Outcome<Self>
    where
        T: PartialEq<E>,
        E: Debug + Any,
    {
        self.require_other_name(name);
        let passed = self.value() == &expected;
        self.check(passed, FailureKind::InvalidArgument, |s| {
            s.message(format!("{} must be equal to {}.", s.name(), name.trim()))
                .comparison(s.render(&expected), s.render(s.value()))
                .build()
        })
    }

    #[track_caller]
    fn is_not_equal_to<E>(self, unwanted: E) -> Outcome<Self>
    where
        T: PartialEq<E>,
        E: Debug + Any,
    {
        let passed = self.value() != &unwanted;
        self.check(passed, FailureKind::InvalidArgument, |s| {
            s.message(format!(
                "{} may not be equal to {}.",
                s.name(),
                s.render(&unwanted)
            ))
            .build()
        })
    }

    #[track_caller]
    fn is_not_equal_to_named<E>(self, unwanted: E, name: &str) -> Outcome<Self>
    where
        T: PartialEq<E>,
        E: Debug + Any,
    {
        self.require_other_name(name);
        let passed = self.value() != &unwanted;
        self.check(passed, FailureKind::InvalidArgument, |s| {
            s.message(format!("{} may not be equal to {}.", s.name(), name.trim()))
                .line(name.trim(), s.render(&unwanted))
                .build()
        })
    }

    #[track_caller]
    fn is_one_of<E>(self, candidates: &[E]) -> Outcome<Self>
    where
        T: PartialEq<E>,
        E: Debug + Any,
    {
        let passed = candidates.iter().any(|c| self.value() == c);
        self.check(passed, FailureKind::InvalidArgument, |s| {
            s.message(format!(
                "{} must be one of {}.",
                s.name(),
                list(s.configuration(), candidates)
            ))
            .actual(s.value())
            .build()
        })
    }

    #[track_caller]
    fn is_not_one_of<E>(self, candidates: &[E]) -> Outcome<Self>
    where
        T: PartialEq<E>,
        E: Debug + Any,
    {
        let passed = !candidates.iter().any(|c| self.value() == c);
        self.check(passed, FailureKind::InvalidArgument, |s| {
            s.message(format!(
                "{} may not be one of {}.",
                s.name(),
                list(s.configuration(), candidates)
            ))
            .actual(s.value())
            .build()
        })
    }

    #[track_caller]
    fn is_instance_of<U: Any>(self) -> Outcome<Self> {
        let passed = TypeId::of::<T>() == TypeId::of::<U>();
        self.check(passed, FailureKind::InvalidArgument, |s| {
            s.message(format!(
                "{} must be an instance of {}.",
                s.name(),
                any::type_name::<U>()
            ))
            .line("Actual type", any::type_name::<T>())
            .build()
        })
    }

    #[track_caller]
    fn satisfies<F, X>(self, description: &str, predicate: F) -> Outcome<Self>
    where
        F: FnOnce(&T) -> Result<(), X>,
        X: Error + Send + Sync + 'static,
    {
        let cause = match predicate(self.value()) {
            Ok(()) => return K::proceed(self),
            Err(cause) => cause,
        };
        let message = self
            .message(format!("{} must {}.", self.name(), description))
            .actual(self.value())
            .line("Cause", cause.to_string())
            .build();
        let failure = ValidationFailure::new(FailureKind::InvalidArgument, message, Location::caller())
            .with_cause(Arc::new(cause));
        self.fail(failure)
    }
}

impl<T, K> OptionChecks for Verifier<Option<T>, K>
where
    T: Debug + Any,
    K: FailureSink,
{
    #[track_caller]
    fn is_null(self) -> Outcome<Self> {
        let passed = self.value().is_none();
        self.check(passed, FailureKind::InvalidArgument, |s| {
            s.message(format!("{} must be None.", s.name()))
                .actual(s.value())
                .build()
        })
    }

    #[track_caller]
    fn is_not_null(self) -> Outcome<Self> {
        let passed = self.value().is_some();
        self.check(passed, FailureKind::MissingValue, |s| {
            s.message(format!("{} may not be None.", s.name())).build()
        })
    }
}
