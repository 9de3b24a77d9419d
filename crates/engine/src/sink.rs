//! Failure sinks
//!
//! Every check is written once, against [`FailureSink`]. The sink decides
//! what a failure does to the chain:
//!
//! - [`Eager`] turns the first failure into a [`Violation`] and ends the
//!   chain: each check returns `Result<Subject, Violation>`.
//! - [`Collecting`] records the failure and lets the chain continue: each
//!   check returns the subject itself.
//!
//! The output shape is a generic associated type, so eager chains compose
//! with `?` while collecting chains compose with plain method calls.

use std::convert::Infallible;

use stipulate_core::{
    Configuration, ExceptionFactory, ValidationFailure, ValidationFailureCollector, Violation,
};

/// Where failed checks go.
pub trait FailureSink: Sized {
    /// What a check returns for a subject of type `S`
    type Out<S>;

    /// Why a chain stopped
    type Halt;

    /// Create the sink for a new chain
    fn open(config: &Configuration) -> Self;

    /// The chain's effective configuration changed
    fn reconfigure(&mut self, config: &Configuration) {
        let _ = config;
    }

    /// Handle a failure; `Err` ends the chain.
    fn record(&mut self, failure: ValidationFailure, config: &Configuration)
        -> Result<(), Self::Halt>;

    /// Continue the chain with `subject`
    fn proceed<S>(subject: S) -> Self::Out<S>;

    /// End the chain
    fn halt<S>(halt: Self::Halt) -> Self::Out<S>;

    /// Transform the subject carried by an outcome
    fn map<S, U>(out: Self::Out<S>, f: impl FnOnce(S) -> U) -> Self::Out<U>;
}

/// Fail fast: the first failure becomes the chain's error.
#[derive(Debug, Default, Clone, Copy)]
pub struct Eager;

impl FailureSink for Eager {
    type Out<S> = Result<S, Violation>;
    type Halt = Violation;

    fn open(_config: &Configuration) -> Self {
        Eager
    }

    fn record(&mut self, failure: ValidationFailure, config: &Configuration) -> Result<(), Violation> {
        Err(ExceptionFactory::build(failure, config.clean_stack_trace()))
    }

    fn proceed<S>(subject: S) -> Result<S, Violation> {
        Ok(subject)
    }

    fn halt<S>(halt: Violation) -> Result<S, Violation> {
        Err(halt)
    }

    fn map<S, U>(out: Result<S, Violation>, f: impl FnOnce(S) -> U) -> Result<U, Violation> {
        out.map(f)
    }
}

/// Collect every failure; materialize later.
#[derive(Debug, Default)]
pub struct Collecting {
    collector: ValidationFailureCollector,
}

impl Collecting {
    /// Failures recorded so far
    pub fn collector(&self) -> &ValidationFailureCollector {
        &self.collector
    }

    /// Take the collector out of the sink
    pub fn into_collector(self) -> ValidationFailureCollector {
        self.collector
    }

    pub(crate) fn absorb(&mut self, other: ValidationFailureCollector) {
        self.collector.merge(other);
    }
}

impl FailureSink for Collecting {
    type Out<S> = S;
    type Halt = Infallible;

    fn open(config: &Configuration) -> Self {
        Collecting {
            collector: ValidationFailureCollector::new()
                .with_clean_stack_trace(config.clean_stack_trace()),
        }
    }

    fn reconfigure(&mut self, config: &Configuration) {
        self.collector.set_clean_stack_trace(config.clean_stack_trace());
    }

    fn record(&mut self, failure: ValidationFailure, _config: &Configuration) -> Result<(), Infallible> {
        self.collector.record(failure);
        Ok(())
    }

    fn proceed<S>(subject: S) -> S {
        subject
    }

    fn halt<S>(halt: Infallible) -> S {
        match halt {}
    }

    fn map<S, U>(out: S, f: impl FnOnce(S) -> U) -> U {
        f(out)
    }
}
