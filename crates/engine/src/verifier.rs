//! The check subject and its single check primitive
//!
//! A [`Verifier`] owns the value under test, its name, the configuration
//! layers captured when the chain started, and the chain's failure sink.
//! Every capability check funnels through [`Verifier::check`], which is the
//! only place that decides pass or fail, renders a message, and hands the
//! failure to the sink.

use std::fmt;
use std::panic::Location;

use stipulate_core::{
    require_name, resolve, ConfigLayer, Configuration, ExceptionType, FailureKind,
    GlobalConfiguration, ThreadConfiguration, UsageError, ValidationFailure,
    ValidationFailureCollector, Violation,
};

use crate::message::Message;
use crate::sink::{Collecting, FailureSink};

/// A named value being checked.
///
/// The sink `K` decides whether a failed check ends the chain ([`Eager`])
/// or is recorded for later ([`Collecting`]).
///
/// [`Eager`]: crate::Eager
pub struct Verifier<T, K: FailureSink> {
    value: T,
    name: String,
    global: ConfigLayer,
    thread: ConfigLayer,
    instance: ConfigLayer,
    config: Configuration,
    sink: K,
}

impl<T, K: FailureSink> Verifier<T, K> {
    /// Start a chain using the current global and thread configuration.
    ///
    /// # Panics
    ///
    /// If `name` is empty or whitespace.
    #[track_caller]
    pub fn new(value: T, name: impl Into<String>) -> Self {
        Self::with_layers(
            value,
            name,
            GlobalConfiguration::get(),
            ThreadConfiguration::get(),
            ConfigLayer::new(),
        )
    }

    /// Start a chain from explicit configuration layers.
    ///
    /// # Panics
    ///
    /// If `name` is empty or whitespace.
    #[track_caller]
    pub fn with_layers(
        value: T,
        name: impl Into<String>,
        global: ConfigLayer,
        thread: ConfigLayer,
        instance: ConfigLayer,
    ) -> Self {
        let config = resolve(&global, &thread, &instance);
        Self::from_parts(value, name.into(), global, thread, instance, config)
    }

    #[track_caller]
    pub(crate) fn from_parts(
        value: T,
        name: String,
        global: ConfigLayer,
        thread: ConfigLayer,
        instance: ConfigLayer,
        config: Configuration,
    ) -> Self {
        if let Err(e) = require_name(&name) {
            e.raise();
        }
        let sink = K::open(&config);
        Verifier {
            value,
            name,
            global,
            thread,
            instance,
            config,
            sink,
        }
    }

    /// The value under test
    pub fn value(&self) -> &T {
        &self.value
    }

    /// Take the value out of the chain
    pub fn into_value(self) -> T {
        self.value
    }

    /// Name used in failure messages
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The effective configuration of this chain
    pub fn configuration(&self) -> &Configuration {
        &self.config
    }

    /// Adjust the instance layer.
    ///
    /// Returns the verifier untouched when `f` changes nothing.
    pub fn configure(mut self, f: impl FnOnce(ConfigLayer) -> ConfigLayer) -> Self {
        let instance = f(self.instance.clone());
        if instance.same_as(&self.instance) {
            return self;
        }
        self.config = resolve(&self.global, &self.thread, &instance);
        self.instance = instance;
        self.sink.reconfigure(&self.config);
        self
    }

    /// Render diffs for failed equality checks on this chain
    pub fn with_diff(self) -> Self {
        self.configure(ConfigLayer::with_diff)
    }

    /// Render failed equality checks on this chain without a diff
    pub fn without_diff(self) -> Self {
        self.configure(ConfigLayer::without_diff)
    }

    /// Raise `exception` instead of the default errors on this chain
    pub fn with_exception(self, exception: ExceptionType) -> Self {
        self.configure(|layer| layer.with_exception(exception))
    }

    /// Append a context line to this chain's failure messages.
    ///
    /// # Panics
    ///
    /// If `name` is empty or whitespace.
    #[track_caller]
    pub fn with_context(self, name: &str, value: impl fmt::Display) -> Self {
        match self.instance.clone().add_context(name, value) {
            Ok(layer) => self.configure(|_| layer),
            Err(e) => e.raise(),
        }
    }

    // ========================================================================
    // Check primitive
    // ========================================================================

    /// Pass the chain on if `passed`, otherwise report a failure whose
    /// message is rendered by `message`.
    #[track_caller]
    pub(crate) fn check(
        self,
        passed: bool,
        kind: FailureKind,
        message: impl FnOnce(&Self) -> String,
    ) -> K::Out<Self> {
        if passed {
            return K::proceed(self);
        }
        let text = message(&self);
        self.fail(ValidationFailure::new(kind, text, Location::caller()))
    }

    pub(crate) fn fail(mut self, failure: ValidationFailure) -> K::Out<Self> {
        let failure = failure.with_exception(self.config.exception_override().cloned());
        tracing::debug!(
            target: "stipulate::check",
            subject = %self.name,
            kind = %failure.kind(),
            location = %failure.location(),
            "check failed"
        );
        match self.sink.record(failure, &self.config) {
            Ok(()) => K::proceed(self),
            Err(halt) => K::halt(halt),
        }
    }

    /// Start a message with this chain's configuration
    pub(crate) fn message(&self, header: impl Into<String>) -> Message<'_> {
        Message::new(&self.config, header)
    }

    /// Render a value with this chain's converters
    pub(crate) fn render<V: fmt::Debug + std::any::Any>(&self, value: &V) -> String {
        self.config.stringify(value)
    }

    /// Reject the name of a second value in a named comparison
    #[track_caller]
    pub(crate) fn require_other_name(&self, other: &str) {
        if let Err(e) = require_name(other) {
            e.raise();
        }
        if other.trim() == self.name {
            UsageError::NameCollision(other.to_string()).raise();
        }
    }

    /// Continue the chain on a value derived from this one, named
    /// `{name}.{suffix}`
    pub(crate) fn derive<U>(self, suffix: &str, f: impl FnOnce(T) -> U) -> Verifier<U, K> {
        Verifier {
            name: format!("{}.{suffix}", self.name),
            value: f(self.value),
            global: self.global,
            thread: self.thread,
            instance: self.instance,
            config: self.config,
            sink: self.sink,
        }
    }
}

impl<T> Verifier<T, Collecting> {
    /// Failures recorded so far, in order
    pub fn failures(&self) -> &[ValidationFailure] {
        self.sink.collector().failures()
    }

    /// Messages of the failures recorded so far
    pub fn messages(&self) -> Vec<&str> {
        self.sink.collector().messages()
    }

    /// End the chain, keeping its failures
    pub fn into_collector(self) -> ValidationFailureCollector {
        self.sink.into_collector()
    }

    /// End the chain: the value if every check passed, otherwise the single
    /// or combined violation
    pub fn into_result(self) -> Result<T, Violation> {
        let value = self.value;
        self.sink.into_collector().into_result().map(|()| value)
    }

    /// Append the failures of another chain after this chain's failures
    pub fn and<U>(mut self, other: Verifier<U, Collecting>) -> Self {
        self.sink.absorb(other.into_collector());
        self
    }
}

impl<T: fmt::Debug, K: FailureSink> fmt::Debug for Verifier<T, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Verifier")
            .field("name", &self.name)
            .field("value", &self.value)
            .finish_non_exhaustive()
    }
}
