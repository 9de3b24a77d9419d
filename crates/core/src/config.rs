//! Configuration cascade
//!
//! Settings come from three layers, resolved field by field with strict
//! precedence: instance over thread over global. A layer only carries the
//! fields it overrides; anything it leaves unset falls through.
//!
//! # Design
//!
//! - [`ConfigLayer`] is an immutable, `Arc`-backed record. Every `with_*` /
//!   `without_*` call returns the same allocation when the value does not
//!   change, so chains of no-op updates never allocate.
//! - The global layer is a single `Arc` swapped under a `parking_lot` lock.
//!   Readers clone the `Arc` and work on a consistent snapshot; a check chain
//!   that already captured a snapshot does not see later publications.
//!   Updates compute the new layer outside the lock and publish with a
//!   compare-and-swap on the `Arc` identity.
//! - The thread layer lives in a thread-local and needs no synchronization.
//!
//! # Example
//!
//! ```
//! use stipulate_core::{resolve, ConfigLayer};
//!
//! let global = ConfigLayer::new().without_diff();
//! let thread = ConfigLayer::new();
//! let instance = ConfigLayer::new().with_diff();
//!
//! let config = resolve(&global, &thread, &instance);
//! assert!(config.diff_enabled());
//! ```

use std::any::{Any, TypeId};
use std::cell::RefCell;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::convert::StringConverter;
use crate::error::UsageError;
use crate::exception::ExceptionType;

// ============================================================================
// Layers
// ============================================================================

#[derive(Clone, Default)]
struct LayerFields {
    /// `Some(None)` pins the default exceptions, masking lower layers
    exception: Option<Option<ExceptionType>>,
    diff: Option<bool>,
    assertions: Option<bool>,
    clean_stack_trace: Option<bool>,
    context: Vec<(String, String)>,
    /// `None` removes a converter registered by a lower layer
    converters: FxHashMap<TypeId, Option<StringConverter>>,
}

#[derive(Clone, Copy)]
enum Flag {
    Diff,
    Assertions,
    CleanStackTrace,
}

impl LayerFields {
    fn flag(&self, flag: Flag) -> Option<bool> {
        match flag {
            Flag::Diff => self.diff,
            Flag::Assertions => self.assertions,
            Flag::CleanStackTrace => self.clean_stack_trace,
        }
    }

    fn flag_mut(&mut self, flag: Flag) -> &mut Option<bool> {
        match flag {
            Flag::Diff => &mut self.diff,
            Flag::Assertions => &mut self.assertions,
            Flag::CleanStackTrace => &mut self.clean_stack_trace,
        }
    }
}

/// A partial, immutable configuration record.
#[derive(Clone, Default)]
pub struct ConfigLayer(Arc<LayerFields>);

impl ConfigLayer {
    /// A layer that overrides nothing
    pub fn new() -> Self {
        Self::default()
    }

    /// True if both handles share one allocation
    pub fn same_as(&self, other: &ConfigLayer) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    fn update(mut self, changed: bool, apply: impl FnOnce(&mut LayerFields)) -> Self {
        if changed {
            apply(Arc::make_mut(&mut self.0));
        }
        self
    }

    fn set_flag(self, flag: Flag, value: bool) -> Self {
        let changed = self.0.flag(flag) != Some(value);
        self.update(changed, |f| *f.flag_mut(flag) = Some(value))
    }

    /// Replace the default error of every failure kind with `exception`
    pub fn with_exception(self, exception: ExceptionType) -> Self {
        let changed = !matches!(&self.0.exception, Some(Some(current)) if *current == exception);
        self.update(changed, |f| f.exception = Some(Some(exception)))
    }

    /// Use the default errors, even if a lower layer sets an override
    pub fn with_default_exception(self) -> Self {
        let changed = !matches!(self.0.exception, Some(None));
        self.update(changed, |f| f.exception = Some(None))
    }

    /// Stop overriding the exception setting at this layer
    pub fn inherit_exception(self) -> Self {
        let changed = self.0.exception.is_some();
        self.update(changed, |f| f.exception = None)
    }

    /// Render a diff for failed equality checks
    pub fn with_diff(self) -> Self {
        self.set_flag(Flag::Diff, true)
    }

    /// Render failed equality checks without a diff
    pub fn without_diff(self) -> Self {
        self.set_flag(Flag::Diff, false)
    }

    /// Run `assert_that` chains
    pub fn with_assertions(self) -> Self {
        self.set_flag(Flag::Assertions, true)
    }

    /// Skip `assert_that` chains entirely
    pub fn without_assertions(self) -> Self {
        self.set_flag(Flag::Assertions, false)
    }

    /// Report only the caller's location
    pub fn with_clean_stack_trace(self) -> Self {
        self.set_flag(Flag::CleanStackTrace, true)
    }

    /// Also capture a full backtrace, library frames included
    pub fn without_clean_stack_trace(self) -> Self {
        self.set_flag(Flag::CleanStackTrace, false)
    }

    /// Append a line to every failure message.
    ///
    /// Adding an existing name replaces its value in place.
    ///
    /// # Errors
    ///
    /// [`UsageError::BlankContextKey`] if `name` is empty or whitespace.
    pub fn add_context(self, name: &str, value: impl fmt::Display) -> Result<Self, UsageError> {
        if name.trim().is_empty() {
            return Err(UsageError::BlankContextKey);
        }
        let value = value.to_string();
        let existing = self.0.context.iter().position(|(k, _)| k == name);
        let changed = match existing {
            Some(i) => self.0.context[i].1 != value,
            None => true,
        };
        Ok(self.update(changed, |f| match existing {
            Some(i) => f.context[i].1 = value,
            None => f.context.push((name.to_string(), value)),
        }))
    }

    /// Drop a context line set at this layer
    pub fn remove_context(self, name: &str) -> Self {
        let existing = self.0.context.iter().position(|(k, _)| k == name);
        self.update(existing.is_some(), |f| {
            if let Some(i) = existing {
                f.context.remove(i);
            }
        })
    }

    /// Render values of the converter's type through it
    pub fn with_string_converter(self, converter: StringConverter) -> Self {
        let changed = match self.0.converters.get(&converter.type_id()) {
            Some(Some(current)) => !current.same_as(&converter),
            _ => true,
        };
        self.update(changed, |f| {
            f.converters.insert(converter.type_id(), Some(converter));
        })
    }

    /// Render values of type `T` through `Debug`, even if a lower layer
    /// registered a converter
    pub fn without_string_converter<T: Any>(self) -> Self {
        let id = TypeId::of::<T>();
        let changed = !matches!(self.0.converters.get(&id), Some(None));
        self.update(changed, |f| {
            f.converters.insert(id, None);
        })
    }
}

impl fmt::Debug for ConfigLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields = &*self.0;
        f.debug_struct("ConfigLayer")
            .field("exception", &fields.exception)
            .field("diff", &fields.diff)
            .field("assertions", &fields.assertions)
            .field("clean_stack_trace", &fields.clean_stack_trace)
            .field("context", &fields.context)
            .field("converters", &fields.converters.len())
            .finish()
    }
}

// ============================================================================
// Effective configuration
// ============================================================================

/// Fully resolved settings for one check chain.
#[derive(Debug, Clone)]
pub struct Configuration {
    exception: Option<ExceptionType>,
    diff: bool,
    assertions: bool,
    clean_stack_trace: bool,
    context: Vec<(String, String)>,
    converters: FxHashMap<TypeId, StringConverter>,
}

impl Default for Configuration {
    fn default() -> Self {
        Configuration {
            exception: None,
            diff: true,
            assertions: cfg!(debug_assertions),
            clean_stack_trace: true,
            context: Vec::new(),
            converters: FxHashMap::default(),
        }
    }
}

impl Configuration {
    /// Resolve the current global and thread layers with no instance overrides
    pub fn current() -> Self {
        resolve(
            &GlobalConfiguration::get(),
            &ThreadConfiguration::get(),
            &ConfigLayer::new(),
        )
    }

    fn apply(&mut self, layer: &ConfigLayer) {
        let fields = &*layer.0;
        if let Some(exception) = &fields.exception {
            self.exception = exception.clone();
        }
        if let Some(diff) = fields.diff {
            self.diff = diff;
        }
        if let Some(assertions) = fields.assertions {
            self.assertions = assertions;
        }
        if let Some(clean) = fields.clean_stack_trace {
            self.clean_stack_trace = clean;
        }
        for (name, value) in &fields.context {
            match self.context.iter_mut().find(|(k, _)| k == name) {
                Some(entry) => entry.1 = value.clone(),
                None => self.context.push((name.clone(), value.clone())),
            }
        }
        for (id, converter) in &fields.converters {
            match converter {
                Some(converter) => {
                    self.converters.insert(*id, converter.clone());
                }
                None => {
                    self.converters.remove(id);
                }
            }
        }
    }

    /// Exception type replacing the default errors, if any
    pub fn exception_override(&self) -> Option<&ExceptionType> {
        self.exception.as_ref()
    }

    /// Whether failed equality checks render a diff
    pub fn diff_enabled(&self) -> bool {
        self.diff
    }

    /// Whether `assert_that` chains run
    pub fn assertions_enabled(&self) -> bool {
        self.assertions
    }

    /// Whether violations omit the full backtrace
    pub fn clean_stack_trace(&self) -> bool {
        self.clean_stack_trace
    }

    /// Context lines appended to every failure message
    pub fn context(&self) -> &[(String, String)] {
        &self.context
    }

    /// Render a value for a failure message.
    ///
    /// Uses the converter registered for the exact type `T`, falling back to
    /// `Debug`.
    pub fn stringify<T: fmt::Debug + Any>(&self, value: &T) -> String {
        self.converters
            .get(&TypeId::of::<T>())
            .and_then(|converter| converter.convert(value))
            .unwrap_or_else(|| format!("{value:?}"))
    }
}

/// Merge three layers into the effective configuration.
///
/// Each field takes the value of the highest-precedence layer that sets it:
/// instance, then thread, then global, then the built-in default. Context
/// lines merge by name; a higher layer replaces a lower layer's value in
/// place and appends new names after the inherited ones.
pub fn resolve(global: &ConfigLayer, thread: &ConfigLayer, instance: &ConfigLayer) -> Configuration {
    let mut config = Configuration::default();
    for layer in [global, thread, instance] {
        config.apply(layer);
    }
    config
}

// ============================================================================
// Global layer
// ============================================================================

static GLOBAL: Lazy<RwLock<ConfigLayer>> = Lazy::new(|| RwLock::new(ConfigLayer::new()));

/// The process-wide configuration layer.
pub struct GlobalConfiguration;

impl GlobalConfiguration {
    /// Snapshot of the current global layer
    pub fn get() -> ConfigLayer {
        GLOBAL.read().clone()
    }

    /// Publish a new global layer
    pub fn set(layer: ConfigLayer) {
        tracing::debug!(target: "stipulate::config", layer = ?layer, "publishing global configuration");
        *GLOBAL.write() = layer;
    }

    /// Replace the global layer with `f(current)`.
    ///
    /// `f` runs without the lock held, so it may read the configuration or
    /// start check chains. If another thread publishes in the meantime, `f`
    /// is called again on the newer layer; no update is lost.
    pub fn update(mut f: impl FnMut(ConfigLayer) -> ConfigLayer) {
        let _ = Self::try_update(|layer| Ok(f(layer)));
    }

    /// Fallible variant of [`GlobalConfiguration::update`]; on error the
    /// global layer is left untouched.
    pub fn try_update(
        mut f: impl FnMut(ConfigLayer) -> Result<ConfigLayer, UsageError>,
    ) -> Result<(), UsageError> {
        loop {
            let current = Self::get();
            let next = f(current.clone())?;
            if next.same_as(&current) {
                return Ok(());
            }
            let mut guard = GLOBAL.write();
            // `current` keeps its allocation alive, so pointer identity is exact
            if guard.same_as(&current) {
                tracing::debug!(target: "stipulate::config", layer = ?next, "publishing global configuration");
                *guard = next;
                return Ok(());
            }
            tracing::trace!(target: "stipulate::config", "global configuration changed during update, retrying");
        }
    }

    /// Install `layer` globally until the returned guard is dropped, then
    /// restore the layer it replaced.
    pub fn scoped(layer: ConfigLayer) -> GlobalScope {
        tracing::debug!(target: "stipulate::config", layer = ?layer, "publishing scoped global configuration");
        let previous = std::mem::replace(&mut *GLOBAL.write(), layer);
        GlobalScope {
            previous: Some(previous),
        }
    }

    /// Restore the empty global layer
    pub fn reset() {
        Self::set(ConfigLayer::new());
    }
}

/// Restores the previous global layer on drop.
#[must_use = "the global layer is restored as soon as the scope is dropped"]
pub struct GlobalScope {
    previous: Option<ConfigLayer>,
}

impl Drop for GlobalScope {
    fn drop(&mut self) {
        if let Some(previous) = self.previous.take() {
            GlobalConfiguration::set(previous);
        }
    }
}

// ============================================================================
// Thread layer
// ============================================================================

thread_local! {
    static THREAD: RefCell<ConfigLayer> = RefCell::new(ConfigLayer::new());
}

/// The configuration layer of the current thread.
pub struct ThreadConfiguration;

impl ThreadConfiguration {
    /// Snapshot of this thread's layer
    pub fn get() -> ConfigLayer {
        THREAD.with(|layer| layer.borrow().clone())
    }

    /// Replace this thread's layer, returning the previous one
    pub fn set(layer: ConfigLayer) -> ConfigLayer {
        tracing::debug!(target: "stipulate::config", layer = ?layer, "setting thread configuration");
        THREAD.with(|current| current.replace(layer))
    }

    /// Replace this thread's layer with `f(current)`
    pub fn update(f: impl FnOnce(ConfigLayer) -> ConfigLayer) {
        let next = f(Self::get());
        Self::set(next);
    }

    /// Restore the empty thread layer
    pub fn reset() {
        Self::set(ConfigLayer::new());
    }

    /// Install `layer` until the returned guard is dropped.
    ///
    /// ```
    /// use stipulate_core::{ConfigLayer, Configuration, ThreadConfiguration};
    ///
    /// {
    ///     let _scope = ThreadConfiguration::scoped(ConfigLayer::new().without_diff());
    ///     assert!(!Configuration::current().diff_enabled());
    /// }
    /// assert!(Configuration::current().diff_enabled());
    /// ```
    pub fn scoped(layer: ConfigLayer) -> ThreadScope {
        ThreadScope {
            previous: Some(Self::set(layer)),
            _not_send: PhantomData,
        }
    }
}

/// Restores the previous thread layer on drop.
#[must_use = "the thread layer is restored as soon as the scope is dropped"]
pub struct ThreadScope {
    previous: Option<ConfigLayer>,
    // Restoring must happen on the thread that installed the layer
    _not_send: PhantomData<*const ()>,
}

impl Drop for ThreadScope {
    fn drop(&mut self) {
        if let Some(previous) = self.previous.take() {
            THREAD.with(|current| *current.borrow_mut() = previous);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exception::{ContractError, ExceptionType};
    use proptest::prelude::*;

    fn rejected() -> ExceptionType {
        ExceptionType::builder("Rejected")
            .message(|message| ContractError::InvalidArgument {
                message,
                cause: None,
            })
            .build()
            .unwrap()
    }

    // === Identity Tests ===

    #[test]
    fn test_no_change_updates_keep_identity() {
        let layer = ConfigLayer::new().with_diff();
        assert!(layer.clone().with_diff().same_as(&layer));

        let layer = layer.without_assertions();
        assert!(layer.clone().without_assertions().same_as(&layer));

        let layer = layer.with_default_exception();
        assert!(layer.clone().with_default_exception().same_as(&layer));

        let layer = layer.add_context("request", 42).unwrap();
        assert!(layer.clone().add_context("request", "42").unwrap().same_as(&layer));

        let ty = rejected();
        let layer = layer.with_exception(ty.clone());
        assert!(layer.clone().with_exception(ty).same_as(&layer));

        let conv = StringConverter::of::<u8, _>(|b| format!("{b:#04x}"));
        let layer = layer.with_string_converter(conv.clone());
        assert!(layer.clone().with_string_converter(conv).same_as(&layer));

        assert!(layer.clone().remove_context("missing").same_as(&layer));
    }

    #[test]
    fn test_changes_do_not_touch_shared_layers() {
        let base = ConfigLayer::new().with_diff();
        let changed = base.clone().without_diff();
        assert!(!changed.same_as(&base));
        assert!(resolve(&ConfigLayer::new(), &ConfigLayer::new(), &base).diff_enabled());
        assert!(!resolve(&ConfigLayer::new(), &ConfigLayer::new(), &changed).diff_enabled());
    }

    #[test]
    fn test_add_context_rejects_blank_name() {
        let err = ConfigLayer::new().add_context("  ", "value").unwrap_err();
        assert_eq!(err, UsageError::BlankContextKey);
    }

    // === Resolution Tests ===

    #[test]
    fn test_defaults() {
        let config = Configuration::default();
        assert!(config.diff_enabled());
        assert!(config.clean_stack_trace());
        assert_eq!(config.assertions_enabled(), cfg!(debug_assertions));
        assert!(config.exception_override().is_none());
        assert!(config.context().is_empty());
    }

    #[test]
    fn test_unset_fields_fall_through() {
        let global = ConfigLayer::new().without_diff();
        let thread = ConfigLayer::new().without_clean_stack_trace();
        let instance = ConfigLayer::new();
        let config = resolve(&global, &thread, &instance);
        assert!(!config.diff_enabled());
        assert!(!config.clean_stack_trace());
    }

    #[test]
    fn test_default_exception_masks_lower_override() {
        let global = ConfigLayer::new().with_exception(rejected());
        let thread = ConfigLayer::new().with_default_exception();
        let config = resolve(&global, &thread, &ConfigLayer::new());
        assert!(config.exception_override().is_none());

        let config = resolve(&global, &ConfigLayer::new(), &ConfigLayer::new());
        assert_eq!(config.exception_override().unwrap().name(), "Rejected");
    }

    #[test]
    fn test_context_merges_by_name() {
        let global = ConfigLayer::new()
            .add_context("service", "billing")
            .unwrap()
            .add_context("region", "eu")
            .unwrap();
        let thread = ConfigLayer::new().add_context("region", "us").unwrap();
        let instance = ConfigLayer::new().add_context("request", "r-7").unwrap();
        let config = resolve(&global, &thread, &instance);
        assert_eq!(
            config.context(),
            &[
                ("service".to_string(), "billing".to_string()),
                ("region".to_string(), "us".to_string()),
                ("request".to_string(), "r-7".to_string()),
            ]
        );
    }

    #[test]
    fn test_converters_match_exact_type_and_can_be_removed() {
        let global =
            ConfigLayer::new().with_string_converter(StringConverter::of::<u8, _>(|b| format!("{b:#04x}")));
        let config = resolve(&global, &ConfigLayer::new(), &ConfigLayer::new());
        assert_eq!(config.stringify(&255u8), "0xff");
        assert_eq!(config.stringify(&255u16), "255");

        let instance = ConfigLayer::new().without_string_converter::<u8>();
        let config = resolve(&global, &ConfigLayer::new(), &instance);
        assert_eq!(config.stringify(&255u8), "255");
    }

    // === Thread Layer Tests ===

    #[test]
    fn test_scoped_thread_layer_restores_previous() {
        let before = ThreadConfiguration::get();
        {
            let _scope = ThreadConfiguration::scoped(ConfigLayer::new().without_diff());
            assert!(!Configuration::current().diff_enabled());
        }
        assert!(ThreadConfiguration::get().same_as(&before));
    }

    #[test]
    fn test_thread_layer_is_not_shared() {
        let _guard = GLOBAL_LOCK.lock();
        let _scope = ThreadConfiguration::scoped(ConfigLayer::new().without_diff());
        let other = std::thread::spawn(|| Configuration::current().diff_enabled())
            .join()
            .unwrap();
        assert!(other);
    }

    // === Global Layer Tests ===

    // Tests that touch the global layer hold this lock
    static GLOBAL_LOCK: parking_lot::Mutex<()> = parking_lot::const_mutex(());

    #[test]
    fn test_global_update_publishes_and_resets() {
        let _guard = GLOBAL_LOCK.lock();
        GlobalConfiguration::update(|layer| layer.add_context("suite", "core").unwrap());
        assert_eq!(
            Configuration::current().context(),
            &[("suite".to_string(), "core".to_string())]
        );

        let err = GlobalConfiguration::try_update(|layer| layer.add_context("", "x"));
        assert_eq!(err, Err(UsageError::BlankContextKey));
        assert_eq!(Configuration::current().context().len(), 1);

        GlobalConfiguration::reset();
        assert!(Configuration::current().context().is_empty());
    }

    #[test]
    fn test_global_update_may_read_configuration() {
        let _guard = GLOBAL_LOCK.lock();
        let (done, finished) = std::sync::mpsc::channel();
        std::thread::spawn(move || {
            GlobalConfiguration::update(|layer| {
                let diff = Configuration::current().diff_enabled();
                if diff {
                    layer.without_diff()
                } else {
                    layer
                }
            });
            let _ = done.send(Configuration::current().diff_enabled());
        });
        let diff = finished
            .recv_timeout(std::time::Duration::from_secs(5))
            .expect("update finished");
        GlobalConfiguration::reset();
        assert!(!diff);
    }

    #[test]
    fn test_concurrent_global_updates_are_not_lost() {
        let _guard = GLOBAL_LOCK.lock();
        let workers: Vec<_> = (0..8)
            .map(|t| {
                std::thread::spawn(move || {
                    for i in 0..25 {
                        GlobalConfiguration::update(|layer| {
                            layer.add_context(&format!("t{t}-{i}"), i).unwrap()
                        });
                    }
                })
            })
            .collect();
        for worker in workers {
            worker.join().unwrap();
        }
        let published = Configuration::current().context().len();
        GlobalConfiguration::reset();
        assert_eq!(published, 200);
    }

    #[test]
    fn test_global_scope_restores_previous_layer() {
        let _guard = GLOBAL_LOCK.lock();
        let before = GlobalConfiguration::get();
        {
            let _scope = GlobalConfiguration::scoped(ConfigLayer::new().without_diff());
            assert!(!Configuration::current().diff_enabled());
        }
        assert!(GlobalConfiguration::get().same_as(&before));

        let unwound = std::panic::catch_unwind(|| {
            let _scope = GlobalConfiguration::scoped(ConfigLayer::new().without_diff());
            panic!("check failed");
        });
        assert!(unwound.is_err());
        assert!(GlobalConfiguration::get().same_as(&before));
    }

    // === Property Tests ===

    fn flag_layer(flag: Option<bool>) -> ConfigLayer {
        match flag {
            Some(true) => ConfigLayer::new().with_diff(),
            Some(false) => ConfigLayer::new().without_diff(),
            None => ConfigLayer::new(),
        }
    }

    proptest! {
        /// A field set on the instance layer always wins
        #[test]
        fn prop_instance_layer_wins(global in any::<Option<bool>>(), thread in any::<Option<bool>>(), instance in any::<bool>()) {
            let config = resolve(&flag_layer(global), &flag_layer(thread), &flag_layer(Some(instance)));
            prop_assert_eq!(config.diff_enabled(), instance);
        }

        /// Without an instance value the thread layer beats the global layer
        #[test]
        fn prop_thread_beats_global(global in any::<Option<bool>>(), thread in any::<bool>()) {
            let config = resolve(&flag_layer(global), &flag_layer(Some(thread)), &ConfigLayer::new());
            prop_assert_eq!(config.diff_enabled(), thread);
        }
    }
}
