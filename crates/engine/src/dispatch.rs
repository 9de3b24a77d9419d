//! Assertions that can be switched off
//!
//! [`Assertion::new`] resolves the configuration once. When assertions are
//! disabled the value is dropped on the spot and the chain runs on a
//! [`NoOp`]; otherwise it runs on a [`Verifier`]. Either way the caller sees
//! the same capability traits.

use std::any::Any;
use std::error::Error;
use std::fmt::Debug;
use std::ops::RangeBounds;

use stipulate_core::{
    require_name, resolve, ConfigLayer, GlobalConfiguration, ThreadConfiguration,
    ValidationFailure, ValidationFailureCollector,
};

use crate::capability::{
    ComparableChecks, Container, ContainerChecks, Map, MapChecks, NonZeroChecks, NonZeroNumber,
    ObjectChecks, OptionChecks, Outcome, SignedChecks, SignedNumber, Sizable, SizedChecks,
    StringChecks, Subject, Text, UnsignedChecks, UnsignedNumber,
};
use crate::noop::NoOp;
use crate::sink::{Collecting, FailureSink};
use crate::verifier::Verifier;

/// A check chain that runs only while assertions are enabled.
#[derive(Debug)]
pub enum Assertion<T, K: FailureSink> {
    /// Assertions enabled: checks run
    Active(Verifier<T, K>),
    /// Assertions disabled: checks are skipped
    Inactive(NoOp<T, K>),
}

impl<T, K: FailureSink> Assertion<T, K> {
    /// Start a chain, choosing the active or inactive form from the current
    /// global and thread configuration.
    ///
    /// # Panics
    ///
    /// If `name` is empty or whitespace, whether or not assertions are
    /// enabled.
    #[track_caller]
    pub fn new(value: T, name: impl Into<String>) -> Self {
        let global = GlobalConfiguration::get();
        let thread = ThreadConfiguration::get();
        let instance = ConfigLayer::new();
        let config = resolve(&global, &thread, &instance);
        let name = name.into();
        if config.assertions_enabled() {
            return Assertion::Active(Verifier::from_parts(
                value, name, global, thread, instance, config,
            ));
        }
        if let Err(e) = require_name(&name) {
            e.raise();
        }
        drop(value);
        Assertion::Inactive(NoOp::new())
    }

    /// Whether checks on this chain run
    pub fn is_active(&self) -> bool {
        matches!(self, Assertion::Active(_))
    }

    /// The value under test, when the chain is active
    pub fn value(&self) -> Option<&T> {
        match self {
            Assertion::Active(v) => Some(v.value()),
            Assertion::Inactive(_) => None,
        }
    }
}

impl<T> Assertion<T, Collecting> {
    /// Failures recorded so far; always empty when inactive
    pub fn failures(&self) -> &[ValidationFailure] {
        match self {
            Assertion::Active(v) => v.failures(),
            Assertion::Inactive(_) => &[],
        }
    }

    /// End the chain, keeping its failures
    pub fn into_collector(self) -> ValidationFailureCollector {
        match self {
            Assertion::Active(v) => v.into_collector(),
            Assertion::Inactive(_) => ValidationFailureCollector::new(),
        }
    }
}

impl<T, K: FailureSink> Subject for Assertion<T, K> {
    type Value = T;
    type Sink = K;
}

/// Forward a check to whichever subject is inside, re-wrapping the result.
macro_rules! delegate {
    ($self:ident, $family:ident :: $method:ident ($($arg:expr),*)) => {
        match $self {
            Assertion::Active(v) => K::map($family::$method(v $(, $arg)*), Assertion::Active),
            Assertion::Inactive(n) => {
                K::map($family::$method(n $(, $arg)*), Assertion::Inactive)
            }
        }
    };
}

/// Forward a derived-subject method.
macro_rules! derived {
    ($self:ident, $family:ident :: $method:ident) => {
        match $self {
            Assertion::Active(v) => Assertion::Active($family::$method(v)),
            Assertion::Inactive(n) => Assertion::Inactive($family::$method(n)),
        }
    };
}

impl<T, K> ObjectChecks for Assertion<T, K>
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
        delegate!(self, ObjectChecks::is_equal_to(expected))
    }

    #[track_caller]
    fn is_equal_to_named<E>(self, expected: E, name: &str) -> Outcome<Self>
    where
        T: PartialEq<E>,
        E: Debug + Any,
    {
        delegate!(self, ObjectChecks::is_equal_to_named(expected, name))
    }

    #[track_caller]
    fn is_not_equal_to<E>(self, unwanted: E) -> Outcome<Self>
    where
        T: PartialEq<E>,
        E: Debug + Any,
    {
        delegate!(self, ObjectChecks::is_not_equal_to(unwanted))
    }

    #[track_caller]
    fn is_not_equal_to_named<E>(self, unwanted: E, name: &str) -> Outcome<Self>
    where
        T: PartialEq<E>,
        E: Debug + Any,
    {
        delegate!(self, ObjectChecks::is_not_equal_to_named(unwanted, name))
    }

    #[track_caller]
    fn is_one_of<E>(self, candidates: &[E]) -> Outcome<Self>
    where
        T: PartialEq<E>,
        E: Debug + Any,
    {
        delegate!(self, ObjectChecks::is_one_of(candidates))
    }

    #[track_caller]
    fn is_not_one_of<E>(self, candidates: &[E]) -> Outcome<Self>
    where
        T: PartialEq<E>,
        E: Debug + Any,
    {
        delegate!(self, ObjectChecks::is_not_one_of(candidates))
    }

    #[track_caller]
    fn is_instance_of<U: Any>(self) -> Outcome<Self> {
        match self {
            Assertion::Active(v) => K::map(v.is_instance_of::<U>(), Assertion::Active),
            Assertion::Inactive(n) => K::map(n.is_instance_of::<U>(), Assertion::Inactive),
        }
    }

    #[track_caller]
    fn satisfies<F, X>(self, description: &str, predicate: F) -> Outcome<Self>
    where
        F: FnOnce(&T) -> Result<(), X>,
        X: Error + Send + Sync + 'static,
    {
        delegate!(self, ObjectChecks::satisfies(description, predicate))
    }
}

impl<T, K> OptionChecks for Assertion<Option<T>, K>
where
    T: Debug + Any,
    K: FailureSink,
{
    #[track_caller]
    fn is_null(self) -> Outcome<Self> {
        delegate!(self, OptionChecks::is_null())
    }

    #[track_caller]
    fn is_not_null(self) -> Outcome<Self> {
        delegate!(self, OptionChecks::is_not_null())
    }
}

impl<T, K> ComparableChecks for Assertion<T, K>
where
    T: Debug + Any,
    K: FailureSink,
{
    #[track_caller]
    fn is_less_than<E>(self, bound: E) -> Outcome<Self>
    where
        T: PartialOrd<E>,
        E: Debug + Any,
    {
        delegate!(self, ComparableChecks::is_less_than(bound))
    }

    #[track_caller]
    fn is_less_than_named<E>(self, bound: E, name: &str) -> Outcome<Self>
    where
        T: PartialOrd<E>,
        E: Debug + Any,
    {
        delegate!(self, ComparableChecks::is_less_than_named(bound, name))
    }

    #[track_caller]
    fn is_less_than_or_equal_to<E>(self, bound: E) -> Outcome<Self>
    where
        T: PartialOrd<E>,
        E: Debug + Any,
    {
        delegate!(self, ComparableChecks::is_less_than_or_equal_to(bound))
    }

    #[track_caller]
    fn is_less_than_or_equal_to_named<E>(self, bound: E, name: &str) -> Outcome<Self>
    where
        T: PartialOrd<E>,
        E: Debug + Any,
    {
        delegate!(self, ComparableChecks::is_less_than_or_equal_to_named(bound, name))
    }

    #[track_caller]
    fn is_greater_than<E>(self, bound: E) -> Outcome<Self>
    where
        T: PartialOrd<E>,
        E: Debug + Any,
    {
        delegate!(self, ComparableChecks::is_greater_than(bound))
    }

    #[track_caller]
    fn is_greater_than_named<E>(self, bound: E, name: &str) -> Outcome<Self>
    where
        T: PartialOrd<E>,
        E: Debug + Any,
    {
        delegate!(self, ComparableChecks::is_greater_than_named(bound, name))
    }

    #[track_caller]
    fn is_greater_than_or_equal_to<E>(self, bound: E) -> Outcome<Self>
    where
        T: PartialOrd<E>,
        E: Debug + Any,
    {
        delegate!(self, ComparableChecks::is_greater_than_or_equal_to(bound))
    }

    #[track_caller]
    fn is_greater_than_or_equal_to_named<E>(self, bound: E, name: &str) -> Outcome<Self>
    where
        T: PartialOrd<E>,
        E: Debug + Any,
    {
        delegate!(self, ComparableChecks::is_greater_than_or_equal_to_named(bound, name))
    }

    #[track_caller]
    fn is_between<E>(self, start: E, end: E) -> Outcome<Self>
    where
        T: PartialOrd<E>,
        E: PartialOrd + Debug + Any,
    {
        delegate!(self, ComparableChecks::is_between(start, end))
    }

    #[track_caller]
    fn is_between_closed<E>(self, start: E, end: E) -> Outcome<Self>
    where
        T: PartialOrd<E>,
        E: PartialOrd + Debug + Any,
    {
        delegate!(self, ComparableChecks::is_between_closed(start, end))
    }

    #[track_caller]
    fn is_in<R>(self, range: R) -> Outcome<Self>
    where
        R: RangeBounds<T>,
        T: PartialOrd,
    {
        delegate!(self, ComparableChecks::is_in(range))
    }
}

impl<T, K> SignedChecks for Assertion<T, K>
where
    T: SignedNumber,
    K: FailureSink,
{
    #[track_caller]
    fn is_negative(self) -> Outcome<Self> {
        delegate!(self, SignedChecks::is_negative())
    }

    #[track_caller]
    fn is_not_negative(self) -> Outcome<Self> {
        delegate!(self, SignedChecks::is_not_negative())
    }

    #[track_caller]
    fn is_zero(self) -> Outcome<Self> {
        delegate!(self, SignedChecks::is_zero())
    }

    #[track_caller]
    fn is_not_zero(self) -> Outcome<Self> {
        delegate!(self, SignedChecks::is_not_zero())
    }

    #[track_caller]
    fn is_positive(self) -> Outcome<Self> {
        delegate!(self, SignedChecks::is_positive())
    }

    #[track_caller]
    fn is_not_positive(self) -> Outcome<Self> {
        delegate!(self, SignedChecks::is_not_positive())
    }
}

#[allow(deprecated)]
impl<T, K> UnsignedChecks for Assertion<T, K>
where
    T: UnsignedNumber,
    K: FailureSink,
{
    #[track_caller]
    fn is_negative(self) -> Outcome<Self> {
        delegate!(self, UnsignedChecks::is_negative())
    }

    #[track_caller]
    fn is_not_negative(self) -> Outcome<Self> {
        delegate!(self, UnsignedChecks::is_not_negative())
    }

    #[track_caller]
    fn is_zero(self) -> Outcome<Self> {
        delegate!(self, UnsignedChecks::is_zero())
    }

    #[track_caller]
    fn is_not_zero(self) -> Outcome<Self> {
        delegate!(self, UnsignedChecks::is_not_zero())
    }

    #[track_caller]
    fn is_positive(self) -> Outcome<Self> {
        delegate!(self, UnsignedChecks::is_positive())
    }

    #[track_caller]
    fn is_not_positive(self) -> Outcome<Self> {
        delegate!(self, UnsignedChecks::is_not_positive())
    }
}

#[allow(deprecated)]
impl<T, K> NonZeroChecks for Assertion<T, K>
where
    T: NonZeroNumber,
    K: FailureSink,
{
    #[track_caller]
    fn is_negative(self) -> Outcome<Self> {
        delegate!(self, NonZeroChecks::is_negative())
    }

    #[track_caller]
    fn is_not_negative(self) -> Outcome<Self> {
        delegate!(self, NonZeroChecks::is_not_negative())
    }

    #[track_caller]
    fn is_zero(self) -> Outcome<Self> {
        delegate!(self, NonZeroChecks::is_zero())
    }

    #[track_caller]
    fn is_not_zero(self) -> Outcome<Self> {
        delegate!(self, NonZeroChecks::is_not_zero())
    }

    #[track_caller]
    fn is_positive(self) -> Outcome<Self> {
        delegate!(self, NonZeroChecks::is_positive())
    }

    #[track_caller]
    fn is_not_positive(self) -> Outcome<Self> {
        delegate!(self, NonZeroChecks::is_not_positive())
    }
}

impl<T, K> SizedChecks for Assertion<T, K>
where
    T: Sizable + Debug + Any,
    K: FailureSink,
{
    type Size = Assertion<usize, K>;

    #[track_caller]
    fn is_empty(self) -> Outcome<Self> {
        delegate!(self, SizedChecks::is_empty())
    }

    #[track_caller]
    fn is_not_empty(self) -> Outcome<Self> {
        delegate!(self, SizedChecks::is_not_empty())
    }

    #[track_caller]
    fn has_size(self, expected: usize) -> Outcome<Self> {
        delegate!(self, SizedChecks::has_size(expected))
    }

    fn size(self) -> Self::Size {
        derived!(self, SizedChecks::size)
    }
}

impl<T, K> ContainerChecks for Assertion<T, K>
where
    T: Container + Debug + Any,
    K: FailureSink,
{
    type Item = T::Item;

    #[track_caller]
    fn contains<E>(self, element: E) -> Outcome<Self>
    where
        T::Item: PartialEq<E>,
        E: Debug + Any,
    {
        delegate!(self, ContainerChecks::contains(element))
    }

    #[track_caller]
    fn contains_named<E>(self, element: E, name: &str) -> Outcome<Self>
    where
        T::Item: PartialEq<E>,
        E: Debug + Any,
    {
        delegate!(self, ContainerChecks::contains_named(element, name))
    }

    #[track_caller]
    fn contains_all<E>(self, elements: &[E]) -> Outcome<Self>
    where
        T::Item: PartialEq<E>,
        E: Debug + Any,
    {
        delegate!(self, ContainerChecks::contains_all(elements))
    }

    #[track_caller]
    fn contains_any<E>(self, elements: &[E]) -> Outcome<Self>
    where
        T::Item: PartialEq<E>,
        E: Debug + Any,
    {
        delegate!(self, ContainerChecks::contains_any(elements))
    }

    #[track_caller]
    fn does_not_contain<E>(self, element: E) -> Outcome<Self>
    where
        T::Item: PartialEq<E>,
        E: Debug + Any,
    {
        delegate!(self, ContainerChecks::does_not_contain(element))
    }

    #[track_caller]
    fn does_not_contain_any<E>(self, elements: &[E]) -> Outcome<Self>
    where
        T::Item: PartialEq<E>,
        E: Debug + Any,
    {
        delegate!(self, ContainerChecks::does_not_contain_any(elements))
    }

    #[track_caller]
    fn does_not_contain_all<E>(self, elements: &[E]) -> Outcome<Self>
    where
        T::Item: PartialEq<E>,
        E: Debug + Any,
    {
        delegate!(self, ContainerChecks::does_not_contain_all(elements))
    }

    #[track_caller]
    fn contains_exactly<E>(self, elements: &[E]) -> Outcome<Self>
    where
        T::Item: PartialEq<E>,
        E: Debug + Any,
    {
        delegate!(self, ContainerChecks::contains_exactly(elements))
    }

    #[track_caller]
    fn contains_exactly_named<E>(self, elements: &[E], name: &str) -> Outcome<Self>
    where
        T::Item: PartialEq<E>,
        E: Debug + Any,
    {
        delegate!(self, ContainerChecks::contains_exactly_named(elements, name))
    }

    #[track_caller]
    fn does_not_contain_duplicates(self) -> Outcome<Self>
    where
        T::Item: PartialEq,
    {
        delegate!(self, ContainerChecks::does_not_contain_duplicates())
    }
}

impl<T, K> MapChecks for Assertion<T, K>
where
    T: Map + Debug + Any,
    K: FailureSink,
{
    type Key = T::Key;
    type Keys = Assertion<Vec<T::Key>, K>;
    type Values = Assertion<Vec<T::Val>, K>;

    #[track_caller]
    fn contains_key<E>(self, key: E) -> Outcome<Self>
    where
        T::Key: PartialEq<E>,
        E: Debug + Any,
    {
        delegate!(self, MapChecks::contains_key(key))
    }

    #[track_caller]
    fn does_not_contain_key<E>(self, key: E) -> Outcome<Self>
    where
        T::Key: PartialEq<E>,
        E: Debug + Any,
    {
        delegate!(self, MapChecks::does_not_contain_key(key))
    }

    fn keys(self) -> Self::Keys {
        derived!(self, MapChecks::keys)
    }

    fn values(self) -> Self::Values {
        derived!(self, MapChecks::values)
    }
}

impl<T, K> StringChecks for Assertion<T, K>
where
    T: Text,
    K: FailureSink,
{
    type Trimmed = Assertion<String, K>;
    type Length = Assertion<usize, K>;

    #[track_caller]
    fn starts_with(self, prefix: &str) -> Outcome<Self> {
        delegate!(self, StringChecks::starts_with(prefix))
    }

    #[track_caller]
    fn does_not_start_with(self, prefix: &str) -> Outcome<Self> {
        delegate!(self, StringChecks::does_not_start_with(prefix))
    }

    #[track_caller]
    fn ends_with(self, suffix: &str) -> Outcome<Self> {
        delegate!(self, StringChecks::ends_with(suffix))
    }

    #[track_caller]
    fn does_not_end_with(self, suffix: &str) -> Outcome<Self> {
        delegate!(self, StringChecks::does_not_end_with(suffix))
    }

    #[track_caller]
    fn contains(self, needle: &str) -> Outcome<Self> {
        delegate!(self, StringChecks::contains(needle))
    }

    #[track_caller]
    fn does_not_contain(self, needle: &str) -> Outcome<Self> {
        delegate!(self, StringChecks::does_not_contain(needle))
    }

    #[track_caller]
    fn is_empty(self) -> Outcome<Self> {
        delegate!(self, StringChecks::is_empty())
    }

    #[track_caller]
    fn is_not_empty(self) -> Outcome<Self> {
        delegate!(self, StringChecks::is_not_empty())
    }

    #[track_caller]
    fn is_blank(self) -> Outcome<Self> {
        delegate!(self, StringChecks::is_blank())
    }

    #[track_caller]
    fn is_not_blank(self) -> Outcome<Self> {
        delegate!(self, StringChecks::is_not_blank())
    }

    fn trim(self) -> Self::Trimmed {
        derived!(self, StringChecks::trim)
    }

    fn length(self) -> Self::Length {
        derived!(self, StringChecks::length)
    }
}
