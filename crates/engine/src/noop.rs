//! The inactive subject
//!
//! [`NoOp`] implements every capability trait without looking at anything:
//! it holds no value, no name and no configuration, and each check returns
//! it unchanged. Checks that are defects for their domain (a negative
//! length, a zero non-zero) still panic, since calling them is a bug in the
//! caller whether or not assertions run.

use std::any::{self, Any};
use std::error::Error;
use std::fmt::{self, Debug};
use std::marker::PhantomData;
use std::ops::RangeBounds;

use stipulate_core::impossible_check;

use crate::capability::{
    ComparableChecks, Container, ContainerChecks, Map, MapChecks, NonZeroChecks, NonZeroNumber,
    ObjectChecks, OptionChecks, Outcome, SignedChecks, SignedNumber, Sizable, SizedChecks,
    StringChecks, Subject, Text, UnsignedChecks, UnsignedNumber,
};
use crate::sink::FailureSink;

/// A subject whose checks never run.
pub struct NoOp<T, K>(PhantomData<fn() -> (T, K)>);

impl<T, K> NoOp<T, K> {
    /// The inactive subject
    pub const fn new() -> Self {
        NoOp(PhantomData)
    }
}

impl<T, K> Default for NoOp<T, K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, K> Debug for NoOp<T, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NoOp<{}>", any::type_name::<T>())
    }
}

impl<T, K: FailureSink> Subject for NoOp<T, K> {
    type Value = T;
    type Sink = K;
}

/// Expands to trait methods that return the subject untouched.
macro_rules! pass {
    ($($method:ident),* $(,)?) => {
        $(fn $method(self) -> Outcome<Self> {
            K::proceed(self)
        })*
    };
}

impl<T, K> ObjectChecks for NoOp<T, K>
where
    T: Debug + Any,
    K: FailureSink,
{
    fn is_equal_to<E>(self, _expected: E) -> Outcome<Self>
    where
        T: PartialEq<E>,
        E: Debug + Any,
    {
        K::proceed(self)
    }

    fn is_equal_to_named<E>(self, _expected: E, _name: &str) -> Outcome<Self>
    where
        T: PartialEq<E>,
        E: Debug + Any,
    {
        K::proceed(self)
    }

    fn is_not_equal_to<E>(self, _unwanted: E) -> Outcome<Self>
    where
        T: PartialEq<E>,
        E: Debug + Any,
    {
        K::proceed(self)
    }

    fn is_not_equal_to_named<E>(self, _unwanted: E, _name: &str) -> Outcome<Self>
    where
        T: PartialEq<E>,
        E: Debug + Any,
    {
        K::proceed(self)
    }

    fn is_one_of<E>(self, _candidates: &[E]) -> Outcome<Self>
    where
        T: PartialEq<E>,
        E: Debug + Any,
    {
        K::proceed(self)
    }

    fn is_not_one_of<E>(self, _candidates: &[E]) -> Outcome<Self>
    where
        T: PartialEq<E>,
        E: Debug + Any,
    {
        K::proceed(self)
    }

    fn is_instance_of<U: Any>(self) -> Outcome<Self> {
        K::proceed(self)
    }

    fn satisfies<F, X>(self, _description: &str, _predicate: F) -> Outcome<Self>
    where
        F: FnOnce(&T) -> Result<(), X>,
        X: Error + Send + Sync + 'static,
    {
        K::proceed(self)
    }
}

impl<T, K> OptionChecks for NoOp<Option<T>, K>
where
    T: Debug + Any,
    K: FailureSink,
{
    pass!(is_null, is_not_null);
}

impl<T, K> ComparableChecks for NoOp<T, K>
where
    T: Debug + Any,
    K: FailureSink,
{
    fn is_less_than<E>(self, _bound: E) -> Outcome<Self>
    where
        T: PartialOrd<E>,
        E: Debug + Any,
    {
        K::proceed(self)
    }

    fn is_less_than_named<E>(self, _bound: E, _name: &str) -> Outcome<Self>
    where
        T: PartialOrd<E>,
        E: Debug + Any,
    {
        K::proceed(self)
    }

    fn is_less_than_or_equal_to<E>(self, _bound: E) -> Outcome<Self>
    where
        T: PartialOrd<E>,
        E: Debug + Any,
    {
        K::proceed(self)
    }

    fn is_less_than_or_equal_to_named<E>(self, _bound: E, _name: &str) -> Outcome<Self>
    where
        T: PartialOrd<E>,
        E: Debug + Any,
    {
        K::proceed(self)
    }

    fn is_greater_than<E>(self, _bound: E) -> Outcome<Self>
    where
        T: PartialOrd<E>,
        E: Debug + Any,
    {
        K::proceed(self)
    }

    fn is_greater_than_named<E>(self, _bound: E, _name: &str) -> Outcome<Self>
    where
        T: PartialOrd<E>,
        E: Debug + Any,
    {
        K::proceed(self)
    }

    fn is_greater_than_or_equal_to<E>(self, _bound: E) -> Outcome<Self>
    where
        T: PartialOrd<E>,
        E: Debug + Any,
    {
        K::proceed(self)
    }

    fn is_greater_than_or_equal_to_named<E>(self, _bound: E, _name: &str) -> Outcome<Self>
    where
        T: PartialOrd<E>,
        E: Debug + Any,
    {
        K::proceed(self)
    }

    fn is_between<E>(self, _start: E, _end: E) -> Outcome<Self>
    where
        T: PartialOrd<E>,
        E: PartialOrd + Debug + Any,
    {
        K::proceed(self)
    }

    fn is_between_closed<E>(self, _start: E, _end: E) -> Outcome<Self>
    where
        T: PartialOrd<E>,
        E: PartialOrd + Debug + Any,
    {
        K::proceed(self)
    }

    fn is_in<R>(self, _range: R) -> Outcome<Self>
    where
        R: RangeBounds<T>,
        T: PartialOrd,
    {
        K::proceed(self)
    }
}

impl<T, K> SignedChecks for NoOp<T, K>
where
    T: SignedNumber,
    K: FailureSink,
{
    pass!(
        is_negative,
        is_not_negative,
        is_zero,
        is_not_zero,
        is_positive,
        is_not_positive,
    );
}

#[allow(deprecated)]
impl<T, K> UnsignedChecks for NoOp<T, K>
where
    T: UnsignedNumber,
    K: FailureSink,
{
    #[track_caller]
    fn is_negative(self) -> Outcome<Self> {
        impossible_check(any::type_name::<T>(), "be negative")
    }

    pass!(is_not_negative, is_zero, is_not_zero, is_positive, is_not_positive);
}

#[allow(deprecated)]
impl<T, K> NonZeroChecks for NoOp<T, K>
where
    T: NonZeroNumber,
    K: FailureSink,
{
    #[track_caller]
    fn is_negative(self) -> Outcome<Self> {
        impossible_check(any::type_name::<T>(), "be negative")
    }

    #[track_caller]
    fn is_zero(self) -> Outcome<Self> {
        impossible_check(any::type_name::<T>(), "be zero")
    }

    #[track_caller]
    fn is_not_positive(self) -> Outcome<Self> {
        impossible_check(any::type_name::<T>(), "be zero or negative")
    }

    pass!(is_not_negative, is_not_zero, is_positive);
}

impl<T, K> SizedChecks for NoOp<T, K>
where
    T: Sizable + Debug + Any,
    K: FailureSink,
{
    type Size = NoOp<usize, K>;

    pass!(is_empty, is_not_empty);

    fn has_size(self, _expected: usize) -> Outcome<Self> {
        K::proceed(self)
    }

    fn size(self) -> Self::Size {
        NoOp::new()
    }
}

impl<T, K> ContainerChecks for NoOp<T, K>
where
    T: Container + Debug + Any,
    K: FailureSink,
{
    type Item = T::Item;

    fn contains<E>(self, _element: E) -> Outcome<Self>
    where
        T::Item: PartialEq<E>,
        E: Debug + Any,
    {
        K::proceed(self)
    }

    fn contains_named<E>(self, _element: E, _name: &str) -> Outcome<Self>
    where
        T::Item: PartialEq<E>,
        E: Debug + Any,
    {
        K::proceed(self)
    }

    fn contains_all<E>(self, _elements: &[E]) -> Outcome<Self>
    where
        T::Item: PartialEq<E>,
        E: Debug + Any,
    {
        K::proceed(self)
    }

    fn contains_any<E>(self, _elements: &[E]) -> Outcome<Self>
    where
        T::Item: PartialEq<E>,
        E: Debug + Any,
    {
        K::proceed(self)
    }

    fn does_not_contain<E>(self, _element: E) -> Outcome<Self>
    where
        T::Item: PartialEq<E>,
        E: Debug + Any,
    {
        K::proceed(self)
    }

    fn does_not_contain_any<E>(self, _elements: &[E]) -> Outcome<Self>
    where
        T::Item: PartialEq<E>,
        E: Debug + Any,
    {
        K::proceed(self)
    }

    fn does_not_contain_all<E>(self, _elements: &[E]) -> Outcome<Self>
    where
        T::Item: PartialEq<E>,
        E: Debug + Any,
    {
        K::proceed(self)
    }

    fn contains_exactly<E>(self, _elements: &[E]) -> Outcome<Self>
    where
        T::Item: PartialEq<E>,
        E: Debug + Any,
    {
        K::proceed(self)
    }

    fn contains_exactly_named<E>(self, _elements: &[E], _name: &str) -> Outcome<Self>
    where
        T::Item: PartialEq<E>,
        E: Debug + Any,
    {
        K::proceed(self)
    }

    fn does_not_contain_duplicates(self) -> Outcome<Self>
    where
        T::Item: PartialEq,
    {
        K::proceed(self)
    }
}

impl<T, K> MapChecks for NoOp<T, K>
where
    T: Map + Debug + Any,
    K: FailureSink,
{
    type Key = T::Key;
    type Keys = NoOp<Vec<T::Key>, K>;
    type Values = NoOp<Vec<T::Val>, K>;

    fn contains_key<E>(self, _key: E) -> Outcome<Self>
    where
        T::Key: PartialEq<E>,
        E: Debug + Any,
    {
        K::proceed(self)
    }

    fn does_not_contain_key<E>(self, _key: E) -> Outcome<Self>
    where
        T::Key: PartialEq<E>,
        E: Debug + Any,
    {
        K::proceed(self)
    }

    fn keys(self) -> Self::Keys {
        NoOp::new()
    }

    fn values(self) -> Self::Values {
        NoOp::new()
    }
}

impl<T, K> StringChecks for NoOp<T, K>
where
    T: Text,
    K: FailureSink,
{
    type Trimmed = NoOp<String, K>;
    type Length = NoOp<usize, K>;

    fn starts_with(self, _prefix: &str) -> Outcome<Self> {
        K::proceed(self)
    }

    fn does_not_start_with(self, _prefix: &str) -> Outcome<Self> {
        K::proceed(self)
    }

    fn ends_with(self, _suffix: &str) -> Outcome<Self> {
        K::proceed(self)
    }

    fn does_not_end_with(self, _suffix: &str) -> Outcome<Self> {
        K::proceed(self)
    }

    fn contains(self, _needle: &str) -> Outcome<Self> {
        K::proceed(self)
    }

    fn does_not_contain(self, _needle: &str) -> Outcome<Self> {
        K::proceed(self)
    }

    pass!(is_empty, is_not_empty, is_blank, is_not_blank);

    fn trim(self) -> Self::Trimmed {
        NoOp::new()
    }

    fn length(self) -> Self::Length {
        NoOp::new()
    }
}
