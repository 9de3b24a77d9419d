//! Capability traits
//!
//! Each trait is one family of checks. A subject type gets a family when its
//! value type supports it: ordering checks for `PartialOrd` values,
//! containment checks for collections, and so on. The same traits are
//! implemented by the active [`Verifier`](crate::Verifier), the inactive
//! [`NoOp`](crate::NoOp), and the [`Assertion`](crate::Assertion) that picks
//! between them, so callers see one API whatever runs behind it.
//!
//! Every check returns an [`Outcome`]: `Result<Self, Violation>` for eager
//! chains, `Self` for collecting chains.

use std::any::Any;
use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::error::Error;
use std::fmt::Debug;
use std::num::{NonZeroU128, NonZeroU16, NonZeroU32, NonZeroU64, NonZeroU8, NonZeroUsize};
use std::ops::RangeBounds;
use std::{collections::btree_map, collections::btree_set, collections::hash_map};
use std::{collections::hash_set, collections::vec_deque, slice};

use crate::sink::FailureSink;

/// Something checks can be chained on.
pub trait Subject: Sized {
    /// Type of the value under test
    type Value;
    /// Failure sink of the chain
    type Sink: FailureSink;
}

/// What a check on subject `S` returns
pub type Outcome<S> = <<S as Subject>::Sink as FailureSink>::Out<S>;

// ============================================================================
// Value domains
// ============================================================================

/// Numbers that can be negative
pub trait SignedNumber: PartialOrd + Copy + Debug + Any {
    /// The additive identity
    const ZERO: Self;
}

/// Numbers that can never be negative
pub trait UnsignedNumber: PartialOrd + Copy + Debug + Any {
    /// The additive identity
    const ZERO: Self;
}

/// Numbers that can never be zero or negative
pub trait NonZeroNumber: Copy + Debug + Any {}

macro_rules! impl_signed {
    ($($t:ty => $zero:expr),* $(,)?) => {
        $(impl SignedNumber for $t { const ZERO: Self = $zero; })*
    };
}

macro_rules! impl_unsigned {
    ($($t:ty),* $(,)?) => {
        $(impl UnsignedNumber for $t { const ZERO: Self = 0; })*
    };
}

impl_signed!(i8 => 0, i16 => 0, i32 => 0, i64 => 0, i128 => 0, isize => 0, f32 => 0.0, f64 => 0.0);
impl_unsigned!(u8, u16, u32, u64, u128, usize);

impl NonZeroNumber for NonZeroU8 {}
impl NonZeroNumber for NonZeroU16 {}
impl NonZeroNumber for NonZeroU32 {}
impl NonZeroNumber for NonZeroU64 {}
impl NonZeroNumber for NonZeroU128 {}
impl NonZeroNumber for NonZeroUsize {}

/// Values with an element count
pub trait Sizable {
    /// Number of elements
    fn size(&self) -> usize;
}

/// Collections whose elements can be inspected
pub trait Container {
    /// Element type
    type Item: Debug + Any;
    /// Borrowing iterator over the elements
    type Iter<'a>: Iterator<Item = &'a Self::Item>
    where
        Self: 'a;
    /// Iterate the elements
    fn items(&self) -> Self::Iter<'_>;
}

/// Key-value collections
pub trait Map {
    /// Key type
    type Key: Debug + Any;
    /// Value type
    type Val: Debug + Any;
    /// Borrowing iterator over the keys
    type KeyIter<'a>: Iterator<Item = &'a Self::Key>
    where
        Self: 'a;
    /// Iterate the keys
    fn key_iter(&self) -> Self::KeyIter<'_>;
    /// Consume the map into its keys
    fn into_key_list(self) -> Vec<Self::Key>;
    /// Consume the map into its values
    fn into_value_list(self) -> Vec<Self::Val>;
}

/// Owned or static string values
pub trait Text: Debug + Any {
    /// The string contents
    fn text(&self) -> &str;
}

impl<T> Sizable for Vec<T> {
    fn size(&self) -> usize {
        self.len()
    }
}

impl<T> Sizable for VecDeque<T> {
    fn size(&self) -> usize {
        self.len()
    }
}

impl<T, const N: usize> Sizable for [T; N] {
    fn size(&self) -> usize {
        N
    }
}

impl<T, S> Sizable for HashSet<T, S> {
    fn size(&self) -> usize {
        self.len()
    }
}

impl<T> Sizable for BTreeSet<T> {
    fn size(&self) -> usize {
        self.len()
    }
}

impl<K, V, S> Sizable for HashMap<K, V, S> {
    fn size(&self) -> usize {
        self.len()
    }
}

impl<K, V> Sizable for BTreeMap<K, V> {
    fn size(&self) -> usize {
        self.len()
    }
}

impl<T: Debug + Any> Container for Vec<T> {
    type Item = T;
    type Iter<'a> = slice::Iter<'a, T> where Self: 'a;

    fn items(&self) -> Self::Iter<'_> {
        self.iter()
    }
}

impl<T: Debug + Any> Container for VecDeque<T> {
    type Item = T;
    type Iter<'a> = vec_deque::Iter<'a, T> where Self: 'a;

    fn items(&self) -> Self::Iter<'_> {
        self.iter()
    }
}

impl<T: Debug + Any, const N: usize> Container for [T; N] {
    type Item = T;
    type Iter<'a> = slice::Iter<'a, T> where Self: 'a;

    fn items(&self) -> Self::Iter<'_> {
        self.iter()
    }
}

impl<T: Debug + Any, S> Container for HashSet<T, S> {
    type Item = T;
    type Iter<'a> = hash_set::Iter<'a, T> where Self: 'a;

    fn items(&self) -> Self::Iter<'_> {
        self.iter()
    }
}

impl<T: Debug + Any> Container for BTreeSet<T> {
    type Item = T;
    type Iter<'a> = btree_set::Iter<'a, T> where Self: 'a;

    fn items(&self) -> Self::Iter<'_> {
        self.iter()
    }
}

impl<K: Debug + Any, V: Debug + Any, S> Map for HashMap<K, V, S> {
    type Key = K;
    type Val = V;
    type KeyIter<'a> = hash_map::Keys<'a, K, V> where Self: 'a;

    fn key_iter(&self) -> Self::KeyIter<'_> {
        self.keys()
    }

    fn into_key_list(self) -> Vec<K> {
        self.into_keys().collect()
    }

    fn into_value_list(self) -> Vec<V> {
        self.into_values().collect()
    }
}

impl<K: Debug + Any, V: Debug + Any> Map for BTreeMap<K, V> {
    type Key = K;
    type Val = V;
    type KeyIter<'a> = btree_map::Keys<'a, K, V> where Self: 'a;

    fn key_iter(&self) -> Self::KeyIter<'_> {
        self.keys()
    }

    fn into_key_list(self) -> Vec<K> {
        self.into_keys().collect()
    }

    fn into_value_list(self) -> Vec<V> {
        self.into_values().collect()
    }
}

impl Text for String {
    fn text(&self) -> &str {
        self
    }
}

impl Text for &'static str {
    fn text(&self) -> &str {
        self
    }
}

impl Text for Box<str> {
    fn text(&self) -> &str {
        self
    }
}

impl Text for Cow<'static, str> {
    fn text(&self) -> &str {
        self
    }
}

// ============================================================================
// Check families
// ============================================================================

/// Checks available on any value.
pub trait ObjectChecks: Subject {
    /// The value equals `expected`; failures show a diff when enabled
    fn is_equal_to<E>(self, expected: E) -> Outcome<Self>
    where
        Self::Value: PartialEq<E>,
        E: Debug + Any;

    /// The value equals another named value
    fn is_equal_to_named<E>(self, expected: E, name: &str) -> Outcome<Self>
    where
        Self::Value: PartialEq<E>,
        E: Debug + Any;

    /// The value differs from `unwanted`
    fn is_not_equal_to<E>(self, unwanted: E) -> Outcome<Self>
    where
        Self::Value: PartialEq<E>,
        E: Debug + Any;

    /// The value differs from another named value
    fn is_not_equal_to_named<E>(self, unwanted: E, name: &str) -> Outcome<Self>
    where
        Self::Value: PartialEq<E>,
        E: Debug + Any;

    /// The value equals one of `candidates`
    fn is_one_of<E>(self, candidates: &[E]) -> Outcome<Self>
    where
        Self::Value: PartialEq<E>,
        E: Debug + Any;

    /// The value equals none of `candidates`
    fn is_not_one_of<E>(self, candidates: &[E]) -> Outcome<Self>
    where
        Self::Value: PartialEq<E>,
        E: Debug + Any;

    /// The value's type is exactly `U`
    fn is_instance_of<U: Any>(self) -> Outcome<Self>;

    /// `predicate` accepts the value; its error becomes the failure's cause
    fn satisfies<F, X>(self, description: &str, predicate: F) -> Outcome<Self>
    where
        F: FnOnce(&Self::Value) -> Result<(), X>,
        X: Error + Send + Sync + 'static;
}

/// Checks on optional values.
pub trait OptionChecks: Subject {
    /// The value is `None`
    fn is_null(self) -> Outcome<Self>;

    /// The value is `Some`; failures map to a missing-value error
    fn is_not_null(self) -> Outcome<Self>;
}

/// Ordering checks.
pub trait ComparableChecks: Subject {
    /// value < bound
    fn is_less_than<E>(self, bound: E) -> Outcome<Self>
    where
        Self::Value: PartialOrd<E>,
        E: Debug + Any;

    /// value < a named bound
    fn is_less_than_named<E>(self, bound: E, name: &str) -> Outcome<Self>
    where
        Self::Value: PartialOrd<E>,
        E: Debug + Any;

    /// value <= bound
    fn is_less_than_or_equal_to<E>(self, bound: E) -> Outcome<Self>
    where
        Self::Value: PartialOrd<E>,
        E: Debug + Any;

    /// value <= a named bound
    fn is_less_than_or_equal_to_named<E>(self, bound: E, name: &str) -> Outcome<Self>
    where
        Self::Value: PartialOrd<E>,
        E: Debug + Any;

    /// value > bound
    fn is_greater_than<E>(self, bound: E) -> Outcome<Self>
    where
        Self::Value: PartialOrd<E>,
        E: Debug + Any;

    /// value > a named bound
    fn is_greater_than_named<E>(self, bound: E, name: &str) -> Outcome<Self>
    where
        Self::Value: PartialOrd<E>,
        E: Debug + Any;

    /// value >= bound
    fn is_greater_than_or_equal_to<E>(self, bound: E) -> Outcome<Self>
    where
        Self::Value: PartialOrd<E>,
        E: Debug + Any;

    /// value >= a named bound
    fn is_greater_than_or_equal_to_named<E>(self, bound: E, name: &str) -> Outcome<Self>
    where
        Self::Value: PartialOrd<E>,
        E: Debug + Any;

    /// start <= value < end
    ///
    /// # Panics
    ///
    /// If `start > end`.
    fn is_between<E>(self, start: E, end: E) -> Outcome<Self>
    where
        Self::Value: PartialOrd<E>,
        E: PartialOrd + Debug + Any;

    /// start <= value <= end
    ///
    /// # Panics
    ///
    /// If `start > end`.
    fn is_between_closed<E>(self, start: E, end: E) -> Outcome<Self>
    where
        Self::Value: PartialOrd<E>,
        E: PartialOrd + Debug + Any;

    /// The value lies in `range`, with the range's own bound semantics
    ///
    /// # Panics
    ///
    /// If the lower bound lies above the upper bound.
    fn is_in<R>(self, range: R) -> Outcome<Self>
    where
        R: RangeBounds<Self::Value>,
        Self::Value: PartialOrd;
}

/// Sign checks for numbers that can be negative.
pub trait SignedChecks: Subject {
    /// value < 0
    fn is_negative(self) -> Outcome<Self>;
    /// value >= 0
    fn is_not_negative(self) -> Outcome<Self>;
    /// value == 0
    fn is_zero(self) -> Outcome<Self>;
    /// value != 0
    fn is_not_zero(self) -> Outcome<Self>;
    /// value > 0
    fn is_positive(self) -> Outcome<Self>;
    /// value <= 0
    fn is_not_positive(self) -> Outcome<Self>;
}

/// Sign checks for numbers that can never be negative.
pub trait UnsignedChecks: Subject {
    /// Can never pass.
    ///
    /// # Panics
    ///
    /// Always, as a code defect.
    #[deprecated(note = "an unsigned value can never be negative")]
    fn is_negative(self) -> Outcome<Self>;

    /// Always passes.
    #[deprecated(note = "an unsigned value is never negative; this check always passes")]
    fn is_not_negative(self) -> Outcome<Self>;

    /// value == 0
    fn is_zero(self) -> Outcome<Self>;
    /// value != 0
    fn is_not_zero(self) -> Outcome<Self>;
    /// value > 0
    fn is_positive(self) -> Outcome<Self>;
    /// value == 0
    fn is_not_positive(self) -> Outcome<Self>;
}

/// Sign checks for numbers that can never be zero or negative.
pub trait NonZeroChecks: Subject {
    /// Can never pass.
    ///
    /// # Panics
    ///
    /// Always, as a code defect.
    #[deprecated(note = "a non-zero value can never be negative")]
    fn is_negative(self) -> Outcome<Self>;

    /// Always passes.
    #[deprecated(note = "a non-zero value is never negative; this check always passes")]
    fn is_not_negative(self) -> Outcome<Self>;

    /// Can never pass.
    ///
    /// # Panics
    ///
    /// Always, as a code defect.
    #[deprecated(note = "a non-zero value can never be zero")]
    fn is_zero(self) -> Outcome<Self>;

    /// Always passes.
    #[deprecated(note = "a non-zero value is never zero; this check always passes")]
    fn is_not_zero(self) -> Outcome<Self>;

    /// Always passes.
    #[deprecated(note = "a non-zero value is always positive; this check always passes")]
    fn is_positive(self) -> Outcome<Self>;

    /// Can never pass.
    ///
    /// # Panics
    ///
    /// Always, as a code defect.
    #[deprecated(note = "a non-zero value is always positive")]
    fn is_not_positive(self) -> Outcome<Self>;
}

/// Checks on element counts.
pub trait SizedChecks: Subject {
    /// Subject over the element count
    type Size;

    /// No elements
    fn is_empty(self) -> Outcome<Self>;
    /// At least one element
    fn is_not_empty(self) -> Outcome<Self>;
    /// Exactly `expected` elements
    fn has_size(self, expected: usize) -> Outcome<Self>;
    /// Continue the chain on the element count
    fn size(self) -> Self::Size;
}

/// Membership checks on collections.
pub trait ContainerChecks: Subject {
    /// Element type
    type Item: Debug + Any;

    /// Some element equals `element`
    fn contains<E>(self, element: E) -> Outcome<Self>
    where
        Self::Item: PartialEq<E>,
        E: Debug + Any;

    /// Some element equals a named value
    fn contains_named<E>(self, element: E, name: &str) -> Outcome<Self>
    where
        Self::Item: PartialEq<E>,
        E: Debug + Any;

    /// Every one of `elements` is present
    fn contains_all<E>(self, elements: &[E]) -> Outcome<Self>
    where
        Self::Item: PartialEq<E>,
        E: Debug + Any;

    /// At least one of `elements` is present
    fn contains_any<E>(self, elements: &[E]) -> Outcome<Self>
    where
        Self::Item: PartialEq<E>,
        E: Debug + Any;

    /// No element equals `element`
    fn does_not_contain<E>(self, element: E) -> Outcome<Self>
    where
        Self::Item: PartialEq<E>,
        E: Debug + Any;

    /// None of `elements` is present
    fn does_not_contain_any<E>(self, elements: &[E]) -> Outcome<Self>
    where
        Self::Item: PartialEq<E>,
        E: Debug + Any;

    /// Not every one of `elements` is present
    fn does_not_contain_all<E>(self, elements: &[E]) -> Outcome<Self>
    where
        Self::Item: PartialEq<E>,
        E: Debug + Any;

    /// The elements match `elements` as sets: order and repetition ignored
    fn contains_exactly<E>(self, elements: &[E]) -> Outcome<Self>
    where
        Self::Item: PartialEq<E>,
        E: Debug + Any;

    /// The elements match a named collection as sets
    fn contains_exactly_named<E>(self, elements: &[E], name: &str) -> Outcome<Self>
    where
        Self::Item: PartialEq<E>,
        E: Debug + Any;

    /// No element appears twice
    fn does_not_contain_duplicates(self) -> Outcome<Self>
    where
        Self::Item: PartialEq;
}

/// Checks on key-value collections.
pub trait MapChecks: Subject {
    /// Key type
    type Key: Debug + Any;
    /// Subject over the keys
    type Keys;
    /// Subject over the values
    type Values;

    /// Some key equals `key`
    fn contains_key<E>(self, key: E) -> Outcome<Self>
    where
        Self::Key: PartialEq<E>,
        E: Debug + Any;

    /// No key equals `key`
    fn does_not_contain_key<E>(self, key: E) -> Outcome<Self>
    where
        Self::Key: PartialEq<E>,
        E: Debug + Any;

    /// Continue the chain on the keys
    fn keys(self) -> Self::Keys;

    /// Continue the chain on the values
    fn values(self) -> Self::Values;
}

/// Checks on strings.
pub trait StringChecks: Subject {
    /// Subject over the trimmed string
    type Trimmed;
    /// Subject over the length in chars
    type Length;

    /// Starts with `prefix`
    fn starts_with(self, prefix: &str) -> Outcome<Self>;
    /// Does not start with `prefix`
    fn does_not_start_with(self, prefix: &str) -> Outcome<Self>;
    /// Ends with `suffix`
    fn ends_with(self, suffix: &str) -> Outcome<Self>;
    /// Does not end with `suffix`
    fn does_not_end_with(self, suffix: &str) -> Outcome<Self>;
    /// Contains `needle`
    fn contains(self, needle: &str) -> Outcome<Self>;
    /// Does not contain `needle`
    fn does_not_contain(self, needle: &str) -> Outcome<Self>;
    /// Zero length
    fn is_empty(self) -> Outcome<Self>;
    /// Non-zero length
    fn is_not_empty(self) -> Outcome<Self>;
    /// Empty or whitespace only
    fn is_blank(self) -> Outcome<Self>;
    /// Contains a non-whitespace char
    fn is_not_blank(self) -> Outcome<Self>;
    /// Continue the chain on the trimmed string
    fn trim(self) -> Self::Trimmed;
    /// Continue the chain on the length in chars
    fn length(self) -> Self::Length;
}
