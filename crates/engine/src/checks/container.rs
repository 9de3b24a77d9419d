use std::any::Any;
use std::fmt::Debug;

use stipulate_core::FailureKind;

use crate::capability::{
    Container, ContainerChecks, Map, MapChecks, Outcome, Sizable, SizedChecks,
};
use crate::message::list;
use crate::sink::FailureSink;
use crate::verifier::Verifier;

impl<T, K> SizedChecks for Verifier<T, K>
where
    T: Sizable + Debug + Any,
    K: FailureSink,
{
    type Size = Verifier<usize, K>;

    #[track_caller]
    fn is_empty(self) -> Outcome<Self> {
        let passed = self.value().size() == 0;
        self.check(passed, FailureKind::InvalidArgument, |s| {
            s.message(format!("{} must be empty.", s.name()))
                .actual(s.value())
                .build()
        })
    }

    #[track_caller]
    fn is_not_empty(self) -> Outcome<Self> {
        let passed = self.value().size() != 0;
        self.check(passed, FailureKind::InvalidArgument, |s| {
            s.message(format!("{} may not be empty.", s.name())).build()
        })
    }

    #[track_caller]
    fn has_size(self, expected: usize) -> Outcome<Self> {
        let actual = self.value().size();
        self.check(actual == expected, FailureKind::InvalidArgument, |s| {
            let unit = if expected == 1 { "element" } else { "elements" };
            s.message(format!("{} must contain {expected} {unit}.", s.name()))
                .line("Size", actual.to_string())
                .actual(s.value())
                .build()
        })
    }

    fn size(self) -> Self::Size {
        self.derive("size()", |v| v.size())
    }
}

impl<T, K> Verifier<T, K>
where
    T: Container + Debug + Any,
    K: FailureSink,
{
    fn has_item<E>(&self, element: &E) -> bool
    where
        T::Item: PartialEq<E>,
    {
        self.value().items().any(|item| item == element)
    }

    fn absent<'e, E>(&self, elements: &'e [E]) -> Vec<&'e E>
    where
        T::Item: PartialEq<E>,
    {
        elements.iter().filter(|e| !self.has_item(*e)).collect()
    }

    fn present<'e, E>(&self, elements: &'e [E]) -> Vec<&'e E>
    where
        T::Item: PartialEq<E>,
    {
        elements.iter().filter(|e| self.has_item(*e)).collect()
    }

    /// Elements of the value that match none of `elements`
    fn unwanted<E>(&self, elements: &[E]) -> Vec<&T::Item>
    where
        T::Item: PartialEq<E>,
    {
        self.value()
            .items()
            .filter(|item| !elements.iter().any(|e| *item == e))
            .collect()
    }

    #[track_caller]
    fn check_exactly<E>(self, elements: &[E], other: Option<&str>) -> K::Out<Self>
    where
        T::Item: PartialEq<E>,
        E: Debug + Any,
    {
        if let Some(name) = other {
            self.require_other_name(name);
        }
        let missing = self.absent(elements);
        let passed = missing.is_empty() && self.unwanted(elements).is_empty();
        self.check(passed, FailureKind::InvalidArgument, |s| {
            let config = s.configuration();
            let unwanted = s.unwanted(elements);
            let mut message = match other {
                Some(name) => s
                    .message(format!(
                        "{} must consist of the same elements as {}, regardless of their order.",
                        s.name(),
                        name.trim()
                    ))
                    .line(name.trim(), list(config, elements)),
                None => s.message(format!(
                    "{} must consist of the elements {}, regardless of their order.",
                    s.name(),
                    list(config, elements)
                )),
            }
            .actual(s.value());
            if !missing.is_empty() {
                message = message.line("Missing", list(config, missing.iter().copied()));
            }
            if !unwanted.is_empty() {
                message = message.line("Unwanted", list(config, unwanted.iter().copied()));
            }
            message.build()
        })
    }
}

impl<T, K> ContainerChecks for Verifier<T, K>
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
        let passed = self.has_item(&element);
        self.check(passed, FailureKind::InvalidArgument, |s| {
            s.message(format!("{} must contain {}.", s.name(), s.render(&element)))
                .actual(s.value())
                .build()
        })
    }

    #[track_caller]
    fn contains_named<E>(self, element: E, name: &str) -> Outcome<Self>
    where
        T::Item: PartialEq<E>,
        E: Debug + Any,
    {
        self.require_other_name(name);
        let passed = self.has_item(&element);
        self.check(passed, FailureKind::InvalidArgument, |s| {
            s.message(format!("{} must contain {}.", s.name(), name.trim()))
                .line(name.trim(), s.render(&element))
                .actual(s.value())
                .build()
        })
    }

    #[track_caller]
    fn contains_all<E>(self, elements: &[E]) -> Outcome<Self>
    where
        T::Item: PartialEq<E>,
        E: Debug + Any,
    {
        let missing = self.absent(elements);
        self.check(missing.is_empty(), FailureKind::InvalidArgument, |s| {
            let config = s.configuration();
            s.message(format!(
                "{} must contain all elements of {}.",
                s.name(),
                list(config, elements)
            ))
            .actual(s.value())
            .line("Missing", list(config, missing.iter().copied()))
            .build()
        })
    }

    #[track_caller]
    fn contains_any<E>(self, elements: &[E]) -> Outcome<Self>
    where
        T::Item: PartialEq<E>,
        E: Debug + Any,
    {
        let passed = elements.iter().any(|e| self.has_item(e));
        self.check(passed, FailureKind::InvalidArgument, |s| {
            s.message(format!(
                "{} must contain any element of {}.",
                s.name(),
                list(s.configuration(), elements)
            ))
            .actual(s.value())
            .build()
        })
    }

    #[track_caller]
    fn does_not_contain<E>(self, element: E) -> Outcome<Self>
    where
        T::Item: PartialEq<E>,
        E: Debug + Any,
    {
        let passed = !self.has_item(&element);
        self.check(passed, FailureKind::InvalidArgument, |s| {
            s.message(format!("{} may not contain {}.", s.name(), s.render(&element)))
                .actual(s.value())
                .build()
        })
    }

    #[track_caller]
    fn does_not_contain_any<E>(self, elements: &[E]) -> Outcome<Self>
    where
        T::Item: PartialEq<E>,
        E: Debug + Any,
    {
        let unwanted = self.present(elements);
        self.check(unwanted.is_empty(), FailureKind::InvalidArgument, |s| {
            let config = s.configuration();
            s.message(format!(
                "{} may not contain any element of {}.",
                s.name(),
                list(config, elements)
            ))
            .actual(s.value())
            .line("Unwanted", list(config, unwanted.iter().copied()))
            .build()
        })
    }

    #[track_caller]
    fn does_not_contain_all<E>(self, elements: &[E]) -> Outcome<Self>
    where
        T::Item: PartialEq<E>,
        E: Debug + Any,
    {
        let passed = elements.iter().any(|e| !self.has_item(e));
        self.check(passed, FailureKind::InvalidArgument, |s| {
            s.message(format!(
                "{} may not contain all elements of {}.",
                s.name(),
                list(s.configuration(), elements)
            ))
            .actual(s.value())
            .build()
        })
    }

    #[track_caller]
    fn contains_exactly<E>(self, elements: &[E]) -> Outcome<Self>
    where
        T::Item: PartialEq<E>,
        E: Debug + Any,
    {
        self.check_exactly(elements, None)
    }

    #[track_caller]
    fn contains_exactly_named<E>(self, elements: &[E], name: &str) -> Outcome<Self>
    where
        T::Item: PartialEq<E>,
        E: Debug + Any,
    {
        self.check_exactly(elements, Some(name))
    }

    #[track_caller]
    fn does_not_contain_duplicates(self) -> Outcome<Self>
    where
        T::Item: PartialEq,
    {
        let passed = duplicates(self.value()).is_empty();
        self.check(passed, FailureKind::InvalidArgument, |s| {
            let duplicates = duplicates(s.value());
            s.message(format!("{} may not contain duplicate elements.", s.name()))
                .actual(s.value())
                .line("Duplicates", list(s.configuration(), duplicates.iter().copied()))
                .build()
        })
    }
}

impl<T, K> MapChecks for Verifier<T, K>
where
    T: Map + Debug + Any,
    K: FailureSink,
{
    type Key = T::Key;
    type Keys = Verifier<Vec<T::Key>, K>;
    type Values = Verifier<Vec<T::Val>, K>;

    #[track_caller]
    fn contains_key<E>(self, key: E) -> Outcome<Self>
    where
        T::Key: PartialEq<E>,
        E: Debug + Any,
    {
        let passed = self.value().key_iter().any(|k| k == &key);
        self.check(passed, FailureKind::InvalidArgument, |s| {
            s.message(format!("{} must contain the key {}.", s.name(), s.render(&key)))
                .line("Keys", list(s.configuration(), s.value().key_iter()))
                .build()
        })
    }

    #[track_caller]
    fn does_not_contain_key<E>(self, key: E) -> Outcome<Self>
    where
        T::Key: PartialEq<E>,
        E: Debug + Any,
    {
        let passed = !self.value().key_iter().any(|k| k == &key);
        self.check(passed, FailureKind::InvalidArgument, |s| {
            s.message(format!("{} may not contain the key {}.", s.name(), s.render(&key)))
                .actual(s.value())
                .build()
        })
    }

    fn keys(self) -> Self::Keys {
        self.derive("keys()", Map::into_key_list)
    }

    fn values(self) -> Self::Values {
        self.derive("values()", Map::into_value_list)
    }
}

/// Elements occurring more than once, each listed once in order of first
/// repetition
fn duplicates<C>(container: &C) -> Vec<&C::Item>
where
    C: Container,
    C::Item: PartialEq,
{
    let items: Vec<&C::Item> = container.items().collect();
    let mut duplicates: Vec<&C::Item> = Vec::new();
    for (i, item) in items.iter().enumerate() {
        if items[..i].contains(item) && !duplicates.contains(item) {
            duplicates.push(item);
        }
    }
    duplicates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::ComparableChecks;
    use crate::sink::{Collecting, Eager};
    use std::collections::{BTreeMap, BTreeSet};
    use stipulate_core::ConfigLayer;

    fn eager<T>(value: T, name: &str) -> Verifier<T, Eager> {
        Verifier::with_layers(value, name, ConfigLayer::new(), ConfigLayer::new(), ConfigLayer::new())
    }

    fn collecting<T>(value: T, name: &str) -> Verifier<T, Collecting> {
        Verifier::with_layers(value, name, ConfigLayer::new(), ConfigLayer::new(), ConfigLayer::new())
    }

    // === Size Tests ===

    #[test]
    fn test_size_checks() {
        assert!(eager(Vec::<i32>::new(), "list").is_empty().is_ok());
        assert!(eager(vec![1], "list").is_not_empty().is_ok());
        assert!(eager([1, 2, 3], "list").has_size(3).is_ok());
        let err = eager(vec![1, 2], "list").has_size(1).unwrap_err();
        assert_eq!(
            err.message(),
            "list must contain 1 element.\nSize  : 2\nActual: [1, 2]"
        );
    }

    #[test]
    fn test_size_derives_subject() {
        let err = eager(vec![1, 2], "list")
            .size()
            .is_greater_than(5usize)
            .unwrap_err();
        assert_eq!(
            err.message(),
            "list.size() must be greater than 5.\nActual: 2"
        );
    }

    // === Membership Tests ===

    #[test]
    fn test_contains() {
        assert!(eager(vec![1, 2, 3], "ids").contains(2).is_ok());
        let err = eager(vec![1, 2, 3], "ids").contains(7).unwrap_err();
        assert_eq!(err.message(), "ids must contain 7.\nActual: [1, 2, 3]");
        assert!(eager(vec![1, 2, 3], "ids").does_not_contain(7).is_ok());
    }

    #[test]
    fn test_contains_all_lists_missing() {
        let err = eager(vec![1, 2, 3], "ids").contains_all(&[2, 4, 5]).unwrap_err();
        assert_eq!(
            err.message(),
            "ids must contain all elements of [2, 4, 5].\nActual : [1, 2, 3]\nMissing: [4, 5]"
        );
    }

    #[test]
    fn test_contains_any_and_does_not_contain_any() {
        assert!(eager(vec![1, 2, 3], "ids").contains_any(&[9, 3]).is_ok());
        assert!(eager(vec![1, 2, 3], "ids").contains_any(&[9]).is_err());
        let err = eager(vec![1, 2, 3], "ids")
            .does_not_contain_any(&[3, 9, 1])
            .unwrap_err();
        assert!(err.message().ends_with("Unwanted: [3, 1]"));
    }

    #[test]
    fn test_does_not_contain_all() {
        assert!(eager(vec![1, 2, 3], "ids").does_not_contain_all(&[1, 9]).is_ok());
        assert!(eager(vec![1, 2, 3], "ids").does_not_contain_all(&[1, 2]).is_err());
    }

    #[test]
    fn test_contains_exactly_ignores_order() {
        assert!(eager(vec![1, 2, 3], "ids").contains_exactly(&[3, 2, 1]).is_ok());
        let set: BTreeSet<i32> = [1, 2].into_iter().collect();
        assert!(eager(set, "ids").contains_exactly(&[2, 1]).is_ok());
    }

    #[test]
    fn test_contains_exactly_lists_unwanted() {
        let err = eager(vec![1, 2, 3], "ids").contains_exactly(&[1, 2]).unwrap_err();
        assert_eq!(
            err.message(),
            "ids must consist of the elements [1, 2], regardless of their order.\n\
             Actual  : [1, 2, 3]\n\
             Unwanted: [3]"
        );
    }

    #[test]
    fn test_contains_exactly_named_lists_missing() {
        let err = eager(vec![1], "ids")
            .contains_exactly_named(&[1, 2], "expected")
            .unwrap_err();
        assert!(err.message().contains("as expected, regardless of their order."));
        assert!(err.message().contains("Missing : [2]"));
    }

    #[test]
    fn test_duplicates() {
        assert!(eager(vec![1, 2, 3], "ids").does_not_contain_duplicates().is_ok());
        let err = eager(vec![1, 2, 1, 1, 3, 3], "ids")
            .does_not_contain_duplicates()
            .unwrap_err();
        assert!(err.message().ends_with("Duplicates: [1, 3]"));
    }

    // === Map Tests ===

    #[test]
    fn test_map_checks() {
        let map: BTreeMap<&str, i32> = [("a", 1), ("b", 2)].into_iter().collect();
        let v = collecting(map, "headers")
            .contains_key("a")
            .contains_key("z")
            .does_not_contain_key("b");
        assert_eq!(
            v.messages(),
            vec![
                "headers must contain the key \"z\".\nKeys: [\"a\", \"b\"]",
                "headers may not contain the key \"b\".\nActual: {\"a\": 1, \"b\": 2}",
            ]
        );
    }

    #[test]
    fn test_map_derived_subjects() {
        let map: BTreeMap<&str, i32> = [("a", 1), ("b", 2)].into_iter().collect();
        assert!(eager(map.clone(), "headers").keys().contains_exactly(&["b", "a"]).is_ok());
        let err = eager(map, "headers").values().contains(3).unwrap_err();
        assert!(err.message().starts_with("headers.values() must contain 3."));
    }
}
