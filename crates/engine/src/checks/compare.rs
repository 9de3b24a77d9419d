use std::any::Any;
use std::fmt::Debug;
use std::ops::{Bound, RangeBounds};

use stipulate_core::{FailureKind, UsageError};

use crate::capability::{ComparableChecks, Outcome};
use crate::sink::FailureSink;
use crate::verifier::Verifier;

impl<T, K: FailureSink> Verifier<T, K>
where
    T: Debug + Any,
{
    #[track_caller]
    fn compare<E>(self, passed: bool, relation: &str, bound: &E, bound_name: Option<&str>) -> K::Out<Self>
    where
        E: Debug + Any,
    {
        if let Some(name) = bound_name {
            self.require_other_name(name);
        }
        self.check(passed, FailureKind::InvalidArgument, |s| {
            let rendered = s.render(bound);
            match bound_name {
                Some(name) => s
                    .message(format!("{} must be {relation} {}.", s.name(), name.trim()))
                    .line(name.trim(), rendered)
                    .actual(s.value())
                    .build(),
                None => s
                    .message(format!("{} must be {relation} {rendered}.", s.name()))
                    .actual(s.value())
                    .build(),
            }
        })
    }

    #[track_caller]
    fn check_between<E>(self, start: E, end: E, closed: bool) -> K::Out<Self>
    where
        T: PartialOrd<E>,
        E: PartialOrd + Debug + Any,
    {
        if start > end {
            UsageError::InvertedRange {
                name: self.name().to_string(),
                lower: self.render(&start),
                upper: self.render(&end),
            }
            .raise();
        }
        let below_end = if closed {
            *self.value() <= end
        } else {
            *self.value() < end
        };
        let passed = *self.value() >= start && below_end;
        self.check(passed, FailureKind::InvalidArgument, |s| {
            let close = if closed { ']' } else { ')' };
            s.message(format!(
                "{} must be in the range [{}, {}{close}.",
                s.name(),
                s.render(&start),
                s.render(&end)
            ))
            .actual(s.value())
            .build()
        })
    }
}

impl<T, K> ComparableChecks for Verifier<T, K>
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
        let passed = *self.value() < bound;
        self.compare(passed, "less than", &bound, None)
    }

    #[track_caller]
    fn is_less_than_named<E>(self, bound: E, name: &str) -> Outcome<Self>
    where
        T: PartialOrd<E>,
        E: Debug + Any,
    {
        let passed = *self.value() < bound;
        self.compare(passed, "less than", &bound, Some(name))
    }

    #[track_caller]
    fn is_less_than_or_equal_to<E>(self, bound: E) -> Outcome<Self>
    where
        T: PartialOrd<E>,
        E: Debug + Any,
    {
        let passed = *self.value() <= bound;
        self.compare(passed, "less than or equal to", &bound, None)
    }

    #[track_caller]
    fn is_less_than_or_equal_to_named<E>(self, bound: E, name: &str) -> Outcome<Self>
    where
        T: PartialOrd<E>,
        E: Debug + Any,
    {
        let passed = *self.value() <= bound;
        self.compare(passed, "less than or equal to", &bound, Some(name))
    }

    #[track_caller]
    fn is_greater_than<E>(self, bound: E) -> Outcome<Self>
    where
        T: PartialOrd<E>,
        E: Debug + Any,
    {
        let passed = *self.value() > bound;
        self.compare(passed, "greater than", &bound, None)
    }

    #[track_caller]
    fn is_greater_than_named<E>(self, bound: E, name: &str) -> Outcome<Self>
    where
        T: PartialOrd<E>,
        E: Debug + Any,
    {
        let passed = *self.value() > bound;
        self.compare(passed, "greater than", &bound, Some(name))
    }

    #[track_caller]
    fn is_greater_than_or_equal_to<E>(self, bound: E) -> Outcome<Self>
    where
        T: PartialOrd<E>,
        E: Debug + Any,
    {
        let passed = *self.value() >= bound;
        self.compare(passed, "greater than or equal to", &bound, None)
    }

    #[track_caller]
    fn is_greater_than_or_equal_to_named<E>(self, bound: E, name: &str) -> Outcome<Self>
    where
        T: PartialOrd<E>,
        E: Debug + Any,
    {
        let passed = *self.value() >= bound;
        self.compare(passed, "greater than or equal to", &bound, Some(name))
    }

    #[track_caller]
    fn is_between<E>(self, start: E, end: E) -> Outcome<Self>
    where
        T: PartialOrd<E>,
        E: PartialOrd + Debug + Any,
    {
        self.check_between(start, end, false)
    }

    #[track_caller]
    fn is_between_closed<E>(self, start: E, end: E) -> Outcome<Self>
    where
        T: PartialOrd<E>,
        E: PartialOrd + Debug + Any,
    {
        self.check_between(start, end, true)
    }

    #[track_caller]
    fn is_in<R>(self, range: R) -> Outcome<Self>
    where
        R: RangeBounds<T>,
        T: PartialOrd,
    {
        let lower = bound_value(range.start_bound());
        let upper = bound_value(range.end_bound());
        if let (Some(lower), Some(upper)) = (lower, upper) {
            if lower > upper {
                UsageError::InvertedRange {
                    name: self.name().to_string(),
                    lower: self.render(lower),
                    upper: self.render(upper),
                }
                .raise();
            }
        }
        let passed = range.contains(self.value());
        self.check(passed, FailureKind::InvalidArgument, |s| {
            let open = match range.start_bound() {
                Bound::Included(v) => format!("[{}", s.render(v)),
                Bound::Excluded(v) => format!("({}", s.render(v)),
                Bound::Unbounded => "(-∞".to_string(),
            };
            let close = match range.end_bound() {
                Bound::Included(v) => format!("{}]", s.render(v)),
                Bound::Excluded(v) => format!("{})", s.render(v)),
                Bound::Unbounded => "∞)".to_string(),
            };
            s.message(format!("{} must be in the range {open}, {close}.", s.name()))
                .actual(s.value())
                .build()
        })
    }
}

fn bound_value<T>(bound: Bound<&T>) -> Option<&T> {
    match bound {
        Bound::Included(v) | Bound::Excluded(v) => Some(v),
        Bound::Unbounded => None,
    }
}
