use stipulate_core::{impossible_check, FailureKind};

use crate::capability::{
    NonZeroChecks, NonZeroNumber, Outcome, SignedChecks, SignedNumber, UnsignedChecks,
    UnsignedNumber,
};
use crate::sink::FailureSink;
use crate::verifier::Verifier;

impl<T, K: FailureSink> Verifier<T, K>
where
    T: std::fmt::Debug + std::any::Any,
{
    #[track_caller]
    fn sign(self, passed: bool, header: &str) -> K::Out<Self> {
        self.check(passed, FailureKind::InvalidArgument, |s| {
            s.message(format!("{} {header}.", s.name()))
                .actual(s.value())
                .build()
        })
    }
}

impl<T, K> SignedChecks for Verifier<T, K>
where
    T: SignedNumber,
    K: FailureSink,
{
    #[track_caller]
    fn is_negative(self) -> Outcome<Self> {
        let passed = *self.value() < T::ZERO;
        self.sign(passed, "must be negative")
    }

    #[track_caller]
    fn is_not_negative(self) -> Outcome<Self> {
        let passed = *self.value() >= T::ZERO;
        self.sign(passed, "may not be negative")
    }

    #[track_caller]
    fn is_zero(self) -> Outcome<Self> {
        let passed = *self.value() == T::ZERO;
        self.sign(passed, "must be zero")
    }

    #[track_caller]
    fn is_not_zero(self) -> Outcome<Self> {
        let passed = *self.value() != T::ZERO;
        self.sign(passed, "may not be zero")
    }

    #[track_caller]
    fn is_positive(self) -> Outcome<Self> {
        let passed = *self.value() > T::ZERO;
        self.sign(passed, "must be positive")
    }

    #[track_caller]
    fn is_not_positive(self) -> Outcome<Self> {
        let passed = *self.value() <= T::ZERO;
        self.sign(passed, "may not be positive")
    }
}

#[allow(deprecated)]
impl<T, K> UnsignedChecks for Verifier<T, K>
where
    T: UnsignedNumber,
    K: FailureSink,
{
    #[track_caller]
    fn is_negative(self) -> Outcome<Self> {
        impossible_check(self.name(), "be negative")
    }

    fn is_not_negative(self) -> Outcome<Self> {
        K::proceed(self)
    }

    #[track_caller]
    fn is_zero(self) -> Outcome<Self> {
        let passed = *self.value() == T::ZERO;
        self.sign(passed, "must be zero")
    }

    #[track_caller]
    fn is_not_zero(self) -> Outcome<Self> {
        let passed = *self.value() != T::ZERO;
        self.sign(passed, "may not be zero")
    }

    #[track_caller]
    fn is_positive(self) -> Outcome<Self> {
        let passed = *self.value() > T::ZERO;
        self.sign(passed, "must be positive")
    }

    #[track_caller]
    fn is_not_positive(self) -> Outcome<Self> {
        let passed = *self.value() == T::ZERO;
        self.sign(passed, "may not be positive")
    }
}

#[allow(deprecated)]
impl<T, K> NonZeroChecks for Verifier<T, K>
where
    T: NonZeroNumber,
    K: FailureSink,
{
    #[track_caller]
    fn is_negative(self) -> Outcome<Self> {
        impossible_check(self.name(), "be negative")
    }

    fn is_not_negative(self) -> Outcome<Self> {
        K::proceed(self)
    }

    #[track_caller]
    fn is_zero(self) -> Outcome<Self> {
        impossible_check(self.name(), "be zero")
    }

    fn is_not_zero(self) -> Outcome<Self> {
        K::proceed(self)
    }

    fn is_positive(self) -> Outcome<Self> {
        K::proceed(self)
    }

    #[track_caller]
    fn is_not_positive(self) -> Outcome<Self> {
        impossible_check(self.name(), "be zero or negative")
    }
}
