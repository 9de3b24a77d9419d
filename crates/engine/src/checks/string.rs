use stipulate_core::FailureKind;

use crate::capability::{Outcome, StringChecks, Text};
use crate::sink::FailureSink;
use crate::verifier::Verifier;

impl<T: Text, K: FailureSink> Verifier<T, K> {
    #[track_caller]
    fn text_check(self, passed: bool, relation: &str, operand: Option<&str>) -> K::Out<Self> {
        self.check(passed, FailureKind::InvalidArgument, |s| {
            let header = match operand {
                Some(operand) => format!(
                    "{} {relation} {}.",
                    s.name(),
                    s.render(&operand.to_owned())
                ),
                None => format!("{} {relation}.", s.name()),
            };
            s.message(header).actual(s.value()).build()
        })
    }
}

impl<T, K> StringChecks for Verifier<T, K>
where
    T: Text,
    K: FailureSink,
{
    type Trimmed = Verifier<String, K>;
    type Length = Verifier<usize, K>;

    #[track_caller]
    fn starts_with(self, prefix: &str) -> Outcome<Self> {
        let passed = self.value().text().starts_with(prefix);
        self.text_check(passed, "must start with", Some(prefix))
    }

    #[track_caller]
    fn does_not_start_with(self, prefix: &str) -> Outcome<Self> {
        let passed = !self.value().text().starts_with(prefix);
        self.text_check(passed, "may not start with", Some(prefix))
    }

    #[track_caller]
    fn ends_with(self, suffix: &str) -> Outcome<Self> {
        let passed = self.value().text().ends_with(suffix);
        self.text_check(passed, "must end with", Some(suffix))
    }

    #[track_caller]
    fn does_not_end_with(self, suffix: &str) -> Outcome<Self> {
        let passed = !self.value().text().ends_with(suffix);
        self.text_check(passed, "may not end with", Some(suffix))
    }

    #[track_caller]
    fn contains(self, needle: &str) -> Outcome<Self> {
        let passed = self.value().text().contains(needle);
        self.text_check(passed, "must contain", Some(needle))
    }

    #[track_caller]
    fn does_not_contain(self, needle: &str) -> Outcome<Self> {
        let passed = !self.value().text().contains(needle);
        self.text_check(passed, "may not contain", Some(needle))
    }

    #[track_caller]
    fn is_empty(self) -> Outcome<Self> {
        let passed = self.value().text().is_empty();
        self.text_check(passed, "must be empty", None)
    }

    #[track_caller]
    fn is_not_empty(self) -> Outcome<Self> {
        let passed = !self.value().text().is_empty();
        self.text_check(passed, "may not be empty", None)
    }

    #[track_caller]
    fn is_blank(self) -> Outcome<Self> {
        let passed = self.value().text().trim().is_empty();
        self.text_check(passed, "must be blank", None)
    }

    #[track_caller]
    fn is_not_blank(self) -> Outcome<Self> {
        let passed = !self.value().text().trim().is_empty();
        self.text_check(passed, "may not be blank", None)
    }

    fn trim(self) -> Self::Trimmed {
        self.derive("trim()", |v| v.text().trim().to_owned())
    }

    fn length(self) -> Self::Length {
        self.derive("length()", |v| v.text().chars().count())
    }
}
