//! Comparison validators for any ordered value type.
//!
//! These cover integers, decimals and dates alike.

use std::cmp::Ordering;
use std::fmt;

use super::Validator;

/// Direction of a single-sided comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    /// Strictly greater than the limit.
    Above,
    /// Greater than or equal to the limit.
    AtLeast,
    /// Strictly less than the limit.
    Below,
    /// Less than or equal to the limit.
    AtMost,
}

impl Bound {
    const fn phrase(self) -> &'static str {
        match self {
            Self::Above => "greater than",
            Self::AtLeast => "greater than or equal to",
            Self::Below => "less than",
            Self::AtMost => "less than or equal to",
        }
    }

    const fn accepts(self, ordering: Ordering) -> bool {
        match self {
            Self::Above => matches!(ordering, Ordering::Greater),
            Self::AtLeast => matches!(ordering, Ordering::Greater | Ordering::Equal),
            Self::Below => matches!(ordering, Ordering::Less),
            Self::AtMost => matches!(ordering, Ordering::Less | Ordering::Equal),
        }
    }
}

/// Single-sided comparison against a limit.
#[derive(Debug, Clone)]
pub struct Compare<T> {
    bound: Bound,
    limit: T,
}

impl<T> Compare<T> {
    /// Creates a comparison validator.
    #[must_use]
    pub const fn new(bound: Bound, limit: T) -> Self {
        Self { bound, limit }
    }
}

impl<T> Validator<T> for Compare<T>
where
    T: PartialOrd + fmt::Display + Send + Sync,
{
    fn is_valid(&self, value: &T) -> bool {
        value
            .partial_cmp(&self.limit)
            .is_some_and(|ordering| self.bound.accepts(ordering))
    }

    fn describe_violation(&self, value: &T) -> String {
        format!("{value} is not {}", self.describe_limit())
    }

    fn is_configuration_valid(&self) -> bool {
        self.limit.partial_cmp(&self.limit).is_some()
    }

    fn describe_configuration_problem(&self) -> String {
        format!("limit {} cannot be compared", self.limit)
    }

    fn describe(&self) -> String {
        format!("must be {}", self.describe_limit())
    }
}

impl<T: fmt::Display> Compare<T> {
    fn describe_limit(&self) -> String {
        format!("{} {}", self.bound.phrase(), self.limit)
    }
}

/// Inclusive range check.
#[derive(Debug, Clone)]
pub struct Between<T> {
    low: T,
    high: T,
}

impl<T> Validator<T> for Between<T>
where
    T: PartialOrd + fmt::Display + Send + Sync,
{
    fn is_valid(&self, value: &T) -> bool {
        *value >= self.low && *value <= self.high
    }

    fn describe_violation(&self, value: &T) -> String {
        format!("{value} is not between {} and {}", self.low, self.high)
    }

    fn is_configuration_valid(&self) -> bool {
        matches!(
            self.low.partial_cmp(&self.high),
            Some(Ordering::Less | Ordering::Equal)
        )
    }

    fn describe_configuration_problem(&self) -> String {
        format!(
            "range lower bound {} is not below upper bound {}",
            self.low, self.high
        )
    }

    fn describe(&self) -> String {
        format!("must be between {} and {}", self.low, self.high)
    }
}

/// Value must be strictly greater than `limit`.
#[must_use]
pub const fn greater_than<T>(limit: T) -> Compare<T> {
    Compare::new(Bound::Above, limit)
}

/// Value must be greater than or equal to `limit`.
#[must_use]
pub const fn at_least<T>(limit: T) -> Compare<T> {
    Compare::new(Bound::AtLeast, limit)
}

/// Value must be strictly less than `limit`.
#[must_use]
pub const fn less_than<T>(limit: T) -> Compare<T> {
    Compare::new(Bound::Below, limit)
}

/// Value must be less than or equal to `limit`.
#[must_use]
pub const fn at_most<T>(limit: T) -> Compare<T> {
    Compare::new(Bound::AtMost, limit)
}

/// Value must lie within `low..=high`.
#[must_use]
pub const fn between<T>(low: T, high: T) -> Between<T> {
    Between { low, high }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rstest::rstest;

    #[rstest]
    #[case(greater_than(5), 6, true)]
    #[case(greater_than(5), 5, false)]
    #[case(at_least(5), 5, true)]
    #[case(less_than(5), 5, false)]
    #[case(less_than(5), -1, true)]
    #[case(at_most(5), 5, true)]
    #[case(at_most(5), 6, false)]
    fn integer_comparisons(#[case] validator: Compare<i64>, #[case] value: i64, #[case] ok: bool) {
        assert_eq!(validator.is_valid(&value), ok);
    }

    #[test]
    fn nan_limits_are_misconfigured() {
        assert!(!greater_than(f64::NAN).is_configuration_valid());
        assert!(greater_than(0.5_f64).is_configuration_valid());
    }

    #[test]
    fn inverted_range_is_misconfigured() {
        let range = between(10, 1);
        assert!(!range.is_configuration_valid());
        assert!(range.describe_configuration_problem().contains("10"));
        assert!(between(1, 1).is_configuration_valid());
    }

    #[test]
    fn range_checks_dates() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid");
        let end = NaiveDate::from_ymd_opt(2024, 12, 31).expect("valid");
        let range = between(start, end);
        let inside = NaiveDate::from_ymd_opt(2024, 6, 1).expect("valid");
        let outside = NaiveDate::from_ymd_opt(2025, 1, 1).expect("valid");
        assert!(range.is_valid(&inside));
        assert!(!range.is_valid(&outside));
        assert_eq!(
            range.describe_violation(&outside),
            "2025-01-01 is not between 2024-01-01 and 2024-12-31"
        );
    }

    #[test]
    fn violation_messages_name_the_limit() {
        let validator = greater_than(0);
        assert_eq!(validator.describe(), "must be greater than 0");
        assert_eq!(validator.describe_violation(&-3), "-3 is not greater than 0");
    }
}
