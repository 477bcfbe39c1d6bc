//! Value validators attached to properties.
//!
//! A validator checks a parsed value and can also report that its own
//! arguments are unusable (an inverted range, an unparsable pattern). The
//! registry rejects properties carrying misconfigured validators before any
//! loader runs.

mod ordering;
mod text;

pub use ordering::{Between, Bound, Compare, at_least, at_most, between, greater_than, less_than};
pub use text::{
    EndsWith, Matches, MaxLength, NotEmpty, OneOf, StartsWith, ends_with, matches, max_length,
    not_empty, one_of, starts_with,
};

/// Check applied to every parsed value and to non-null defaults.
pub trait Validator<T>: Send + Sync {
    /// Whether `value` satisfies the validator.
    fn is_valid(&self, value: &T) -> bool;

    /// Explains why `value` was rejected.
    fn describe_violation(&self, value: &T) -> String;

    /// Whether the validator's own arguments are usable, independently of
    /// any value.
    fn is_configuration_valid(&self) -> bool {
        true
    }

    /// Explains why the validator's arguments are unusable.
    fn describe_configuration_problem(&self) -> String {
        format!("validator `{}` is misconfigured", self.describe())
    }

    /// One-line description of the rule, e.g. `must be greater than 0`.
    fn describe(&self) -> String;
}
