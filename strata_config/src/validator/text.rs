//! String validators.

use regex::Regex;

use super::Validator;

/// Whole-value regular expression match.
#[derive(Debug, Clone)]
pub struct Matches {
    pattern: String,
    compiled: Result<Regex, regex::Error>,
}

impl Validator<String> for Matches {
    fn is_valid(&self, value: &String) -> bool {
        self.compiled
            .as_ref()
            .is_ok_and(|regex| regex.is_match(value))
    }

    fn describe_violation(&self, value: &String) -> String {
        format!("`{value}` does not match the pattern `{}`", self.pattern)
    }

    fn is_configuration_valid(&self) -> bool {
        self.compiled.is_ok()
    }

    fn describe_configuration_problem(&self) -> String {
        match &self.compiled {
            Ok(_) => format!("pattern `{}` is valid", self.pattern),
            Err(err) => format!(
                "`{}` is not a valid regular expression: {err}",
                self.pattern
            ),
        }
    }

    fn describe(&self) -> String {
        format!("must match the pattern `{}`", self.pattern)
    }
}

/// Prefix check, optionally ignoring ASCII case.
#[derive(Debug, Clone)]
pub struct StartsWith {
    prefix: String,
    ignore_case: bool,
}

impl StartsWith {
    /// Compares ignoring ASCII case.
    #[must_use]
    pub const fn ignoring_case(mut self) -> Self {
        self.ignore_case = true;
        self
    }
}

impl Validator<String> for StartsWith {
    fn is_valid(&self, value: &String) -> bool {
        if self.ignore_case {
            value
                .get(..self.prefix.len())
                .is_some_and(|head| head.eq_ignore_ascii_case(&self.prefix))
        } else {
            value.starts_with(&self.prefix)
        }
    }

    fn describe_violation(&self, value: &String) -> String {
        format!("`{value}` does not start with `{}`", self.prefix)
    }

    fn describe(&self) -> String {
        format!("must start with `{}`", self.prefix)
    }
}

/// Suffix check, optionally ignoring ASCII case.
#[derive(Debug, Clone)]
pub struct EndsWith {
    suffix: String,
    ignore_case: bool,
}

impl EndsWith {
    /// Compares ignoring ASCII case.
    #[must_use]
    pub const fn ignoring_case(mut self) -> Self {
        self.ignore_case = true;
        self
    }
}

impl Validator<String> for EndsWith {
    fn is_valid(&self, value: &String) -> bool {
        if self.ignore_case {
            value
                .len()
                .checked_sub(self.suffix.len())
                .and_then(|start| value.get(start..))
                .is_some_and(|tail| tail.eq_ignore_ascii_case(&self.suffix))
        } else {
            value.ends_with(&self.suffix)
        }
    }

    fn describe_violation(&self, value: &String) -> String {
        format!("`{value}` does not end with `{}`", self.suffix)
    }

    fn describe(&self) -> String {
        format!("must end with `{}`", self.suffix)
    }
}

/// Membership in a fixed set of accepted strings.
#[derive(Debug, Clone)]
pub struct OneOf {
    options: Vec<String>,
}

impl Validator<String> for OneOf {
    fn is_valid(&self, value: &String) -> bool {
        self.options.iter().any(|option| option == value)
    }

    fn describe_violation(&self, value: &String) -> String {
        format!("`{value}` is not one of {}", self.listing())
    }

    fn is_configuration_valid(&self) -> bool {
        !self.options.is_empty()
    }

    fn describe_configuration_problem(&self) -> String {
        String::from("at least one accepted value must be listed")
    }

    fn describe(&self) -> String {
        format!("must be one of {}", self.listing())
    }
}

impl OneOf {
    fn listing(&self) -> String {
        self.options
            .iter()
            .map(|option| format!("`{option}`"))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Rejects the empty string.
#[derive(Debug, Clone, Copy, Default)]
pub struct NotEmpty;

impl Validator<String> for NotEmpty {
    fn is_valid(&self, value: &String) -> bool {
        !value.is_empty()
    }

    fn describe_violation(&self, _value: &String) -> String {
        String::from("the value is empty")
    }

    fn describe(&self) -> String {
        String::from("must not be empty")
    }
}

/// Upper bound on the number of characters.
#[derive(Debug, Clone, Copy)]
pub struct MaxLength {
    limit: usize,
}

impl Validator<String> for MaxLength {
    fn is_valid(&self, value: &String) -> bool {
        value.chars().count() <= self.limit
    }

    fn describe_violation(&self, value: &String) -> String {
        format!(
            "`{value}` has {} characters, more than {}",
            value.chars().count(),
            self.limit
        )
    }

    fn describe(&self) -> String {
        format!("must be at most {} characters long", self.limit)
    }
}

/// Value must match `pattern` in full.
///
/// The pattern is compiled immediately; an invalid pattern is reported as a
/// validator configuration problem when the property is registered.
#[must_use]
pub fn matches(pattern: impl Into<String>) -> Matches {
    let pattern = pattern.into();
    let compiled = Regex::new(&format!("^(?:{pattern})$"));
    Matches { pattern, compiled }
}

/// Value must start with `prefix`.
#[must_use]
pub fn starts_with(prefix: impl Into<String>) -> StartsWith {
    StartsWith {
        prefix: prefix.into(),
        ignore_case: false,
    }
}

/// Value must end with `suffix`.
#[must_use]
pub fn ends_with(suffix: impl Into<String>) -> EndsWith {
    EndsWith {
        suffix: suffix.into(),
        ignore_case: false,
    }
}

/// Value must equal one of `options`.
#[must_use]
pub fn one_of<I, S>(options: I) -> OneOf
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    OneOf {
        options: options.into_iter().map(Into::into).collect(),
    }
}

/// Value must not be empty.
#[must_use]
pub const fn not_empty() -> NotEmpty {
    NotEmpty
}

/// Value must have at most `limit` characters.
#[must_use]
pub const fn max_length(limit: usize) -> MaxLength {
    MaxLength { limit }
}
