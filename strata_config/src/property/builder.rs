//! Generic property builder.
//!
//! One builder serves every value type. Type-specific conveniences are
//! plain `impl` blocks over the value type that push validators from
//! [`crate::validator`].

use std::fmt;
use std::sync::Arc;

use super::{Inner, Property, PropertyId, Trimmer, TypeSpec};
use crate::naming::Alias;
use crate::validator::{self, Validator};
use crate::value::PropertyValue;

/// Builder for [`Property`].
pub struct PropertyBuilder<T> {
    spec: TypeSpec<T>,
    trimmer: Option<Trimmer>,
    default: Option<T>,
    required: bool,
    validators: Vec<Box<dyn Validator<T>>>,
    aliases: Vec<Alias>,
    description: Option<String>,
}

impl<T: PropertyValue> PropertyBuilder<T> {
    /// Creates a builder for the type described by `spec`.
    #[must_use]
    pub fn new(spec: TypeSpec<T>) -> Self {
        Self {
            spec,
            trimmer: None,
            default: None,
            required: false,
            validators: Vec::new(),
            aliases: Vec::new(),
            description: None,
        }
    }

    /// Sets the value used when no loader supplies one.
    #[must_use]
    pub fn default_value(mut self, value: impl Into<T>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Requires an effective value; construction fails without one.
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Appends a validator.
    #[must_use]
    pub fn validator(mut self, validator: impl Validator<T> + 'static) -> Self {
        self.validators.push(Box::new(validator));
        self
    }

    /// Adds a name usable both for loading and for export.
    #[must_use]
    pub fn alias(self, name: impl Into<String>) -> Self {
        self.aliased(Alias::new(name, true, true))
    }

    /// Adds a name recognised when loading only.
    #[must_use]
    pub fn inbound_alias(self, name: impl Into<String>) -> Self {
        self.aliased(Alias::new(name, true, false))
    }

    /// Adds a name used when exporting only.
    #[must_use]
    pub fn outbound_alias(self, name: impl Into<String>) -> Self {
        self.aliased(Alias::new(name, false, true))
    }

    /// Adds an alias with explicit direction flags.
    #[must_use]
    pub fn aliased(mut self, alias: Alias) -> Self {
        self.aliases.push(alias);
        self
    }

    /// Describes the property for generated documentation.
    #[must_use]
    pub fn description(mut self, text: impl Into<String>) -> Self {
        self.description = Some(text.into());
        self
    }

    /// Overrides the trimmer of the value type.
    #[must_use]
    pub fn trimmer(mut self, trimmer: Trimmer) -> Self {
        self.trimmer = Some(trimmer);
        self
    }

    /// Freezes the descriptor and assigns it a fresh identity.
    ///
    /// A flag without a declared default starts out `false`.
    #[must_use]
    pub fn build(self) -> Property<T> {
        let default = match self.default {
            None if self.spec.is_flag() => self.spec.parse("false").ok(),
            declared => declared,
        };
        Property {
            inner: Arc::new(Inner {
                id: PropertyId::next(),
                trimmer: self.trimmer.unwrap_or_else(|| self.spec.trimmer()),
                spec: self.spec,
                default,
                required: self.required,
                validators: self.validators,
                aliases: self.aliases,
                description: self.description,
            }),
        }
    }
}

impl<T> PropertyBuilder<T>
where
    T: PropertyValue + PartialOrd + fmt::Display,
{
    /// Value must be strictly greater than `limit`.
    #[must_use]
    pub fn greater_than(self, limit: impl Into<T>) -> Self {
        self.validator(validator::greater_than(limit.into()))
    }

    /// Value must be greater than or equal to `limit`.
    #[must_use]
    pub fn at_least(self, limit: impl Into<T>) -> Self {
        self.validator(validator::at_least(limit.into()))
    }

    /// Value must be strictly less than `limit`.
    #[must_use]
    pub fn less_than(self, limit: impl Into<T>) -> Self {
        self.validator(validator::less_than(limit.into()))
    }

    /// Value must be less than or equal to `limit`.
    #[must_use]
    pub fn at_most(self, limit: impl Into<T>) -> Self {
        self.validator(validator::at_most(limit.into()))
    }

    /// Value must lie within `low..=high`.
    #[must_use]
    pub fn between(self, low: impl Into<T>, high: impl Into<T>) -> Self {
        self.validator(validator::between(low.into(), high.into()))
    }
}

impl PropertyBuilder<String> {
    /// Value must match `pattern` in full.
    #[must_use]
    pub fn matches(self, pattern: impl Into<String>) -> Self {
        self.validator(validator::matches(pattern))
    }

    /// Value must start with `prefix`.
    #[must_use]
    pub fn starts_with(self, prefix: impl Into<String>) -> Self {
        self.validator(validator::starts_with(prefix))
    }

    /// Value must end with `suffix`.
    #[must_use]
    pub fn ends_with(self, suffix: impl Into<String>) -> Self {
        self.validator(validator::ends_with(suffix))
    }

    /// Value must be one of `options`.
    #[must_use]
    pub fn one_of<I, S>(self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.validator(validator::one_of(options))
    }

    /// Value must not be empty.
    #[must_use]
    pub fn not_empty(self) -> Self {
        self.validator(validator::not_empty())
    }

    /// Value must have at most `limit` characters.
    #[must_use]
    pub fn max_length(self, limit: usize) -> Self {
        self.validator(validator::max_length(limit))
    }
}

impl<T> fmt::Debug for PropertyBuilder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyBuilder")
            .field("type", &self.spec.name())
            .field("required", &self.required)
            .field("validators", &self.validators.len())
            .field("aliases", &self.aliases)
            .finish_non_exhaustive()
    }
}
