//! Type-erased view of a property.
//!
//! The registry and loaders handle properties of mixed value types through
//! `dyn AnyProperty`. Every [`Property`] implements it; parsing and
//! validation happen on [`Value`]s so callers never name the value type.

use std::fmt;

use super::{ParseError, Property, PropertyId, Trimmer, Violation};
use crate::naming::Alias;
use crate::value::{PropertyValue, Value};

/// Operations the engine needs from a property without knowing its type.
pub trait AnyProperty: Send + Sync + fmt::Debug {
    /// Identity of the underlying property.
    fn id(&self) -> PropertyId;

    /// Name of the value type, e.g. `integer`.
    fn type_name(&self) -> &'static str;

    /// Whether the property follows flag semantics.
    fn is_flag(&self) -> bool;

    /// Whether an effective value is mandatory.
    fn is_required(&self) -> bool;

    /// Trimmer applied to raw text.
    fn trimmer(&self) -> Trimmer;

    /// Declared default, type-erased.
    fn default_value(&self) -> Option<Value>;

    /// Aliases requested by the declaration.
    fn requested_aliases(&self) -> &[Alias];

    /// Free-form description.
    fn description(&self) -> Option<&str>;

    /// Whether `value` holds this property's value type.
    fn accepts(&self, value: &Value) -> bool;

    /// Parses trimmed text into a type-erased value.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] when the text is not valid for the type.
    fn parse_value(&self, text: &str) -> Result<Value, ParseError>;

    /// Validator failures for `value`. A value of the wrong type is itself
    /// reported as a violation.
    fn violations(&self, value: &Value) -> Vec<Violation>;

    /// Explanations for every validator whose own arguments are unusable.
    fn validator_configuration_problems(&self) -> Vec<String>;

    /// Validator failures of the declared default; empty for a null default.
    fn default_value_violations(&self) -> Vec<Violation>;

    /// One-line rule descriptions, in declaration order.
    fn validator_descriptions(&self) -> Vec<String>;
}

impl<T: PropertyValue> AnyProperty for Property<T> {
    fn id(&self) -> PropertyId {
        Self::id(self)
    }

    fn type_name(&self) -> &'static str {
        self.inner.spec.name()
    }

    fn is_flag(&self) -> bool {
        self.inner.spec.is_flag()
    }

    fn is_required(&self) -> bool {
        Self::is_required(self)
    }

    fn trimmer(&self) -> Trimmer {
        Self::trimmer(self)
    }

    fn default_value(&self) -> Option<Value> {
        self.inner.default.clone().map(Value::new)
    }

    fn requested_aliases(&self) -> &[Alias] {
        self.aliases()
    }

    fn description(&self) -> Option<&str> {
        Self::description(self)
    }

    fn accepts(&self, value: &Value) -> bool {
        value.is::<T>()
    }

    fn parse_value(&self, text: &str) -> Result<Value, ParseError> {
        self.parse(text).map(Value::new)
    }

    fn violations(&self, value: &Value) -> Vec<Violation> {
        value.downcast_ref::<T>().map_or_else(
            || {
                vec![Violation {
                    rule: format!("must be of type {}", self.type_name()),
                    message: format!("`{value}` is not of type {}", self.type_name()),
                }]
            },
            |typed| Self::violations(self, typed),
        )
    }

    fn validator_configuration_problems(&self) -> Vec<String> {
        self.validators()
            .filter(|validator| !validator.is_configuration_valid())
            .map(|validator| validator.describe_configuration_problem())
            .collect()
    }

    fn default_value_violations(&self) -> Vec<Violation> {
        self.inner
            .default
            .as_ref()
            .map(|value| Self::violations(self, value))
            .unwrap_or_default()
    }

    fn validator_descriptions(&self) -> Vec<String> {
        self.validators().map(|validator| validator.describe()).collect()
    }
}

/// Anything that identifies a registered property.
///
/// Lets snapshot and registry lookups accept a typed handle, an erased
/// handle or a bare [`PropertyId`] interchangeably.
pub trait PropertyKey {
    /// Identity used for the lookup.
    fn property_id(&self) -> PropertyId;
}

impl PropertyKey for PropertyId {
    fn property_id(&self) -> PropertyId {
        *self
    }
}

impl<T: PropertyValue> PropertyKey for Property<T> {
    fn property_id(&self) -> PropertyId {
        self.id()
    }
}

impl PropertyKey for dyn AnyProperty {
    fn property_id(&self) -> PropertyId {
        self.id()
    }
}

impl<K: PropertyKey + ?Sized> PropertyKey for &K {
    fn property_id(&self) -> PropertyId {
        (**self).property_id()
    }
}
