//! Typed property descriptors.
//!
//! A [`Property`] is an immutable description of one configuration value:
//! its type, default, requiredness, trimmer, validators and requested
//! aliases. Identity is the handle, not the name: clones of a property share
//! one [`PropertyId`], and registering the same handle twice is a
//! construction problem.

mod builder;
mod erased;
mod trim;
pub mod types;

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use camino::Utf8PathBuf;
use chrono::{NaiveDate, NaiveDateTime};

pub use builder::PropertyBuilder;
pub use erased::{AnyProperty, PropertyKey};
pub use trim::Trimmer;
pub use types::{ParseError, ParseFn, TypeSpec};

use crate::naming::Alias;
use crate::validator::Validator;
use crate::value::{PropertyValue, Value};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PropertyId(u64);

impl PropertyId {
    fn next() -> Self {
        Self(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw numeric identity.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for PropertyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A rejected value together with the rule it broke.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Description of the validator, e.g. `must be greater than 0`.
    pub rule: String,
    /// Explanation of why the value was rejected.
    pub message: String,
}

/// Immutable descriptor of a typed configuration value.
///
/// # Examples
///
/// ```rust
/// use strata_config::Property;
///
/// let timeout = Property::integer()
///     .default_value(30)
///     .at_least(1)
///     .description("Request timeout in seconds")
///     .build();
///
/// assert_eq!(timeout.default_value(), Some(&30));
/// assert!(!timeout.is_required());
/// assert_eq!(timeout.parse("45"), Ok(45));
/// ```
pub struct Property<T> {
    inner: Arc<Inner<T>>,
}

struct Inner<T> {
    id: PropertyId,
    spec: TypeSpec<T>,
    trimmer: Trimmer,
    default: Option<T>,
    required: bool,
    validators: Vec<Box<dyn Validator<T>>>,
    aliases: Vec<Alias>,
    description: Option<String>,
}

impl<T> Clone for Property<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> fmt::Debug for Property<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Property")
            .field("id", &self.inner.id)
            .field("type", &self.inner.spec.name())
            .field("required", &self.inner.required)
            .finish_non_exhaustive()
    }
}

impl<T: PropertyValue> Property<T> {
    /// Starts building a property of the type described by `spec`.
    #[must_use]
    pub fn builder(spec: TypeSpec<T>) -> PropertyBuilder<T> {
        PropertyBuilder::new(spec)
    }

    /// Identity shared by every clone of this handle.
    #[must_use]
    pub fn id(&self) -> PropertyId {
        self.inner.id
    }

    /// Capability table of the value type.
    #[must_use]
    pub fn type_spec(&self) -> TypeSpec<T> {
        self.inner.spec
    }

    /// Trimmer applied before parsing text sources.
    #[must_use]
    pub fn trimmer(&self) -> Trimmer {
        self.inner.trimmer
    }

    /// Declared default, if any.
    #[must_use]
    pub fn default_value(&self) -> Option<&T> {
        self.inner.default.as_ref()
    }

    /// Whether construction fails when no value resolves.
    #[must_use]
    pub fn is_required(&self) -> bool {
        self.inner.required
    }

    /// Validators in declaration order.
    pub fn validators(&self) -> impl Iterator<Item = &dyn Validator<T>> {
        self.inner.validators.iter().map(AsRef::as_ref)
    }

    /// Requested aliases, as declared.
    #[must_use]
    pub fn aliases(&self) -> &[Alias] {
        &self.inner.aliases
    }

    /// Free-form description used in documentation.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.inner.description.as_deref()
    }

    /// Parses already trimmed text.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] when the text is not valid for the type.
    pub fn parse(&self, text: &str) -> Result<T, ParseError> {
        self.inner.spec.parse(text)
    }

    /// Retrieves a typed copy from a type-erased value.
    #[must_use]
    pub fn cast(&self, value: &Value) -> Option<T> {
        value.downcast_ref::<T>().cloned()
    }

    /// Runs every validator against `value`, returning the failures.
    #[must_use]
    pub fn violations(&self, value: &T) -> Vec<Violation> {
        self.validators()
            .filter(|validator| !validator.is_valid(value))
            .map(|validator| Violation {
                rule: validator.describe(),
                message: validator.describe_violation(value),
            })
            .collect()
    }
}

impl Property<String> {
    /// Text property using the quoted-string trimmer.
    #[must_use]
    pub fn string() -> PropertyBuilder<String> {
        PropertyBuilder::new(types::STRING)
    }
}

impl Property<i64> {
    /// Signed integer property.
    #[must_use]
    pub fn integer() -> PropertyBuilder<i64> {
        PropertyBuilder::new(types::INTEGER)
    }
}

impl Property<bool> {
    /// Boolean property; null unless a default is declared.
    #[must_use]
    pub fn boolean() -> PropertyBuilder<bool> {
        PropertyBuilder::new(types::BOOLEAN)
    }

    /// Flag property: defaults to `false` and switches on when present.
    #[must_use]
    pub fn flag() -> PropertyBuilder<bool> {
        PropertyBuilder::new(types::FLAG)
    }
}

impl Property<f64> {
    /// Floating-point property.
    #[must_use]
    pub fn decimal() -> PropertyBuilder<f64> {
        PropertyBuilder::new(types::DECIMAL)
    }
}

impl Property<NaiveDate> {
    /// Calendar date property.
    #[must_use]
    pub fn date() -> PropertyBuilder<NaiveDate> {
        PropertyBuilder::new(types::DATE)
    }
}

impl Property<NaiveDateTime> {
    /// Local timestamp property.
    #[must_use]
    pub fn date_time() -> PropertyBuilder<NaiveDateTime> {
        PropertyBuilder::new(types::DATE_TIME)
    }
}

impl Property<Utf8PathBuf> {
    /// Path property.
    #[must_use]
    pub fn path() -> PropertyBuilder<Utf8PathBuf> {
        PropertyBuilder::new(types::PATH)
    }
}

impl Property<Vec<String>> {
    /// Comma-separated list property.
    #[must_use]
    pub fn list() -> PropertyBuilder<Vec<String>> {
        PropertyBuilder::new(types::LIST)
    }
}
