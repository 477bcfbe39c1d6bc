//! Type-erased storage for parsed property values.
//!
//! Loaders and the snapshot deal with properties of many different types, so
//! parsed values travel as [`Value`]: a shared, immutable box plus the
//! rendered text used in diagnostics and exports. Typed access goes back
//! through [`crate::Property::cast`].

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use camino::Utf8PathBuf;
use chrono::{NaiveDate, NaiveDateTime};

/// Types that can be held by a property.
///
/// Implement this for custom value types alongside a [`crate::TypeSpec`].
pub trait PropertyValue: Any + Clone + fmt::Debug + Send + Sync {
    /// Renders the value as text for problem reports and exports.
    fn render(&self) -> String;
}

impl PropertyValue for String {
    fn render(&self) -> String {
        self.clone()
    }
}

impl PropertyValue for i64 {
    fn render(&self) -> String {
        self.to_string()
    }
}

impl PropertyValue for f64 {
    fn render(&self) -> String {
        self.to_string()
    }
}

impl PropertyValue for bool {
    fn render(&self) -> String {
        self.to_string()
    }
}

impl PropertyValue for NaiveDate {
    fn render(&self) -> String {
        self.format("%Y-%m-%d").to_string()
    }
}

impl PropertyValue for NaiveDateTime {
    fn render(&self) -> String {
        self.format("%Y-%m-%dT%H:%M:%S%.f").to_string()
    }
}

impl PropertyValue for Utf8PathBuf {
    fn render(&self) -> String {
        self.as_str().to_owned()
    }
}

impl PropertyValue for Vec<String> {
    fn render(&self) -> String {
        self.join(",")
    }
}

/// A parsed property value with its rendered form.
///
/// # Examples
///
/// ```rust
/// use strata_config::Value;
///
/// let value = Value::new(42_i64);
/// assert_eq!(value.downcast_ref::<i64>(), Some(&42));
/// assert_eq!(value.rendered(), "42");
/// assert!(value.downcast_ref::<String>().is_none());
/// ```
#[derive(Clone)]
pub struct Value {
    inner: Arc<dyn Any + Send + Sync>,
    rendered: String,
}

impl Value {
    /// Wraps `value`, capturing its rendered form.
    #[must_use]
    pub fn new<T: PropertyValue>(value: T) -> Self {
        let rendered = value.render();
        Self {
            inner: Arc::new(value),
            rendered,
        }
    }

    /// Returns a reference to the inner value when it has type `T`.
    #[must_use]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }

    /// Reports whether the inner value has type `T`.
    #[must_use]
    pub fn is<T: Any>(&self) -> bool {
        self.inner.is::<T>()
    }

    /// Text form of the value.
    #[must_use]
    pub fn rendered(&self) -> &str {
        &self.rendered
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Value").field(&self.rendered).finish()
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.rendered)
    }
}
