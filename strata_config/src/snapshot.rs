//! The frozen result of a successful construction.

use std::collections::BTreeMap;

use serde_json::{Map, Value as JsonValue};

use crate::naming::Alias;
use crate::property::{Property, PropertyId, PropertyKey};
use crate::registry::Registry;
use crate::value::{PropertyValue, Value};

/// An explicit value and where it came from.
#[derive(Debug, Clone)]
pub struct Assignment {
    /// Parsed value.
    pub value: Value,
    /// Loader that supplied it.
    pub loader: String,
    /// Name the loader used.
    pub name: String,
}

/// A value supplied by a later loader and discarded.
#[derive(Debug, Clone)]
pub struct Override {
    /// Property concerned.
    pub property: PropertyId,
    /// Canonical name of the property.
    pub canonical: String,
    /// Loader whose value was discarded.
    pub loader: String,
    /// Name that loader used.
    pub name: String,
    /// Discarded value.
    pub value: Value,
    /// Loader whose earlier value was kept.
    pub kept_from: String,
}

/// Immutable table of effective values.
///
/// A property's effective value is the value of the first loader that set
/// it, or its default when no loader did.
///
/// # Examples
///
/// ```rust
/// use strata_config::{Group, MapLoader, Property, StrataBuilder};
///
/// let a = Property::integer().required().build();
/// let b = Property::string().default_value("x").build();
///
/// let snapshot = StrataBuilder::new()
///     .group(Group::new("demo").property("A", &a).property("B", &b))
///     .loader(MapLoader::new("first", [("demo.A", "5")]))
///     .loader(MapLoader::new("second", [("demo.A", "9"), ("demo.B", "yyy")]))
///     .construct()?;
///
/// assert_eq!(snapshot.get(&a), Some(5));
/// assert_eq!(snapshot.get(&b).as_deref(), Some("yyy"));
/// assert!(snapshot.is_explicitly_set(&b));
/// assert_eq!(snapshot.source_of(&a), Some("first"));
/// assert_eq!(snapshot.overridden().len(), 1);
/// # Ok::<_, strata_config::StrataError>(())
/// ```
#[derive(Debug)]
pub struct Snapshot {
    registry: Registry,
    assignments: BTreeMap<PropertyId, Assignment>,
    overridden: Vec<Override>,
}

impl Snapshot {
    pub(crate) const fn new(
        registry: Registry,
        assignments: BTreeMap<PropertyId, Assignment>,
        overridden: Vec<Override>,
    ) -> Self {
        Self {
            registry,
            assignments,
            overridden,
        }
    }

    /// Effective value of a registered property.
    #[must_use]
    pub fn get<T: PropertyValue>(&self, property: &Property<T>) -> Option<T> {
        if !self.registry.contains(property) {
            return None;
        }
        self.explicit(property)
            .or_else(|| property.default_value().cloned())
    }

    /// Value set by a loader, ignoring the default.
    #[must_use]
    pub fn explicit<T: PropertyValue>(&self, property: &Property<T>) -> Option<T> {
        self.assignments
            .get(&property.id())
            .and_then(|assignment| property.cast(&assignment.value))
    }

    /// Type-erased effective value.
    #[must_use]
    pub fn effective_value(&self, key: &(impl PropertyKey + ?Sized)) -> Option<Value> {
        self.assignments
            .get(&key.property_id())
            .map(|assignment| assignment.value.clone())
            .or_else(|| {
                self.registry
                    .get(key)
                    .and_then(|registered| registered.property().default_value())
            })
    }

    /// Whether a loader supplied the value.
    #[must_use]
    pub fn is_explicitly_set(&self, key: &(impl PropertyKey + ?Sized)) -> bool {
        self.assignments.contains_key(&key.property_id())
    }

    /// Canonical name of a registered property.
    #[must_use]
    pub fn canonical_name(&self, key: &(impl PropertyKey + ?Sized)) -> Option<&str> {
        self.registry.canonical_name(key)
    }

    /// Resolved aliases of a registered property.
    #[must_use]
    pub fn aliases(&self, key: &(impl PropertyKey + ?Sized)) -> Option<&[Alias]> {
        self.registry.aliases(key)
    }

    /// Loader that supplied the value, if any.
    #[must_use]
    pub fn source_of(&self, key: &(impl PropertyKey + ?Sized)) -> Option<&str> {
        self.assignment(key)
            .map(|assignment| assignment.loader.as_str())
    }

    /// Full provenance of an explicit value.
    #[must_use]
    pub fn assignment(&self, key: &(impl PropertyKey + ?Sized)) -> Option<&Assignment> {
        self.assignments.get(&key.property_id())
    }

    /// Values discarded because an earlier loader had already set them.
    #[must_use]
    pub fn overridden(&self) -> &[Override] {
        &self.overridden
    }

    /// The registry the snapshot was built from.
    #[must_use]
    pub const fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Exports every outbound name with its rendered effective value;
    /// properties without a value map to `null`.
    #[must_use]
    pub fn to_json(&self) -> JsonValue {
        let mut map = Map::new();
        for registered in &self.registry {
            let rendered = self
                .effective_value(registered)
                .map_or(JsonValue::Null, |value| {
                    JsonValue::String(value.rendered().to_owned())
                });
            for name in registered.names().outbound_names() {
                map.insert(name.to_owned(), rendered.clone());
            }
        }
        JsonValue::Object(map)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::naming::DottedNaming;
    use crate::Group;

    #[test]
    fn export_uses_outbound_names() {
        let port = Property::integer().default_value(80).outbound_alias("PORT").build();
        let host = Property::string().inbound_alias("HOST").build();
        let user = Property::string().build();
        let registry = Registry::build(
            Group::new("net")
                .property("PORT", &port)
                .property("HOST", &host)
                .property("USER", &user)
                .declarations(),
            Arc::new(DottedNaming),
        )
        .expect("valid declarations");
        let mut assignments = BTreeMap::new();
        assignments.insert(
            host.id(),
            Assignment {
                value: Value::new(String::from("example.org")),
                loader: String::from("args"),
                name: String::from("HOST"),
            },
        );
        let snapshot = Snapshot::new(registry, assignments, Vec::new());

        assert_eq!(
            snapshot.to_json(),
            json!({
                "net.PORT": "80",
                "PORT": "80",
                "net.HOST": "example.org",
                "net.USER": null,
            })
        );
        assert_eq!(snapshot.source_of(&host), Some("args"));
        assert!(!snapshot.is_explicitly_set(&port));
        assert_eq!(snapshot.get(&port), Some(80));
        assert_eq!(snapshot.get(&user), None);
    }

    #[test]
    fn unregistered_properties_have_no_value() {
        let registry =
            Registry::build(Vec::new(), Arc::new(DottedNaming)).expect("empty registry");
        let snapshot = Snapshot::new(registry, BTreeMap::new(), Vec::new());
        let stray = Property::integer().default_value(1).build();
        assert_eq!(snapshot.get(&stray), None);
        assert!(snapshot.effective_value(&stray).is_none());
    }
}
