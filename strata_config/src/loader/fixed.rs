//! Values forced by the application.

use super::{EntryCollector, LoadContext, Loader, LoaderValues, RawEntry};
use crate::problem::LoaderProblem;
use crate::property::{Property, PropertyId};
use crate::registry::Registry;
use crate::value::{PropertyValue, Value};

#[derive(Debug, Clone)]
enum Forced {
    Typed { property: PropertyId, value: Value },
    Named { name: String, value: Value },
    Raw(RawEntry),
}

/// Supplies values fixed in code, usually placed first so they win.
///
/// Typed values skip parsing but are still validated. Raw strings go
/// through the parser untrimmed. Every forced name must be registered.
///
/// # Examples
///
/// ```rust
/// use strata_config::{FixedValueLoader, Group, MapLoader, Property, StrataBuilder};
///
/// let workers = Property::integer().default_value(4).at_least(1).build();
///
/// let snapshot = StrataBuilder::new()
///     .group(Group::new("pool").property("WORKERS", &workers))
///     .loader(FixedValueLoader::new().fix(&workers, 1))
///     .loader(MapLoader::new("defaults", [("pool.WORKERS", "8")]))
///     .construct()?;
///
/// assert_eq!(snapshot.get(&workers), Some(1));
/// assert_eq!(snapshot.source_of(&workers), Some("fixed values"));
/// # Ok::<_, strata_config::StrataError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct FixedValueLoader {
    name: Option<String>,
    forced: Vec<Forced>,
}

impl FixedValueLoader {
    /// Creates an empty loader.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Renames the loader in reports.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Forces a typed value.
    #[must_use]
    pub fn fix<T: PropertyValue>(mut self, property: &Property<T>, value: impl Into<T>) -> Self {
        self.forced.push(Forced::Typed {
            property: property.id(),
            value: Value::new(value.into()),
        });
        self
    }

    /// Forces an already erased value under an inbound name. A value of the
    /// wrong type is reported when loading.
    #[must_use]
    pub fn fix_value(mut self, name: impl Into<String>, value: Value) -> Self {
        self.forced.push(Forced::Named {
            name: name.into(),
            value,
        });
        self
    }

    /// Forces raw text, parsed as-is.
    #[must_use]
    pub fn fix_raw(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.forced.push(Forced::Raw(RawEntry::with_value(name, value)));
        self
    }
}

impl Loader for FixedValueLoader {
    fn name(&self) -> &str {
        self.name.as_deref().unwrap_or("fixed values")
    }

    fn load(&self, registry: &Registry, _context: &LoadContext<'_>) -> LoaderValues {
        let mut collector = EntryCollector::new(self, registry);
        for forced in &self.forced {
            match forced {
                Forced::Typed { property, value } => {
                    let Some(registered) = registry.get(property) else {
                        collector.problem(LoaderProblem::UnrecognizedName {
                            loader: self.name().to_owned(),
                            name: format!("unregistered property {property}"),
                        });
                        continue;
                    };
                    collector.offer_value(registered, registered.canonical_name(), value.clone());
                }
                Forced::Named { name, value } => {
                    let Some(registered) = registry.resolve(name) else {
                        collector.unrecognized(name);
                        continue;
                    };
                    collector.offer_value(registered, name, value.clone());
                }
                Forced::Raw(entry) => collector.offer(entry.clone()),
            }
        }
        collector.finish()
    }

    fn requires_trimming(&self) -> bool {
        false
    }

    fn treats_unrecognized_name_as_fatal(&self) -> bool {
        true
    }
}
