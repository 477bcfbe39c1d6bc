//! Loader protocol and the standard loaders.
//!
//! A [`Loader`] reads one configuration source and reports, for the
//! properties it recognises, the parsed and validated values together with
//! any problems met. Loaders never see each other's results directly; the
//! engine hands them a [`LoadContext`] describing what earlier loaders set.

mod args;
mod entries;
mod env;
mod file;
mod fixed;
mod map;

use std::collections::BTreeMap;

pub use args::ArgsLoader;
pub use entries::{EntryCollector, RawEntry, collect_entries};
pub use env::EnvLoader;
pub use file::{FileFormat, FileLoader};
pub use fixed::FixedValueLoader;
pub use map::MapLoader;

use crate::problem::{Problem, ProblemList};
use crate::property::{Property, PropertyId, PropertyKey};
use crate::registry::Registry;
use crate::snapshot::Assignment;
use crate::value::{PropertyValue, Value};

/// A pluggable configuration source.
///
/// # Examples
///
/// ```rust
/// use strata_config::loader::collect_entries;
/// use strata_config::{LoadContext, Loader, LoaderValues, RawEntry, Registry};
///
/// struct Static;
///
/// impl Loader for Static {
///     fn name(&self) -> &str {
///         "static"
///     }
///
///     fn load(&self, registry: &Registry, _context: &LoadContext<'_>) -> LoaderValues {
///         collect_entries(self, registry, [RawEntry::with_value("app.PORT", "80")])
///     }
/// }
/// ```
pub trait Loader: Send + Sync {
    /// Name used in problem reports and provenance.
    fn name(&self) -> &str;

    /// Reads the source.
    fn load(&self, registry: &Registry, context: &LoadContext<'_>) -> LoaderValues;

    /// Whether raw text is trimmed before parsing.
    fn requires_trimming(&self) -> bool {
        true
    }

    /// Whether a name matching no property is a problem rather than noise.
    fn treats_unrecognized_name_as_fatal(&self) -> bool {
        false
    }
}

/// One value a loader supplies.
#[derive(Debug, Clone)]
pub struct LoadedValue {
    /// Property the value belongs to.
    pub property: PropertyId,
    /// Name the source used for the property.
    pub name: String,
    /// Text the value was parsed from; `None` for typed or bare entries.
    pub raw: Option<String>,
    /// Parsed, validated value.
    pub value: Value,
}

/// Everything one loader produced.
#[derive(Debug, Clone)]
pub struct LoaderValues {
    loader: String,
    values: Vec<LoadedValue>,
    problems: ProblemList,
}

impl LoaderValues {
    /// Empty result for the loader called `loader`.
    #[must_use]
    pub fn new(loader: impl Into<String>) -> Self {
        Self {
            loader: loader.into(),
            values: Vec::new(),
            problems: ProblemList::default(),
        }
    }

    /// Records a value.
    pub fn push_value(&mut self, value: LoadedValue) {
        self.values.push(value);
    }

    /// Records a problem.
    pub fn push_problem(&mut self, problem: impl Into<Problem>) {
        self.problems.push(problem);
    }

    /// Name of the loader.
    #[must_use]
    pub fn loader(&self) -> &str {
        &self.loader
    }

    /// Values in the order the source listed them.
    #[must_use]
    pub fn values(&self) -> &[LoadedValue] {
        &self.values
    }

    /// Problems found while loading.
    #[must_use]
    pub const fn problems(&self) -> &ProblemList {
        &self.problems
    }

    /// Splits the result into its parts.
    #[must_use]
    pub fn into_parts(self) -> (String, Vec<LoadedValue>, ProblemList) {
        (self.loader, self.values, self.problems)
    }
}

static NOTHING_SET: BTreeMap<PropertyId, Assignment> = BTreeMap::new();

/// Read-only view of the values set by earlier loaders.
#[derive(Debug, Clone, Copy)]
pub struct LoadContext<'a> {
    registry: &'a Registry,
    assignments: &'a BTreeMap<PropertyId, Assignment>,
}

impl<'a> LoadContext<'a> {
    pub(crate) const fn new(
        registry: &'a Registry,
        assignments: &'a BTreeMap<PropertyId, Assignment>,
    ) -> Self {
        Self {
            registry,
            assignments,
        }
    }

    /// A context in which nothing has been set yet.
    #[must_use]
    pub const fn empty(registry: &'a Registry) -> Self {
        Self::new(registry, &NOTHING_SET)
    }

    /// The registry being loaded.
    #[must_use]
    pub const fn registry(&self) -> &'a Registry {
        self.registry
    }

    /// Whether an earlier loader set the property.
    #[must_use]
    pub fn is_set(&self, key: &(impl PropertyKey + ?Sized)) -> bool {
        self.assignments.contains_key(&key.property_id())
    }

    /// Value set by an earlier loader.
    #[must_use]
    pub fn explicit_value<T: PropertyValue>(&self, property: &Property<T>) -> Option<T> {
        self.assignments
            .get(&property.id())
            .and_then(|assignment| property.cast(&assignment.value))
    }

    /// Value set by an earlier loader, else the default.
    #[must_use]
    pub fn effective_value<T: PropertyValue>(&self, property: &Property<T>) -> Option<T> {
        self.explicit_value(property)
            .or_else(|| property.default_value().cloned())
    }

    /// Name of the loader that set the property.
    #[must_use]
    pub fn set_by(&self, key: &(impl PropertyKey + ?Sized)) -> Option<&'a str> {
        self.assignments
            .get(&key.property_id())
            .map(|assignment| assignment.loader.as_str())
    }
}
