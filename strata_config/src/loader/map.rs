//! Named in-memory key/value maps.

use super::{LoadContext, Loader, LoaderValues, RawEntry, collect_entries};
use crate::registry::Registry;

/// Reads properties from a named map of strings.
///
/// Trims by default and ignores unknown keys by default; both policies can
/// be changed. Useful for values embedded by the application or handed
/// over by a host process. Entries are read in the order given, and a
/// second entry for the same property is reported as a duplicate.
#[derive(Debug, Clone)]
pub struct MapLoader {
    name: String,
    entries: Vec<(String, String)>,
    trim: bool,
    strict: bool,
}

impl MapLoader {
    /// Creates a loader called `name` over `entries`.
    #[must_use]
    pub fn new<I, K, V>(name: impl Into<String>, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            name: name.into(),
            entries: entries
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
            trim: true,
            strict: false,
        }
    }

    /// Whether raw values are trimmed before parsing.
    #[must_use]
    pub const fn trimming(mut self, trim: bool) -> Self {
        self.trim = trim;
        self
    }

    /// Whether unknown keys are problems.
    #[must_use]
    pub const fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }
}

impl Loader for MapLoader {
    fn name(&self) -> &str {
        &self.name
    }

    fn load(&self, registry: &Registry, _context: &LoadContext<'_>) -> LoaderValues {
        collect_entries(
            self,
            registry,
            self.entries
                .iter()
                .map(|(key, value)| RawEntry::with_value(key.as_str(), value.as_str())),
        )
    }

    fn requires_trimming(&self) -> bool {
        self.trim
    }

    fn treats_unrecognized_name_as_fatal(&self) -> bool {
        self.strict
    }
}
