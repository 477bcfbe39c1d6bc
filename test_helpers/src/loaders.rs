//! Scripted loaders.
//!
//! # Examples
//!
//! ```
//! use strata_config::{Group, Property, StrataBuilder};
//! use strata_config_test_helpers::loaders::ScriptedLoader;
//!
//! let port = Property::integer().build();
//! let loader = ScriptedLoader::new("script").entry("app.PORT", "80");
//! let calls = loader.calls();
//!
//! let snapshot = StrataBuilder::new()
//!     .group(Group::new("app").property("PORT", &port))
//!     .loader(loader)
//!     .construct()?;
//! assert_eq!(snapshot.get(&port), Some(80));
//! assert_eq!(calls.count(), 1);
//! # Ok::<_, strata_config::StrataError>(())
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};

use parking_lot::Mutex;
use strata_config::loader::collect_entries;
use strata_config::{LoadContext, Loader, LoaderValues, RawEntry, Registry};

/// Shared count of `load` calls.
#[derive(Debug, Clone, Default)]
pub struct CallCounter(Arc<AtomicUsize>);

impl CallCounter {
    /// Number of calls so far.
    #[must_use]
    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }

    fn record(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

/// Loader replaying a fixed list of entries.
#[derive(Debug, Clone)]
pub struct ScriptedLoader {
    name: String,
    entries: Vec<RawEntry>,
    trim: bool,
    strict: bool,
    calls: CallCounter,
    seen: Arc<Mutex<Vec<Vec<String>>>>,
}

impl ScriptedLoader {
    /// Trimming, non-strict loader with no entries.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
            trim: true,
            strict: false,
            calls: CallCounter::default(),
            seen: Arc::default(),
        }
    }

    /// Adds a `name=value` entry.
    #[must_use]
    pub fn entry(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries.push(RawEntry::with_value(name, value));
        self
    }

    /// Adds a bare name.
    #[must_use]
    pub fn bare(mut self, name: impl Into<String>) -> Self {
        self.entries.push(RawEntry::present(name));
        self
    }

    /// Sets the trimming policy.
    #[must_use]
    pub const fn trimming(mut self, trim: bool) -> Self {
        self.trim = trim;
        self
    }

    /// Sets the unknown-name policy.
    #[must_use]
    pub const fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Counter shared with every clone of this loader.
    #[must_use]
    pub fn calls(&self) -> CallCounter {
        self.calls.clone()
    }

    /// Canonical names already set when each run started, one list per run.
    #[must_use]
    pub fn observed(&self) -> Vec<Vec<String>> {
        self.seen.lock().clone()
    }
}

impl Loader for ScriptedLoader {
    fn name(&self) -> &str {
        &self.name
    }

    fn load(&self, registry: &Registry, context: &LoadContext<'_>) -> LoaderValues {
        self.calls.record();
        let already_set = registry
            .iter()
            .filter(|registered| context.is_set(*registered))
            .map(|registered| registered.canonical_name().to_owned())
            .collect();
        self.seen.lock().push(already_set);
        collect_entries(self, registry, self.entries.iter().cloned())
    }

    fn requires_trimming(&self) -> bool {
        self.trim
    }

    fn treats_unrecognized_name_as_fatal(&self) -> bool {
        self.strict
    }
}

/// Rendezvous points for a [`GatedLoader`].
#[derive(Debug, Clone)]
pub struct Gate {
    entered: Arc<Barrier>,
    release: Arc<Barrier>,
}

impl Gate {
    /// A gate for one loader and one controlling thread.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entered: Arc::new(Barrier::new(2)),
            release: Arc::new(Barrier::new(2)),
        }
    }

    /// Blocks until the loader is inside `load`.
    pub fn wait_until_entered(&self) {
        self.entered.wait();
    }

    /// Lets the loader finish.
    pub fn release(&self) {
        self.release.wait();
    }
}

impl Default for Gate {
    fn default() -> Self {
        Self::new()
    }
}

/// Loader that parks inside `load` until its [`Gate`] is released.
#[derive(Debug, Clone)]
pub struct GatedLoader {
    gate: Gate,
}

impl GatedLoader {
    /// Loader controlled by `gate`.
    #[must_use]
    pub const fn new(gate: Gate) -> Self {
        Self { gate }
    }
}

impl Loader for GatedLoader {
    fn name(&self) -> &str {
        "gated"
    }

    fn load(&self, _registry: &Registry, _context: &LoadContext<'_>) -> LoaderValues {
        self.gate.entered.wait();
        self.gate.release.wait();
        LoaderValues::new(self.name())
    }
}
