//! Resolution engine: registration, ordered loading and the final fold.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::fmt;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::error::{StrataError, StrataResult};
use crate::group::{Group, PropertyDeclaration, PropertyGroup};
use crate::loader::{ArgsLoader, EnvLoader, LoadContext, LoadedValue, Loader};
use crate::naming::{DottedNaming, NamingStrategy};
use crate::problem::{LoaderProblem, ProblemList, RequirementProblem};
use crate::property::PropertyId;
use crate::registry::Registry;
use crate::snapshot::{Assignment, Override, Snapshot};

/// Collects declarations and loaders, then builds a [`Snapshot`].
///
/// Loaders run in the order they were added. The first loader to supply a
/// property decides its value.
///
/// # Examples
///
/// ```rust
/// use strata_config::{FixedValueLoader, Group, MapLoader, Property, StrataBuilder};
///
/// let retries = Property::integer().default_value(3).at_least(0).build();
///
/// let snapshot = StrataBuilder::new()
///     .group(Group::new("client").property("RETRIES", &retries))
///     .loader(FixedValueLoader::new().fix(&retries, 0))
///     .loader(MapLoader::new("defaults file", [("client.RETRIES", "7")]))
///     .construct()?;
///
/// assert_eq!(snapshot.get(&retries), Some(0));
/// assert_eq!(snapshot.source_of(&retries), Some("fixed values"));
/// # Ok::<_, strata_config::StrataError>(())
/// ```
pub struct StrataBuilder {
    naming: Arc<dyn NamingStrategy>,
    declarations: Vec<PropertyDeclaration>,
    loaders: Vec<Box<dyn Loader>>,
}

impl fmt::Debug for StrataBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StrataBuilder")
            .field("declarations", &self.declarations.len())
            .field(
                "loaders",
                &self.loaders.iter().map(|loader| loader.name()).collect::<Vec<_>>(),
            )
            .finish_non_exhaustive()
    }
}

impl Default for StrataBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl StrataBuilder {
    /// Builder with [`DottedNaming`], no declarations and no loaders.
    #[must_use]
    pub fn new() -> Self {
        Self {
            naming: Arc::new(DottedNaming),
            declarations: Vec::new(),
            loaders: Vec::new(),
        }
    }

    /// Replaces the naming strategy.
    #[must_use]
    pub fn naming(mut self, naming: impl NamingStrategy + 'static) -> Self {
        self.naming = Arc::new(naming);
        self
    }

    /// Adds every property of `group` and its nested groups.
    #[must_use]
    pub fn group(self, group: Group) -> Self {
        self.declarations(group.declarations())
    }

    /// Adds the group published by `G`.
    #[must_use]
    pub fn register<G: PropertyGroup>(self) -> Self {
        self.group(G::group())
    }

    /// Adds a single declaration.
    #[must_use]
    pub fn declaration(mut self, declaration: PropertyDeclaration) -> Self {
        self.declarations.push(declaration);
        self
    }

    /// Adds declarations produced by any discovery mechanism.
    #[must_use]
    pub fn declarations(mut self, declarations: impl IntoIterator<Item = PropertyDeclaration>) -> Self {
        self.declarations.extend(declarations);
        self
    }

    /// Appends a loader after those already added.
    #[must_use]
    pub fn loader(self, loader: impl Loader + 'static) -> Self {
        self.boxed_loader(Box::new(loader))
    }

    /// Appends an already boxed loader.
    #[must_use]
    pub fn boxed_loader(mut self, loader: Box<dyn Loader>) -> Self {
        self.loaders.push(loader);
        self
    }

    /// Appends the command line followed by the unprefixed environment.
    ///
    /// Forced values belong before these and files after them.
    #[must_use]
    pub fn standard_loaders<I, S>(self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.loader(ArgsLoader::new(args)).loader(EnvLoader::raw())
    }

    /// Registers the declarations, runs every loader once and freezes the
    /// result.
    ///
    /// # Errors
    ///
    /// Returns [`StrataError::ConstructionFailed`] when the declarations are
    /// invalid; no loader runs in that case. Returns
    /// [`StrataError::LoadFailed`] with every loader, value and requirement
    /// problem when any loader reported one or a required property has no
    /// value.
    pub fn construct(self) -> StrataResult<Snapshot> {
        let registry = Registry::build(self.declarations, self.naming).map_err(|problems| {
            warn!(problems = problems.len(), "property declarations rejected");
            StrataError::ConstructionFailed(problems)
        })?;

        let mut resolution = Resolution::default();
        for loader in &self.loaders {
            resolution.run(loader.as_ref(), &registry);
        }
        resolution.check_requirements(&registry);

        let Resolution {
            assignments,
            overridden,
            problems,
        } = resolution;
        if !problems.is_empty() {
            warn!(problems = problems.len(), "configuration rejected");
            return Err(StrataError::LoadFailed(problems));
        }
        info!(
            properties = registry.len(),
            explicit = assignments.len(),
            "configuration snapshot frozen"
        );
        Ok(Snapshot::new(registry, assignments, overridden))
    }
}

/// State threaded through the loaders of one construction.
#[derive(Debug, Default)]
struct Resolution {
    assignments: BTreeMap<PropertyId, Assignment>,
    overridden: Vec<Override>,
    problems: ProblemList,
}

impl Resolution {
    fn run(&mut self, loader: &dyn Loader, registry: &Registry) {
        let context = LoadContext::new(registry, &self.assignments);
        let (name, values, problems) = loader.load(registry, &context).into_parts();
        debug!(
            loader = %name,
            values = values.len(),
            problems = problems.len(),
            "loader finished"
        );
        self.problems.extend(problems);
        for loaded in values {
            self.assign(registry, &name, loaded);
        }
    }

    fn assign(&mut self, registry: &Registry, loader: &str, loaded: LoadedValue) {
        let Some(canonical) = registry.canonical_name(&loaded.property) else {
            self.problems.push(LoaderProblem::UnrecognizedName {
                loader: loader.to_owned(),
                name: loaded.name,
            });
            return;
        };
        match self.assignments.entry(loaded.property) {
            Entry::Vacant(slot) => {
                slot.insert(Assignment {
                    value: loaded.value,
                    loader: loader.to_owned(),
                    name: loaded.name,
                });
            }
            Entry::Occupied(kept) => {
                debug!(
                    canonical,
                    loader,
                    kept_from = %kept.get().loader,
                    "later value discarded"
                );
                self.overridden.push(Override {
                    property: loaded.property,
                    canonical: canonical.to_owned(),
                    loader: loader.to_owned(),
                    name: loaded.name,
                    value: loaded.value,
                    kept_from: kept.get().loader.clone(),
                });
            }
        }
    }

    fn check_requirements(&mut self, registry: &Registry) {
        for registered in registry {
            let property = registered.property();
            let has_value = self.assignments.contains_key(&registered.id())
                || property.default_value().is_some();
            if property.is_required() && !has_value {
                self.problems.push(RequirementProblem {
                    canonical: registered.canonical_name().to_owned(),
                    group: registered.group().clone(),
                });
            }
        }
    }
}
