//! The immutable index of declared properties.
//!
//! [`Registry::build`] folds over the declarations left to right, resolving
//! names through the naming strategy and recording every structural defect
//! it meets. A registry only exists when the fold found nothing wrong.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;

use tracing::debug;

use crate::group::{GroupPath, PropertyDeclaration};
use crate::naming::{Alias, NamingStrategy, ResolvedName};
use crate::problem::{ConstructionProblem, ProblemList};
use crate::property::{AnyProperty, PropertyId, PropertyKey};

/// A property accepted into the registry.
#[derive(Debug, Clone)]
pub struct RegisteredProperty {
    property: Arc<dyn AnyProperty>,
    group: GroupPath,
    field: String,
    name: ResolvedName,
}

impl RegisteredProperty {
    /// The type-erased property.
    #[must_use]
    pub fn property(&self) -> &dyn AnyProperty {
        self.property.as_ref()
    }

    /// Identity of the property.
    #[must_use]
    pub fn id(&self) -> PropertyId {
        self.property.id()
    }

    /// Group the property was declared in.
    #[must_use]
    pub const fn group(&self) -> &GroupPath {
        &self.group
    }

    /// Field name within the group.
    #[must_use]
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Canonical name.
    #[must_use]
    pub fn canonical_name(&self) -> &str {
        self.name.canonical()
    }

    /// Resolved aliases.
    #[must_use]
    pub fn aliases(&self) -> &[Alias] {
        self.name.aliases()
    }

    /// Full name resolution, including direction-filtered views.
    #[must_use]
    pub const fn names(&self) -> &ResolvedName {
        &self.name
    }
}

impl PropertyKey for RegisteredProperty {
    fn property_id(&self) -> PropertyId {
        self.id()
    }
}

/// Name and identity index over every declared property.
#[derive(Debug)]
pub struct Registry {
    naming: Arc<dyn NamingStrategy>,
    entries: Vec<RegisteredProperty>,
    positions: HashMap<PropertyId, usize>,
    inbound: HashMap<String, PropertyId>,
    env: HashMap<String, PropertyId>,
    groups: Vec<(GroupPath, Vec<PropertyId>)>,
}

impl Registry {
    /// Registers `declarations` in order.
    ///
    /// # Errors
    ///
    /// Returns every construction problem found: invalid names, duplicate
    /// registrations, colliding inbound names, misconfigured validators and
    /// defaults that fail their validators.
    pub fn build<I>(
        declarations: I,
        naming: Arc<dyn NamingStrategy>,
    ) -> Result<Self, ProblemList>
    where
        I: IntoIterator<Item = PropertyDeclaration>,
    {
        let mut registry = Self {
            naming,
            entries: Vec::new(),
            positions: HashMap::new(),
            inbound: HashMap::new(),
            env: HashMap::new(),
            groups: Vec::new(),
        };
        let mut problems = ProblemList::default();
        // Every handle seen so far, including rejected ones, by canonical name.
        let mut seen: HashMap<PropertyId, String> = HashMap::new();

        for declaration in declarations {
            registry.consider(&declaration, &mut seen, &mut problems);
        }

        if problems.is_empty() {
            debug!(properties = registry.len(), "registry built");
            Ok(registry)
        } else {
            Err(problems)
        }
    }

    fn consider(
        &mut self,
        declaration: &PropertyDeclaration,
        seen: &mut HashMap<PropertyId, String>,
        problems: &mut ProblemList,
    ) {
        let group = declaration.group_path();
        let property = declaration.property();

        let name = match self.naming.build_name(
            &group,
            declaration.field(),
            property.requested_aliases(),
        ) {
            Ok(name) => name,
            Err(name_problems) => {
                for problem in name_problems {
                    problems.push(ConstructionProblem::InvalidName {
                        group: group.clone(),
                        field: declaration.field().to_owned(),
                        problem,
                    });
                }
                seen.entry(property.id())
                    .or_insert_with(|| format!("{group}.{}", declaration.field()));
                return;
            }
        };
        let canonical = name.canonical().to_owned();

        match seen.entry(property.id()) {
            Entry::Occupied(existing) => {
                problems.push(ConstructionProblem::DuplicateProperty {
                    group,
                    name: canonical,
                    existing: existing.get().clone(),
                });
                return;
            }
            Entry::Vacant(slot) => {
                slot.insert(canonical.clone());
            }
        }

        let collisions: Vec<ConstructionProblem> = name
            .inbound_names()
            .filter_map(|inbound| {
                let owner = self
                    .inbound
                    .get(&self.naming.normalise(inbound))
                    .or_else(|| self.env.get(&self.env_key(inbound)))?;
                let existing = self.position(*owner)?;
                Some(ConstructionProblem::NonUniqueName {
                    name: inbound.to_owned(),
                    canonical: canonical.clone(),
                    existing: existing.canonical_name().to_owned(),
                })
            })
            .collect();
        if !collisions.is_empty() {
            problems.extend(collisions.into_iter().map(Into::into));
            return;
        }

        let misconfigured = property.validator_configuration_problems();
        if !misconfigured.is_empty() {
            for message in misconfigured {
                problems.push(ConstructionProblem::InvalidValidatorConfiguration {
                    canonical: canonical.clone(),
                    message,
                });
            }
            return;
        }

        let default_violations = property.default_value_violations();
        if !default_violations.is_empty() {
            let rendered = property
                .default_value()
                .map(|value| value.rendered().to_owned())
                .unwrap_or_default();
            for violation in default_violations {
                problems.push(ConstructionProblem::InvalidDefaultValue {
                    canonical: canonical.clone(),
                    value: rendered.clone(),
                    message: violation.message,
                });
            }
            return;
        }

        self.commit(declaration, group, name);
    }

    fn commit(&mut self, declaration: &PropertyDeclaration, group: GroupPath, name: ResolvedName) {
        let id = declaration.property().id();
        for inbound in name.inbound_names() {
            self.inbound.insert(self.naming.normalise(inbound), id);
            self.env.insert(self.env_key(inbound), id);
        }
        self.add_to_group(&group, id);
        debug!(canonical = name.canonical(), "property registered");
        self.positions.insert(id, self.entries.len());
        self.entries.push(RegisteredProperty {
            property: Arc::clone(declaration.property()),
            group,
            field: declaration.field().to_owned(),
            name,
        });
    }

    fn add_to_group(&mut self, group: &GroupPath, id: PropertyId) {
        let Some((_, members)) = self.groups.iter_mut().find(|(path, _)| path == group) else {
            self.groups.push((group.clone(), vec![id]));
            return;
        };
        members.push(id);
    }

    /// Environment spellings share one namespace, so `app.b_c` and `app.b.c`
    /// collide even though their inbound names differ.
    fn env_key(&self, name: &str) -> String {
        self.naming.normalise(&self.naming.env_name(name))
    }

    fn position(&self, id: PropertyId) -> Option<&RegisteredProperty> {
        self.positions
            .get(&id)
            .and_then(|&index| self.entries.get(index))
    }

    /// Looks up an external name after normalisation.
    #[must_use]
    pub fn resolve(&self, name: &str) -> Option<&RegisteredProperty> {
        self.inbound
            .get(&self.naming.normalise(name))
            .and_then(|id| self.position(*id))
    }

    /// Looks up an environment variable name, without any prefix, against
    /// the environment spellings of every inbound name.
    #[must_use]
    pub fn resolve_env(&self, variable: &str) -> Option<&RegisteredProperty> {
        self.env
            .get(&self.naming.normalise(variable))
            .and_then(|id| self.position(*id))
    }

    /// Looks up a property by identity.
    #[must_use]
    pub fn get(&self, key: &(impl PropertyKey + ?Sized)) -> Option<&RegisteredProperty> {
        self.position(key.property_id())
    }

    /// Whether the property was registered.
    #[must_use]
    pub fn contains(&self, key: &(impl PropertyKey + ?Sized)) -> bool {
        self.positions.contains_key(&key.property_id())
    }

    /// Canonical name of a registered property.
    #[must_use]
    pub fn canonical_name(&self, key: &(impl PropertyKey + ?Sized)) -> Option<&str> {
        self.get(key).map(RegisteredProperty::canonical_name)
    }

    /// Resolved aliases of a registered property.
    #[must_use]
    pub fn aliases(&self, key: &(impl PropertyKey + ?Sized)) -> Option<&[Alias]> {
        self.get(key).map(RegisteredProperty::aliases)
    }

    /// Group of a registered property.
    #[must_use]
    pub fn group_of(&self, key: &(impl PropertyKey + ?Sized)) -> Option<&GroupPath> {
        self.get(key).map(RegisteredProperty::group)
    }

    /// Groups in first-declaration order.
    pub fn groups(&self) -> impl Iterator<Item = &GroupPath> {
        self.groups.iter().map(|(path, _)| path)
    }

    /// Properties of `group` in declaration order.
    pub fn properties_in<'a>(
        &'a self,
        group: &GroupPath,
    ) -> impl Iterator<Item = &'a RegisteredProperty> {
        self.groups
            .iter()
            .find(|(path, _)| path == group)
            .into_iter()
            .flat_map(|(_, members)| members.iter())
            .filter_map(|id| self.position(*id))
    }

    /// Every registered property in declaration order.
    pub fn iter(&self) -> std::slice::Iter<'_, RegisteredProperty> {
        self.entries.iter()
    }

    /// Number of registered properties.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing was registered.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Naming strategy used to build the registry.
    #[must_use]
    pub fn naming(&self) -> &dyn NamingStrategy {
        self.naming.as_ref()
    }
}

impl<'a> IntoIterator for &'a Registry {
    type Item = &'a RegisteredProperty;
    type IntoIter = std::slice::Iter<'a, RegisteredProperty>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests;
