//! Naming strategies.
//!
//! A [`NamingStrategy`] turns a property's group path, field name and
//! requested aliases into a canonical name plus the resolved alias set, and
//! decides how external names are normalised before lookup. The built-in
//! [`DottedNaming`] produces `group.path.FIELD` names and matches inbound
//! names case-insensitively.

use std::fmt;

use thiserror::Error;

use crate::group::GroupPath;

/// Characters that may not appear in a canonical name or alias.
pub const RESERVED_CHARACTERS: &[char] = &[
    ';', '/', '?', ':', '@', '=', '&', '"', '<', '>', '#', '%', '{', '}', '|', '\\', '^', '~', '[',
    ']', '`',
];

/// An alternative external name for a property.
///
/// Inbound aliases are recognised by loaders; outbound aliases are used when
/// exporting. An alias may be both.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Alias {
    name: String,
    inbound: bool,
    outbound: bool,
}

impl Alias {
    /// Creates an alias with explicit direction flags.
    #[must_use]
    pub fn new(name: impl Into<String>, inbound: bool, outbound: bool) -> Self {
        Self {
            name: name.into(),
            inbound,
            outbound,
        }
    }

    /// Alias text.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether loaders recognise this name.
    #[must_use]
    pub const fn is_inbound(&self) -> bool {
        self.inbound
    }

    /// Whether exports use this name.
    #[must_use]
    pub const fn is_outbound(&self) -> bool {
        self.outbound
    }

    fn absorb(&mut self, other: &Self) {
        self.inbound |= other.inbound;
        self.outbound |= other.outbound;
    }
}

impl fmt::Display for Alias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let direction = match (self.inbound, self.outbound) {
            (true, true) => "in/out",
            (true, false) => "in",
            (false, true) => "out",
            (false, false) => "unused",
        };
        write!(f, "{} ({direction})", self.name)
    }
}

/// Reason a name was rejected by a naming strategy.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NameProblem {
    /// The name is empty.
    #[error("name is empty")]
    EmptyName,
    /// The name contains whitespace.
    #[error("`{name}` contains whitespace")]
    Whitespace {
        /// Offending name.
        name: String,
    },
    /// The name contains a reserved character.
    #[error("`{name}` contains the reserved character `{character}`")]
    Reserved {
        /// Offending name.
        name: String,
        /// First reserved character found.
        character: char,
    },
}

/// The names a strategy assigned to one property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedName {
    canonical: String,
    aliases: Vec<Alias>,
}

impl ResolvedName {
    /// Creates a resolved name.
    #[must_use]
    pub const fn new(canonical: String, aliases: Vec<Alias>) -> Self {
        Self { canonical, aliases }
    }

    /// Primary name; always both inbound and outbound.
    #[must_use]
    pub fn canonical(&self) -> &str {
        &self.canonical
    }

    /// Resolved aliases, excluding the canonical name.
    #[must_use]
    pub fn aliases(&self) -> &[Alias] {
        &self.aliases
    }

    /// Canonical name followed by every inbound alias.
    pub fn inbound_names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.canonical.as_str()).chain(
            self.aliases
                .iter()
                .filter(|alias| alias.is_inbound())
                .map(Alias::name),
        )
    }

    /// Canonical name followed by every outbound alias.
    pub fn outbound_names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.canonical.as_str()).chain(
            self.aliases
                .iter()
                .filter(|alias| alias.is_outbound())
                .map(Alias::name),
        )
    }
}

/// Pluggable policy for naming properties.
pub trait NamingStrategy: Send + Sync + fmt::Debug {
    /// Builds the canonical name and alias set for a property.
    ///
    /// # Errors
    ///
    /// Returns every [`NameProblem`] found in the canonical name and the
    /// requested aliases.
    fn build_name(
        &self,
        group: &GroupPath,
        field: &str,
        requested: &[Alias],
    ) -> Result<ResolvedName, Vec<NameProblem>>;

    /// Normalises an external name before lookup.
    fn normalise(&self, name: &str) -> String;

    /// Spelling of `name` in an environment variable.
    fn env_name(&self, name: &str) -> String;
}

/// Checks `name` for emptiness, whitespace and reserved characters.
///
/// # Errors
///
/// Returns the first [`NameProblem`] found.
pub fn check_name(name: &str) -> Result<(), NameProblem> {
    if name.is_empty() {
        return Err(NameProblem::EmptyName);
    }
    if name.chars().any(char::is_whitespace) {
        return Err(NameProblem::Whitespace {
            name: name.to_owned(),
        });
    }
    if let Some(character) = name.chars().find(|c| RESERVED_CHARACTERS.contains(c)) {
        return Err(NameProblem::Reserved {
            name: name.to_owned(),
            character,
        });
    }
    Ok(())
}

/// `group.path.FIELD` canonical names with ASCII case-insensitive lookup.
///
/// # Examples
///
/// ```rust
/// use strata_config::{Alias, DottedNaming, GroupPath, NamingStrategy};
///
/// let naming = DottedNaming;
/// let group = GroupPath::new("app.Database", ["Pool"]);
/// let name = naming
///     .build_name(&group, "MAX_SIZE", &[Alias::new("DB_POOL", true, false)])
///     .expect("valid names");
///
/// assert_eq!(name.canonical(), "app.Database.Pool.MAX_SIZE");
/// assert_eq!(naming.normalise("APP.database.pool.max_size"), "app.database.pool.max_size");
/// assert_eq!(naming.env_name(name.canonical()), "APP_DATABASE_POOL_MAX_SIZE");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct DottedNaming;

impl NamingStrategy for DottedNaming {
    fn build_name(
        &self,
        group: &GroupPath,
        field: &str,
        requested: &[Alias],
    ) -> Result<ResolvedName, Vec<NameProblem>> {
        let canonical = if group.as_str().is_empty() {
            field.to_owned()
        } else {
            format!("{group}.{field}")
        };

        let mut problems = Vec::new();
        if let Err(problem) = check_name(field) {
            problems.push(problem);
        } else if let Err(problem) = check_name(&canonical) {
            problems.push(problem);
        }

        let canonical_key = self.normalise(&canonical);
        let mut aliases: Vec<Alias> = Vec::new();
        for alias in requested {
            if let Err(problem) = check_name(alias.name()) {
                problems.push(problem);
                continue;
            }
            if self.normalise(alias.name()) == canonical_key {
                continue;
            }
            let Some(known) = aliases.iter_mut().find(|known| known.name() == alias.name()) else {
                aliases.push(alias.clone());
                continue;
            };
            known.absorb(alias);
        }

        if problems.is_empty() {
            Ok(ResolvedName::new(canonical, aliases))
        } else {
            Err(problems)
        }
    }

    fn normalise(&self, name: &str) -> String {
        name.to_ascii_lowercase()
    }

    fn env_name(&self, name: &str) -> String {
        name.chars()
            .map(|c| match c {
                '.' | '-' => '_',
                other => other.to_ascii_uppercase(),
            })
            .collect()
    }
}
