//! Command-line `key=value` tokens.

use super::{LoadContext, Loader, LoaderValues, RawEntry, collect_entries};
use crate::registry::Registry;

/// Reads `key=value` tokens, typically the trailing arguments of a CLI.
///
/// Leading `-` or `--` on a token is ignored, so `--verbose` and `verbose`
/// are the same entry. A token without the delimiter is a bare key, which
/// switches flags on and leaves other properties unset. A token that is
/// only dashes, such as the `--` separator, is skipped. Unknown keys are
/// problems.
///
/// # Examples
///
/// ```rust
/// use strata_config::{ArgsLoader, Group, Property, StrataBuilder};
///
/// let verbose = Property::flag().build();
/// let level = Property::string().default_value("info").build();
///
/// let snapshot = StrataBuilder::new()
///     .group(Group::new("log").property("VERBOSE", &verbose).property("LEVEL", &level))
///     .loader(ArgsLoader::new(["--log.verbose", "log.level=debug"]))
///     .construct()?;
///
/// assert_eq!(snapshot.get(&verbose), Some(true));
/// assert_eq!(snapshot.get(&level).as_deref(), Some("debug"));
/// # Ok::<_, strata_config::StrataError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ArgsLoader {
    name: String,
    args: Vec<String>,
    delimiter: char,
}

impl ArgsLoader {
    /// Loader over `args` using `=` as the delimiter.
    #[must_use]
    pub fn new<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: String::from("command line"),
            args: args.into_iter().map(Into::into).collect(),
            delimiter: '=',
        }
    }

    /// Loader over the process arguments, skipping the program name.
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(std::env::args().skip(1))
    }

    /// Uses `delimiter` between key and value.
    #[must_use]
    pub const fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Renames the loader in reports.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    fn entry(&self, token: &str) -> Option<RawEntry> {
        let stripped = token
            .strip_prefix("--")
            .or_else(|| token.strip_prefix('-'))
            .unwrap_or(token);
        if stripped.is_empty() {
            return None;
        }
        Some(stripped.split_once(self.delimiter).map_or_else(
            || RawEntry::present(stripped),
            |(key, value)| RawEntry::with_value(key, value),
        ))
    }
}

impl Loader for ArgsLoader {
    fn name(&self) -> &str {
        &self.name
    }

    fn load(&self, registry: &Registry, _context: &LoadContext<'_>) -> LoaderValues {
        collect_entries(
            self,
            registry,
            self.args.iter().filter_map(|token| self.entry(token)),
        )
    }

    fn treats_unrecognized_name_as_fatal(&self) -> bool {
        true
    }
}
