//! Environment variables.

use tracing::debug;
use uncased::UncasedStr;

use super::{EntryCollector, LoadContext, Loader, LoaderValues, RawEntry};
use crate::registry::Registry;

/// Reads properties from environment variables.
///
/// Each inbound name of a property is spelled through the naming strategy's
/// `env_name` (`app.http.PORT` becomes `APP_HTTP_PORT` by default) and
/// matched after the strategy's normalisation, so case is ignored by
/// default. With a prefix, only variables starting
/// with it are considered and the prefix is removed before matching.
/// Variables that match nothing are ignored.
///
/// # Examples
///
/// ```rust
/// use strata_config::{EnvLoader, Group, Property, StrataBuilder};
///
/// let port = Property::integer().build();
///
/// let snapshot = StrataBuilder::new()
///     .group(Group::new("app.http").property("PORT", &port))
///     .loader(EnvLoader::prefixed("MYAPP_").with_vars([("MYAPP_APP_HTTP_PORT", "9000")]))
///     .construct()?;
///
/// assert_eq!(snapshot.get(&port), Some(9000));
/// # Ok::<_, strata_config::StrataError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct EnvLoader {
    prefix: Option<String>,
    vars: Option<Vec<(String, String)>>,
}

impl EnvLoader {
    /// Loader over every process environment variable.
    #[must_use]
    pub fn raw() -> Self {
        Self::default()
    }

    /// Loader over variables starting with `prefix`.
    #[must_use]
    pub fn prefixed(prefix: &str) -> Self {
        Self {
            prefix: Some(prefix.to_owned()),
            vars: None,
        }
    }

    /// Reads from `vars` instead of the process environment.
    #[must_use]
    pub fn with_vars<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.vars = Some(
            vars.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        );
        self
    }

    fn variables(&self) -> Vec<(String, String)> {
        let mut vars = self.vars.clone().unwrap_or_else(|| {
            std::env::vars_os()
                .filter_map(|(key, value)| {
                    Some((key.into_string().ok()?, value.into_string().ok()?))
                })
                .collect()
        });
        vars.sort();
        vars
    }

    fn unprefixed<'k>(&self, key: &'k str) -> Option<&'k str> {
        match &self.prefix {
            None => Some(key),
            Some(prefix) if UncasedStr::new(key).starts_with(prefix) => key.get(prefix.len()..),
            Some(_) => None,
        }
    }
}

impl Loader for EnvLoader {
    fn name(&self) -> &str {
        "environment"
    }

    fn load(&self, registry: &Registry, _context: &LoadContext<'_>) -> LoaderValues {
        let mut collector = EntryCollector::new(self, registry);
        for (key, value) in self.variables() {
            let Some(stripped) = self.unprefixed(&key) else {
                continue;
            };
            let Some(registered) = registry.resolve_env(stripped) else {
                debug!(variable = %key, "environment variable matches no property");
                continue;
            };
            collector.offer_resolved(registered, RawEntry::with_value(key, value));
        }
        collector.finish()
    }
}
