//! Constructing configurations inside a `figment::Jail`.
//!
//! A jail serialises access to the process environment, runs in a fresh
//! temporary working directory and restores both when the closure returns.
//! The environment is cleared on entry, so environment loaders only see the
//! variables a test sets itself.

use anyhow::{Result, anyhow};
use camino::Utf8PathBuf;
use strata_config::{Snapshot, StrataBuilder, StrataResult};

/// Builds a configuration inside a jail with an empty environment.
///
/// `setup` populates the jail with variables and files and returns the
/// builder; construction runs before the jail is torn down. The outer
/// result covers the jail itself, the inner one is the construction
/// outcome.
///
/// # Errors
///
/// Returns an error if the jail cannot be set up or `setup` fails.
pub fn construct_in_jail<F>(setup: F) -> Result<StrataResult<Snapshot>>
where
    F: FnOnce(&mut figment::Jail) -> figment::error::Result<StrataBuilder>,
{
    let mut outcome = None;
    figment::Jail::try_with(|jail| {
        jail.clear_env();
        outcome = Some(setup(jail)?.construct());
        Ok(())
    })
    .map_err(|err| anyhow!("jail setup failed: {err}"))?;
    outcome.ok_or_else(|| anyhow!("jail closure did not run"))
}

/// UTF-8 path of a file inside the jail's directory, for path properties.
///
/// # Errors
///
/// Returns an error if the jail directory is not valid UTF-8.
pub fn jail_path(jail: &figment::Jail, file: &str) -> figment::error::Result<Utf8PathBuf> {
    Utf8PathBuf::from_path_buf(jail.directory().join(file))
        .map_err(|path| figment::Error::from(format!("non UTF-8 path {}", path.display())))
}
