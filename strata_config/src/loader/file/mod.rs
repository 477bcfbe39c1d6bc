//! Configuration files.
//!
//! Two formats are understood: Java-style `.properties` files and TOML.
//! TOML tables flatten into dotted names, so `[app.http] PORT = 80` and the
//! properties line `app.http.PORT = 80` feed the same property.

mod properties;
mod toml;

use camino::{Utf8Path, Utf8PathBuf};
use thiserror::Error;
use tracing::debug;

use super::{EntryCollector, LoadContext, Loader, LoaderValues, RawEntry};
use crate::problem::LoaderProblem;
use crate::property::Property;
use crate::registry::Registry;

/// Syntax of a configuration file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// `key = value` lines; values are trimmed.
    Properties,
    /// TOML; values are taken as written.
    Toml,
}

impl FileFormat {
    /// Chooses the format from the file extension: `.toml` is TOML, anything
    /// else is read as properties.
    #[must_use]
    pub fn from_path(path: &Utf8Path) -> Self {
        match path.extension() {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Self::Toml,
            _ => Self::Properties,
        }
    }

    /// Whether values in this format are trimmed before parsing.
    #[must_use]
    pub const fn trims(self) -> bool {
        matches!(self, Self::Properties)
    }

    fn entries(self, text: &str) -> Result<Vec<RawEntry>, SourceError> {
        match self {
            Self::Properties => properties::parse(text),
            Self::Toml => toml::parse(text),
        }
    }
}

#[derive(Debug, Error)]
enum SourceError {
    #[error("{0}")]
    Io(#[from] std::io::Error),
    #[error("line {line}: {message}")]
    Syntax { line: usize, message: String },
    #[error("invalid TOML: {0}")]
    Toml(#[from] ::toml::de::Error),
    #[error("`{key}` holds a {kind}, which cannot be a property value")]
    Unsupported { key: String, kind: &'static str },
}

#[derive(Debug, Clone)]
enum Location {
    Fixed(Utf8PathBuf),
    FromProperty(Property<Utf8PathBuf>),
}

/// Reads properties from a `.properties` or `.toml` file.
///
/// The path is either fixed or taken from a path property loaded by an
/// earlier loader (or its default), which lets a command-line argument
/// choose the file. Unknown names in a file are problems.
///
/// # Examples
///
/// ```rust,no_run
/// use strata_config::{ArgsLoader, FileLoader, Group, Property, StrataBuilder};
///
/// let config_file = Property::path().default_value("app.properties").build();
/// let name = Property::string().required().build();
///
/// let snapshot = StrataBuilder::new()
///     .group(Group::new("app").property("CONFIG", &config_file).property("NAME", &name))
///     .loader(ArgsLoader::new(std::env::args().skip(1)))
///     .loader(FileLoader::from_property(&config_file))
///     .construct()?;
/// # Ok::<_, strata_config::StrataError>(())
/// ```
#[derive(Debug, Clone)]
pub struct FileLoader {
    name: String,
    location: Location,
    required: bool,
    format: Option<FileFormat>,
}

impl FileLoader {
    fn with_location(location: Location, required: bool) -> Self {
        Self {
            name: String::from("configuration file"),
            location,
            required,
            format: None,
        }
    }

    /// Loader for a file that must exist.
    #[must_use]
    pub fn new(path: impl Into<Utf8PathBuf>) -> Self {
        Self::with_location(Location::Fixed(path.into()), true)
    }

    /// Loader for a file that is skipped when missing.
    #[must_use]
    pub fn optional(path: impl Into<Utf8PathBuf>) -> Self {
        Self::with_location(Location::Fixed(path.into()), false)
    }

    /// Loader whose path is the effective value of `property`.
    ///
    /// Nothing is read when the property has no value. A missing file is a
    /// problem only when the path was set explicitly.
    #[must_use]
    pub fn from_property(property: &Property<Utf8PathBuf>) -> Self {
        Self::with_location(Location::FromProperty(property.clone()), false)
    }

    /// Optional loader for `file` in the per-user configuration directory of
    /// `app`, e.g. `~/.config/<app>/<file>` on Linux.
    #[must_use]
    pub fn user_config(app: &str, file: &str) -> Option<Self> {
        let dir = dirs::config_dir()?;
        let path = Utf8PathBuf::from_path_buf(dir.join(app).join(file)).ok()?;
        Some(Self::optional(path).named(format!("user configuration ({app})")))
    }

    /// Overrides the format chosen from the extension.
    #[must_use]
    pub const fn with_format(mut self, format: FileFormat) -> Self {
        self.format = Some(format);
        self
    }

    /// Renames the loader in reports.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    fn resolve(&self, context: &LoadContext<'_>) -> Option<(Utf8PathBuf, bool)> {
        match &self.location {
            Location::Fixed(path) => Some((path.clone(), self.required)),
            Location::FromProperty(property) => context
                .effective_value(property)
                .map(|path| (path, self.required || context.is_set(property))),
        }
    }

    fn format_for(&self, path: &Utf8Path) -> FileFormat {
        self.format.unwrap_or_else(|| FileFormat::from_path(path))
    }

    fn unavailable(&self, path: &Utf8Path, err: &SourceError) -> LoaderProblem {
        LoaderProblem::SourceUnavailable {
            loader: self.name.clone(),
            location: path.to_string(),
            message: err.to_string(),
        }
    }
}

impl Loader for FileLoader {
    fn name(&self) -> &str {
        &self.name
    }

    fn load(&self, registry: &Registry, context: &LoadContext<'_>) -> LoaderValues {
        let mut values = LoaderValues::new(self.name.as_str());
        let Some((path, required)) = self.resolve(context) else {
            debug!(loader = %self.name, "no file configured");
            return values;
        };

        let text = match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound && !required => {
                debug!(loader = %self.name, %path, "optional file not found");
                return values;
            }
            Err(err) => {
                values.push_problem(self.unavailable(&path, &SourceError::from(err)));
                return values;
            }
        };

        let format = self.format_for(&path);
        let entries = match format.entries(&text) {
            Ok(entries) => entries,
            Err(err) => {
                values.push_problem(self.unavailable(&path, &err));
                return values;
            }
        };
        debug!(loader = %self.name, %path, entries = entries.len(), "file read");

        let mut collector = EntryCollector::new(self, registry).trimming(format.trims());
        for entry in entries {
            collector.offer(entry);
        }
        collector.finish()
    }

    fn requires_trimming(&self) -> bool {
        match (&self.location, self.format) {
            (_, Some(format)) => format.trims(),
            (Location::Fixed(path), None) => FileFormat::from_path(path).trims(),
            (Location::FromProperty(_), None) => true,
        }
    }

    fn treats_unrecognized_name_as_fatal(&self) -> bool {
        true
    }
}
