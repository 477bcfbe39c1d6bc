//! Value type capability tables and the built-in parsers.

use std::fmt;

use camino::Utf8PathBuf;
use chrono::{NaiveDate, NaiveDateTime};
use thiserror::Error;

use super::Trimmer;

/// Failure to convert trimmed text into a property's value type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ParseError {
    message: String,
}

impl ParseError {
    /// Creates a parse error with a human-readable `message`.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Human-readable description of the failure.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Parser from trimmed text to a value of type `T`.
pub type ParseFn<T> = fn(&str) -> Result<T, ParseError>;

/// Capabilities of a property value type.
///
/// A type spec bundles the parser, the trimmer applied to text sources and
/// whether the type follows flag semantics. Custom types need nothing more:
///
/// ```rust
/// use strata_config::{ParseError, Property, PropertyValue, TypeSpec};
///
/// #[derive(Clone, Debug, PartialEq)]
/// struct Port(u16);
///
/// impl PropertyValue for Port {
///     fn render(&self) -> String {
///         self.0.to_string()
///     }
/// }
///
/// fn parse_port(text: &str) -> Result<Port, ParseError> {
///     text.parse()
///         .map(Port)
///         .map_err(|err| ParseError::new(format!("`{text}` is not a port: {err}")))
/// }
///
/// const PORT: TypeSpec<Port> = TypeSpec::new("port", parse_port);
///
/// let listen = Property::builder(PORT).default_value(Port(8080)).build();
/// assert_eq!(listen.parse("443"), Ok(Port(443)));
/// ```
pub struct TypeSpec<T> {
    name: &'static str,
    parse: ParseFn<T>,
    trimmer: Trimmer,
    flag: bool,
}

impl<T> TypeSpec<T> {
    /// Creates a spec using the whitespace trimmer.
    #[must_use]
    pub const fn new(name: &'static str, parse: ParseFn<T>) -> Self {
        Self {
            name,
            parse,
            trimmer: Trimmer::Whitespace,
            flag: false,
        }
    }

    /// Replaces the default trimmer.
    #[must_use]
    pub const fn with_trimmer(mut self, trimmer: Trimmer) -> Self {
        self.trimmer = trimmer;
        self
    }

    const fn as_flag(mut self) -> Self {
        self.flag = true;
        self
    }

    /// Name of the type used in reports and documentation.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Trimmer applied to text sources unless the property overrides it.
    #[must_use]
    pub const fn trimmer(&self) -> Trimmer {
        self.trimmer
    }

    /// Whether a present entry without a value means `true`.
    #[must_use]
    pub const fn is_flag(&self) -> bool {
        self.flag
    }

    /// Parses trimmed text.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] when the text is not valid for this type.
    pub fn parse(&self, text: &str) -> Result<T, ParseError> {
        (self.parse)(text)
    }
}

impl<T> Clone for TypeSpec<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for TypeSpec<T> {}

impl<T> fmt::Debug for TypeSpec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeSpec")
            .field("name", &self.name)
            .field("trimmer", &self.trimmer)
            .field("flag", &self.flag)
            .finish_non_exhaustive()
    }
}

/// Free text; keeps whitespace enclosed in double quotes.
pub const STRING: TypeSpec<String> =
    TypeSpec::new("string", parse_string).with_trimmer(Trimmer::QuotedString);
/// Signed 64-bit integers.
pub const INTEGER: TypeSpec<i64> = TypeSpec::new("integer", parse_integer);
/// Booleans written with the true/false vocabulary.
pub const BOOLEAN: TypeSpec<bool> = TypeSpec::new("boolean", parse_boolean);
/// Booleans that are never null and switch on when present without a value.
pub const FLAG: TypeSpec<bool> = TypeSpec::new("flag", parse_boolean).as_flag();
/// Finite floating-point numbers.
pub const DECIMAL: TypeSpec<f64> = TypeSpec::new("decimal", parse_decimal);
/// Calendar dates written as `YYYY-MM-DD`.
pub const DATE: TypeSpec<NaiveDate> = TypeSpec::new("date", parse_date);
/// Local timestamps written as `YYYY-MM-DDTHH:MM:SS` with optional fraction.
pub const DATE_TIME: TypeSpec<NaiveDateTime> = TypeSpec::new("date-time", parse_date_time);
/// File system paths.
pub const PATH: TypeSpec<Utf8PathBuf> =
    TypeSpec::new("path", parse_path).with_trimmer(Trimmer::QuotedString);
/// Comma-separated lists of strings.
pub const LIST: TypeSpec<Vec<String>> = TypeSpec::new("list", parse_list);

const TRUE_WORDS: [&str; 5] = ["true", "t", "yes", "y", "on"];
const FALSE_WORDS: [&str; 5] = ["false", "f", "no", "n", "off"];

fn parse_string(text: &str) -> Result<String, ParseError> {
    Ok(text.to_owned())
}

fn parse_integer(text: &str) -> Result<i64, ParseError> {
    text.parse()
        .map_err(|err| ParseError::new(format!("`{text}` is not an integer: {err}")))
}

fn parse_boolean(text: &str) -> Result<bool, ParseError> {
    let lowered = text.to_ascii_lowercase();
    if TRUE_WORDS.contains(&lowered.as_str()) {
        Ok(true)
    } else if FALSE_WORDS.contains(&lowered.as_str()) {
        Ok(false)
    } else {
        Err(ParseError::new(format!(
            "`{text}` is not a boolean; use one of {} or {}",
            TRUE_WORDS.join("/"),
            FALSE_WORDS.join("/")
        )))
    }
}

fn parse_decimal(text: &str) -> Result<f64, ParseError> {
    let value: f64 = text
        .parse()
        .map_err(|err| ParseError::new(format!("`{text}` is not a decimal number: {err}")))?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ParseError::new(format!("`{text}` is not a finite number")))
    }
}

fn parse_date(text: &str) -> Result<NaiveDate, ParseError> {
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .map_err(|err| ParseError::new(format!("`{text}` is not a YYYY-MM-DD date: {err}")))
}

fn parse_date_time(text: &str) -> Result<NaiveDateTime, ParseError> {
    NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S%.f"))
        .map_err(|err| {
            ParseError::new(format!(
                "`{text}` is not a YYYY-MM-DDTHH:MM:SS timestamp: {err}"
            ))
        })
}

fn parse_path(text: &str) -> Result<Utf8PathBuf, ParseError> {
    Ok(Utf8PathBuf::from(text))
}

fn parse_list(text: &str) -> Result<Vec<String>, ParseError> {
    Ok(text
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_owned)
        .collect())
}
