//! Pre-parse normalisation of raw source text.

/// Normalises raw text before it is parsed.
///
/// Both trimmers strip surrounding whitespace and map text that is empty
/// afterwards to `None`, meaning "no value". [`Trimmer::QuotedString`]
/// additionally removes one pair of enclosing double quotes so that values
/// can keep significant whitespace.
///
/// # Examples
///
/// ```rust
/// use strata_config::Trimmer;
///
/// assert_eq!(Trimmer::Whitespace.trim("  8080 "), Some(String::from("8080")));
/// assert_eq!(Trimmer::QuotedString.trim("  \" a b \"  "), Some(String::from(" a b ")));
/// assert_eq!(Trimmer::QuotedString.trim("\"\""), Some(String::new()));
/// assert_eq!(Trimmer::QuotedString.trim(" \t "), None);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[non_exhaustive]
pub enum Trimmer {
    /// Strips surrounding whitespace.
    #[default]
    Whitespace,
    /// Strips surrounding whitespace, then one pair of enclosing quotes.
    QuotedString,
}

impl Trimmer {
    /// Applies the trimmer to `raw`.
    #[must_use]
    pub fn trim(self, raw: &str) -> Option<String> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        match self {
            Self::Whitespace => Some(trimmed.to_owned()),
            Self::QuotedString => Some(strip_quotes(trimmed).to_owned()),
        }
    }
}

fn strip_quotes(value: &str) -> &str {
    if value.len() < 2 {
        return value;
    }
    value
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .unwrap_or(value)
}
