//! Documentation metadata for a registry.
//!
//! [`describe`] produces a serialisable [`ConfigDoc`] for external tooling;
//! [`render_properties_sample`] writes a commented `.properties` file that
//! lists every property with its default.

mod ir;

use std::fmt;

pub use ir::{AliasDoc, ConfigDoc, GroupDoc, PropertyDoc};

use crate::registry::{RegisteredProperty, Registry};

/// Current schema version of [`ConfigDoc`].
pub const DOCS_IR_VERSION: &str = "1.0";

/// Describes every property of `registry`.
#[must_use]
pub fn describe(registry: &Registry) -> ConfigDoc {
    let groups = registry
        .groups()
        .map(|group| GroupDoc {
            path: group.to_string(),
            properties: registry
                .properties_in(group)
                .map(|registered| describe_property(registry, registered))
                .collect(),
        })
        .collect();
    ConfigDoc {
        ir_version: DOCS_IR_VERSION.to_owned(),
        groups,
    }
}

fn describe_property(registry: &Registry, registered: &RegisteredProperty) -> PropertyDoc {
    let property = registered.property();
    PropertyDoc {
        canonical: registered.canonical_name().to_owned(),
        field: registered.field().to_owned(),
        value_type: property.type_name().to_owned(),
        required: property.is_required(),
        flag: property.is_flag(),
        default: property
            .default_value()
            .map(|value| value.rendered().to_owned()),
        description: property.description().map(ToOwned::to_owned),
        aliases: registered
            .aliases()
            .iter()
            .map(|alias| AliasDoc {
                name: alias.name().to_owned(),
                inbound: alias.is_inbound(),
                outbound: alias.is_outbound(),
            })
            .collect(),
        env: registered
            .names()
            .inbound_names()
            .map(|name| registry.naming().env_name(name))
            .collect(),
        rules: property.validator_descriptions(),
    }
}

/// Renders a `.properties` file listing every property.
///
/// Properties with a default are written as active entries; the others are
/// commented out so the file loads cleanly as it stands.
///
/// ```rust
/// use std::sync::Arc;
///
/// use strata_config::docs::render_properties_sample;
/// use strata_config::{DottedNaming, Group, Property, Registry};
///
/// let port = Property::integer()
///     .default_value(8080)
///     .description("Listening port")
///     .build();
/// let registry = Registry::build(
///     Group::new("app").property("PORT", &port).declarations(),
///     Arc::new(DottedNaming),
/// )
/// .map_err(|problems| problems.to_string())?;
///
/// let sample = render_properties_sample(&registry);
/// assert!(sample.contains("# Listening port\n"));
/// assert!(sample.contains("app.PORT=8080\n"));
/// # Ok::<_, String>(())
/// ```
#[must_use]
pub fn render_properties_sample(registry: &Registry) -> String {
    PropertiesSample::new(registry).to_string()
}

/// [`fmt::Display`] adapter behind [`render_properties_sample`].
#[derive(Debug, Clone, Copy)]
pub struct PropertiesSample<'a> {
    registry: &'a Registry,
}

impl<'a> PropertiesSample<'a> {
    /// Wraps `registry`.
    #[must_use]
    pub const fn new(registry: &'a Registry) -> Self {
        Self { registry }
    }
}

impl fmt::Display for PropertiesSample<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, group) in self.registry.groups().enumerate() {
            if index > 0 {
                writeln!(f)?;
            }
            writeln!(f, "# [{group}]")?;
            for registered in self.registry.properties_in(group) {
                write_entry(f, registered)?;
            }
        }
        Ok(())
    }
}

fn write_entry(f: &mut fmt::Formatter<'_>, registered: &RegisteredProperty) -> fmt::Result {
    let property = registered.property();
    if let Some(description) = property.description() {
        for line in description.lines() {
            writeln!(f, "# {line}")?;
        }
    }
    let mut facts = vec![property.type_name().to_owned()];
    if property.is_required() {
        facts.push(String::from("required"));
    }
    facts.extend(property.validator_descriptions());
    writeln!(f, "# {}", facts.join(", "))?;
    let name = escape(registered.canonical_name());
    let (marker, default) = property
        .default_value()
        .map_or(("#", String::new()), |value| ("", escape(value.rendered())));
    writeln!(f, "{marker}{name}={default}")
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            '=' | ':' | '#' | '!' => {
                escaped.push('\\');
                escaped.push(c);
            }
            other => escaped.push(other),
        }
    }
    escaped
}
