//! Serialisable description of a registry.

use serde::Serialize;

/// Every registered property, grouped in declaration order.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ConfigDoc {
    /// Version of this schema.
    pub ir_version: String,
    /// Groups in the order their first property was declared.
    pub groups: Vec<GroupDoc>,
}

/// One group and its properties.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct GroupDoc {
    /// Dotted group path.
    pub path: String,
    /// Properties in declaration order.
    pub properties: Vec<PropertyDoc>,
}

/// One property.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PropertyDoc {
    /// Canonical name.
    pub canonical: String,
    /// Declared field name.
    pub field: String,
    /// Value type name.
    pub value_type: String,
    /// Whether an effective value is mandatory.
    pub required: bool,
    /// Whether a bare entry switches the property on.
    pub flag: bool,
    /// Rendered default.
    pub default: Option<String>,
    /// Free-form description.
    pub description: Option<String>,
    /// Resolved aliases.
    pub aliases: Vec<AliasDoc>,
    /// Environment variable spellings of the inbound names.
    pub env: Vec<String>,
    /// Validator descriptions.
    pub rules: Vec<String>,
}

/// One alias.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct AliasDoc {
    /// Alias text.
    pub name: String,
    /// Accepted when reading.
    pub inbound: bool,
    /// Emitted when exporting.
    pub outbound: bool,
}
