//! Property grouping and declarations.
//!
//! Groups give properties a dotted namespace. A [`Group`] may nest further
//! groups; flattening it yields one [`PropertyDeclaration`] per property,
//! carrying the root group name, the nested segments and the field name the
//! naming strategy needs.

use std::fmt;
use std::sync::Arc;

use crate::property::{AnyProperty, Property};
use crate::value::PropertyValue;

/// Dotted path of a group, e.g. `app.Database.Pool`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupPath(String);

impl GroupPath {
    /// Joins a root group name with nested group segments.
    #[must_use]
    pub fn new<I, S>(root: &str, inner: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut path = root.to_owned();
        for segment in inner {
            if !path.is_empty() {
                path.push('.');
            }
            path.push_str(segment.as_ref());
        }
        Self(path)
    }

    /// Dotted form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GroupPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One property as declared by the application.
#[derive(Debug, Clone)]
pub struct PropertyDeclaration {
    root_group: String,
    inner_groups: Vec<String>,
    field: String,
    property: Arc<dyn AnyProperty>,
}

impl PropertyDeclaration {
    /// Declares `property` as `field` of the top-level group `root_group`.
    #[must_use]
    pub fn new<T: PropertyValue>(
        root_group: impl Into<String>,
        field: impl Into<String>,
        property: &Property<T>,
    ) -> Self {
        Self::from_erased(root_group, field, Arc::new(property.clone()))
    }

    /// Declares an already type-erased property.
    #[must_use]
    pub fn from_erased(
        root_group: impl Into<String>,
        field: impl Into<String>,
        property: Arc<dyn AnyProperty>,
    ) -> Self {
        Self {
            root_group: root_group.into(),
            inner_groups: Vec::new(),
            field: field.into(),
            property,
        }
    }

    /// Places the declaration inside nested groups.
    #[must_use]
    pub fn within<I, S>(mut self, segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.inner_groups.extend(segments.into_iter().map(Into::into));
        self
    }

    /// Name of the top-level group.
    #[must_use]
    pub fn root_group(&self) -> &str {
        &self.root_group
    }

    /// Nested group segments below the root.
    #[must_use]
    pub fn inner_groups(&self) -> &[String] {
        &self.inner_groups
    }

    /// Field name within the innermost group.
    #[must_use]
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Full dotted group path.
    #[must_use]
    pub fn group_path(&self) -> GroupPath {
        GroupPath::new(&self.root_group, &self.inner_groups)
    }

    /// The declared property.
    #[must_use]
    pub fn property(&self) -> &Arc<dyn AnyProperty> {
        &self.property
    }
}

/// A named set of properties, possibly with nested groups.
///
/// # Examples
///
/// ```rust
/// use strata_config::{Group, Property};
///
/// let url = Property::string().build();
/// let size = Property::integer().default_value(10).build();
///
/// let group = Group::new("app.Database")
///     .property("URL", &url)
///     .nested(Group::new("Pool").property("SIZE", &size));
///
/// let paths: Vec<String> = group
///     .declarations()
///     .iter()
///     .map(|decl| format!("{}.{}", decl.group_path(), decl.field()))
///     .collect();
/// assert_eq!(paths, ["app.Database.URL", "app.Database.Pool.SIZE"]);
/// ```
#[derive(Debug, Clone)]
pub struct Group {
    name: String,
    properties: Vec<(String, Arc<dyn AnyProperty>)>,
    children: Vec<Group>,
}

impl Group {
    /// Creates an empty group.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Adds `property` under `field`.
    #[must_use]
    pub fn property<T: PropertyValue>(
        mut self,
        field: impl Into<String>,
        property: &Property<T>,
    ) -> Self {
        self.properties.push((field.into(), Arc::new(property.clone())));
        self
    }

    /// Adds a nested group.
    #[must_use]
    pub fn nested(mut self, child: Self) -> Self {
        self.children.push(child);
        self
    }

    /// Group name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Flattens the group depth-first, own properties before children.
    #[must_use]
    pub fn declarations(&self) -> Vec<PropertyDeclaration> {
        let mut out = Vec::new();
        self.collect(&self.name, &mut Vec::new(), &mut out);
        out
    }

    fn collect(&self, root: &str, path: &mut Vec<String>, out: &mut Vec<PropertyDeclaration>) {
        for (field, property) in &self.properties {
            out.push(
                PropertyDeclaration::from_erased(root, field.clone(), Arc::clone(property))
                    .within(path.iter().cloned()),
            );
        }
        for child in &self.children {
            path.push(child.name.clone());
            child.collect(root, path, out);
            path.pop();
        }
    }
}

/// Types that describe a group of properties.
///
/// Implementors usually keep their properties in `static` `LazyLock`s so
/// the same handles can be read back from the snapshot.
pub trait PropertyGroup {
    /// Builds the group declaration.
    fn group() -> Group;
}
