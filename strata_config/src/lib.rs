//! Core crate for the `strata-config` configuration engine.
//!
//! Applications declare typed [`Property`] values, group them under dotted
//! namespaces with [`Group`], and hand the declarations to a
//! [`StrataBuilder`] together with an ordered list of [`Loader`]s. A single
//! construction pass builds the [`Registry`], runs every loader once in
//! order and either freezes an immutable [`Snapshot`] or fails with one
//! [`StrataError`] listing every problem found.
//!
//! ```rust
//! use strata_config::{ArgsLoader, Group, Property, StrataBuilder};
//!
//! let port = Property::integer().default_value(8080).between(1, 65_535).build();
//! let host = Property::string().required().build();
//!
//! let snapshot = StrataBuilder::new()
//!     .group(
//!         Group::new("demo.Server")
//!             .property("PORT", &port)
//!             .property("HOST", &host),
//!     )
//!     .loader(ArgsLoader::new(["demo.server.host=example.org"]))
//!     .construct()?;
//!
//! assert_eq!(snapshot.get(&host).as_deref(), Some("example.org"));
//! assert_eq!(snapshot.get(&port), Some(8080));
//! assert!(!snapshot.is_explicitly_set(&port));
//! # Ok::<_, strata_config::StrataError>(())
//! ```
//!
//! Loader precedence is "first writer wins": the earliest loader in the list
//! that supplies a property decides its value. Later assignments are kept as
//! [`Override`] records on the snapshot for diagnostics only.

pub mod docs;
mod engine;
mod error;
pub mod global;
mod group;
pub mod loader;
pub mod naming;
pub mod problem;
pub mod property;
mod registry;
mod snapshot;
pub mod validator;
mod value;

pub use engine::StrataBuilder;
pub use error::{StrataError, StrataResult};
pub use group::{Group, GroupPath, PropertyDeclaration, PropertyGroup};
pub use loader::{
    ArgsLoader, EnvLoader, FileFormat, FileLoader, FixedValueLoader, LoadContext, LoadedValue,
    Loader, LoaderValues, MapLoader, RawEntry,
};
pub use naming::{Alias, DottedNaming, NamingStrategy, ResolvedName};
pub use problem::{Problem, ProblemKind, ProblemList};
pub use property::{
    AnyProperty, ParseError, Property, PropertyBuilder, PropertyId, PropertyKey, Trimmer,
    TypeSpec, Violation,
};
pub use registry::{RegisteredProperty, Registry};
pub use snapshot::{Assignment, Override, Snapshot};
pub use validator::Validator;
pub use value::{PropertyValue, Value};
