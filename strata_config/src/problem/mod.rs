//! Problems found while constructing a configuration.
//!
//! Problems fall into four kinds. Construction problems come from the
//! declarations themselves and stop construction before any loader runs.
//! Loader, value and requirement problems are gathered across the whole
//! load and reported together.

mod list;

use thiserror::Error;

pub use list::ProblemList;

use crate::group::GroupPath;
use crate::naming::NameProblem;

/// The four problem kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProblemKind {
    /// Invalid declarations.
    Construction,
    /// A loader could not read or interpret its source.
    Loader,
    /// A parsed value failed a validator.
    Value,
    /// A required property has no effective value.
    Requirement,
}

/// Defects in the declared set of properties.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConstructionProblem {
    /// The same property handle was declared twice.
    #[error("property `{name}` in group `{group}` is already registered as `{existing}`")]
    DuplicateProperty {
        /// Group of the rejected declaration.
        group: GroupPath,
        /// Name the rejected declaration would have had.
        name: String,
        /// Canonical name of the first registration.
        existing: String,
    },
    /// An inbound name is claimed by two properties.
    #[error("name `{name}` of `{canonical}` is already used by `{existing}`")]
    NonUniqueName {
        /// Colliding name.
        name: String,
        /// Property that tried to claim the name.
        canonical: String,
        /// Property that already owns the name.
        existing: String,
    },
    /// The naming strategy rejected a canonical name or alias.
    #[error("invalid name for field `{field}` in group `{group}`: {problem}")]
    InvalidName {
        /// Group of the declaration.
        group: GroupPath,
        /// Field name of the declaration.
        field: String,
        /// Why the name was rejected.
        problem: NameProblem,
    },
    /// A validator's own arguments are unusable.
    #[error("validator on `{canonical}` is misconfigured: {message}")]
    InvalidValidatorConfiguration {
        /// Property carrying the validator.
        canonical: String,
        /// Explanation from the validator.
        message: String,
    },
    /// The declared default fails a validator.
    #[error("default value `{value}` of `{canonical}` is invalid: {message}")]
    InvalidDefaultValue {
        /// Property with the bad default.
        canonical: String,
        /// Rendered default.
        value: String,
        /// Violation message.
        message: String,
    },
}

/// A loader failed to read its source or to interpret an entry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoaderProblem {
    /// Text could not be parsed as the property's type.
    #[error("{loader}: cannot parse `{raw}` for `{canonical}` (given as `{name}`): {message}")]
    UnparsableValue {
        /// Reporting loader.
        loader: String,
        /// Canonical name of the property.
        canonical: String,
        /// Group of the property.
        group: GroupPath,
        /// Name as written in the source.
        name: String,
        /// Text after trimming.
        raw: String,
        /// Parser message.
        message: String,
    },
    /// A name matched no registered property in a strict loader.
    #[error("{loader}: `{name}` is not a recognised property name")]
    UnrecognizedName {
        /// Reporting loader.
        loader: String,
        /// Unrecognised name.
        name: String,
    },
    /// One loader supplied the same property more than once.
    #[error("{loader}: `{canonical}` is given more than once (again as `{name}`)")]
    DuplicateEntry {
        /// Reporting loader.
        loader: String,
        /// Canonical name of the property.
        canonical: String,
        /// Group of the property.
        group: GroupPath,
        /// Name used by the repeated entry.
        name: String,
    },
    /// The source could not be read at all.
    #[error("{loader}: cannot read `{location}`: {message}")]
    SourceUnavailable {
        /// Reporting loader.
        loader: String,
        /// Path or other locator of the source.
        location: String,
        /// Underlying failure.
        message: String,
    },
    /// A programmatic value has the wrong type for its property.
    #[error("{loader}: value for `{canonical}` is not of type {expected}")]
    WrongValueType {
        /// Reporting loader.
        loader: String,
        /// Canonical name of the property.
        canonical: String,
        /// Group of the property.
        group: GroupPath,
        /// Expected type name.
        expected: String,
    },
}

/// A parsed value failed a validator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{loader}: value `{value}` for `{canonical}` {rule}: {message}")]
pub struct ValueProblem {
    /// Loader that supplied the value.
    pub loader: String,
    /// Canonical name of the property.
    pub canonical: String,
    /// Group of the property.
    pub group: GroupPath,
    /// Rendered value.
    pub value: String,
    /// Description of the failed rule.
    pub rule: String,
    /// Violation message.
    pub message: String,
}

/// A required property ended up without a value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("`{canonical}` in group `{group}` is required but has no value")]
pub struct RequirementProblem {
    /// Canonical name of the property.
    pub canonical: String,
    /// Group of the property.
    pub group: GroupPath,
}

/// Any problem reported during construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum Problem {
    /// See [`ConstructionProblem`].
    #[error(transparent)]
    Construction(#[from] ConstructionProblem),
    /// See [`LoaderProblem`].
    #[error(transparent)]
    Loader(#[from] LoaderProblem),
    /// See [`ValueProblem`].
    #[error(transparent)]
    Value(#[from] ValueProblem),
    /// See [`RequirementProblem`].
    #[error(transparent)]
    Requirement(#[from] RequirementProblem),
}

impl Problem {
    /// Kind of the problem.
    #[must_use]
    pub const fn kind(&self) -> ProblemKind {
        match self {
            Self::Construction(_) => ProblemKind::Construction,
            Self::Loader(_) => ProblemKind::Loader,
            Self::Value(_) => ProblemKind::Value,
            Self::Requirement(_) => ProblemKind::Requirement,
        }
    }
}
