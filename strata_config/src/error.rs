//! Error type returned by configuration construction.

use thiserror::Error;

use crate::problem::ProblemList;

/// Errors returned when building a [`crate::Snapshot`].
#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum StrataError {
    /// The declarations are invalid; no loader was run.
    #[error("invalid property declarations ({n} problem(s)):\n{0}", n = .0.len())]
    ConstructionFailed(ProblemList),

    /// Loading finished with problems; no snapshot was produced.
    #[error("configuration could not be loaded ({n} problem(s)):\n{0}", n = .0.len())]
    LoadFailed(ProblemList),

    /// Another thread is constructing the process-wide configuration.
    #[error("configuration construction is already in progress")]
    ConstructionInProgress,

    /// The process-wide configuration has already been constructed.
    #[error("configuration has already been constructed")]
    AlreadyConstructed,
}

impl StrataError {
    /// Problems carried by the error; `None` for the concurrency errors.
    #[must_use]
    pub fn problems(&self) -> Option<&ProblemList> {
        match self {
            Self::ConstructionFailed(problems) | Self::LoadFailed(problems) => Some(problems),
            Self::ConstructionInProgress | Self::AlreadyConstructed => None,
        }
    }
}

/// Convenience alias for results in this crate.
pub type StrataResult<T> = Result<T, StrataError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::{Problem, RequirementProblem};
    use crate::GroupPath;

    #[test]
    fn display_lists_problems() {
        let problems = ProblemList::new(vec![Problem::from(RequirementProblem {
            canonical: String::from("a.B"),
            group: GroupPath::new("a", Vec::<String>::new()),
        })]);
        let err = StrataError::LoadFailed(problems);
        assert_eq!(
            err.to_string(),
            "configuration could not be loaded (1 problem(s)):\n\
             1: `a.B` in group `a` is required but has no value"
        );
        assert_eq!(err.problems().map(ProblemList::len), Some(1));
        assert!(StrataError::AlreadyConstructed.problems().is_none());
    }
}
