//! Ordered collection of problems from a single construction attempt.

use std::fmt;

use super::{Problem, ProblemKind};

/// Problems in the order they were found.
///
/// # Examples
///
/// ```
/// use strata_config::ProblemKind;
/// use strata_config::problem::{LoaderProblem, ProblemList};
///
/// let problems: ProblemList = [LoaderProblem::UnrecognizedName {
///     loader: "args".into(),
///     name: "colour".into(),
/// }]
/// .into_iter()
/// .map(Into::into)
/// .collect();
/// assert_eq!(problems.len(), 1);
/// assert_eq!(problems.count(ProblemKind::Loader), 1);
/// assert!(problems.to_string().starts_with("1: args:"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProblemList(Vec<Problem>);

impl ProblemList {
    /// Creates a list from problems already gathered.
    #[must_use]
    pub const fn new(problems: Vec<Problem>) -> Self {
        Self(problems)
    }

    /// Appends a problem.
    pub fn push(&mut self, problem: impl Into<Problem>) {
        self.0.push(problem.into());
    }

    /// Iterates over the problems.
    #[must_use = "iterators should be consumed to inspect problems"]
    pub fn iter(&self) -> std::slice::Iter<'_, Problem> {
        self.0.iter()
    }

    /// Number of problems.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no problem was recorded.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of problems of `kind`.
    #[must_use]
    pub fn count(&self, kind: ProblemKind) -> usize {
        self.0.iter().filter(|problem| problem.kind() == kind).count()
    }

    /// Problems of `kind`, in order.
    pub fn of_kind(&self, kind: ProblemKind) -> impl Iterator<Item = &Problem> {
        self.0.iter().filter(move |problem| problem.kind() == kind)
    }
}

impl fmt::Display for ProblemList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, problem) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}: {problem}", i + 1)?;
        }
        Ok(())
    }
}

impl Extend<Problem> for ProblemList {
    fn extend<I: IntoIterator<Item = Problem>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

impl FromIterator<Problem> for ProblemList {
    fn from_iter<I: IntoIterator<Item = Problem>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a ProblemList {
    type Item = &'a Problem;
    type IntoIter = std::slice::Iter<'a, Problem>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl IntoIterator for ProblemList {
    type Item = Problem;
    type IntoIter = std::vec::IntoIter<Problem>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
