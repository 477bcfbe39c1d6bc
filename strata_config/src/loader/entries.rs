//! Shared pipeline turning raw name/value entries into loaded values.
//!
//! Text-based loaders only enumerate their source as [`RawEntry`] items;
//! name resolution, trimming, flag handling, parsing, validation and
//! duplicate detection live here.

use std::collections::HashSet;

use tracing::debug;

use super::{LoadedValue, Loader, LoaderValues};
use crate::problem::{LoaderProblem, ValueProblem};
use crate::property::PropertyId;
use crate::registry::{RegisteredProperty, Registry};
use crate::value::Value;

/// A name with an optional raw value, as read from a source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEntry {
    /// Name as written in the source.
    pub name: String,
    /// Text after the separator; `None` when the entry is a bare name.
    pub value: Option<String>,
}

impl RawEntry {
    /// Creates an entry.
    #[must_use]
    pub fn new(name: impl Into<String>, value: Option<String>) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }

    /// A bare name without a value.
    #[must_use]
    pub fn present(name: impl Into<String>) -> Self {
        Self::new(name, None)
    }

    /// A name with a value.
    #[must_use]
    pub fn with_value(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(name, Some(value.into()))
    }
}

/// Accumulates the entries of one loader run.
#[derive(Debug)]
pub struct EntryCollector<'r> {
    registry: &'r Registry,
    trim: bool,
    strict: bool,
    seen: HashSet<PropertyId>,
    values: LoaderValues,
}

impl<'r> EntryCollector<'r> {
    /// Starts a collector using the loader's name and policies.
    #[must_use]
    pub fn new(loader: &(impl Loader + ?Sized), registry: &'r Registry) -> Self {
        Self {
            registry,
            trim: loader.requires_trimming(),
            strict: loader.treats_unrecognized_name_as_fatal(),
            seen: HashSet::new(),
            values: LoaderValues::new(loader.name()),
        }
    }

    /// Overrides the loader's trimming policy for this run.
    #[must_use]
    pub const fn trimming(mut self, trim: bool) -> Self {
        self.trim = trim;
        self
    }

    /// Resolves the entry's name through the registry, then processes it.
    pub fn offer(&mut self, entry: RawEntry) {
        let registry = self.registry;
        let Some(registered) = registry.resolve(&entry.name) else {
            self.unrecognized(&entry.name);
            return;
        };
        self.offer_resolved(registered, entry);
    }

    /// Processes an entry whose property the loader resolved itself.
    pub fn offer_resolved(&mut self, registered: &RegisteredProperty, entry: RawEntry) {
        let property = registered.property();
        let trimmed = match entry.value {
            Some(raw) if self.trim => property.trimmer().trim(&raw),
            other => other,
        };

        // A flag given without a usable value is switched on.
        let text = match trimmed {
            Some(value) if !property.is_flag() || !value.trim().is_empty() => Some(value),
            _ if property.is_flag() => None,
            _ => {
                debug!(
                    loader = self.values.loader(),
                    name = %entry.name,
                    "entry has no value; property left unset"
                );
                return;
            }
        };

        if !self.mark_seen(registered, &entry.name) {
            return;
        }

        let value = match property.parse_value(text.as_deref().unwrap_or("true")) {
            Ok(value) => value,
            Err(err) => {
                self.values.push_problem(LoaderProblem::UnparsableValue {
                    loader: self.values.loader().to_owned(),
                    canonical: registered.canonical_name().to_owned(),
                    group: registered.group().clone(),
                    name: entry.name,
                    raw: text.unwrap_or_default(),
                    message: err.message().to_owned(),
                });
                return;
            }
        };

        self.accept(registered, entry.name, text, value);
    }

    /// Processes an already typed value, skipping trimming and parsing.
    pub fn offer_value(&mut self, registered: &RegisteredProperty, name: &str, value: Value) {
        if !registered.property().accepts(&value) {
            self.values.push_problem(LoaderProblem::WrongValueType {
                loader: self.values.loader().to_owned(),
                canonical: registered.canonical_name().to_owned(),
                group: registered.group().clone(),
                expected: registered.property().type_name().to_owned(),
            });
            return;
        }
        if self.mark_seen(registered, name) {
            self.accept(registered, name.to_owned(), None, value);
        }
    }

    fn mark_seen(&mut self, registered: &RegisteredProperty, name: &str) -> bool {
        let first = self.seen.insert(registered.id());
        if !first {
            self.values.push_problem(LoaderProblem::DuplicateEntry {
                loader: self.values.loader().to_owned(),
                canonical: registered.canonical_name().to_owned(),
                group: registered.group().clone(),
                name: name.to_owned(),
            });
        }
        first
    }

    fn accept(
        &mut self,
        registered: &RegisteredProperty,
        name: String,
        raw: Option<String>,
        value: Value,
    ) {
        let violations = registered.property().violations(&value);
        if violations.is_empty() {
            self.values.push_value(LoadedValue {
                property: registered.id(),
                name,
                raw,
                value,
            });
            return;
        }
        for violation in violations {
            self.values.push_problem(ValueProblem {
                loader: self.values.loader().to_owned(),
                canonical: registered.canonical_name().to_owned(),
                group: registered.group().clone(),
                value: value.rendered().to_owned(),
                rule: violation.rule,
                message: violation.message,
            });
        }
    }

    /// Records a name that matched nothing.
    pub fn unrecognized(&mut self, name: &str) {
        if self.strict {
            self.values.push_problem(LoaderProblem::UnrecognizedName {
                loader: self.values.loader().to_owned(),
                name: name.to_owned(),
            });
        } else {
            debug!(loader = self.values.loader(), name, "ignoring unrecognised name");
        }
    }

    /// Records a problem found outside the entry pipeline.
    pub fn problem(&mut self, problem: impl Into<crate::problem::Problem>) {
        self.values.push_problem(problem);
    }

    /// Finishes the run.
    #[must_use]
    pub fn finish(self) -> LoaderValues {
        self.values
    }
}

/// Runs `entries` through the shared pipeline for `loader`.
pub fn collect_entries<I>(
    loader: &(impl Loader + ?Sized),
    registry: &Registry,
    entries: I,
) -> LoaderValues
where
    I: IntoIterator<Item = RawEntry>,
{
    let mut collector = EntryCollector::new(loader, registry);
    for entry in entries {
        collector.offer(entry);
    }
    collector.finish()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rstest::{fixture, rstest};

    use super::*;
    use crate::naming::DottedNaming;
    use crate::problem::{Problem, ProblemKind};
    use crate::property::Property;
    use crate::{Group, LoadContext};

    struct TestLoader {
        trims: bool,
        strict: bool,
    }

    impl Loader for TestLoader {
        fn name(&self) -> &str {
            "test"
        }

        fn load(&self, _registry: &Registry, _context: &LoadContext<'_>) -> LoaderValues {
            LoaderValues::new(self.name())
        }

        fn requires_trimming(&self) -> bool {
            self.trims
        }

        fn treats_unrecognized_name_as_fatal(&self) -> bool {
            self.strict
        }
    }

    struct Fixture {
        registry: Registry,
        port: Property<i64>,
        name: Property<String>,
        verbose: Property<bool>,
    }

    #[fixture]
    fn fixture() -> Fixture {
        let port = Property::integer().alias("PORT").greater_than(0).build();
        let name = Property::string().build();
        let verbose = Property::flag().build();
        let registry = Registry::build(
            Group::new("app")
                .property("PORT", &port)
                .property("NAME", &name)
                .property("VERBOSE", &verbose)
                .declarations(),
            Arc::new(DottedNaming),
        )
        .expect("valid declarations");
        Fixture {
            registry,
            port,
            name,
            verbose,
        }
    }

    fn run(loader: &TestLoader, registry: &Registry, entries: Vec<RawEntry>) -> LoaderValues {
        collect_entries(loader, registry, entries)
    }

    const LENIENT: TestLoader = TestLoader {
        trims: true,
        strict: false,
    };

    #[rstest]
    fn trims_and_parses(fixture: Fixture) {
        let values = run(
            &LENIENT,
            &fixture.registry,
            vec![
                RawEntry::with_value("app.port", " 8080 "),
                RawEntry::with_value("APP.NAME", "  \"a b\"  "),
            ],
        );
        assert!(values.problems().is_empty(), "{}", values.problems());
        let loaded: Vec<(PropertyId, &str)> = values
            .values()
            .iter()
            .map(|value| (value.property, value.value.rendered()))
            .collect();
        assert_eq!(
            loaded,
            vec![(fixture.port.id(), "8080"), (fixture.name.id(), "a b")]
        );
    }

    #[rstest]
    #[case(RawEntry::present("app.VERBOSE"), true)]
    #[case(RawEntry::with_value("app.VERBOSE", "   "), true)]
    #[case(RawEntry::with_value("app.VERBOSE", "off"), false)]
    fn flags_accept_bare_entries(fixture: Fixture, #[case] entry: RawEntry, #[case] expected: bool) {
        let values = run(&LENIENT, &fixture.registry, vec![entry]);
        let value = values.values().first().expect("flag set");
        assert_eq!(fixture.verbose.cast(&value.value), Some(expected));
    }

    #[rstest]
    fn bare_entry_leaves_other_types_unset(fixture: Fixture) {
        let values = run(&LENIENT, &fixture.registry, vec![RawEntry::present("app.PORT")]);
        assert!(values.values().is_empty());
        assert!(values.problems().is_empty());
    }

    #[rstest]
    fn untrimmed_text_reaches_the_parser(fixture: Fixture) {
        let raw = TestLoader {
            trims: false,
            strict: true,
        };
        let values = run(&raw, &fixture.registry, vec![RawEntry::with_value("PORT", " 1")]);
        assert!(matches!(
            values.problems().iter().next(),
            Some(Problem::Loader(LoaderProblem::UnparsableValue { raw, .. })) if raw == " 1"
        ));
    }

    #[rstest]
    fn reports_parse_validation_and_duplicates(fixture: Fixture) {
        let values = run(
            &LENIENT,
            &fixture.registry,
            vec![
                RawEntry::with_value("app.PORT", "-1"),
                RawEntry::with_value("app.NAME", "x"),
                RawEntry::with_value("app.name", "y"),
                RawEntry::with_value("app.VERBOSE", "maybe"),
            ],
        );
        let problems = values.problems();
        assert_eq!(problems.count(ProblemKind::Value), 1);
        assert_eq!(problems.count(ProblemKind::Loader), 2);
        assert_eq!(values.values().len(), 1);
    }

    #[rstest]
    fn problems_carry_the_property_group(fixture: Fixture) {
        let values = run(
            &LENIENT,
            &fixture.registry,
            vec![
                RawEntry::with_value("app.PORT", "0"),
                RawEntry::with_value("app.VERBOSE", "maybe"),
                RawEntry::with_value("app.NAME", "x"),
                RawEntry::with_value("app.NAME", "y"),
            ],
        );
        let groups: Vec<&str> = values
            .problems()
            .iter()
            .map(|problem| match problem {
                Problem::Value(ValueProblem { group, .. })
                | Problem::Loader(
                    LoaderProblem::UnparsableValue { group, .. }
                    | LoaderProblem::DuplicateEntry { group, .. },
                ) => group.as_str(),
                other => panic!("unexpected problem {other}"),
            })
            .collect();
        assert_eq!(groups, vec!["app", "app", "app"]);
    }

    #[rstest]
    #[case(false, 0)]
    #[case(true, 1)]
    fn unknown_names_follow_policy(fixture: Fixture, #[case] strict: bool, #[case] expected: usize) {
        let loader = TestLoader { trims: true, strict };
        let values = run(&loader, &fixture.registry, vec![RawEntry::with_value("nope", "1")]);
        assert_eq!(values.problems().len(), expected);
    }
}
