//! Tests for registry construction.

use std::sync::Arc;

use rstest::{fixture, rstest};

use super::*;
use crate::naming::DottedNaming;
use crate::problem::Problem;
use crate::property::Property;
use crate::{Group, ProblemKind};

#[fixture]
fn naming() -> Arc<dyn NamingStrategy> {
    Arc::new(DottedNaming)
}

fn construction(problems: &ProblemList) -> Vec<&ConstructionProblem> {
    problems
        .iter()
        .filter_map(|problem| match problem {
            Problem::Construction(inner) => Some(inner),
            _ => None,
        })
        .collect()
}

#[rstest]
fn indexes_names_and_groups(naming: Arc<dyn NamingStrategy>) {
    let url = Property::string().alias("DB_URL").build();
    let size = Property::integer().default_value(4).build();
    let debug = Property::flag().build();
    let declarations = Group::new("app.Db")
        .property("URL", &url)
        .property("SIZE", &size)
        .declarations()
        .into_iter()
        .chain(Group::new("app.Log").property("DEBUG", &debug).declarations());

    let registry = Registry::build(declarations, naming).expect("valid declarations");

    assert_eq!(registry.len(), 3);
    assert_eq!(registry.canonical_name(&url), Some("app.Db.URL"));
    assert_eq!(registry.resolve("APP.DB.url").map(RegisteredProperty::id), Some(url.id()));
    assert_eq!(registry.resolve("db_url").map(RegisteredProperty::id), Some(url.id()));
    assert!(registry.resolve("app.Db.MISSING").is_none());
    assert_eq!(
        registry.groups().map(GroupPath::as_str).collect::<Vec<_>>(),
        vec!["app.Db", "app.Log"]
    );
    let db = GroupPath::new("app.Db", Vec::<String>::new());
    assert_eq!(
        registry
            .properties_in(&db)
            .map(RegisteredProperty::field)
            .collect::<Vec<_>>(),
        vec!["URL", "SIZE"]
    );
    assert_eq!(registry.group_of(&debug).map(GroupPath::as_str), Some("app.Log"));
}

#[rstest]
fn same_handle_twice_is_a_duplicate(naming: Arc<dyn NamingStrategy>) {
    let port = Property::integer().build();
    let declarations = Group::new("a")
        .property("PORT", &port)
        .property("OTHER_PORT", &port)
        .declarations();

    let problems = Registry::build(declarations, naming).expect_err("duplicate handle");

    assert_eq!(problems.len(), 1);
    assert!(matches!(
        construction(&problems).as_slice(),
        [ConstructionProblem::DuplicateProperty { name, existing, .. }]
            if name == "a.OTHER_PORT" && existing == "a.PORT"
    ));
}

#[rstest]
fn alias_collision_names_both_properties(naming: Arc<dyn NamingStrategy>) {
    let first = Property::integer().alias("PORT").build();
    let second = Property::integer().inbound_alias("port").build();
    let declarations = Group::new("a")
        .property("HTTP", &first)
        .property("ADMIN", &second)
        .declarations();

    let problems = Registry::build(declarations, naming).expect_err("colliding alias");

    assert!(matches!(
        construction(&problems).as_slice(),
        [ConstructionProblem::NonUniqueName { name, canonical, existing }]
            if name == "port" && canonical == "a.ADMIN" && existing == "a.HTTP"
    ));
}

#[rstest]
fn canonical_clash_across_case(naming: Arc<dyn NamingStrategy>) {
    let upper = Property::string().build();
    let lower = Property::string().build();
    let declarations = vec![
        PropertyDeclaration::new("svc", "NAME", &upper),
        PropertyDeclaration::new("SVC", "name", &lower),
    ];

    let problems = Registry::build(declarations, naming).expect_err("names clash");

    assert_eq!(problems.count(ProblemKind::Construction), 1);
}

#[rstest]
fn names_sharing_an_environment_spelling_clash(naming: Arc<dyn NamingStrategy>) {
    let underscored = Property::integer().build();
    let dotted = Property::integer().build();
    let declarations = Group::new("app")
        .property("b_c", &underscored)
        .nested(Group::new("b").property("c", &dotted))
        .declarations();

    let problems = Registry::build(declarations, naming).expect_err("APP_B_C is ambiguous");

    assert!(matches!(
        construction(&problems).as_slice(),
        [ConstructionProblem::NonUniqueName { name, canonical, existing }]
            if name == "app.b.c" && canonical == "app.b.c" && existing == "app.b_c"
    ));
}

#[rstest]
fn alias_spelled_like_another_canonical_clashes(naming: Arc<dyn NamingStrategy>) {
    let port = Property::integer().build();
    let admin = Property::integer().inbound_alias("APP_PORT").build();
    let declarations = Group::new("app")
        .property("PORT", &port)
        .property("ADMIN", &admin)
        .declarations();

    let problems = Registry::build(declarations, naming).expect_err("APP_PORT is ambiguous");

    assert!(matches!(
        construction(&problems).as_slice(),
        [ConstructionProblem::NonUniqueName { name, existing, .. }]
            if name == "APP_PORT" && existing == "app.PORT"
    ));
}

#[rstest]
fn own_alias_may_share_the_environment_spelling(naming: Arc<dyn NamingStrategy>) {
    let port = Property::integer().inbound_alias("APP_PORT").build();
    let registry = Registry::build(
        Group::new("app").property("PORT", &port).declarations(),
        naming,
    )
    .expect("one property owns both names");
    assert_eq!(
        registry.resolve_env("app_port").map(RegisteredProperty::id),
        Some(port.id())
    );
    assert!(registry.resolve_env("APP_OTHER").is_none());
}

#[rstest]
fn reports_every_problem_in_one_pass(naming: Arc<dyn NamingStrategy>) {
    let bad_name = Property::string().build();
    let bad_validator = Property::integer().between(9, 1).build();
    let bad_default = Property::integer().default_value(0).greater_than(0).build();
    let fine = Property::string().build();
    let declarations = Group::new("x")
        .property("BAD NAME", &bad_name)
        .property("RANGE", &bad_validator)
        .property("DEFAULT", &bad_default)
        .property("FINE", &fine)
        .declarations();

    let problems = Registry::build(declarations, naming).expect_err("three problems");

    let found = construction(&problems);
    assert_eq!(found.len(), 3);
    assert!(matches!(found.first(), Some(ConstructionProblem::InvalidName { .. })));
    assert!(matches!(
        found.get(1),
        Some(ConstructionProblem::InvalidValidatorConfiguration { canonical, .. })
            if canonical == "x.RANGE"
    ));
    assert!(matches!(
        found.get(2),
        Some(ConstructionProblem::InvalidDefaultValue { canonical, value, .. })
            if canonical == "x.DEFAULT" && value == "0"
    ));
}

#[rstest]
fn null_default_is_not_validated(naming: Arc<dyn NamingStrategy>) {
    let name = Property::string().not_empty().max_length(3).build();
    let registry = Registry::build(
        Group::new("x").property("NAME", &name).declarations(),
        naming,
    )
    .expect("null default bypasses validators");
    assert!(registry.contains(&name));
}

#[rstest]
fn empty_registry_is_valid(naming: Arc<dyn NamingStrategy>) {
    let registry = Registry::build(Vec::new(), naming).expect("nothing to register");
    assert!(registry.is_empty());
    assert_eq!(registry.groups().count(), 0);
}
