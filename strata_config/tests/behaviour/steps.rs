//! Step definitions for the precedence and problem scenarios.

use std::sync::Arc;

use anyhow::{Result, anyhow, ensure};
use rstest_bdd_macros::{given, then, when};
use strata_config::{Group, Loader as _, ProblemKind, StrataBuilder};
use test_helpers::loaders::ScriptedLoader;

use crate::fixtures::{DemoProperties, StrataContext};

fn properties(strata_context: &StrataContext) -> Result<DemoProperties> {
    strata_context
        .properties
        .get()
        .ok_or_else(|| anyhow!("demo properties have not been declared"))
}

fn edit_loader(
    strata_context: &StrataContext,
    loader: &str,
    edit: impl FnOnce(ScriptedLoader) -> ScriptedLoader,
) {
    let mut loaders = strata_context.loaders.take().unwrap_or_default();
    match loaders.iter().position(|script| script.name() == loader) {
        Some(index) => {
            let script = loaders.remove(index);
            loaders.insert(index, edit(script));
        }
        None => loaders.push(edit(ScriptedLoader::new(loader))),
    }
    strata_context.loaders.set(loaders);
}

#[given("the demo properties are declared")]
fn declare(strata_context: &StrataContext) {
    strata_context.properties.set(DemoProperties::declare());
}

#[given("a second group also declares property A")]
fn duplicate(strata_context: &StrataContext) {
    strata_context.duplicate.set(());
}

#[given("loader {loader} supplies {name} as {value}")]
fn supplies(strata_context: &StrataContext, loader: String, name: String, value: String) {
    edit_loader(strata_context, &loader, |script| script.entry(name, value));
}

#[given("loader {loader} supplies the bare name {name}")]
fn supplies_bare(strata_context: &StrataContext, loader: String, name: String) {
    edit_loader(strata_context, &loader, |script| script.bare(name));
}

#[when("the configuration is constructed")]
fn construct(strata_context: &StrataContext) -> Result<()> {
    let demo = properties(strata_context)?;
    let mut builder = StrataBuilder::new().group(
        Group::new("demo")
            .property("A", &demo.a)
            .property("B", &demo.b)
            .property("C", &demo.c)
            .property("VERBOSE", &demo.verbose),
    );
    if !strata_context.duplicate.is_empty() {
        builder = builder.group(Group::new("other").property("A", &demo.a));
    }
    let loaders = strata_context.loaders.take().unwrap_or_default();
    strata_context
        .calls
        .set(loaders.iter().map(ScriptedLoader::calls).collect());
    for loader in loaders {
        builder = builder.loader(loader);
    }
    match builder.construct() {
        Ok(snapshot) => strata_context.snapshot.set(Arc::new(snapshot)),
        Err(err) => strata_context.error.set(err),
    }
    Ok(())
}

fn snapshot_check<T>(
    strata_context: &StrataContext,
    check: impl FnOnce(&strata_config::Snapshot, &DemoProperties) -> T,
) -> Result<T> {
    let demo = properties(strata_context)?;
    strata_context
        .snapshot
        .with_ref(|snapshot| check(snapshot, &demo))
        .ok_or_else(|| {
            let reason = strata_context
                .error
                .with_ref(ToString::to_string)
                .unwrap_or_default();
            anyhow!("no snapshot was constructed: {reason}")
        })
}

#[then("property A has value {value:i64}")]
fn a_has_value(strata_context: &StrataContext, value: i64) -> Result<()> {
    let actual = snapshot_check(strata_context, |snapshot, demo| snapshot.get(&demo.a))?;
    ensure!(actual == Some(value), "expected A = {value}, got {actual:?}");
    Ok(())
}

#[then("property B has value {value}")]
fn b_has_value(strata_context: &StrataContext, value: String) -> Result<()> {
    let actual = snapshot_check(strata_context, |snapshot, demo| snapshot.get(&demo.b))?;
    ensure!(
        actual.as_deref() == Some(value.as_str()),
        "expected B = {value}, got {actual:?}"
    );
    Ok(())
}

#[then("property B was set explicitly")]
fn b_explicit(strata_context: &StrataContext) -> Result<()> {
    let explicit = snapshot_check(strata_context, |snapshot, demo| {
        snapshot.is_explicitly_set(&demo.b)
    })?;
    ensure!(explicit, "B should have been set by a loader");
    Ok(())
}

#[then("property B fell back to its default")]
fn b_default(strata_context: &StrataContext) -> Result<()> {
    let explicit = snapshot_check(strata_context, |snapshot, demo| {
        snapshot.is_explicitly_set(&demo.b)
    })?;
    ensure!(!explicit, "B should not have been set by a loader");
    Ok(())
}

#[then("property A came from {loader}")]
fn a_source(strata_context: &StrataContext, loader: String) -> Result<()> {
    let source = snapshot_check(strata_context, |snapshot, demo| {
        snapshot.source_of(&demo.a).map(ToOwned::to_owned)
    })?;
    ensure!(
        source.as_deref() == Some(loader.as_str()),
        "expected A from {loader}, got {source:?}"
    );
    Ok(())
}

#[then("{count:usize} later value was discarded")]
fn discarded(strata_context: &StrataContext, count: usize) -> Result<()> {
    let actual = snapshot_check(strata_context, |snapshot, _| snapshot.overridden().len())?;
    ensure!(actual == count, "expected {count} discarded values, got {actual}");
    Ok(())
}

#[then("the verbose flag is on")]
fn verbose_on(strata_context: &StrataContext) -> Result<()> {
    let verbose = snapshot_check(strata_context, |snapshot, demo| snapshot.get(&demo.verbose))?;
    ensure!(verbose == Some(true), "expected the flag on, got {verbose:?}");
    Ok(())
}

#[then("the verbose flag is off")]
fn verbose_off(strata_context: &StrataContext) -> Result<()> {
    let verbose = snapshot_check(strata_context, |snapshot, demo| snapshot.get(&demo.verbose))?;
    ensure!(verbose == Some(false), "expected the flag off, got {verbose:?}");
    Ok(())
}

#[then("construction fails with {count:usize} problems")]
fn fails_with(strata_context: &StrataContext, count: usize) -> Result<()> {
    let actual = strata_context
        .error
        .with_ref(|err| err.problems().map(strata_config::ProblemList::len))
        .ok_or_else(|| anyhow!("construction unexpectedly succeeded"))?;
    ensure!(actual == Some(count), "expected {count} problems, got {actual:?}");
    Ok(())
}

#[then("there is {count:usize} {kind} problem")]
fn problems_of_kind(strata_context: &StrataContext, count: usize, kind: String) -> Result<()> {
    let wanted = match kind.as_str() {
        "construction" => ProblemKind::Construction,
        "loader" => ProblemKind::Loader,
        "value" => ProblemKind::Value,
        "requirement" => ProblemKind::Requirement,
        other => return Err(anyhow!("unknown problem kind '{other}'")),
    };
    let actual = strata_context
        .error
        .with_ref(|err| err.problems().map_or(0, |problems| problems.count(wanted)))
        .ok_or_else(|| anyhow!("construction unexpectedly succeeded"))?;
    ensure!(actual == count, "expected {count} {kind} problems, got {actual}");
    Ok(())
}

#[then("no loader ran")]
fn no_loader_ran(strata_context: &StrataContext) -> Result<()> {
    let calls = strata_context.calls.get().unwrap_or_default();
    ensure!(
        calls.iter().all(|counter| counter.count() == 0),
        "loaders ran after construction problems"
    );
    Ok(())
}
