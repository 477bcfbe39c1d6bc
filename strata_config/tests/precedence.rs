//! Integration tests for loader ordering and provenance.
//!
//! Loaders are scripted so the tests exercise the engine's fold without
//! touching the environment or the filesystem.

use anyhow::{Result, anyhow, ensure};
use rstest::{fixture, rstest};
use serde_json::json;
use strata_config::problem::LoaderProblem;
use strata_config::{FixedValueLoader, Group, Problem, Property, StrataBuilder, StrataError};
use test_helpers::loaders::ScriptedLoader;

struct Service {
    name: Property<String>,
    port: Property<i64>,
    verbose: Property<bool>,
}

#[fixture]
fn service() -> Service {
    Service {
        name: Property::string()
            .default_value("svc")
            .outbound_alias("SERVICE_NAME")
            .build(),
        port: Property::integer().alias("PORT").required().build(),
        verbose: Property::flag().build(),
    }
}

fn builder(service: &Service) -> StrataBuilder {
    StrataBuilder::new().group(
        Group::new("svc")
            .property("NAME", &service.name)
            .property("PORT", &service.port)
            .property("VERBOSE", &service.verbose),
    )
}

#[rstest]
fn loaders_run_once_in_order_and_see_earlier_values(service: Service) -> Result<()> {
    let first = ScriptedLoader::new("first").entry("PORT", "1");
    let second = ScriptedLoader::new("second").entry("svc.NAME", "api");
    let third = ScriptedLoader::new("third").entry("svc.port", "3");

    let snapshot = builder(&service)
        .loader(first.clone())
        .loader(second.clone())
        .loader(third.clone())
        .construct()?;

    for script in [&first, &second, &third] {
        ensure!(script.calls().count() == 1, "each loader runs exactly once");
    }
    ensure!(
        third.observed() == vec![vec![String::from("svc.NAME"), String::from("svc.PORT")]],
        "third loader saw {:?}",
        third.observed()
    );
    ensure!(snapshot.get(&service.port) == Some(1));
    ensure!(snapshot.source_of(&service.port) == Some("first"));
    let assignment = snapshot
        .assignment(&service.port)
        .ok_or_else(|| anyhow!("port assignment missing"))?;
    ensure!(assignment.name == "PORT", "alias used by the winning loader");
    Ok(())
}

#[rstest]
fn forced_values_beat_everything_after_them(service: Service) -> Result<()> {
    let snapshot = builder(&service)
        .loader(FixedValueLoader::new().fix(&service.port, 9000))
        .loader(ScriptedLoader::new("args").entry("svc.PORT", "1"))
        .construct()?;

    ensure!(snapshot.get(&service.port) == Some(9000));
    let [discarded] = snapshot.overridden() else {
        return Err(anyhow!("expected one override"));
    };
    ensure!(discarded.kept_from == "fixed values");
    ensure!(discarded.value.rendered() == "1");
    Ok(())
}

#[rstest]
#[case(ScriptedLoader::new("flags").bare("svc.VERBOSE"), Some(true))]
#[case(ScriptedLoader::new("flags").entry("svc.VERBOSE", "no"), Some(false))]
#[case(ScriptedLoader::new("flags"), Some(false))]
fn flag_semantics(
    service: Service,
    #[case] flags: ScriptedLoader,
    #[case] expected: Option<bool>,
) -> Result<()> {
    let snapshot = builder(&service)
        .loader(ScriptedLoader::new("base").entry("svc.PORT", "1"))
        .loader(flags)
        .construct()?;
    ensure!(snapshot.get(&service.verbose) == expected);
    Ok(())
}

#[rstest]
fn untrimmed_loaders_keep_whitespace(service: Service) -> Result<()> {
    let snapshot = builder(&service)
        .loader(ScriptedLoader::new("base").entry("svc.PORT", " 1 "))
        .loader(
            ScriptedLoader::new("raw")
                .trimming(false)
                .entry("svc.NAME", "  padded  "),
        )
        .construct()?;
    ensure!(snapshot.get(&service.port) == Some(1));
    ensure!(snapshot.get(&service.name).as_deref() == Some("  padded  "));
    Ok(())
}

#[rstest]
#[case(false)]
#[case(true)]
fn custom_loaders_choose_how_unknown_names_are_treated(
    service: Service,
    #[case] strict: bool,
) -> Result<()> {
    let custom = ScriptedLoader::new("custom")
        .strict(strict)
        .entry("svc.PORT", "1")
        .entry("svc.NOPE", "2");
    let outcome = builder(&service).loader(custom).construct();

    if !strict {
        ensure!(outcome?.get(&service.port) == Some(1));
        return Ok(());
    }
    let Err(StrataError::LoadFailed(problems)) = outcome else {
        return Err(anyhow!("a strict loader should reject `svc.NOPE`"));
    };
    ensure!(
        matches!(
            problems.iter().collect::<Vec<_>>().as_slice(),
            [Problem::Loader(LoaderProblem::UnrecognizedName { loader, name })]
                if loader == "custom" && name == "svc.NOPE"
        ),
        "{problems}"
    );
    Ok(())
}

#[rstest]
fn export_uses_outbound_names(service: Service) -> Result<()> {
    let snapshot = builder(&service)
        .loader(ScriptedLoader::new("base").entry("svc.PORT", "80"))
        .construct()?;
    ensure!(
        snapshot.to_json()
            == json!({
                "svc.NAME": "svc",
                "SERVICE_NAME": "svc",
                "svc.PORT": "80",
                "PORT": "80",
                "svc.VERBOSE": "false",
            }),
        "unexpected export {}",
        snapshot.to_json()
    );
    Ok(())
}
