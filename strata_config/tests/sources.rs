//! Integration tests for the environment and file loaders.
//!
//! Each configuration is constructed inside a `figment::Jail` with an empty
//! environment and a scratch working directory for files.

use anyhow::{Result, anyhow, ensure};
use camino::Utf8PathBuf;
use rstest::rstest;
use strata_config::{
    ArgsLoader, EnvLoader, FileLoader, FixedValueLoader, Group, MapLoader, ProblemKind, Property,
    StrataBuilder,
};
use test_helpers::jail::{construct_in_jail, jail_path};

#[rstest]
fn environment_variables_match_case_insensitively() -> Result<()> {
    let port = Property::integer().build();
    let hosts = Property::list().build();
    let snapshot = construct_in_jail(|jail| {
        jail.set_env("SRC_APP_PORT", "8080");
        jail.set_env("src_app_hosts", "a, b ,c");
        jail.set_env("SRC_UNKNOWN", "ignored");
        Ok(StrataBuilder::new()
            .group(Group::new("app").property("PORT", &port).property("HOSTS", &hosts))
            .loader(EnvLoader::prefixed("SRC_")))
    })??;
    ensure!(snapshot.get(&port) == Some(8080));
    ensure!(
        snapshot.get(&hosts) == Some(vec![String::from("a"), String::from("b"), String::from("c")]),
        "hosts were {:?}",
        snapshot.get(&hosts)
    );
    Ok(())
}

#[rstest]
fn files_in_the_working_directory_are_read() -> Result<()> {
    let port = Property::integer().build();
    let name = Property::string().build();
    let snapshot = construct_in_jail(|jail| {
        jail.create_file("app.toml", "[app]\nPORT = 7000\nNAME = \"from toml\"\n")?;
        Ok(StrataBuilder::new()
            .group(Group::new("app").property("PORT", &port).property("NAME", &name))
            .loader(FileLoader::new("app.toml")))
    })??;
    ensure!(snapshot.get(&port) == Some(7000));
    ensure!(snapshot.get(&name).as_deref() == Some("from toml"));
    ensure!(snapshot.source_of(&port) == Some("configuration file"));
    Ok(())
}

#[rstest]
fn the_recommended_chain_resolves_by_position() -> Result<()> {
    let config = Property::path().build();
    let port = Property::integer().build();
    let host = Property::string().build();
    let user = Property::string().build();
    let level = Property::string().default_value("info").build();

    let snapshot = construct_in_jail(|jail| {
        let file = jail_path(jail, "chosen.properties")?;
        jail.create_file(
            "chosen.properties",
            "app.PORT = 1\napp.HOST = file-host\napp.USER = file-user\napp.LEVEL = debug\n",
        )?;
        jail.set_env("APP_USER", "env-user");
        jail.set_env("APP_HOST", "env-host");
        Ok(StrataBuilder::new()
            .group(
                Group::new("app")
                    .property("CONFIG", &config)
                    .property("PORT", &port)
                    .property("HOST", &host)
                    .property("USER", &user)
                    .property("LEVEL", &level),
            )
            .loader(FixedValueLoader::new().fix(&port, 9))
            .loader(ArgsLoader::new([format!("app.CONFIG={file}"), String::from("app.PORT=2")]))
            .loader(MapLoader::new("system properties", [("app.HOST", "map-host")]))
            .loader(EnvLoader::raw())
            .loader(FileLoader::from_property(&config)))
    })??;

    ensure!(snapshot.get(&port) == Some(9));
    ensure!(snapshot.get(&host).as_deref() == Some("map-host"));
    ensure!(snapshot.get(&user).as_deref() == Some("env-user"));
    ensure!(snapshot.get(&level).as_deref() == Some("debug"));
    ensure!(snapshot.source_of(&level) == Some("configuration file"));
    ensure!(snapshot.overridden().len() == 5, "{:?}", snapshot.overridden());
    Ok(())
}

#[rstest]
fn a_missing_required_file_is_reported() -> Result<()> {
    let port = Property::integer().build();
    let err = construct_in_jail(|_jail| {
        Ok(StrataBuilder::new()
            .group(Group::new("app").property("PORT", &port))
            .loader(FileLoader::new(Utf8PathBuf::from("absent.properties"))))
    })?
    .err()
    .ok_or_else(|| anyhow!("construction succeeded"))?;
    let problems = err.problems().ok_or_else(|| anyhow!("no problem list"))?;
    ensure!(problems.count(ProblemKind::Loader) == 1, "{problems}");
    Ok(())
}
