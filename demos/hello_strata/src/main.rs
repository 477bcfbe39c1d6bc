//! Greets someone using settings resolved by `strata_config`.
//!
//! Settings come, in order of precedence, from trailing `key=value`
//! arguments, `STRATA_`-prefixed environment variables, the file named by
//! `hello.CONFIG`, and `hello.toml` in the user configuration directory.

mod settings;

use std::io::{self, Write};
use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use strata_config::{
    ArgsLoader, DottedNaming, EnvLoader, FileLoader, PropertyGroup, Registry, StrataBuilder,
    StrataError, docs, global,
};
use tracing_subscriber::EnvFilter;

use settings::{CONFIG, EXCITED, GREETING, Hello, NAME, REPEAT};

/// Command-line interface.
#[derive(Debug, Parser)]
#[command(name = "hello-strata", about = "Greets someone, configurably.")]
struct Cli {
    /// Print a sample `.properties` file and exit.
    #[arg(long)]
    sample: bool,

    /// Print the resolved settings as JSON instead of greeting.
    #[arg(long)]
    json: bool,

    /// Settings as `key=value`, e.g. `hello.NAME=Ada` or `hello.EXCITED`.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    settings: Vec<String>,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let mut stdout = io::stdout().lock();

    if cli.sample {
        let registry = Registry::build(Hello::group().declarations(), Arc::new(DottedNaming))
            .map_err(StrataError::ConstructionFailed)?;
        write!(stdout, "{}", docs::render_properties_sample(&registry))?;
        return Ok(());
    }

    let mut builder = StrataBuilder::new()
        .register::<Hello>()
        .loader(ArgsLoader::new(cli.settings))
        .loader(EnvLoader::prefixed("STRATA_"))
        .loader(FileLoader::from_property(&CONFIG));
    if let Some(user_file) = FileLoader::user_config("hello_strata", "hello.toml") {
        builder = builder.loader(user_file);
    }
    let snapshot = global::initialize(builder).wrap_err("invalid configuration")?;

    if cli.json {
        writeln!(stdout, "{:#}", snapshot.to_json())?;
        return Ok(());
    }

    let name = global::value(&NAME).unwrap_or_default();
    let greeting = global::value(&GREETING).unwrap_or_default();
    let punctuation = if global::value(&EXCITED).unwrap_or_default() {
        '!'
    } else {
        '.'
    };
    for _ in 0..global::value(&REPEAT).unwrap_or(1) {
        writeln!(stdout, "{greeting}, {name}{punctuation}")?;
    }
    Ok(())
}
