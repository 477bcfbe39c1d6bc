//! Properties of the `hello` group.

use std::sync::LazyLock;

use camino::Utf8PathBuf;
use strata_config::{Group, Property, PropertyGroup};

/// Who to greet.
pub static NAME: LazyLock<Property<String>> = LazyLock::new(|| {
    Property::string()
        .default_value("World")
        .alias("NAME")
        .not_empty()
        .description("Who to greet")
        .build()
});

/// Greeting word.
pub static GREETING: LazyLock<Property<String>> = LazyLock::new(|| {
    Property::string()
        .default_value("Hello")
        .one_of(["Hello", "Hi", "Howdy"])
        .build()
});

/// How many times to greet.
pub static REPEAT: LazyLock<Property<i64>> = LazyLock::new(|| {
    Property::integer()
        .default_value(1)
        .between(1, 10)
        .description("Number of greetings")
        .build()
});

/// Ends the greeting with `!`.
pub static EXCITED: LazyLock<Property<bool>> = LazyLock::new(|| Property::flag().build());

/// Extra configuration file.
pub static CONFIG: LazyLock<Property<Utf8PathBuf>> = LazyLock::new(|| {
    Property::path()
        .description("Configuration file read after the environment")
        .build()
});

/// The `hello` group.
#[derive(Debug)]
pub struct Hello;

impl PropertyGroup for Hello {
    fn group() -> Group {
        Group::new("hello")
            .property("NAME", &NAME)
            .property("GREETING", &GREETING)
            .property("REPEAT", &REPEAT)
            .property("EXCITED", &EXCITED)
            .property("CONFIG", &CONFIG)
    }
}
