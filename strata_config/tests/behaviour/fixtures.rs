//! Shared fixtures for the behavioural scenarios.

use std::sync::Arc;

use rstest::fixture;
use rstest_bdd::Slot;
use rstest_bdd_macros::ScenarioState;
use strata_config::{Property, Snapshot, StrataError};
use test_helpers::loaders::{CallCounter, ScriptedLoader};

/// Properties of the `demo` group.
#[derive(Debug, Clone)]
pub struct DemoProperties {
    /// Required integer between 1 and 100.
    pub a: Property<i64>,
    /// String defaulting to `x`.
    pub b: Property<String>,
    /// Optional integer.
    pub c: Property<i64>,
    /// Flag.
    pub verbose: Property<bool>,
}

impl DemoProperties {
    /// Declares fresh properties.
    #[must_use]
    pub fn declare() -> Self {
        Self {
            a: Property::integer().required().between(1, 100).build(),
            b: Property::string().default_value("x").build(),
            c: Property::integer().build(),
            verbose: Property::flag().build(),
        }
    }
}

/// State shared between the steps of one scenario.
#[derive(Debug, Default, ScenarioState)]
pub struct StrataContext {
    /// Declared properties.
    pub properties: Slot<DemoProperties>,
    /// Whether a second group re-declares `A`.
    pub duplicate: Slot<()>,
    /// Loaders in the order they were first mentioned.
    pub loaders: Slot<Vec<ScriptedLoader>>,
    /// Call counters of the constructed loaders.
    pub calls: Slot<Vec<CallCounter>>,
    /// Successful construction.
    pub snapshot: Slot<Arc<Snapshot>>,
    /// Failed construction.
    pub error: Slot<StrataError>,
}

/// Creates an empty scenario state.
#[fixture]
pub fn strata_context() -> StrataContext {
    StrataContext::default()
}
