//! Behavioural tests for `strata_config` using `rstest-bdd`.
//!
//! Step implementations live in [`steps`]; the `scenarios!` invocations
//! below bind each feature file to the shared [`fixtures::StrataContext`].

mod fixtures;
mod steps;

use fixtures::{StrataContext, strata_context};
use rstest_bdd_macros::scenarios;

scenarios!(
    "tests/features/precedence.feature",
    fixtures = [strata_context: StrataContext]
);
scenarios!(
    "tests/features/problems.feature",
    fixtures = [strata_context: StrataContext]
);
