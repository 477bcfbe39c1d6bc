//! Test helpers shared across crates in the workspace.
//!
//! [`loaders`] provides scripted [`strata_config::Loader`] implementations
//! for precedence and concurrency tests; [`jail`] wraps `figment::Jail` for
//! tests that touch environment variables or the working directory.

pub mod jail;
pub mod loaders;
