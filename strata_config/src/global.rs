//! Process-wide configuration slot.
//!
//! Applications that want one configuration for the whole process call
//! [`initialize`] once at startup and read it anywhere with [`current`] or
//! [`value`]. Construction runs under a process-wide lock taken with
//! `try_lock`, so a second attempt while one is running fails at once with
//! [`StrataError::ConstructionInProgress`] instead of waiting. Readers never
//! take the lock.
//!
//! ```rust,no_run
//! use strata_config::{Group, Property, StrataBuilder, global};
//!
//! let port = Property::integer().default_value(8080).build();
//! global::initialize(
//!     StrataBuilder::new()
//!         .group(Group::new("app").property("PORT", &port))
//!         .standard_loaders(std::env::args().skip(1)),
//! )?;
//! assert_eq!(global::value(&port), Some(8080));
//! # Ok::<_, strata_config::StrataError>(())
//! ```

use std::sync::Arc;

use arc_swap::ArcSwapOption;
use parking_lot::{Mutex, const_mutex};
use tracing::debug;

use crate::engine::StrataBuilder;
use crate::error::{StrataError, StrataResult};
use crate::property::Property;
use crate::snapshot::Snapshot;
use crate::value::PropertyValue;

static CONSTRUCTION: Mutex<()> = const_mutex(());
static CURRENT: ArcSwapOption<Snapshot> = ArcSwapOption::const_empty();

/// Builds the process-wide snapshot.
///
/// # Errors
///
/// Returns [`StrataError::ConstructionInProgress`] when another thread is
/// constructing, [`StrataError::AlreadyConstructed`] after a previous
/// success, or the construction error itself. A failed attempt leaves the
/// slot empty, so a corrected builder may try again.
pub fn initialize(builder: StrataBuilder) -> StrataResult<Arc<Snapshot>> {
    let _guard = CONSTRUCTION
        .try_lock()
        .ok_or(StrataError::ConstructionInProgress)?;
    if CURRENT.load().is_some() {
        return Err(StrataError::AlreadyConstructed);
    }
    let snapshot = Arc::new(builder.construct()?);
    CURRENT.store(Some(Arc::clone(&snapshot)));
    debug!("process-wide configuration installed");
    Ok(snapshot)
}

/// Builds a new snapshot and swaps it in, replacing any previous one.
///
/// Readers holding the previous snapshot keep a consistent view of it.
///
/// # Errors
///
/// Returns [`StrataError::ConstructionInProgress`] when another thread is
/// constructing, or the construction error. On failure the current
/// snapshot stays in place.
pub fn reinitialize(builder: StrataBuilder) -> StrataResult<Arc<Snapshot>> {
    let _guard = CONSTRUCTION
        .try_lock()
        .ok_or(StrataError::ConstructionInProgress)?;
    let snapshot = Arc::new(builder.construct()?);
    CURRENT.store(Some(Arc::clone(&snapshot)));
    debug!("process-wide configuration replaced");
    Ok(snapshot)
}

/// The installed snapshot, if any.
#[must_use]
pub fn current() -> Option<Arc<Snapshot>> {
    CURRENT.load_full()
}

/// Effective value of `property` in the installed snapshot.
#[must_use]
pub fn value<T: PropertyValue>(property: &Property<T>) -> Option<T> {
    CURRENT.load().as_ref().and_then(|snapshot| snapshot.get(property))
}

/// Empties the slot, waiting for any construction in flight.
pub fn reset() {
    let _guard = CONSTRUCTION.lock();
    CURRENT.store(None);
}
