//! Strongly-typed identifiers.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Identifies a token (placeable) on the scene.
///
/// Ids are owned by the placeable registry; the engine only ever holds
/// them as keys and never controls token lifetime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TokenId(pub u64);

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for TokenId {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

/// Identifies an item (weapon, spell, ...) carried by a token.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(pub u64);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ItemId {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

/// Counter for unique [`GridInstanceId`] allocation.
static GRID_INSTANCE_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique per-instance identifier for a grid topology object.
///
/// Allocated from a monotonic atomic counter via [`GridInstanceId::next`].
/// Highlight sets record the id of the topology they were planned
/// against, so a set produced for a previous scene can be recognised as
/// stale after a scene change even if the new grid has identical
/// parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GridInstanceId(u64);

impl GridInstanceId {
    /// Allocate a fresh, unique instance ID. Thread-safe.
    pub fn next() -> Self {
        Self(GRID_INSTANCE_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for GridInstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
