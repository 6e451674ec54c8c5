use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

static NEXT_GRID_ID: AtomicU64 = AtomicU64::new(1);

/// Identity-compared reference to a cost grid owned elsewhere in the
/// pipeline.
///
/// A `GridHandle` is never dereferenced by the action ledger. Two handles are
/// equal exactly when they name the same grid. The absence of a grid (for
/// example an action with no copy source) is expressed as
/// `Option<GridHandle>::None`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridHandle(u64);

impl GridHandle {
    /// Issue a handle that is unique within this process.
    pub fn allocate() -> Self {
        Self(NEXT_GRID_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Wrap an externally assigned grid identity.
    pub const fn from_raw(id: u64) -> Self {
        Self(id)
    }

    /// The raw identity value.
    pub const fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Debug for GridHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GridHandle({})", self.0)
    }
}

impl fmt::Display for GridHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "grid#{}", self.0)
    }
}

impl From<u64> for GridHandle {
    fn from(id: u64) -> Self {
        Self(id)
    }
}
