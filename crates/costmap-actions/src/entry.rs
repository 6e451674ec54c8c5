//! A single recorded intent to write part of a destination grid.

use serde::{Deserialize, Serialize};

use costmap_types::{ActionKind, GridHandle, Region};

/// One pending grid write.
///
/// When the action has no copy source (a polygon rasterized straight into the
/// destination, for instance) `source_grid` is `None` and `source_region` is
/// [`Region::NULL`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActionEntry {
    /// What the write does to the destination cells.
    pub kind: ActionKind,
    /// Grid receiving the write.
    pub destination_grid: GridHandle,
    /// Cells of the destination grid affected.
    pub destination_region: Region,
    /// Grid the data is read from, if any.
    pub source_grid: Option<GridHandle>,
    /// Cells read from `source_grid`.
    pub source_region: Region,
}

impl ActionEntry {
    /// An action with no copy source.
    pub fn new(destination_region: Region, destination_grid: GridHandle, kind: ActionKind) -> Self {
        Self {
            kind,
            destination_grid,
            destination_region,
            source_grid: None,
            source_region: Region::NULL,
        }
    }

    /// An action that copies `source_region` of `source_grid` into
    /// `destination_region` of `destination_grid`.
    pub fn with_source(
        source_region: Region,
        source_grid: GridHandle,
        destination_region: Region,
        destination_grid: GridHandle,
        kind: ActionKind,
    ) -> Self {
        Self {
            kind,
            destination_grid,
            destination_region,
            source_grid: Some(source_grid),
            source_region,
        }
    }

    /// Returns `true` if this entry reads from a source grid.
    pub fn has_source(&self) -> bool {
        self.source_grid.is_some()
    }

    /// Returns `true` if this entry writes into `grid`.
    pub fn targets(&self, grid: GridHandle) -> bool {
        self.destination_grid == grid
    }
}
