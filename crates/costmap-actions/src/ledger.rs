use std::slice;

use serde::{Deserialize, Serialize};
use tracing::trace;

use costmap_types::{ActionKind, GridHandle, Region};

use crate::entry::ActionEntry;

/// Ordered, append-only record of the grid writes requested during one
/// pipeline cycle.
///
/// Insertion order is preserved and is the order the merge sweep visits
/// entries. None of the operations fail: index-based reads return a sentinel
/// ([`ActionKind::None`], `None` grid, [`Region::NULL`]) when the index is out
/// of range, so callers that must tell "empty" apart from "invalid" check
/// [`valid_index`](ActionLedger::valid_index) first.
///
/// The ledger never touches grid contents. It holds [`GridHandle`]s only to
/// compare identities.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionLedger {
    entries: Vec<ActionEntry>,
}

impl ActionLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty ledger with room for `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    // ---------------------------------------------------------------
    // Mutation
    // ---------------------------------------------------------------

    /// Record a write into `region` of `grid` with no copy source.
    pub fn add_action(&mut self, region: Region, grid: GridHandle, kind: ActionKind) {
        self.entries.push(ActionEntry::new(region, grid, kind));
    }

    /// Record a write of `source_region` of `source_grid` into
    /// `destination_region` of `destination_grid`.
    pub fn add_action_with_source(
        &mut self,
        source_region: Region,
        source_grid: GridHandle,
        destination_region: Region,
        destination_grid: GridHandle,
        kind: ActionKind,
    ) {
        self.entries.push(ActionEntry::with_source(
            source_region,
            source_grid,
            destination_region,
            destination_grid,
            kind,
        ));
    }

    /// Append a prepared entry.
    pub fn push(&mut self, entry: ActionEntry) {
        self.entries.push(entry);
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Replace the contents of `dest` with a copy of every entry, in order.
    pub fn copy_to(&self, dest: &mut ActionLedger) {
        dest.clear();
        dest.entries.extend_from_slice(&self.entries);
    }

    /// Replace the contents of `dest` with the entries whose destination is
    /// `grid`, in order.
    pub fn copy_to_with_matching_dest(&self, dest: &mut ActionLedger, grid: GridHandle) {
        dest.clear();
        dest.entries
            .extend(self.entries.iter().filter(|e| e.targets(grid)).copied());
        trace!(
            grid = %grid,
            matched = dest.len(),
            total = self.len(),
            "filtered actions by destination"
        );
    }

    /// Append a copy of the entry at `index` to `dest`. Does nothing if
    /// `index` is out of range.
    pub fn append_action_to(&self, dest: &mut ActionLedger, index: usize) {
        if let Some(entry) = self.entries.get(index) {
            dest.entries.push(*entry);
        }
    }

    pub(crate) fn replace_entries(&mut self, entries: Vec<ActionEntry>) {
        self.entries = entries;
    }

    // ---------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------

    /// Number of entries.
    pub fn size(&self) -> usize {
        self.entries.len()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the ledger has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns `true` if `index` addresses an entry.
    pub fn valid_index(&self, index: usize) -> bool {
        index < self.entries.len()
    }

    /// The kind of the entry at `index`, or [`ActionKind::None`].
    pub fn action_at(&self, index: usize) -> ActionKind {
        self.entries
            .get(index)
            .map(|e| e.kind)
            .unwrap_or(ActionKind::None)
    }

    /// Returns `true` if the entry at `index` has kind `kind`.
    ///
    /// An invalid index reads as [`ActionKind::None`], so
    /// `action_is(invalid, ActionKind::None)` is `true`.
    pub fn action_is(&self, index: usize, kind: ActionKind) -> bool {
        self.action_at(index) == kind
    }

    /// The destination grid of the entry at `index`, or `None`.
    pub fn destination_grid_at(&self, index: usize) -> Option<GridHandle> {
        self.entries.get(index).map(|e| e.destination_grid)
    }

    /// The source grid of the entry at `index`. `None` if the index is
    /// invalid or the entry has no source.
    pub fn source_grid_at(&self, index: usize) -> Option<GridHandle> {
        self.entries.get(index).and_then(|e| e.source_grid)
    }

    /// The destination region of the entry at `index`, or [`Region::NULL`].
    pub fn destination_region_at(&self, index: usize) -> Region {
        self.entries
            .get(index)
            .map(|e| e.destination_region)
            .unwrap_or(Region::NULL)
    }

    /// The source region of the entry at `index`, or [`Region::NULL`].
    pub fn source_region_at(&self, index: usize) -> Region {
        self.entries
            .get(index)
            .map(|e| e.source_region)
            .unwrap_or(Region::NULL)
    }

    /// The entry at `index`, if any.
    pub fn entry(&self, index: usize) -> Option<&ActionEntry> {
        self.entries.get(index)
    }

    /// All entries in insertion order.
    pub fn entries(&self) -> &[ActionEntry] {
        &self.entries
    }

    /// Iterate over entries in insertion order.
    pub fn iter(&self) -> slice::Iter<'_, ActionEntry> {
        self.entries.iter()
    }

    /// Distinct destination grids, in order of first appearance.
    pub fn destination_grids(&self) -> Vec<GridHandle> {
        let mut grids: Vec<GridHandle> = Vec::new();
        for entry in &self.entries {
            if !grids.contains(&entry.destination_grid) {
                grids.push(entry.destination_grid);
            }
        }
        grids
    }
}

impl<'a> IntoIterator for &'a ActionLedger {
    type Item = &'a ActionEntry;
    type IntoIter = slice::Iter<'a, ActionEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl Extend<ActionEntry> for ActionLedger {
    fn extend<T: IntoIterator<Item = ActionEntry>>(&mut self, iter: T) {
        self.entries.extend(iter);
    }
}

impl FromIterator<ActionEntry> for ActionLedger {
    fn from_iter<T: IntoIterator<Item = ActionEntry>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
