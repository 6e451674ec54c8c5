//! Spatial merge of pending actions.
//!
//! [`MergeOptimizer`] walks the ledger once, in insertion order. Each entry
//! not yet folded into an earlier one starts a group; if its kind allows, it
//! then scans every other unconsumed entry on the same destination grid and
//! absorbs those whose region lies within the tolerance of the group's
//! growing bounding box. Each group becomes a single sourceless entry
//! carrying the initiator's grid and kind.
//!
//! # Ordering
//!
//! The inner scan is a single pass. An entry skipped early in the pass is
//! not revisited after the group grows toward it, so the result depends on
//! ledger order and is not a fixed point. With [`MergeGuard::InitiatorOnly`]
//! a `TrueOverwrite` entry that follows an overlapping mergeable entry is
//! absorbed and its kind is dropped from the output.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use costmap_types::ActionKind;

use crate::config::{MergeGuard, OptimizeConfig};
use crate::entry::ActionEntry;
use crate::ledger::ActionLedger;

/// Entry counts before and after a merge sweep.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptimizeReport {
    pub tolerance: u32,
    pub before: usize,
    pub after: usize,
}

impl OptimizeReport {
    /// Number of entries folded into another entry.
    pub fn merged(&self) -> usize {
        self.before - self.after
    }
}

/// Coalesces nearby same-grid actions into fewer, larger ones.
#[derive(Clone, Debug, Default)]
pub struct MergeOptimizer {
    config: OptimizeConfig,
}

impl MergeOptimizer {
    pub fn new(config: OptimizeConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &OptimizeConfig {
        &self.config
    }

    /// Replace the ledger's contents with the merged entries.
    pub fn run(&self, ledger: &mut ActionLedger) -> OptimizeReport {
        let tolerance = self.config.tolerance;
        let before = ledger.len();
        if before == 0 {
            return OptimizeReport {
                tolerance,
                before,
                after: 0,
            };
        }

        let entries = ledger.entries();
        let mut consumed = vec![false; before];
        let mut merged_entries = Vec::with_capacity(before);

        for i in 0..before {
            if consumed[i] {
                continue;
            }
            consumed[i] = true;

            let initiator = &entries[i];
            let mut merged = initiator.destination_region;

            if initiator.kind.initiates_merge() {
                for (j, candidate) in entries.iter().enumerate() {
                    if consumed[j]
                        || candidate.destination_grid != initiator.destination_grid
                        || !self.may_absorb(candidate)
                    {
                        continue;
                    }
                    if merged.intersects(&candidate.destination_region, tolerance) {
                        merged.expand(&candidate.destination_region);
                        consumed[j] = true;
                        trace!(
                            initiator = i,
                            absorbed = j,
                            region = %merged,
                            "absorbed action"
                        );
                    }
                }
            }

            merged_entries.push(ActionEntry::new(
                merged,
                initiator.destination_grid,
                initiator.kind,
            ));
        }

        let after = merged_entries.len();
        ledger.replace_entries(merged_entries);
        debug!(before, after, tolerance, "optimized layer actions");

        OptimizeReport {
            tolerance,
            before,
            after,
        }
    }

    fn may_absorb(&self, candidate: &ActionEntry) -> bool {
        match self.config.guard {
            MergeGuard::InitiatorOnly => true,
            MergeGuard::ProtectTrueOverwrite => candidate.kind != ActionKind::TrueOverwrite,
        }
    }
}

impl ActionLedger {
    /// Merge entries on the same destination grid whose regions lie within
    /// `tolerance` cells of each other, using the initiator-only guard.
    ///
    /// See the [module docs](crate::optimize) for ordering caveats.
    pub fn optimize(&mut self, tolerance: u32) -> OptimizeReport {
        MergeOptimizer::new(OptimizeConfig::new(tolerance)).run(self)
    }

    /// Merge entries according to `config`.
    pub fn optimize_with(&mut self, config: &OptimizeConfig) -> OptimizeReport {
        MergeOptimizer::new(config.clone()).run(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use costmap_types::{GridHandle, Region};
    use proptest::prelude::*;

    fn r(min_x: i32, min_y: i32, max_x: i32, max_y: i32) -> Region {
        Region::new(min_x, min_y, max_x, max_y).unwrap()
    }

    fn grid(id: u64) -> GridHandle {
        GridHandle::from_raw(id)
    }

    #[test]
    fn empty_ledger_is_untouched() {
        let mut ledger = ActionLedger::new();
        let report = ledger.optimize(4);
        assert!(ledger.is_empty());
        assert_eq!(report.before, 0);
        assert_eq!(report.after, 0);
    }

    #[test]
    fn overlapping_entries_merge() {
        let mut ledger = ActionLedger::new();
        ledger.add_action(r(0, 0, 10, 10), grid(1), ActionKind::Modify);
        ledger.add_action(r(9, 9, 20, 20), grid(1), ActionKind::Modify);

        let report = ledger.optimize(0);

        assert_eq!(ledger.size(), 1);
        assert_eq!(ledger.action_at(0), ActionKind::Modify);
        assert_eq!(ledger.destination_region_at(0), r(0, 0, 20, 20));
        assert_eq!(report.merged(), 1);
    }

    #[test]
    fn disjoint_entries_stay_apart() {
        let mut ledger = ActionLedger::new();
        ledger.add_action(r(0, 0, 5, 5), grid(1), ActionKind::Modify);
        ledger.add_action(r(50, 50, 60, 60), grid(1), ActionKind::Modify);
        let original = ledger.clone();

        ledger.optimize(0);

        assert_eq!(ledger, original);
    }

    #[test]
    fn tolerance_bridges_gaps() {
        let mut ledger = ActionLedger::new();
        ledger.add_action(r(0, 0, 5, 5), grid(1), ActionKind::Overwrite);
        ledger.add_action(r(8, 0, 12, 5), grid(1), ActionKind::Overwrite);

        let mut strict = ledger.clone();
        strict.optimize(2);
        assert_eq!(strict.size(), 2);

        ledger.optimize(3);
        assert_eq!(ledger.size(), 1);
        assert_eq!(ledger.destination_region_at(0), r(0, 0, 12, 5));
    }

    #[test]
    fn later_true_overwrite_is_absorbed() {
        let mut ledger = ActionLedger::new();
        ledger.add_action(r(0, 0, 10, 10), grid(1), ActionKind::Modify);
        ledger.add_action(r(5, 5, 15, 15), grid(1), ActionKind::TrueOverwrite);

        ledger.optimize(0);

        assert_eq!(ledger.size(), 1);
        assert_eq!(ledger.action_at(0), ActionKind::Modify);
        assert_eq!(ledger.destination_region_at(0), r(0, 0, 15, 15));
    }

    #[test]
    fn leading_true_overwrite_never_initiates() {
        let mut ledger = ActionLedger::new();
        ledger.add_action(r(0, 0, 10, 10), grid(1), ActionKind::TrueOverwrite);
        ledger.add_action(r(5, 5, 15, 15), grid(1), ActionKind::Modify);

        ledger.optimize(0);

        assert_eq!(ledger.size(), 2);
        assert_eq!(ledger.action_at(0), ActionKind::TrueOverwrite);
        assert_eq!(ledger.destination_region_at(0), r(0, 0, 10, 10));
        assert_eq!(ledger.action_at(1), ActionKind::Modify);
        assert_eq!(ledger.destination_region_at(1), r(5, 5, 15, 15));
    }

    #[test]
    fn protective_guard_keeps_true_overwrite() {
        let mut ledger = ActionLedger::new();
        ledger.add_action(r(0, 0, 10, 10), grid(1), ActionKind::Modify);
        ledger.add_action(r(5, 5, 15, 15), grid(1), ActionKind::TrueOverwrite);
        ledger.add_action(r(10, 0, 12, 2), grid(1), ActionKind::Modify);

        let report = ledger.optimize_with(&OptimizeConfig::protective(0));

        assert_eq!(report.after, 2);
        assert_eq!(ledger.action_at(0), ActionKind::Modify);
        assert_eq!(ledger.destination_region_at(0), r(0, 0, 12, 10));
        assert_eq!(ledger.action_at(1), ActionKind::TrueOverwrite);
        assert_eq!(ledger.destination_region_at(1), r(5, 5, 15, 15));
    }

    #[test]
    fn different_grids_never_merge() {
        let mut ledger = ActionLedger::new();
        ledger.add_action(r(0, 0, 10, 10), grid(1), ActionKind::Modify);
        ledger.add_action(r(0, 0, 10, 10), grid(2), ActionKind::Modify);

        ledger.optimize(100);

        assert_eq!(ledger.size(), 2);
        assert_eq!(ledger.destination_grid_at(0), Some(grid(1)));
        assert_eq!(ledger.destination_grid_at(1), Some(grid(2)));
    }

    #[test]
    fn expanded_region_absorbs_later_neighbours() {
        // [20..25] only touches the group once [10..20] has been absorbed.
        let mut ledger = ActionLedger::new();
        ledger.add_action(r(0, 0, 10, 2), grid(1), ActionKind::MaxCombine);
        ledger.add_action(r(10, 0, 20, 2), grid(1), ActionKind::MaxCombine);
        ledger.add_action(r(20, 0, 25, 2), grid(1), ActionKind::MaxCombine);

        ledger.optimize(0);

        assert_eq!(ledger.size(), 1);
        assert_eq!(ledger.destination_region_at(0), r(0, 0, 25, 2));
    }

    #[test]
    fn single_pass_does_not_revisit_skipped_entries() {
        // Entry 1 is skipped before entry 2 grows the group toward it.
        let mut ledger = ActionLedger::new();
        ledger.add_action(r(0, 0, 10, 2), grid(1), ActionKind::Modify);
        ledger.add_action(r(20, 0, 25, 2), grid(1), ActionKind::Modify);
        ledger.add_action(r(10, 0, 20, 2), grid(1), ActionKind::Modify);

        ledger.optimize(0);

        assert_eq!(ledger.size(), 2);
        assert_eq!(ledger.destination_region_at(0), r(0, 0, 20, 2));
        assert_eq!(ledger.destination_region_at(1), r(20, 0, 25, 2));
    }

    #[test]
    fn merged_entries_drop_their_source() {
        let mut ledger = ActionLedger::new();
        ledger.add_action_with_source(
            r(100, 100, 110, 110),
            grid(9),
            r(0, 0, 10, 10),
            grid(1),
            ActionKind::Overwrite,
        );

        ledger.optimize(0);

        assert_eq!(ledger.size(), 1);
        assert_eq!(ledger.source_grid_at(0), None);
        assert_eq!(ledger.source_region_at(0), Region::NULL);
        assert_eq!(ledger.destination_region_at(0), r(0, 0, 10, 10));
    }

    #[test]
    fn separated_ledger_is_a_fixed_point() {
        let mut ledger = ActionLedger::new();
        ledger.add_action(r(0, 0, 5, 5), grid(1), ActionKind::Modify);
        ledger.add_action(r(0, 0, 5, 5), grid(2), ActionKind::Overwrite);
        ledger.add_action(r(0, 0, 5, 5), grid(3), ActionKind::TrueOverwrite);

        ledger.optimize(1);
        let once = ledger.clone();
        ledger.optimize(1);

        assert_eq!(ledger, once);
    }

    fn arb_entry() -> impl Strategy<Value = ActionEntry> {
        (
            0u64..3,
            0i32..100,
            0i32..100,
            0i32..15,
            0i32..15,
            prop::sample::select(ActionKind::RECORDABLE.to_vec()),
        )
            .prop_map(|(g, x, y, w, h, kind)| {
                ActionEntry::new(
                    Region::from_corners((x, y), (x + w, y + h)),
                    grid(g),
                    kind,
                )
            })
    }

    proptest! {
        #[test]
        fn never_grows_and_covers_every_input(
            entries in prop::collection::vec(arb_entry(), 0..30),
            tolerance in 0u32..5,
        ) {
            let mut ledger: ActionLedger = entries.iter().copied().collect();
            let report = ledger.optimize(tolerance);

            prop_assert_eq!(report.before, entries.len());
            prop_assert!(report.after <= report.before);
            prop_assert_eq!(report.after, ledger.size());

            for input in &entries {
                let region = input.destination_region;
                let covered = ledger.iter().any(|out| {
                    out.destination_grid == input.destination_grid
                        && out.destination_region.contains(region.min_x, region.min_y)
                        && out.destination_region.contains(region.max_x, region.max_y)
                });
                prop_assert!(covered);
            }
        }

        #[test]
        fn output_grids_are_input_grids(
            entries in prop::collection::vec(arb_entry(), 0..30),
            tolerance in 0u32..5,
        ) {
            let mut ledger: ActionLedger = entries.iter().copied().collect();
            let grids_before = ledger.destination_grids();
            ledger.optimize(tolerance);
            prop_assert_eq!(ledger.destination_grids(), grids_before);
        }

        #[test]
        fn one_entry_per_grid_is_stable(
            regions in prop::collection::vec((0i32..100, 0i32..100, 0i32..15, 0i32..15), 1..6),
            tolerance in 0u32..5,
        ) {
            let mut ledger = ActionLedger::new();
            for (g, (x, y, w, h)) in regions.into_iter().enumerate() {
                ledger.add_action(
                    Region::from_corners((x, y), (x + w, y + h)),
                    grid(g as u64),
                    ActionKind::Modify,
                );
            }
            let original = ledger.clone();
            ledger.optimize(tolerance);
            prop_assert_eq!(&ledger, &original);
            ledger.optimize(tolerance);
            prop_assert_eq!(&ledger, &original);
        }
    }
}
