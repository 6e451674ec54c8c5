//! JSON action plans.
//!
//! A plan is a portable listing of ledger entries with raw grid identities
//! and `[min_x, min_y, max_x, max_y]` regions. A `null` region stands for
//! [`Region::NULL`]:
//!
//! ```json
//! {
//!   "actions": [
//!     { "kind": "modify", "grid": 1, "region": [0, 0, 10, 10] },
//!     { "kind": "max_combine", "grid": 1, "region": [0, 0, 4, 4],
//!       "source": { "grid": 7, "region": [20, 20, 24, 24] } }
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use costmap_types::{ActionKind, GridHandle, Region};

use crate::entry::ActionEntry;
use crate::error::{ActionError, ActionResult};
use crate::ledger::ActionLedger;

/// A serialized list of actions.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionPlan {
    pub actions: Vec<PlanAction>,
}

/// One action in a plan.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanAction {
    pub kind: ActionKind,
    pub grid: u64,
    pub region: Option<[i32; 4]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<PlanSource>,
}

/// The copy source of a plan action.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanSource {
    pub grid: u64,
    pub region: Option<[i32; 4]>,
}

impl ActionPlan {
    /// Parse a plan from JSON text.
    pub fn from_json_str(text: &str) -> ActionResult<Self> {
        serde_json::from_str(text).map_err(|e| ActionError::Serialization(e.to_string()))
    }

    /// Render as pretty-printed JSON.
    pub fn to_json_pretty(&self) -> ActionResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| ActionError::Serialization(e.to_string()))
    }

    /// Describe every entry of `ledger`.
    pub fn from_ledger(ledger: &ActionLedger) -> Self {
        let actions = ledger
            .iter()
            .map(|entry| PlanAction {
                kind: entry.kind,
                grid: entry.destination_grid.raw(),
                region: bounds(&entry.destination_region),
                source: entry.source_grid.map(|grid| PlanSource {
                    grid: grid.raw(),
                    region: bounds(&entry.source_region),
                }),
            })
            .collect();
        Self { actions }
    }

    /// Build a ledger holding the plan's actions, in order.
    ///
    /// Every action must carry a real kind, and every region must be `null`
    /// or have non-inverted bounds.
    pub fn to_ledger(&self) -> ActionResult<ActionLedger> {
        let mut ledger = ActionLedger::with_capacity(self.actions.len());
        for (index, action) in self.actions.iter().enumerate() {
            ledger.push(action.to_entry(index)?);
        }
        debug!(actions = ledger.len(), "loaded action plan");
        Ok(ledger)
    }
}

impl PlanAction {
    fn to_entry(&self, index: usize) -> ActionResult<ActionEntry> {
        if self.kind == ActionKind::None {
            return Err(ActionError::InvalidPlanEntry {
                index,
                reason: "kind `none` cannot be recorded".into(),
            });
        }
        let destination = region(index, self.region)?;
        let grid = GridHandle::from_raw(self.grid);

        Ok(match &self.source {
            Some(source) => ActionEntry::with_source(
                region(index, source.region)?,
                GridHandle::from_raw(source.grid),
                destination,
                grid,
                self.kind,
            ),
            None => ActionEntry::new(destination, grid, self.kind),
        })
    }
}

fn region(index: usize, bounds: Option<[i32; 4]>) -> ActionResult<Region> {
    let Some([min_x, min_y, max_x, max_y]) = bounds else {
        return Ok(Region::NULL);
    };
    Region::new(min_x, min_y, max_x, max_y).map_err(|e| ActionError::InvalidPlanEntry {
        index,
        reason: e.to_string(),
    })
}

fn bounds(region: &Region) -> Option<[i32; 4]> {
    if region.is_null() {
        return None;
    }
    Some([region.min_x, region.min_y, region.max_x, region.max_y])
}
