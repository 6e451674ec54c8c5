//! Action ledger for layered costmaps.
//!
//! Layers record the grid writes they intend to make during a navigation
//! cycle instead of applying them immediately. This crate provides:
//! - [`ActionEntry`] records pairing a destination region with its grid and
//!   intent, plus an optional copy source
//! - [`ActionLedger`], the ordered, append-only list of entries with copy and
//!   filter operations and sentinel-returning index accessors
//! - [`MergeOptimizer`], a single forward sweep that coalesces nearby
//!   entries on the same destination grid
//! - [`OptimizeConfig`] and [`ActionPlan`] for loading settings and action
//!   lists from TOML and JSON

pub mod config;
pub mod entry;
pub mod error;
pub mod ledger;
pub mod optimize;
pub mod plan;

pub use config::{MergeGuard, OptimizeConfig};
pub use entry::ActionEntry;
pub use error::{ActionError, ActionResult};
pub use ledger::ActionLedger;
pub use optimize::{MergeOptimizer, OptimizeReport};
pub use plan::{ActionPlan, PlanAction, PlanSource};

pub use costmap_types::{ActionKind, GridHandle, Region};
