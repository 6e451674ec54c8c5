//! Foundation types for costmap layer actions.
//!
//! This crate provides the value types shared by the action ledger and its
//! callers. Every other costmap crate depends on `costmap-types`.
//!
//! # Key Types
//!
//! - [`Region`] - Axis-aligned bounding box over grid cells with a
//!   tolerance-aware overlap test
//! - [`GridHandle`] - Identity-compared reference to an externally owned grid
//! - [`ActionKind`] - The intent tag recorded with each pending write

pub mod action;
pub mod error;
pub mod grid;
pub mod region;

pub use action::ActionKind;
pub use error::TypeError;
pub use grid::GridHandle;
pub use region::Region;
