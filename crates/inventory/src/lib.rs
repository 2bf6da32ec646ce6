//! Inventory ledger domain module.
//!
//! Quantity-on-hand per (item, warehouse), the append-only movement trail,
//! and the pure planner that turns a requested posting into new level states.
//! No IO, no storage: the infra layer loads levels, asks for a plan and
//! stages the result inside a unit of work.

pub mod event;
pub mod level;
pub mod movement;
pub mod posting;

pub use event::{InventoryEvent, StockPosted};
pub use level::{InventoryLevel, LevelKey};
pub use movement::{MovementKind, MovementReference, StockMovement};
pub use posting::{LedgerEffect, LedgerEntry, PlannedLevel, PostingKind, PostingPlan, plan_posting};
