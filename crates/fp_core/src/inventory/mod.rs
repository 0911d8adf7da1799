//! Inventory
//!
//! ## Modules
//! - `classifier`: bounded primary + extension stores
//! - `slot_grid`: human-player grids filled in anchor-distance order
//! - `scoring`: motif parsing, raw score ledger
//! - `collection`: robot pickup / drop / eject helpers
//! - `system`: per-alliance state machine tying the above together

pub mod classifier;
pub mod collection;
pub mod scoring;
pub mod slot_grid;
pub mod system;

pub use classifier::{Classifier, Store};
pub use scoring::{Motif, ScoreLedger};
pub use slot_grid::{Slot, SlotGrid};
pub use system::{EmptyReport, InventorySystem, Placement};
