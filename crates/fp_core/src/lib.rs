//! # fp_core - Field Geometry & Inventory Constraint Engine
//!
//! Keeps robots and game pieces legal on an FTC or FRC field while a
//! strategist drags them around, and tracks where every game piece is.
//!
//! ## Features
//! - Legal play-area polygon traced from a field image, with a rectangular fallback
//! - Sub-stepped constrained moves: perimeter, solid zones, goal wedges, base snapping
//! - Per-alliance classifier with extension store, slot grids and overflow
//! - Raw and motif scoring
//! - Versioned JSON session snapshots
//!
//! ## Usage
//! ```rust
//! use fp_core::{Alliance, FieldConfig, Point, Session};
//!
//! let mut session = Session::new(FieldConfig::ftc()).unwrap();
//! let robot = session.add_robot(Alliance::Red, Point::new(72.0, 100.0));
//! let end = session.move_actor_to(&robot, Point::new(-50.0, -50.0)).unwrap();
//! assert!(end.x > 0.0 && end.y > 0.0);
//! ```

#![allow(clippy::too_many_arguments)]

pub mod engine;
pub mod error;
pub mod geometry;
pub mod inventory;
pub mod models;
pub mod save;
pub mod session;

pub use engine::config::{FieldConfig, GameVariant};
pub use engine::MotionController;
pub use error::{FieldError, Result};
pub use geometry::{extract_perimeter, spawn_extraction, Footprint, PerimeterStore, Point, Polygon, Raster, Rgb};
pub use inventory::{EmptyReport, InventorySystem, Motif, Placement, Store};
pub use models::{Alliance, Item, ItemColor, Robot};
pub use save::{SessionSnapshot, SnapshotError, SNAPSHOT_VERSION};
pub use session::Session;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
