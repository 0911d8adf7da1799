//! Field engine
//!
//! ## Modules
//! - `config`: variant presets and tunables
//! - `solid_zone`: rectangle and goal-wedge resolvers
//! - `motion`: sub-stepped constrained moves, snapping, double-park

pub mod config;
pub mod motion;
pub mod solid_zone;

pub use config::{FieldConfig, GameVariant};
pub use motion::{double_parked, snap_to_magnet, MotionController, MAX_SUBSTEPS};
pub use solid_zone::{
    overlaps_any_zone, penetrates_any_wedge, resolve_goal_wedge, resolve_goal_wedges,
    resolve_rect_overlaps, GoalWedge, SolidZone,
};
