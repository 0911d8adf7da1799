//! Field entities: alliances, game pieces, robots

pub mod alliance;
pub mod item;
pub mod robot;

pub use alliance::{Alliance, PerAlliance};
pub use item::{Item, ItemColor, ItemId};
pub use robot::{Robot, RobotId};
