use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Alliance, Item};
use crate::geometry::{Footprint, Point};

pub type RobotId = String;

/// A robot on the field, with its held game pieces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Robot {
    pub id: RobotId,
    pub alliance: Alliance,
    pub position: Point,
    #[serde(default)]
    pub rotation_deg: f64,
    pub width: f64,
    pub height: f64,
    /// Held items, oldest first
    #[serde(default)]
    pub held: Vec<Item>,
    pub capacity: usize,
}

impl Robot {
    pub fn new(alliance: Alliance, position: Point, width: f64, height: f64, capacity: usize) -> Self {
        Self {
            id: format!("robot-{}", Uuid::new_v4()),
            alliance,
            position,
            rotation_deg: 0.0,
            width,
            height,
            held: Vec::new(),
            capacity,
        }
    }

    pub fn footprint(&self) -> Footprint {
        Footprint::new(self.position, self.rotation_deg, self.width, self.height)
    }

    pub fn remaining_capacity(&self) -> usize {
        self.capacity.saturating_sub(self.held.len())
    }

    pub fn is_full(&self) -> bool {
        self.remaining_capacity() == 0
    }
}
