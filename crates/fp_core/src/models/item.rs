//! Game pieces (FTC artifacts, FRC fuel)
//!
//! An item always lives in exactly one container: the floor list, a robot's
//! held list, a classifier store, or a human-player slot. Moving between
//! containers moves the `Item` value itself, so it can never be in two
//! places at once.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geometry::Point;

pub type ItemId = String;

/// Colour/category tag. Motif strings use the single-letter tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ItemColor {
    Purple,
    Green,
    /// FRC fuel
    Yellow,
}

impl ItemColor {
    pub fn token(self) -> char {
        match self {
            ItemColor::Purple => 'P',
            ItemColor::Green => 'G',
            ItemColor::Yellow => 'Y',
        }
    }

    /// Case-insensitive token lookup.
    pub fn from_token(token: char) -> Option<Self> {
        match token.to_ascii_uppercase() {
            'P' => Some(ItemColor::Purple),
            'G' => Some(ItemColor::Green),
            'Y' => Some(ItemColor::Yellow),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Item {
    pub id: ItemId,
    pub color: ItemColor,
    /// Last known field position; meaningful on the floor and in slots.
    pub position: Point,
    /// Weak back-reference to the holding robot.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub held_by: Option<String>,
}

impl Item {
    pub fn new(color: ItemColor, position: Point) -> Self {
        Self { id: format!("item-{}", Uuid::new_v4()), color, position, held_by: None }
    }

    pub fn with_id(id: impl Into<String>, color: ItemColor, position: Point) -> Self {
        Self { id: id.into(), color, position, held_by: None }
    }

    /// Detach from any holder and place at `position`.
    pub fn release_at(mut self, position: Point) -> Self {
        self.held_by = None;
        self.position = position;
        self
    }
}
