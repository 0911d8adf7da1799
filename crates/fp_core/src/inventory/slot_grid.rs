//! Human-player slot grid
//!
//! Fixed slot positions per alliance. Slots are ranked once, by distance
//! to the grid anchor, and always filled in that order.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::engine::config::SlotGridLayout;
use crate::geometry::Point;
use crate::models::Item;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Slot {
    pub position: Point,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item: Option<Item>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SlotGrid {
    /// Priority order: nearest to the anchor first
    pub slots: Vec<Slot>,
}

impl SlotGrid {
    pub fn from_layout(layout: &SlotGridLayout) -> Self {
        let mut positions = layout.positions.clone();
        // stable: equidistant slots keep layout order
        positions.sort_by(|a, b| a.distance_sq(layout.anchor).total_cmp(&b.distance_sq(layout.anchor)));

        Self { slots: positions.into_iter().map(|position| Slot { position, item: None }).collect() }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn occupied(&self) -> usize {
        self.slots.iter().filter(|s| s.item.is_some()).count()
    }

    pub fn has_room(&self) -> bool {
        self.slots.iter().any(|s| s.item.is_none())
    }

    /// Places `item` in the highest-priority empty slot and moves it there.
    pub fn place(&mut self, mut item: Item) -> Result<usize, Item> {
        let Some(index) = self.slots.iter().position(|s| s.item.is_none()) else {
            return Err(item);
        };
        let slot = &mut self.slots[index];
        item.held_by = None;
        item.position = slot.position;
        slot.item = Some(item);
        Ok(index)
    }

    /// Empties a slot. `None` if the index is out of range or the slot is free.
    pub fn release(&mut self, index: usize) -> Option<Item> {
        self.slots.get_mut(index)?.item.take()
    }

    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.slots.iter().filter_map(|s| s.item.as_ref())
    }

    pub fn clear(&mut self) -> usize {
        self.slots.iter_mut().filter_map(|s| s.item.take()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ItemColor;

    fn grid() -> SlotGrid {
        SlotGrid::from_layout(&SlotGridLayout::grid(Point::new(10.0, 120.0), 3, 3, 6.0, Point::new(10.0, 132.0)))
    }

    #[test]
    fn test_slots_ranked_from_anchor() {
        let g = grid();
        assert_eq!(g.len(), 9);
        assert_eq!(g.slots[0].position, Point::new(10.0, 132.0));
        // farthest corner last
        assert_eq!(g.slots[8].position, Point::new(22.0, 120.0));
    }

    #[test]
    fn test_place_fills_in_priority_order() {
        let mut g = grid();
        let first = g.place(Item::with_id("a", ItemColor::Green, Point::ZERO)).unwrap();
        let second = g.place(Item::with_id("b", ItemColor::Green, Point::ZERO)).unwrap();
        assert_eq!((first, second), (0, 1));
        assert_eq!(g.slots[0].item.as_ref().unwrap().position, Point::new(10.0, 132.0));
    }

    #[test]
    fn test_full_grid_hands_item_back() {
        let mut g = grid();
        for i in 0..9 {
            g.place(Item::with_id(format!("i{i}"), ItemColor::Purple, Point::ZERO)).unwrap();
        }
        assert!(!g.has_room());
        let back = g.place(Item::with_id("x", ItemColor::Purple, Point::ZERO)).unwrap_err();
        assert_eq!(back.id, "x");
    }

    #[test]
    fn test_release_frees_slot_for_reuse() {
        let mut g = grid();
        g.place(Item::with_id("a", ItemColor::Green, Point::ZERO)).unwrap();
        assert_eq!(g.release(0).unwrap().id, "a");
        assert!(g.release(0).is_none());
        assert!(g.release(99).is_none());
        assert_eq!(g.place(Item::with_id("b", ItemColor::Green, Point::ZERO)), Ok(0));
    }

    #[test]
    fn test_empty_layout_has_no_room() {
        let mut g = SlotGrid::from_layout(&SlotGridLayout::default());
        assert!(g.is_empty());
        assert!(g.place(Item::with_id("a", ItemColor::Yellow, Point::ZERO)).is_err());
    }
}
