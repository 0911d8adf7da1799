//! Inventory state machine
//!
//! Both alliances' classifiers, human-player grids, overflow counters and
//! the raw score ledger. Every transfer moves an `Item` value between
//! containers; the only ways an item leaves the system are `clear_all`
//! (discard) and overflow (destroyed, but counted).
//!
//! ## Placement order for Empty / PopOne
//! 1. Own alliance slot grid, nearest empty slot to its anchor
//! 2. Other alliance slot grid
//! 3. Own overflow counter

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::classifier::{Classifier, Store};
use super::collection::pick_up;
use super::scoring::{Motif, ScoreLedger};
use super::slot_grid::SlotGrid;
use crate::engine::config::{ClassifierConfig, ScoringZones};
use crate::error::{FieldError, Result};
use crate::models::{Alliance, Item, PerAlliance, Robot};

/// Where a drained primary item ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    OwnGrid(usize),
    OtherGrid(usize),
    Overflow,
}

/// Tally of one Empty.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EmptyReport {
    pub own_grid: usize,
    pub other_grid: usize,
    pub overflowed: usize,
}

impl EmptyReport {
    pub fn total(&self) -> usize {
        self.own_grid + self.other_grid + self.overflowed
    }

    fn record(&mut self, placement: Placement) {
        match placement {
            Placement::OwnGrid(_) => self.own_grid += 1,
            Placement::OtherGrid(_) => self.other_grid += 1,
            Placement::Overflow => self.overflowed += 1,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct InventorySystem {
    pub classifiers: PerAlliance<Classifier>,
    #[serde(default)]
    pub slot_grids: PerAlliance<SlotGrid>,
    /// Items destroyed because no grid slot was free
    #[serde(default)]
    pub overflow: PerAlliance<usize>,
    #[serde(default)]
    pub scores: ScoreLedger,
}

impl InventorySystem {
    pub fn new(zones: &ScoringZones) -> Self {
        Self {
            classifiers: PerAlliance::default(),
            slot_grids: PerAlliance::new(
                SlotGrid::from_layout(&zones.slot_grids.red),
                SlotGrid::from_layout(&zones.slot_grids.blue),
            ),
            overflow: PerAlliance::default(),
            scores: ScoreLedger::default(),
        }
    }

    pub fn classifier(&self, alliance: Alliance) -> &Classifier {
        self.classifiers.get(alliance)
    }

    pub fn slot_grid(&self, alliance: Alliance) -> &SlotGrid {
        self.slot_grids.get(alliance)
    }

    // ========================================================================
    // Insert
    // ========================================================================

    /// Insert into the alliance classifier and bank raw points.
    /// A rejected item is handed back unchanged.
    pub fn insert(&mut self, alliance: Alliance, item: Item, config: &ClassifierConfig) -> std::result::Result<Store, Item> {
        let store = self.classifiers.get_mut(alliance).insert(item, config)?;
        let points = match store {
            Store::Primary => config.primary_points,
            Store::Extension => config.extension_points,
        };
        self.scores.add(alliance, points);
        Ok(store)
    }

    /// Inserts in order until both stores are full; returns the remainder.
    pub fn insert_many(&mut self, alliance: Alliance, items: Vec<Item>, config: &ClassifierConfig) -> Vec<Item> {
        let mut remainder = Vec::new();
        let mut items = items.into_iter();

        for item in items.by_ref() {
            if let Err(rejected) = self.insert(alliance, item, config) {
                remainder.push(rejected);
                break;
            }
        }
        remainder.extend(items);

        if !remainder.is_empty() {
            log::debug!("{alliance} classifier full, {} items handed back", remainder.len());
        }
        remainder
    }

    // ========================================================================
    // Empty / PopOne / ClearAll
    // ========================================================================

    fn place(&mut self, alliance: Alliance, item: Item) -> Placement {
        let (own, other) = self.slot_grids.split_mut(alliance);
        let item = match own.place(item) {
            Ok(slot) => return Placement::OwnGrid(slot),
            Err(item) => item,
        };
        match other.place(item) {
            Ok(slot) => Placement::OtherGrid(slot),
            Err(_destroyed) => {
                *self.overflow.get_mut(alliance) += 1;
                Placement::Overflow
            }
        }
    }

    /// Drains primary into the grids. Extension is untouched.
    pub fn empty(&mut self, alliance: Alliance) -> EmptyReport {
        let drained = self.classifiers.get_mut(alliance).drain_primary();
        let mut report = EmptyReport::default();
        for item in drained {
            let placement = self.place(alliance, item);
            report.record(placement);
        }

        if report.overflowed > 0 {
            log::debug!("{alliance} empty: {} items overflowed", report.overflowed);
        }
        report
    }

    /// Places the oldest primary item. `None` when primary is empty.
    pub fn pop_one(&mut self, alliance: Alliance) -> Option<Placement> {
        let item = self.classifiers.get_mut(alliance).pop_oldest()?;
        Some(self.place(alliance, item))
    }

    /// Discards both stores. No placement, no overflow count.
    pub fn clear_all(&mut self, alliance: Alliance) -> usize {
        self.classifiers.get_mut(alliance).clear()
    }

    // ========================================================================
    // Robots & slots
    // ========================================================================

    /// Moves named extension items into the robot's hold, limited by its
    /// remaining capacity. Returns how many moved.
    pub fn collect_from_extension(&mut self, robot: &mut Robot, alliance: Alliance, item_ids: &[String]) -> usize {
        let taken = self.classifiers.get_mut(alliance).take_from_extension(item_ids, robot.remaining_capacity());
        let mut moved = 0;
        for item in taken {
            match pick_up(robot, item) {
                Ok(()) => moved += 1,
                // capacity was checked by the limit; put it back rather than lose it
                Err(item) => self.classifiers.get_mut(alliance).extension.push(item),
            }
        }
        moved
    }

    /// Takes the item out of a human-player slot.
    pub fn release_slot(&mut self, alliance: Alliance, slot: usize) -> Result<Item> {
        let grid = self.slot_grids.get_mut(alliance);
        let len = grid.len();
        grid.release(slot).ok_or(FieldError::InvalidSlot { slot, len })
    }

    // ========================================================================
    // Scores & accounting
    // ========================================================================

    pub fn raw_score(&self, alliance: Alliance) -> u32 {
        self.scores.raw(alliance)
    }

    /// Recomputed from the current primary order on every call.
    pub fn motif_score(&self, alliance: Alliance, motif: &Motif, config: &ClassifierConfig) -> u32 {
        let matches = motif.matches(self.classifier(alliance).primary_colors());
        (matches as u32).saturating_mul(config.motif_points)
    }

    pub fn reset_scores(&mut self) {
        self.scores.reset();
    }

    /// Items inside classifiers and grids (excludes overflow).
    pub fn item_count(&self) -> usize {
        self.classifiers.iter().map(|(_, c)| c.len()).sum::<usize>()
            + self.slot_grids.iter().map(|(_, g)| g.occupied()).sum::<usize>()
    }

    pub fn overflow_total(&self) -> usize {
        self.overflow.red + self.overflow.blue
    }

    /// Every item currently stored, for id bookkeeping.
    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.classifiers
            .iter()
            .flat_map(|(_, c)| c.primary.iter().chain(c.extension.iter()))
            .chain(self.slot_grids.iter().flat_map(|(_, g)| g.items()))
    }

    /// Empties every container and zeroes counters and scores.
    pub fn reset(&mut self) {
        for alliance in Alliance::ALL {
            self.classifiers.get_mut(alliance).clear();
            self.slot_grids.get_mut(alliance).clear();
        }
        self.overflow = PerAlliance::default();
        self.scores.reset();
    }
}
