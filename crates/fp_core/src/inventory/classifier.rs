//! Bounded classifier / goal container
//!
//! Two FIFO stores: `primary` fills first, then `extension`. Anything beyond
//! both is handed back to the caller untouched.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::engine::config::ClassifierConfig;
use crate::models::{Item, ItemColor};

/// Which store an inserted item landed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Store {
    Primary,
    Extension,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Classifier {
    /// Oldest first
    pub primary: Vec<Item>,
    #[serde(default)]
    pub extension: Vec<Item>,
}

impl Classifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.primary.len() + self.extension.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primary.is_empty() && self.extension.is_empty()
    }

    pub fn is_full(&self, config: &ClassifierConfig) -> bool {
        self.primary.len() >= config.max_capacity && self.extension.len() >= config.extension_capacity
    }

    /// Primary if room, else extension if room, else the item comes back.
    pub fn insert(&mut self, mut item: Item, config: &ClassifierConfig) -> Result<Store, Item> {
        item.held_by = None;
        if self.primary.len() < config.max_capacity {
            self.primary.push(item);
            Ok(Store::Primary)
        } else if self.extension.len() < config.extension_capacity {
            self.extension.push(item);
            Ok(Store::Extension)
        } else {
            Err(item)
        }
    }

    pub fn pop_oldest(&mut self) -> Option<Item> {
        if self.primary.is_empty() {
            None
        } else {
            Some(self.primary.remove(0))
        }
    }

    /// Empties primary, oldest first. Extension is left alone.
    pub fn drain_primary(&mut self) -> Vec<Item> {
        std::mem::take(&mut self.primary)
    }

    /// Drops both stores. Returns how many items were discarded.
    pub fn clear(&mut self) -> usize {
        let discarded = self.len();
        self.primary.clear();
        self.extension.clear();
        discarded
    }

    /// Removes up to `limit` of the named extension items, in the order
    /// they sit in the store. Unknown ids are skipped.
    pub fn take_from_extension(&mut self, ids: &[String], limit: usize) -> Vec<Item> {
        let mut taken = Vec::new();
        let mut kept = Vec::with_capacity(self.extension.len());

        for item in self.extension.drain(..) {
            if taken.len() < limit && ids.contains(&item.id) {
                taken.push(item);
            } else {
                kept.push(item);
            }
        }

        self.extension = kept;
        taken
    }

    pub fn primary_colors(&self) -> impl Iterator<Item = ItemColor> + '_ {
        self.primary.iter().map(|item| item.color)
    }

    /// True if the stores respect `config`.
    pub fn within_capacity(&self, config: &ClassifierConfig) -> bool {
        self.primary.len() <= config.max_capacity && self.extension.len() <= config.extension_capacity
    }
}
