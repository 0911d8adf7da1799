use std::collections::HashSet;

use schemars::schema::RootSchema;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::error::SnapshotError;
use super::SNAPSHOT_VERSION;
use crate::engine::config::{FieldConfig, GameVariant};
use crate::inventory::{InventorySystem, Motif};
use crate::models::{Alliance, Item, Robot};

/// Plain-JSON session export. Field names follow the data model.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, JsonSchema)]
pub struct SessionSnapshot {
    /// Snapshot format version for migration
    pub version: u32,

    /// Export timestamp (unix milliseconds)
    #[serde(default)]
    pub timestamp: u64,

    #[serde(default)]
    pub variant: GameVariant,

    #[serde(default)]
    pub robots: Vec<Robot>,

    /// Items lying on the field
    #[serde(default)]
    pub floor: Vec<Item>,

    /// Classifiers, slot grids, overflow counters, raw scores
    #[serde(default)]
    pub inventory: InventorySystem,

    /// Motif tokens, e.g. "GPP"
    #[serde(default)]
    pub motif: String,
}

impl SessionSnapshot {
    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parses without migrating. Future versions are rejected here.
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        let snapshot: SessionSnapshot = serde_json::from_str(json)?;
        if snapshot.version > SNAPSHOT_VERSION {
            return Err(SnapshotError::VersionMismatch { found: snapshot.version, expected: SNAPSHOT_VERSION });
        }
        Ok(snapshot)
    }

    /// Items in every container, robots' holds included.
    pub fn item_count(&self) -> usize {
        self.floor.len()
            + self.robots.iter().map(|r| r.held.len()).sum::<usize>()
            + self.inventory.item_count()
    }

    /// Rewrites every `held_by` from actual ownership: the holding robot's
    /// id for carried items, `None` everywhere else. Returns how many links
    /// changed.
    pub fn relink_holders(&mut self) -> usize {
        let mut changed = 0;
        for Robot { id, held, .. } in self.robots.iter_mut() {
            changed += held.iter_mut().map(|item| relink(item, Some(&*id))).filter(|&c| c).count();
        }
        changed += self.floor.iter_mut().map(|item| relink(item, None)).filter(|&c| c).count();

        for alliance in Alliance::ALL {
            let classifier = self.inventory.classifiers.get_mut(alliance);
            let stored = classifier.primary.iter_mut().chain(classifier.extension.iter_mut());
            changed += stored.map(|item| relink(item, None)).filter(|&c| c).count();

            let grid = self.inventory.slot_grids.get_mut(alliance);
            let slotted = grid.slots.iter_mut().filter_map(|slot| slot.item.as_mut());
            changed += slotted.map(|item| relink(item, None)).filter(|&c| c).count();
        }
        changed
    }

    /// Shape checks against the session's configuration.
    pub fn validate(&self, config: &FieldConfig) -> Result<(), SnapshotError> {
        if self.version != SNAPSHOT_VERSION {
            return Err(SnapshotError::VersionMismatch { found: self.version, expected: SNAPSHOT_VERSION });
        }

        if self.variant != config.variant {
            return Err(SnapshotError::VariantMismatch {
                found: self.variant.to_string(),
                expected: config.variant.to_string(),
            });
        }

        let classifier = &config.classifier;
        for alliance in Alliance::ALL {
            let stores = self.inventory.classifier(alliance);
            if stores.primary.len() > classifier.max_capacity {
                return Err(SnapshotError::CapacityExceeded {
                    container: format!("{alliance} primary"),
                    len: stores.primary.len(),
                    capacity: classifier.max_capacity,
                });
            }
            if stores.extension.len() > classifier.extension_capacity {
                return Err(SnapshotError::CapacityExceeded {
                    container: format!("{alliance} extension"),
                    len: stores.extension.len(),
                    capacity: classifier.extension_capacity,
                });
            }

            let expected = config.zones.slot_grids.get(alliance).positions.len();
            let found = self.inventory.slot_grid(alliance).len();
            if found != expected {
                return Err(SnapshotError::GridSize { alliance, found, expected });
            }
        }

        for robot in &self.robots {
            if robot.held.len() > robot.capacity {
                return Err(SnapshotError::CapacityExceeded {
                    container: robot.id.clone(),
                    len: robot.held.len(),
                    capacity: robot.capacity,
                });
            }
        }

        let mut ids = HashSet::new();
        let item_ids = self
            .floor
            .iter()
            .chain(self.robots.iter().flat_map(|r| r.held.iter()))
            .chain(self.inventory.items())
            .map(|item| &item.id);
        for id in self.robots.iter().map(|r| &r.id).chain(item_ids) {
            if !ids.insert(id) {
                return Err(SnapshotError::DuplicateId(id.clone()));
            }
        }

        Motif::parse(&self.motif).map_err(|e| SnapshotError::InvalidMotif(e.to_string()))?;

        Ok(())
    }
}

/// True when the link had to change.
fn relink(item: &mut Item, holder: Option<&String>) -> bool {
    if item.held_by.as_ref() == holder {
        return false;
    }
    item.held_by = holder.cloned();
    true
}

/// JSON schema of the snapshot format.
pub fn snapshot_schema() -> RootSchema {
    schemars::schema_for!(SessionSnapshot)
}

pub fn current_timestamp() -> u64 {
    (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as u64
}
