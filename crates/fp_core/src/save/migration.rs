use super::error::SnapshotError;
use super::format::SessionSnapshot;
use super::SNAPSHOT_VERSION;
use crate::engine::config::FieldConfig;
use crate::inventory::SlotGrid;
use crate::models::Alliance;

/// Migrate snapshot data from older versions to the current version
pub fn migrate_snapshot(mut snapshot: SessionSnapshot, config: &FieldConfig) -> Result<SessionSnapshot, SnapshotError> {
    let original_version = snapshot.version;

    snapshot = match snapshot.version {
        0 => migrate_v0_to_v1(snapshot, config),
        SNAPSHOT_VERSION => snapshot,
        found => return Err(SnapshotError::VersionMismatch { found, expected: SNAPSHOT_VERSION }),
    };

    snapshot.version = SNAPSHOT_VERSION;

    if original_version != SNAPSHOT_VERSION {
        log::info!("Migrated snapshot from version {} to {}", original_version, SNAPSHOT_VERSION);
    }

    Ok(snapshot)
}

/// v0 had no extension stores and no slot grids, and did not keep
/// `held_by` in sync.
fn migrate_v0_to_v1(mut snapshot: SessionSnapshot, config: &FieldConfig) -> SessionSnapshot {
    log::info!("Migrating snapshot from version 0 to 1");

    // 1. Missing grids become empty grids of the configured layout
    //    (extension lists are already defaulted by serde)
    for alliance in Alliance::ALL {
        let grid = snapshot.inventory.slot_grids.get_mut(alliance);
        if grid.is_empty() {
            *grid = SlotGrid::from_layout(config.zones.slot_grids.get(alliance));
        }
    }

    // 2. Rebuild held_by links from actual ownership
    let relinked = snapshot.relink_holders();
    log::debug!("relinked {relinked} held_by links");

    snapshot
}

/// Check if a snapshot needs migration
pub fn needs_migration(snapshot: &SessionSnapshot) -> bool {
    snapshot.version < SNAPSHOT_VERSION
}
