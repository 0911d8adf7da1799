// Session snapshot export/import
// Plain JSON with versioning, migration and validation before an atomic swap

pub mod error;
pub mod format;
pub mod migration;

pub use error::SnapshotError;
pub use format::{current_timestamp, snapshot_schema, SessionSnapshot};
pub use migration::{migrate_snapshot, needs_migration};

use crate::engine::config::FieldConfig;

pub const SNAPSHOT_VERSION: u32 = 1;

/// Parse → migrate → relink `held_by` → validate. Nothing is applied
/// here; the caller swaps state only on `Ok`.
pub fn load_snapshot(json: &str, config: &FieldConfig) -> Result<SessionSnapshot, SnapshotError> {
    let snapshot = SessionSnapshot::from_json(json)?;
    let mut snapshot = migrate_snapshot(snapshot, config)?;
    let relinked = snapshot.relink_holders();
    if relinked > 0 {
        log::warn!("snapshot had {relinked} stale held_by links; rebuilt from ownership");
    }
    snapshot.validate(config)?;
    Ok(snapshot)
}
