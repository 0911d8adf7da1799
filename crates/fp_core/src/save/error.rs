use thiserror::Error;

use crate::models::Alliance;

/// Snapshot import failures. Any of these leaves the session untouched.
#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Version mismatch: found {found}, expected {expected}")]
    VersionMismatch { found: u32, expected: u32 },

    #[error("Snapshot is for {found}, session is {expected}")]
    VariantMismatch { found: String, expected: String },

    #[error("Duplicate id: {0}")]
    DuplicateId(String),

    #[error("{container} holds {len} items (capacity {capacity})")]
    CapacityExceeded { container: String, len: usize, capacity: usize },

    #[error("{alliance} slot grid has {found} slots, expected {expected}")]
    GridSize { alliance: Alliance, found: usize, expected: usize },

    #[error("Invalid motif: {0}")]
    InvalidMotif(String),
}

impl SnapshotError {
    pub fn is_recoverable(&self) -> bool {
        match self {
            SnapshotError::Json(_) => false,
            SnapshotError::VersionMismatch { .. } => false,
            SnapshotError::VariantMismatch { .. } => true, // retry with the other preset
            SnapshotError::DuplicateId(_) => false,
            SnapshotError::CapacityExceeded { .. } => false,
            SnapshotError::GridSize { .. } => true,
            SnapshotError::InvalidMotif(_) => false,
        }
    }
}
