use thiserror::Error;

/// Errors raised by session operations.
///
/// Capacity and containment problems are never errors: a full classifier or
/// an out-of-bounds drag is an expected steady-state condition and is
/// reported through return values instead.
#[derive(Error, Debug)]
pub enum FieldError {
    #[error("Unknown actor: {0}")]
    UnknownActor(String),

    #[error("Unknown item: {0}")]
    UnknownItem(String),

    #[error("Invalid motif token '{token}' in \"{motif}\"")]
    InvalidMotif { motif: String, token: char },

    #[error("Invalid slot {slot} (grid has {len} slots)")]
    InvalidSlot { slot: usize, len: usize },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] validator::ValidationErrors),

    #[error("Snapshot error: {0}")]
    Snapshot(#[from] crate::save::SnapshotError),
}

impl FieldError {
    /// Whether the caller can keep using the session unchanged.
    pub fn is_recoverable(&self) -> bool {
        match self {
            FieldError::UnknownActor(_) | FieldError::UnknownItem(_) => true,
            FieldError::InvalidMotif { .. } | FieldError::InvalidSlot { .. } => true,
            FieldError::Snapshot(_) => true, // prior state is preserved on import failure
            FieldError::InvalidConfig(_) => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, FieldError>;
