//! Classifier / Goal Configuration

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Per-alliance container bounds and point values.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Validate)]
pub struct ClassifierConfig {
    // === Capacity ===
    /// Primary store size (FTC: 9)
    #[validate(range(min = 1))]
    pub max_capacity: usize,
    /// Extension store size, filled once primary is full (FTC: 6)
    pub extension_capacity: usize,

    // === Scoring ===
    /// Raw points per item entering primary (FTC: 3)
    pub primary_points: u32,
    /// Raw points per item entering extension (FTC: 1)
    pub extension_points: u32,
    /// Points per primary position matching the motif (FTC: 2)
    pub motif_points: u32,
    /// Motif used by a fresh session, e.g. "GPP". Empty disables motif scoring.
    #[serde(default)]
    pub default_motif: String,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            max_capacity: 9,
            extension_capacity: 6,

            primary_points: 3,
            extension_points: 1,
            motif_points: 2,
            default_motif: "GPP".to_string(),
        }
    }
}

impl ClassifierConfig {
    /// FRC hub: one large store, one point per fuel, no motif.
    pub fn frc() -> Self {
        Self {
            max_capacity: 60,
            extension_capacity: 0,

            primary_points: 1,
            extension_points: 0,
            motif_points: 0,
            default_motif: String::new(),
        }
    }

    /// Total items one alliance can hold before rejecting.
    pub fn total_capacity(&self) -> usize {
        self.max_capacity + self.extension_capacity
    }
}
