//! Perimeter Extraction Configuration

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Bitmap → polygon tuning.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Validate)]
pub struct PerimeterConfig {
    /// Per-channel distance from the background colour still counted as
    /// background (default: 40)
    pub color_threshold: u8,
    /// Douglas-Peucker tolerance in field units (default: 1.5)
    #[validate(range(min = 0.0))]
    pub simplify_epsilon: f64,
    /// Trace step guard, as a multiple of the canvas cell count (default: 4)
    #[validate(range(min = 1))]
    pub iteration_factor: usize,
}

impl Default for PerimeterConfig {
    fn default() -> Self {
        Self { color_threshold: 40, simplify_epsilon: 1.5, iteration_factor: 4 }
    }
}
