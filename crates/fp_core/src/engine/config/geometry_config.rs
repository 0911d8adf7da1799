//! Field Geometry Configuration

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Field dimensions and motion tolerances, in the variant's field unit.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Validate)]
#[validate(schema(function = "validate_margin"))]
pub struct FieldGeometry {
    // === Field ===
    /// Field width (FTC default: 144 in)
    #[validate(range(min = 1.0))]
    pub width: f64,
    /// Field height (FTC default: 144 in)
    #[validate(range(min = 1.0))]
    pub height: f64,
    /// Perimeter inset and fallback rectangle margin (default: 2)
    #[validate(range(min = 0.0))]
    pub margin: f64,

    // === Motion ===
    /// Longest single sub-step of a constrained move (default: 1)
    #[validate(range(min = 0.01))]
    pub max_step: f64,
    /// Magnet capture radius (default: 6)
    #[validate(range(min = 0.0))]
    pub snap_radius: f64,

    // === Actors ===
    /// Default robot footprint (default: 18 x 18)
    #[validate(range(min = 0.1))]
    pub robot_width: f64,
    #[validate(range(min = 0.1))]
    pub robot_height: f64,
    /// Items a robot can hold at once (default: 3)
    pub robot_capacity: usize,
    /// Floor items are constrained as a square of this side (default: 5)
    #[validate(range(min = 0.1))]
    pub ball_diameter: f64,
    /// collect_nearby reach from the robot centre (default: 14)
    #[validate(range(min = 0.0))]
    pub pickup_radius: f64,
}

impl Default for FieldGeometry {
    fn default() -> Self {
        Self {
            width: 144.0,
            height: 144.0,
            margin: 2.0,

            max_step: 1.0,
            snap_radius: 6.0,

            robot_width: 18.0,
            robot_height: 18.0,
            robot_capacity: 3,
            ball_diameter: 5.0,
            pickup_radius: 14.0,
        }
    }
}

impl FieldGeometry {
    pub fn frc() -> Self {
        Self {
            width: 1302.0,
            height: 634.0,
            margin: 10.0,

            max_step: 4.0,
            snap_radius: 20.0,

            robot_width: 60.0,
            robot_height: 60.0,
            robot_capacity: 40,
            ball_diameter: 15.0,
            pickup_radius: 45.0,
        }
    }
}

fn validate_margin(geometry: &FieldGeometry) -> Result<(), ValidationError> {
    if geometry.margin * 2.0 >= geometry.width.min(geometry.height) {
        return Err(ValidationError::new("margin_exceeds_field"));
    }
    Ok(())
}
