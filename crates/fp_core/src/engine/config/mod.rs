//! # Field Configuration
//!
//! Every tunable of a field variant in one place: dimensions, motion
//! tolerances, perimeter extraction, classifier bounds, static zones and
//! the setup preset.
//!
//! ## Presets
//! - `FieldConfig::ftc()`: 144 in square field, 9 + 6 classifier, motif scoring
//! - `FieldConfig::frc()`: 1302 x 634 px field, single hub store, no motif
//!
//! ## Usage
//! ```rust
//! use fp_core::engine::config::{FieldConfig, GameVariant};
//!
//! let ftc = FieldConfig::default();
//! let frc = FieldConfig::for_variant(GameVariant::Frc);
//! assert!(frc.geometry.width > ftc.geometry.width);
//! ```

mod classifier_config;
mod geometry_config;
mod perimeter_config;
mod setup_config;
mod zone_config;

pub use classifier_config::ClassifierConfig;
pub use geometry_config::FieldGeometry;
pub use perimeter_config::PerimeterConfig;
pub use setup_config::{ItemStart, RobotStart, SetupPreset};
pub use zone_config::{ScoringZones, SlotGridLayout};

use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum GameVariant {
    #[default]
    Ftc,
    Frc,
}

impl fmt::Display for GameVariant {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            GameVariant::Ftc => write!(f, "ftc"),
            GameVariant::Frc => write!(f, "frc"),
        }
    }
}

impl FromStr for GameVariant {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ftc" => Ok(GameVariant::Ftc),
            "frc" => Ok(GameVariant::Frc),
            other => Err(format!("unknown game variant: {other}")),
        }
    }
}

/// Complete configuration of one field variant.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, JsonSchema)]
pub struct FieldConfig {
    pub variant: GameVariant,
    #[validate]
    pub geometry: FieldGeometry,
    #[validate]
    #[serde(default)]
    pub perimeter: PerimeterConfig,
    #[validate]
    pub classifier: ClassifierConfig,
    #[serde(default)]
    pub zones: ScoringZones,
    #[serde(default)]
    pub setup: SetupPreset,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self::ftc()
    }
}

impl FieldConfig {
    pub fn ftc() -> Self {
        Self {
            variant: GameVariant::Ftc,
            geometry: FieldGeometry::default(),
            perimeter: PerimeterConfig::default(),
            classifier: ClassifierConfig::default(),
            zones: ScoringZones::ftc(),
            setup: SetupPreset::ftc(),
        }
    }

    pub fn frc() -> Self {
        let mut cfg = Self {
            variant: GameVariant::Frc,
            geometry: FieldGeometry::frc(),
            perimeter: PerimeterConfig::default(),
            classifier: ClassifierConfig::frc(),
            zones: ScoringZones::frc(),
            setup: SetupPreset::frc(),
        };
        // field image is ~9x the FTC resolution
        cfg.perimeter.simplify_epsilon = 4.0;
        cfg
    }

    pub fn for_variant(variant: GameVariant) -> Self {
        match variant {
            GameVariant::Ftc => Self::ftc(),
            GameVariant::Frc => Self::frc(),
        }
    }

    /// JSON schema of the configuration file format.
    pub fn schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(FieldConfig)
    }

    /// Range-checks every numeric field.
    pub fn ensure_valid(&self) -> Result<()> {
        self.validate()?;
        Ok(())
    }
}

// ========== Tests ==========

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Alliance;

    #[test]
    fn test_default_is_ftc() {
        let cfg = FieldConfig::default();
        assert_eq!(cfg.variant, GameVariant::Ftc);
        assert_eq!(cfg.classifier.max_capacity, 9);
        assert_eq!(cfg.classifier.extension_capacity, 6);
        assert!((cfg.geometry.width - 144.0).abs() < 1e-9);
    }

    #[test]
    fn test_presets_validate() {
        assert!(FieldConfig::ftc().ensure_valid().is_ok());
        assert!(FieldConfig::frc().ensure_valid().is_ok());
    }

    #[test]
    fn test_frc_has_no_motif() {
        let frc = FieldConfig::frc();
        assert_eq!(frc.classifier.motif_points, 0);
        assert!(frc.classifier.default_motif.is_empty());
        assert!(frc.zones.goal_wedges.is_empty());
        assert!(frc.classifier.total_capacity() > FieldConfig::ftc().classifier.total_capacity());
    }

    #[test]
    fn test_invalid_margin_rejected() {
        let mut cfg = FieldConfig::ftc();
        cfg.geometry.margin = 80.0;
        assert!(cfg.ensure_valid().is_err());
    }

    #[test]
    fn test_invalid_step_rejected() {
        let mut cfg = FieldConfig::ftc();
        cfg.geometry.max_step = 0.0;
        let err = cfg.ensure_valid().unwrap_err();
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_variant_parse() {
        assert_eq!("FTC".parse::<GameVariant>().unwrap(), GameVariant::Ftc);
        assert_eq!("frc".parse::<GameVariant>().unwrap(), GameVariant::Frc);
        assert!("vex".parse::<GameVariant>().is_err());
        assert_eq!(GameVariant::Frc.to_string(), "frc");
    }

    #[test]
    fn test_ftc_slot_grids_are_three_by_three() {
        let zones = ScoringZones::ftc();
        for alliance in Alliance::ALL {
            assert_eq!(zones.slot_grids.get(alliance).positions.len(), 9);
            assert!(zones.magnets.get(alliance).is_some());
        }
    }

    #[test]
    fn test_ftc_setup_rows() {
        let setup = SetupPreset::ftc();
        assert_eq!(setup.robots.len(), 4);
        assert_eq!(setup.items.len(), 18);
    }

    #[test]
    fn test_config_serialization() {
        let cfg = FieldConfig::ftc();
        let json = serde_json::to_string(&cfg).unwrap();
        let parsed: FieldConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.variant, cfg.variant);
        assert_eq!(parsed.zones.goal_wedges, cfg.zones.goal_wedges);
        assert_eq!(parsed.setup, cfg.setup);
    }
}
