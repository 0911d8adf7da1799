//! Scoring Zones Configuration
//!
//! Static field features: solid obstacles, corner goals, alliance magnets
//! (bases), gate levers and human-player slot grids.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::engine::solid_zone::{GoalWedge, SolidZone};
use crate::geometry::Point;
use crate::models::PerAlliance;

/// Human-player grid: slot centres plus the anchor that ranks them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SlotGridLayout {
    /// Slots nearest to the anchor are filled first.
    pub anchor: Point,
    pub positions: Vec<Point>,
}

impl SlotGridLayout {
    /// `cols x rows` grid starting at `origin`, `spacing` apart.
    pub fn grid(origin: Point, cols: usize, rows: usize, spacing: f64, anchor: Point) -> Self {
        let positions = (0..rows)
            .flat_map(|row| {
                (0..cols).map(move |col| origin.offset(col as f64 * spacing, row as f64 * spacing))
            })
            .collect();
        Self { anchor, positions }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct ScoringZones {
    #[serde(default)]
    pub solid_zones: Vec<SolidZone>,
    #[serde(default)]
    pub goal_wedges: Vec<GoalWedge>,
    /// Base/park point per alliance.
    #[serde(default)]
    pub magnets: PerAlliance<Option<Point>>,
    /// Gate lever per alliance; a robot touching it empties the classifier.
    #[serde(default)]
    pub levers: PerAlliance<Option<SolidZone>>,
    #[serde(default)]
    pub slot_grids: PerAlliance<SlotGridLayout>,
}

impl ScoringZones {
    /// DECODE-style field, 144 x 144 in.
    pub fn ftc() -> Self {
        Self {
            solid_zones: vec![
                // classifier ramps along the side walls
                SolidZone::new(0.0, 30.0, 6.0, 60.0),
                SolidZone::new(138.0, 30.0, 144.0, 60.0),
            ],
            goal_wedges: vec![
                GoalWedge::new(Point::new(0.0, 0.0), 27.0, 27.0),
                GoalWedge::new(Point::new(144.0, 0.0), -27.0, 27.0),
            ],
            magnets: PerAlliance::new(Some(Point::new(106.0, 126.0)), Some(Point::new(38.0, 126.0))),
            levers: PerAlliance::new(
                Some(SolidZone::new(138.0, 66.0, 144.0, 76.0)),
                Some(SolidZone::new(0.0, 66.0, 6.0, 76.0)),
            ),
            slot_grids: PerAlliance::new(
                SlotGridLayout::grid(Point::new(122.0, 120.0), 3, 3, 6.0, Point::new(134.0, 132.0)),
                SlotGridLayout::grid(Point::new(10.0, 120.0), 3, 3, 6.0, Point::new(10.0, 132.0)),
            ),
        }
    }

    /// REBUILT-style field in image pixels (1302 x 634).
    pub fn frc() -> Self {
        Self {
            solid_zones: vec![
                // hubs
                SolidZone::new(300.0, 287.0, 360.0, 347.0),
                SolidZone::new(942.0, 287.0, 1002.0, 347.0),
            ],
            goal_wedges: Vec::new(),
            magnets: PerAlliance::new(Some(Point::new(1222.0, 317.0)), Some(Point::new(80.0, 317.0))),
            levers: PerAlliance::default(),
            slot_grids: PerAlliance::default(),
        }
    }
}
