//! Setup Presets
//!
//! Starting layout applied by `Session::apply_setup`. Replaces every robot
//! and floor item; containers are emptied.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::geometry::Point;
use crate::models::{Alliance, ItemColor};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RobotStart {
    pub alliance: Alliance,
    pub position: Point,
    #[serde(default)]
    pub rotation_deg: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ItemStart {
    pub color: ItemColor,
    pub position: Point,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SetupPreset {
    #[serde(default)]
    pub robots: Vec<RobotStart>,
    #[serde(default)]
    pub items: Vec<ItemStart>,
}

impl SetupPreset {
    /// Two robots per alliance and three spike-mark rows per side.
    pub fn ftc() -> Self {
        use crate::models::ItemColor::{Green as G, Purple as P};

        let robots = vec![
            RobotStart { alliance: Alliance::Blue, position: Point::new(56.0, 126.0), rotation_deg: 0.0 },
            RobotStart { alliance: Alliance::Blue, position: Point::new(56.0, 100.0), rotation_deg: 0.0 },
            RobotStart { alliance: Alliance::Red, position: Point::new(88.0, 126.0), rotation_deg: 0.0 },
            RobotStart { alliance: Alliance::Red, position: Point::new(88.0, 100.0), rotation_deg: 0.0 },
        ];

        // rows nearest the goals first
        let rows: [(f64, [ItemColor; 3]); 3] =
            [(48.0, [P, P, G]), (72.0, [P, G, P]), (96.0, [G, P, P])];
        let columns = [[20.0, 26.0, 32.0], [112.0, 118.0, 124.0]];

        let items = columns
            .iter()
            .flat_map(|xs| {
                rows.iter().flat_map(move |(y, colors)| {
                    xs.iter()
                        .zip(colors)
                        .map(move |(&x, &color)| ItemStart { color, position: Point::new(x, *y) })
                })
            })
            .collect();

        Self { robots, items }
    }

    /// Two robots per alliance and a block of fuel in the neutral zone.
    pub fn frc() -> Self {
        let robots = vec![
            RobotStart { alliance: Alliance::Blue, position: Point::new(200.0, 200.0), rotation_deg: 0.0 },
            RobotStart { alliance: Alliance::Blue, position: Point::new(200.0, 434.0), rotation_deg: 0.0 },
            RobotStart { alliance: Alliance::Red, position: Point::new(1102.0, 200.0), rotation_deg: 0.0 },
            RobotStart { alliance: Alliance::Red, position: Point::new(1102.0, 434.0), rotation_deg: 0.0 },
        ];

        let items = (0..4)
            .flat_map(|row| {
                (0..5).map(move |col| ItemStart {
                    color: ItemColor::Yellow,
                    position: Point::new(591.0 + col as f64 * 30.0, 272.0 + row as f64 * 30.0),
                })
            })
            .collect();

        Self { robots, items }
    }
}
