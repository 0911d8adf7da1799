//! Solid zones & goal wedges
//!
//! Regions an actor's footprint may never overlap.
//!
//! ## Resolvers
//! - `resolve_rect_overlaps`: push out of axis-aligned zones along the
//!   minimum-penetration axis, zone by zone in declaration order
//! - `resolve_goal_wedge`: single-step signed-distance push out of a
//!   right-triangular corner goal
//!
//! Neither resolver iterates to convergence. Stable and cheap enough for
//! drag updates; not a physics solver.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::geometry::{Footprint, Point};

/// Overlaps below this are treated as touching.
const OVERLAP_EPSILON: f64 = 1e-9;

// ============================================================================
// SolidZone
// ============================================================================

/// Axis-aligned rectangle in field coordinates (y down, `top < bottom`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SolidZone {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

impl SolidZone {
    pub const fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self { left, right, top, bottom }
    }

    pub fn center(&self) -> Point {
        Point::new((self.left + self.right) / 2.0, (self.top + self.bottom) / 2.0)
    }

    /// Overlap extents `(x, y)` with the box `[min, max]`, if the interiors
    /// overlap. Touching edges are not an overlap.
    pub fn overlap_with(&self, min: Point, max: Point) -> Option<(f64, f64)> {
        let overlap_x = max.x.min(self.right) - min.x.max(self.left);
        let overlap_y = max.y.min(self.bottom) - min.y.max(self.top);
        (overlap_x > OVERLAP_EPSILON && overlap_y > OVERLAP_EPSILON).then_some((overlap_x, overlap_y))
    }

    pub fn overlaps_footprint(&self, footprint: &Footprint) -> bool {
        let (min, max) = footprint.aabb();
        self.overlap_with(min, max).is_some()
    }
}

/// Minimum-translation push out of each overlapping zone, in order.
/// Returns the corrected footprint centre.
pub fn resolve_rect_overlaps(footprint: &Footprint, zones: &[SolidZone]) -> Point {
    let mut position = footprint.position;

    for zone in zones {
        let (min, max) = footprint.at(position).aabb();
        let Some((overlap_x, overlap_y)) = zone.overlap_with(min, max) else {
            continue;
        };

        let center = zone.center();
        if overlap_x < overlap_y {
            position.x += if position.x < center.x { -overlap_x } else { overlap_x };
        } else {
            position.y += if position.y < center.y { -overlap_y } else { overlap_y };
        }
    }

    position
}

pub fn overlaps_any_zone(footprint: &Footprint, zones: &[SolidZone]) -> bool {
    zones.iter().any(|zone| zone.overlaps_footprint(footprint))
}

// ============================================================================
// GoalWedge
// ============================================================================

/// Right-triangular goal in a field corner.
///
/// Normalized coordinates: `u = (x - corner.x) / extent_x`,
/// `v = (y - corner.y) / extent_y`; the wedge is `u ≥ 0, v ≥ 0, u + v < 1`.
/// Signed extents pick the corner orientation, so the two alliance goals
/// are the same shape mirrored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct GoalWedge {
    pub corner: Point,
    pub extent_x: f64,
    pub extent_y: f64,
}

impl GoalWedge {
    pub const fn new(corner: Point, extent_x: f64, extent_y: f64) -> Self {
        Self { corner, extent_x, extent_y }
    }

    #[inline]
    fn normalized(&self, p: Point) -> (f64, f64) {
        ((p.x - self.corner.x) / self.extent_x, (p.y - self.corner.y) / self.extent_y)
    }

    /// How far (in normalized units) the footprint's nearest corner falls
    /// short of the hypotenuse. `None` when the footprint is clear.
    pub fn shortfall(&self, footprint: &Footprint) -> Option<f64> {
        let uv = footprint.corners().map(|c| self.normalized(c));

        let u_min = uv.iter().map(|p| p.0).fold(f64::INFINITY, f64::min);
        let u_max = uv.iter().map(|p| p.0).fold(f64::NEG_INFINITY, f64::max);
        let v_min = uv.iter().map(|p| p.1).fold(f64::INFINITY, f64::min);
        let v_max = uv.iter().map(|p| p.1).fold(f64::NEG_INFINITY, f64::max);

        // footprint must reach into the wedge's bounding square
        if u_max <= 0.0 || v_max <= 0.0 || u_min >= 1.0 || v_min >= 1.0 {
            return None;
        }

        let nearest = uv.iter().map(|(u, v)| u + v).fold(f64::INFINITY, f64::min);
        let shortfall = 1.0 - nearest;
        (shortfall > OVERLAP_EPSILON).then_some(shortfall)
    }

    /// Outward displacement that puts the nearest corner on the hypotenuse.
    /// Zero penetration gives zero displacement.
    pub fn push_vector(&self, shortfall: f64) -> (f64, f64) {
        // gradient of (u + v) in field space
        let gx = 1.0 / self.extent_x;
        let gy = 1.0 / self.extent_y;
        let g2 = gx * gx + gy * gy;
        (gx * shortfall / g2, gy * shortfall / g2)
    }
}

/// Single-step push out of one wedge. Returns the corrected centre.
pub fn resolve_goal_wedge(footprint: &Footprint, wedge: &GoalWedge) -> Point {
    match wedge.shortfall(footprint) {
        Some(shortfall) => {
            let (dx, dy) = wedge.push_vector(shortfall);
            footprint.position.offset(dx, dy)
        }
        None => footprint.position,
    }
}

/// Applies every wedge independently, in order.
pub fn resolve_goal_wedges(footprint: &Footprint, wedges: &[GoalWedge]) -> Point {
    wedges
        .iter()
        .fold(footprint.position, |position, wedge| resolve_goal_wedge(&footprint.at(position), wedge))
}

pub fn penetrates_any_wedge(footprint: &Footprint, wedges: &[GoalWedge]) -> bool {
    wedges.iter().any(|wedge| wedge.shortfall(footprint).is_some())
}
