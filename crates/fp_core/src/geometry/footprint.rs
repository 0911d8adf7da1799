//! Oriented footprints and containment
//!
//! A footprint is the rotated rectangle an actor occupies on the field.
//! Containment needs both checks below: four corners inside is not enough
//! on a concave outline, where an edge can tunnel through a notch while
//! every corner sits in a different lobe.

use nalgebra::{Rotation2, Vector2};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::polygon::{point_in_polygon, segments_intersect};
use super::{Point, Polygon};

pub type Corners = [Point; 4];

/// Rotated rectangle centred on `position`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Footprint {
    pub position: Point,
    /// Degrees, clockwise on screen (y down)
    pub rotation_deg: f64,
    pub width: f64,
    pub height: f64,
}

impl Footprint {
    pub fn new(position: Point, rotation_deg: f64, width: f64, height: f64) -> Self {
        Self { position, rotation_deg, width, height }
    }

    /// Same shape and rotation, different centre.
    #[inline]
    pub fn at(&self, position: Point) -> Self {
        Self { position, ..*self }
    }

    /// Corners in order: (-w,-h), (+w,-h), (+w,+h), (-w,+h) before rotation.
    pub fn corners(&self) -> Corners {
        const SIGNS: [(f64, f64); 4] = [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)];
        let rotation = Rotation2::new(self.rotation_deg.to_radians());
        let half_w = self.width / 2.0;
        let half_h = self.height / 2.0;

        SIGNS.map(|(sx, sy)| {
            let offset = rotation * Vector2::new(sx * half_w, sy * half_h);
            self.position.offset(offset.x, offset.y)
        })
    }

    /// Closed edge list of the rotated rectangle.
    pub fn edges(&self) -> [(Point, Point); 4] {
        let c = self.corners();
        [(c[0], c[1]), (c[1], c[2]), (c[2], c[3]), (c[3], c[0])]
    }

    /// Axis-aligned bounds of the rotated rectangle: (min, max).
    pub fn aabb(&self) -> (Point, Point) {
        let c = self.corners();
        c[1..].iter().fold((c[0], c[0]), |(min, max), p| {
            (Point::new(min.x.min(p.x), min.y.min(p.y)), Point::new(max.x.max(p.x), max.y.max(p.y)))
        })
    }
}

/// True only if every corner is inside `polygon` and no footprint edge
/// touches or crosses a polygon edge.
pub fn is_footprint_inside(footprint: &Footprint, polygon: &Polygon) -> bool {
    if !polygon.is_usable() {
        return false;
    }

    let corners = footprint.corners();
    if !corners.iter().all(|&c| point_in_polygon(c, &polygon.points)) {
        return false;
    }

    !footprint
        .edges()
        .iter()
        .any(|&(a, b)| polygon.edges().any(|(p, q)| segments_intersect(a, b, p, q)))
}

// ============================================================================
// Separating axis overlap
// ============================================================================

fn project(corners: &Corners, axis: Vector2<f64>) -> (f64, f64) {
    corners.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), c| {
        let dot = c.x * axis.x + c.y * axis.y;
        (lo.min(dot), hi.max(dot))
    })
}

/// True if the interiors of two footprints overlap.
/// Touching (shared edge or corner) is NOT counted as overlap.
pub fn footprints_overlap(a: &Footprint, b: &Footprint) -> bool {
    let ca = a.corners();
    let cb = b.corners();
    for corners in [&ca, &cb] {
        // opposite edges are parallel; two normals per rectangle suffice
        for i in 0..2 {
            let edge = Vector2::new(corners[i + 1].x - corners[i].x, corners[i + 1].y - corners[i].y);
            let axis = Vector2::new(-edge.y, edge.x);
            let (min_a, max_a) = project(&ca, axis);
            let (min_b, max_b) = project(&cb, axis);
            if max_a <= min_b || max_b <= min_a {
                return false;
            }
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field() -> Polygon {
        Polygon::rectangle(10.0, 10.0, 590.0, 590.0)
    }

    #[test]
    fn test_corners_unrotated() {
        let fp = Footprint::new(Point::new(50.0, 50.0), 0.0, 18.0, 10.0);
        let c = fp.corners();
        assert!(c[0].approx_eq(Point::new(41.0, 45.0), 1e-9));
        assert!(c[2].approx_eq(Point::new(59.0, 55.0), 1e-9));
    }

    #[test]
    fn test_corners_rotated_45() {
        let fp = Footprint::new(Point::new(0.0, 0.0), 45.0, 2.0, 2.0);
        let (min, max) = fp.aabb();
        let r = 2.0_f64.sqrt();
        assert!(min.approx_eq(Point::new(-r, -r), 1e-9));
        assert!(max.approx_eq(Point::new(r, r), 1e-9));
    }

    #[test]
    fn test_inside_and_outside() {
        let poly = field();
        assert!(is_footprint_inside(&Footprint::new(Point::new(300.0, 300.0), 0.0, 18.0, 18.0), &poly));
        // corner pokes out on the left
        assert!(!is_footprint_inside(&Footprint::new(Point::new(15.0, 300.0), 0.0, 18.0, 18.0), &poly));
        // fits unrotated, pokes out at 45 degrees
        let tight = Footprint::new(Point::new(20.0, 300.0), 0.0, 18.0, 18.0);
        assert!(is_footprint_inside(&tight, &poly));
        assert!(!is_footprint_inside(&Footprint { rotation_deg: 45.0, ..tight }, &poly));
    }

    #[test]
    fn test_tunnel_through_notch_is_rejected() {
        // U shape: notch between x=40..60 reaching down to y=80
        let u = Polygon::new(vec![
            Point::new(0.0, 0.0),
            Point::new(40.0, 0.0),
            Point::new(40.0, 80.0),
            Point::new(60.0, 80.0),
            Point::new(60.0, 0.0),
            Point::new(100.0, 0.0),
            Point::new(100.0, 100.0),
            Point::new(0.0, 100.0),
        ]);
        // wide flat footprint: corners on both prongs, body across the notch
        let fp = Footprint::new(Point::new(50.0, 40.0), 0.0, 60.0, 10.0);
        assert!(fp.corners().iter().all(|&c| u.contains(c)));
        assert!(!is_footprint_inside(&fp, &u));
    }

    #[test]
    fn test_unusable_polygon_contains_nothing() {
        let fp = Footprint::new(Point::new(0.0, 0.0), 0.0, 1.0, 1.0);
        assert!(!is_footprint_inside(&fp, &Polygon::empty()));
    }

    #[test]
    fn test_overlap_separating_axis() {
        let a = Footprint::new(Point::new(0.0, 0.0), 0.0, 10.0, 10.0);
        let b = Footprint::new(Point::new(8.0, 0.0), 0.0, 10.0, 10.0);
        let touching = Footprint::new(Point::new(10.0, 0.0), 0.0, 10.0, 10.0);
        let diamond = Footprint::new(Point::new(12.0, 0.0), 45.0, 10.0, 10.0);
        assert!(footprints_overlap(&a, &b));
        assert!(!footprints_overlap(&a, &touching));
        // diamond tip reaches x = 12 - 7.07 = 4.93 < 5
        assert!(footprints_overlap(&a, &diamond));
    }
}
