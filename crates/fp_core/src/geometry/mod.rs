//! Field geometry
//!
//! ## Modules
//! - `polygon`: point-in-polygon, segment intersection, inset, simplification
//! - `footprint`: oriented robot/ball rectangles and containment checks
//! - `perimeter`: bitmap → legal play-area polygon
//!
//! All coordinates are `f64` in the variant's field unit (inches for FTC,
//! field-image pixels for FRC). y grows downward, matching the field image.

pub mod footprint;
pub mod perimeter;
pub mod polygon;

pub use footprint::{footprints_overlap, is_footprint_inside, Footprint};
pub use perimeter::{
    extract_perimeter, fallback_polygon, spawn_extraction, PerimeterStore, Raster, Rgb,
};
pub use polygon::{
    inset_polygon, point_in_polygon, polygon_bounds, polygon_centroid, segments_intersect,
    simplify_polyline,
};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

// ============================================================================
// Point
// ============================================================================

/// Field coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn distance_to(&self, other: Point) -> f64 {
        self.distance_sq(other).sqrt()
    }

    /// Squared distance (comparison only, skips the sqrt)
    #[inline]
    pub fn distance_sq(&self, other: Point) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        dx * dx + dy * dy
    }

    /// t=0 → self, t=1 → target
    #[inline]
    pub fn lerp(&self, target: Point, t: f64) -> Point {
        Point { x: self.x + (target.x - self.x) * t, y: self.y + (target.y - self.y) * t }
    }

    #[inline]
    pub fn offset(&self, dx: f64, dy: f64) -> Point {
        Point { x: self.x + dx, y: self.y + dy }
    }

    /// Clamp into the axis-aligned rectangle `[min, max]`.
    #[inline]
    pub fn clamp_to(&self, min: Point, max: Point) -> Point {
        Point { x: self.x.clamp(min.x, max.x), y: self.y.clamp(min.y, max.y) }
    }

    #[inline]
    pub fn approx_eq(&self, other: Point, tolerance: f64) -> bool {
        (self.x - other.x).abs() <= tolerance && (self.y - other.y).abs() <= tolerance
    }
}

impl From<(f64, f64)> for Point {
    fn from(p: (f64, f64)) -> Self {
        Point::new(p.0, p.1)
    }
}

// ============================================================================
// Polygon
// ============================================================================

/// Ordered vertex list, implicitly closed (last connects to first).
///
/// An empty polygon means "no perimeter available"; callers fall back to
/// [`fallback_polygon`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct Polygon {
    pub points: Vec<Point>,
}

impl Polygon {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    pub fn empty() -> Self {
        Self { points: Vec::new() }
    }

    /// Axis-aligned rectangle, clockwise in screen space (y down).
    pub fn rectangle(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            points: vec![
                Point::new(left, top),
                Point::new(right, top),
                Point::new(right, bottom),
                Point::new(left, bottom),
            ],
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// At least a triangle.
    pub fn is_usable(&self) -> bool {
        self.points.len() >= 3
    }

    pub fn contains(&self, point: Point) -> bool {
        point_in_polygon(point, &self.points)
    }

    /// Closed edge iterator: (p0,p1), (p1,p2), ..., (pn,p0)
    pub fn edges(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        let n = self.points.len();
        (0..n).map(move |i| (self.points[i], self.points[(i + 1) % n]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_lerp_endpoints() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(10.0, -4.0);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
        assert_eq!(a.lerp(b, 0.5), Point::new(5.0, -2.0));
    }

    #[test]
    fn test_rectangle_edges_close_the_loop() {
        let rect = Polygon::rectangle(0.0, 0.0, 10.0, 5.0);
        let edges: Vec<_> = rect.edges().collect();
        assert_eq!(edges.len(), 4);
        assert_eq!(edges[3].1, rect.points[0]);
    }

    #[test]
    fn test_polygon_serializes_as_plain_array() {
        let poly = Polygon::rectangle(0.0, 0.0, 1.0, 1.0);
        let json = serde_json::to_value(&poly).unwrap();
        assert!(json.is_array());
        assert_eq!(json[1]["x"], 1.0);
    }
}
