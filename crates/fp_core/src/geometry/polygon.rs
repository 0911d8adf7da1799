//! Polygon utilities
//!
//! Pure functions, no state. The perimeter polygon is produced by the
//! extractor and consumed by the containment checker; nothing here
//! validates simplicity of the input.

use super::{Point, Polygon};

/// A point this close to an edge counts as inside.
pub const ON_EDGE_EPSILON: f64 = 1e-6;

/// Cross products below this are treated as collinear.
const COLLINEAR_EPSILON: f64 = 1e-9;

// ============================================================================
// Distance helpers
// ============================================================================

/// Shortest distance from `point` to the segment `a`-`b`.
pub fn point_segment_distance(point: Point, a: Point, b: Point) -> f64 {
    let len_sq = a.distance_sq(b);
    if len_sq < f64::EPSILON {
        // degenerate segment
        return point.distance_to(a);
    }

    let t = (((point.x - a.x) * (b.x - a.x) + (point.y - a.y) * (b.y - a.y)) / len_sq)
        .clamp(0.0, 1.0);
    point.distance_to(a.lerp(b, t))
}

// ============================================================================
// Point in polygon
// ============================================================================

/// Ray-casting parity test. Points on an edge (within [`ON_EDGE_EPSILON`])
/// are inside; fewer than 3 vertices is always `false`.
pub fn point_in_polygon(point: Point, polygon: &[Point]) -> bool {
    let n = polygon.len();
    if n < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let a = polygon[i];
        let b = polygon[j];

        if point_segment_distance(point, a, b) <= ON_EDGE_EPSILON {
            return true;
        }

        if (a.y > point.y) != (b.y > point.y) {
            let x_cross = (b.x - a.x) * (point.y - a.y) / (b.y - a.y) + a.x;
            if point.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

// ============================================================================
// Segment intersection
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Orientation {
    Collinear,
    Clockwise,
    CounterClockwise,
}

fn orientation(p: Point, q: Point, r: Point) -> Orientation {
    let v = (q.y - p.y) * (r.x - q.x) - (q.x - p.x) * (r.y - q.y);
    if v.abs() <= COLLINEAR_EPSILON {
        Orientation::Collinear
    } else if v > 0.0 {
        Orientation::Clockwise
    } else {
        Orientation::CounterClockwise
    }
}

/// `q` lies within the bounding box of `p`-`r` (only meaningful when collinear).
fn on_segment(p: Point, q: Point, r: Point) -> bool {
    q.x <= p.x.max(r.x) + COLLINEAR_EPSILON
        && q.x >= p.x.min(r.x) - COLLINEAR_EPSILON
        && q.y <= p.y.max(r.y) + COLLINEAR_EPSILON
        && q.y >= p.y.min(r.y) - COLLINEAR_EPSILON
}

/// Segment `p1`-`p2` vs `q1`-`q2`. Touching and collinear-overlapping
/// segments count as intersecting.
pub fn segments_intersect(p1: Point, p2: Point, q1: Point, q2: Point) -> bool {
    let o1 = orientation(p1, p2, q1);
    let o2 = orientation(p1, p2, q2);
    let o3 = orientation(q1, q2, p1);
    let o4 = orientation(q1, q2, p2);

    if o1 != o2 && o3 != o4 {
        return true;
    }

    (o1 == Orientation::Collinear && on_segment(p1, q1, p2))
        || (o2 == Orientation::Collinear && on_segment(p1, q2, p2))
        || (o3 == Orientation::Collinear && on_segment(q1, p1, q2))
        || (o4 == Orientation::Collinear && on_segment(q1, p2, q2))
}

// ============================================================================
// Centroid / bounds / inset
// ============================================================================

/// Vertex centroid (mean of the vertices). `None` for an empty slice.
pub fn polygon_centroid(points: &[Point]) -> Option<Point> {
    if points.is_empty() {
        return None;
    }
    let n = points.len() as f64;
    let (sx, sy) = points.iter().fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
    Some(Point::new(sx / n, sy / n))
}

/// (min, max) corners of the axis-aligned bounding box.
pub fn polygon_bounds(points: &[Point]) -> Option<(Point, Point)> {
    let first = *points.first()?;
    Some(points.iter().fold((first, first), |(min, max), p| {
        (Point::new(min.x.min(p.x), min.y.min(p.y)), Point::new(max.x.max(p.x), max.y.max(p.y)))
    }))
}

/// Moves every vertex toward the vertex centroid by `inset` units.
///
/// Not a true offset polygon; good enough for the near-convex field
/// outlines it is used on. A vertex never moves past the centroid, and a
/// vertex sitting on the centroid stays put.
pub fn inset_polygon(points: &[Point], inset: f64) -> Polygon {
    let Some(centroid) = polygon_centroid(points) else {
        return Polygon::empty();
    };

    let moved = points
        .iter()
        .map(|&p| {
            let dx = centroid.x - p.x;
            let dy = centroid.y - p.y;
            let len = (dx * dx + dy * dy).sqrt();
            if len < f64::EPSILON {
                return p;
            }
            let step = inset.min(len);
            p.offset(dx / len * step, dy / len * step)
        })
        .collect();
    Polygon::new(moved)
}

// ============================================================================
// Douglas–Peucker
// ============================================================================

/// Douglas–Peucker simplification. First and last points are always kept.
///
/// Ties on the farthest vertex resolve to the lowest index, so running the
/// result through again with the same `epsilon` is a no-op.
pub fn simplify_polyline(points: &[Point], epsilon: f64) -> Polygon {
    if points.len() < 3 {
        return Polygon::new(points.to_vec());
    }

    let last = points.len() - 1;
    let mut keep = vec![false; points.len()];
    keep[0] = true;
    keep[last] = true;

    // explicit stack: traced contours can run to thousands of points
    let mut stack = vec![(0usize, last)];
    while let Some((start, end)) = stack.pop() {
        if end <= start + 1 {
            continue;
        }

        let mut max_dist = 0.0;
        let mut index = start;
        for i in (start + 1)..end {
            let d = point_segment_distance(points[i], points[start], points[end]);
            if d > max_dist {
                max_dist = d;
                index = i;
            }
        }

        if max_dist > epsilon {
            keep[index] = true;
            stack.push((start, index));
            stack.push((index, end));
        }
    }

    Polygon::new(
        points.iter().zip(keep).filter_map(|(p, kept)| kept.then_some(*p)).collect(),
    )
}
