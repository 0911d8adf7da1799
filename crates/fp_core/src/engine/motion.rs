//! Constrained motion
//!
//! Drag-time correction for robots and floor items.
//!
//! ## Move pipeline
//! 1. Magnetic snap to the alliance base (robots only)
//! 2. Clamp into the field rectangle
//! 3. Solid-zone push, then goal-wedge push
//! 4. Walk toward the corrected target in sub-steps of at most `max_step`,
//!    sliding along walls when a full step is blocked
//! 5. Commit the last valid position
//!
//! Every move ends valid: inside the perimeter, clear of solid zones and
//! out of every goal wedge. A pose the active perimeter no longer admits
//! (after a publish, or an unconstrained set) is settled onto the nearest
//! valid pose found instead of being walked.

use crate::engine::config::{FieldGeometry, ScoringZones};
use crate::engine::solid_zone::{
    overlaps_any_zone, penetrates_any_wedge, resolve_goal_wedges, resolve_rect_overlaps,
};
use crate::geometry::{footprints_overlap, is_footprint_inside, polygon_centroid, Footprint, Point, Polygon};
use crate::models::{Alliance, Robot};

/// Upper bound on sub-steps per move; very long drags take longer steps.
pub const MAX_SUBSTEPS: usize = 1024;

/// Clamp keeps this much air between footprint and field edge, so the
/// clamped pose does not sit exactly on the boundary.
const CLAMP_CLEARANCE: f64 = 1e-4;

const MIN_MOVE: f64 = 1e-9;

/// Directions sampled per ring when settling.
const SETTLE_DIRECTIONS: usize = 16;
const SETTLE_BISECTIONS: usize = 12;

/// Hard snap: `magnet` if `desired` is within `radius` of it.
pub fn snap_to_magnet(desired: Point, magnet: Option<Point>, radius: f64) -> Point {
    match magnet {
        Some(m) if desired.distance_to(m) <= radius => m,
        _ => desired,
    }
}

/// Two or more `alliance` robots parked on the magnet with overlapping
/// footprints.
pub fn double_parked(robots: &[Robot], alliance: Alliance, magnet: Option<Point>, snap_radius: f64) -> bool {
    let Some(magnet) = magnet else {
        return false;
    };

    let parked: Vec<Footprint> = robots
        .iter()
        .filter(|r| r.alliance == alliance && r.position.distance_to(magnet) <= snap_radius)
        .map(Robot::footprint)
        .collect();

    parked
        .iter()
        .enumerate()
        .any(|(i, a)| parked[i + 1..].iter().any(|b| footprints_overlap(a, b)))
}

/// Validity checks and constrained moves against one perimeter snapshot.
pub struct MotionController<'a> {
    polygon: &'a Polygon,
    geometry: &'a FieldGeometry,
    zones: &'a ScoringZones,
}

impl<'a> MotionController<'a> {
    pub fn new(polygon: &'a Polygon, geometry: &'a FieldGeometry, zones: &'a ScoringZones) -> Self {
        Self { polygon, geometry, zones }
    }

    /// Inside the perimeter, off every solid zone, out of every wedge.
    pub fn is_valid(&self, footprint: &Footprint) -> bool {
        is_footprint_inside(footprint, self.polygon)
            && !overlaps_any_zone(footprint, &self.zones.solid_zones)
            && !penetrates_any_wedge(footprint, &self.zones.goal_wedges)
    }

    /// Keeps the footprint's bounding box inside the margin rectangle.
    pub fn clamp_to_field(&self, footprint: &Footprint, desired: Point) -> Point {
        let (min, max) = footprint.aabb();
        let half_w = (max.x - min.x) / 2.0;
        let half_h = (max.y - min.y) / 2.0;
        let inset = self.geometry.margin + CLAMP_CLEARANCE;

        Point::new(
            clamp_axis(desired.x, inset + half_w, self.geometry.width - inset - half_w),
            clamp_axis(desired.y, inset + half_h, self.geometry.height - inset - half_h),
        )
    }

    /// Steps 1-3: snap, clamp, zone and wedge push.
    pub fn correct_target(&self, footprint: &Footprint, desired: Point, magnet: Option<Point>) -> Point {
        let snapped = snap_to_magnet(desired, magnet, self.geometry.snap_radius);
        if snapped != desired {
            log::debug!("snap to magnet at ({:.1}, {:.1})", snapped.x, snapped.y);
        }

        let clamped = self.clamp_to_field(footprint, snapped);
        let pushed = resolve_rect_overlaps(&footprint.at(clamped), &self.zones.solid_zones);
        resolve_goal_wedges(&footprint.at(pushed), &self.zones.goal_wedges)
    }

    /// Steps 4-5: walk toward `target`, never committing an invalid pose.
    pub fn walk_to(&self, footprint: &Footprint, target: Point) -> Point {
        let start = footprint.position;
        if !self.is_valid(footprint) {
            // nothing to walk from: land on the target or as near it as fits
            return self.settle(footprint, target).unwrap_or_else(|| {
                log::warn!("no valid pose near ({:.1}, {:.1}); actor left in place", target.x, target.y);
                start
            });
        }

        let distance = start.distance_to(target);
        if distance < MIN_MOVE {
            return start;
        }

        let steps = ((distance / self.geometry.max_step).ceil() as usize).clamp(1, MAX_SUBSTEPS);
        let dx = (target.x - start.x) / steps as f64;
        let dy = (target.y - start.y) / steps as f64;

        let mut current = start;
        let mut on_track = true;
        for i in 1..=steps {
            // land exactly on target unless a slide knocked us off the line
            let full = if i == steps && on_track { target } else { current.offset(dx, dy) };
            let candidates = [full, current.offset(dx, 0.0), current.offset(0.0, dy)];

            match candidates
                .into_iter()
                .filter(|c| c.distance_sq(current) > MIN_MOVE * MIN_MOVE)
                .find(|&c| self.is_valid(&footprint.at(c)))
            {
                Some(next) => {
                    on_track &= next == full;
                    current = next;
                }
                None => {
                    log::debug!("move blocked after {} of {} sub-steps", i - 1, steps);
                    break;
                }
            }
        }

        current
    }

    /// Full move of a footprint toward `desired`. Returns the committed centre.
    pub fn move_footprint(&self, footprint: &Footprint, desired: Point, magnet: Option<Point>) -> Point {
        let target = self.correct_target(footprint, desired, magnet);
        self.walk_to(footprint, target)
    }

    /// Corrected `desired`, settled into the active perimeter. For actors
    /// that appear on the field rather than travel onto it.
    pub fn place(&self, footprint: &Footprint, desired: Point, magnet: Option<Point>) -> Point {
        let target = self.correct_target(footprint, desired, magnet);
        self.settle(footprint, target).unwrap_or_else(|| {
            log::warn!("no valid pose near ({:.1}, {:.1})", target.x, target.y);
            target
        })
    }

    /// Valid centre near `near`: `near` itself, else the first valid point
    /// on the line toward the polygon centroid (bisected back toward the
    /// boundary), else the first hit on widening rings around `near`.
    /// `None` when the field has no room for the footprint.
    pub fn settle(&self, footprint: &Footprint, near: Point) -> Option<Point> {
        if self.is_valid(&footprint.at(near)) {
            return Some(near);
        }
        let step = self.geometry.max_step;

        if let Some(centroid) = polygon_centroid(&self.polygon.points) {
            let steps = ((near.distance_to(centroid) / step).ceil() as usize).clamp(1, MAX_SUBSTEPS);
            let mut outside = near;
            for i in 1..=steps {
                let candidate = near.lerp(centroid, i as f64 / steps as f64);
                if self.is_valid(&footprint.at(candidate)) {
                    return Some(self.bisect(footprint, outside, candidate));
                }
                outside = candidate;
            }
        }

        // centroid outside the field (concave perimeter) or blocked by a zone
        let reach = self.geometry.width.hypot(self.geometry.height);
        let rings = ((reach / step).ceil() as usize).clamp(1, MAX_SUBSTEPS);
        (1..=rings).find_map(|ring| {
            let radius = reach * ring as f64 / rings as f64;
            (0..SETTLE_DIRECTIONS).find_map(|k| {
                let angle = std::f64::consts::TAU * k as f64 / SETTLE_DIRECTIONS as f64;
                let candidate = near.offset(radius * angle.cos(), radius * angle.sin());
                self.is_valid(&footprint.at(candidate)).then_some(candidate)
            })
        })
    }

    /// Narrows `[outside, inside]` toward the boundary; the result is always
    /// a valid centre.
    fn bisect(&self, footprint: &Footprint, mut outside: Point, mut inside: Point) -> Point {
        for _ in 0..SETTLE_BISECTIONS {
            let mid = outside.lerp(inside, 0.5);
            if self.is_valid(&footprint.at(mid)) {
                inside = mid;
            } else {
                outside = mid;
            }
        }
        inside
    }

    /// Whether the footprint may take `rotation_deg` in place.
    pub fn can_rotate(&self, footprint: &Footprint, rotation_deg: f64) -> bool {
        self.is_valid(&Footprint { rotation_deg, ..*footprint })
    }
}

/// `f64::clamp` that tolerates an empty range (footprint wider than the
/// field): collapses to the midpoint instead of panicking.
fn clamp_axis(value: f64, lo: f64, hi: f64) -> f64 {
    if lo > hi {
        (lo + hi) / 2.0
    } else {
        value.clamp(lo, hi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::solid_zone::{GoalWedge, SolidZone};
    use crate::geometry::fallback_polygon;

    fn open_field() -> (Polygon, FieldGeometry, ScoringZones) {
        let geometry = FieldGeometry { width: 600.0, height: 600.0, margin: 10.0, ..FieldGeometry::default() };
        (fallback_polygon(&geometry), geometry, ScoringZones::default())
    }

    fn robot(x: f64, y: f64) -> Footprint {
        Footprint::new(Point::new(x, y), 0.0, 18.0, 18.0)
    }

    /// FTC-sized field with a notch cut up from the bottom wall.
    pub(super) fn u_field() -> (Polygon, FieldGeometry, ScoringZones) {
        let polygon = Polygon::new(vec![
            Point::new(2.0, 2.0),
            Point::new(142.0, 2.0),
            Point::new(142.0, 142.0),
            Point::new(100.0, 142.0),
            Point::new(100.0, 50.0),
            Point::new(44.0, 50.0),
            Point::new(44.0, 142.0),
            Point::new(2.0, 142.0),
        ]);
        let zones = ScoringZones {
            solid_zones: vec![SolidZone::new(60.0, 10.0, 84.0, 30.0)],
            goal_wedges: vec![
                GoalWedge::new(Point::new(0.0, 0.0), 27.0, 27.0),
                GoalWedge::new(Point::new(144.0, 0.0), -27.0, 27.0),
            ],
            ..ScoringZones::default()
        };
        (polygon, FieldGeometry::default(), zones)
    }

    #[test]
    fn test_free_move_reaches_target() {
        let (poly, geo, zones) = open_field();
        let mc = MotionController::new(&poly, &geo, &zones);
        let end = mc.move_footprint(&robot(100.0, 100.0), Point::new(300.0, 250.0), None);
        assert!(end.approx_eq(Point::new(300.0, 250.0), 1e-9));
    }

    #[test]
    fn test_pull_past_corner_stops_at_inset_boundary() {
        let (poly, geo, zones) = open_field();
        let mc = MotionController::new(&poly, &geo, &zones);
        let start = robot(50.0, 50.0);
        let end = mc.move_footprint(&start, Point::new(-50.0, -50.0), None);

        // margin 10 + half width 9
        assert!(end.approx_eq(Point::new(19.0, 19.0), 0.01), "ended at {:?}", end);
        assert!(mc.is_valid(&start.at(end)));
    }

    #[test]
    fn test_slides_along_wall() {
        let (poly, geo, zones) = open_field();
        let mc = MotionController::new(&poly, &geo, &zones);
        // target beyond the top wall and to the right: y blocked, x continues
        let end = mc.walk_to(&robot(100.0, 25.0), Point::new(140.0, 5.0));
        assert!(end.x > 135.0, "did not slide: {:?}", end);
        assert!(end.y >= 19.0);
    }

    #[test]
    fn test_solid_zone_is_never_entered() {
        let (poly, geo, mut zones) = open_field();
        zones.solid_zones.push(SolidZone::new(200.0, 0.0, 220.0, 600.0));
        let mc = MotionController::new(&poly, &geo, &zones);

        let start = robot(100.0, 300.0);
        // target on the far side of a full-height wall
        let end = mc.move_footprint(&start, Point::new(400.0, 300.0), None);
        assert!(end.x <= 191.0 + 1e-9, "crossed the wall: {:?}", end);
        assert!(mc.is_valid(&start.at(end)));
    }

    #[test]
    fn test_wedge_target_is_pushed_out() {
        let (poly, geo, mut zones) = open_field();
        zones.goal_wedges.push(GoalWedge::new(Point::new(0.0, 0.0), 120.0, 120.0));
        let mc = MotionController::new(&poly, &geo, &zones);

        let start = robot(200.0, 200.0);
        let end = mc.move_footprint(&start, Point::new(40.0, 40.0), None);
        assert!(mc.is_valid(&start.at(end)));
        assert!(!penetrates_any_wedge(&start.at(end), &zones.goal_wedges));
        assert!(end.x > 40.0 && end.y > 40.0);
    }

    #[test]
    fn test_snap_is_deterministic() {
        let (poly, geo, zones) = open_field();
        let mc = MotionController::new(&poly, &geo, &zones);
        let magnet = Some(Point::new(300.0, 500.0));

        for desired in [Point::new(303.0, 498.0), Point::new(296.0, 504.0), Point::new(300.0, 505.9)] {
            let end = mc.move_footprint(&robot(300.0, 400.0), desired, magnet);
            assert_eq!(end, Point::new(300.0, 500.0));
        }
        // outside the radius: no snap
        let end = mc.move_footprint(&robot(300.0, 400.0), Point::new(310.0, 500.0), magnet);
        assert_eq!(end, Point::new(310.0, 500.0));
    }

    #[test]
    fn test_rotation_checked_against_perimeter() {
        let (poly, geo, zones) = open_field();
        let mc = MotionController::new(&poly, &geo, &zones);
        let hugging = robot(19.5, 300.0);
        assert!(mc.is_valid(&hugging));
        assert!(!mc.can_rotate(&hugging, 45.0));
        assert!(mc.can_rotate(&robot(300.0, 300.0), 45.0));
    }

    #[test]
    fn test_invalid_start_recovers_to_legal_target() {
        let (poly, geo, zones) = open_field();
        let mc = MotionController::new(&poly, &geo, &zones);
        let outside = robot(2.0, 2.0);
        assert!(!mc.is_valid(&outside));
        let end = mc.move_footprint(&outside, Point::new(100.0, 100.0), None);
        assert_eq!(end, Point::new(100.0, 100.0));
    }

    #[test]
    fn test_invalid_start_settles_inside_new_perimeter() {
        let geo = FieldGeometry::default();
        let zones = ScoringZones::default();
        // perimeter shrank after the robot was placed
        let poly = Polygon::rectangle(22.0, 22.0, 122.0, 122.0);
        let mc = MotionController::new(&poly, &geo, &zones);

        let stranded = robot(15.0, 72.0);
        assert!(!mc.is_valid(&stranded));
        let end = mc.move_footprint(&stranded, Point::new(0.0, 72.0), None);
        assert!(mc.is_valid(&stranded.at(end)), "still outside at {:?}", end);
        // nearest legal x is just past 22 + 9
        assert!(end.x > 30.99 && end.x < 32.5, "settled at {:?}", end);
        assert_eq!(end.y, 72.0);

        // staying put is also a move
        let end = mc.walk_to(&stranded, stranded.position);
        assert!(mc.is_valid(&stranded.at(end)));
    }

    #[test]
    fn test_place_lands_inside_perimeter() {
        let geo = FieldGeometry::default();
        let zones = ScoringZones::default();
        let poly = Polygon::rectangle(22.0, 22.0, 122.0, 122.0);
        let mc = MotionController::new(&poly, &geo, &zones);

        let fp = robot(0.0, 0.0);
        let placed = mc.place(&fp, Point::new(12.0, 72.0), None);
        assert!(mc.is_valid(&fp.at(placed)));
        // already legal: unchanged
        assert_eq!(mc.place(&fp, Point::new(60.0, 60.0), None), Point::new(60.0, 60.0));
    }

    #[test]
    fn test_settle_without_room_is_none() {
        let geo = FieldGeometry::default();
        let zones = ScoringZones::default();
        let poly = Polygon::rectangle(60.0, 60.0, 70.0, 70.0);
        let mc = MotionController::new(&poly, &geo, &zones);

        let fp = robot(65.0, 65.0);
        assert_eq!(mc.settle(&fp, fp.position), None);
        assert_eq!(mc.walk_to(&fp, Point::new(100.0, 100.0)), fp.position);
    }

    #[test]
    fn test_notch_blocks_walk_between_legs() {
        let (poly, geo, _) = u_field();
        let zones = ScoringZones::default();
        let mc = MotionController::new(&poly, &geo, &zones);

        let start = robot(20.0, 120.0);
        assert!(mc.is_valid(&start));
        let end = mc.move_footprint(&start, Point::new(120.0, 120.0), None);
        // right edge stops short of the notch wall at x = 44
        assert!(end.x <= 35.0, "tunnelled to {:?}", end);
        assert!(mc.is_valid(&start.at(end)));
    }

    #[test]
    fn test_settle_escapes_concave_notch() {
        let (poly, geo, zones) = u_field();
        let mc = MotionController::new(&poly, &geo, &zones);
        // vertex centroid (72, 84) lies in the notch itself
        let lost = robot(72.0, 96.0);
        assert!(!mc.is_valid(&lost));
        let end = mc.settle(&lost, lost.position).unwrap();
        assert!(mc.is_valid(&lost.at(end)));
    }

    #[test]
    fn test_double_parked() {
        let magnet = Some(Point::new(38.0, 126.0));
        let mut a = Robot::new(Alliance::Blue, Point::new(38.0, 126.0), 18.0, 18.0, 3);
        let b = Robot::new(Alliance::Blue, Point::new(42.0, 124.0), 18.0, 18.0, 3);
        let red = Robot::new(Alliance::Red, Point::new(38.0, 126.0), 18.0, 18.0, 3);

        assert!(double_parked(&[a.clone(), b.clone()], Alliance::Blue, magnet, 6.0));
        assert!(!double_parked(&[a.clone(), red], Alliance::Blue, magnet, 6.0));
        assert!(!double_parked(&[a.clone(), b.clone()], Alliance::Blue, None, 6.0));

        a.position = Point::new(20.0, 126.0);
        assert!(!double_parked(&[a, b], Alliance::Blue, magnet, 6.0));
    }

    #[test]
    fn test_clamp_axis_empty_range() {
        assert_eq!(clamp_axis(5.0, 10.0, 2.0), 6.0);
        assert_eq!(clamp_axis(5.0, 0.0, 2.0), 2.0);
    }
}
