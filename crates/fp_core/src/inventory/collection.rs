//! Robot-held inventories
//!
//! Capacity-checked transfers into and out of `Robot::held`. Placing items
//! back on the floor needs the field constraints, so the session wraps
//! these with the motion controller.

use crate::geometry::Point;
use crate::models::{Item, Robot};

/// Accepts `item` if the robot has room; otherwise hands it back.
pub fn pick_up(robot: &mut Robot, mut item: Item) -> Result<(), Item> {
    if robot.is_full() {
        return Err(item);
    }
    item.held_by = Some(robot.id.clone());
    item.position = robot.position;
    robot.held.push(item);
    Ok(())
}

/// Indices of `floor` items within `radius` of `center`, nearest first.
pub fn items_within(floor: &[Item], center: Point, radius: f64) -> Vec<usize> {
    let r2 = radius * radius;
    let mut nearby: Vec<(usize, f64)> = floor
        .iter()
        .enumerate()
        .map(|(i, item)| (i, item.position.distance_sq(center)))
        .filter(|&(_, d2)| d2 <= r2)
        .collect();
    nearby.sort_by(|a, b| a.1.total_cmp(&b.1));
    nearby.into_iter().map(|(i, _)| i).collect()
}

/// Moves the nearest floor items within `radius` into the robot's hold,
/// up to its remaining capacity. Returns how many were collected.
pub fn collect_from_floor(robot: &mut Robot, floor: &mut Vec<Item>, radius: f64) -> usize {
    let picked: Vec<usize> = items_within(floor, robot.position, radius)
        .into_iter()
        .take(robot.remaining_capacity())
        .collect();

    let mut slots: Vec<Option<Item>> = floor.drain(..).map(Some).collect();
    let mut count = 0;
    for i in picked {
        let Some(item) = slots[i].take() else { continue };
        match pick_up(robot, item) {
            Ok(()) => count += 1,
            Err(item) => slots[i] = Some(item),
        }
    }

    floor.extend(slots.into_iter().flatten());
    count
}

/// Empties the hold, oldest first, detaching every item.
pub fn take_all_held(robot: &mut Robot) -> Vec<Item> {
    robot
        .held
        .drain(..)
        .map(|mut item| {
            item.held_by = None;
            item
        })
        .collect()
}

/// Removes the oldest held item.
pub fn take_oldest_held(robot: &mut Robot) -> Option<Item> {
    if robot.held.is_empty() {
        return None;
    }
    let mut item = robot.held.remove(0);
    item.held_by = None;
    Some(item)
}

/// `count` evenly spaced points on a circle around `center`, starting
/// due east.
pub fn drop_ring(center: Point, count: usize, radius: f64) -> Vec<Point> {
    (0..count)
        .map(|i| {
            let angle = std::f64::consts::TAU * i as f64 / count as f64;
            center.offset(radius * angle.cos(), radius * angle.sin())
        })
        .collect()
}
