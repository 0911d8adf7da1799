//! Planner session
//!
//! The one owner of mutable field state: configuration, the perimeter
//! store, robots, floor items, the inventory system and the motif. Every
//! user action enters through a method here; there is no global state.
//!
//! ## Item containers
//! floor, robot holds, classifier primary/extension, slot grids, and the
//! overflow counters. `total_items` sums all of them. Apart from `add_item`,
//! only `clear_all`, `clear_balls`, `remove_item` and `apply_setup` change
//! that total.

use std::sync::Arc;

use crate::engine::config::FieldConfig;
use crate::engine::motion::{double_parked, MotionController};
use crate::error::{FieldError, Result};
use crate::geometry::{Footprint, PerimeterStore, Point, Polygon};
use crate::inventory::collection::{collect_from_floor, drop_ring, pick_up, take_all_held, take_oldest_held};
use crate::inventory::{EmptyReport, InventorySystem, Motif, Placement, Store};
use crate::models::{Alliance, Item, ItemColor, ItemId, Robot, RobotId};
use crate::save::{self, SessionSnapshot, SNAPSHOT_VERSION};

fn controller<'a>(config: &'a FieldConfig, polygon: &'a Polygon) -> MotionController<'a> {
    MotionController::new(polygon, &config.geometry, &config.zones)
}

fn ball_footprint(config: &FieldConfig, position: Point) -> Footprint {
    let d = config.geometry.ball_diameter;
    Footprint::new(position, 0.0, d, d)
}

#[derive(Debug)]
pub struct Session {
    config: FieldConfig,
    perimeter: PerimeterStore,
    robots: Vec<Robot>,
    floor: Vec<Item>,
    inventory: InventorySystem,
    motif: Motif,
}

impl Session {
    /// Empty field on the rectangular fallback perimeter.
    pub fn new(config: FieldConfig) -> Result<Self> {
        config.ensure_valid()?;
        let motif = Motif::parse(&config.classifier.default_motif)?;
        let perimeter = PerimeterStore::for_geometry(&config.geometry);
        let inventory = InventorySystem::new(&config.zones);

        log::info!("new {} session ({} x {})", config.variant, config.geometry.width, config.geometry.height);
        Ok(Self { config, perimeter, robots: Vec::new(), floor: Vec::new(), inventory, motif })
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    /// Shared handle; hand a clone to `spawn_extraction`.
    pub fn perimeter(&self) -> &PerimeterStore {
        &self.perimeter
    }

    pub fn polygon(&self) -> Arc<Polygon> {
        self.perimeter.current()
    }

    pub fn robots(&self) -> &[Robot] {
        &self.robots
    }

    pub fn robot(&self, id: &str) -> Option<&Robot> {
        self.robots.iter().find(|r| r.id == id)
    }

    pub fn floor_items(&self) -> &[Item] {
        &self.floor
    }

    pub fn inventory(&self) -> &InventorySystem {
        &self.inventory
    }

    pub fn motif(&self) -> &Motif {
        &self.motif
    }

    fn robot_index(&self, id: &str) -> Result<usize> {
        self.robots.iter().position(|r| r.id == id).ok_or_else(|| FieldError::UnknownActor(id.to_string()))
    }

    fn floor_index(&self, id: &str) -> Option<usize> {
        self.floor.iter().position(|i| i.id == id)
    }

    /// Centre for a floor item travelling from `from` toward `target`.
    fn floor_destination(&self, from: Point, target: Point) -> Point {
        let polygon = self.perimeter.current();
        controller(&self.config, &polygon).move_footprint(&ball_footprint(&self.config, from), target, None)
    }

    // ========================================================================
    // Actors
    // ========================================================================

    /// Adds a robot with the configured footprint. The requested position
    /// is snapped, clamped, pushed out of zones and settled into the active
    /// perimeter, but not walked.
    pub fn add_robot(&mut self, alliance: Alliance, position: Point) -> RobotId {
        let g = &self.config.geometry;
        let mut robot = Robot::new(alliance, position, g.robot_width, g.robot_height, g.robot_capacity);

        let polygon = self.perimeter.current();
        let magnet = *self.config.zones.magnets.get(alliance);
        robot.position = controller(&self.config, &polygon).place(&robot.footprint(), position, magnet);

        let id = robot.id.clone();
        log::debug!("added {alliance} robot {id}");
        self.robots.push(robot);
        id
    }

    /// Removes a robot; anything it held drops to the floor.
    pub fn remove_robot(&mut self, id: &str) -> Result<Robot> {
        self.drop_held(id)?;
        let index = self.robot_index(id)?;
        Ok(self.robots.remove(index))
    }

    pub fn add_item(&mut self, color: ItemColor, position: Point) -> ItemId {
        let polygon = self.perimeter.current();
        let footprint = ball_footprint(&self.config, position);
        let corrected = controller(&self.config, &polygon).place(&footprint, position, None);

        let item = Item::new(color, corrected);
        let id = item.id.clone();
        self.floor.push(item);
        id
    }

    /// Removes a floor item.
    pub fn remove_item(&mut self, id: &str) -> Result<Item> {
        let index = self.floor_index(id).ok_or_else(|| FieldError::UnknownItem(id.to_string()))?;
        Ok(self.floor.remove(index))
    }

    /// Discards every floor item and everything robots hold. Containers
    /// are untouched. Returns how many items were removed.
    pub fn clear_balls(&mut self) -> usize {
        let held: usize = self.robots.iter_mut().map(|r| take_all_held(r).len()).sum();
        let floor = self.floor.len();
        self.floor.clear();
        held + floor
    }

    /// Replaces robots and items with the configured preset and empties
    /// every container. Scores reset.
    pub fn apply_setup(&mut self) {
        self.robots.clear();
        self.floor.clear();
        self.inventory.reset();

        let setup = self.config.setup.clone();
        for start in &setup.robots {
            let id = self.add_robot(start.alliance, start.position);
            if let Ok(index) = self.robot_index(&id) {
                self.robots[index].rotation_deg = start.rotation_deg;
            }
        }
        for start in &setup.items {
            self.add_item(start.color, start.position);
        }
        log::info!("applied {} setup: {} robots, {} items", self.config.variant, setup.robots.len(), setup.items.len());
    }

    // ========================================================================
    // Motion
    // ========================================================================

    /// Constrained drag. Robots first, then floor items. Returns the
    /// committed position.
    pub fn move_actor_to(&mut self, id: &str, target: Point) -> Result<Point> {
        let polygon = self.perimeter.current();
        let mc = controller(&self.config, &polygon);

        if let Some(robot) = self.robots.iter_mut().find(|r| r.id == id) {
            let magnet = *self.config.zones.magnets.get(robot.alliance);
            robot.position = mc.move_footprint(&robot.footprint(), target, magnet);
            for item in robot.held.iter_mut() {
                item.position = robot.position;
            }
            return Ok(robot.position);
        }

        if let Some(item) = self.floor.iter_mut().find(|i| i.id == id) {
            let d = self.config.geometry.ball_diameter;
            item.position = mc.move_footprint(&Footprint::new(item.position, 0.0, d, d), target, None);
            return Ok(item.position);
        }

        Err(FieldError::UnknownActor(id.to_string()))
    }

    /// Rotates a robot by `degrees` if the rotated footprint is valid.
    /// Returns the resulting rotation, unchanged when refused.
    pub fn rotate_actor(&mut self, id: &str, degrees: f64) -> Result<f64> {
        let index = self.robot_index(id)?;
        let polygon = self.perimeter.current();
        let robot = &mut self.robots[index];

        let rotation = (robot.rotation_deg + degrees).rem_euclid(360.0);
        if controller(&self.config, &polygon).can_rotate(&robot.footprint(), rotation) {
            robot.rotation_deg = rotation;
        } else {
            log::debug!("rotation of {id} to {rotation:.1} refused");
        }
        Ok(robot.rotation_deg)
    }

    /// Unconstrained set, for sequencer restore and presets.
    pub fn set_actor_pose(&mut self, id: &str, position: Point, rotation_deg: f64) -> Result<()> {
        if let Some(robot) = self.robots.iter_mut().find(|r| r.id == id) {
            robot.position = position;
            robot.rotation_deg = rotation_deg;
            for item in robot.held.iter_mut() {
                item.position = position;
            }
            return Ok(());
        }
        if let Some(item) = self.floor.iter_mut().find(|i| i.id == id) {
            item.position = position;
            return Ok(());
        }
        Err(FieldError::UnknownActor(id.to_string()))
    }

    pub fn double_parked(&self, alliance: Alliance) -> bool {
        double_parked(
            &self.robots,
            alliance,
            *self.config.zones.magnets.get(alliance),
            self.config.geometry.snap_radius,
        )
    }

    // ========================================================================
    // Inventory
    // ========================================================================

    /// Moves a floor item into the alliance classifier. `None` when the
    /// classifier is full; the item then stays on the floor.
    pub fn insert_item(&mut self, alliance: Alliance, item_id: &str) -> Result<Option<Store>> {
        let index = self.floor_index(item_id).ok_or_else(|| FieldError::UnknownItem(item_id.to_string()))?;
        let item = self.floor.remove(index);
        match self.inventory.insert(alliance, item, &self.config.classifier) {
            Ok(store) => Ok(Some(store)),
            Err(item) => {
                self.floor.insert(index, item);
                Ok(None)
            }
        }
    }

    pub fn empty_classifier(&mut self, alliance: Alliance) -> EmptyReport {
        self.inventory.empty(alliance)
    }

    pub fn pop_one(&mut self, alliance: Alliance) -> Option<Placement> {
        self.inventory.pop_one(alliance)
    }

    pub fn clear_all(&mut self, alliance: Alliance) -> usize {
        self.inventory.clear_all(alliance)
    }

    pub fn collect_from_extension(&mut self, robot_id: &str, alliance: Alliance, item_ids: &[String]) -> Result<usize> {
        let index = self.robot_index(robot_id)?;
        Ok(self.inventory.collect_from_extension(&mut self.robots[index], alliance, item_ids))
    }

    /// Human player takes a slot item and puts it back on the field at
    /// the slot position.
    pub fn release_slot(&mut self, alliance: Alliance, slot: usize) -> Result<ItemId> {
        let item = self.inventory.release_slot(alliance, slot)?;
        let position = self.floor_destination(item.position, item.position);
        let id = item.id.clone();
        self.floor.push(item.release_at(position));
        Ok(id)
    }

    pub fn reset_scores(&mut self) {
        self.inventory.reset_scores();
    }

    /// Empties every alliance whose gate lever a robot is touching while
    /// its primary store holds anything. Returns the alliances emptied.
    pub fn poll_levers(&mut self) -> Vec<Alliance> {
        let mut emptied = Vec::new();
        for alliance in Alliance::ALL {
            let Some(lever) = *self.config.zones.levers.get(alliance) else {
                continue;
            };
            if self.inventory.classifier(alliance).primary.is_empty() {
                continue;
            }
            if self.robots.iter().any(|r| lever.overlaps_footprint(&r.footprint())) {
                let report = self.inventory.empty(alliance);
                log::debug!("{alliance} lever: emptied {} items", report.total());
                emptied.push(alliance);
            }
        }
        emptied
    }

    pub fn set_motif(&mut self, motif: &str) -> Result<()> {
        self.motif = Motif::parse(motif)?;
        Ok(())
    }

    pub fn motif_score(&self, alliance: Alliance) -> u32 {
        self.inventory.motif_score(alliance, &self.motif, &self.config.classifier)
    }

    pub fn raw_score(&self, alliance: Alliance) -> u32 {
        self.inventory.raw_score(alliance)
    }

    /// Items across every container, overflow included.
    pub fn total_items(&self) -> usize {
        self.floor.len()
            + self.robots.iter().map(|r| r.held.len()).sum::<usize>()
            + self.inventory.item_count()
            + self.inventory.overflow_total()
    }

    // ========================================================================
    // Collection
    // ========================================================================

    /// Picks a specific floor item. `false` when the robot is full.
    pub fn pick_up(&mut self, robot_id: &str, item_id: &str) -> Result<bool> {
        let robot_index = self.robot_index(robot_id)?;
        let index = self.floor_index(item_id).ok_or_else(|| FieldError::UnknownItem(item_id.to_string()))?;

        let item = self.floor.remove(index);
        match pick_up(&mut self.robots[robot_index], item) {
            Ok(()) => Ok(true),
            Err(item) => {
                self.floor.insert(index, item);
                Ok(false)
            }
        }
    }

    /// Nearest floor items within `pickup_radius`, up to remaining capacity.
    pub fn collect_nearby(&mut self, robot_id: &str) -> Result<usize> {
        let index = self.robot_index(robot_id)?;
        let radius = self.config.geometry.pickup_radius;
        Ok(collect_from_floor(&mut self.robots[index], &mut self.floor, radius))
    }

    /// Every held item goes back to the floor around the robot.
    pub fn drop_held(&mut self, robot_id: &str) -> Result<usize> {
        let index = self.robot_index(robot_id)?;
        let robot = &mut self.robots[index];
        let center = robot.position;
        let radius = robot.width.hypot(robot.height) / 2.0 + self.config.geometry.ball_diameter;
        let items = take_all_held(robot);

        let count = items.len();
        for (item, spot) in items.into_iter().zip(drop_ring(center, count, radius)) {
            let position = self.floor_destination(center, spot);
            self.floor.push(item.release_at(position));
        }
        Ok(count)
    }

    /// Oldest held item lands at `target`, constrained like a floor drag
    /// from the robot centre. `None` when nothing is held.
    pub fn eject_one(&mut self, robot_id: &str, target: Point) -> Result<Option<Point>> {
        let index = self.robot_index(robot_id)?;
        let center = self.robots[index].position;
        let Some(item) = take_oldest_held(&mut self.robots[index]) else {
            return Ok(None);
        };

        let position = self.floor_destination(center, target);
        self.floor.push(item.release_at(position));
        Ok(Some(position))
    }

    /// Held items into the robot's own classifier. What does not fit stays
    /// held. Returns how many were deposited.
    pub fn deposit_held(&mut self, robot_id: &str) -> Result<usize> {
        let index = self.robot_index(robot_id)?;
        let robot = &mut self.robots[index];
        let alliance = robot.alliance;
        let held = take_all_held(robot);
        let offered = held.len();

        let remainder = self.inventory.insert_many(alliance, held, &self.config.classifier);
        let deposited = offered - remainder.len();
        for item in remainder {
            // room is guaranteed: these were just taken out
            if let Err(item) = pick_up(robot, item) {
                self.floor.push(item.release_at(robot.position));
            }
        }
        Ok(deposited)
    }

    // ========================================================================
    // Snapshot
    // ========================================================================

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            version: SNAPSHOT_VERSION,
            timestamp: save::current_timestamp(),
            variant: self.config.variant,
            robots: self.robots.clone(),
            floor: self.floor.clone(),
            inventory: self.inventory.clone(),
            motif: self.motif.to_string(),
        }
    }

    pub fn export_json(&self) -> Result<String> {
        Ok(self.snapshot().to_json()?)
    }

    /// Parse, migrate and validate, then replace state in one step. On any
    /// error the session is unchanged.
    pub fn import_json(&mut self, json: &str) -> Result<()> {
        let snapshot = save::load_snapshot(json, &self.config)?;
        self.restore(snapshot)
    }

    /// Replaces state from an already-loaded snapshot.
    pub fn restore(&mut self, snapshot: SessionSnapshot) -> Result<()> {
        snapshot.validate(&self.config)?;
        let motif = Motif::parse(&snapshot.motif)?;

        log::info!(
            "restored snapshot: {} robots, {} items",
            snapshot.robots.len(),
            snapshot.item_count()
        );
        self.robots = snapshot.robots;
        self.floor = snapshot.floor;
        self.inventory = snapshot.inventory;
        self.motif = motif;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{is_footprint_inside, spawn_extraction, Raster, Rgb};

    fn ftc() -> Session {
        Session::new(FieldConfig::ftc()).unwrap()
    }

    /// Publishes the perimeter traced from a field whose carpet spans 20..124.
    fn publish_traced_field(s: &Session) -> bool {
        let mut raster = Raster::filled(144, 144, [0, 0, 0, 255]);
        raster.fill_rect(20, 20, 124, 124, [200, 200, 200, 255]);
        let cfg = s.config();
        spawn_extraction(s.perimeter().clone(), raster, Rgb::BLACK, cfg.geometry.clone(), cfg.perimeter.clone())
            .join()
            .unwrap()
    }

    #[test]
    fn test_robot_stranded_by_new_perimeter_is_recovered() {
        let mut s = ftc();
        let robot = s.add_robot(Alliance::Red, Point::new(15.0, 72.0));
        assert_eq!(s.robot(&robot).unwrap().position, Point::new(15.0, 72.0));
        assert!(publish_traced_field(&s));

        let polygon = s.polygon();
        let stranded = s.robot(&robot).unwrap().footprint();
        assert!(!controller(s.config(), &polygon).is_valid(&stranded));

        let end = s.move_actor_to(&robot, Point::new(0.0, 72.0)).unwrap();
        assert!(controller(s.config(), &polygon).is_valid(&stranded.at(end)), "still outside at {:?}", end);
        assert!(end.x > 20.0 + 9.0 && end.x < 40.0, "x = {}", end.x);
    }

    #[test]
    fn test_actors_added_after_publish_start_inside() {
        let mut s = ftc();
        assert!(publish_traced_field(&s));

        let robot = s.add_robot(Alliance::Blue, Point::new(12.0, 72.0));
        let item = s.add_item(ItemColor::Green, Point::new(4.0, 72.0));
        let placed = s.robot(&robot).unwrap().position;
        let moved = s.move_actor_to(&robot, Point::new(5.0, 72.0)).unwrap();
        let ball = s.floor_items().iter().find(|i| i.id == item).unwrap().position;

        let polygon = s.polygon();
        let mc = controller(s.config(), &polygon);
        let fp = s.robot(&robot).unwrap().footprint();
        assert!(mc.is_valid(&fp.at(placed)), "added outside at {:?}", placed);
        assert!(mc.is_valid(&fp.at(moved)), "moved outside to {:?}", moved);
        assert!(mc.is_valid(&ball_footprint(s.config(), ball)), "item outside at {:?}", ball);
        assert!(ball.x > 20.0);
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let mut cfg = FieldConfig::ftc();
        cfg.geometry.max_step = -1.0;
        assert!(matches!(Session::new(cfg), Err(FieldError::InvalidConfig(_))));

        let mut cfg = FieldConfig::ftc();
        cfg.classifier.default_motif = "GPQ".to_string();
        assert!(matches!(Session::new(cfg), Err(FieldError::InvalidMotif { token: 'Q', .. })));
    }

    #[test]
    fn test_unknown_actor_is_error() {
        let mut s = ftc();
        assert!(matches!(s.move_actor_to("nope", Point::new(1.0, 1.0)), Err(FieldError::UnknownActor(_))));
        assert!(s.rotate_actor("nope", 90.0).is_err());
        assert!(s.set_actor_pose("nope", Point::ZERO, 0.0).is_err());
        assert!(matches!(s.remove_item("nope"), Err(FieldError::UnknownItem(_))));
    }

    #[test]
    fn test_move_robot_keeps_held_items_with_it() {
        let mut s = ftc();
        let robot = s.add_robot(Alliance::Red, Point::new(72.0, 100.0));
        let item = s.add_item(ItemColor::Green, Point::new(72.0, 100.0));
        assert!(s.pick_up(&robot, &item).unwrap());

        let end = s.move_actor_to(&robot, Point::new(90.0, 90.0)).unwrap();
        assert_eq!(end, Point::new(90.0, 90.0));
        assert_eq!(s.robot(&robot).unwrap().held[0].position, end);
    }

    #[test]
    fn test_floor_item_is_constrained() {
        let mut s = ftc();
        let item = s.add_item(ItemColor::Purple, Point::new(72.0, 72.0));
        let end = s.move_actor_to(&item, Point::new(500.0, 72.0)).unwrap();
        // margin 2 + half ball 2.5
        assert!(end.x <= 144.0 - 4.5 + 1e-6);
        assert!(end.x > 138.0);
    }

    #[test]
    fn test_robot_snaps_to_base() {
        let mut s = ftc();
        let robot = s.add_robot(Alliance::Blue, Point::new(56.0, 100.0));
        let end = s.move_actor_to(&robot, Point::new(40.0, 124.0)).unwrap();
        assert_eq!(end, Point::new(38.0, 126.0));
    }

    #[test]
    fn test_double_park_detection() {
        let mut s = ftc();
        let a = s.add_robot(Alliance::Blue, Point::new(56.0, 100.0));
        let b = s.add_robot(Alliance::Blue, Point::new(56.0, 70.0));
        s.move_actor_to(&a, Point::new(38.0, 126.0)).unwrap();
        assert!(!s.double_parked(Alliance::Blue));
        s.set_actor_pose(&b, Point::new(42.0, 124.0), 0.0).unwrap();
        assert!(s.double_parked(Alliance::Blue));
        assert!(!s.double_parked(Alliance::Red));
    }

    #[test]
    fn test_rotate_refused_against_wall() {
        let mut s = ftc();
        let robot = s.add_robot(Alliance::Red, Point::new(72.0, 100.0));
        assert_eq!(s.rotate_actor(&robot, 45.0).unwrap(), 45.0);

        s.set_actor_pose(&robot, Point::new(11.5, 100.0), 0.0).unwrap();
        assert_eq!(s.rotate_actor(&robot, 45.0).unwrap(), 0.0);
        assert_eq!(s.rotate_actor(&robot, -360.0).unwrap(), 0.0);
    }

    #[test]
    fn test_scenario_nine_plus_six() {
        let mut s = ftc();
        let ids: Vec<_> = (0..12).map(|i| s.add_item(ItemColor::Purple, Point::new(40.0 + i as f64 * 5.0, 90.0))).collect();
        for id in &ids {
            s.insert_item(Alliance::Red, id).unwrap();
        }
        assert_eq!(s.inventory().classifier(Alliance::Red).primary.len(), 9);
        assert_eq!(s.inventory().classifier(Alliance::Red).extension.len(), 3);

        let report = s.empty_classifier(Alliance::Red);
        assert_eq!(report.total(), 9);
        assert!(report.own_grid <= 9);
        assert_eq!(report.overflowed, 0);
        assert_eq!(s.inventory().classifier(Alliance::Red).extension.len(), 3);
        assert_eq!(s.total_items(), 12);
    }

    #[test]
    fn test_insert_when_full_leaves_item_on_floor() {
        let mut cfg = FieldConfig::ftc();
        cfg.classifier.max_capacity = 1;
        cfg.classifier.extension_capacity = 0;
        let mut s = Session::new(cfg).unwrap();
        let a = s.add_item(ItemColor::Green, Point::new(70.0, 90.0));
        let b = s.add_item(ItemColor::Green, Point::new(80.0, 90.0));
        assert_eq!(s.insert_item(Alliance::Blue, &a).unwrap(), Some(Store::Primary));
        assert_eq!(s.insert_item(Alliance::Blue, &b).unwrap(), None);
        assert_eq!(s.floor_items().len(), 1);
    }

    #[test]
    fn test_collect_drop_and_eject() {
        let mut s = ftc();
        let robot = s.add_robot(Alliance::Blue, Point::new(72.0, 100.0));
        for dx in [-4.0, 0.0, 4.0, 8.0] {
            s.add_item(ItemColor::Purple, Point::new(72.0 + dx, 100.0));
        }
        assert_eq!(s.collect_nearby(&robot).unwrap(), 3);
        assert_eq!(s.floor_items().len(), 1);

        let landed = s.eject_one(&robot, Point::new(72.0, 60.0)).unwrap().unwrap();
        assert_eq!(landed, Point::new(72.0, 60.0));
        assert_eq!(s.drop_held(&robot).unwrap(), 2);
        assert!(s.robot(&robot).unwrap().held.is_empty());
        assert_eq!(s.floor_items().len(), 4);
        assert!(s.floor_items().iter().all(|i| i.held_by.is_none()));
        assert_eq!(s.eject_one(&robot, Point::ZERO).unwrap(), None);
    }

    #[test]
    fn test_dropped_items_stay_in_field() {
        let mut s = ftc();
        let robot = s.add_robot(Alliance::Red, Point::new(12.0, 100.0));
        for _ in 0..3 {
            let item = s.add_item(ItemColor::Green, Point::new(12.0, 100.0));
            s.pick_up(&robot, &item).unwrap();
        }
        s.drop_held(&robot).unwrap();
        let polygon = s.polygon();
        for item in s.floor_items() {
            assert!(is_footprint_inside(&ball_footprint(s.config(), item.position), &polygon));
        }
    }

    #[test]
    fn test_deposit_keeps_remainder_held() {
        let mut cfg = FieldConfig::ftc();
        cfg.classifier.max_capacity = 2;
        cfg.classifier.extension_capacity = 0;
        let mut s = Session::new(cfg).unwrap();
        let robot = s.add_robot(Alliance::Red, Point::new(72.0, 100.0));
        for _ in 0..3 {
            let item = s.add_item(ItemColor::Green, Point::new(72.0, 100.0));
            s.pick_up(&robot, &item).unwrap();
        }
        assert_eq!(s.deposit_held(&robot).unwrap(), 2);
        assert_eq!(s.robot(&robot).unwrap().held.len(), 1);
        assert_eq!(s.raw_score(Alliance::Red), 6);
    }

    #[test]
    fn test_lever_poll_empties_touching_alliance() {
        let mut s = ftc();
        let item = s.add_item(ItemColor::Green, Point::new(72.0, 90.0));
        s.insert_item(Alliance::Blue, &item).unwrap();
        let robot = s.add_robot(Alliance::Red, Point::new(72.0, 100.0));

        assert!(s.poll_levers().is_empty());
        // blue lever: x 0..6, y 66..76
        s.set_actor_pose(&robot, Point::new(12.0, 71.0), 0.0).unwrap();
        assert_eq!(s.poll_levers(), vec![Alliance::Blue]);
        assert!(s.inventory().classifier(Alliance::Blue).primary.is_empty());
        // nothing left to empty
        assert!(s.poll_levers().is_empty());
    }

    #[test]
    fn test_release_slot_returns_item_to_floor() {
        let mut s = ftc();
        let item = s.add_item(ItemColor::Green, Point::new(72.0, 90.0));
        s.insert_item(Alliance::Red, &item).unwrap();
        s.pop_one(Alliance::Red);
        assert!(s.floor_items().is_empty());

        let released = s.release_slot(Alliance::Red, 0).unwrap();
        assert_eq!(released, item);
        assert_eq!(s.floor_items().len(), 1);
        assert!(s.release_slot(Alliance::Red, 0).is_err());
    }

    #[test]
    fn test_motif_score_follows_set_motif() {
        let mut s = ftc();
        for color in [ItemColor::Purple, ItemColor::Green, ItemColor::Purple] {
            let id = s.add_item(color, Point::new(72.0, 90.0));
            s.insert_item(Alliance::Blue, &id).unwrap();
        }
        assert_eq!(s.motif_score(Alliance::Blue), 2); // GPP vs PGP: only index 2
        s.set_motif("PGP").unwrap();
        assert_eq!(s.motif_score(Alliance::Blue), 6);
        assert!(s.set_motif("PGX").is_err());
        assert_eq!(s.motif().to_string(), "PGP");
    }

    #[test]
    fn test_apply_setup_and_clear() {
        let mut s = ftc();
        s.apply_setup();
        assert_eq!(s.robots().len(), 4);
        assert_eq!(s.total_items(), 18);
        let polygon = s.polygon();
        let mc = controller(s.config(), &polygon);
        assert!(s.robots().iter().all(|r| mc.is_valid(&r.footprint())));

        let robot = s.robots()[0].id.clone();
        s.move_actor_to(&robot, Point::new(26.0, 96.0)).unwrap();
        s.collect_nearby(&robot).unwrap();
        assert_eq!(s.clear_balls(), 18);
        assert_eq!(s.total_items(), 0);
    }

    #[test]
    fn test_remove_robot_drops_held() {
        let mut s = ftc();
        let robot = s.add_robot(Alliance::Red, Point::new(72.0, 100.0));
        let item = s.add_item(ItemColor::Green, Point::new(72.0, 100.0));
        s.pick_up(&robot, &item).unwrap();
        let removed = s.remove_robot(&robot).unwrap();
        assert!(removed.held.is_empty());
        assert_eq!(s.floor_items().len(), 1);
        assert!(s.robots().is_empty());
    }

    #[test]
    fn test_export_import_preserves_state() {
        let mut s = ftc();
        s.apply_setup();
        let robot = s.robots()[0].id.clone();
        s.move_actor_to(&robot, Point::new(26.0, 96.0)).unwrap();
        s.collect_nearby(&robot).unwrap();
        s.set_motif("PPG").unwrap();
        let json = s.export_json().unwrap();

        let mut restored = ftc();
        restored.import_json(&json).unwrap();
        assert_eq!(restored.robots(), s.robots());
        assert_eq!(restored.floor_items(), s.floor_items());
        assert_eq!(restored.total_items(), s.total_items());
        assert_eq!(restored.motif().to_string(), "PPG");
    }

    #[test]
    fn test_failed_import_leaves_session_untouched() {
        let mut s = ftc();
        s.apply_setup();
        let before = s.snapshot();

        assert!(s.import_json("{ not json").is_err());
        let mut bad = before.clone();
        bad.motif = "XYZ".to_string();
        assert!(s.import_json(&bad.to_json().unwrap()).is_err());

        assert_eq!(s.robots(), before.robots.as_slice());
        assert_eq!(s.floor_items(), before.floor.as_slice());
    }
}
