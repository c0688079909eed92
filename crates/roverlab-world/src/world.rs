//! The mutable grid world: bounds, placed objects, and the queries the
//! executor and door scheduler run against them.
//!
//! The model is owned by the session and mutated only by the executor's
//! instruction handlers and the door scheduler's transition callbacks.
//! Door state is always read live at check time -- a door's open flag
//! may flip between any two reads.

use roverlab_types::{GridConfig, GridPos, Mission, ObjectKind, WorldObject};

use crate::error::WorldError;

/// Default seconds until a timed door opens, when the mission omits it.
pub const DEFAULT_DOOR_OPEN_TIME: f64 = 3.0;
/// Default seconds a timed door stays open, when the mission omits it.
pub const DEFAULT_DOOR_OPEN_DURATION: f64 = 2.0;

/// Schedule for one timed door, derived from its properties.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DoorSchedule {
    /// The door's cell (doors are identified by position).
    pub position: GridPos,
    /// Seconds after run start at which the door opens.
    pub open_time: f64,
    /// Seconds the door stays open before closing.
    pub open_duration: f64,
}

/// The grid world for one mission session.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct WorldModel {
    /// Grid bounds.
    grid: GridConfig,
    /// Live object list; pickup removes, put-down appends.
    objects: Vec<WorldObject>,
    /// Deep copy of the mission's object list, taken at construction
    /// and restored by [`WorldModel::restore_initial`].
    initial_objects: Vec<WorldObject>,
}

impl WorldModel {
    /// Create a world from explicit bounds and objects. The object
    /// list is snapshotted for later restoration.
    pub fn new(grid: GridConfig, objects: Vec<WorldObject>) -> Self {
        Self {
            grid,
            initial_objects: objects.clone(),
            objects,
        }
    }

    /// Create a world from a mission's grid and initial object list.
    pub fn from_mission(mission: &Mission) -> Self {
        Self::new(mission.grid, mission.objects.clone())
    }

    /// Grid bounds.
    pub const fn grid(&self) -> GridConfig {
        self.grid
    }

    /// All live objects.
    pub fn objects(&self) -> &[WorldObject] {
        &self.objects
    }

    /// Restore the object list from the pre-run snapshot, undoing
    /// pickups, deliveries, destroyed obstacles, and door transitions.
    pub fn restore_initial(&mut self) {
        self.objects = self.initial_objects.clone();
    }

    // -------------------------------------------------------------------
    // Movement queries
    // -------------------------------------------------------------------

    /// Whether a cell lies within grid bounds.
    pub const fn in_bounds(&self, pos: GridPos) -> bool {
        self.grid.contains(pos)
    }

    /// Validate that the robot may move onto `pos`.
    ///
    /// Door state is read at call time, never cached: a door that was
    /// closed one instruction ago may be open now, and vice versa.
    ///
    /// # Errors
    ///
    /// [`WorldError::OutOfBounds`] outside the grid,
    /// [`WorldError::Blocked`] on an obstacle or closed door.
    pub fn check_move(&self, pos: GridPos) -> Result<(), WorldError> {
        if !self.in_bounds(pos) {
            return Err(WorldError::OutOfBounds {
                position: pos,
                width: self.grid.width,
                height: self.grid.height,
            });
        }
        let blocked = self
            .objects
            .iter()
            .any(|obj| obj.position == pos && obj.blocks_movement());
        if blocked {
            tracing::debug!(position = %pos, "movement blocked");
            return Err(WorldError::Blocked { position: pos });
        }
        Ok(())
    }

    /// Boolean form of [`WorldModel::check_move`], used by the
    /// `canMoveForward` condition predicate.
    pub fn is_passable(&self, pos: GridPos) -> bool {
        self.check_move(pos).is_ok()
    }

    // -------------------------------------------------------------------
    // Object queries
    // -------------------------------------------------------------------

    /// The first object on a cell, if any.
    pub fn object_at(&self, pos: GridPos) -> Option<&WorldObject> {
        self.objects.iter().find(|obj| obj.position == pos)
    }

    /// The door on a cell, if any (door-tagged obstacle or door object).
    pub fn door_at(&self, pos: GridPos) -> Option<&WorldObject> {
        self.objects
            .iter()
            .find(|obj| obj.position == pos && obj.is_door())
    }

    /// Remove and return the pickup-able object (resource or container)
    /// on a cell, if one is present.
    pub fn take_item_at(&mut self, pos: GridPos) -> Option<WorldObject> {
        let index = self.objects.iter().position(|obj| {
            obj.position == pos
                && matches!(obj.kind, ObjectKind::Resource | ObjectKind::Container)
        })?;
        Some(self.objects.remove(index))
    }

    /// Mutable access to the delivery target (base or goal) on a cell.
    pub fn delivery_target_at_mut(&mut self, pos: GridPos) -> Option<&mut WorldObject> {
        self.objects.iter_mut().find(|obj| {
            obj.position == pos && matches!(obj.kind, ObjectKind::Base | ObjectKind::Goal)
        })
    }

    /// Mutable access to the station on a cell.
    pub fn station_at_mut(&mut self, pos: GridPos) -> Option<&mut WorldObject> {
        self.objects
            .iter_mut()
            .find(|obj| obj.position == pos && obj.kind == ObjectKind::Station)
    }

    /// Append an object (used when an item is put down on open ground).
    pub fn add_object(&mut self, object: WorldObject) {
        self.objects.push(object);
    }

    /// The first object within `radius` cells (Chebyshev distance, so
    /// radius 1 is the cell itself plus its 8 neighbors) satisfying the
    /// predicate.
    pub fn find_nearby_mut<F>(&mut self, pos: GridPos, radius: i32, pred: F) -> Option<&mut WorldObject>
    where
        F: Fn(&WorldObject) -> bool,
    {
        self.objects
            .iter_mut()
            .find(|obj| obj.position.chebyshev_distance(pos) <= radius && pred(obj))
    }

    /// Remove and return the first object within `radius` cells
    /// satisfying the predicate.
    pub fn remove_nearby<F>(&mut self, pos: GridPos, radius: i32, pred: F) -> Option<WorldObject>
    where
        F: Fn(&WorldObject) -> bool,
    {
        let index = self
            .objects
            .iter()
            .position(|obj| obj.position.chebyshev_distance(pos) <= radius && pred(obj))?;
        Some(self.objects.remove(index))
    }

    /// All objects within `radius` cells of `pos` (scan query).
    pub fn objects_within(&self, pos: GridPos, radius: i32) -> Vec<&WorldObject> {
        self.objects
            .iter()
            .filter(|obj| obj.position.chebyshev_distance(pos) <= radius)
            .collect()
    }

    // -------------------------------------------------------------------
    // Door operations
    // -------------------------------------------------------------------

    /// Schedules for every timed door currently in the world, with
    /// mission-omitted delays filled from the defaults.
    pub fn door_schedules(&self) -> Vec<DoorSchedule> {
        self.objects
            .iter()
            .filter(|obj| obj.is_door())
            .map(|obj| DoorSchedule {
                position: obj.position,
                open_time: obj.properties.open_time.unwrap_or(DEFAULT_DOOR_OPEN_TIME),
                open_duration: obj
                    .properties
                    .open_duration
                    .unwrap_or(DEFAULT_DOOR_OPEN_DURATION),
            })
            .collect()
    }

    /// Set the open flag of the door at `pos`. Returns `true` if a door
    /// was found and updated.
    pub fn set_door_open(&mut self, pos: GridPos, open: bool) -> bool {
        let Some(door) = self
            .objects
            .iter_mut()
            .find(|obj| obj.position == pos && obj.is_door())
        else {
            return false;
        };
        door.properties.is_open = open;
        true
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use roverlab_types::ObjectKind;

    use super::*;

    fn grid(width: i32, height: i32) -> GridConfig {
        GridConfig { width, height }
    }

    fn door_at(pos: GridPos) -> WorldObject {
        let mut door = WorldObject::new(ObjectKind::Obstacle, pos);
        door.properties.is_door = true;
        door.properties.open_time = Some(3.0);
        door.properties.open_duration = Some(5.0);
        door
    }

    #[test]
    fn out_of_bounds_is_rejected() {
        let world = WorldModel::new(grid(5, 5), vec![]);
        assert!(world.check_move(GridPos::new(5, 0)).is_err());
        assert!(world.check_move(GridPos::new(0, -1)).is_err());
        assert!(world.check_move(GridPos::new(4, 4)).is_ok());
    }

    #[test]
    fn obstacle_blocks_goal_does_not() {
        let world = WorldModel::new(
            grid(5, 5),
            vec![
                WorldObject::new(ObjectKind::Obstacle, GridPos::new(1, 1)),
                WorldObject::new(ObjectKind::Goal, GridPos::new(2, 2)),
            ],
        );
        assert!(matches!(
            world.check_move(GridPos::new(1, 1)),
            Err(WorldError::Blocked { .. })
        ));
        assert!(world.check_move(GridPos::new(2, 2)).is_ok());
    }

    #[test]
    fn door_blocks_only_while_closed() {
        let pos = GridPos::new(2, 2);
        let mut world = WorldModel::new(grid(5, 5), vec![door_at(pos)]);
        assert!(!world.is_passable(pos));

        assert!(world.set_door_open(pos, true));
        assert!(world.is_passable(pos));

        assert!(world.set_door_open(pos, false));
        assert!(!world.is_passable(pos));
    }

    #[test]
    fn standalone_door_object_blocks_until_opened() {
        let pos = GridPos::new(3, 2);
        let mut world =
            WorldModel::new(grid(5, 5), vec![WorldObject::new(ObjectKind::Door, pos)]);
        assert!(!world.is_passable(pos));

        assert!(world.set_door_open(pos, true));
        assert!(world.is_passable(pos));
    }

    #[test]
    fn take_item_removes_only_pickupables() {
        let mut world = WorldModel::new(
            grid(5, 5),
            vec![
                WorldObject::new(ObjectKind::Obstacle, GridPos::new(1, 1)),
                WorldObject::with_id(ObjectKind::Resource, "crystal", GridPos::new(1, 2)),
            ],
        );
        assert!(world.take_item_at(GridPos::new(1, 1)).is_none());
        let item = world.take_item_at(GridPos::new(1, 2)).unwrap();
        assert_eq!(item.label(), "crystal");
        // Gone from the world.
        assert!(world.take_item_at(GridPos::new(1, 2)).is_none());
        assert_eq!(world.objects().len(), 1);
    }

    #[test]
    fn restore_initial_undoes_all_mutations() {
        let pos = GridPos::new(2, 2);
        let mut world = WorldModel::new(
            grid(5, 5),
            vec![
                door_at(pos),
                WorldObject::with_id(ObjectKind::Resource, "ore", GridPos::new(3, 3)),
            ],
        );

        world.set_door_open(pos, true);
        world.take_item_at(GridPos::new(3, 3));
        world.add_object(WorldObject::new(ObjectKind::Resource, GridPos::new(0, 0)));
        assert_eq!(world.objects().len(), 2);

        world.restore_initial();
        assert_eq!(world.objects().len(), 2);
        assert!(!world.is_passable(pos));
        assert!(world
            .objects()
            .iter()
            .any(|o| o.id.as_deref() == Some("ore")));
    }

    #[test]
    fn door_schedules_fill_defaults() {
        let mut bare_door = WorldObject::new(ObjectKind::Obstacle, GridPos::new(4, 0));
        bare_door.properties.is_door = true;

        let world = WorldModel::new(grid(5, 5), vec![door_at(GridPos::new(1, 0)), bare_door]);
        let schedules = world.door_schedules();
        assert_eq!(schedules.len(), 2);
        assert_eq!(schedules[0].open_time, 3.0);
        assert_eq!(schedules[0].open_duration, 5.0);
        assert_eq!(schedules[1].open_time, DEFAULT_DOOR_OPEN_TIME);
        assert_eq!(schedules[1].open_duration, DEFAULT_DOOR_OPEN_DURATION);
    }

    #[test]
    fn nearby_search_uses_chebyshev_adjacency() {
        let mut world = WorldModel::new(
            grid(10, 10),
            vec![WorldObject::new(ObjectKind::Station, GridPos::new(3, 3))],
        );
        // Diagonal neighbor counts as adjacent.
        assert!(world
            .find_nearby_mut(GridPos::new(2, 2), 1, |o| o.kind == ObjectKind::Station)
            .is_some());
        // Two cells away does not, at radius 1.
        assert!(world
            .find_nearby_mut(GridPos::new(1, 1), 1, |o| o.kind == ObjectKind::Station)
            .is_none());
    }
}
