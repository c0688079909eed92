//! Placed world objects and their mutable property flags.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::ObjectKind;
use crate::robot::GridPos;

/// Mutable flags carried by a world object.
///
/// Every field has a serde default so mission definitions only spell
/// out the flags they care about. The executor and the door scheduler
/// are the only writers during a run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(default)]
#[ts(export, export_to = "bindings/")]
pub struct ObjectProperties {
    /// Marks an obstacle as a door; doors block only while closed.
    pub is_door: bool,
    /// Live open/closed flag of a door. May flip asynchronously on a
    /// timer, so movement checks must read it at check time.
    pub is_open: bool,
    /// Seconds after run start at which a timed door opens.
    pub open_time: Option<f64>,
    /// Seconds a timed door stays open before closing again.
    pub open_duration: Option<f64>,
    /// Set by `log` at a station or by `activate` nearby.
    pub activated: bool,
    /// Message recorded when a station was activated by `log`.
    pub message: Option<String>,
    /// The object needs repair.
    pub damaged: bool,
    /// The object has been repaired this run.
    pub repaired: bool,
    /// The object can be removed by `destroy`.
    pub destructible: bool,
    /// Set by `use` on an interactive object.
    pub used: bool,
    /// A base/goal received a delivery this run.
    pub delivered: bool,
    /// The item identifier that was delivered.
    pub delivered_item: Option<String>,
}

/// A single object placed on the mission grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct WorldObject {
    /// What the object is.
    pub kind: ObjectKind,
    /// Optional mission-assigned identifier (e.g. `"crystal"`); objects
    /// without one are referred to by their kind.
    #[serde(default)]
    pub id: Option<String>,
    /// Cell the object occupies.
    pub position: GridPos,
    /// Mutable flags.
    #[serde(default)]
    pub properties: ObjectProperties,
}

impl WorldObject {
    /// Create an object with default properties.
    pub fn new(kind: ObjectKind, position: GridPos) -> Self {
        Self {
            kind,
            id: None,
            position,
            properties: ObjectProperties::default(),
        }
    }

    /// Create an object with an identifier.
    pub fn with_id(kind: ObjectKind, id: impl Into<String>, position: GridPos) -> Self {
        Self {
            kind,
            id: Some(id.into()),
            position,
            properties: ObjectProperties::default(),
        }
    }

    /// The identifier used when this object enters an inventory: its
    /// mission id if present, otherwise its kind name.
    pub fn label(&self) -> String {
        self.id.clone().unwrap_or_else(|| {
            // Kind names serialize lowercase; reuse that spelling.
            format!("{:?}", self.kind).to_lowercase()
        })
    }

    /// Whether this object is a door (either a door-tagged obstacle or
    /// a standalone door object).
    pub fn is_door(&self) -> bool {
        self.properties.is_door || self.kind == ObjectKind::Door
    }

    /// Whether this object currently blocks movement onto its cell.
    ///
    /// Doors of either spelling block only while closed; plain
    /// obstacles always block.
    pub fn blocks_movement(&self) -> bool {
        if self.is_door() {
            return !self.properties.is_open;
        }
        self.kind == ObjectKind::Obstacle
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_prefers_mission_id() {
        let named = WorldObject::with_id(ObjectKind::Resource, "crystal", GridPos::new(1, 1));
        assert_eq!(named.label(), "crystal");

        let anonymous = WorldObject::new(ObjectKind::Container, GridPos::new(1, 1));
        assert_eq!(anonymous.label(), "container");
    }

    #[test]
    fn closed_door_blocks_open_door_does_not() {
        let mut door = WorldObject::new(ObjectKind::Obstacle, GridPos::new(4, 4));
        door.properties.is_door = true;
        assert!(door.blocks_movement());

        door.properties.is_open = true;
        assert!(!door.blocks_movement());
    }

    #[test]
    fn standalone_door_kind_blocks_while_closed() {
        let mut door = WorldObject::new(ObjectKind::Door, GridPos::new(3, 2));
        assert!(door.is_door());
        assert!(door.blocks_movement());

        door.properties.is_open = true;
        assert!(!door.blocks_movement());
    }

    #[test]
    fn plain_obstacle_always_blocks() {
        let wall = WorldObject::new(ObjectKind::Obstacle, GridPos::new(0, 0));
        assert!(wall.blocks_movement());
    }

    #[test]
    fn non_obstacles_never_block() {
        let goal = WorldObject::new(ObjectKind::Goal, GridPos::new(0, 0));
        assert!(!goal.blocks_movement());
    }

    #[test]
    fn properties_deserialize_with_defaults() {
        let json = r#"{"kind":"obstacle","position":{"x":3,"y":1},"properties":{"is_door":true}}"#;
        let obj: WorldObject = serde_json::from_str(json).unwrap_or_else(|_| {
            WorldObject::new(ObjectKind::Marker, GridPos::new(0, 0))
        });
        assert_eq!(obj.kind, ObjectKind::Obstacle);
        assert!(obj.properties.is_door);
        assert!(!obj.properties.is_open);
        assert_eq!(obj.properties.open_time, None);
    }
}
