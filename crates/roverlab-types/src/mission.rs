//! Mission definitions: grid, start pose, objects, objectives, and
//! constraints.
//!
//! A mission's object list is the initial snapshot; the world model
//! deep-copies it at session start and restores it on `reset_mission`
//! so destructive run effects never leak between attempts.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{Difficulty, Direction};
use crate::object::WorldObject;
use crate::robot::GridPos;

/// Grid dimensions for a mission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct GridConfig {
    /// Number of columns.
    pub width: i32,
    /// Number of rows.
    pub height: i32,
}

impl GridConfig {
    /// Whether a cell lies within the grid.
    pub const fn contains(&self, pos: GridPos) -> bool {
        pos.x >= 0 && pos.y >= 0 && pos.x < self.width && pos.y < self.height
    }
}

/// The robot's starting pose for a mission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct StartPose {
    /// Starting cell.
    pub position: GridPos,
    /// Starting facing direction.
    pub direction: Direction,
}

/// What a single objective checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum ObjectiveKind {
    /// Final position equals a target cell.
    Reach,
    /// Alias of [`ObjectiveKind::Reach`] kept for mission data parity.
    Move,
    /// A target item was picked up at some point (inventory or history).
    Pickup,
    /// A picked-up item was dropped at the right base.
    Deliver,
    /// Reserved; never satisfied.
    Collect,
    /// Every listed station was activated by `log`.
    LogAt,
    /// A bespoke predicate selected by phrase-matching the description.
    Custom,
}

/// Kind-specific objective target payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "type", rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub enum ObjectiveTarget {
    /// A grid cell (reach/move).
    Cell {
        /// The target cell.
        position: GridPos,
    },
    /// A world-object identifier (pickup/deliver).
    Object {
        /// The target object id.
        id: String,
    },
    /// A set of station positions (log_at).
    Stations {
        /// Cells that must each hold an activated station.
        positions: Vec<GridPos>,
        /// Message the stations were expected to log, if any.
        #[serde(default)]
        required_message: Option<String>,
    },
}

/// A single declarative success condition within a mission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct MissionObjective {
    /// Stable objective identifier, reported in the completion map.
    pub id: String,
    /// What is checked.
    pub kind: ObjectiveKind,
    /// Human-readable description. For [`ObjectiveKind::Custom`] this
    /// text also selects the predicate via a fixed phrase table.
    pub description: String,
    /// Kind-specific target, if the kind needs one.
    #[serde(default)]
    pub target: Option<ObjectiveTarget>,
    /// Required objectives gate overall mission success; optional ones
    /// are reported individually without gating.
    pub required: bool,
}

/// Authoring constraints for a mission.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(default)]
#[ts(export, export_to = "bindings/")]
pub struct MissionConstraints {
    /// Maximum number of program nodes, if limited.
    pub node_limit: Option<u32>,
    /// Wall-clock time limit in seconds, if limited.
    pub time_limit: Option<u32>,
    /// Energy budget, if limited.
    pub energy_limit: Option<f64>,
}

/// Static per-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Mission {
    /// Stable mission identifier (e.g. `"mission_1_1"`).
    pub id: String,
    /// Stage number for ordering.
    pub stage: u32,
    /// Order within the stage.
    pub order: u32,
    /// Display title.
    pub title: String,
    /// Briefing text.
    pub description: String,
    /// Difficulty rating.
    pub difficulty: Difficulty,
    /// Grid dimensions.
    pub grid: GridConfig,
    /// Robot starting pose.
    pub start: StartPose,
    /// Initial object snapshot; deep-copied before each run.
    pub objects: Vec<WorldObject>,
    /// Success conditions.
    pub objectives: Vec<MissionObjective>,
    /// Authoring constraints.
    #[serde(default)]
    pub constraints: MissionConstraints,
    /// Robot starting energy (100 unless the mission says otherwise).
    #[serde(default = "default_energy")]
    pub start_energy: f64,
}

const fn default_energy() -> f64 {
    100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_contains_is_exclusive_of_bounds() {
        let grid = GridConfig {
            width: 10,
            height: 5,
        };
        assert!(grid.contains(GridPos::new(0, 0)));
        assert!(grid.contains(GridPos::new(9, 4)));
        assert!(!grid.contains(GridPos::new(10, 0)));
        assert!(!grid.contains(GridPos::new(0, 5)));
        assert!(!grid.contains(GridPos::new(-1, 0)));
    }

    #[test]
    fn mission_deserializes_with_defaults() {
        let json = r#"{
            "id": "m1",
            "stage": 1,
            "order": 1,
            "title": "First",
            "description": "Reach the flag",
            "difficulty": "tutorial",
            "grid": { "width": 10, "height": 5 },
            "start": { "position": { "x": 2, "y": 2 }, "direction": "east" },
            "objects": [],
            "objectives": []
        }"#;
        let mission: Result<Mission, _> = serde_json::from_str(json);
        assert!(mission.is_ok());
        let mission = mission.unwrap_or_else(|_| unreachable_mission());
        assert_eq!(mission.start_energy, 100.0);
        assert_eq!(mission.constraints.node_limit, None);
    }

    fn unreachable_mission() -> Mission {
        Mission {
            id: String::new(),
            stage: 0,
            order: 0,
            title: String::new(),
            description: String::new(),
            difficulty: Difficulty::Tutorial,
            grid: GridConfig {
                width: 1,
                height: 1,
            },
            start: StartPose {
                position: GridPos::new(0, 0),
                direction: Direction::North,
            },
            objects: Vec::new(),
            objectives: Vec::new(),
            constraints: MissionConstraints::default(),
            start_energy: 0.0,
        }
    }
}
