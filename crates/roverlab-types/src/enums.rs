//! Enumeration types shared across the Roverlab workspace.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::robot::GridPos;

/// Cardinal facing direction of the robot.
///
/// The grid origin is the top-left corner: `North` decreases `y`,
/// `South` increases it, `East` increases `x`, `West` decreases it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum Direction {
    /// Toward the top edge of the grid (`y - 1`).
    North,
    /// Toward the right edge of the grid (`x + 1`).
    East,
    /// Toward the bottom edge of the grid (`y + 1`).
    South,
    /// Toward the left edge of the grid (`x - 1`).
    West,
}

impl Direction {
    /// Rotate 90 degrees counter-clockwise.
    pub const fn left(self) -> Self {
        match self {
            Self::North => Self::West,
            Self::West => Self::South,
            Self::South => Self::East,
            Self::East => Self::North,
        }
    }

    /// Rotate 90 degrees clockwise.
    pub const fn right(self) -> Self {
        match self {
            Self::North => Self::East,
            Self::East => Self::South,
            Self::South => Self::West,
            Self::West => Self::North,
        }
    }

    /// The cell one step from `from` in this direction.
    pub const fn step(self, from: GridPos) -> GridPos {
        match self {
            Self::North => GridPos::new(from.x, from.y - 1),
            Self::East => GridPos::new(from.x + 1, from.y),
            Self::South => GridPos::new(from.x, from.y + 1),
            Self::West => GridPos::new(from.x - 1, from.y),
        }
    }

    /// The direction 180 degrees from this one (used for backward moves).
    pub const fn opposite(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::South => Self::North,
            Self::East => Self::West,
            Self::West => Self::East,
        }
    }
}

/// Direction of a move instruction relative to the robot's facing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum MoveDir {
    /// One cell in the facing direction.
    Forward,
    /// One cell opposite the facing direction (facing is unchanged).
    Backward,
}

/// Direction of a turn instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum TurnDir {
    /// 90 degrees counter-clockwise.
    Left,
    /// 90 degrees clockwise.
    Right,
}

/// Kinds of generic world-interaction instructions.
///
/// These represent optional environmental interactions: finding no
/// qualifying target object nearby is a soft failure (logged no-op),
/// not a fatal one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum ActionKind {
    /// Activate a station, terminal, or door nearby.
    Activate,
    /// Report objects within a two-cell radius (no mutation).
    Scan,
    /// Repair a damaged object nearby.
    Repair,
    /// Build a structure (reserved; currently a logged no-op).
    Build,
    /// Destroy a destructible object nearby.
    Destroy,
    /// Open the door in the cell directly ahead.
    Open,
    /// Close the door in the cell directly ahead.
    Close,
    /// Use an interactive object (terminal, lever, button) nearby.
    Use,
}

/// Kind of a placed world object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum ObjectKind {
    /// Blocks movement. May be tagged as a door via its properties.
    Obstacle,
    /// Can be picked up.
    Resource,
    /// Target cell; dropping an item here records a delivery.
    Goal,
    /// Beacon that can be activated by `log` or `activate`.
    Station,
    /// Picked up like a resource.
    Container,
    /// Delivery destination; dropping an item here records a delivery.
    Base,
    /// A standalone door object (activatable).
    Door,
    /// Interactive console.
    Terminal,
    /// Interactive lever.
    Lever,
    /// Interactive button.
    Button,
    /// Decorative waypoint marker (no interaction).
    Marker,
}

/// Mission difficulty rating (display metadata).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum Difficulty {
    /// Guided introduction.
    Tutorial,
    /// Single-concept missions.
    Easy,
    /// Combines two or more concepts.
    Medium,
    /// Requires planning.
    Hard,
    /// Optimization challenges.
    Expert,
}
