//! Executor lifecycle events.
//!
//! The executor emits these synchronously and in order; subscribers
//! (the renderer, tests, the headless engine) observe the exact
//! sequence produced, with no batching or reordering.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::Direction;
use crate::ids::InstructionId;
use crate::robot::{GridPos, RobotState};

/// A partial robot-state update: only the fields that changed are set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(default)]
#[ts(export, export_to = "bindings/")]
pub struct RobotDelta {
    /// New position, if it changed.
    pub position: Option<GridPos>,
    /// New facing direction, if it changed.
    pub direction: Option<Direction>,
    /// New energy level, if it changed.
    pub energy: Option<f64>,
    /// New inventory contents, if they changed.
    pub inventory: Option<Vec<String>>,
}

impl RobotDelta {
    /// A delta carrying only a position change.
    pub fn position(position: GridPos) -> Self {
        Self {
            position: Some(position),
            ..Self::default()
        }
    }

    /// A delta carrying only a direction change.
    pub fn direction(direction: Direction) -> Self {
        Self {
            direction: Some(direction),
            ..Self::default()
        }
    }

    /// A delta carrying only an energy change.
    pub fn energy(energy: f64) -> Self {
        Self {
            energy: Some(energy),
            ..Self::default()
        }
    }

    /// A delta carrying only an inventory change.
    pub fn inventory(inventory: Vec<String>) -> Self {
        Self {
            inventory: Some(inventory),
            ..Self::default()
        }
    }

    /// A delta carrying the complete state (used after resets and by
    /// door transitions, which re-sync observers wholesale).
    pub fn full(robot: &RobotState) -> Self {
        Self {
            position: Some(robot.position),
            direction: Some(robot.direction),
            energy: Some(robot.energy),
            inventory: Some(robot.inventory.clone()),
        }
    }
}

/// One executor lifecycle event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "type", rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub enum ExecEvent {
    /// An instruction is about to apply its effects.
    InstructionStarted {
        /// The instruction's stable identifier.
        id: InstructionId,
    },
    /// An instruction finished applying its effects.
    InstructionCompleted {
        /// The instruction's stable identifier.
        id: InstructionId,
    },
    /// Robot or world state changed; carries only the changed fields.
    StateChanged {
        /// The changed robot-state fields.
        delta: RobotDelta,
    },
    /// The whole program ran to completion.
    ProgramCompleted,
    /// A fatal error ended the run.
    Error {
        /// Human-readable error message.
        message: String,
    },
}
