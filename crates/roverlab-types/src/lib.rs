//! Shared type definitions for the Roverlab execution core.
//!
//! This crate is the single source of truth for all types used across
//! the Roverlab workspace. Types defined here flow downstream to
//! `TypeScript` via `ts-rs` for the editor and renderer frontend.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrappers
//! - [`enums`] -- Directions, object/action kinds, difficulty
//! - [`robot`] -- Grid positions and robot state
//! - [`object`] -- Placed world objects and property flags
//! - [`instruction`] -- The instruction tree (IR)
//! - [`flow`] -- The authored editor graph
//! - [`mission`] -- Mission definitions and objectives
//! - [`function`] -- User-authored subroutines
//! - [`event`] -- Executor lifecycle events

pub mod enums;
pub mod event;
pub mod flow;
pub mod function;
pub mod ids;
pub mod instruction;
pub mod mission;
pub mod object;
pub mod robot;

// Re-export all public types at crate root for convenience.
pub use enums::{ActionKind, Difficulty, Direction, MoveDir, ObjectKind, TurnDir};
pub use event::{ExecEvent, RobotDelta};
pub use flow::{
    ActionData, FlowEdge, FlowGraph, FlowNode, FlowNodeKind, LoopData, HANDLE_BODY, HANDLE_FALSE,
    HANDLE_NEXT, HANDLE_TRUE,
};
pub use function::UserFunction;
pub use ids::InstructionId;
pub use instruction::{sequence_contains, sequence_len, Instruction, InstructionKind, InstructionSeq};
pub use mission::{
    GridConfig, Mission, MissionConstraints, MissionObjective, ObjectiveKind, ObjectiveTarget,
    StartPose,
};
pub use object::{ObjectProperties, WorldObject};
pub use robot::{GridPos, PickupRecord, RobotState};
