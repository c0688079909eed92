//! Grid world model for the Roverlab execution core.
//!
//! Owns the mission grid and the mutable object list, and answers the
//! movement, adjacency, and door queries the executor and the door
//! timer scheduler run during execution.

pub mod error;
pub mod world;

pub use error::WorldError;
pub use world::{
    DoorSchedule, WorldModel, DEFAULT_DOOR_OPEN_DURATION, DEFAULT_DOOR_OPEN_TIME,
};
