//! Mission content and completion logic: the built-in catalog,
//! definition-time validation, and the pure objective checker run
//! against session state.

pub mod catalog;
pub mod checker;
pub mod validate;

pub use catalog::{all_missions, mission_by_id};
pub use checker::{check_mission, MissionProgress};
pub use validate::{validate_mission, MissionValidation};
