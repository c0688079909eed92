//! Mission sanity checks, run at catalog load and on authored missions
//! before a session starts.

use std::collections::BTreeSet;

use roverlab_types::{Mission, ObjectKind, ObjectiveTarget};

/// Outcome of validating one mission definition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MissionValidation {
    /// Problems that make the mission unplayable.
    pub errors: Vec<String>,
    /// Suspicious but playable details.
    pub warnings: Vec<String>,
}

impl MissionValidation {
    /// True when no errors were found.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Check a mission's internal consistency: grid shape, start pose,
/// object placement, and objective targets.
pub fn validate_mission(mission: &Mission) -> MissionValidation {
    let mut result = MissionValidation::default();

    if mission.grid.width <= 0 || mission.grid.height <= 0 {
        result.errors.push(format!(
            "grid {}x{} is degenerate",
            mission.grid.width, mission.grid.height
        ));
        // Everything below assumes a usable grid.
        return result;
    }

    if !mission.grid.contains(mission.start.position) {
        result.errors.push(format!(
            "start position {} is outside the grid",
            mission.start.position
        ));
    }
    let start_blocked = mission.objects.iter().any(|obj| {
        obj.position == mission.start.position && obj.kind == ObjectKind::Obstacle
    });
    if start_blocked {
        result
            .errors
            .push("start position is covered by an obstacle".to_owned());
    }

    for obj in &mission.objects {
        if !mission.grid.contains(obj.position) {
            result.errors.push(format!(
                "object '{}' at {} is outside the grid",
                obj.label(),
                obj.position
            ));
        }
    }

    if mission.objectives.is_empty() {
        result
            .warnings
            .push("mission has no objectives".to_owned());
    }
    let mut seen_ids = BTreeSet::new();
    for objective in &mission.objectives {
        if !seen_ids.insert(objective.id.as_str()) {
            result
                .errors
                .push(format!("duplicate objective id '{}'", objective.id));
        }
        match &objective.target {
            Some(ObjectiveTarget::Cell { position }) => {
                if !mission.grid.contains(*position) {
                    result.errors.push(format!(
                        "objective '{}' targets {} outside the grid",
                        objective.id, position
                    ));
                }
            }
            Some(ObjectiveTarget::Object { id }) => {
                let exists = mission
                    .objects
                    .iter()
                    .any(|obj| obj.id.as_deref() == Some(id));
                if !exists {
                    result.errors.push(format!(
                        "objective '{}' targets unknown object '{id}'",
                        objective.id
                    ));
                }
            }
            Some(ObjectiveTarget::Stations { positions, .. }) => {
                for pos in positions {
                    let has_station = mission
                        .objects
                        .iter()
                        .any(|obj| obj.kind == ObjectKind::Station && obj.position == *pos);
                    if !has_station {
                        result.errors.push(format!(
                            "objective '{}' lists {} but no station is there",
                            objective.id, pos
                        ));
                    }
                }
            }
            None => {}
        }
    }

    if !result.is_valid() {
        tracing::warn!(mission = %mission.id, errors = result.errors.len(), "mission failed validation");
    }
    result
}

#[cfg(test)]
mod tests {
    use roverlab_types::{
        Difficulty, Direction, GridConfig, GridPos, MissionConstraints, MissionObjective,
        ObjectiveKind, StartPose, WorldObject,
    };

    use super::*;

    fn base_mission() -> Mission {
        Mission {
            id: "m".to_owned(),
            stage: 1,
            order: 1,
            title: "M".to_owned(),
            description: String::new(),
            difficulty: Difficulty::Easy,
            grid: GridConfig {
                width: 8,
                height: 8,
            },
            start: StartPose {
                position: GridPos::new(1, 1),
                direction: Direction::East,
            },
            objects: vec![],
            objectives: vec![MissionObjective {
                id: "goal".to_owned(),
                kind: ObjectiveKind::Reach,
                description: String::new(),
                target: Some(ObjectiveTarget::Cell {
                    position: GridPos::new(5, 5),
                }),
                required: true,
            }],
            constraints: MissionConstraints::default(),
            start_energy: 100.0,
        }
    }

    #[test]
    fn well_formed_mission_passes() {
        assert!(validate_mission(&base_mission()).is_valid());
    }

    #[test]
    fn start_outside_grid_is_an_error() {
        let mut mission = base_mission();
        mission.start.position = GridPos::new(8, 1);
        assert!(!validate_mission(&mission).is_valid());
    }

    #[test]
    fn start_under_an_obstacle_is_an_error() {
        let mut mission = base_mission();
        mission
            .objects
            .push(WorldObject::new(ObjectKind::Obstacle, GridPos::new(1, 1)));
        assert!(!validate_mission(&mission).is_valid());
    }

    #[test]
    fn objective_targeting_missing_object_is_an_error() {
        let mut mission = base_mission();
        mission.objectives.push(MissionObjective {
            id: "grab".to_owned(),
            kind: ObjectiveKind::Pickup,
            description: String::new(),
            target: Some(ObjectiveTarget::Object {
                id: "ghost".to_owned(),
            }),
            required: true,
        });
        let result = validate_mission(&mission);
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.contains("ghost")));
    }

    #[test]
    fn duplicate_objective_ids_are_an_error() {
        let mut mission = base_mission();
        let dup = mission.objectives[0].clone();
        mission.objectives.push(dup);
        assert!(!validate_mission(&mission).is_valid());
    }

    #[test]
    fn no_objectives_is_only_a_warning() {
        let mut mission = base_mission();
        mission.objectives.clear();
        let result = validate_mission(&mission);
        assert!(result.is_valid());
        assert_eq!(result.warnings.len(), 1);
    }
}
