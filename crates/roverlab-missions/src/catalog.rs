//! The built-in mission catalog.

use roverlab_types::{
    Difficulty, Direction, GridConfig, GridPos, Mission, MissionConstraints, MissionObjective,
    ObjectKind, ObjectiveKind, ObjectiveTarget, StartPose, WorldObject,
};

/// All built-in missions, ordered by stage and order-within-stage.
pub fn all_missions() -> Vec<Mission> {
    vec![
        first_steps(),
        loop_the_path(),
        special_delivery(),
        patience_pays(),
        beacon_run(),
    ]
}

/// Look up a built-in mission by id.
pub fn mission_by_id(id: &str) -> Option<Mission> {
    all_missions().into_iter().find(|m| m.id == id)
}

fn first_steps() -> Mission {
    Mission {
        id: "mission_1_1".to_owned(),
        stage: 1,
        order: 1,
        title: "First Steps".to_owned(),
        description: "Drive the rover to the flag.".to_owned(),
        difficulty: Difficulty::Tutorial,
        grid: GridConfig {
            width: 8,
            height: 6,
        },
        start: StartPose {
            position: GridPos::new(1, 2),
            direction: Direction::East,
        },
        objects: vec![WorldObject::with_id(
            ObjectKind::Goal,
            "flag",
            GridPos::new(5, 2),
        )],
        objectives: vec![MissionObjective {
            id: "reach_flag".to_owned(),
            kind: ObjectiveKind::Reach,
            description: "Reach the flag.".to_owned(),
            target: Some(ObjectiveTarget::Cell {
                position: GridPos::new(5, 2),
            }),
            required: true,
        }],
        constraints: MissionConstraints::default(),
        start_energy: 100.0,
    }
}

fn loop_the_path() -> Mission {
    Mission {
        id: "mission_1_2".to_owned(),
        stage: 1,
        order: 2,
        title: "Loop the Path".to_owned(),
        description: "The corridor is long; a loop keeps the program short.".to_owned(),
        difficulty: Difficulty::Easy,
        grid: GridConfig {
            width: 10,
            height: 6,
        },
        start: StartPose {
            position: GridPos::new(0, 2),
            direction: Direction::East,
        },
        objects: vec![WorldObject::with_id(
            ObjectKind::Goal,
            "flag",
            GridPos::new(8, 2),
        )],
        objectives: vec![
            MissionObjective {
                id: "reach_flag".to_owned(),
                kind: ObjectiveKind::Reach,
                description: "Reach the flag.".to_owned(),
                target: Some(ObjectiveTarget::Cell {
                    position: GridPos::new(8, 2),
                }),
                required: true,
            },
            MissionObjective {
                id: "use_loop".to_owned(),
                kind: ObjectiveKind::Custom,
                description: "Use a loop instead of repeating blocks.".to_owned(),
                target: None,
                required: true,
            },
        ],
        constraints: MissionConstraints {
            node_limit: Some(6),
            ..MissionConstraints::default()
        },
        start_energy: 100.0,
    }
}

fn special_delivery() -> Mission {
    Mission {
        id: "mission_1_3".to_owned(),
        stage: 1,
        order: 3,
        title: "Special Delivery".to_owned(),
        description: "Collect the sample and bring it back to base.".to_owned(),
        difficulty: Difficulty::Easy,
        grid: GridConfig {
            width: 8,
            height: 8,
        },
        start: StartPose {
            position: GridPos::new(1, 4),
            direction: Direction::East,
        },
        objects: vec![
            WorldObject::with_id(ObjectKind::Resource, "sample", GridPos::new(5, 4)),
            WorldObject::with_id(ObjectKind::Base, "base", GridPos::new(1, 6)),
            WorldObject::new(ObjectKind::Obstacle, GridPos::new(3, 5)),
        ],
        objectives: vec![
            MissionObjective {
                id: "pickup_sample".to_owned(),
                kind: ObjectiveKind::Pickup,
                description: "Pick up the sample.".to_owned(),
                target: Some(ObjectiveTarget::Object {
                    id: "sample".to_owned(),
                }),
                required: true,
            },
            MissionObjective {
                id: "deliver_sample".to_owned(),
                kind: ObjectiveKind::Deliver,
                description: "Deliver the sample to the base.".to_owned(),
                target: Some(ObjectiveTarget::Object {
                    id: "sample".to_owned(),
                }),
                required: true,
            },
        ],
        constraints: MissionConstraints::default(),
        start_energy: 100.0,
    }
}

fn patience_pays() -> Mission {
    let mut door = WorldObject::with_id(ObjectKind::Obstacle, "gate", GridPos::new(4, 2));
    door.properties.is_door = true;
    door.properties.open_time = Some(3.0);
    door.properties.open_duration = Some(4.0);

    Mission {
        id: "mission_2_1".to_owned(),
        stage: 2,
        order: 1,
        title: "Patience Pays".to_owned(),
        description: "The gate opens on its own schedule. Wait for it.".to_owned(),
        difficulty: Difficulty::Medium,
        grid: GridConfig {
            width: 9,
            height: 5,
        },
        start: StartPose {
            position: GridPos::new(1, 2),
            direction: Direction::East,
        },
        objects: vec![
            door,
            WorldObject::new(ObjectKind::Obstacle, GridPos::new(4, 1)),
            WorldObject::new(ObjectKind::Obstacle, GridPos::new(4, 3)),
            WorldObject::with_id(ObjectKind::Goal, "flag", GridPos::new(7, 2)),
        ],
        objectives: vec![MissionObjective {
            id: "reach_flag".to_owned(),
            kind: ObjectiveKind::Reach,
            description: "Reach the flag beyond the gate.".to_owned(),
            target: Some(ObjectiveTarget::Cell {
                position: GridPos::new(7, 2),
            }),
            required: true,
        }],
        constraints: MissionConstraints::default(),
        start_energy: 100.0,
    }
}

fn beacon_run() -> Mission {
    let beacons = [GridPos::new(2, 1), GridPos::new(7, 1), GridPos::new(7, 6)];
    Mission {
        id: "mission_2_2".to_owned(),
        stage: 2,
        order: 2,
        title: "Beacon Run".to_owned(),
        description: "Report in at every survey beacon.".to_owned(),
        difficulty: Difficulty::Medium,
        grid: GridConfig {
            width: 10,
            height: 8,
        },
        start: StartPose {
            position: GridPos::new(2, 6),
            direction: Direction::North,
        },
        objects: beacons
            .iter()
            .map(|pos| WorldObject::new(ObjectKind::Station, *pos))
            .collect(),
        objectives: vec![MissionObjective {
            id: "report_all".to_owned(),
            kind: ObjectiveKind::LogAt,
            description: "Log a report at every beacon.".to_owned(),
            target: Some(ObjectiveTarget::Stations {
                positions: beacons.to_vec(),
                required_message: None,
            }),
            required: true,
        }],
        constraints: MissionConstraints {
            energy_limit: Some(60.0),
            ..MissionConstraints::default()
        },
        start_energy: 100.0,
    }
}
