//! Headless mission runner for Roverlab.
//!
//! Wires the whole execution core together: loads a mission from the
//! catalog, converts its bundled demo program graph to an instruction
//! tree, runs it through the executor, and reports objective results.
//!
//! # Startup Sequence
//!
//! 1. Initialize structured logging (tracing)
//! 2. Load configuration from `roverlab-config.yaml`
//! 3. Look up and validate the mission
//! 4. Build and validate the demo program graph
//! 5. Convert the graph to an instruction tree
//! 6. Create the executor session
//! 7. Subscribe the event logger
//! 8. Run the program
//! 9. Check objectives and log the result

mod config;
mod demo;
mod error;

use std::sync::Arc;

use roverlab_exec::{ExecError, Executor, ExecutorConfig, FunctionLibrary, FunctionSource};
use roverlab_flow::{validate_graph, GraphConverter};
use roverlab_missions::{check_mission, mission_by_id, validate_mission};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::EngineConfig;
use crate::error::EngineError;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("roverlab-engine starting");

    // 2. Load configuration.
    let config = EngineConfig::load()?;
    info!(
        mission_id = %config.mission_id,
        pacing_scale = config.pacing_scale,
        "Configuration loaded"
    );

    // 3. Look up and validate the mission.
    let mission = mission_by_id(&config.mission_id).ok_or_else(|| EngineError::UnknownMission {
        id: config.mission_id.clone(),
    })?;
    let mission_check = validate_mission(&mission);
    if !mission_check.is_valid() {
        return Err(EngineError::InvalidMission {
            id: mission.id.clone(),
            details: mission_check.errors.join("; "),
        }
        .into());
    }
    info!(
        mission = %mission.id,
        title = %mission.title,
        objectives = mission.objectives.len(),
        "Mission loaded"
    );

    // 4. Build and validate the demo program graph.
    let graph = demo::demo_graph(&mission.id).ok_or_else(|| EngineError::NoDemoProgram {
        id: mission.id.clone(),
    })?;
    let graph_check = validate_graph(&graph);
    if !graph_check.is_valid() {
        return Err(EngineError::InvalidProgram {
            details: graph_check.errors.join("; "),
        }
        .into());
    }
    for warning in &graph_check.warnings {
        tracing::warn!(%warning, "program graph warning");
    }

    // 5. Convert the graph to an instruction tree.
    let program = GraphConverter::new(&graph)
        .convert()
        .map_err(EngineError::from)?;
    info!(
        nodes = graph.nodes.len(),
        instructions = program.len(),
        "Program converted"
    );

    // 6. Create the executor session.
    let functions: Arc<dyn FunctionSource> = Arc::new(FunctionLibrary::new());
    let executor = Arc::new(Executor::new(
        &mission,
        functions,
        ExecutorConfig {
            pacing_scale: config.pacing_scale,
        },
    ));
    executor.load_program(program.clone());
    info!("Executor session created");

    // 7. Subscribe the event logger.
    let mut logger_handle = None;
    if config.log_events {
        let mut events = executor.subscribe();
        logger_handle = Some(tokio::spawn(async move {
            while let Ok(event) = events.recv().await {
                info!(event = ?event, "executor event");
            }
        }));
    }

    // 8. Run the program.
    let run_result = executor.run().await;
    match &run_result {
        Ok(()) => info!(status = ?executor.status(), "run finished"),
        Err(err) => tracing::error!(error = %err, "run failed"),
    }

    // 9. Check objectives and log the result.
    let robot = executor.robot_snapshot().await;
    let progress = {
        let world = executor.world();
        let world = world.lock().await;
        check_mission(&mission, &world, &robot, &program)
    };
    for (objective_id, satisfied) in &progress.objectives {
        info!(objective = %objective_id, satisfied, "objective result");
    }
    info!(
        completed = progress.completed,
        energy = robot.energy,
        position = %robot.position,
        "roverlab-engine shutdown complete"
    );

    if let Some(handle) = logger_handle {
        handle.abort();
    }
    run_result.map_err(|e: ExecError| EngineError::from(e).into())
}
