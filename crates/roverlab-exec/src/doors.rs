//! Timed-door scheduling: one background task per door, running on
//! wall-clock delays independent of the executor's pause and stop
//! state.

use std::sync::Arc;
use std::time::Duration;

use roverlab_types::{ExecEvent, RobotDelta, RobotState};
use roverlab_world::{DoorSchedule, WorldModel};
use tokio::sync::{broadcast, Mutex};
use tokio::task::JoinHandle;

/// How often a door waiting to close re-checks whether the robot has
/// left its cell.
const VACATE_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Owns the background tasks driving timed doors for one run.
///
/// Dropping the scheduler aborts the tasks; the executor keeps it alive
/// past the end of the run so doors keep cycling until the mission is
/// reset.
#[derive(Debug)]
pub struct DoorScheduler {
    tasks: Vec<JoinHandle<()>>,
}

impl DoorScheduler {
    /// Spawn one timer task per schedule.
    ///
    /// Each task opens its door `open_time` seconds from now, holds it
    /// open for `open_duration` seconds, then closes it. A door never
    /// closes on top of the robot: closing waits until the cell is
    /// vacated.
    pub fn start(
        world: Arc<Mutex<WorldModel>>,
        robot: Arc<Mutex<RobotState>>,
        events: broadcast::Sender<ExecEvent>,
        schedules: Vec<DoorSchedule>,
    ) -> Self {
        let tasks = schedules
            .into_iter()
            .map(|schedule| {
                let world = Arc::clone(&world);
                let robot = Arc::clone(&robot);
                let events = events.clone();
                tokio::spawn(async move {
                    drive_door(schedule, world, robot, events).await;
                })
            })
            .collect();
        Self { tasks }
    }

    /// Abort every door task.
    pub fn shutdown(&mut self) {
        for task in self.tasks.drain(..) {
            task.abort();
        }
    }
}

impl Drop for DoorScheduler {
    fn drop(&mut self) {
        self.shutdown();
    }
}

async fn drive_door(
    schedule: DoorSchedule,
    world: Arc<Mutex<WorldModel>>,
    robot: Arc<Mutex<RobotState>>,
    events: broadcast::Sender<ExecEvent>,
) {
    tokio::time::sleep(Duration::from_secs_f64(schedule.open_time.max(0.0))).await;
    set_door(&world, &schedule, true).await;
    tracing::info!(position = %schedule.position, "door opened");
    emit_sync(&robot, &events).await;

    tokio::time::sleep(Duration::from_secs_f64(schedule.open_duration.max(0.0))).await;
    // Wait for the robot to step off the cell before closing.
    loop {
        let occupied = robot.lock().await.position == schedule.position;
        if !occupied {
            break;
        }
        tracing::debug!(position = %schedule.position, "door held open by robot");
        tokio::time::sleep(VACATE_POLL_INTERVAL).await;
    }
    set_door(&world, &schedule, false).await;
    tracing::info!(position = %schedule.position, "door closed");
    emit_sync(&robot, &events).await;
}

async fn set_door(world: &Arc<Mutex<WorldModel>>, schedule: &DoorSchedule, open: bool) {
    let updated = world.lock().await.set_door_open(schedule.position, open);
    if !updated {
        tracing::warn!(position = %schedule.position, "scheduled door no longer exists");
    }
}

/// Door transitions change what observers can see of the world, so they
/// re-sync the full robot state rather than a narrow delta.
async fn emit_sync(robot: &Arc<Mutex<RobotState>>, events: &broadcast::Sender<ExecEvent>) {
    let delta = RobotDelta::full(&*robot.lock().await);
    let _ = events.send(ExecEvent::StateChanged { delta });
}
