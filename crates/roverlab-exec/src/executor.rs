//! The async tree-walking executor.
//!
//! One executor owns a mission session: the world model, the robot
//! state, the run controls, and the event channel. `run` walks the
//! loaded instruction tree cooperatively -- pause, resume, and stop all
//! take effect at instruction boundaries, and pacing sleeps between
//! instructions are cut short by a stop.
//!
//! World and robot state live behind `Arc<tokio::sync::Mutex>` because
//! the door scheduler's timer tasks read and write them concurrently
//! with the run. Locks are held only for the duration of a single
//! query or mutation, never across an await on user-visible time.

use std::sync::{Arc, Mutex as StdMutex, PoisonError};
use std::time::Duration;

use futures::future::BoxFuture;
use roverlab_types::{
    ActionKind, ExecEvent, Instruction, InstructionKind, InstructionSeq, Mission, MoveDir,
    ObjectKind, RobotDelta, RobotState, StartPose, TurnDir, WorldObject,
};
use roverlab_world::WorldModel;
use tokio::sync::{broadcast, Mutex};

use crate::condition;
use crate::controls::RunControls;
use crate::costs::CostTable;
use crate::doors::DoorScheduler;
use crate::error::ExecError;
use crate::functions::FunctionSource;

/// Maximum depth of nested function calls during execution.
pub const MAX_CALL_DEPTH: u32 = 8;

/// Soft ceiling on `while` loop iterations; reaching it ends the loop
/// with a warning instead of running forever.
pub const LOOP_ITERATION_LIMIT: u32 = 1000;

const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Lifecycle state of an executor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// No run in progress.
    Idle,
    /// A run is executing instructions.
    Running,
    /// A run is alive but paused at an instruction boundary.
    Paused,
    /// The last run finished the whole program.
    Completed,
    /// The last run was stopped by request.
    Stopped,
    /// The last run ended with a fatal error.
    Errored,
}

/// Tunable execution parameters.
#[derive(Debug, Clone, Copy)]
pub struct ExecutorConfig {
    /// Multiplier on pacing delays. `1.0` is real time; `0.0` disables
    /// pacing entirely (used by tests and headless checks).
    pub pacing_scale: f64,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self { pacing_scale: 1.0 }
    }
}

/// Executes instruction trees against a mission session.
pub struct Executor {
    world: Arc<Mutex<WorldModel>>,
    robot: Arc<Mutex<RobotState>>,
    controls: Arc<RunControls>,
    events: broadcast::Sender<ExecEvent>,
    functions: Arc<dyn FunctionSource>,
    costs: CostTable,
    config: ExecutorConfig,
    start: StartPose,
    start_energy: f64,
    program: StdMutex<Option<Arc<InstructionSeq>>>,
    status: StdMutex<RunStatus>,
    doors: StdMutex<Option<DoorScheduler>>,
}

impl std::fmt::Debug for Executor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Executor")
            .field("status", &self.status())
            .field("start", &self.start)
            .finish_non_exhaustive()
    }
}

impl Executor {
    /// Create an executor for a mission session.
    pub fn new(
        mission: &Mission,
        functions: Arc<dyn FunctionSource>,
        config: ExecutorConfig,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            world: Arc::new(Mutex::new(WorldModel::from_mission(mission))),
            robot: Arc::new(Mutex::new(RobotState::new(
                mission.start.position,
                mission.start.direction,
                mission.start_energy,
            ))),
            controls: Arc::new(RunControls::new()),
            events,
            functions,
            costs: CostTable,
            config: ExecutorConfig {
                pacing_scale: config.pacing_scale.max(0.0),
            },
            start: mission.start,
            start_energy: mission.start_energy,
            program: StdMutex::new(None),
            status: StdMutex::new(RunStatus::Idle),
            doors: StdMutex::new(None),
        }
    }

    // -----------------------------------------------------------------------
    // Session accessors
    // -----------------------------------------------------------------------

    /// A new receiver for the executor's event stream.
    pub fn subscribe(&self) -> broadcast::Receiver<ExecEvent> {
        self.events.subscribe()
    }

    /// The shared run controls (pause / resume / stop).
    pub fn controls(&self) -> Arc<RunControls> {
        Arc::clone(&self.controls)
    }

    /// The shared world model.
    pub fn world(&self) -> Arc<Mutex<WorldModel>> {
        Arc::clone(&self.world)
    }

    /// A snapshot of the robot's current state.
    pub async fn robot_snapshot(&self) -> RobotState {
        self.robot.lock().await.clone()
    }

    /// Current lifecycle state. A running executor whose controls are
    /// paused reports [`RunStatus::Paused`].
    pub fn status(&self) -> RunStatus {
        let status = *lock_recover(&self.status);
        if status == RunStatus::Running && self.controls.is_paused() {
            RunStatus::Paused
        } else {
            status
        }
    }

    /// Load (or replace) the program to execute.
    pub fn load_program(&self, program: InstructionSeq) {
        *lock_recover(&self.program) = Some(Arc::new(program));
    }

    // -----------------------------------------------------------------------
    // Run lifecycle
    // -----------------------------------------------------------------------

    /// Execute the loaded program to completion, stop, or fatal error.
    ///
    /// Starts the timed-door scheduler for any doors in the world; door
    /// timers outlive the run and are cleared by
    /// [`Executor::reset_mission`].
    ///
    /// # Errors
    ///
    /// [`ExecError::NoProgram`] when nothing is loaded,
    /// [`ExecError::AlreadyRunning`] when a run is in progress, or the
    /// fatal error that ended the run.
    pub async fn run(&self) -> Result<(), ExecError> {
        let program = lock_recover(&self.program)
            .clone()
            .ok_or(ExecError::NoProgram)?;
        {
            let mut status = lock_recover(&self.status);
            if *status == RunStatus::Running {
                return Err(ExecError::AlreadyRunning);
            }
            *status = RunStatus::Running;
        }
        self.controls.clear_stop();
        self.start_door_timers().await;
        tracing::info!(instructions = program.len(), "program run started");

        let result = self.run_sequence(&program, 0).await;
        match &result {
            Ok(()) if self.controls.is_stop_requested() => {
                self.set_status(RunStatus::Stopped);
                tracing::info!("program run stopped");
            }
            Ok(()) => {
                self.set_status(RunStatus::Completed);
                self.emit(ExecEvent::ProgramCompleted);
                tracing::info!("program run completed");
            }
            Err(err) => {
                self.set_status(RunStatus::Errored);
                self.emit(ExecEvent::Error {
                    message: err.to_string(),
                });
                tracing::error!(error = %err, "program run failed");
            }
        }
        result
    }

    /// Reset the robot to its start pose, energy, and empty inventory.
    /// The world (and any running door timers) are left as they are.
    pub async fn reset(&self) {
        self.controls.clear();
        let delta = {
            let mut robot = self.robot.lock().await;
            *robot = RobotState::new(self.start.position, self.start.direction, self.start_energy);
            RobotDelta::full(&robot)
        };
        self.set_status(RunStatus::Idle);
        self.emit(ExecEvent::StateChanged { delta });
        tracing::info!("robot reset");
    }

    /// Reset the whole session: abort door timers, restore the world's
    /// initial object snapshot, then reset the robot.
    pub async fn reset_mission(&self) {
        if let Some(mut doors) = lock_recover(&self.doors).take() {
            doors.shutdown();
        }
        self.world.lock().await.restore_initial();
        self.reset().await;
        tracing::info!("mission reset");
    }

    async fn start_door_timers(&self) {
        let schedules = self.world.lock().await.door_schedules();
        if schedules.is_empty() {
            return;
        }
        let scheduler = DoorScheduler::start(
            Arc::clone(&self.world),
            Arc::clone(&self.robot),
            self.events.clone(),
            schedules,
        );
        // Replacing an earlier scheduler aborts its tasks on drop.
        *lock_recover(&self.doors) = Some(scheduler);
    }

    // -----------------------------------------------------------------------
    // Instruction walk
    // -----------------------------------------------------------------------

    /// Run a sequence in order, honoring pause and stop at every
    /// instruction boundary. Boxed because the tree recursion flows
    /// through here.
    fn run_sequence<'a>(
        &'a self,
        seq: &'a [Instruction],
        depth: u32,
    ) -> BoxFuture<'a, Result<(), ExecError>> {
        Box::pin(async move {
            for inst in seq {
                if self.controls.is_stop_requested() {
                    break;
                }
                self.controls.wait_if_paused().await;
                if self.controls.is_stop_requested() {
                    break;
                }
                self.run_instruction(inst, depth).await?;
            }
            Ok(())
        })
    }

    async fn run_instruction(&self, inst: &Instruction, depth: u32) -> Result<(), ExecError> {
        self.emit(ExecEvent::InstructionStarted { id: inst.id });
        match &inst.kind {
            InstructionKind::Repeat { count, body } => {
                for _ in 0..*count {
                    if self.controls.is_stop_requested() {
                        break;
                    }
                    self.run_sequence(body, depth).await?;
                }
            }
            InstructionKind::RepeatWhile { condition, body } => {
                self.run_repeat_while(condition, body, depth).await?;
            }
            InstructionKind::If {
                condition,
                then_branch,
                else_branch,
            } => {
                let branch = if self.eval_condition(condition).await {
                    then_branch
                } else {
                    else_branch
                };
                self.run_sequence(branch, depth).await?;
            }
            InstructionKind::CallFunction { function_id } => {
                if depth >= MAX_CALL_DEPTH {
                    return Err(ExecError::CallDepthExceeded {
                        function_id: function_id.clone(),
                    });
                }
                let body =
                    self.functions
                        .resolve(function_id)
                        .ok_or_else(|| ExecError::FunctionNotFound {
                            function_id: function_id.clone(),
                        })?;
                tracing::debug!(function_id, depth, "entering function");
                self.run_sequence(&body, depth + 1).await?;
            }
            _ => return self.run_leaf(inst).await,
        }
        self.emit(ExecEvent::InstructionCompleted { id: inst.id });
        Ok(())
    }

    /// Apply a leaf instruction: effects, energy debit, state event,
    /// completion event, pacing delay -- in that order.
    async fn run_leaf(&self, inst: &Instruction) -> Result<(), ExecError> {
        let mut delta = self.apply_effects(&inst.kind).await?;
        let cost = self.costs.cost(&inst.kind);
        if cost > 0.0 {
            delta.energy = Some(self.debit_energy(cost).await?);
        }
        if delta != RobotDelta::default() {
            self.emit(ExecEvent::StateChanged { delta });
        }
        self.emit(ExecEvent::InstructionCompleted { id: inst.id });

        let pacing = self
            .costs
            .duration(&inst.kind)
            .mul_f64(self.config.pacing_scale);
        if pacing > Duration::ZERO {
            self.controls.pacing_sleep(pacing).await;
        }
        Ok(())
    }

    async fn run_repeat_while(
        &self,
        condition: &str,
        body: &[Instruction],
        depth: u32,
    ) -> Result<(), ExecError> {
        let mut iterations: u32 = 0;
        'run: loop {
            if self.controls.is_stop_requested() {
                break;
            }
            if !self.eval_condition(condition).await {
                break;
            }
            if body.is_empty() {
                tracing::warn!(condition, "loop body is empty");
                break;
            }
            iterations += 1;
            if iterations > LOOP_ITERATION_LIMIT {
                tracing::warn!(
                    condition,
                    limit = LOOP_ITERATION_LIMIT,
                    "loop iteration limit reached"
                );
                break;
            }
            for inst in body {
                self.run_sequence(core::slice::from_ref(inst), depth).await?;
                if self.controls.is_stop_requested() {
                    break 'run;
                }
                // The body may have invalidated the condition; stop
                // immediately rather than finishing the iteration.
                if !self.eval_condition(condition).await {
                    break 'run;
                }
            }
        }
        Ok(())
    }

    async fn eval_condition(&self, text: &str) -> bool {
        let world = self.world.lock().await;
        let robot = self.robot.lock().await;
        condition::evaluate(text, &world, &robot)
    }

    // -----------------------------------------------------------------------
    // Leaf effects
    // -----------------------------------------------------------------------

    async fn apply_effects(&self, kind: &InstructionKind) -> Result<RobotDelta, ExecError> {
        match kind {
            InstructionKind::Move { dir } => {
                let target = {
                    let robot = self.robot.lock().await;
                    match dir {
                        MoveDir::Forward => robot.ahead(),
                        MoveDir::Backward => robot.direction.opposite().step(robot.position),
                    }
                };
                self.world.lock().await.check_move(target)?;
                self.robot.lock().await.position = target;
                tracing::debug!(position = %target, "moved");
                Ok(RobotDelta::position(target))
            }

            InstructionKind::Turn { dir } => {
                let mut robot = self.robot.lock().await;
                robot.direction = match dir {
                    TurnDir::Left => robot.direction.left(),
                    TurnDir::Right => robot.direction.right(),
                };
                Ok(RobotDelta::direction(robot.direction))
            }

            InstructionKind::PickUp => {
                let position = self.robot.lock().await.position;
                let item = self
                    .world
                    .lock()
                    .await
                    .take_item_at(position)
                    .ok_or(ExecError::NothingToPickUp { position })?;
                let mut robot = self.robot.lock().await;
                robot.record_pickup(item.label());
                tracing::info!(item = %item.label(), "picked up");
                Ok(RobotDelta::inventory(robot.inventory.clone()))
            }

            InstructionKind::PutDown => {
                let (item, position, pickup_cell, inventory) = {
                    let mut robot = self.robot.lock().await;
                    let item = robot.pop_item().ok_or(ExecError::EmptyInventory)?;
                    let pickup_cell = robot.pickup_cell_of(&item);
                    (item, robot.position, pickup_cell, robot.inventory.clone())
                };
                let mut world = self.world.lock().await;
                // Dropping an item back on the cell it was taken from is
                // never a delivery, even on a base.
                let target = if pickup_cell == Some(position) {
                    None
                } else {
                    world.delivery_target_at_mut(position)
                };
                if let Some(target) = target {
                    target.properties.delivered = true;
                    target.properties.delivered_item = Some(item.clone());
                    tracing::info!(item, position = %position, "delivered");
                } else {
                    // Items dropped on open ground become world objects
                    // again, so they can be re-picked-up.
                    world.add_object(WorldObject::with_id(
                        ObjectKind::Resource,
                        item.clone(),
                        position,
                    ));
                    tracing::info!(item, position = %position, "put down");
                }
                Ok(RobotDelta::inventory(inventory))
            }

            InstructionKind::Action { action } => {
                self.apply_action(*action).await;
                Ok(RobotDelta::default())
            }

            InstructionKind::Log { message } => {
                let position = self.robot.lock().await.position;
                tracing::info!(message, position = %position, "robot log");
                if let Some(station) = self.world.lock().await.station_at_mut(position) {
                    station.properties.activated = true;
                    station.properties.message = Some(message.clone());
                    tracing::info!(position = %position, "station activated");
                }
                Ok(RobotDelta::default())
            }

            // Wait has no effects; control-flow kinds never reach here.
            _ => Ok(RobotDelta::default()),
        }
    }

    /// Generic world interactions are optional: failing to find a
    /// qualifying target logs and moves on.
    async fn apply_action(&self, action: ActionKind) {
        let (position, ahead) = {
            let robot = self.robot.lock().await;
            (robot.position, robot.ahead())
        };
        let mut world = self.world.lock().await;
        match action {
            ActionKind::Activate => {
                let target = world.find_nearby_mut(position, 1, |o| {
                    matches!(o.kind, ObjectKind::Station | ObjectKind::Terminal) || o.is_door()
                });
                match target {
                    Some(obj) => {
                        obj.properties.activated = true;
                        tracing::info!(target = %obj.label(), "activated");
                    }
                    None => tracing::info!("nothing nearby to activate"),
                }
            }
            ActionKind::Scan => {
                let seen = world.objects_within(position, 2);
                tracing::info!(count = seen.len(), "scan complete");
                for obj in seen {
                    tracing::info!(kind = ?obj.kind, position = %obj.position, "scanned object");
                }
            }
            ActionKind::Repair => {
                match world.find_nearby_mut(position, 1, |o| o.properties.damaged) {
                    Some(obj) => {
                        obj.properties.damaged = false;
                        obj.properties.repaired = true;
                        tracing::info!(target = %obj.label(), "repaired");
                    }
                    None => tracing::info!("nothing nearby to repair"),
                }
            }
            ActionKind::Build => {
                tracing::info!("build is not available on this mission");
            }
            ActionKind::Destroy => {
                match world.remove_nearby(position, 1, |o| o.properties.destructible) {
                    Some(obj) => tracing::info!(target = %obj.label(), "destroyed"),
                    None => tracing::info!("nothing nearby to destroy"),
                }
            }
            ActionKind::Open => {
                if world.door_at(ahead).is_some() {
                    world.set_door_open(ahead, true);
                    tracing::info!(position = %ahead, "door opened");
                } else {
                    tracing::info!(position = %ahead, "no door ahead to open");
                }
            }
            ActionKind::Close => {
                if world.door_at(ahead).is_some() {
                    world.set_door_open(ahead, false);
                    tracing::info!(position = %ahead, "door closed");
                } else {
                    tracing::info!(position = %ahead, "no door ahead to close");
                }
            }
            ActionKind::Use => {
                let target = world.find_nearby_mut(position, 1, |o| {
                    matches!(
                        o.kind,
                        ObjectKind::Terminal | ObjectKind::Lever | ObjectKind::Button
                    )
                });
                match target {
                    Some(obj) => {
                        obj.properties.used = true;
                        tracing::info!(target = %obj.label(), "used");
                    }
                    None => tracing::info!("nothing nearby to use"),
                }
            }
        }
    }

    /// Debit energy after an instruction's effects. Landing exactly on
    /// zero is fine; going below is fatal.
    async fn debit_energy(&self, cost: f64) -> Result<f64, ExecError> {
        let mut robot = self.robot.lock().await;
        robot.energy -= cost;
        if robot.energy < 0.0 {
            tracing::error!(energy = robot.energy, "battery depleted");
            return Err(ExecError::BatteryDepleted {
                energy: robot.energy,
            });
        }
        Ok(robot.energy)
    }

    fn set_status(&self, status: RunStatus) {
        *lock_recover(&self.status) = status;
    }

    fn emit(&self, event: ExecEvent) {
        // No receivers is fine (headless runs without observers).
        let _ = self.events.send(event);
    }
}

/// Lock a std mutex, recovering the data on poisoning. The guarded
/// values here are plain state words with no invariants a panic could
/// have broken mid-update.
fn lock_recover<T>(mutex: &StdMutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
