//! The Roverlab execution core: an async tree-walking interpreter for
//! converted instruction programs, with pause/resume/stop controls,
//! a sandboxed condition evaluator, timed-door scheduling, and a
//! broadcast event stream for observers.

pub mod condition;
pub mod controls;
pub mod costs;
pub mod doors;
pub mod error;
pub mod executor;
pub mod functions;

pub use condition::{evaluate as evaluate_condition, INVENTORY_CAPACITY};
pub use controls::RunControls;
pub use costs::CostTable;
pub use doors::DoorScheduler;
pub use error::ExecError;
pub use executor::{
    Executor, ExecutorConfig, RunStatus, LOOP_ITERATION_LIMIT, MAX_CALL_DEPTH,
};
pub use functions::{FunctionLibrary, FunctionSource, NoFunctions};
