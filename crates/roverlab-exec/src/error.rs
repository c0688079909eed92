//! Error types for the `roverlab-exec` crate.

use roverlab_types::GridPos;
use roverlab_world::WorldError;

/// Fatal conditions that end a program run.
///
/// Everything here aborts execution and surfaces as an `Error` event;
/// soft failures (an action with no qualifying target) are logged
/// no-ops and never reach this type.
#[derive(Debug, thiserror::Error)]
pub enum ExecError {
    /// `run` was called while a run is already in progress.
    #[error("a program is already running")]
    AlreadyRunning,

    /// `run` was called before any program was loaded.
    #[error("no program loaded")]
    NoProgram,

    /// A move instruction targeted an impassable or out-of-bounds cell.
    #[error("cannot move: {0}")]
    MoveBlocked(#[from] WorldError),

    /// An instruction's energy cost pushed the battery below zero.
    /// Landing exactly on zero is allowed.
    #[error("battery depleted ({energy:.1})")]
    BatteryDepleted {
        /// The (negative) energy level after the debit.
        energy: f64,
    },

    /// Pick-up executed on a cell with nothing to pick up.
    #[error("nothing to pick up at {position}")]
    NothingToPickUp {
        /// The robot's cell.
        position: GridPos,
    },

    /// Put-down executed with an empty inventory.
    #[error("inventory is empty")]
    EmptyInventory,

    /// A call instruction referenced a function the library does not
    /// have.
    #[error("function '{function_id}' not found")]
    FunctionNotFound {
        /// The unresolved identifier.
        function_id: String,
    },

    /// Function calls nested past the depth ceiling.
    #[error("call depth limit exceeded at function '{function_id}'")]
    CallDepthExceeded {
        /// The call that tripped the limit.
        function_id: String,
    },
}
