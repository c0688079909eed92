//! Error types for the `roverlab-world` crate.

use roverlab_types::GridPos;

/// Errors that can occur during world-model operations.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    /// A cell lies outside the mission grid.
    #[error("position {position} is outside the {width}x{height} grid")]
    OutOfBounds {
        /// The rejected cell.
        position: GridPos,
        /// Grid width.
        width: i32,
        /// Grid height.
        height: i32,
    },

    /// A cell is occupied by a blocking object (obstacle or closed door).
    #[error("position {position} is blocked")]
    Blocked {
        /// The blocked cell.
        position: GridPos,
    },
}
