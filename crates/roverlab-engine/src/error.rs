//! Error types for the engine binary.

use roverlab_exec::ExecError;
use roverlab_flow::ConvertError;

/// Errors that can occur while setting up or running a mission session.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The configuration file could not be read or parsed.
    #[error("configuration error: {message}")]
    Config {
        /// What went wrong.
        message: String,
    },

    /// The configured mission id is not in the catalog.
    #[error("unknown mission '{id}'")]
    UnknownMission {
        /// The requested id.
        id: String,
    },

    /// The mission definition failed validation.
    #[error("mission '{id}' failed validation: {details}")]
    InvalidMission {
        /// The mission id.
        id: String,
        /// Joined validation errors.
        details: String,
    },

    /// The authored program graph failed validation.
    #[error("program graph failed validation: {details}")]
    InvalidProgram {
        /// Joined validation errors.
        details: String,
    },

    /// No demo program is bundled for the configured mission.
    #[error("no demo program for mission '{id}'")]
    NoDemoProgram {
        /// The mission id.
        id: String,
    },

    /// Graph conversion failed.
    #[error(transparent)]
    Convert(#[from] ConvertError),

    /// The run ended with a fatal execution error.
    #[error(transparent)]
    Exec(#[from] ExecError),
}
