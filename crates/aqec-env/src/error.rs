//! Error types for the environment crate.

use aqec_gateway::SimulationError;
use aqec_ir::IrError;
use thiserror::Error;

/// Environment errors.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EnvError {
    /// The configuration failed validation.
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// The action index is outside the action space.
    #[error("Action {action} out of range (action space size {space})")]
    InvalidAction {
        /// The rejected action.
        action: u32,
        /// Size of the action space.
        space: u32,
    },

    /// `step` was called before the first `reset`.
    #[error("Environment not reset; call reset() before step()")]
    NotReset,

    /// `step` was called after the episode ended.
    #[error("Episode is over; call reset() to start a new one")]
    Terminated,

    /// Circuit construction failed.
    #[error(transparent)]
    Circuit(#[from] IrError),

    /// The simulation gateway failed.
    #[error(transparent)]
    Simulation(#[from] SimulationError),
}

/// Result type for environment operations.
pub type EnvResult<T> = Result<T, EnvError>;
