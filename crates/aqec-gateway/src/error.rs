//! Error types for the gateway contract.

use thiserror::Error;

/// Errors a simulation backend can report.
///
/// These are episode-fatal from the environment's point of view: a failed
/// execution aborts the episode, it is never retried.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SimulationError {
    /// The backend rejected or failed the execution.
    #[error("Backend error: {0}")]
    Backend(String),

    /// The circuit uses a gate the backend cannot execute.
    #[error("Unsupported gate: {0}")]
    UnsupportedGate(String),

    /// Circuit exceeds the backend's qubit capacity.
    #[error("Circuit has {got} qubits but backend supports at most {max}")]
    CircuitTooLarge {
        /// Qubits in the submitted circuit.
        got: u32,
        /// Backend capacity.
        max: u32,
    },

    /// State vectors of different sizes cannot be compared.
    #[error("Qubit count mismatch: {left} vs {right}")]
    QubitCountMismatch {
        /// Left operand qubit count.
        left: usize,
        /// Right operand qubit count.
        right: usize,
    },
}

impl SimulationError {
    /// Short stable identifier for telemetry and step info.
    pub fn kind(&self) -> &'static str {
        match self {
            SimulationError::Backend(_) => "backend",
            SimulationError::UnsupportedGate(_) => "unsupported_gate",
            SimulationError::CircuitTooLarge { .. } => "circuit_too_large",
            SimulationError::QubitCountMismatch { .. } => "qubit_count_mismatch",
        }
    }
}

/// Result type for gateway operations.
pub type SimResult<T> = Result<T, SimulationError>;
