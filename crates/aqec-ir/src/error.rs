//! Error types for the IR crate.

use crate::gate::QubitId;
use thiserror::Error;

/// Errors that can occur when building circuit models.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IrError {
    /// Circuit must have at least one qubit.
    #[error("Invalid qubit count {0}: a circuit needs at least one qubit")]
    InvalidQubitCount(u32),

    /// Qubit index outside the circuit.
    #[error("Qubit {qubit} out of range for {qubit_count}-qubit circuit (gate: {gate_name})")]
    QubitOutOfRange {
        /// The offending qubit.
        qubit: QubitId,
        /// Number of qubits in the circuit.
        qubit_count: u32,
        /// Name of the gate being applied.
        gate_name: &'static str,
    },

    /// Gate requires a different number of qubits.
    #[error("Gate '{gate_name}' requires {expected} qubits, got {got}")]
    QubitCountMismatch {
        /// Name of the gate.
        gate_name: &'static str,
        /// Expected number of qubits.
        expected: u32,
        /// Actual number of qubits provided.
        got: u32,
    },

    /// Same qubit used twice in one operation.
    #[error("Duplicate qubit {qubit} in operation (gate: {gate_name})")]
    DuplicateQubit {
        /// The duplicate qubit.
        qubit: QubitId,
        /// Name of the gate.
        gate_name: &'static str,
    },
}

/// Result type for IR operations.
pub type IrResult<T> = Result<T, IrError>;
