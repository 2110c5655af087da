//! Quantum gate types.

use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// A qubit identifier within a circuit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QubitId(pub u32);

impl std::fmt::Display for QubitId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "q{}", self.0)
    }
}

/// The gate set understood by the control loop.
///
/// Rotation angles are concrete `f64` values; the environment never builds
/// symbolic circuits, so there is no parameter-expression layer.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Gate {
    /// Identity gate.
    I,
    /// Pauli-X gate.
    X,
    /// Pauli-Y gate.
    Y,
    /// Pauli-Z gate.
    Z,
    /// Hadamard gate.
    H,
    /// S gate (sqrt(Z)).
    S,
    /// S-dagger gate.
    Sdg,
    /// T gate (fourth root of Z).
    T,
    /// T-dagger gate.
    Tdg,
    /// Rotation around X axis.
    Rx(f64),
    /// Rotation around Y axis.
    Ry(f64),
    /// Rotation around Z axis.
    Rz(f64),
    /// Phase gate.
    P(f64),
    /// Controlled-X (CNOT) gate.
    Cx,
    /// Controlled-Z gate.
    Cz,
    /// SWAP gate.
    Swap,
}

impl Gate {
    /// Get the name of this gate.
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            Gate::I => "id",
            Gate::X => "x",
            Gate::Y => "y",
            Gate::Z => "z",
            Gate::H => "h",
            Gate::S => "s",
            Gate::Sdg => "sdg",
            Gate::T => "t",
            Gate::Tdg => "tdg",
            Gate::Rx(_) => "rx",
            Gate::Ry(_) => "ry",
            Gate::Rz(_) => "rz",
            Gate::P(_) => "p",
            Gate::Cx => "cx",
            Gate::Cz => "cz",
            Gate::Swap => "swap",
        }
    }

    /// Get the number of qubits this gate operates on.
    #[inline]
    pub fn num_qubits(&self) -> u32 {
        match self {
            Gate::Cx | Gate::Cz | Gate::Swap => 2,
            _ => 1,
        }
    }

    /// Get the rotation parameters of this gate.
    pub fn params(&self) -> Vec<f64> {
        match self {
            Gate::Rx(t) | Gate::Ry(t) | Gate::Rz(t) | Gate::P(t) => vec![*t],
            _ => vec![],
        }
    }

    /// Check if the gate is its own inverse.
    pub fn is_self_inverse(&self) -> bool {
        matches!(
            self,
            Gate::I | Gate::X | Gate::Y | Gate::Z | Gate::H | Gate::Cx | Gate::Cz | Gate::Swap
        )
    }

    /// Get the inverse of this gate.
    pub fn inverse(&self) -> Gate {
        match self {
            Gate::S => Gate::Sdg,
            Gate::Sdg => Gate::S,
            Gate::T => Gate::Tdg,
            Gate::Tdg => Gate::T,
            Gate::Rx(t) => Gate::Rx(-t),
            Gate::Ry(t) => Gate::Ry(-t),
            Gate::Rz(t) => Gate::Rz(-t),
            Gate::P(t) => Gate::P(-t),
            g => *g,
        }
    }

    /// Check if this gate is diagonal in the computational basis.
    ///
    /// Diagonal gates commute with each other regardless of shared qubits.
    pub fn is_diagonal(&self) -> bool {
        matches!(
            self,
            Gate::I
                | Gate::Z
                | Gate::S
                | Gate::Sdg
                | Gate::T
                | Gate::Tdg
                | Gate::Rz(_)
                | Gate::P(_)
                | Gate::Cz
        )
    }
}

// Equality and hashing are both bit-level on the rotation angle, so -0.0
// and 0.0 are distinct ops and equal gates always share a canonical hash.
impl PartialEq for Gate {
    fn eq(&self, other: &Self) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
            && self
                .params()
                .iter()
                .map(|p| p.to_bits())
                .eq(other.params().iter().map(|p| p.to_bits()))
    }
}

impl Eq for Gate {}

impl Hash for Gate {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write(self.name().as_bytes());
        for p in self.params() {
            state.write_u64(p.to_bits());
        }
    }
}

/// A single gate application: a gate plus the qubits it acts on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GateOp {
    /// The gate being applied.
    pub gate: Gate,
    /// Target qubits, in gate-argument order.
    pub qubits: Vec<QubitId>,
}

impl GateOp {
    /// Create a new gate operation.
    pub fn new(gate: Gate, qubits: impl IntoIterator<Item = QubitId>) -> Self {
        Self {
            gate,
            qubits: qubits.into_iter().collect(),
        }
    }

    /// Get the gate name.
    pub fn name(&self) -> &'static str {
        self.gate.name()
    }

    /// Check whether this op touches the given qubit.
    pub fn acts_on(&self, qubit: QubitId) -> bool {
        self.qubits.contains(&qubit)
    }

    /// Check whether this op shares any qubit with another op.
    pub fn overlaps(&self, other: &GateOp) -> bool {
        self.qubits.iter().any(|q| other.qubits.contains(q))
    }
}

impl std::fmt::Display for GateOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.gate.name())?;
        let params = self.gate.params();
        if !params.is_empty() {
            write!(f, "(")?;
            for (i, p) in params.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{p:.6}")?;
            }
            write!(f, ")")?;
        }
        for q in &self.qubits {
            write!(f, " {q}")?;
        }
        Ok(())
    }
}
