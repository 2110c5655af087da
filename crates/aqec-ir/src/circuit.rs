//! Immutable circuit model.

use std::hash::{Hash, Hasher};

use rustc_hash::FxHasher;

use crate::error::{IrError, IrResult};
use crate::gate::{Gate, GateOp, QubitId};

/// An immutable, canonicalizable gate sequence.
///
/// Every mutation produces a new instance, so the canonical hash computed at
/// construction can never go stale. The hash is structural and
/// order-sensitive: two models are equal-keyed iff their op sequences and
/// qubit counts are identical. Reordering commuting gates changes the hash.
#[derive(Debug, Clone)]
pub struct CircuitModel {
    qubit_count: u32,
    ops: Vec<GateOp>,
    hash: u64,
}

impl CircuitModel {
    /// Create a new empty circuit over `qubit_count` qubits.
    pub fn new(qubit_count: u32) -> IrResult<Self> {
        if qubit_count == 0 {
            return Err(IrError::InvalidQubitCount(qubit_count));
        }
        let mut circuit = Self {
            qubit_count,
            ops: vec![],
            hash: 0,
        };
        circuit.hash = circuit.compute_hash();
        Ok(circuit)
    }

    /// Return a new circuit with `gate` appended.
    ///
    /// The receiver is untouched; validation failures leave no side effects.
    pub fn with_gate(
        &self,
        gate: Gate,
        qubits: impl IntoIterator<Item = QubitId>,
    ) -> IrResult<Self> {
        let op = GateOp::new(gate, qubits);
        self.validate_op(&op)?;

        let mut next = self.clone();
        next.ops.push(op);
        next.hash = next.compute_hash();
        Ok(next)
    }

    /// Rebuild a circuit from raw parts, revalidating every op.
    ///
    /// Used by the transpile pipeline, which rewrites the op sequence
    /// wholesale.
    pub fn from_ops(qubit_count: u32, ops: Vec<GateOp>) -> IrResult<Self> {
        let mut circuit = Self::new(qubit_count)?;
        for op in &ops {
            circuit.validate_op(op)?;
        }
        circuit.ops = ops;
        circuit.hash = circuit.compute_hash();
        Ok(circuit)
    }

    fn validate_op(&self, op: &GateOp) -> IrResult<()> {
        let expected = op.gate.num_qubits();
        if op.qubits.len() as u32 != expected {
            return Err(IrError::QubitCountMismatch {
                gate_name: op.gate.name(),
                expected,
                got: op.qubits.len() as u32,
            });
        }
        for (i, q) in op.qubits.iter().enumerate() {
            if q.0 >= self.qubit_count {
                return Err(IrError::QubitOutOfRange {
                    qubit: *q,
                    qubit_count: self.qubit_count,
                    gate_name: op.gate.name(),
                });
            }
            if op.qubits[..i].contains(q) {
                return Err(IrError::DuplicateQubit {
                    qubit: *q,
                    gate_name: op.gate.name(),
                });
            }
        }
        Ok(())
    }

    fn compute_hash(&self) -> u64 {
        // FxHasher is seed-free, so the key is deterministic across runs.
        let mut hasher = FxHasher::default();
        hasher.write_u32(self.qubit_count);
        for op in &self.ops {
            op.hash(&mut hasher);
        }
        hasher.finish()
    }

    /// Deterministic structural hash over the exact op sequence.
    pub fn canonical_hash(&self) -> u64 {
        self.hash
    }

    /// Structural equality: same qubit count and identical op sequence.
    ///
    /// Used by the optimization cache to distinguish true hits from hash
    /// collisions.
    pub fn structurally_equal(&self, other: &CircuitModel) -> bool {
        self.qubit_count == other.qubit_count && self.ops == other.ops
    }

    /// Get the number of qubits.
    pub fn qubit_count(&self) -> u32 {
        self.qubit_count
    }

    /// Get the gate operations in order.
    pub fn ops(&self) -> &[GateOp] {
        &self.ops
    }

    /// Get the number of operations.
    pub fn num_ops(&self) -> usize {
        self.ops.len()
    }

    /// Check if the circuit has no operations.
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Circuit depth: longest chain of ops sharing qubits.
    ///
    /// Computed with a per-qubit frontier level; ops on disjoint qubits
    /// occupy the same layer.
    pub fn depth(&self) -> usize {
        let mut frontier = vec![0usize; self.qubit_count as usize];
        let mut depth = 0;
        for op in &self.ops {
            let layer = op
                .qubits
                .iter()
                .map(|q| frontier[q.0 as usize])
                .max()
                .unwrap_or(0)
                + 1;
            for q in &op.qubits {
                frontier[q.0 as usize] = layer;
            }
            depth = depth.max(layer);
        }
        depth
    }

    /// Entangling preparation circuit: H on qubit 0 followed by a CX chain.
    ///
    /// This is the fixed episode-start state the environment resets to.
    pub fn entangled_prep(qubit_count: u32) -> IrResult<Self> {
        let mut circuit = Self::new(qubit_count)?.with_gate(Gate::H, [QubitId(0)])?;
        for i in 0..qubit_count.saturating_sub(1) {
            circuit = circuit.with_gate(Gate::Cx, [QubitId(i), QubitId(i + 1)])?;
        }
        Ok(circuit)
    }
}
