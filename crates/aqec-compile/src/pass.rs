//! Rewrite pass trait.

use aqec_ir::GateOp;

use crate::error::CompileResult;

/// A rewrite pass over a flat gate sequence.
///
/// Passes are the unit of circuit optimization. Each receives the op list in
/// place and must leave it semantically equivalent (up to global phase) on
/// the same `qubit_count` qubits.
pub trait RewritePass: Send + Sync {
    /// Get the name of this pass.
    fn name(&self) -> &str;

    /// Run the pass, rewriting `ops` in place.
    fn run(&self, ops: &mut Vec<GateOp>, qubit_count: u32) -> CompileResult<()>;
}

/// Iteration bound for fixpoint passes, to rule out pathological loops.
pub(crate) const MAX_FIXPOINT_ITERATIONS: usize = 100;
