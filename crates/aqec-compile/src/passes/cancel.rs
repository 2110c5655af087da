//! Adjacent inverse-pair cancellation.

use aqec_ir::GateOp;

use crate::error::CompileResult;
use crate::pass::{MAX_FIXPOINT_ITERATIONS, RewritePass};

/// Remove list-adjacent pairs of mutually inverse ops.
///
/// A pair cancels when the gates are inverses of each other and the qubit
/// lists match exactly, argument order included: `cx q0 q1` does not cancel
/// against `cx q1 q0`. Runs to a fixed point so that cancellations exposed
/// by earlier removals are picked up.
pub struct CancelInverses;

impl CancelInverses {
    /// Create a new cancellation pass.
    pub fn new() -> Self {
        Self
    }

    pub(crate) fn cancels(a: &GateOp, b: &GateOp) -> bool {
        a.qubits == b.qubits && a.gate.inverse() == b.gate
    }

    fn sweep(ops: &mut Vec<GateOp>) -> bool {
        let mut changed = false;
        let mut i = 0;
        while i + 1 < ops.len() {
            if Self::cancels(&ops[i], &ops[i + 1]) {
                ops.drain(i..i + 2);
                changed = true;
                // Step back: the removal may have made a new adjacent pair.
                i = i.saturating_sub(1);
            } else {
                i += 1;
            }
        }
        changed
    }
}

impl Default for CancelInverses {
    fn default() -> Self {
        Self::new()
    }
}

impl RewritePass for CancelInverses {
    fn name(&self) -> &str {
        "CancelInverses"
    }

    fn run(&self, ops: &mut Vec<GateOp>, _qubit_count: u32) -> CompileResult<()> {
        for _ in 0..MAX_FIXPOINT_ITERATIONS {
            if !Self::sweep(ops) {
                break;
            }
        }
        Ok(())
    }
}
