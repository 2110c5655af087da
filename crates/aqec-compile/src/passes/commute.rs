//! Commutation-aware inverse cancellation.

use aqec_ir::{Gate, GateOp};

use crate::error::CompileResult;
use crate::pass::{MAX_FIXPOINT_ITERATIONS, RewritePass};
use crate::passes::cancel::CancelInverses;

/// Cancel inverse pairs separated by ops that commute with the first.
///
/// Where [`CancelInverses`] only looks at list-adjacent pairs, this pass
/// slides an op rightwards through everything it commutes with before
/// checking for a cancellation partner. The commutation test is a sound
/// under-approximation: `commutes` returning false only costs a missed
/// cancellation, never correctness.
pub struct CommutativeCancellation;

impl CommutativeCancellation {
    /// Create a new commutation-aware cancellation pass.
    pub fn new() -> Self {
        Self
    }

    fn sweep(ops: &mut Vec<GateOp>) -> bool {
        let mut changed = false;
        let mut i = 0;
        'outer: while i < ops.len() {
            for j in i + 1..ops.len() {
                if CancelInverses::cancels(&ops[i], &ops[j]) {
                    ops.remove(j);
                    ops.remove(i);
                    changed = true;
                    continue 'outer; // new op at index i, rescan
                }
                if !commutes(&ops[i], &ops[j]) {
                    break;
                }
            }
            i += 1;
        }
        changed
    }
}

/// Whether two ops are known to commute.
///
/// Conservative rule table; anything not listed is assumed non-commuting.
pub fn commutes(a: &GateOp, b: &GateOp) -> bool {
    // Disjoint supports always commute.
    if !a.overlaps(b) {
        return true;
    }
    // Diagonal ops commute with each other on any overlap.
    if a.gate.is_diagonal() && b.gate.is_diagonal() {
        return true;
    }
    if a.gate == Gate::Cx {
        return commutes_with_cx(a, b);
    }
    if b.gate == Gate::Cx {
        return commutes_with_cx(b, a);
    }
    // Same single-qubit axis commutes (X with Rx, Z-family handled above).
    if a.qubits == b.qubits {
        return same_axis_1q(&a.gate, &b.gate);
    }
    false
}

/// Commutation of `other` against a CX op.
fn commutes_with_cx(cx: &GateOp, other: &GateOp) -> bool {
    let control = cx.qubits[0];
    let target = cx.qubits[1];
    match other.gate {
        // CX-CX: sharing only controls or only targets commutes. A target
        // feeding the other's control does not.
        Gate::Cx => {
            let (oc, ot) = (other.qubits[0], other.qubits[1]);
            let shared_control = control == oc && target != ot && target != oc && control != ot;
            let shared_target = target == ot && control != oc && control != ot && target != oc;
            shared_control || shared_target
        }
        // Diagonal on the control side commutes.
        g if g.is_diagonal() => other.qubits.iter().all(|&q| q != target),
        // X-axis on the target side commutes.
        Gate::X | Gate::Rx(_) => other.qubits == [target],
        _ => false,
    }
}

fn same_axis_1q(a: &Gate, b: &Gate) -> bool {
    matches!(
        (a, b),
        (Gate::X | Gate::Rx(_), Gate::X | Gate::Rx(_))
            | (Gate::Y | Gate::Ry(_), Gate::Y | Gate::Ry(_))
    )
}

impl Default for CommutativeCancellation {
    fn default() -> Self {
        Self::new()
    }
}

impl RewritePass for CommutativeCancellation {
    fn name(&self) -> &str {
        "CommutativeCancellation"
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
