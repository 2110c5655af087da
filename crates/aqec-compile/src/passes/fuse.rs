//! Single-qubit rotation fusion.

use std::f64::consts::PI;

use aqec_ir::{Gate, GateOp};

use crate::error::CompileResult;
use crate::pass::{MAX_FIXPOINT_ITERATIONS, RewritePass};

/// Angles below this are treated as identity after normalization.
const EPSILON: f64 = 1e-10;

/// Merge consecutive same-axis rotations on the same qubit.
///
/// "Consecutive" means no intervening op touches that qubit; ops on other
/// qubits may sit between the pair in program order. Merged angles are
/// wrapped into (-π, π], and near-zero results are dropped.
pub struct FuseRotations;

impl FuseRotations {
    /// Create a new fusion pass.
    pub fn new() -> Self {
        Self
    }

    fn merged(a: &Gate, b: &Gate) -> Option<Gate> {
        match (a, b) {
            (Gate::Rx(x), Gate::Rx(y)) => Some(Gate::Rx(normalize_angle(x + y))),
            (Gate::Ry(x), Gate::Ry(y)) => Some(Gate::Ry(normalize_angle(x + y))),
            (Gate::Rz(x), Gate::Rz(y)) => Some(Gate::Rz(normalize_angle(x + y))),
            (Gate::P(x), Gate::P(y)) => Some(Gate::P(normalize_angle(x + y))),
            _ => None,
        }
    }

    fn is_null_rotation(gate: &Gate) -> bool {
        match gate {
            Gate::Rx(t) | Gate::Ry(t) | Gate::Rz(t) | Gate::P(t) => t.abs() < EPSILON,
            _ => false,
        }
    }

    /// One fusion sweep; returns true if anything changed.
    fn sweep(ops: &mut Vec<GateOp>) -> bool {
        // Drop null rotations first so a merge-to-zero disappears.
        let before = ops.len();
        ops.retain(|op| !Self::is_null_rotation(&op.gate));
        let mut changed = ops.len() != before;

        let mut i = 0;
        while i < ops.len() {
            let qubit = ops[i].qubits[0];
            if ops[i].gate.num_qubits() == 1 {
                // Find the next op touching this qubit.
                if let Some(j) = (i + 1..ops.len()).find(|&j| ops[j].acts_on(qubit)) {
                    if let Some(merged) = Self::merged(&ops[i].gate, &ops[j].gate) {
                        ops[i].gate = merged;
                        ops.remove(j);
                        changed = true;
                        continue; // retry at i, more may fuse in
                    }
                }
            }
            i += 1;
        }
        changed
    }
}

/// Wrap an angle into (-π, π].
fn normalize_angle(theta: f64) -> f64 {
    let mut t = theta % (2.0 * PI);
    if t > PI {
        t -= 2.0 * PI;
    } else if t <= -PI {
        t += 2.0 * PI;
    }
    t
}

impl Default for FuseRotations {
    fn default() -> Self {
        Self::new()
    }
}

impl RewritePass for FuseRotations {
    fn name(&self) -> &str {
        "FuseRotations"
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

#[cfg(test)]
mod tests {
    use super::*;
    use aqec_ir::QubitId;

    fn run(ops: Vec<GateOp>) -> Vec<GateOp> {
        let mut ops = ops;
        FuseRotations::new().run(&mut ops, 2).unwrap();
        ops
    }

    #[test]
    fn test_adjacent_rz_merge() {
        let out = run(vec![
            GateOp::new(Gate::Rz(0.3), [QubitId(0)]),
            GateOp::new(Gate::Rz(0.4), [QubitId(0)]),
        ]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].gate, Gate::Rz(0.7));
    }

    #[test]
    fn test_merge_across_other_qubit() {
        let out = run(vec![
            GateOp::new(Gate::Rz(0.3), [QubitId(0)]),
            GateOp::new(Gate::H, [QubitId(1)]),
            GateOp::new(Gate::Rz(0.4), [QubitId(0)]),
        ]);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].gate, Gate::Rz(0.7));
    }

    #[test]
    fn test_opposite_angles_vanish() {
        let out = run(vec![
            GateOp::new(Gate::Rx(0.5), [QubitId(0)]),
            GateOp::new(Gate::Rx(-0.5), [QubitId(0)]),
        ]);
        assert!(out.is_empty());
    }

    #[test]
    fn test_different_axes_not_merged() {
        let ops = vec![
            GateOp::new(Gate::Rz(0.5), [QubitId(0)]),
            GateOp::new(Gate::Rx(0.5), [QubitId(0)]),
        ];
        assert_eq!(run(ops.clone()), ops);
    }

    #[test]
    fn test_blocking_op_prevents_merge() {
        let ops = vec![
            GateOp::new(Gate::Rz(0.5), [QubitId(0)]),
            GateOp::new(Gate::H, [QubitId(0)]),
            GateOp::new(Gate::Rz(0.5), [QubitId(0)]),
        ];
        assert_eq!(run(ops.clone()), ops);
    }

    #[test]
    fn test_angle_normalization() {
        assert!((normalize_angle(3.0 * PI) - PI).abs() < 1e-12);
        assert!((normalize_angle(-3.0 * PI) - PI).abs() < 1e-12);
        assert!((normalize_angle(0.25) - 0.25).abs() < 1e-12);
    }
}
