//! Basis-gate unrolling.

use std::f64::consts::PI;

use aqec_ir::{Gate, GateOp};

use crate::error::CompileResult;
use crate::pass::RewritePass;

/// Unroll gates outside the working basis {x, z, h, rx, ry, rz, cx}.
///
/// Phase-only discrepancies (S vs Rz(π/2), Y vs Z·X) are global phases and
/// do not affect fidelity, which is all downstream consumers measure.
pub struct BasisUnroll;

impl BasisUnroll {
    /// Create a new unrolling pass.
    pub fn new() -> Self {
        Self
    }

    fn unroll_op(op: &GateOp, out: &mut Vec<GateOp>) {
        let qs = &op.qubits;
        match op.gate {
            // Identity contributes nothing.
            Gate::I => {}
            Gate::S => out.push(GateOp::new(Gate::Rz(PI / 2.0), qs.clone())),
            Gate::Sdg => out.push(GateOp::new(Gate::Rz(-PI / 2.0), qs.clone())),
            Gate::T => out.push(GateOp::new(Gate::Rz(PI / 4.0), qs.clone())),
            Gate::Tdg => out.push(GateOp::new(Gate::Rz(-PI / 4.0), qs.clone())),
            Gate::P(theta) => out.push(GateOp::new(Gate::Rz(theta), qs.clone())),
            // Y = i·X·Z: apply Z then X.
            Gate::Y => {
                out.push(GateOp::new(Gate::Z, qs.clone()));
                out.push(GateOp::new(Gate::X, qs.clone()));
            }
            // SWAP as three alternating CX.
            Gate::Swap => {
                out.push(GateOp::new(Gate::Cx, [qs[0], qs[1]]));
                out.push(GateOp::new(Gate::Cx, [qs[1], qs[0]]));
                out.push(GateOp::new(Gate::Cx, [qs[0], qs[1]]));
            }
            // CZ = H(t) · CX · H(t).
            Gate::Cz => {
                out.push(GateOp::new(Gate::H, [qs[1]]));
                out.push(GateOp::new(Gate::Cx, [qs[0], qs[1]]));
                out.push(GateOp::new(Gate::H, [qs[1]]));
            }
            _ => out.push(op.clone()),
        }
    }
}

impl Default for BasisUnroll {
    fn default() -> Self {
        Self::new()
    }
}

impl RewritePass for BasisUnroll {
    fn name(&self) -> &str {
        "BasisUnroll"
    }

    fn run(&self, ops: &mut Vec<GateOp>, _qubit_count: u32) -> CompileResult<()> {
        let mut out = Vec::with_capacity(ops.len());
        for op in ops.iter() {
            Self::unroll_op(op, &mut out);
        }
        *ops = out;
        Ok(())
    }
}
