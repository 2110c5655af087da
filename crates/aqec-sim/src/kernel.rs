//! Statevector gate kernels.
//!
//! Bit-mask amplitude updates, one kernel per gate family. Qubit `k`
//! corresponds to bit `k` of the amplitude index.

use std::f64::consts::PI;

use num_complex::Complex64;

use aqec_gateway::StateVector;
use aqec_ir::{Gate, GateOp};

/// Apply a single gate operation to the state.
pub fn apply_op(state: &mut StateVector, op: &GateOp) {
    let q = |i: usize| op.qubits[i].0 as usize;
    match op.gate {
        Gate::I => {}
        Gate::X => apply_x(state, q(0)),
        Gate::Y => apply_y(state, q(0)),
        Gate::Z => apply_phase_flip(state, q(0)),
        Gate::H => apply_h(state, q(0)),
        Gate::S => apply_phase(state, q(0), PI / 2.0),
        Gate::Sdg => apply_phase(state, q(0), -PI / 2.0),
        Gate::T => apply_phase(state, q(0), PI / 4.0),
        Gate::Tdg => apply_phase(state, q(0), -PI / 4.0),
        Gate::Rx(theta) => apply_rx(state, q(0), theta),
        Gate::Ry(theta) => apply_ry(state, q(0), theta),
        Gate::Rz(theta) => apply_rz(state, q(0), theta),
        Gate::P(theta) => apply_phase(state, q(0), theta),
        Gate::Cx => apply_cx(state, q(0), q(1)),
        Gate::Cz => apply_cz(state, q(0), q(1)),
        Gate::Swap => apply_swap(state, q(0), q(1)),
        // `Gate` is `#[non_exhaustive]`; all current variants are handled above.
        _ => unreachable!("unhandled gate: {}", op.gate.name()),
    }
}

fn dim(state: &StateVector) -> usize {
    1 << state.num_qubits()
}

pub(crate) fn apply_x(state: &mut StateVector, qubit: usize) {
    let mask = 1 << qubit;
    let n = dim(state);
    let amps = state.amplitudes_mut();
    for i in 0..n {
        if i & mask == 0 {
            amps.swap(i, i | mask);
        }
    }
}

pub(crate) fn apply_y(state: &mut StateVector, qubit: usize) {
    let mask = 1 << qubit;
    let n = dim(state);
    let i_val = Complex64::new(0.0, 1.0);
    let amps = state.amplitudes_mut();
    for i in 0..n {
        if i & mask == 0 {
            let j = i | mask;
            let tmp = amps[i];
            amps[i] = -i_val * amps[j];
            amps[j] = i_val * tmp;
        }
    }
}

pub(crate) fn apply_phase_flip(state: &mut StateVector, qubit: usize) {
    let mask = 1 << qubit;
    let n = dim(state);
    let amps = state.amplitudes_mut();
    for i in 0..n {
        if i & mask != 0 {
            amps[i] = -amps[i];
        }
    }
}

pub(crate) fn apply_h(state: &mut StateVector, qubit: usize) {
    let mask = 1 << qubit;
    let n = dim(state);
    let sqrt2_inv = 1.0 / 2.0_f64.sqrt();
    let amps = state.amplitudes_mut();
    for i in 0..n {
        if i & mask == 0 {
            let j = i | mask;
            let a = amps[i];
            let b = amps[j];
            amps[i] = sqrt2_inv * (a + b);
            amps[j] = sqrt2_inv * (a - b);
        }
    }
}

fn apply_phase(state: &mut StateVector, qubit: usize, theta: f64) {
    let mask = 1 << qubit;
    let n = dim(state);
    let phase = Complex64::from_polar(1.0, theta);
    let amps = state.amplitudes_mut();
    for i in 0..n {
        if i & mask != 0 {
            amps[i] *= phase;
        }
    }
}

fn apply_rx(state: &mut StateVector, qubit: usize, theta: f64) {
    let mask = 1 << qubit;
    let n = dim(state);
    let c = (theta / 2.0).cos();
    let neg_i_s = Complex64::new(0.0, -(theta / 2.0).sin());
    let amps = state.amplitudes_mut();
    for i in 0..n {
        if i & mask == 0 {
            let j = i | mask;
            let a = amps[i];
            let b = amps[j];
            amps[i] = c * a + neg_i_s * b;
            amps[j] = neg_i_s * a + c * b;
        }
    }
}

fn apply_ry(state: &mut StateVector, qubit: usize, theta: f64) {
    let mask = 1 << qubit;
    let n = dim(state);
    let c = (theta / 2.0).cos();
    let s = (theta / 2.0).sin();
    let amps = state.amplitudes_mut();
    for i in 0..n {
        if i & mask == 0 {
            let j = i | mask;
            let a = amps[i];
            let b = amps[j];
            amps[i] = c * a - s * b;
            amps[j] = s * a + c * b;
        }
    }
}

fn apply_rz(state: &mut StateVector, qubit: usize, theta: f64) {
    let mask = 1 << qubit;
    let n = dim(state);
    let phase_0 = Complex64::from_polar(1.0, -theta / 2.0);
    let phase_1 = Complex64::from_polar(1.0, theta / 2.0);
    let amps = state.amplitudes_mut();
    for i in 0..n {
        if i & mask == 0 {
            amps[i] *= phase_0;
        } else {
            amps[i] *= phase_1;
        }
    }
}

fn apply_cx(state: &mut StateVector, control: usize, target: usize) {
    let ctrl_mask = 1 << control;
    let tgt_mask = 1 << target;
    let n = dim(state);
    let amps = state.amplitudes_mut();
    for i in 0..n {
        if (i & ctrl_mask != 0) && (i & tgt_mask == 0) {
            amps.swap(i, i | tgt_mask);
        }
    }
}

fn apply_cz(state: &mut StateVector, control: usize, target: usize) {
    let ctrl_mask = 1 << control;
    let tgt_mask = 1 << target;
    let n = dim(state);
    let amps = state.amplitudes_mut();
    for i in 0..n {
        if (i & ctrl_mask != 0) && (i & tgt_mask != 0) {
            amps[i] = -amps[i];
        }
    }
}

fn apply_swap(state: &mut StateVector, q1: usize, q2: usize) {
    let mask1 = 1 << q1;
    let mask2 = 1 << q2;
    let n = dim(state);
    let amps = state.amplitudes_mut();
    for i in 0..n {
        let b1 = (i & mask1) != 0;
        let b2 = (i & mask2) != 0;
        if b1 && !b2 {
            let j = (i & !mask1) | mask2;
            amps.swap(i, j);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aqec_ir::QubitId;

    fn approx_eq(a: Complex64, b: Complex64) -> bool {
        (a - b).norm() < 1e-10
    }

    #[test]
    fn test_x_gate() {
        let mut sv = StateVector::zero(1);
        apply_op(&mut sv, &GateOp::new(Gate::X, [QubitId(0)]));
        assert!(approx_eq(sv.amplitudes()[0], Complex64::new(0.0, 0.0)));
        assert!(approx_eq(sv.amplitudes()[1], Complex64::new(1.0, 0.0)));
    }

    #[test]
    fn test_bell_state() {
        let mut sv = StateVector::zero(2);
        apply_op(&mut sv, &GateOp::new(Gate::H, [QubitId(0)]));
        apply_op(&mut sv, &GateOp::new(Gate::Cx, [QubitId(0), QubitId(1)]));

        let sqrt2_inv = 1.0 / 2.0_f64.sqrt();
        assert!(approx_eq(sv.amplitudes()[0], Complex64::new(sqrt2_inv, 0.0)));
        assert!(approx_eq(sv.amplitudes()[1], Complex64::new(0.0, 0.0)));
        assert!(approx_eq(sv.amplitudes()[2], Complex64::new(0.0, 0.0)));
        assert!(approx_eq(sv.amplitudes()[3], Complex64::new(sqrt2_inv, 0.0)));
    }

    #[test]
    fn test_hh_is_identity() {
        let mut sv = StateVector::zero(1);
        apply_op(&mut sv, &GateOp::new(Gate::H, [QubitId(0)]));
        apply_op(&mut sv, &GateOp::new(Gate::H, [QubitId(0)]));
        assert!(approx_eq(sv.amplitudes()[0], Complex64::new(1.0, 0.0)));
    }

    #[test]
    fn test_s_s_equals_z() {
        let mut a = StateVector::zero(1);
        apply_op(&mut a, &GateOp::new(Gate::H, [QubitId(0)]));
        apply_op(&mut a, &GateOp::new(Gate::S, [QubitId(0)]));
        apply_op(&mut a, &GateOp::new(Gate::S, [QubitId(0)]));

        let mut b = StateVector::zero(1);
        apply_op(&mut b, &GateOp::new(Gate::H, [QubitId(0)]));
        apply_op(&mut b, &GateOp::new(Gate::Z, [QubitId(0)]));

        assert!((a.fidelity(&b).unwrap() - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_swap() {
        let mut sv = StateVector::zero(2);
        apply_op(&mut sv, &GateOp::new(Gate::X, [QubitId(0)]));
        apply_op(&mut sv, &GateOp::new(Gate::Swap, [QubitId(0), QubitId(1)]));
        // |01⟩ → |10⟩ (qubit 1 set).
        assert!(approx_eq(sv.amplitudes()[2], Complex64::new(1.0, 0.0)));
    }
}
