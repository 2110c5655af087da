//! Noise-aware qubit layout.

use aqec_ir::{GateOp, NoiseProfile, QubitId};

use crate::error::CompileResult;
use crate::pass::RewritePass;

/// Permute logical qubits onto the least noisy physical slots.
///
/// Usage is counted per logical qubit; the busiest qubits are assigned to
/// the slots with the lowest readout error. With no readout data in the
/// profile the pass is the identity.
pub struct NoiseAwareLayout {
    profile: NoiseProfile,
}

impl NoiseAwareLayout {
    /// Create a layout pass for the given noise profile.
    pub fn new(profile: NoiseProfile) -> Self {
        Self { profile }
    }

    /// Compute the logical-to-physical permutation, or `None` when the
    /// profile carries no per-qubit readout data.
    fn permutation(&self, ops: &[GateOp], qubit_count: u32) -> Option<Vec<u32>> {
        let n = qubit_count as usize;
        let readout: Vec<f64> = (0..qubit_count)
            .map(|q| self.profile.qubit_readout_error(q as usize))
            .collect::<Option<Vec<f64>>>()?;

        let mut usage = vec![0usize; n];
        for op in ops {
            for q in &op.qubits {
                usage[q.0 as usize] += 1;
            }
        }

        // Logical qubits, busiest first; ties keep index order.
        let mut logical: Vec<u32> = (0..qubit_count).collect();
        logical.sort_by(|&a, &b| usage[b as usize].cmp(&usage[a as usize]).then(a.cmp(&b)));

        // Physical slots, quietest first.
        let mut physical: Vec<u32> = (0..qubit_count).collect();
        physical.sort_by(|&a, &b| {
            readout[a as usize]
                .partial_cmp(&readout[b as usize])
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.cmp(&b))
        });

        let mut perm = vec![0u32; n];
        for (l, p) in logical.iter().zip(physical.iter()) {
            perm[*l as usize] = *p;
        }
        if perm.iter().enumerate().all(|(i, &p)| i as u32 == p) {
            return None;
        }
        Some(perm)
    }
}

impl RewritePass for NoiseAwareLayout {
    fn name(&self) -> &str {
        "NoiseAwareLayout"
    }

    fn run(&self, ops: &mut Vec<GateOp>, qubit_count: u32) -> CompileResult<()> {
        let Some(perm) = self.permutation(ops, qubit_count) else {
            return Ok(());
        };
        tracing::debug!(?perm, "applying noise-aware layout");
        for op in ops.iter_mut() {
            for q in op.qubits.iter_mut() {
                *q = QubitId(perm[q.0 as usize]);
            }
        }
        Ok(())
    }
}
