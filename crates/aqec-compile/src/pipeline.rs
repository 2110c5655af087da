//! Rewrite pipelines.

use std::sync::Arc;

use aqec_ir::{CircuitModel, NoiseProfile};
use tracing::{debug, instrument};

use crate::error::{CompileError, CompileResult};
use crate::pass::{MAX_FIXPOINT_ITERATIONS, RewritePass};
use crate::passes::{
    BasisUnroll, CancelInverses, CommutativeCancellation, FuseRotations, NoiseAwareLayout,
};

/// A complete circuit-rewrite pipeline.
///
/// Implementations must be deterministic: the same circuit and profile in,
/// the same circuit out. The optimization cache relies on this.
pub trait RewritePipeline: Send + Sync {
    /// Optimize a circuit, optionally steering by a noise profile.
    fn optimize(
        &self,
        circuit: &CircuitModel,
        noise: Option<&NoiseProfile>,
    ) -> CompileResult<CircuitModel>;
}

/// The standard pass pipeline.
///
/// Runs basis unrolling, rotation fusion, inverse cancellation and
/// commutation-aware cancellation, in that order, repeating the chain until
/// the op sequence stabilizes (a cancellation can expose a fusion an earlier
/// pass missed, so one sweep is not a fixed point). When a noise profile
/// with readout data is supplied, a noise-aware layout runs last. A rewrite
/// that increases depth is discarded and the input returned unchanged, so
/// optimizing an already optimized circuit is a no-op.
pub struct TranspilePipeline {
    passes: Vec<Arc<dyn RewritePass>>,
}

impl TranspilePipeline {
    /// Build the standard pipeline.
    pub fn standard() -> Self {
        Self {
            passes: vec![
                Arc::new(BasisUnroll::new()),
                Arc::new(FuseRotations::new()),
                Arc::new(CancelInverses::new()),
                Arc::new(CommutativeCancellation::new()),
            ],
        }
    }

    /// Build a pipeline from an explicit pass list.
    pub fn with_passes(passes: Vec<Arc<dyn RewritePass>>) -> Self {
        Self { passes }
    }
}

impl Default for TranspilePipeline {
    fn default() -> Self {
        Self::standard()
    }
}

impl RewritePipeline for TranspilePipeline {
    #[instrument(skip_all, fields(qubits = circuit.qubit_count(), ops_in = circuit.ops().len()))]
    fn optimize(
        &self,
        circuit: &CircuitModel,
        noise: Option<&NoiseProfile>,
    ) -> CompileResult<CircuitModel> {
        let qubit_count = circuit.qubit_count();
        let mut ops = circuit.ops().to_vec();

        for _ in 0..MAX_FIXPOINT_ITERATIONS {
            let before = ops.clone();
            for pass in &self.passes {
                pass.run(&mut ops, qubit_count)
                    .map_err(|e| CompileError::PassFailed {
                        pass: pass.name().to_string(),
                        reason: e.to_string(),
                    })?;
            }
            if ops == before {
                break;
            }
        }
        if let Some(profile) = noise {
            let layout = NoiseAwareLayout::new(profile.clone());
            layout
                .run(&mut ops, qubit_count)
                .map_err(|e| CompileError::PassFailed {
                    pass: layout.name().to_string(),
                    reason: e.to_string(),
                })?;
        }

        let rewritten = CircuitModel::from_ops(qubit_count, ops)
            .map_err(|e| CompileError::InvalidRewrite(e.to_string()))?;

        // The pipeline must never make things worse.
        if rewritten.depth() > circuit.depth() {
            debug!(
                depth_in = circuit.depth(),
                depth_out = rewritten.depth(),
                "rewrite increased depth, keeping original"
            );
            return Ok(circuit.clone());
        }

        debug!(
            ops_out = rewritten.ops().len(),
            depth_out = rewritten.depth(),
            "circuit optimized"
        );
        Ok(rewritten)
    }
}
