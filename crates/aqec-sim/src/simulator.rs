//! Statevector gateway implementation.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, instrument};

use aqec_gateway::{SimResult, SimulationError, SimulationGateway, StateVector};
use aqec_ir::{CircuitModel, GateOp, NoiseProfile};

use crate::kernel;

/// Local statevector simulator.
///
/// Supports circuits up to ~20 qubits (limited by memory). Depolarizing
/// noise is realized as stochastic Pauli injection: after each gate carrying
/// an error probability in the profile, each involved qubit suffers a
/// uniformly random Pauli with that probability.
///
/// Noise draws come from an RNG seeded by the configured seed mixed with the
/// circuit's canonical hash, so a given (simulator, circuit, profile) triple
/// is reproducible while distinct circuits still see independent noise.
pub struct StatevectorSimulator {
    name: String,
    max_qubits: u32,
    seed: u64,
}

impl StatevectorSimulator {
    /// Create a new simulator with default settings.
    pub fn new() -> Self {
        Self {
            name: "statevector".into(),
            max_qubits: 20,
            seed: 0,
        }
    }

    /// Create a simulator with a custom qubit capacity.
    pub fn with_max_qubits(max_qubits: u32) -> Self {
        Self {
            max_qubits,
            ..Self::new()
        }
    }

    /// Set the noise seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    fn inject_noise(&self, state: &mut StateVector, op: &GateOp, p: f64, rng: &mut StdRng) {
        for qubit in &op.qubits {
            if rng.r#gen::<f64>() >= p {
                continue;
            }
            let q = qubit.0 as usize;
            match rng.gen_range(0..3) {
                0 => kernel::apply_x(state, q),
                1 => kernel::apply_y(state, q),
                _ => kernel::apply_phase_flip(state, q),
            }
        }
    }
}

impl Default for StatevectorSimulator {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulationGateway for StatevectorSimulator {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(skip(self, circuit, noise), fields(gateway = %self.name))]
    fn execute(
        &self,
        circuit: &CircuitModel,
        noise: Option<&NoiseProfile>,
    ) -> SimResult<StateVector> {
        if circuit.qubit_count() > self.max_qubits {
            return Err(SimulationError::CircuitTooLarge {
                got: circuit.qubit_count(),
                max: self.max_qubits,
            });
        }

        debug!(
            qubits = circuit.qubit_count(),
            ops = circuit.num_ops(),
            noisy = noise.is_some(),
            "starting simulation"
        );

        let mut state = StateVector::zero(circuit.qubit_count() as usize);
        let mut rng = StdRng::seed_from_u64(self.seed ^ circuit.canonical_hash());

        for op in circuit.ops() {
            kernel::apply_op(&mut state, op);
            if let Some(profile) = noise {
                if let Some(p) = profile.gate_error(op.name()) {
                    self.inject_noise(&mut state, op, p, &mut rng);
                }
            }
        }

        Ok(state)
    }
}
