//! Quantum state vectors returned by gateways.

use num_complex::Complex64;

use crate::error::{SimResult, SimulationError};

/// A pure quantum state over `n` qubits (2^n complex amplitudes).
#[derive(Debug, Clone, PartialEq)]
pub struct StateVector {
    amplitudes: Vec<Complex64>,
    num_qubits: usize,
}

impl StateVector {
    /// Create a state vector initialized to |0...0⟩.
    pub fn zero(num_qubits: usize) -> Self {
        let size = 1 << num_qubits;
        let mut amplitudes = vec![Complex64::new(0.0, 0.0); size];
        amplitudes[0] = Complex64::new(1.0, 0.0);
        Self {
            amplitudes,
            num_qubits,
        }
    }

    /// Build a state vector from raw amplitudes.
    ///
    /// The length must be a power of two; callers are responsible for
    /// normalization.
    pub fn from_amplitudes(amplitudes: Vec<Complex64>) -> SimResult<Self> {
        let len = amplitudes.len();
        if len == 0 || !len.is_power_of_two() {
            return Err(SimulationError::Backend(format!(
                "amplitude vector length {len} is not a power of two"
            )));
        }
        Ok(Self {
            amplitudes,
            num_qubits: len.trailing_zeros() as usize,
        })
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Get the raw amplitudes.
    pub fn amplitudes(&self) -> &[Complex64] {
        &self.amplitudes
    }

    /// Mutable amplitude access for simulator kernels.
    pub fn amplitudes_mut(&mut self) -> &mut [Complex64] {
        &mut self.amplitudes
    }

    /// Pure-state fidelity |⟨a|b⟩|² against another state.
    ///
    /// Always in [0, 1] for normalized states. This is the environment's
    /// reward signal.
    pub fn fidelity(&self, other: &StateVector) -> SimResult<f64> {
        if self.num_qubits != other.num_qubits {
            return Err(SimulationError::QubitCountMismatch {
                left: self.num_qubits,
                right: other.num_qubits,
            });
        }
        let inner: Complex64 = self
            .amplitudes
            .iter()
            .zip(&other.amplitudes)
            .map(|(a, b)| a.conj() * b)
            .sum();
        Ok(inner.norm_sqr().clamp(0.0, 1.0))
    }

    /// Flatten to an observation vector: interleaved [re, im] pairs.
    ///
    /// Keeps the full state information, unlike a real-part projection.
    pub fn observation(&self) -> Vec<f64> {
        self.amplitudes
            .iter()
            .flat_map(|a| [a.re, a.im])
            .collect()
    }
}
