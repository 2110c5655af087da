//! Noise profiles attached to environment configurations.

use std::collections::BTreeMap;
use std::hash::Hasher;

use rustc_hash::FxHasher;
use serde::{Deserialize, Serialize};

/// Per-gate error parameters for a simulated device.
///
/// A profile belongs to a configuration, not to a circuit: the same circuit
/// may be executed (and optimized) under different profiles. The
/// [`fingerprint`](NoiseProfile::fingerprint) identifies a profile for cache
/// namespacing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NoiseProfile {
    /// Depolarizing probability per gate, keyed by gate name ("cx" → 0.01).
    #[serde(default)]
    pub gate_errors: BTreeMap<String, f64>,

    /// Readout error probability per qubit.
    #[serde(default)]
    pub readout_errors: Option<Vec<f64>>,
}

impl NoiseProfile {
    /// Create a new empty noise profile.
    pub fn new() -> Self {
        Self::default()
    }

    /// Uniform depolarizing noise: the same probability for every listed gate.
    pub fn uniform_depolarizing(p: f64, gates: &[&str]) -> Self {
        Self {
            gate_errors: gates.iter().map(|g| (g.to_string(), p)).collect(),
            readout_errors: None,
        }
    }

    /// Attach per-qubit readout errors.
    #[must_use]
    pub fn with_readout_errors(mut self, errors: Vec<f64>) -> Self {
        self.readout_errors = Some(errors);
        self
    }

    /// Get the error rate for a specific gate, if known.
    pub fn gate_error(&self, gate_name: &str) -> Option<f64> {
        self.gate_errors.get(gate_name).copied()
    }

    /// Get the readout error for a specific qubit, if known.
    pub fn qubit_readout_error(&self, qubit_index: usize) -> Option<f64> {
        self.readout_errors
            .as_ref()
            .and_then(|v| v.get(qubit_index))
            .copied()
    }

    /// Check if this profile has any noise data at all.
    pub fn is_empty(&self) -> bool {
        self.gate_errors.is_empty() && self.readout_errors.is_none()
    }

    /// Deterministic content hash identifying this profile.
    ///
    /// Two profiles with identical parameters share a fingerprint; the
    /// BTreeMap keeps gate iteration order stable.
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = FxHasher::default();
        for (name, p) in &self.gate_errors {
            hasher.write(name.as_bytes());
            hasher.write_u64(p.to_bits());
        }
        if let Some(readout) = &self.readout_errors {
            hasher.write_u8(1);
            for p in readout {
                hasher.write_u64(p.to_bits());
            }
        }
        hasher.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_profile() {
        let profile = NoiseProfile::new();
        assert!(profile.is_empty());
        assert_eq!(profile.gate_error("cx"), None);
    }

    #[test]
    fn test_uniform_depolarizing() {
        let profile = NoiseProfile::uniform_depolarizing(0.01, &["x", "z", "h"]);
        assert_eq!(profile.gate_error("x"), Some(0.01));
        assert_eq!(profile.gate_error("cx"), None);
        assert!(!profile.is_empty());
    }

    #[test]
    fn test_fingerprint_identity() {
        let a = NoiseProfile::uniform_depolarizing(0.01, &["x", "h"]);
        let b = NoiseProfile::uniform_depolarizing(0.01, &["h", "x"]);
        let c = NoiseProfile::uniform_depolarizing(0.02, &["x", "h"]);

        // Same content, insertion order irrelevant.
        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_ne!(a.fingerprint(), c.fingerprint());
    }

    #[test]
    fn test_readout_errors() {
        let profile =
            NoiseProfile::uniform_depolarizing(0.01, &["x"]).with_readout_errors(vec![0.02, 0.05]);
        assert_eq!(profile.qubit_readout_error(1), Some(0.05));
        assert_eq!(profile.qubit_readout_error(7), None);
        assert_ne!(
            profile.fingerprint(),
            NoiseProfile::uniform_depolarizing(0.01, &["x"]).fingerprint()
        );
    }

    #[test]
    fn test_serialization_roundtrip() {
        let profile = NoiseProfile::uniform_depolarizing(0.03, &["cx"]);
        let json = serde_json::to_string(&profile).unwrap();
        let back: NoiseProfile = serde_json::from_str(&json).unwrap();
        assert_eq!(back, profile);
    }
}
