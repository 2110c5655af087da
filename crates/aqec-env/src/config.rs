//! Environment configuration.

use serde::{Deserialize, Serialize};

use crate::error::{EnvError, EnvResult};

/// Gates the agent may apply as corrections, in action-encoding order.
pub const CORRECTIVE_GATES: [&str; 3] = ["x", "z", "h"];

/// Parameters of one environment instance.
///
/// Validated once at environment construction; a running environment never
/// sees an out-of-range value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    /// Number of qubits in the protected register.
    pub qubit_count: u32,
    /// Depolarizing probability applied per corrective gate.
    pub noise_level: f64,
    /// Episode length bound.
    pub max_steps: u32,
    /// Reward at or above which the episode ends successfully.
    pub reward_threshold: f64,
    /// 0 disables circuit rewriting; 1-3 route through the cache.
    pub optimization_level: u8,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            qubit_count: 3,
            noise_level: 0.01,
            max_steps: 100,
            reward_threshold: 0.95,
            optimization_level: 1,
        }
    }
}

impl EnvironmentConfig {
    /// Check every field against its allowed range.
    pub fn validate(&self) -> EnvResult<()> {
        if !(1..=50).contains(&self.qubit_count) {
            return Err(EnvError::Configuration(format!(
                "qubit_count must be in [1, 50], got {}",
                self.qubit_count
            )));
        }
        if !(self.noise_level > 0.0 && self.noise_level < 1.0) {
            return Err(EnvError::Configuration(format!(
                "noise_level must be in (0, 1), got {}",
                self.noise_level
            )));
        }
        if self.max_steps == 0 {
            return Err(EnvError::Configuration(
                "max_steps must be positive".to_string(),
            ));
        }
        if !(self.reward_threshold > 0.0 && self.reward_threshold < 1.0) {
            return Err(EnvError::Configuration(format!(
                "reward_threshold must be in (0, 1), got {}",
                self.reward_threshold
            )));
        }
        if self.optimization_level > 3 {
            return Err(EnvError::Configuration(format!(
                "optimization_level must be in [0, 3], got {}",
                self.optimization_level
            )));
        }
        Ok(())
    }

    /// Number of distinct actions: one per corrective gate per qubit.
    pub fn action_space_size(&self) -> u32 {
        CORRECTIVE_GATES.len() as u32 * self.qubit_count
    }
}
