//! The episodic error-correction environment.

use std::sync::Arc;

use aqec_compile::OptimizationCache;
use aqec_gateway::{SimulationError, SimulationGateway, StateVector};
use aqec_ir::{CircuitModel, Gate, NoiseProfile, QubitId};
use aqec_telemetry::{Telemetry, TelemetryResult};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, instrument, warn};

use crate::config::{CORRECTIVE_GATES, EnvironmentConfig};
use crate::error::{EnvError, EnvResult};

/// Episode lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Uninitialized,
    Ready,
    Running,
    Terminal,
}

/// The result of one environment step.
#[derive(Debug, Clone, Serialize)]
pub struct StepOutcome {
    /// Interleaved real/imaginary amplitudes of the noisy state.
    pub observation: Vec<f64>,
    /// State fidelity between the ideal and noisy executions.
    pub reward: f64,
    /// Whether the episode ended with this step.
    pub done: bool,
    /// Structured step metadata (`depth`, `step_count`, `error` on failure).
    pub info: Map<String, Value>,
}

/// An episodic control loop over a noisy quantum register.
///
/// Each episode starts from an entangling preparation circuit. The agent
/// appends corrective gates one action at a time; the environment rewrites
/// the circuit through the optimization cache, executes it with and without
/// noise, and rewards the fidelity between the two.
///
/// Simulation failures end the episode (reward 0, error kind in `info`)
/// rather than propagating: a crashed backend is a terminal observation for
/// the agent, not a control-flow exception for the caller.
pub struct ErrorCorrectionEnvironment {
    config: EnvironmentConfig,
    gateway: Arc<dyn SimulationGateway>,
    cache: Option<Arc<OptimizationCache>>,
    telemetry: Option<Arc<Telemetry>>,
    noise: NoiseProfile,
    circuit: Option<CircuitModel>,
    phase: Phase,
    step_count: u32,
}

impl ErrorCorrectionEnvironment {
    /// Create an environment. Fails fast on an invalid configuration.
    pub fn new(config: EnvironmentConfig, gateway: Arc<dyn SimulationGateway>) -> EnvResult<Self> {
        config.validate()?;
        // The profile is derived from the validated config, never attached
        // before validation.
        let noise = NoiseProfile::uniform_depolarizing(config.noise_level, &CORRECTIVE_GATES);
        Ok(Self {
            config,
            gateway,
            cache: None,
            telemetry: None,
            noise,
            circuit: None,
            phase: Phase::Uninitialized,
            step_count: 0,
        })
    }

    /// Route optimization through a shared cache.
    #[must_use]
    pub fn with_cache(mut self, cache: Arc<OptimizationCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Attach a telemetry bundle.
    #[must_use]
    pub fn with_telemetry(mut self, telemetry: Arc<Telemetry>) -> Self {
        self.telemetry = Some(telemetry);
        self
    }

    /// The environment's configuration.
    pub fn config(&self) -> &EnvironmentConfig {
        &self.config
    }

    /// Number of valid actions.
    pub fn action_space_size(&self) -> u32 {
        self.config.action_space_size()
    }

    /// Steps taken in the current episode.
    pub fn step_count(&self) -> u32 {
        self.step_count
    }

    /// Whether the current episode has ended.
    pub fn is_terminated(&self) -> bool {
        self.phase == Phase::Terminal
    }

    /// Start a new episode and return the initial noisy observation.
    #[instrument(skip(self), fields(qubits = self.config.qubit_count))]
    pub fn reset(&mut self) -> EnvResult<Vec<f64>> {
        let circuit = CircuitModel::entangled_prep(self.config.qubit_count)?;
        let state = self.execute(&circuit, Some(&self.noise))?;

        self.circuit = Some(circuit);
        self.step_count = 0;
        self.phase = Phase::Ready;
        if let Some(t) = &self.telemetry {
            record_or_warn(t.metrics.increment("aqec_env_episodes_total"));
        }
        debug!("episode reset");
        Ok(state.observation())
    }

    /// Apply one corrective action.
    #[instrument(skip(self), fields(step = self.step_count))]
    pub fn step(&mut self, action: u32) -> EnvResult<StepOutcome> {
        let circuit = match self.phase {
            Phase::Uninitialized => return Err(EnvError::NotReset),
            Phase::Terminal => return Err(EnvError::Terminated),
            Phase::Ready | Phase::Running => self
                .circuit
                .as_ref()
                .ok_or(EnvError::NotReset)?,
        };
        let space = self.action_space_size();
        if action >= space {
            // Invalid actions leave the episode untouched.
            return Err(EnvError::InvalidAction { action, space });
        }

        let (gate, qubit) = decode_action(action);
        let extended = circuit.with_gate(gate, [qubit])?;
        let optimized = self.maybe_optimize(extended);

        let (ideal, noisy) = match self.execute_pair(&optimized) {
            Ok(pair) => pair,
            Err(e) => return Ok(self.terminal_failure(optimized, e)),
        };
        // Qubit counts match by construction.
        let reward = ideal.fidelity(&noisy)?;

        self.step_count += 1;
        let done = self.step_count >= self.config.max_steps
            || reward >= self.config.reward_threshold;
        self.phase = if done { Phase::Terminal } else { Phase::Running };

        let mut info = Map::new();
        info.insert("depth".to_string(), optimized.depth().into());
        info.insert("step_count".to_string(), self.step_count.into());

        if let Some(t) = &self.telemetry {
            t.errors.record_success();
            t.performance.record("reward", reward);
            t.performance.record("depth", optimized.depth() as f64);
            record_or_warn(t.metrics.increment("aqec_env_steps_total"));
            record_or_warn(t.metrics.set_gauge("aqec_env_reward", reward));
            record_or_warn(
                t.metrics
                    .set_gauge("aqec_env_circuit_depth", optimized.depth() as f64),
            );
        }
        debug!(reward, done, depth = optimized.depth(), "step complete");

        self.circuit = Some(optimized);
        Ok(StepOutcome {
            observation: noisy.observation(),
            reward,
            done,
            info,
        })
    }

    fn maybe_optimize(&self, circuit: CircuitModel) -> CircuitModel {
        if self.config.optimization_level == 0 {
            return circuit;
        }
        let Some(cache) = &self.cache else {
            return circuit;
        };
        match cache.optimize_with_noise(&circuit, &self.noise) {
            Ok(optimized) => optimized,
            Err(e) => {
                // A failed rewrite is a telemetry event, not a lost episode.
                warn!(error = %e, "optimization failed, using unoptimized circuit");
                if let Some(t) = &self.telemetry {
                    t.errors.record_error("compile", e.to_string());
                }
                circuit
            }
        }
    }

    fn execute_pair(
        &self,
        circuit: &CircuitModel,
    ) -> Result<(StateVector, StateVector), SimulationError> {
        let ideal = self.execute(circuit, None)?;
        let noisy = self.execute(circuit, Some(&self.noise))?;
        Ok((ideal, noisy))
    }

    fn execute(
        &self,
        circuit: &CircuitModel,
        noise: Option<&NoiseProfile>,
    ) -> Result<StateVector, SimulationError> {
        let _timer = self
            .telemetry
            .as_ref()
            .and_then(|t| t.metrics.scoped_timer("aqec_env_execute_duration_seconds").ok());
        self.gateway.execute(circuit, noise)
    }

    /// A gateway failure ends the episode with zero reward.
    fn terminal_failure(&mut self, circuit: CircuitModel, error: SimulationError) -> StepOutcome {
        warn!(error = %error, "simulation failed, terminating episode");
        self.step_count += 1;
        self.phase = Phase::Terminal;

        if let Some(t) = &self.telemetry {
            let mut metadata = Map::new();
            metadata.insert("depth".to_string(), circuit.depth().into());
            metadata.insert("qubit_count".to_string(), circuit.qubit_count().into());
            metadata.insert("step_count".to_string(), self.step_count.into());
            t.errors
                .record_error_with_context(error.kind(), error.to_string(), Some(metadata), None);
            record_or_warn(
                t.metrics
                    .increment_with_labels("aqec_env_failures_total", &[("kind", error.kind())]),
            );
        }

        let mut info = Map::new();
        info.insert("error".to_string(), error.kind().into());
        info.insert("step_count".to_string(), self.step_count.into());

        let dim = 1usize << self.config.qubit_count;
        self.circuit = Some(circuit);
        StepOutcome {
            observation: vec![0.0; dim * 2],
            reward: 0.0,
            done: true,
            info,
        }
    }
}

/// Telemetry is advisory: a dropped sample is logged, never fatal.
fn record_or_warn(result: TelemetryResult<()>) {
    if let Err(e) = result {
        warn!(error = %e, "telemetry sample dropped");
    }
}

/// Map an action index to its corrective gate and target qubit.
fn decode_action(action: u32) -> (Gate, QubitId) {
    let gate = match action % 3 {
        0 => Gate::X,
        1 => Gate::Z,
        _ => Gate::H,
    };
    (gate, QubitId(action / 3))
}
