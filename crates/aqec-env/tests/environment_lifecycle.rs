//! End-to-end environment lifecycle tests against a stub gateway.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use aqec_compile::{OptimizationCache, RewritePipeline, TranspilePipeline};
use aqec_env::{EnvError, EnvironmentConfig, ErrorCorrectionEnvironment};
use aqec_gateway::{SimResult, SimulationError, SimulationGateway, StateVector};
use aqec_ir::{CircuitModel, NoiseProfile};
use aqec_sim::StatevectorSimulator;
use aqec_telemetry::Telemetry;
use num_complex::Complex64;

/// Gateway returning a fixed state, optionally degraded under noise.
struct StubGateway {
    noisy_overlap: f64,
}

impl StubGateway {
    /// Noisy executions return a state whose fidelity against the ideal one
    /// is `noisy_overlap²`.
    fn with_overlap(noisy_overlap: f64) -> Self {
        Self { noisy_overlap }
    }
}

impl SimulationGateway for StubGateway {
    fn name(&self) -> &str {
        "stub"
    }

    fn execute(
        &self,
        circuit: &CircuitModel,
        noise: Option<&NoiseProfile>,
    ) -> SimResult<StateVector> {
        let n = circuit.qubit_count();
        let dim = 1usize << n;
        let mut amplitudes = vec![Complex64::new(0.0, 0.0); dim];
        match noise {
            None => amplitudes[0] = Complex64::new(1.0, 0.0),
            Some(_) => {
                let a = self.noisy_overlap;
                let b = (1.0 - a * a).sqrt();
                amplitudes[0] = Complex64::new(a, 0.0);
                amplitudes[dim - 1] = Complex64::new(b, 0.0);
            }
        }
        StateVector::from_amplitudes(amplitudes)
    }
}

/// Gateway that always fails.
struct BrokenGateway {
    called: AtomicBool,
}

impl SimulationGateway for BrokenGateway {
    fn name(&self) -> &str {
        "broken"
    }

    fn execute(
        &self,
        _circuit: &CircuitModel,
        _noise: Option<&NoiseProfile>,
    ) -> SimResult<StateVector> {
        self.called.store(true, Ordering::SeqCst);
        Err(SimulationError::Backend("device offline".to_string()))
    }
}

fn config() -> EnvironmentConfig {
    EnvironmentConfig {
        qubit_count: 2,
        noise_level: 0.05,
        max_steps: 10,
        reward_threshold: 0.99,
        optimization_level: 1,
    }
}

#[test]
fn test_step_before_reset_fails() {
    let mut env =
        ErrorCorrectionEnvironment::new(config(), Arc::new(StubGateway::with_overlap(0.9)))
            .unwrap();
    assert!(matches!(env.step(0), Err(EnvError::NotReset)));
}

#[test]
fn test_invalid_config_rejected() {
    let bad = EnvironmentConfig {
        noise_level: 0.0,
        ..config()
    };
    let result = ErrorCorrectionEnvironment::new(bad, Arc::new(StubGateway::with_overlap(0.9)));
    assert!(matches!(result, Err(EnvError::Configuration(_))));
}

#[test]
fn test_reset_returns_full_observation() {
    let mut env =
        ErrorCorrectionEnvironment::new(config(), Arc::new(StubGateway::with_overlap(0.9)))
            .unwrap();
    let observation = env.reset().unwrap();
    // 2 qubits, 4 amplitudes, interleaved re/im.
    assert_eq!(observation.len(), 8);
}

#[test]
fn test_episode_runs_to_max_steps() {
    // Overlap 0.9 → reward 0.81, below the 0.99 threshold forever.
    let mut env =
        ErrorCorrectionEnvironment::new(config(), Arc::new(StubGateway::with_overlap(0.9)))
            .unwrap();
    env.reset().unwrap();

    for step in 1..=10 {
        let outcome = env.step(step % env.action_space_size()).unwrap();
        assert!((outcome.reward - 0.81).abs() < 1e-9);
        assert_eq!(outcome.info["step_count"], step);
        assert_eq!(outcome.done, step == 10);
    }
    assert!(env.is_terminated());
    assert!(matches!(env.step(0), Err(EnvError::Terminated)));
}

#[test]
fn test_threshold_ends_episode_immediately() {
    // Overlap ~1 → reward ~1, over the threshold on the first step.
    let mut env =
        ErrorCorrectionEnvironment::new(config(), Arc::new(StubGateway::with_overlap(1.0)))
            .unwrap();
    env.reset().unwrap();

    let outcome = env.step(0).unwrap();
    assert!(outcome.done);
    assert!(outcome.reward > 0.99);
    assert_eq!(env.step_count(), 1);
}

#[test]
fn test_invalid_action_leaves_state_untouched() {
    let mut env =
        ErrorCorrectionEnvironment::new(config(), Arc::new(StubGateway::with_overlap(0.9)))
            .unwrap();
    env.reset().unwrap();
    env.step(0).unwrap();

    let space = env.action_space_size();
    assert_eq!(space, 6);
    assert!(matches!(
        env.step(space),
        Err(EnvError::InvalidAction { action: 6, space: 6 })
    ));
    assert_eq!(env.step_count(), 1);
    assert!(!env.is_terminated());

    // The episode continues normally afterwards.
    env.step(1).unwrap();
    assert_eq!(env.step_count(), 2);
}

#[test]
fn test_simulation_failure_is_terminal_outcome() {
    let gateway = Arc::new(BrokenGateway {
        called: AtomicBool::new(false),
    });
    let mut env = ErrorCorrectionEnvironment::new(config(), gateway.clone()).unwrap();

    // Reset itself needs the gateway, so it propagates the failure.
    assert!(matches!(env.reset(), Err(EnvError::Simulation(_))));
    assert!(gateway.called.load(Ordering::SeqCst));
}

#[test]
fn test_step_failure_terminates_with_error_info() {
    /// Succeeds on reset, fails on every later call.
    struct FlakyGateway {
        inner: StubGateway,
        calls: std::sync::atomic::AtomicU32,
    }

    impl SimulationGateway for FlakyGateway {
        fn name(&self) -> &str {
            "flaky"
        }

        fn execute(
            &self,
            circuit: &CircuitModel,
            noise: Option<&NoiseProfile>,
        ) -> SimResult<StateVector> {
            if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
                self.inner.execute(circuit, noise)
            } else {
                Err(SimulationError::Backend("flaked".to_string()))
            }
        }
    }

    let telemetry = Arc::new(Telemetry::new());
    let mut env = ErrorCorrectionEnvironment::new(
        config(),
        Arc::new(FlakyGateway {
            inner: StubGateway::with_overlap(0.9),
            calls: std::sync::atomic::AtomicU32::new(0),
        }),
    )
    .unwrap()
    .with_telemetry(telemetry.clone());

    env.reset().unwrap();
    let outcome = env.step(0).unwrap();

    assert!(outcome.done);
    assert_eq!(outcome.reward, 0.0);
    assert_eq!(outcome.info["error"], "backend");
    assert!(outcome.observation.iter().all(|&v| v == 0.0));
    assert!(env.is_terminated());

    let stats = telemetry.errors.statistics();
    assert_eq!(stats.error_count, 1);
    assert_eq!(stats.most_common, Some(("backend".to_string(), 1)));

    // The recorded event carries the circuit context of the failed step.
    let history = telemetry.errors.history();
    let metadata = history[0].metadata.as_ref().unwrap();
    assert_eq!(metadata["qubit_count"], 2);
    assert_eq!(metadata["step_count"], 1);
    assert!(metadata.contains_key("depth"));

    // Failures are counted per error kind.
    let encoded = telemetry.metrics.encode().unwrap();
    assert!(encoded.contains("aqec_env_failures_total{kind=\"backend\"} 1"));
}

#[test]
fn test_metric_conflict_does_not_break_stepping() {
    let telemetry = Arc::new(Telemetry::new());
    // Claim the reward name as a counter so the environment's gauge writes
    // fail; the episode must still run.
    telemetry.metrics.increment("aqec_env_reward").unwrap();

    let mut env =
        ErrorCorrectionEnvironment::new(config(), Arc::new(StubGateway::with_overlap(0.9)))
            .unwrap()
            .with_telemetry(telemetry.clone());
    env.reset().unwrap();

    let outcome = env.step(0).unwrap();
    assert!((outcome.reward - 0.81).abs() < 1e-9);
    assert_eq!(
        telemetry.metrics.counter_value("aqec_env_steps_total"),
        Some(1.0)
    );
}

#[test]
fn test_full_loop_with_real_simulator_and_cache() {
    let cache = Arc::new(OptimizationCache::new(
        Arc::new(TranspilePipeline::standard()) as Arc<dyn RewritePipeline>,
    ));
    let telemetry = Arc::new(Telemetry::new());
    let mut env = ErrorCorrectionEnvironment::new(
        EnvironmentConfig {
            qubit_count: 2,
            noise_level: 0.01,
            max_steps: 5,
            reward_threshold: 0.999,
            optimization_level: 2,
        },
        Arc::new(StatevectorSimulator::new()),
    )
    .unwrap()
    .with_cache(cache.clone())
    .with_telemetry(telemetry.clone());

    let observation = env.reset().unwrap();
    assert_eq!(observation.len(), 8);

    let mut steps = 0;
    loop {
        let outcome = env.step(steps % env.action_space_size()).unwrap();
        steps += 1;
        assert!((0.0..=1.0).contains(&outcome.reward));
        assert!(outcome.info.contains_key("depth"));
        if outcome.done {
            break;
        }
    }
    assert!(steps <= 5);

    // Each step went through the rewrite cache.
    let stats = cache.stats();
    assert_eq!(stats.hits + stats.misses, steps as u64);

    // Telemetry saw every step.
    assert_eq!(
        telemetry.metrics.counter_value("aqec_env_steps_total"),
        Some(steps as f64)
    );
    assert_eq!(
        telemetry.performance.summary("reward").map(|s| s.count),
        Some(steps as usize)
    );
}
