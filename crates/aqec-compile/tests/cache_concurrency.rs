//! Concurrency tests for the optimization cache.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

use aqec_compile::{CompileResult, OptimizationCache, RewritePipeline, TranspilePipeline};
use aqec_ir::{CircuitModel, Gate, NoiseProfile, QubitId};

/// Pipeline stub that is deliberately slow, to widen the race window.
struct SlowPipeline {
    calls: AtomicUsize,
}

impl SlowPipeline {
    fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
        }
    }
}

impl RewritePipeline for SlowPipeline {
    fn optimize(
        &self,
        circuit: &CircuitModel,
        _noise: Option<&NoiseProfile>,
    ) -> CompileResult<CircuitModel> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        thread::sleep(Duration::from_millis(50));
        Ok(circuit.clone())
    }
}

fn bell_circuit() -> CircuitModel {
    CircuitModel::entangled_prep(2).unwrap()
}

#[test]
fn test_concurrent_requests_compute_once() {
    let pipeline = Arc::new(SlowPipeline::new());
    let cache = Arc::new(OptimizationCache::new(
        pipeline.clone() as Arc<dyn RewritePipeline>
    ));
    let circuit = bell_circuit();

    let threads = 8;
    let barrier = Arc::new(Barrier::new(threads));
    let handles: Vec<_> = (0..threads)
        .map(|_| {
            let cache = Arc::clone(&cache);
            let barrier = Arc::clone(&barrier);
            let circuit = circuit.clone();
            thread::spawn(move || {
                barrier.wait();
                cache.optimize(&circuit).unwrap()
            })
        })
        .collect();

    let results: Vec<CircuitModel> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    assert_eq!(pipeline.calls.load(Ordering::SeqCst), 1);
    for r in &results {
        assert!(r.structurally_equal(&results[0]));
    }

    let stats = cache.stats();
    assert_eq!(stats.hits + stats.misses, threads as u64);
    assert_eq!(stats.misses, threads as u64 - stats.hits);
}

#[test]
fn test_concurrent_distinct_circuits_compute_independently() {
    let pipeline = Arc::new(SlowPipeline::new());
    let cache = Arc::new(OptimizationCache::new(
        pipeline.clone() as Arc<dyn RewritePipeline>
    ));

    let circuits: Vec<CircuitModel> = [Gate::X, Gate::Z, Gate::H]
        .into_iter()
        .map(|g| {
            CircuitModel::new(1)
                .unwrap()
                .with_gate(g, [QubitId(0)])
                .unwrap()
        })
        .collect();

    let barrier = Arc::new(Barrier::new(circuits.len()));
    let handles: Vec<_> = circuits
        .iter()
        .cloned()
        .map(|circuit| {
            let cache = Arc::clone(&cache);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                cache.optimize(&circuit).unwrap()
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    assert_eq!(pipeline.calls.load(Ordering::SeqCst), 3);
    assert_eq!(cache.len(), 3);
}

#[test]
fn test_concurrent_real_pipeline_is_consistent() {
    let cache = Arc::new(OptimizationCache::new(
        Arc::new(TranspilePipeline::standard()) as Arc<dyn RewritePipeline>,
    ));
    // h h x x collapses to nothing.
    let circuit = CircuitModel::new(1)
        .unwrap()
        .with_gate(Gate::H, [QubitId(0)])
        .unwrap()
        .with_gate(Gate::H, [QubitId(0)])
        .unwrap()
        .with_gate(Gate::X, [QubitId(0)])
        .unwrap()
        .with_gate(Gate::X, [QubitId(0)])
        .unwrap();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let cache = Arc::clone(&cache);
            let circuit = circuit.clone();
            thread::spawn(move || cache.optimize(&circuit).unwrap())
        })
        .collect();

    for h in handles {
        assert!(h.join().unwrap().ops().is_empty());
    }
}
