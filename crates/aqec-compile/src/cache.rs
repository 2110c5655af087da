//! Memoization for circuit rewriting.

use std::hash::Hasher;
use std::sync::Arc;

use aqec_ir::{CircuitModel, NoiseProfile};
use parking_lot::{Condvar, Mutex};
use rustc_hash::{FxHashMap, FxHasher};
use tracing::{debug, warn};

use crate::error::{CompileError, CompileResult};
use crate::pipeline::RewritePipeline;

/// Default number of cached rewrites.
pub const DEFAULT_CACHE_CAPACITY: usize = 128;

/// Counters describing cache behavior since construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups answered from the cache.
    pub hits: u64,
    /// Lookups that required running the pipeline.
    pub misses: u64,
    /// Lookups whose key matched a structurally different circuit.
    pub collisions: u64,
    /// Entries dropped to stay within capacity.
    pub evictions: u64,
}

struct Entry {
    source: CircuitModel,
    optimized: CircuitModel,
    last_used: u64,
}

struct Inner {
    entries: FxHashMap<u64, Entry>,
    tick: u64,
    stats: CacheStats,
}

/// A computation in progress. The first thread to claim a key computes; the
/// rest block on `ready` until the slot is filled, then share the outcome.
struct Inflight {
    slot: Mutex<Option<(CircuitModel, CompileResult<CircuitModel>)>>,
    ready: Condvar,
}

enum Probe {
    Hit(CircuitModel),
    Collision,
    Miss,
}

/// A bounded, thread-safe memo table in front of a [`RewritePipeline`].
///
/// Guarantees at-most-once computation per key: when several threads request
/// the same uncached circuit concurrently, exactly one runs the pipeline and
/// the others wait for its result. Eviction is least-recently-used.
///
/// Keys are the circuit's canonical hash, mixed with the noise profile's
/// fingerprint when one is supplied, so the same circuit optimized under
/// different profiles occupies distinct slots. A key matching a structurally
/// different circuit is detected, logged, and served by an uncached
/// computation rather than a wrong answer.
pub struct OptimizationCache {
    pipeline: Arc<dyn RewritePipeline>,
    capacity: usize,
    inner: Mutex<Inner>,
    inflight: Mutex<FxHashMap<u64, Arc<Inflight>>>,
}

impl OptimizationCache {
    /// Create a cache with the default capacity.
    pub fn new(pipeline: Arc<dyn RewritePipeline>) -> Self {
        Self::with_capacity(pipeline, DEFAULT_CACHE_CAPACITY)
    }

    /// Create a cache bounded to `capacity` entries. A zero capacity is
    /// clamped to one.
    pub fn with_capacity(pipeline: Arc<dyn RewritePipeline>, capacity: usize) -> Self {
        Self {
            pipeline,
            capacity: capacity.max(1),
            inner: Mutex::new(Inner {
                entries: FxHashMap::default(),
                tick: 0,
                stats: CacheStats::default(),
            }),
            inflight: Mutex::new(FxHashMap::default()),
        }
    }

    /// Optimize a circuit, memoized.
    pub fn optimize(&self, circuit: &CircuitModel) -> CompileResult<CircuitModel> {
        self.lookup(circuit, None)
    }

    /// Optimize a circuit under a noise profile, memoized per profile.
    pub fn optimize_with_noise(
        &self,
        circuit: &CircuitModel,
        noise: &NoiseProfile,
    ) -> CompileResult<CircuitModel> {
        self.lookup(circuit, Some(noise))
    }

    /// Current counters.
    pub fn stats(&self) -> CacheStats {
        self.inner.lock().stats
    }

    /// Number of resident entries.
    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maximum number of resident entries.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drop all cached entries. Counters are kept.
    pub fn clear(&self) {
        self.inner.lock().entries.clear();
    }

    fn cache_key(circuit: &CircuitModel, noise: Option<&NoiseProfile>) -> u64 {
        match noise {
            None => circuit.canonical_hash(),
            Some(profile) => {
                let mut hasher = FxHasher::default();
                hasher.write_u64(circuit.canonical_hash());
                hasher.write_u64(profile.fingerprint());
                hasher.finish()
            }
        }
    }

    fn probe(&self, key: u64, circuit: &CircuitModel) -> Probe {
        let mut inner = self.inner.lock();
        inner.tick += 1;
        let tick = inner.tick;
        match inner.entries.get_mut(&key) {
            Some(entry) if entry.source.structurally_equal(circuit) => {
                entry.last_used = tick;
                let optimized = entry.optimized.clone();
                inner.stats.hits += 1;
                Probe::Hit(optimized)
            }
            Some(_) => {
                inner.stats.collisions += 1;
                Probe::Collision
            }
            None => {
                inner.stats.misses += 1;
                Probe::Miss
            }
        }
    }

    /// Re-probe after claiming a key. The initial probe already counted the
    /// miss, so this one leaves the stats alone.
    fn recheck(&self, key: u64, circuit: &CircuitModel) -> Probe {
        let mut inner = self.inner.lock();
        inner.tick += 1;
        let tick = inner.tick;
        match inner.entries.get_mut(&key) {
            Some(entry) if entry.source.structurally_equal(circuit) => {
                entry.last_used = tick;
                Probe::Hit(entry.optimized.clone())
            }
            Some(_) => Probe::Collision,
            None => Probe::Miss,
        }
    }

    fn insert(&self, key: u64, source: CircuitModel, optimized: CircuitModel) {
        let mut inner = self.inner.lock();
        inner.tick += 1;
        let tick = inner.tick;
        inner.entries.insert(
            key,
            Entry {
                source,
                optimized,
                last_used: tick,
            },
        );
        while inner.entries.len() > self.capacity {
            let Some(oldest) = inner
                .entries
                .iter()
                .min_by_key(|(_, e)| e.last_used)
                .map(|(k, _)| *k)
            else {
                break;
            };
            inner.entries.remove(&oldest);
            inner.stats.evictions += 1;
            debug!(key = format_args!("{oldest:#018x}"), "evicted cache entry");
        }
    }

    fn lookup(
        &self,
        circuit: &CircuitModel,
        noise: Option<&NoiseProfile>,
    ) -> CompileResult<CircuitModel> {
        let key = Self::cache_key(circuit, noise);

        match self.probe(key, circuit) {
            Probe::Hit(optimized) => return Ok(optimized),
            Probe::Collision => {
                // A different circuit owns this slot. Serving it would be
                // wrong, displacing it would thrash; compute uncached.
                warn!(
                    error = %CompileError::CacheConsistency { key },
                    "bypassing cache"
                );
                return self.pipeline.optimize(circuit, noise);
            }
            Probe::Miss => {}
        }

        // Claim the key or join an in-progress computation.
        let (flight, claimed) = {
            let mut inflight = self.inflight.lock();
            match inflight.get(&key) {
                Some(flight) => (Arc::clone(flight), false),
                None => {
                    let flight = Arc::new(Inflight {
                        slot: Mutex::new(None),
                        ready: Condvar::new(),
                    });
                    inflight.insert(key, Arc::clone(&flight));
                    (flight, true)
                }
            }
        };

        if claimed {
            self.compute_and_publish(key, circuit, noise, &flight)
        } else {
            self.await_result(key, circuit, noise, &flight)
        }
    }

    /// Claimer path: run the pipeline once, cache on success, and hand the
    /// outcome to every joined waiter.
    fn compute_and_publish(
        &self,
        key: u64,
        circuit: &CircuitModel,
        noise: Option<&NoiseProfile>,
        flight: &Inflight,
    ) -> CompileResult<CircuitModel> {
        // A previous claimer may have filled the cache between our probe and
        // our claim.
        let result = match self.recheck(key, circuit) {
            Probe::Hit(optimized) => Ok(optimized),
            Probe::Collision => self.pipeline.optimize(circuit, noise),
            Probe::Miss => {
                let result = self.pipeline.optimize(circuit, noise);
                if let Ok(optimized) = &result {
                    self.insert(key, circuit.clone(), optimized.clone());
                }
                result
            }
        };

        {
            let mut slot = flight.slot.lock();
            *slot = Some((circuit.clone(), result.clone()));
            flight.ready.notify_all();
        }
        self.inflight.lock().remove(&key);
        result
    }

    /// Joiner path: block until the claimer publishes, then share its result
    /// if the claimer was computing the same circuit.
    fn await_result(
        &self,
        key: u64,
        circuit: &CircuitModel,
        noise: Option<&NoiseProfile>,
        flight: &Inflight,
    ) -> CompileResult<CircuitModel> {
        let mut slot = flight.slot.lock();
        let (source, result) = loop {
            if let Some(pair) = slot.as_ref() {
                break pair.clone();
            }
            flight.ready.wait(&mut slot);
        };
        drop(slot);

        if source.structurally_equal(circuit) {
            result
        } else {
            // Joined a flight keyed the same but computing a different
            // circuit. Compute our own, uncached.
            warn!(
                error = %CompileError::CacheConsistency { key },
                "bypassing in-flight result"
            );
            self.pipeline.optimize(circuit, noise)
        }
    }
}

impl std::fmt::Debug for OptimizationCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.lock();
        f.debug_struct("OptimizationCache")
            .field("capacity", &self.capacity)
            .field("len", &inner.entries.len())
            .field("stats", &inner.stats)
            .finish()
    }
}
