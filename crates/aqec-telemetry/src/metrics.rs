//! Prometheus metrics with lazy registration.
//!
//! Metric names follow the convention `aqec_<subsystem>_<metric>_<unit>`,
//! e.g. `aqec_env_steps_total` or `aqec_compile_duration_seconds`.

use std::time::Instant;

use parking_lot::Mutex;
use prometheus::{
    Counter, CounterVec, Encoder, Gauge, GaugeVec, Histogram, HistogramOpts, Opts, Registry,
    TextEncoder,
};
use rustc_hash::FxHashMap;

use crate::error::{TelemetryError, TelemetryResult};

/// An instance-owned metrics registry.
///
/// Metrics are created and registered on first use, so callers never declare
/// them up front. Each collector owns its own [`Registry`]; nothing is
/// process-global, which keeps tests and multiple environments isolated.
pub struct MetricsCollector {
    registry: Registry,
    counters: Mutex<FxHashMap<String, Counter>>,
    gauges: Mutex<FxHashMap<String, Gauge>>,
    histograms: Mutex<FxHashMap<String, Histogram>>,
    counter_vecs: Mutex<FxHashMap<String, CounterVec>>,
    gauge_vecs: Mutex<FxHashMap<String, GaugeVec>>,
}

impl MetricsCollector {
    /// Create an empty collector.
    pub fn new() -> Self {
        Self {
            registry: Registry::new(),
            counters: Mutex::new(FxHashMap::default()),
            gauges: Mutex::new(FxHashMap::default()),
            histograms: Mutex::new(FxHashMap::default()),
            counter_vecs: Mutex::new(FxHashMap::default()),
            gauge_vecs: Mutex::new(FxHashMap::default()),
        }
    }

    /// Increment a counter by 1, registering it on first use.
    pub fn increment(&self, name: &str) -> TelemetryResult<()> {
        self.increment_by(name, 1.0)
    }

    /// Increment a counter by an arbitrary non-negative amount.
    pub fn increment_by(&self, name: &str, value: f64) -> TelemetryResult<()> {
        let mut counters = self.counters.lock();
        if let Some(counter) = counters.get(name) {
            counter.inc_by(value);
            return Ok(());
        }
        let counter = Counter::new(name.to_string(), format!("counter '{name}'"))
            .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
        self.register(name, counter.clone(), "counter")?;
        counter.inc_by(value);
        counters.insert(name.to_string(), counter);
        Ok(())
    }

    /// Set a gauge, registering it on first use.
    pub fn set_gauge(&self, name: &str, value: f64) -> TelemetryResult<()> {
        let mut gauges = self.gauges.lock();
        if let Some(gauge) = gauges.get(name) {
            gauge.set(value);
            return Ok(());
        }
        let gauge = Gauge::new(name.to_string(), format!("gauge '{name}'"))
            .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
        self.register(name, gauge.clone(), "gauge")?;
        gauge.set(value);
        gauges.insert(name.to_string(), gauge);
        Ok(())
    }

    /// Increment a labeled counter by 1. The label names are fixed by the
    /// first call for a given metric; later calls supply matching values.
    pub fn increment_with_labels(
        &self,
        name: &str,
        labels: &[(&str, &str)],
    ) -> TelemetryResult<()> {
        let names: Vec<&str> = labels.iter().map(|(k, _)| *k).collect();
        let values: Vec<&str> = labels.iter().map(|(_, v)| *v).collect();

        let mut vecs = self.counter_vecs.lock();
        let vec = match vecs.get(name) {
            Some(vec) => vec.clone(),
            None => {
                let vec =
                    CounterVec::new(Opts::new(name.to_string(), format!("counter '{name}'")), &names)
                        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
                self.register(name, vec.clone(), "counter")?;
                vecs.insert(name.to_string(), vec.clone());
                vec
            }
        };
        vec.get_metric_with_label_values(&values)
            .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?
            .inc();
        Ok(())
    }

    /// Set a labeled gauge, with the same label-name rules as
    /// [`increment_with_labels`](Self::increment_with_labels).
    pub fn set_gauge_with_labels(
        &self,
        name: &str,
        labels: &[(&str, &str)],
        value: f64,
    ) -> TelemetryResult<()> {
        let names: Vec<&str> = labels.iter().map(|(k, _)| *k).collect();
        let values: Vec<&str> = labels.iter().map(|(_, v)| *v).collect();

        let mut vecs = self.gauge_vecs.lock();
        let vec = match vecs.get(name) {
            Some(vec) => vec.clone(),
            None => {
                let vec =
                    GaugeVec::new(Opts::new(name.to_string(), format!("gauge '{name}'")), &names)
                        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
                self.register(name, vec.clone(), "gauge")?;
                vecs.insert(name.to_string(), vec.clone());
                vec
            }
        };
        vec.get_metric_with_label_values(&values)
            .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?
            .set(value);
        Ok(())
    }

    /// Record a histogram observation, registering the histogram on first
    /// use with exponential buckets suited to sub-second durations.
    pub fn observe(&self, name: &str, value: f64) -> TelemetryResult<()> {
        let histogram = self.histogram(name)?;
        histogram.observe(value);
        Ok(())
    }

    /// Start a timer whose elapsed seconds are observed into `name` when the
    /// returned guard drops.
    pub fn scoped_timer(&self, name: &str) -> TelemetryResult<ScopedTimer> {
        Ok(ScopedTimer {
            histogram: self.histogram(name)?,
            start: Instant::now(),
        })
    }

    fn histogram(&self, name: &str) -> TelemetryResult<Histogram> {
        let mut histograms = self.histograms.lock();
        if let Some(histogram) = histograms.get(name) {
            return Ok(histogram.clone());
        }
        let buckets = prometheus::exponential_buckets(0.0001, 2.0, 15)
            .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
        let histogram = Histogram::with_opts(
            HistogramOpts::new(name.to_string(), format!("histogram '{name}'")).buckets(buckets),
        )
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
        self.register(name, histogram.clone(), "histogram")?;
        histograms.insert(name.to_string(), histogram.clone());
        Ok(histogram)
    }

    fn register<C>(&self, name: &str, collector: C, kind: &'static str) -> TelemetryResult<()>
    where
        C: prometheus::core::Collector + 'static,
    {
        self.registry.register(Box::new(collector)).map_err(|e| {
            if matches!(e, prometheus::Error::AlreadyReg) {
                TelemetryError::MetricTypeConflict {
                    name: name.to_string(),
                    existing: kind,
                }
            } else {
                TelemetryError::MetricsInit(e.to_string())
            }
        })
    }

    /// Encode all metrics in Prometheus text exposition format.
    pub fn encode(&self) -> TelemetryResult<String> {
        let encoder = TextEncoder::new();
        let families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder
            .encode(&families, &mut buffer)
            .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
        String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
    }

    /// Current value of a counter, if registered.
    pub fn counter_value(&self, name: &str) -> Option<f64> {
        self.counters.lock().get(name).map(Counter::get)
    }

    /// Current value of a gauge, if registered.
    pub fn gauge_value(&self, name: &str) -> Option<f64> {
        self.gauges.lock().get(name).map(Gauge::get)
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}

/// Timer guard for automatic histogram observation.
pub struct ScopedTimer {
    histogram: Histogram,
    start: Instant,
}

impl Drop for ScopedTimer {
    fn drop(&mut self) {
        self.histogram.observe(self.start.elapsed().as_secs_f64());
    }
}
