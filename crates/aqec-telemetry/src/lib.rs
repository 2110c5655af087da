//! Telemetry for the adaptive error-correction loop.
//!
//! Three concerns, one handle:
//!
//! - [`MetricsCollector`]: Prometheus counters, gauges and histograms with
//!   lazy registration and text-format encoding.
//! - [`ErrorTracker`]: categorized error events with timestamps and rate
//!   statistics.
//! - [`PerformanceMonitor`]: sliding-window summaries (mean, variance,
//!   trend) with advisory alert thresholds.
//!
//! [`Telemetry`] bundles all three for handing to an environment.

#![warn(missing_docs)]

pub mod error;
pub mod metrics;
pub mod perf;
pub mod tracker;

pub use error::{TelemetryError, TelemetryResult};
pub use metrics::{MetricsCollector, ScopedTimer};
pub use perf::{Alert, AlertThresholds, MetricSummary, PerformanceMonitor};
pub use tracker::{ErrorEvent, ErrorStatistics, ErrorTracker};

use tracing_subscriber::EnvFilter;

/// All telemetry concerns bundled for one consumer.
#[derive(Default)]
pub struct Telemetry {
    /// Prometheus metrics.
    pub metrics: MetricsCollector,
    /// Error accounting.
    pub errors: ErrorTracker,
    /// Sliding-window performance summaries.
    pub performance: PerformanceMonitor,
}

impl Telemetry {
    /// Create a telemetry bundle with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a bundle with explicit performance thresholds.
    pub fn with_thresholds(thresholds: AlertThresholds) -> Self {
        Self {
            metrics: MetricsCollector::new(),
            errors: ErrorTracker::new(),
            performance: PerformanceMonitor::with_thresholds(thresholds),
        }
    }
}

/// Install the global tracing subscriber.
///
/// The filter comes from `RUST_LOG` when set, falling back to
/// `default_directive`. Safe to call once per process; a second call
/// reports an error instead of panicking.
pub fn init_tracing(default_directive: &str) -> TelemetryResult<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|e| TelemetryError::TracingInit(e.to_string()))
}
