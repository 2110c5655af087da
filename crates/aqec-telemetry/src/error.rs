//! Error types for the telemetry crate.

use thiserror::Error;

/// Telemetry errors.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TelemetryError {
    /// Failed to register or encode Prometheus metrics.
    #[error("Failed to initialize Prometheus metrics: {0}")]
    MetricsInit(String),

    /// A metric name is already registered with a different type.
    #[error("Metric '{name}' already registered as a {existing}")]
    MetricTypeConflict {
        /// The conflicting metric name.
        name: String,
        /// The type it was first registered as.
        existing: &'static str,
    },

    /// Failed to install the tracing subscriber.
    #[error("Failed to initialize tracing: {0}")]
    TracingInit(String),
}

/// Result type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;
