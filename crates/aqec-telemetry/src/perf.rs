//! Sliding-window performance monitoring.

use std::collections::VecDeque;

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Samples retained per metric window.
const DEFAULT_WINDOW: usize = 1000;

/// Window names the alert thresholds apply to.
const EXECUTION_TIME: &str = "execution_time";
const MEMORY_MB: &str = "memory_mb";
const DEPTH: &str = "depth";

/// Summary statistics over one metric's window.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MetricSummary {
    /// Number of samples in the window.
    pub count: usize,
    /// Arithmetic mean.
    pub mean: f64,
    /// Population variance.
    pub variance: f64,
    /// Least-squares slope over the sample index, positive when the metric
    /// is trending up.
    pub trend_slope: f64,
}

/// Bounds that turn a summary into an alert. Alerts are reported, never
/// enforced; callers decide what to do with them.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AlertThresholds {
    /// Alert when mean execution time (seconds) exceeds this.
    pub max_execution_time: f64,
    /// Alert when mean memory footprint (MB) exceeds this.
    pub max_memory_mb: f64,
    /// Alert when mean circuit depth exceeds this.
    pub max_depth: f64,
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            max_execution_time: 1.0,
            max_memory_mb: 1024.0,
            max_depth: 100.0,
        }
    }
}

/// A raised alert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    /// The metric that tripped the threshold.
    pub metric: String,
    /// What the threshold check observed.
    pub message: String,
}

/// Tracks recent values of named metrics in bounded sliding windows.
///
/// Windows are generic (any name can be recorded); the threshold check in
/// [`alerts`](PerformanceMonitor::alerts) looks at the `execution_time`,
/// `memory_mb` and `depth` windows.
#[derive(Default)]
pub struct PerformanceMonitor {
    windows: Mutex<FxHashMap<String, VecDeque<f64>>>,
    thresholds: AlertThresholds,
}

impl PerformanceMonitor {
    /// Create a monitor with default thresholds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a monitor with explicit thresholds.
    pub fn with_thresholds(thresholds: AlertThresholds) -> Self {
        Self {
            windows: Mutex::new(FxHashMap::default()),
            thresholds,
        }
    }

    /// Record a sample for a metric, evicting the oldest past the window.
    pub fn record(&self, metric: &str, value: f64) {
        let mut windows = self.windows.lock();
        let window = windows.entry(metric.to_string()).or_default();
        if window.len() == DEFAULT_WINDOW {
            window.pop_front();
        }
        window.push_back(value);
    }

    /// Summarize a metric's window, or `None` if nothing was recorded.
    pub fn summary(&self, metric: &str) -> Option<MetricSummary> {
        let windows = self.windows.lock();
        let window = windows.get(metric)?;
        if window.is_empty() {
            return None;
        }

        let n = window.len() as f64;
        let mean = window.iter().sum::<f64>() / n;
        let variance = window.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;

        // Least-squares slope over sample index: with x = 0..n, the slope is
        // Σ(x - x̄)(y - ȳ) / Σ(x - x̄)².
        let x_mean = (n - 1.0) / 2.0;
        let mut num = 0.0;
        let mut den = 0.0;
        for (i, y) in window.iter().enumerate() {
            let dx = i as f64 - x_mean;
            num += dx * (y - mean);
            den += dx * dx;
        }
        let trend_slope = if den == 0.0 { 0.0 } else { num / den };

        Some(MetricSummary {
            count: window.len(),
            mean,
            variance,
            trend_slope,
        })
    }

    /// Evaluate the thresholds against their windows.
    pub fn alerts(&self) -> Vec<Alert> {
        let checks = [
            (EXECUTION_TIME, self.thresholds.max_execution_time),
            (MEMORY_MB, self.thresholds.max_memory_mb),
            (DEPTH, self.thresholds.max_depth),
        ];
        let mut alerts = Vec::new();
        for (metric, threshold) in checks {
            if let Some(summary) = self.summary(metric) {
                if summary.mean > threshold {
                    alerts.push(Alert {
                        metric: metric.to_string(),
                        message: format!(
                            "mean {metric} {:.4} above threshold {threshold:.4}",
                            summary.mean
                        ),
                    });
                }
            }
        }
        alerts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_statistics() {
        let monitor = PerformanceMonitor::new();
        for v in [1.0, 2.0, 3.0, 4.0, 5.0] {
            monitor.record("depth", v);
        }
        let summary = monitor.summary("depth").unwrap();
        assert_eq!(summary.count, 5);
        assert!((summary.mean - 3.0).abs() < 1e-12);
        assert!((summary.variance - 2.0).abs() < 1e-12);
        assert!((summary.trend_slope - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_flat_series_has_zero_slope() {
        let monitor = PerformanceMonitor::new();
        for _ in 0..10 {
            monitor.record("depth", 7.0);
        }
        let summary = monitor.summary("depth").unwrap();
        assert!(summary.trend_slope.abs() < 1e-12);
        assert!(summary.variance.abs() < 1e-12);
    }

    #[test]
    fn test_unknown_metric_is_none() {
        assert!(PerformanceMonitor::new().summary("nothing").is_none());
    }

    #[test]
    fn test_window_is_bounded() {
        let monitor = PerformanceMonitor::new();
        for i in 0..(DEFAULT_WINDOW + 50) {
            monitor.record("depth", i as f64);
        }
        let summary = monitor.summary("depth").unwrap();
        assert_eq!(summary.count, DEFAULT_WINDOW);
        // Oldest 50 samples evicted, so the mean reflects the tail.
        assert!(summary.mean > 50.0);
    }

    #[test]
    fn test_alerts_fire_on_threshold_breach() {
        let monitor = PerformanceMonitor::with_thresholds(AlertThresholds {
            max_execution_time: 0.5,
            max_memory_mb: 100.0,
            max_depth: 50.0,
        });
        monitor.record("execution_time", 2.0);
        monitor.record("depth", 80.0);

        let alerts = monitor.alerts();
        assert_eq!(alerts.len(), 2);
        assert_eq!(alerts[0].metric, "execution_time");
        assert_eq!(alerts[1].metric, "depth");
    }

    #[test]
    fn test_no_alerts_when_healthy() {
        let monitor = PerformanceMonitor::new();
        monitor.record("execution_time", 0.01);
        monitor.record("memory_mb", 64.0);
        monitor.record("depth", 5.0);
        assert!(monitor.alerts().is_empty());
    }

    #[test]
    fn test_trend_detects_degradation() {
        let monitor = PerformanceMonitor::new();
        for i in 0..20 {
            monitor.record("execution_time", 0.01 * i as f64);
        }
        let summary = monitor.summary("execution_time").unwrap();
        assert!(summary.trend_slope > 0.0);
    }
}
