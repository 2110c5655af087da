//! Error event tracking.

use std::collections::{BTreeMap, VecDeque};

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Retained error events; older ones are dropped.
const MAX_HISTORY: usize = 1000;

/// A recorded failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorEvent {
    /// Stable category, e.g. an error variant's kind string.
    pub kind: String,
    /// Free-form description.
    pub message: String,
    /// When the failure was recorded.
    pub timestamp: DateTime<Utc>,
    /// Circuit context at the time of failure, when the caller has it
    /// (depth, qubit count, step index and the like).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
    /// Captured stack or failure trace.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trace: Option<String>,
}

/// A snapshot of error behavior since construction (or the last clear).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorStatistics {
    /// Successes plus errors.
    pub total_events: u64,
    /// Errors only.
    pub error_count: u64,
    /// `error_count / total_events`, zero with no events.
    pub error_rate: f64,
    /// Error counts per kind.
    pub counts_by_kind: BTreeMap<String, u64>,
    /// The kind with the most errors, with its count.
    pub most_common: Option<(String, u64)>,
}

#[derive(Default)]
struct TrackerState {
    history: VecDeque<ErrorEvent>,
    counts: BTreeMap<String, u64>,
    error_count: u64,
    total_events: u64,
}

/// Thread-safe error accounting.
///
/// Both failures and successes are recorded so the error rate has a real
/// denominator; a tracker that only ever sees errors reports a rate of 1.
#[derive(Default)]
pub struct ErrorTracker {
    state: Mutex<TrackerState>,
}

impl ErrorTracker {
    /// Create an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failure under a kind.
    pub fn record_error(&self, kind: impl Into<String>, message: impl Into<String>) {
        self.record_error_with_context(kind, message, None, None);
    }

    /// Record a failure with circuit metadata and an optional trace.
    pub fn record_error_with_context(
        &self,
        kind: impl Into<String>,
        message: impl Into<String>,
        metadata: Option<Map<String, Value>>,
        trace: Option<String>,
    ) {
        let kind = kind.into();
        let mut state = self.state.lock();
        state.total_events += 1;
        state.error_count += 1;
        *state.counts.entry(kind.clone()).or_insert(0) += 1;
        if state.history.len() == MAX_HISTORY {
            state.history.pop_front();
        }
        state.history.push_back(ErrorEvent {
            kind,
            message: message.into(),
            timestamp: Utc::now(),
            metadata,
            trace,
        });
    }

    /// Record a successful event, growing the rate denominator.
    pub fn record_success(&self) {
        self.state.lock().total_events += 1;
    }

    /// Snapshot the current statistics.
    pub fn statistics(&self) -> ErrorStatistics {
        let state = self.state.lock();
        let error_rate = if state.total_events == 0 {
            0.0
        } else {
            state.error_count as f64 / state.total_events as f64
        };
        let most_common = state
            .counts
            .iter()
            .max_by_key(|&(_, &count)| count)
            .map(|(kind, &count)| (kind.clone(), count));
        ErrorStatistics {
            total_events: state.total_events,
            error_count: state.error_count,
            error_rate,
            counts_by_kind: state.counts.clone(),
            most_common,
        }
    }

    /// Recent error events, oldest first.
    pub fn history(&self) -> Vec<ErrorEvent> {
        self.state.lock().history.iter().cloned().collect()
    }

    /// Forget all events and counts.
    pub fn clear_history(&self) {
        *self.state.lock() = TrackerState::default();
    }
}
