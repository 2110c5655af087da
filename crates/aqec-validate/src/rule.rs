//! Validation rule trait and result types.

use aqec_ir::{CircuitModel, NoiseProfile};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ValidateResult;

/// Outcome category of a single rule check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleStatus {
    /// The circuit satisfies the rule.
    Passed,
    /// The circuit violates the rule.
    Failed,
    /// The rule needs data this check did not have (for example a noise
    /// profile) and was skipped.
    Unsupported,
    /// The rule itself raised an error while evaluating.
    Errored,
}

/// One rule's verdict, with structured details for downstream consumers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleResult {
    /// Name of the rule that produced this result.
    pub rule: String,
    /// The verdict.
    pub status: RuleStatus,
    /// Human-readable explanation, present for everything but a plain pass.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Rule-specific measurements (observed depth, offending gates, ...).
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub detail: Map<String, Value>,
}

impl RuleResult {
    /// A plain pass with no details.
    pub fn passed(rule: impl Into<String>) -> Self {
        Self {
            rule: rule.into(),
            status: RuleStatus::Passed,
            message: None,
            detail: Map::new(),
        }
    }

    /// A failure with an explanation.
    pub fn failed(rule: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            rule: rule.into(),
            status: RuleStatus::Failed,
            message: Some(message.into()),
            detail: Map::new(),
        }
    }

    /// A skip because required inputs were missing.
    pub fn unsupported(rule: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            rule: rule.into(),
            status: RuleStatus::Unsupported,
            message: Some(message.into()),
            detail: Map::new(),
        }
    }

    /// Attach a structured detail entry.
    #[must_use]
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.detail.insert(key.into(), value.into());
        self
    }
}

/// A single check against a circuit.
///
/// Rules must be pure: no rule may depend on another rule's outcome, and a
/// failing or erroring rule never prevents the rest from running.
pub trait ValidationRule: Send + Sync {
    /// Get the name of this rule.
    fn name(&self) -> &str;

    /// Evaluate the rule.
    ///
    /// `noise` is the profile the circuit will run under, when known. Rules
    /// that need it should return an `Unsupported` result without it rather
    /// than guessing.
    fn check(
        &self,
        circuit: &CircuitModel,
        noise: Option<&NoiseProfile>,
    ) -> ValidateResult<RuleResult>;
}
