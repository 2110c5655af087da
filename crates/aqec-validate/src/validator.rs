//! Rule runner and report.

use aqec_ir::{CircuitModel, NoiseProfile};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::rule::{RuleResult, RuleStatus, ValidationRule};
use crate::rules::{DepthRule, ErrorRateRule, GateSetRule, QubitCountRule};

/// Aggregated verdicts from one validation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    /// One result per configured rule, in rule order.
    pub results: Vec<RuleResult>,
}

impl ValidationReport {
    /// Whether the circuit is acceptable: no rule failed or errored.
    /// Unsupported rules do not count against the circuit.
    pub fn is_valid(&self) -> bool {
        self.results
            .iter()
            .all(|r| matches!(r.status, RuleStatus::Passed | RuleStatus::Unsupported))
    }

    /// Results with a given status.
    pub fn with_status(&self, status: RuleStatus) -> impl Iterator<Item = &RuleResult> {
        self.results.iter().filter(move |r| r.status == status)
    }

    /// Names of failed rules.
    pub fn failures(&self) -> Vec<&str> {
        self.with_status(RuleStatus::Failed)
            .map(|r| r.rule.as_str())
            .collect()
    }
}

/// Runs a fixed set of [`ValidationRule`]s against circuits.
///
/// Rules are isolated from each other: a rule that returns an error is
/// recorded as `Errored` and the remaining rules still run.
pub struct CircuitValidator {
    rules: Vec<Box<dyn ValidationRule>>,
}

impl CircuitValidator {
    /// Create a validator with no rules.
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// The default rule set: depth 100, width 50, the simulator gate set,
    /// and a 50% aggregate error bound.
    pub fn standard() -> Self {
        Self::new()
            .with_rule(Box::new(DepthRule::new(100)))
            .with_rule(Box::new(QubitCountRule::new(50)))
            .with_rule(Box::new(GateSetRule::new([
                "id", "x", "y", "z", "h", "s", "sdg", "t", "tdg", "rx", "ry", "rz", "p", "cx",
                "cz", "swap",
            ])))
            .with_rule(Box::new(ErrorRateRule::new(0.5)))
    }

    /// Append a rule.
    #[must_use]
    pub fn with_rule(mut self, rule: Box<dyn ValidationRule>) -> Self {
        self.rules.push(rule);
        self
    }

    /// Number of configured rules.
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Check a circuit against every rule.
    #[instrument(skip_all, fields(qubits = circuit.qubit_count(), ops = circuit.ops().len()))]
    pub fn validate(
        &self,
        circuit: &CircuitModel,
        noise: Option<&NoiseProfile>,
    ) -> ValidationReport {
        let results = self
            .rules
            .iter()
            .map(|rule| match rule.check(circuit, noise) {
                Ok(result) => result,
                Err(e) => {
                    warn!(rule = rule.name(), error = %e, "validation rule errored");
                    RuleResult {
                        rule: rule.name().to_string(),
                        status: RuleStatus::Errored,
                        message: Some(e.to_string()),
                        detail: serde_json::Map::new(),
                    }
                }
            })
            .collect::<Vec<_>>();

        let report = ValidationReport { results };
        debug!(
            valid = report.is_valid(),
            failures = ?report.failures(),
            "circuit validated"
        );
        report
    }
}

impl Default for CircuitValidator {
    fn default() -> Self {
        Self::standard()
    }
}
