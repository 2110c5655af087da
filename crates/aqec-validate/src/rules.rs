//! Built-in validation rules.

use aqec_ir::{CircuitModel, NoiseProfile};

use crate::error::ValidateResult;
use crate::rule::{RuleResult, ValidationRule};

/// Reject circuits deeper than a fixed bound.
pub struct DepthRule {
    max_depth: usize,
}

impl DepthRule {
    /// Create a depth rule with the given bound.
    pub fn new(max_depth: usize) -> Self {
        Self { max_depth }
    }
}

impl ValidationRule for DepthRule {
    fn name(&self) -> &str {
        "depth"
    }

    fn check(
        &self,
        circuit: &CircuitModel,
        _noise: Option<&NoiseProfile>,
    ) -> ValidateResult<RuleResult> {
        let depth = circuit.depth();
        let result = if depth <= self.max_depth {
            RuleResult::passed(self.name())
        } else {
            RuleResult::failed(
                self.name(),
                format!("circuit depth {depth} exceeds maximum {}", self.max_depth),
            )
        };
        Ok(result
            .with_detail("depth", depth)
            .with_detail("max_depth", self.max_depth))
    }
}

/// Reject circuits wider than a fixed qubit budget.
pub struct QubitCountRule {
    max_qubits: u32,
}

impl QubitCountRule {
    /// Create a width rule with the given budget.
    pub fn new(max_qubits: u32) -> Self {
        Self { max_qubits }
    }
}

impl ValidationRule for QubitCountRule {
    fn name(&self) -> &str {
        "qubit_count"
    }

    fn check(
        &self,
        circuit: &CircuitModel,
        _noise: Option<&NoiseProfile>,
    ) -> ValidateResult<RuleResult> {
        let qubits = circuit.qubit_count();
        let result = if qubits <= self.max_qubits {
            RuleResult::passed(self.name())
        } else {
            RuleResult::failed(
                self.name(),
                format!("{qubits} qubits exceeds maximum {}", self.max_qubits),
            )
        };
        Ok(result
            .with_detail("qubit_count", qubits)
            .with_detail("max_qubits", self.max_qubits))
    }
}

/// Require every gate to come from an allowed set.
pub struct GateSetRule {
    allowed: Vec<String>,
}

impl GateSetRule {
    /// Create a gate-set rule from allowed gate names.
    pub fn new(allowed: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            allowed: allowed.into_iter().map(Into::into).collect(),
        }
    }
}

impl ValidationRule for GateSetRule {
    fn name(&self) -> &str {
        "gate_set"
    }

    fn check(
        &self,
        circuit: &CircuitModel,
        _noise: Option<&NoiseProfile>,
    ) -> ValidateResult<RuleResult> {
        let mut offenders: Vec<String> = circuit
            .ops()
            .iter()
            .map(|op| op.name().to_string())
            .filter(|name| !self.allowed.iter().any(|a| a == name))
            .collect();
        offenders.sort();
        offenders.dedup();

        let result = if offenders.is_empty() {
            RuleResult::passed(self.name())
        } else {
            RuleResult::failed(
                self.name(),
                format!("gates outside allowed set: {}", offenders.join(", ")),
            )
            .with_detail("offending_gates", offenders)
        };
        Ok(result)
    }
}

/// Bound the circuit's aggregate error rate under a noise profile.
///
/// The estimate treats gate errors as independent: the circuit succeeds only
/// if every gate does, so the failure probability is `1 - Π(1 - p_g)` over
/// gates with a known error rate. Without a profile the rule is skipped.
pub struct ErrorRateRule {
    max_error_rate: f64,
}

impl ErrorRateRule {
    /// Create an error-rate rule with the given bound.
    pub fn new(max_error_rate: f64) -> Self {
        Self { max_error_rate }
    }

    fn estimate(circuit: &CircuitModel, profile: &NoiseProfile) -> f64 {
        let success: f64 = circuit
            .ops()
            .iter()
            .filter_map(|op| profile.gate_error(op.name()))
            .map(|p| 1.0 - p)
            .product();
        1.0 - success
    }
}

impl ValidationRule for ErrorRateRule {
    fn name(&self) -> &str {
        "error_rate"
    }

    fn check(
        &self,
        circuit: &CircuitModel,
        noise: Option<&NoiseProfile>,
    ) -> ValidateResult<RuleResult> {
        let Some(profile) = noise.filter(|p| !p.is_empty()) else {
            return Ok(RuleResult::unsupported(
                self.name(),
                "no noise profile available",
            ));
        };

        let estimated = Self::estimate(circuit, profile);
        let result = if estimated <= self.max_error_rate {
            RuleResult::passed(self.name())
        } else {
            RuleResult::failed(
                self.name(),
                format!(
                    "estimated error rate {estimated:.6} exceeds maximum {:.6}",
                    self.max_error_rate
                ),
            )
        };
        Ok(result
            .with_detail("estimated_error_rate", estimated)
            .with_detail("max_error_rate", self.max_error_rate))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::RuleStatus;
    use aqec_ir::{Gate, QubitId};

    fn chain(gates: usize) -> CircuitModel {
        let mut circuit = CircuitModel::new(1).unwrap();
        for _ in 0..gates {
            circuit = circuit.with_gate(Gate::X, [QubitId(0)]).unwrap();
        }
        circuit
    }

    #[test]
    fn test_depth_rule_bounds() {
        let rule = DepthRule::new(100);
        let shallow = rule.check(&chain(100), None).unwrap();
        assert_eq!(shallow.status, RuleStatus::Passed);

        let deep = rule.check(&chain(150), None).unwrap();
        assert_eq!(deep.status, RuleStatus::Failed);
        assert_eq!(deep.detail["depth"], 150);
        assert_eq!(deep.detail["max_depth"], 100);
    }

    #[test]
    fn test_qubit_count_rule() {
        let rule = QubitCountRule::new(2);
        let narrow = CircuitModel::new(2).unwrap();
        let wide = CircuitModel::new(3).unwrap();
        assert_eq!(rule.check(&narrow, None).unwrap().status, RuleStatus::Passed);
        assert_eq!(rule.check(&wide, None).unwrap().status, RuleStatus::Failed);
    }

    #[test]
    fn test_gate_set_rule_reports_offenders() {
        let rule = GateSetRule::new(["x", "h", "cx"]);
        let circuit = CircuitModel::new(2)
            .unwrap()
            .with_gate(Gate::H, [QubitId(0)])
            .unwrap()
            .with_gate(Gate::Swap, [QubitId(0), QubitId(1)])
            .unwrap()
            .with_gate(Gate::T, [QubitId(0)])
            .unwrap();

        let result = rule.check(&circuit, None).unwrap();
        assert_eq!(result.status, RuleStatus::Failed);
        assert_eq!(
            result.detail["offending_gates"],
            serde_json::json!(["swap", "t"])
        );
    }

    #[test]
    fn test_error_rate_rule_without_profile_is_unsupported() {
        let rule = ErrorRateRule::new(0.1);
        let result = rule.check(&chain(5), None).unwrap();
        assert_eq!(result.status, RuleStatus::Unsupported);
    }

    #[test]
    fn test_error_rate_estimate() {
        let rule = ErrorRateRule::new(0.05);
        let profile = NoiseProfile::uniform_depolarizing(0.01, &["x"]);

        // 3 gates at p=0.01: 1 - 0.99^3 ≈ 0.0297, under the bound.
        let ok = rule.check(&chain(3), Some(&profile)).unwrap();
        assert_eq!(ok.status, RuleStatus::Passed);

        // 10 gates: 1 - 0.99^10 ≈ 0.0956, over the bound.
        let bad = rule.check(&chain(10), Some(&profile)).unwrap();
        assert_eq!(bad.status, RuleStatus::Failed);
        let estimated = bad.detail["estimated_error_rate"].as_f64().unwrap();
        assert!((estimated - (1.0 - 0.99_f64.powi(10))).abs() < 1e-12);
    }
}
