//! Circuit validation for the adaptive error-correction loop.
//!
//! A [`CircuitValidator`] runs a configurable list of [`ValidationRule`]s
//! against a circuit and collects every verdict into a
//! [`ValidationReport`]. Rules are independent: one failing or erroring rule
//! never suppresses the others, so a report always covers the full rule set.

#![warn(missing_docs)]

pub mod error;
pub mod rule;
pub mod rules;
pub mod validator;

pub use error::{ValidateError, ValidateResult};
pub use rule::{RuleResult, RuleStatus, ValidationRule};
pub use rules::{DepthRule, ErrorRateRule, GateSetRule, QubitCountRule};
pub use validator::{CircuitValidator, ValidationReport};
