//! Error types for the validate crate.

use thiserror::Error;

/// Errors raised while evaluating a validation rule.
///
/// A rule error never aborts validation: the validator records it as an
/// `Errored` result and moves on to the next rule.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ValidateError {
    /// A rule could not be evaluated.
    #[error("Rule '{rule}' failed to evaluate: {reason}")]
    RuleEvaluation {
        /// Name of the rule.
        rule: String,
        /// What went wrong.
        reason: String,
    },
}

/// Result type for validation operations.
pub type ValidateResult<T> = Result<T, ValidateError>;
