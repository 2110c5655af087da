//! Error types for the compile crate.

use thiserror::Error;

/// Errors that can occur during circuit rewriting.
///
/// Clone-able on purpose: the optimization cache shares one computation's
/// outcome with every concurrent waiter.
#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum CompileError {
    /// A rewrite pass failed.
    #[error("Pass '{pass}' failed: {reason}")]
    PassFailed {
        /// Name of the failing pass.
        pass: String,
        /// Failure description.
        reason: String,
    },

    /// The rewritten op sequence no longer forms a valid circuit.
    #[error("Rewrite produced an invalid circuit: {0}")]
    InvalidRewrite(String),

    /// Two structurally different circuits mapped to the same cache key.
    ///
    /// Never propagated out of the cache — logged and handled as a miss.
    #[error("Cache key {key:#018x} collided with a different circuit")]
    CacheConsistency {
        /// The colliding key.
        key: u64,
    },
}

/// Result type for compile operations.
pub type CompileResult<T> = Result<T, CompileError>;
