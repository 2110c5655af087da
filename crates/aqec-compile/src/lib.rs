//! Circuit rewriting for the adaptive error-correction loop.
//!
//! The crate provides:
//!
//! - [`RewritePass`]: a single in-place rewrite over a gate sequence, with
//!   the built-in passes under [`passes`].
//! - [`RewritePipeline`] / [`TranspilePipeline`]: the full rewrite chain with
//!   a depth guard and optional noise-aware layout.
//! - [`OptimizationCache`]: a bounded LRU memo table with single-flight
//!   semantics, so concurrent requests for the same circuit run the pipeline
//!   exactly once.

#![warn(missing_docs)]

pub mod cache;
pub mod error;
pub mod pass;
pub mod passes;
pub mod pipeline;

pub use cache::{CacheStats, DEFAULT_CACHE_CAPACITY, OptimizationCache};
pub use error::{CompileError, CompileResult};
pub use pass::RewritePass;
pub use pipeline::{RewritePipeline, TranspilePipeline};
