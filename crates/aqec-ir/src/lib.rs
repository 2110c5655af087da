//! AQEC Circuit Model
//!
//! Core data structures for the adaptive error-correction control loop: an
//! immutable, canonicalizable circuit representation plus the noise profiles
//! that parameterize simulated execution.
//!
//! # Overview
//!
//! The model is deliberately a flat, ordered gate sequence rather than a DAG:
//! the control loop appends one corrective gate per step and hashes the exact
//! sequence for cache keys, so order sensitivity is a feature.
//!
//! # Core Components
//!
//! - **Qubits**: [`QubitId`] for addressing qubits
//! - **Gates**: [`Gate`] and [`GateOp`] for gate applications
//! - **Circuit**: [`CircuitModel`] — immutable; every append returns a new
//!   instance with a fresh canonical hash
//! - **Noise**: [`NoiseProfile`] — per-gate error parameters with a stable
//!   fingerprint for cache namespacing
//!
//! # Example
//!
//! ```rust
//! use aqec_ir::{CircuitModel, Gate, QubitId};
//!
//! let bell = CircuitModel::new(2)
//!     .unwrap()
//!     .with_gate(Gate::H, [QubitId(0)])
//!     .unwrap()
//!     .with_gate(Gate::Cx, [QubitId(0), QubitId(1)])
//!     .unwrap();
//!
//! assert_eq!(bell.depth(), 2);
//! assert_eq!(bell.canonical_hash(), bell.clone().canonical_hash());
//! ```

#![warn(missing_docs)]

pub mod circuit;
pub mod error;
pub mod gate;
pub mod noise;

pub use circuit::CircuitModel;
pub use error::{IrError, IrResult};
pub use gate::{Gate, GateOp, QubitId};
pub use noise::NoiseProfile;
