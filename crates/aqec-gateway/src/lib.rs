//! AQEC Simulation Gateway Contract
//!
//! The boundary between the control loop and whatever executes circuits.
//! The core crates depend only on the [`SimulationGateway`] trait; concrete
//! simulators (see `aqec-sim`) live behind it.
//!
//! # Contract
//!
//! ```text
//!   execute(circuit, noise?) ──→ StateVector
//!         (sync, may block)       (or SimulationError)
//! ```
//!
//! - **Blocking**: `execute` runs on the calling thread. The environment's
//!   `step()` blocks while it runs; callers wanting parallelism use one
//!   environment instance per worker. No in-flight cancellation.
//! - **Thread-safe**: `Send + Sync` so one gateway handle can serve many
//!   worker threads.
//! - **Stateless per call**: the same circuit and noise profile must produce
//!   a distribution-equivalent result on every call; gateways hold no
//!   episode state.

#![warn(missing_docs)]

pub mod error;
pub mod state;

pub use error::{SimResult, SimulationError};
pub use state::StateVector;

use aqec_ir::{CircuitModel, NoiseProfile};

/// Trait for circuit-executing backends.
///
/// Implementations simulate (or proxy) execution of a [`CircuitModel`],
/// optionally under a [`NoiseProfile`], and return the resulting state.
pub trait SimulationGateway: Send + Sync {
    /// Get the name of this gateway.
    fn name(&self) -> &str;

    /// Execute a circuit and return the final state.
    ///
    /// `noise` of `None` requests an ideal (noiseless) execution. Failures
    /// surface as [`SimulationError`]; callers must not retry automatically.
    fn execute(&self, circuit: &CircuitModel, noise: Option<&NoiseProfile>)
    -> SimResult<StateVector>;
}
