//! Adaptive error-correction control environment.
//!
//! Ties the other crates into an episodic loop: a
//! [`ErrorCorrectionEnvironment`] holds a [`SimulationGateway`] for
//! execution, optionally an optimization cache for circuit rewriting and a
//! telemetry bundle for observability, and exposes the usual
//! `reset`/`step` surface to a controlling agent.
//!
//! [`SimulationGateway`]: aqec_gateway::SimulationGateway

#![warn(missing_docs)]

pub mod config;
pub mod environment;
pub mod error;

pub use config::{CORRECTIVE_GATES, EnvironmentConfig};
pub use environment::{ErrorCorrectionEnvironment, StepOutcome};
pub use error::{EnvError, EnvResult};
