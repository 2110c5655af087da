//! AQEC Reference Simulator
//!
//! A local statevector simulator implementing the
//! [`SimulationGateway`](aqec_gateway::SimulationGateway) contract. This is
//! the backend the environment runs against by default; the core crates
//! never depend on it.
//!
//! # Example
//!
//! ```rust
//! use aqec_gateway::SimulationGateway;
//! use aqec_ir::CircuitModel;
//! use aqec_sim::StatevectorSimulator;
//!
//! let sim = StatevectorSimulator::new().with_seed(1);
//! let circuit = CircuitModel::entangled_prep(2).unwrap();
//! let state = sim.execute(&circuit, None).unwrap();
//! assert_eq!(state.num_qubits(), 2);
//! ```

#![warn(missing_docs)]

mod kernel;
mod simulator;

pub use simulator::StatevectorSimulator;
