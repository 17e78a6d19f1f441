//! Combinational stuck-at fault simulation and test pattern generation.
//!
//! Built around a 5-valued logic algebra ([`logic::Logic`]) that carries a
//! fault-free and a faulty value side by side (`D`/`D̄`), three forward
//! simulators built on a shared level-free sweep ([`sim::Simulation`] for
//! fault-free simulation, [`sim::FaultSimulation`] for deductive fault-list
//! propagation, [`sim::ErrorSim`] for PODEM's injected-fault simulation),
//! and [`atpg::TestGenerator`] for automatic test pattern generation.

pub mod atpg;
pub mod circuit;
pub mod error;
pub mod fault;
pub mod logic;
pub mod patterns;
pub mod sim;

pub use atpg::TestGenerator;
pub use circuit::{Circuit, Gate, GateType, NetId};
pub use error::{InvalidFaultError, InvalidNetError, InvalidVectorError, NetlistFormatError};
pub use fault::{str_to_fault, Fault};
pub use logic::Logic;
pub use patterns::random_patterns;
pub use sim::{ErrorSim, FaultSimulation, Simulation};
