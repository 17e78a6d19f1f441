//! Level-free forward simulation under the 5-valued logic algebra.
//!
//! [`BaseSim`] is shared by fault-free simulation, deductive fault
//! simulation and the PODEM engine's `ErrorSim`: each customizes a single
//! hook, [`BaseSim::process_ready_gate`], rather than overriding the
//! sweep loop itself.

mod error_sim;
mod fault_sim;
mod simulation;

pub use error_sim::ErrorSim;
pub use fault_sim::FaultSimulation;
pub use simulation::Simulation;

use fxhash::FxHashMap;

use crate::circuit::{Circuit, Gate};
use crate::logic::Logic;

/// Shared forward-simulation state and sweep algorithm.
///
/// Holds a non-owning reference to the [`Circuit`] and a partial
/// `NetId -> Logic` map; an absent key denotes `X`, which makes "all
/// inputs known" a cheap containment test and makes `reset` O(1).
pub struct BaseSim<'a> {
    pub(crate) circuit: &'a Circuit,
    state: FxHashMap<crate::circuit::NetId, Logic>,
}

impl<'a> BaseSim<'a> {
    /// Build a simulator over `circuit`. The circuit is not copied; it
    /// must outlive the simulator.
    pub fn new(circuit: &'a Circuit) -> BaseSim<'a> {
        BaseSim {
            circuit,
            state: FxHashMap::default(),
        }
    }

    /// Read a single net's value; `X` if unassigned.
    pub fn state(&self, net: &crate::circuit::NetId) -> Logic {
        self.state.get(net).copied().unwrap_or(Logic::X)
    }

    /// Write a single net's value. The base implementation always passes
    /// the value through unchanged; `ErrorSim` shadows this with its own
    /// method of the same name to inject `D`/`D̄`, since Rust has no
    /// virtual dispatch to override an inherent method.
    pub fn set_state(&mut self, net: crate::circuit::NetId, value: Logic) {
        self.state.insert(net, value);
    }

    /// Empty the state map. O(1) relative to circuit size since it only
    /// clears the (typically much smaller) set of nets touched so far,
    /// reusing the allocation.
    pub fn reset(&mut self) {
        self.state.clear();
    }

    /// True if every net in `nets` currently has an assigned (non-`X`)
    /// value.
    fn all_assigned<'b>(&self, nets: impl IntoIterator<Item = &'b crate::circuit::NetId>) -> bool {
        nets.into_iter().all(|n| self.state.contains_key(n))
    }

    /// True if `net` is present in the state map, i.e. has been explicitly
    /// assigned a value (possibly `X`). Unlike [`BaseSim::state`], this
    /// distinguishes "never touched" from "assigned X" — the distinction
    /// [`BaseSim::make_implications`]'s readiness rule depends on.
    pub(crate) fn is_present(&self, net: &crate::circuit::NetId) -> bool {
        self.state.contains_key(net)
    }

    /// Forward-simulate until quiescent: repeatedly evaluate every gate
    /// whose inputs are all known, until none remain. Terminates in at
    /// most `depth(graph)` sweeps since the circuit is a DAG.
    ///
    /// This is the single entry point every specialization drives; the
    /// per-gate behavior lives in `process_ready_gate`.
    pub fn make_implications(&mut self) {
        let mut remaining: Vec<&Gate> = self.circuit.gates.iter().collect();
        let mut sweeps = 0usize;
        while !remaining.is_empty() {
            let (ready, not_ready): (Vec<&Gate>, Vec<&Gate>) = remaining
                .into_iter()
                .partition(|g| self.all_assigned(&g.inputs));
            if ready.is_empty() {
                // The circuit is a DAG (checked at construction time); this
                // can only happen if a caller handed us an inconsistent
                // remaining-gates set, which is a programmer bug.
                unreachable!("no gate became ready during a sweep: circuit is not a DAG");
            }
            for gate in &ready {
                let output = self.process_ready_gate(gate);
                self.set_state(gate.output.clone(), output);
            }
            remaining = not_ready;
            sweeps += 1;
        }
        tracing::trace!(sweeps, "implications settled");
    }

    /// Evaluate one ready gate and return its output value. The default
    /// behavior is a pure evaluation of the 5-valued algebra;
    /// `FaultSimulation` overrides this to also propagate fault lists.
    pub(crate) fn process_ready_gate(&self, gate: &Gate) -> Logic {
        let inputs: Vec<Logic> = gate.inputs.iter().map(|n| self.state(n)).collect();
        gate.evaluate(&inputs)
    }

    /// Current values of the circuit's primary outputs, in netlist order.
    pub fn out_values(&self) -> Vec<Logic> {
        self.circuit.outputs.iter().map(|n| self.state(n)).collect()
    }

    /// Current values of the circuit's primary inputs, in netlist order.
    pub fn in_values(&self) -> Vec<Logic> {
        self.circuit.inputs.iter().map(|n| self.state(n)).collect()
    }
}
