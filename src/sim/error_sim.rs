//! `ErrorSim`: a `BaseSim` with a target fault that injects `D`/`D̄` as it
//! is activated, used internally by the PODEM test generator.

use fxhash::FxHashSet;

use crate::circuit::{Circuit, Gate, NetId};
use crate::fault::Fault;
use crate::logic::Logic;

use super::BaseSim;

/// 5-valued simulator with one injected stuck-at fault.
///
/// `set_state` is overridden so that writing `High` to the fault's net
/// while the fault is stuck-at-0 becomes `D` (the fault has just been
/// activated), and writing `Low` while stuck-at-1 becomes `D̄`; any other
/// write passes through unchanged.
pub struct ErrorSim<'a> {
    sim: BaseSim<'a>,
    fault: Option<Fault>,
}

impl<'a> ErrorSim<'a> {
    /// Build an `ErrorSim` with no target fault set yet.
    pub fn new(circuit: &'a Circuit) -> ErrorSim<'a> {
        ErrorSim {
            sim: BaseSim::new(circuit),
            fault: None,
        }
    }

    /// Read a single net's value.
    pub fn state(&self, net: &NetId) -> Logic {
        self.sim.state(net)
    }

    /// Write a single net's value, injecting `D`/`D̄` if `net` is the
    /// target fault's net and the write activates it.
    pub fn set_state(&mut self, net: NetId, value: Logic) {
        let injected = self.inject(&net, value);
        self.sim.set_state(net, injected);
    }

    /// Apply the fault's D/D̄ substitution to a value about to be written
    /// to `net`, if `net` is the fault's net and the value activates it.
    ///
    /// Shared by `set_state` (for primary inputs) and `run_implications`
    /// (for internal gate outputs) — the fault site can be either.
    fn inject(&self, net: &NetId, value: Logic) -> Logic {
        match (&self.fault, value) {
            (Some(f), Logic::High) if &f.net_id == net && f.stuck_at == Logic::Low => Logic::D,
            (Some(f), Logic::Low) if &f.net_id == net && f.stuck_at == Logic::High => Logic::Dbar,
            _ => value,
        }
    }

    /// Set the target fault, clear all state, then explicitly assign `X`
    /// to every primary input so a full forward pass can run to
    /// completion.
    pub fn start_state(&mut self, fault: Fault) {
        self.fault = Some(fault);
        self.sim.reset();
        let inputs = self.sim.circuit.inputs.clone();
        for net in inputs {
            self.set_state(net, Logic::X);
        }
    }

    /// The circuit this simulator is over.
    pub fn circuit(&self) -> &Circuit {
        self.sim.circuit
    }

    /// Assign a single primary input, retaining every other input's
    /// previous assignment, and re-run the full forward simulation.
    ///
    /// This is PODEM's incremental-assignment primitive: snapshot all PI
    /// values, reset, restore them, overwrite `pi := value` (with
    /// D-injection), then imply.
    pub fn simulate_input_assignment(&mut self, pi: &NetId, value: Logic) {
        let inputs = self.sim.circuit.inputs.clone();
        debug_assert!(inputs.contains(pi), "{pi} is not a primary input");

        let previous: Vec<Logic> = inputs.iter().map(|n| self.sim.state(n)).collect();
        self.sim.reset();
        for (net, old_value) in inputs.iter().zip(&previous) {
            self.set_state(net.clone(), *old_value);
        }
        self.set_state(pi.clone(), value);

        self.run_implications();
    }

    /// Forward-simulate until quiescent, injecting `D`/`D̄` at the fault's
    /// net the moment it is computed (not just when a primary input is
    /// written) so downstream gates see the faulty value during the same
    /// sweep, matching `FaultSimulation`'s own sweep loop.
    fn run_implications(&mut self) {
        let mut remaining: Vec<Gate> = self.sim.circuit.gates.clone();
        while !remaining.is_empty() {
            let mut next_remaining = Vec::new();
            let mut ready = Vec::new();
            for gate in remaining {
                if gate.inputs.iter().all(|n| self.sim.is_present(n)) {
                    ready.push(gate);
                } else {
                    next_remaining.push(gate);
                }
            }
            if ready.is_empty() && !next_remaining.is_empty() {
                unreachable!("no gate became ready during a sweep: circuit is not a DAG");
            }
            for gate in &ready {
                let inputs: Vec<Logic> = gate.inputs.iter().map(|n| self.sim.state(n)).collect();
                let value = gate.evaluate(&inputs);
                let injected = self.inject(&gate.output, value);
                self.sim.set_state(gate.output.clone(), injected);
            }
            remaining = next_remaining;
        }
    }

    /// Gates whose output is currently `X` but which have at least one
    /// input at `D` or `D̄` — the fringe at which the fault's influence
    /// could next be driven toward an observable output.
    ///
    /// Recomputed by a full scan each call. A gate enters the frontier
    /// when an input transitions to `D`/`D̄` while its output is still `X`,
    /// and leaves it once its output settles; maintaining that
    /// incrementally would save work per decision but isn't attempted here.
    pub fn d_frontier(&self) -> FxHashSet<Gate> {
        self.sim
            .circuit
            .gates
            .iter()
            .filter(|g| {
                self.sim.state(&g.output) == Logic::X
                    && g.inputs
                        .iter()
                        .any(|n| matches!(self.sim.state(n), Logic::D | Logic::Dbar))
            })
            .cloned()
            .collect()
    }

    /// Current values of the circuit's primary inputs, in netlist order.
    pub fn in_values(&self) -> Vec<Logic> {
        self.sim.in_values()
    }

    /// Current values of the circuit's primary outputs, in netlist order.
    pub fn out_values(&self) -> Vec<Logic> {
        self.sim.out_values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::Circuit;

    fn circuit(s: &str) -> Circuit {
        Circuit::load(&s.lines().collect::<Vec<_>>()).unwrap()
    }

    #[test]
    fn test_d_injection() {
        let c = circuit("AND 1 2 3\nINPUT 1 2 -1\nOUTPUT 3 -1");
        let mut sim = ErrorSim::new(&c);
        sim.start_state(Fault::new("1".into(), Logic::Low));
        sim.simulate_input_assignment(&"1".into(), Logic::High);
        assert_eq!(sim.state(&"1".into()), Logic::D);
    }

    #[test]
    fn test_no_injection_when_not_activated() {
        let c = circuit("AND 1 2 3\nINPUT 1 2 -1\nOUTPUT 3 -1");
        let mut sim = ErrorSim::new(&c);
        sim.start_state(Fault::new("1".into(), Logic::Low));
        sim.simulate_input_assignment(&"1".into(), Logic::Low);
        assert_eq!(sim.state(&"1".into()), Logic::Low);
    }

    #[test]
    fn test_d_frontier() {
        let c = circuit("AND 1 2 3\nINPUT 1 2 -1\nOUTPUT 3 -1");
        let mut sim = ErrorSim::new(&c);
        sim.start_state(Fault::new("1".into(), Logic::Low));
        sim.simulate_input_assignment(&"1".into(), Logic::High);
        let frontier = sim.d_frontier();
        assert_eq!(frontier.len(), 1);
        assert_eq!(frontier.iter().next().unwrap().output, NetId::from("3"));
    }
}
