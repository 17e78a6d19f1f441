//! PODEM (Path-Oriented Decision Making) automatic test pattern generation.

use fxhash::FxHashMap;

use crate::circuit::{Circuit, Gate, NetId};
use crate::error::InvalidNetError;
use crate::fault::Fault;
use crate::logic::Logic;
use crate::sim::ErrorSim;

/// Recursive backtracking ATPG engine for single stuck-at faults in a
/// combinational circuit.
///
/// Reuses the same `Circuit` and `ErrorSim` primitives as the fault
/// simulator; a single `TestGenerator` can produce tests for many faults.
pub struct TestGenerator<'a> {
    sim: ErrorSim<'a>,
    d_frontier: Vec<Gate>,
    output_to_gate: FxHashMap<NetId, Gate>,
}

impl<'a> TestGenerator<'a> {
    /// Build a test generator over `circuit`.
    pub fn new(circuit: &'a Circuit) -> TestGenerator<'a> {
        let output_to_gate = circuit
            .gates
            .iter()
            .map(|g| (g.output.clone(), g.clone()))
            .collect();
        TestGenerator {
            sim: ErrorSim::new(circuit),
            d_frontier: Vec::new(),
            output_to_gate,
        }
    }

    /// Generate a test vector detecting `fault`, or `None` if it is
    /// undetectable (e.g. redundant due to reconvergent fan-out).
    ///
    /// Returns `InvalidNetError` if `fault` names a net not in the
    /// circuit.
    pub fn generate_test(&mut self, fault: &Fault) -> Result<Option<String>, InvalidNetError> {
        if !self.sim.circuit().nets.contains(&fault.net_id) {
            return Err(InvalidNetError {
                net: fault.net_id.to_string(),
            });
        }

        self.sim.start_state(fault.clone());
        tracing::trace!(%fault, "starting PODEM search");
        let success = self.podem(fault);
        if !success {
            return Ok(None);
        }
        let bits: String = self
            .sim
            .in_values()
            .into_iter()
            .map(|v| match v {
                Logic::D => '1',
                Logic::Dbar => '0',
                other => other
                    .to_string()
                    .chars()
                    .next()
                    .expect("Logic::Display always yields one char"),
            })
            .collect();
        Ok(Some(bits))
    }

    fn podem(&mut self, fault: &Fault) -> bool {
        if self.check_success() {
            return true;
        }
        if self.check_failure(fault) {
            return false;
        }

        let (net, value) = self.objective(fault);
        let (pi, pi_value) = self.backtrace(net, value);

        self.imply(&pi, pi_value);
        if self.podem(fault) {
            return true;
        }

        self.imply(&pi, !pi_value);
        if self.podem(fault) {
            return true;
        }

        self.imply(&pi, Logic::X);
        false
    }

    fn imply(&mut self, pi: &NetId, value: Logic) {
        self.sim.simulate_input_assignment(pi, value);
        self.d_frontier = self.sim.d_frontier().into_iter().collect();
    }

    /// Pick an objective: activate the fault if it hasn't been yet,
    /// otherwise propagate it one more gate toward an output.
    fn objective(&self, fault: &Fault) -> (NetId, Logic) {
        if self.sim.state(&fault.net_id) == Logic::X {
            return (fault.net_id.clone(), !fault.stuck_at);
        }
        let gate = self
            .d_frontier
            .first()
            .expect("objective called with a non-empty d-frontier (checked by check_failure)");
        let control = gate
            .control_value()
            .expect("Inv/Buf have no controlling value and can never enter the d-frontier");
        let net = self.pick_unset_input(gate);
        (net, !control)
    }

    /// Walk backwards from `net` along X-valued wires to a primary input,
    /// XOR-ing each traversed gate's inversion parity into `value`.
    fn backtrace(&self, mut net: NetId, mut value: Logic) -> (NetId, Logic) {
        while let Some(gate) = self.output_to_gate.get(&net) {
            value = value ^ gate.inversion();
            net = self.pick_unset_input(gate);
        }
        debug_assert!(self.sim.circuit().inputs.contains(&net));
        (net, value)
    }

    fn check_success(&self) -> bool {
        self.sim
            .out_values()
            .iter()
            .any(|v| matches!(v, Logic::D | Logic::Dbar))
    }

    fn check_failure(&self, fault: &Fault) -> bool {
        if self.sim.state(&fault.net_id) == fault.stuck_at {
            return true;
        }
        if self.sim.state(&fault.net_id) != Logic::X && self.d_frontier.is_empty() {
            return true;
        }
        false
    }

    fn pick_unset_input(&self, gate: &Gate) -> NetId {
        gate.inputs
            .iter()
            .find(|n| self.sim.state(n) == Logic::X)
            .cloned()
            .expect("gate on the d-frontier or backtrace path must have an X-valued input")
    }
}
