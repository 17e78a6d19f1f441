//! Deductive fault simulation: per-net fault lists computed alongside the
//! fault-free value, in a single forward pass.

use std::collections::BTreeSet;

use fxhash::FxHashMap;

use crate::circuit::{Circuit, Gate, NetId};
use crate::error::InvalidVectorError;
use crate::fault::Fault;
use crate::logic::Logic;

use super::BaseSim;

/// Deductive fault-list propagator.
///
/// For a single input pattern, `fault_lists[n]` is the set of single
/// stuck-at faults whose presence would change net `n`'s value from its
/// fault-free value. Implements the textbook deductive-simulation law:
/// for a gate with controlling inputs `Ic` and non-controlling inputs
/// `Inc`, the propagated fault list is `(⋂ fault_list(Ic)) \ (⋃
/// fault_list(Inc))` when `Ic` is non-empty, or `⋃ fault_list(I)`
/// otherwise — which degenerates correctly for Inv/Buf, which have no
/// controlling value.
pub struct FaultSimulation<'a> {
    sim: BaseSim<'a>,
    fault_lists: FxHashMap<NetId, BTreeSet<Fault>>,
}

impl<'a> FaultSimulation<'a> {
    /// Build a deductive fault simulator over `circuit`.
    pub fn new(circuit: &'a Circuit) -> FaultSimulation<'a> {
        FaultSimulation {
            sim: BaseSim::new(circuit),
            fault_lists: FxHashMap::default(),
        }
    }

    fn fault_list(&self, net: &NetId) -> &BTreeSet<Fault> {
        static EMPTY: std::sync::OnceLock<BTreeSet<Fault>> = std::sync::OnceLock::new();
        self.fault_lists
            .get(net)
            .unwrap_or_else(|| EMPTY.get_or_init(BTreeSet::new))
    }

    fn process_gate(&self, gate: &Gate) -> (Logic, BTreeSet<Fault>) {
        let control = gate.control_value();
        let input_states: Vec<Logic> = gate.inputs.iter().map(|n| self.sim.state(n)).collect();

        let (controlling, non_controlling): (Vec<(&NetId, &Logic)>, Vec<(&NetId, &Logic)>) = gate
            .inputs
            .iter()
            .zip(&input_states)
            .partition(|(_, &v)| Some(v) == control);
        let controlling: Vec<&NetId> = controlling.into_iter().map(|(n, _)| n).collect();
        let non_controlling: Vec<&NetId> = non_controlling.into_iter().map(|(n, _)| n).collect();

        let mut propagated: BTreeSet<Fault> = non_controlling
            .iter()
            .flat_map(|n| self.fault_list(n).iter().cloned())
            .collect();
        if !controlling.is_empty() {
            let mut intersection = self.fault_list(controlling[0]).clone();
            for n in &controlling[1..] {
                intersection = intersection
                    .intersection(self.fault_list(n))
                    .cloned()
                    .collect();
            }
            propagated = intersection.difference(&propagated).cloned().collect();
        }

        let output_state = gate.evaluate(&input_states);
        if output_state.is_binary() {
            propagated.insert(Fault::new(gate.output.clone(), output_state.complement_bit()));
        }
        (output_state, propagated)
    }

    /// Compute the set of faults detected by `test_vector`.
    ///
    /// The alphabet is `{0,1,X}` (unlike fault-free simulation, `X` is
    /// accepted here). Returns the union of the output nets' fault lists,
    /// then resets.
    pub fn detect_faults(&mut self, test_vector: &str) -> Result<BTreeSet<Fault>, InvalidVectorError> {
        let chars: Vec<char> = test_vector.chars().collect();
        if chars.len() != self.sim.circuit.inputs.len() {
            return Err(InvalidVectorError::WrongLength {
                expected: self.sim.circuit.inputs.len(),
                got: chars.len(),
            });
        }
        let mut vector = Vec::with_capacity(chars.len());
        for (position, &c) in chars.iter().enumerate() {
            let logic = Logic::try_from(c).map_err(|char| InvalidVectorError::InvalidChar {
                char,
                position,
                alphabet: "0, 1, X",
            })?;
            vector.push(logic);
        }

        let inputs = self.sim.circuit.inputs.clone();
        for (net, &value) in inputs.iter().zip(&vector) {
            self.sim.set_state(net.clone(), value);
            let seed = if value.is_binary() {
                BTreeSet::from([Fault::new(net.clone(), value.complement_bit())])
            } else {
                BTreeSet::new()
            };
            self.fault_lists.insert(net.clone(), seed);
        }

        self.run_implications();

        let outputs = self.sim.circuit.outputs.clone();
        let detected: BTreeSet<Fault> = outputs
            .iter()
            .flat_map(|n| self.fault_list(n).iter().cloned())
            .collect();
        self.reset();
        Ok(detected)
    }

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
            for gate in &ready {
                let (value, faults) = self.process_gate(gate);
                self.sim.set_state(gate.output.clone(), value);
                self.fault_lists.insert(gate.output.clone(), faults);
            }
            remaining = next_remaining;
        }
    }

    /// Empty both the value state and the fault-list map.
    pub fn reset(&mut self) {
        self.sim.reset();
        self.fault_lists.clear();
    }
}
