//! Fault-free simulation: `{0,1}`-only input vectors, bitstring I/O.

use crate::circuit::Circuit;
use crate::error::InvalidVectorError;
use crate::logic::Logic;

use super::BaseSim;

/// Fault-free specialization of [`BaseSim`].
///
/// `simulate_input` accepts only the `{0,1}` alphabet (no `X`, no
/// `D`/`Dbar`) and resets itself after every call, so the same instance
/// can simulate many vectors.
pub struct Simulation<'a> {
    sim: BaseSim<'a>,
}

impl<'a> Simulation<'a> {
    /// Build a fault-free simulator over `circuit`.
    pub fn new(circuit: &'a Circuit) -> Simulation<'a> {
        Simulation {
            sim: BaseSim::new(circuit),
        }
    }

    /// Simulate one fault-free input vector and return the output vector.
    ///
    /// `input_str` must have length `circuit.inputs.len()` and use only
    /// `'0'`/`'1'`. Any output net still `X` after the run is formatted as
    /// `'?'` — that indicates an under-constrained circuit or input, not
    /// an engine error.
    pub fn simulate_input(&mut self, input_str: &str) -> Result<String, InvalidVectorError> {
        let chars: Vec<char> = input_str.chars().collect();
        if chars.len() != self.sim.circuit.inputs.len() {
            return Err(InvalidVectorError::WrongLength {
                expected: self.sim.circuit.inputs.len(),
                got: chars.len(),
            });
        }
        let mut vector = Vec::with_capacity(chars.len());
        for (position, &c) in chars.iter().enumerate() {
            if c != '0' && c != '1' {
                return Err(InvalidVectorError::InvalidChar {
                    char: c,
                    position,
                    alphabet: "0, 1",
                });
            }
            vector.push(Logic::try_from(c).unwrap());
        }

        for (net, value) in self.sim.circuit.inputs.clone().iter().zip(&vector) {
            self.sim.set_state(net.clone(), *value);
        }
        self.sim.make_implications();

        let output = self
            .sim
            .out_values()
            .into_iter()
            .map(|v| if v == Logic::X { '?' } else { v.to_string().chars().next().unwrap() })
            .collect();
        self.sim.reset();
        Ok(output)
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
    fn test_and_gate() {
        let c = circuit("AND 1 2 3\nINPUT 1 2 -1\nOUTPUT 3 -1");
        let mut sim = Simulation::new(&c);
        assert_eq!(sim.simulate_input("11").unwrap(), "1");
        assert_eq!(sim.simulate_input("01").unwrap(), "0");
    }

    #[test]
    fn test_wrong_length() {
        let c = circuit("AND 1 2 3\nINPUT 1 2 -1\nOUTPUT 3 -1");
        let mut sim = Simulation::new(&c);
        assert!(sim.simulate_input("1").is_err());
    }

    #[test]
    fn test_wrong_alphabet() {
        let c = circuit("AND 1 2 3\nINPUT 1 2 -1\nOUTPUT 3 -1");
        let mut sim = Simulation::new(&c);
        assert!(sim.simulate_input("1X").is_err());
    }

    #[test]
    fn test_determinism_and_independence() {
        let c = circuit("AND 1 2 3\nINPUT 1 2 -1\nOUTPUT 3 -1");
        let mut sim1 = Simulation::new(&c);
        let mut sim2 = Simulation::new(&c);
        assert_eq!(sim1.simulate_input("11").unwrap(), sim1.simulate_input("11").unwrap());
        assert_eq!(sim1.simulate_input("10").unwrap(), sim2.simulate_input("10").unwrap());
    }
}
