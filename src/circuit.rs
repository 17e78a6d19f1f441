//! Immutable circuit topology: net identifiers, gate types and the
//! combinational netlist itself.

use std::cmp::Ordering;
use std::fmt;

use fxhash::{FxHashMap, FxHashSet};

use crate::error::NetlistFormatError;
use crate::logic::Logic;

/// Identifier of a wire (net). Opaque and compared by equality; ordered by
/// `(kind, value)` with integers sorting before strings so that fault
/// listings over a mixed int/string circuit have a deterministic order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NetId {
    /// A net token that parsed as a base-10 integer.
    Int(i64),
    /// Any other net token, taken verbatim.
    Sym(String),
}

impl PartialOrd for NetId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for NetId {
    fn cmp(&self, other: &Self) -> Ordering {
        use NetId::*;
        match (self, other) {
            (Int(a), Int(b)) => a.cmp(b),
            (Sym(a), Sym(b)) => a.cmp(b),
            (Int(_), Sym(_)) => Ordering::Less,
            (Sym(_), Int(_)) => Ordering::Greater,
        }
    }
}

impl fmt::Display for NetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetId::Int(v) => write!(f, "{v}"),
            NetId::Sym(s) => write!(f, "{s}"),
        }
    }
}

impl From<&str> for NetId {
    /// Tokens that parse as base-10 integers become `Int`; otherwise `Sym`.
    fn from(token: &str) -> NetId {
        match token.parse::<i64>() {
            Ok(v) => NetId::Int(v),
            Err(_) => NetId::Sym(token.to_string()),
        }
    }
}

/// One of the six supported gate types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GateType {
    /// Inverter
    Inv,
    /// Buffer
    Buf,
    /// 2-input And
    And,
    /// 2-input Or
    Or,
    /// 2-input Nand
    Nand,
    /// 2-input Nor
    Nor,
}

impl GateType {
    /// Exact number of inputs this gate type accepts: 1 for Inv/Buf, 2
    /// otherwise.
    pub fn min_inputs(self) -> usize {
        match self {
            GateType::Inv | GateType::Buf => 1,
            _ => 2,
        }
    }

    /// The controlling value for this gate type, or `None` for Inv/Buf
    /// (which have no controlling value).
    pub fn control_value(self) -> Option<Logic> {
        match self {
            GateType::And | GateType::Nand => Some(Logic::Low),
            GateType::Or | GateType::Nor => Some(Logic::High),
            GateType::Inv | GateType::Buf => None,
        }
    }

    /// Inversion parity: `Logic::Low` (0) for And/Or/Buf, `Logic::High` (1)
    /// for Nand/Nor/Inv. Used by PODEM's backtrace to propagate an
    /// objective value through intermediate gates.
    pub fn inversion(self) -> Logic {
        match self {
            GateType::And | GateType::Or | GateType::Buf => Logic::Low,
            GateType::Nand | GateType::Nor | GateType::Inv => Logic::High,
        }
    }

    /// Parse a netlist keyword into a gate type.
    pub fn from_keyword(s: &str) -> Option<GateType> {
        match s {
            "INV" => Some(GateType::Inv),
            "BUF" => Some(GateType::Buf),
            "AND" => Some(GateType::And),
            "OR" => Some(GateType::Or),
            "NAND" => Some(GateType::Nand),
            "NOR" => Some(GateType::Nor),
            _ => None,
        }
    }
}

impl fmt::Display for GateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            GateType::Inv => "INV",
            GateType::Buf => "BUF",
            GateType::And => "AND",
            GateType::Or => "OR",
            GateType::Nand => "NAND",
            GateType::Nor => "NOR",
        };
        write!(f, "{s}")
    }
}

/// An immutable gate: a type, its ordered input nets, and its output net.
///
/// Two gates are equal iff all three fields are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Gate {
    /// The gate's logic function.
    pub gate_type: GateType,
    /// Ordered input nets, length == `gate_type.min_inputs()`.
    pub inputs: Vec<NetId>,
    /// The single net this gate drives.
    pub output: NetId,
}

impl Gate {
    /// Evaluate this gate's output from its input values, using the
    /// 5-valued algebra of [`Logic`].
    ///
    /// `input_states` must have the same length as `self.inputs`; this is
    /// a precondition checked by the caller's readiness rule, not a
    /// recoverable error.
    pub fn evaluate(&self, input_states: &[Logic]) -> Logic {
        assert_eq!(
            input_states.len(),
            self.inputs.len(),
            "gate {self:?} evaluated with the wrong number of input values"
        );
        match self.gate_type {
            GateType::Inv => !input_states[0],
            GateType::Buf => input_states[0],
            GateType::And => input_states.iter().copied().fold(Logic::High, |a, b| a & b),
            GateType::Or => input_states.iter().copied().fold(Logic::Low, |a, b| a | b),
            GateType::Nand => !input_states.iter().copied().fold(Logic::High, |a, b| a & b),
            GateType::Nor => !input_states.iter().copied().fold(Logic::Low, |a, b| a | b),
        }
    }

    /// The gate type's controlling value.
    pub fn control_value(&self) -> Option<Logic> {
        self.gate_type.control_value()
    }

    /// The gate type's inversion parity.
    pub fn inversion(&self) -> Logic {
        self.gate_type.inversion()
    }
}

/// An immutable combinational circuit: primary inputs and outputs, a set
/// of gates, and the set of all nets appearing in any of them.
///
/// A `Circuit` is built once by [`Circuit::load`] and is read-only
/// thereafter; simulators hold a non-owning reference to it.
#[derive(Debug, Clone)]
pub struct Circuit {
    /// Ordered list of primary-input nets; position fixes the index of
    /// each bit in an input-vector string.
    pub inputs: Vec<NetId>,
    /// Ordered list of primary-output nets.
    pub outputs: Vec<NetId>,
    /// All gates in the circuit.
    pub gates: Vec<Gate>,
    /// Every net id appearing anywhere in the circuit.
    pub nets: FxHashSet<NetId>,
    /// The subset of `nets` driven by some gate.
    pub gate_output_nets: FxHashSet<NetId>,
}

impl Circuit {
    /// Parse a circuit from netlist declaration lines.
    ///
    /// Gate declarations may come in any order; `INPUT`/`OUTPUT` lines may
    /// only name nets already mentioned by some gate, and their *internal*
    /// order fixes input/output-vector positions.
    pub fn load<S: AsRef<str>>(lines: &[S]) -> Result<Circuit, NetlistFormatError> {
        let mut gates: Vec<Gate> = Vec::new();
        let mut nets: FxHashSet<NetId> = FxHashSet::default();
        let mut gate_output_nets: FxHashSet<NetId> = FxHashSet::default();
        let mut output_to_gate: FxHashMap<NetId, usize> = FxHashMap::default();
        let mut inputs: Vec<NetId> = Vec::new();
        let mut outputs: Vec<NetId> = Vec::new();

        for (i, raw) in lines.iter().enumerate() {
            let line_no = i + 1;
            let line = raw.as_ref().trim();
            if line.is_empty() {
                continue;
            }
            let tokens: Vec<&str> = line.split_whitespace().collect();
            let keyword = tokens[0];

            if let Some(gate_type) = GateType::from_keyword(keyword) {
                let nets_on_line = &tokens[1..];
                if nets_on_line.len() != gate_type.min_inputs() + 1 {
                    return Err(NetlistFormatError::new(format!(
                        "gate {gate_type} requires exactly {} input(s) and one output",
                        gate_type.min_inputs()
                    ))
                    .at_line(line_no)
                    .with_token(line.to_string()));
                }
                let (in_tokens, out_token) = nets_on_line.split_at(nets_on_line.len() - 1);
                let output: NetId = out_token[0].into();
                let gate_inputs: Vec<NetId> = in_tokens.iter().map(|&t| t.into()).collect();

                if let Some(&existing) = output_to_gate.get(&output) {
                    return Err(NetlistFormatError::new(format!(
                        "net {output} already driven by gate {:?}",
                        gates[existing].gate_type
                    ))
                    .at_line(line_no)
                    .with_token(output.to_string()));
                }

                nets.insert(output.clone());
                nets.extend(gate_inputs.iter().cloned());
                gate_output_nets.insert(output.clone());
                output_to_gate.insert(output.clone(), gates.len());
                gates.push(Gate {
                    gate_type,
                    inputs: gate_inputs,
                    output,
                });
            } else if keyword == "INPUT" || keyword == "OUTPUT" {
                let rest = &tokens[1..];
                let terminator = rest.last().copied();
                if terminator != Some("-1") {
                    return Err(NetlistFormatError::new(format!(
                        "{keyword} must be terminated with \"-1\""
                    ))
                    .at_line(line_no)
                    .with_token(line.to_string()));
                }
                let named: Vec<NetId> = rest[..rest.len() - 1].iter().map(|&t| t.into()).collect();
                for net in &named {
                    if !nets.contains(net) {
                        return Err(NetlistFormatError::new(format!(
                            "{keyword} names net {net} which no gate mentions"
                        ))
                        .at_line(line_no)
                        .with_token(net.to_string()));
                    }
                }
                if keyword == "INPUT" {
                    for net in &named {
                        if gate_output_nets.contains(net) {
                            return Err(NetlistFormatError::new(format!(
                                "net {net} is both a gate output and a primary input"
                            ))
                            .at_line(line_no)
                            .with_token(net.to_string()));
                        }
                    }
                    inputs.extend(named);
                } else {
                    outputs.extend(named);
                }
            } else {
                return Err(NetlistFormatError::new(format!("unknown keyword {keyword:?}"))
                    .at_line(line_no)
                    .with_token(keyword.to_string()));
            }
        }

        let circuit = Circuit {
            inputs,
            outputs,
            gates,
            nets,
            gate_output_nets,
        };
        tracing::debug!(
            inputs = circuit.inputs.len(),
            outputs = circuit.outputs.len(),
            gates = circuit.gates.len(),
            "circuit loaded"
        );
        Ok(circuit)
    }

    /// The gate driving `net`, or `None` if `net` is a primary input (or
    /// otherwise undriven).
    pub fn driver(&self, net: &NetId) -> Option<&Gate> {
        self.gates.iter().find(|g| &g.output == net)
    }

    /// Every single stuck-at fault in the circuit (2 per net).
    pub fn all_faults(&self) -> std::collections::BTreeSet<crate::fault::Fault> {
        let mut faults = std::collections::BTreeSet::new();
        for net in &self.nets {
            faults.insert(crate::fault::Fault::new(net.clone(), Logic::Low));
            faults.insert(crate::fault::Fault::new(net.clone(), Logic::High));
        }
        faults
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(s: &str) -> Vec<String> {
        s.lines().map(|l| l.to_string()).collect()
    }

    #[test]
    fn test_load_and_gate() {
        let c = Circuit::load(&lines("AND 1 2 3\nINPUT 1 2 -1\nOUTPUT 3 -1")).unwrap();
        assert_eq!(c.inputs, vec![NetId::from("1"), NetId::from("2")]);
        assert_eq!(c.outputs, vec![NetId::from("3")]);
        assert_eq!(c.gates.len(), 1);
        assert_eq!(c.nets.len(), 3);
    }

    #[test]
    fn test_symbolic_nets() {
        let c = Circuit::load(&lines("BUF a d\nINPUT a -1\nOUTPUT d -1")).unwrap();
        assert_eq!(c.inputs, vec![NetId::Sym("a".to_string())]);
    }

    #[test]
    fn test_missing_terminator() {
        let err = Circuit::load(&lines("AND 1 2 3\nINPUT 1 2\nOUTPUT 3 -1")).unwrap_err();
        assert!(err.message.contains("terminated"));
    }

    #[test]
    fn test_unknown_keyword() {
        let err = Circuit::load(&lines("XOR 1 2 3\nINPUT 1 2 -1\nOUTPUT 3 -1")).unwrap_err();
        assert!(err.message.contains("unknown keyword"));
    }

    #[test]
    fn test_double_driver() {
        let err = Circuit::load(&lines(
            "AND 1 2 3\nAND 1 2 3\nINPUT 1 2 -1\nOUTPUT 3 -1",
        ))
        .unwrap_err();
        assert!(err.message.contains("already driven"));
    }

    #[test]
    fn test_undeclared_net() {
        let err = Circuit::load(&lines("AND 1 2 3\nINPUT 1 2 4 -1\nOUTPUT 3 -1")).unwrap_err();
        assert!(err.message.contains("no gate mentions"));
    }

    #[test]
    fn test_input_cannot_be_gate_output() {
        let err = Circuit::load(&lines(
            "AND 1 2 3\nINPUT 1 2 3 -1\nOUTPUT 3 -1",
        ))
        .unwrap_err();
        assert!(err.message.contains("gate output"));
    }

    #[test]
    fn test_insufficient_arity() {
        let err = Circuit::load(&lines("AND 1 2\nINPUT 1 -1\nOUTPUT 2 -1")).unwrap_err();
        assert!(err.message.contains("requires exactly"));
    }

    #[test]
    fn test_excess_arity() {
        let err = Circuit::load(&lines("AND 1 2 3 4\nINPUT 1 2 3 -1\nOUTPUT 4 -1")).unwrap_err();
        assert!(err.message.contains("requires exactly"));
    }

    #[test]
    fn test_net_id_ordering() {
        let mut v = vec![
            NetId::Sym("b".to_string()),
            NetId::Int(5),
            NetId::Sym("a".to_string()),
            NetId::Int(2),
        ];
        v.sort();
        assert_eq!(
            v,
            vec![
                NetId::Int(2),
                NetId::Int(5),
                NetId::Sym("a".to_string()),
                NetId::Sym("b".to_string()),
            ]
        );
    }
}
