//! Monotone policy circuits
//!
//! Gates live in an arena of fixed records indexed by integer id; a gate's
//! inputs always carry smaller indices, so ascending index order is the
//! bottom-up (inputs-first) traversal order. Wires are directed
//! `(source, destination)` edges resolved to stable integer ids at
//! construction time, plus one virtual wire from the output gate to the
//! sink. Consumer lists are kept in ascending gate index order; for fan-out
//! gates this ordering is the cross-run contract that P-share lists are
//! generated against.

use std::collections::HashMap;

use crate::error::{Error, Result};

/// Stable integer id of a directed wire.
pub type WireId = usize;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GateKind {
    Input,
    And,
    Or,
    FanOut,
}

#[derive(Clone, Debug)]
pub struct Gate {
    pub kind: GateKind,
    /// Indices of the gates feeding this gate. Arity 2 for AND/OR, 1 for
    /// FAN_OUT, 0 for INPUT.
    pub inputs: Vec<usize>,
}

impl Gate {
    pub fn input() -> Self {
        Gate { kind: GateKind::Input, inputs: Vec::new() }
    }

    pub fn and(left: usize, right: usize) -> Self {
        Gate { kind: GateKind::And, inputs: vec![left, right] }
    }

    pub fn or(left: usize, right: usize) -> Self {
        Gate { kind: GateKind::Or, inputs: vec![left, right] }
    }

    pub fn fan_out(source: usize) -> Self {
        Gate { kind: GateKind::FanOut, inputs: vec![source] }
    }
}

/// Validated policy circuit: gate arena + wire index.
#[derive(Clone, Debug)]
pub struct Circuit {
    gates: Vec<Gate>,
    input_count: usize,
    wires: HashMap<(usize, usize), WireId>,
    consumers: Vec<Vec<usize>>,
    output_gate: usize,
    output_wire: WireId,
}

impl Circuit {
    /// Build and validate a circuit. The first `input_count` gates must be
    /// the INPUT gates; every other gate must reference only
    /// smaller-indexed gates; exactly one gate (the output) has no
    /// consumers, and it may not be a fan-out; AND/OR gates other than the
    /// output feed exactly one consumer.
    pub fn new(input_count: usize, gates: Vec<Gate>) -> Result<Self> {
        if input_count == 0 || gates.len() < input_count {
            return Err(Error::CircuitIntegrity);
        }
        for (idx, gate) in gates.iter().enumerate() {
            if (idx < input_count) != (gate.kind == GateKind::Input) {
                return Err(Error::CircuitIntegrity);
            }
            let arity_ok = match gate.kind {
                GateKind::Input => gate.inputs.is_empty(),
                GateKind::And | GateKind::Or => gate.inputs.len() == 2,
                GateKind::FanOut => gate.inputs.len() == 1,
            };
            if !arity_ok || gate.inputs.iter().any(|&src| src >= idx) {
                return Err(Error::CircuitIntegrity);
            }
        }

        // Consumer lists, ascending and deduplicated per (src, dst) edge.
        let mut consumers: Vec<Vec<usize>> = vec![Vec::new(); gates.len()];
        for (idx, gate) in gates.iter().enumerate() {
            for &src in &gate.inputs {
                if consumers[src].last() != Some(&idx) {
                    consumers[src].push(idx);
                }
            }
        }

        let mut sinks = (0..gates.len()).filter(|&i| consumers[i].is_empty());
        let output_gate = match (sinks.next(), sinks.next()) {
            (Some(out), None) => out,
            _ => return Err(Error::CircuitIntegrity),
        };
        if gates[output_gate].kind == GateKind::FanOut {
            return Err(Error::CircuitIntegrity);
        }
        for (idx, gate) in gates.iter().enumerate() {
            let single_out = matches!(gate.kind, GateKind::And | GateKind::Or);
            if single_out && idx != output_gate && consumers[idx].len() != 1 {
                return Err(Error::CircuitIntegrity);
            }
        }

        let mut wires = HashMap::new();
        let mut next_wire: WireId = 0;
        for (idx, gate) in gates.iter().enumerate() {
            for &src in &gate.inputs {
                wires.entry((src, idx)).or_insert_with(|| {
                    let id = next_wire;
                    next_wire += 1;
                    id
                });
            }
        }
        let output_wire = next_wire;

        Ok(Circuit { gates, input_count, wires, consumers, output_gate, output_wire })
    }

    pub fn input_count(&self) -> usize {
        self.input_count
    }

    /// Gates in bottom-up order.
    pub fn gates(&self) -> &[Gate] {
        &self.gates
    }

    pub fn gate(&self, idx: usize) -> &Gate {
        &self.gates[idx]
    }

    /// Resolve the wire from `src` into `dst`.
    pub fn wire(&self, src: usize, dst: usize) -> Result<WireId> {
        self.wires.get(&(src, dst)).copied().ok_or(Error::CircuitIntegrity)
    }

    pub fn output_gate(&self) -> usize {
        self.output_gate
    }

    /// The virtual wire carrying the output gate's value to the sink.
    pub fn output_wire(&self) -> WireId {
        self.output_wire
    }

    /// Gates consuming `idx`'s value, ascending.
    pub fn consumers(&self, idx: usize) -> &[usize] {
        &self.consumers[idx]
    }

    /// The single wire leaving an AND/OR gate (the output wire for the
    /// output gate).
    pub fn successor_wire(&self, idx: usize) -> Result<WireId> {
        if idx == self.output_gate {
            return Ok(self.output_wire);
        }
        match self.consumers[idx].as_slice() {
            [dst] => self.wire(idx, *dst),
            _ => Err(Error::CircuitIntegrity),
        }
    }
}
