//! Bottom-up secret-share reconstruction
//!
//! Walks the policy circuit inputs-first, combining GT shares wire by wire:
//! INPUT gates broadcast their opened leaf list onto every outgoing wire,
//! AND gates multiply equal sibling shares, OR gates select the present
//! sibling (checking equality when both are present), and FAN_OUT gates
//! consume their incoming list as an exact partition, re-randomizing each
//! sub-share against the session point. Absence is a first-class share
//! state and propagates monotonically through every rule.
//!
//! The wire map is private to a single invocation; concurrent calls share
//! no state.

use std::collections::HashMap;

use ark_ec::pairing::{Pairing, PairingOutput};
use ark_ec::{CurveGroup, PrimeGroup};

use crate::circuit::{Circuit, GateKind, WireId};
use crate::ct::ct_eq_gt;
use crate::error::{Error, Result};
use crate::keys::SecretKey;

/// Per-wire share list. Length 1 everywhere except downstream of a
/// fan-out, where sub-lists appear. `None` marks an unsatisfied branch.
pub type ShareList<E> = Vec<Option<PairingOutput<E>>>;

/// Single-assignment wire-value map for one reconstruction pass.
struct WireMap<E: Pairing>(HashMap<WireId, ShareList<E>>);

impl<E: Pairing> WireMap<E> {
    fn new() -> Self {
        WireMap(HashMap::new())
    }

    fn put(&mut self, wire: WireId, shares: ShareList<E>) -> Result<()> {
        if self.0.insert(wire, shares).is_some() {
            // a wire is written exactly once per pass
            return Err(Error::CircuitIntegrity);
        }
        Ok(())
    }

    fn get(&self, wire: WireId) -> Result<&ShareList<E>> {
        self.0.get(&wire).ok_or(Error::CircuitIntegrity)
    }
}

/// Reconstruct the shared secret from opened leaf share lists.
///
/// `leaves` carries one list per input gate in ascending gate order; an
/// unsatisfied input contributes an all-absent list of its D-share length.
/// Returns the single element reaching the output wire, or
/// `PolicyNotSatisfied` when no satisfied path reaches it.
pub fn reconstruct<E: Pairing>(
    secret_key: &SecretKey<E>,
    leaves: Vec<ShareList<E>>,
    session_point: &E::G1Affine,
) -> Result<PairingOutput<E>> {
    let circuit = secret_key.circuit();
    if leaves.len() != circuit.input_count() {
        return Err(Error::CircuitIntegrity);
    }

    let mut r = WireMap::<E>::new();
    for (idx, gate) in circuit.gates().iter().enumerate() {
        match gate.kind {
            GateKind::Input => {
                let list = &leaves[idx];
                if idx == circuit.output_gate() {
                    r.put(circuit.output_wire(), list.clone())?;
                    continue;
                }
                for &dst in circuit.consumers(idx) {
                    r.put(circuit.wire(idx, dst)?, list.clone())?;
                }
            }
            GateKind::And | GateKind::Or => {
                let left = r.get(circuit.wire(gate.inputs[0], idx)?)?;
                let right = r.get(circuit.wire(gate.inputs[1], idx)?)?;
                let combined = combine_siblings(gate.kind, left, right)?;
                r.put(circuit.successor_wire(idx)?, combined)?;
            }
            GateKind::FanOut => {
                let incoming = r.get(circuit.wire(gate.inputs[0], idx)?)?.clone();
                split_fan_out(secret_key, circuit, idx, &incoming, session_point, &mut r)?;
            }
        }
    }

    let out = match r.0.get(&circuit.output_wire()) {
        Some(list) => list,
        None => return Err(Error::PolicyNotSatisfied),
    };
    if out.len() != 1 {
        return Err(Error::CircuitIntegrity);
    }
    out[0].ok_or(Error::PolicyNotSatisfied)
}

/// AND/OR combination of two sibling share lists of equal length.
fn combine_siblings<E: Pairing>(
    kind: GateKind,
    left: &ShareList<E>,
    right: &ShareList<E>,
) -> Result<ShareList<E>> {
    if left.len() != right.len() {
        return Err(Error::CircuitIntegrity);
    }
    let mut combined = Vec::with_capacity(left.len());
    for (l, r) in left.iter().zip(right) {
        let value = match (kind, l, r) {
            // AND is strict: any absent side absents the slot.
            (GateKind::And, Some(a), Some(b)) => {
                if !ct_eq_gt::<E>(a, b) {
                    return Err(Error::ShareConsistency);
                }
                Some(*a + *b)
            }
            (GateKind::And, _, _) => None,
            // OR selects the present side, both-present must agree.
            (GateKind::Or, Some(a), Some(b)) => {
                if !ct_eq_gt::<E>(a, b) {
                    return Err(Error::ShareConsistency);
                }
                Some(*a)
            }
            (GateKind::Or, Some(a), None) => Some(*a),
            (GateKind::Or, None, Some(b)) => Some(*b),
            (GateKind::Or, None, None) => None,
            _ => return Err(Error::CircuitIntegrity),
        };
        combined.push(value);
    }
    Ok(combined)
}

/// Consuming partition of a fan-out gate's incoming list. A cursor
/// advances by each successor wire's declared P-share length; the
/// partition must land exactly on the end of the list. Each sub-share is
/// re-randomized with its wire's P-share against the session point.
fn split_fan_out<E: Pairing>(
    secret_key: &SecretKey<E>,
    circuit: &Circuit,
    gate_idx: usize,
    incoming: &ShareList<E>,
    session_point: &E::G1Affine,
    r: &mut WireMap<E>,
) -> Result<()> {
    let mut offset = 0usize;
    for &dst in circuit.consumers(gate_idx) {
        let wire = circuit.wire(gate_idx, dst)?;
        let p = secret_key.p_shares_at(wire)?;
        let end = offset
            .checked_add(p.len())
            .filter(|&end| end <= incoming.len())
            .ok_or(Error::CircuitIntegrity)?;
        let mut rerandomized = Vec::with_capacity(p.len());
        for (share, p_j) in incoming[offset..end].iter().zip(p) {
            rerandomized.push(share.map(|v| {
                v + E::pairing(
                    *session_point,
                    (<E as Pairing>::G2::generator() * *p_j).into_affine(),
                )
            }));
        }
        r.put(wire, rerandomized)?;
        offset = end;
    }
    if offset != incoming.len() {
        return Err(Error::CircuitIntegrity);
    }
    Ok(())
}
