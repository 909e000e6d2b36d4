//! Key material
//!
//! The public key holds one capital-T mask point per attribute position.
//! The secret key owns the policy circuit together with the D-share
//! scalars that open each satisfied input's ciphertext share, and the
//! P-share scalars that re-randomize fan-out splits. Both share families
//! are read-only for the lifetime of the key.

use std::collections::HashMap;

use ark_ec::pairing::Pairing;
use ark_ec::AffineRepr;
use ark_ff::PrimeField;
use ark_std::Zero;

use crate::assignment::Assignment;
use crate::circuit::{Circuit, GateKind, WireId};
use crate::error::{Error, Result};

/// Encryption-side key: public mask points, one per attribute position.
#[derive(Clone, Debug)]
pub struct PublicKey<E: Pairing> {
    pub capital_t: Vec<E::G1Affine>,
}

impl<E: Pairing> PublicKey<E> {
    pub fn new(capital_t: Vec<E::G1Affine>) -> Self {
        PublicKey { capital_t }
    }

    /// Number of attribute positions.
    pub fn len(&self) -> usize {
        self.capital_t.len()
    }

    pub fn is_empty(&self) -> bool {
        self.capital_t.is_empty()
    }

    pub fn capital_t_at(&self, i: usize) -> &E::G1Affine {
        &self.capital_t[i]
    }

    /// Validate that all mask points are in the prime-order subgroup.
    /// Call this ONCE when keys are first generated/loaded; the engine
    /// assumes validated keys.
    pub fn validate_subgroups(&self) -> Result<()> {
        let order = <<E as Pairing>::ScalarField as PrimeField>::MODULUS;
        for t in &self.capital_t {
            if t.is_zero() {
                continue;
            }
            if !t.mul_bigint(order).is_zero() {
                return Err(Error::InvalidParameters);
            }
        }
        Ok(())
    }
}

/// Decryption-side key: the circuit plus per-gate D-shares and per-wire
/// P-shares.
#[derive(Clone, Debug)]
pub struct SecretKey<E: Pairing> {
    circuit: Circuit,
    d_shares: Vec<Vec<E::ScalarField>>,
    p_shares: HashMap<WireId, Vec<E::ScalarField>>,
}

impl<E: Pairing> SecretKey<E> {
    /// Build a secret key, checking that the share tables cover the
    /// circuit exactly: one non-empty D-list per input gate, and a P-list
    /// for every fan-out successor wire and no other wire.
    pub fn new(
        circuit: Circuit,
        d_shares: Vec<Vec<E::ScalarField>>,
        p_shares: HashMap<WireId, Vec<E::ScalarField>>,
    ) -> Result<Self> {
        if d_shares.len() != circuit.input_count() || d_shares.iter().any(|d| d.is_empty()) {
            return Err(Error::CircuitIntegrity);
        }
        let mut expected = 0usize;
        for (idx, gate) in circuit.gates().iter().enumerate() {
            if gate.kind != GateKind::FanOut {
                continue;
            }
            for &dst in circuit.consumers(idx) {
                let wire = circuit.wire(idx, dst)?;
                match p_shares.get(&wire) {
                    Some(p) if !p.is_empty() => expected += 1,
                    _ => return Err(Error::CircuitIntegrity),
                }
            }
        }
        if expected != p_shares.len() {
            return Err(Error::CircuitIntegrity);
        }
        Ok(SecretKey { circuit, d_shares, p_shares })
    }

    pub fn circuit(&self) -> &Circuit {
        &self.circuit
    }

    /// D-shares opening input gate `idx`'s ciphertext element.
    pub fn d_shares_at(&self, idx: usize) -> &[E::ScalarField] {
        &self.d_shares[idx]
    }

    /// P-shares re-randomizing the fan-out sub-list on `wire`.
    pub fn p_shares_at(&self, wire: WireId) -> Result<&[E::ScalarField]> {
        self.p_shares
            .get(&wire)
            .map(Vec::as_slice)
            .ok_or(Error::CircuitIntegrity)
    }
}

/// Mode-tagged key parameters handed to the engine.
#[derive(Clone, Debug)]
pub enum KemParameters<E: Pairing> {
    Encryption {
        public_key: PublicKey<E>,
        assignment: Assignment,
    },
    Decryption {
        secret_key: SecretKey<E>,
        assignment: Assignment,
    },
}
