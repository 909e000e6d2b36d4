//! KEM engine
//!
//! Encapsulation masks the capital-T points of the satisfied attribute
//! positions with a fresh scalar and publishes the session point `g1^s`.
//! Decapsulation parses the stream back against the holder's assignment,
//! opens each satisfied leaf through the pairing, and hands the leaf share
//! lists to the reconstruction walk.

use ark_ec::pairing::{Pairing, PairingOutput};
use ark_ec::{AffineRepr, CurveGroup, PrimeGroup};
use ark_std::rand::RngCore;
use ark_std::UniformRand;

use crate::error::{Error, Result};
use crate::io;
use crate::keys::KemParameters;
use crate::reconstruct::{reconstruct, ShareList};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KemMode {
    Encapsulate,
    Decapsulate,
}

/// Public encapsulation: the per-attribute masked shares and the session
/// point, published alongside the ciphertext body.
#[derive(Clone, Debug)]
pub struct Encapsulation<E: Pairing> {
    /// `capital_t[i]^s` at satisfied positions, absent elsewhere.
    pub attribute_shares: Vec<Option<E::G1Affine>>,
    /// `g1^s`.
    pub session_point: E::G1Affine,
}

impl<E: Pairing> Encapsulation<E> {
    /// Emit the ciphertext stream: satisfied shares in ascending index
    /// order, then the session point. Offsets are re-derivable from the
    /// assignment alone.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        io::write_ciphertext(self)
    }
}

/// Mode-checked KEM engine over validated key parameters.
pub struct KemEngine<E: Pairing> {
    mode: KemMode,
    params: KemParameters<E>,
}

impl<E: Pairing> KemEngine<E> {
    /// Construct an engine, rejecting a mode/parameter-variant mismatch
    /// and an assignment that disagrees with the key's attribute count
    /// before any cryptographic work.
    pub fn new(mode: KemMode, params: KemParameters<E>) -> Result<Self> {
        match (mode, &params) {
            (KemMode::Encapsulate, KemParameters::Encryption { public_key, assignment }) => {
                if assignment.len() != public_key.len() {
                    return Err(Error::MalformedAssignment);
                }
            }
            (KemMode::Decapsulate, KemParameters::Decryption { secret_key, assignment }) => {
                if assignment.len() != secret_key.circuit().input_count() {
                    return Err(Error::MalformedAssignment);
                }
            }
            _ => return Err(Error::InvalidParameters),
        }
        Ok(KemEngine { mode, params })
    }

    /// Sample a fresh session scalar and mask the satisfied attribute
    /// positions.
    pub fn encapsulate<R: RngCore>(&self, rng: &mut R) -> Result<Encapsulation<E>> {
        let (public_key, assignment) = match (self.mode, &self.params) {
            (KemMode::Encapsulate, KemParameters::Encryption { public_key, assignment }) => {
                (public_key, assignment)
            }
            _ => return Err(Error::InvalidParameters),
        };

        let s = E::ScalarField::rand(rng);
        let attribute_shares = (0..assignment.len())
            .map(|i| {
                assignment
                    .is_set(i)
                    .then(|| (public_key.capital_t_at(i).into_group() * s).into_affine())
            })
            .collect();
        let session_point = (<E as Pairing>::G1::generator() * s).into_affine();

        Ok(Encapsulation { attribute_shares, session_point })
    }

    /// Recover the shared secret from a ciphertext stream, or fail with
    /// `PolicyNotSatisfied` when the held assignment does not satisfy the
    /// key's circuit.
    pub fn decapsulate(&self, ciphertext: &[u8]) -> Result<PairingOutput<E>> {
        let (secret_key, assignment) = match (self.mode, &self.params) {
            (KemMode::Decapsulate, KemParameters::Decryption { secret_key, assignment }) => {
                (secret_key, assignment)
            }
            _ => return Err(Error::InvalidParameters),
        };

        let (ts, session_point) = io::read_ciphertext::<E>(ciphertext, assignment)?;

        // Open each satisfied leaf: one pairing per D-share, the ciphertext
        // element against the share lifted into G2. Unsatisfied leaves get
        // an all-absent list of the same declared length so downstream
        // length invariants stay checkable.
        let circuit = secret_key.circuit();
        let mut leaves: Vec<ShareList<E>> = Vec::with_capacity(circuit.input_count());
        for (i, t) in ts.iter().enumerate() {
            let d = secret_key.d_shares_at(i);
            let list = match t {
                Some(t) => d
                    .iter()
                    .map(|d_j| {
                        Some(E::pairing(
                            *t,
                            (<E as Pairing>::G2::generator() * *d_j).into_affine(),
                        ))
                    })
                    .collect(),
                None => vec![None; d.len()],
            };
            leaves.push(list);
        }

        reconstruct(secret_key, leaves, &session_point)
    }
}
