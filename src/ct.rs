use ark_ec::pairing::{Pairing, PairingOutput};
use ark_serialize::CanonicalSerialize;
use subtle::ConstantTimeEq;

/// Constant-time equality on GT shares by comparing canonical compressed
/// encodings. Used for the sibling-consistency checks so a rejection does
/// not leak which byte diverged.
pub fn ct_eq_gt<E: Pairing>(a: &PairingOutput<E>, b: &PairingOutput<E>) -> bool {
    let mut ab = Vec::new();
    let mut bb = Vec::new();
    a.serialize_compressed(&mut ab).expect("serialize");
    b.serialize_compressed(&mut bb).expect("serialize");
    ab.ct_eq(&bb).unwrap_u8() == 1
}
