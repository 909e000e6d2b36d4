//! Canonical (hardened) serialization/deserialization helpers and the
//! ciphertext stream layout.
//!
//! The stream carries one compressed G1 element per satisfied input
//! position in ascending index order, then the session point. Offsets are
//! re-derived from the assignment on read; there are no embedded length
//! fields.

use ark_ec::pairing::Pairing;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize, Compress, Validate};

use crate::assignment::Assignment;
use crate::engine::Encapsulation;
use crate::error::Result;

/// Deserialize with canonical validation (Validate::Yes) from a byte slice
pub fn deserialize_canonical<T: CanonicalDeserialize>(
    bytes: &[u8],
) -> core::result::Result<T, ark_serialize::SerializationError> {
    let mut cursor = std::io::Cursor::new(bytes);
    T::deserialize_with_mode(&mut cursor, Compress::Yes, Validate::Yes)
}

/// Serialize to canonical compressed bytes
pub fn serialize_canonical<T: CanonicalSerialize>(
    value: &T,
) -> core::result::Result<Vec<u8>, ark_serialize::SerializationError> {
    let mut out = Vec::new();
    value.serialize_with_mode(&mut out, Compress::Yes)?;
    Ok(out)
}

/// Emit the encapsulation stream: satisfied attribute shares in ascending
/// index order, then the session point.
pub(crate) fn write_ciphertext<E: Pairing>(encap: &Encapsulation<E>) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    for share in encap.attribute_shares.iter().flatten() {
        share.serialize_with_mode(&mut out, Compress::Yes)?;
    }
    encap.session_point.serialize_with_mode(&mut out, Compress::Yes)?;
    Ok(out)
}

/// Parse the encapsulation stream against an assignment: one element per
/// satisfied position (absent positions contribute zero bytes), then the
/// session point. Every element is subgroup-validated on read.
pub(crate) fn read_ciphertext<E: Pairing>(
    bytes: &[u8],
    assignment: &Assignment,
) -> Result<(Vec<Option<E::G1Affine>>, E::G1Affine)> {
    let mut cursor = std::io::Cursor::new(bytes);
    let mut shares = Vec::with_capacity(assignment.len());
    for i in 0..assignment.len() {
        if assignment.is_set(i) {
            let t =
                E::G1Affine::deserialize_with_mode(&mut cursor, Compress::Yes, Validate::Yes)?;
            shares.push(Some(t));
        } else {
            shares.push(None);
        }
    }
    let session_point =
        E::G1Affine::deserialize_with_mode(&mut cursor, Compress::Yes, Validate::Yes)?;
    Ok((shares, session_point))
}
