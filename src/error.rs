// src/error.rs

use ark_serialize::SerializationError;

#[derive(Debug)]
pub enum Error {
    /// Key-parameter variant does not match the requested engine mode.
    InvalidParameters,
    /// Assignment length disagrees with the circuit input count, or the
    /// assignment string contains a symbol other than '0'/'1'.
    MalformedAssignment,
    /// Sibling wire share lists disagree in length, a wire was resolved or
    /// written twice, or a fan-out partition does not consume its input
    /// exactly. Indicates a malformed circuit or key; not recoverable.
    CircuitIntegrity,
    /// Sibling shares present but unequal at an AND/OR gate. Inconsistent
    /// assignment or corrupted key/ciphertext material.
    ShareConsistency,
    /// Reconstruction completed but no value reached the output wire.
    /// A normal outcome for a non-satisfying assignment.
    PolicyNotSatisfied,
    /// Element (de)serialization failure from the pairing backend.
    Serialization(SerializationError),
}

pub type Result<T> = core::result::Result<T, Error>;

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::InvalidParameters => write!(f, "key parameters do not match the engine mode"),
            Error::MalformedAssignment => write!(f, "assignment does not match the circuit input count"),
            Error::CircuitIntegrity => write!(f, "circuit or key material is internally inconsistent"),
            Error::ShareConsistency => write!(f, "sibling shares disagree"),
            Error::PolicyNotSatisfied => write!(f, "assignment does not satisfy the policy"),
            Error::Serialization(e) => write!(f, "serialization error: {}", e),
        }
    }
}

impl std::error::Error for Error {}

impl From<SerializationError> for Error {
    fn from(e: SerializationError) -> Self {
        Error::Serialization(e)
    }
}
