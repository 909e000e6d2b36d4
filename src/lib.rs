//! Circuit-policy key encapsulation
//!
//! A KEM in which the session secret can be recovered only by a party
//! whose attribute assignment satisfies a monotone boolean circuit of
//! AND/OR/fan-out gates baked into the decryption key. Decapsulation is a
//! bottom-up secret-share reconstruction over the circuit, operated
//! entirely in the pairing target group.
//!
//! Properties:
//! - Generic over any arkworks pairing engine (`E: Pairing`)
//! - Absence is a first-class share state; unsatisfied branches propagate
//!   monotonically instead of poisoning the walk
//! - Every runtime consistency check is an explicit error, never an
//!   assertion
//! - Reconstruction state is scoped to a single call; decapsulations run
//!   in parallel with no shared mutable state
//!
//! Policy-to-circuit compilation, key generation, and derivation of a
//! symmetric key from the recovered element are out of scope.

pub mod assignment;
pub mod circuit;
pub mod ct;
pub mod engine;
pub mod error;
pub mod io;
pub mod keys;
pub mod reconstruct;

// Re-exports - Public API
pub use assignment::Assignment;
pub use circuit::{Circuit, Gate, GateKind, WireId};
pub use ct::ct_eq_gt;
pub use engine::{Encapsulation, KemEngine, KemMode};
pub use error::{Error, Result};
pub use io::{deserialize_canonical, serialize_canonical};
pub use keys::{KemParameters, PublicKey, SecretKey};
pub use reconstruct::{reconstruct, ShareList};
