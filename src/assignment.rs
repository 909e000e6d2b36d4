//! Attribute assignments
//!
//! One binary symbol per circuit input gate, marking the attributes the
//! encapsulating or decapsulating party holds.

use core::str::FromStr;

use crate::error::{Error, Result};

/// Bit-per-input attribute assignment, read-only once built.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Assignment(Vec<bool>);

impl Assignment {
    pub fn new(bits: Vec<bool>) -> Self {
        Assignment(bits)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether input position `i` is satisfied.
    pub fn is_set(&self, i: usize) -> bool {
        self.0[i]
    }

    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        self.0.iter().copied()
    }
}

impl FromStr for Assignment {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        s.chars()
            .map(|c| match c {
                '0' => Ok(false),
                '1' => Ok(true),
                _ => Err(Error::MalformedAssignment),
            })
            .collect::<Result<Vec<bool>>>()
            .map(Assignment)
    }
}
