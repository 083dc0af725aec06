//! Pauli measurement bases.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::IrError;

/// A single-qubit Pauli operator, used as a measurement basis.
///
/// The discriminants follow the QIR encoding (`I=0, X=1, Z=2, Y=3`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Pauli {
    /// Identity.
    I = 0,
    /// Pauli-X.
    X = 1,
    /// Pauli-Z.
    Z = 2,
    /// Pauli-Y.
    Y = 3,
}

impl TryFrom<u8> for Pauli {
    type Error = IrError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Pauli::I),
            1 => Ok(Pauli::X),
            2 => Ok(Pauli::Z),
            3 => Ok(Pauli::Y),
            other => Err(IrError::InvalidPauli(other)),
        }
    }
}

impl fmt::Display for Pauli {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Pauli::I => "I",
            Pauli::X => "X",
            Pauli::Z => "Z",
            Pauli::Y => "Y",
        };
        f.write_str(s)
    }
}
