//! Qubit and result handle types.
//!
//! A handle is a capability token: it names a slot owned by a backend but
//! carries no state of its own. Whether a handle is still live is decided
//! by the backend that issued it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque handle naming a single qubit slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QubitId(pub u64);

impl fmt::Display for QubitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q{}", self.0)
    }
}

impl From<u64> for QubitId {
    fn from(id: u64) -> Self {
        QubitId(id)
    }
}

impl From<usize> for QubitId {
    fn from(id: usize) -> Self {
        QubitId(id as u64)
    }
}

/// Opaque handle naming a measurement outcome.
///
/// Values `0` and `1` are reserved for the process-wide [`ResultId::ZERO`]
/// and [`ResultId::ONE`] constants. Backends that store measurement results
/// hand out ids starting at [`ResultId::FIRST_DYNAMIC`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ResultId(pub u64);

impl ResultId {
    /// The constant `Zero` result.
    pub const ZERO: ResultId = ResultId(0);
    /// The constant `One` result.
    pub const ONE: ResultId = ResultId(1);
    /// First id available for measurement-produced results.
    pub const FIRST_DYNAMIC: u64 = 2;

    /// Map a classical bit onto the matching constant.
    pub fn from_bool(bit: bool) -> Self {
        if bit { Self::ONE } else { Self::ZERO }
    }

    /// Whether this is one of the two constants.
    pub fn is_constant(self) -> bool {
        self.0 < Self::FIRST_DYNAMIC
    }

    /// The bit a constant stands for, `None` for dynamic results.
    pub fn constant_value(self) -> Option<bool> {
        match self {
            Self::ZERO => Some(false),
            Self::ONE => Some(true),
            _ => None,
        }
    }
}

impl fmt::Display for ResultId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::ZERO => write!(f, "Zero"),
            Self::ONE => write!(f, "One"),
            Self(id) => write!(f, "r{id}"),
        }
    }
}

impl From<u64> for ResultId {
    fn from(id: u64) -> Self {
        ResultId(id)
    }
}

/// Either kind of handle. Used in diagnostics and leak reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Handle {
    /// A qubit handle.
    Qubit(QubitId),
    /// A result handle.
    Result(ResultId),
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Handle::Qubit(q) => write!(f, "qubit {q}"),
            Handle::Result(r) => write!(f, "result {r}"),
        }
    }
}

impl From<QubitId> for Handle {
    fn from(q: QubitId) -> Self {
        Handle::Qubit(q)
    }
}

impl From<ResultId> for Handle {
    fn from(r: ResultId) -> Self {
        Handle::Result(r)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qubit_display() {
        assert_eq!(QubitId(0).to_string(), "q0");
        assert_eq!(QubitId::from(7_usize).to_string(), "q7");
    }

    #[test]
    fn test_result_constants() {
        assert_ne!(ResultId::ZERO, ResultId::ONE);
        assert!(ResultId::ZERO.is_constant());
        assert!(ResultId::ONE.is_constant());
        assert!(!ResultId(2).is_constant());
        assert_eq!(ResultId::from_bool(true), ResultId::ONE);
        assert_eq!(ResultId::ONE.constant_value(), Some(true));
        assert_eq!(ResultId(9).constant_value(), None);
    }

    #[test]
    fn test_handle_display() {
        assert_eq!(Handle::from(QubitId(3)).to_string(), "qubit q3");
        assert_eq!(Handle::from(ResultId(4)).to_string(), "result r4");
        assert_eq!(Handle::from(ResultId::ONE).to_string(), "result One");
    }

    #[test]
    fn test_handle_serde() {
        let json = serde_json::to_string(&Handle::Qubit(QubitId(5))).unwrap();
        let back: Handle = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Handle::Qubit(QubitId(5)));
    }
}
