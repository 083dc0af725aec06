//! Error types for the runtime crate.

use qirt_hal::HalError;
use thiserror::Error;

use crate::tracker::LeakReport;

/// Errors raised while running a program.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RuntimeError {
    /// The backend rejected an operation.
    #[error(transparent)]
    Hal(#[from] HalError),

    /// A quantum operation was issued outside any scope.
    #[error("no execution scope is active")]
    NoActiveScope,

    /// The current scope was opened without a backend.
    #[error("the current scope has no backend (classical-only scope)")]
    NoBackend,

    /// The program failed explicitly; the message is reported verbatim.
    #[error("{0}")]
    Fail(String),

    /// A scope ended with live handles and the leak policy is `fail`.
    #[error("{0}")]
    Leaked(LeakReport),

    /// Array index outside `0..len`.
    #[error("index {index} out of range for array of length {len}")]
    IndexOutOfRange {
        /// The requested index.
        index: i64,
        /// Length of the array.
        len: usize,
    },

    /// A multi-dimensional index with the wrong number of coordinates.
    #[error("array of rank {rank} cannot be indexed with {got} coordinates")]
    RankMismatch {
        /// Rank of the array.
        rank: usize,
        /// Coordinates supplied.
        got: usize,
    },

    /// A range with step 0.
    #[error("invalid range {start}..0..{end}: step must not be zero")]
    InvalidRange {
        /// Range start.
        start: i64,
        /// Range end.
        end: i64,
    },

    /// A callable was invoked through a functor it does not implement.
    #[error("callable '{callable}' has no {functor} specialization")]
    MissingSpecialization {
        /// Name of the callable.
        callable: String,
        /// The missing functor ("adjoint", "controlled", ...).
        functor: &'static str,
    },

    /// The number of control lists does not match the controlled depth.
    #[error("contract violation: expected {expected} control lists, got {got}")]
    ControlDepthMismatch {
        /// Controlled depth of the callable.
        expected: usize,
        /// Control lists passed in.
        got: usize,
    },

    /// Invalid runtime configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Reading a configuration file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file is not valid YAML.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

impl RuntimeError {
    /// Returns `true` for handle or argument misuse, at any layer.
    pub fn is_contract_violation(&self) -> bool {
        match self {
            Self::Hal(err) => err.is_contract_violation(),
            Self::ControlDepthMismatch { .. }
            | Self::IndexOutOfRange { .. }
            | Self::RankMismatch { .. } => true,
            _ => false,
        }
    }

    /// Returns `true` if the backend lacks a capability the program used.
    pub fn is_unsupported(&self) -> bool {
        matches!(self, Self::Hal(err) if err.is_unsupported())
    }
}

/// Result type for runtime operations.
pub type RuntimeResult<T> = Result<T, RuntimeError>;

#[cfg(test)]
mod tests {
    use super::*;
    use qirt_hal::Violation;
    use qirt_ir::QubitId;

    #[test]
    fn test_fail_message_is_verbatim() {
        let err = RuntimeError::Fail("0..5..42".into());
        assert_eq!(err.to_string(), "0..5..42");
    }

    #[test]
    fn test_hal_errors_pass_through() {
        let err: RuntimeError =
            HalError::violation("release_qubit", QubitId(1), Violation::Released).into();
        assert!(err.is_contract_violation());
        assert_eq!(
            err.to_string(),
            "contract violation in release_qubit: qubit q1 was already released"
        );

        let err: RuntimeError = HalError::unsupported("stub", "measure").into();
        assert!(err.is_unsupported());
        assert!(!err.is_contract_violation());
    }

    #[test]
    fn test_classification() {
        assert!(RuntimeError::ControlDepthMismatch { expected: 2, got: 1 }.is_contract_violation());
        assert!(RuntimeError::RankMismatch { rank: 3, got: 2 }.is_contract_violation());
        assert!(!RuntimeError::NoBackend.is_contract_violation());
        assert!(!RuntimeError::Fail("x".into()).is_unsupported());
    }
}
