//! Error types for the IR crate.

use thiserror::Error;

/// Errors that can occur when decoding IR values.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IrError {
    /// Gate name is not part of the intrinsic set.
    #[error("Unknown gate '{0}'")]
    UnknownGate(String),

    /// Gate requires a different number of parameters.
    #[error("Gate '{gate_name}' requires {expected} parameters, got {got}")]
    ParameterCountMismatch {
        /// Name of the gate.
        gate_name: String,
        /// Expected number of parameters.
        expected: usize,
        /// Actual number of parameters provided.
        got: usize,
    },

    /// Byte does not encode a Pauli basis.
    #[error("Invalid Pauli encoding: {0}")]
    InvalidPauli(u8),
}

/// Result type for IR operations.
pub type IrResult<T> = Result<T, IrError>;
