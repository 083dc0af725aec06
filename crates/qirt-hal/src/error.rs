//! Error types for the HAL crate.
//!
//! | Category | Variants | Meaning |
//! |----------|----------|---------|
//! | **Contract violation** | `ContractViolation`, `InvalidArgument` | Misuse of a handle or argument; a logic bug in the caller |
//! | **Unsupported** | `Unsupported` | The active backend does not implement the capability |
//! | **Setup** | `BackendUnavailable`, `Configuration`, `Serialization`, `Ir` | Backend selection and configuration |
//! | **Job** | `SubmissionFailed`, `JobNotFound` | Job-submission interface |
//!
//! None of these are transient: the runtime never retries.

use std::fmt;

use qirt_ir::{Handle, IrError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a handle was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Violation {
    /// The handle was live once and has been released since.
    Released,
    /// The handle was never issued by this backend.
    Unknown,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::Released => f.write_str("was already released"),
            Violation::Unknown => f.write_str("was never allocated"),
        }
    }
}

/// Errors that can occur in backend operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HalError {
    /// A handle was used outside its live range.
    #[error("contract violation in {operation}: {handle} {violation}")]
    ContractViolation {
        /// The backend operation that rejected the handle.
        operation: &'static str,
        /// The offending handle.
        handle: Handle,
        /// Why it was rejected.
        violation: Violation,
    },

    /// Arguments are inconsistent (duplicate qubits, length mismatch, ...).
    #[error("contract violation in {operation}: {reason}")]
    InvalidArgument {
        /// The backend operation that rejected the arguments.
        operation: &'static str,
        /// Human-readable description.
        reason: String,
    },

    /// The backend does not implement this capability.
    #[error("Unsupported operation on backend '{backend}': {operation}")]
    Unsupported {
        /// Name of the backend.
        backend: String,
        /// The operation that was requested.
        operation: String,
    },

    /// Backend is not available.
    #[error("Backend not available: {0}")]
    BackendUnavailable(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IR decoding error.
    #[error("IR error: {0}")]
    Ir(#[from] IrError),

    /// Job submission failed.
    #[error("Job submission failed: {0}")]
    SubmissionFailed(String),

    /// Job not found.
    #[error("Job not found: {0}")]
    JobNotFound(String),
}

impl HalError {
    /// Build a [`HalError::ContractViolation`].
    pub fn violation(
        operation: &'static str,
        handle: impl Into<Handle>,
        violation: Violation,
    ) -> Self {
        Self::ContractViolation {
            operation,
            handle: handle.into(),
            violation,
        }
    }

    /// Build a [`HalError::InvalidArgument`].
    pub fn invalid_argument(operation: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            operation,
            reason: reason.into(),
        }
    }

    /// Build a [`HalError::Unsupported`].
    pub fn unsupported(backend: impl Into<String>, operation: impl Into<String>) -> Self {
        Self::Unsupported {
            backend: backend.into(),
            operation: operation.into(),
        }
    }

    /// Returns `true` for handle or argument misuse.
    pub fn is_contract_violation(&self) -> bool {
        matches!(
            self,
            Self::ContractViolation { .. } | Self::InvalidArgument { .. }
        )
    }

    /// Returns `true` if the backend lacks the requested capability.
    pub fn is_unsupported(&self) -> bool {
        matches!(self, Self::Unsupported { .. })
    }

    /// The handle named by a contract violation, if any.
    pub fn handle(&self) -> Option<Handle> {
        match self {
            Self::ContractViolation { handle, .. } => Some(*handle),
            _ => None,
        }
    }
}

/// Result type for HAL operations.
pub type HalResult<T> = Result<T, HalError>;
