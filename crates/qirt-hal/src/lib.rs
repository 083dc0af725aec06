//! qirt Hardware Abstraction Layer
//!
//! The capability contract every simulator backend satisfies, and the
//! handle bookkeeping backends use to enforce qubit and result lifetimes.
//!
//! # Overview
//!
//! - [`Backend`]: allocate/release qubits, apply (controlled) gates,
//!   measure, compare and release results.
//! - [`HandleTable`]: slot table from handles to backend state; detects
//!   double release, use-after-release and unknown handles.
//! - [`BackendRegistry`]: select a backend by name at setup time.
//! - [`JobSubmitter`] / [`NoopSubmitter`]: the job-submission seam.
//! - [`HalError`]: contract violations, unsupported capabilities and setup
//!   errors.
//!
//! # Implementing a Backend
//!
//! ```rust
//! use qirt_hal::{Backend, HalResult, HandleTable};
//! use qirt_ir::{Gate, QubitId};
//!
//! /// Counts X gates, supports nothing else.
//! struct Counter {
//!     qubits: HandleTable<QubitId, ()>,
//!     flips: usize,
//! }
//!
//! impl Backend for Counter {
//!     fn name(&self) -> &str {
//!         "counter"
//!     }
//!
//!     fn allocate_qubit(&mut self) -> HalResult<QubitId> {
//!         Ok(self.qubits.insert(()))
//!     }
//!
//!     fn release_qubit(&mut self, qubit: QubitId) -> HalResult<()> {
//!         self.qubits.release(qubit, "release_qubit")
//!     }
//!
//!     fn apply(&mut self, gate: Gate, target: QubitId) -> HalResult<()> {
//!         self.qubits.get(target, "apply")?;
//!         if gate == Gate::X {
//!             self.flips += 1;
//!         }
//!         Ok(())
//!     }
//! }
//!
//! let mut backend = Counter { qubits: HandleTable::new(), flips: 0 };
//! let q = backend.allocate_qubit().unwrap();
//! backend.apply(Gate::X, q).unwrap();
//! backend.release_qubit(q).unwrap();
//! assert!(backend.apply(Gate::X, q).unwrap_err().is_contract_violation());
//! assert!(backend.measure(&[], &[]).unwrap_err().is_unsupported());
//! ```

pub mod backend;
pub mod error;
pub mod handles;
pub mod job;
pub mod registry;

pub use backend::{
    Backend, BackendConfig, BackendFactory, StubBackend, check_distinct, single_measurement,
};
pub use error::{HalError, HalResult, Violation};
pub use handles::{HandleKey, HandleTable};
pub use job::{Job, JobId, JobStatus, JobSubmitter, NoopSubmitter};
pub use registry::BackendRegistry;
