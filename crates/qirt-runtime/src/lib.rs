//! qirt Runtime
//!
//! Runs QIR-style programs against a [`qirt_hal::Backend`]: scoped backend
//! selection, allocation tracking with leak reports, intrinsic shims and
//! runtime support.
//!
//! # Overview
//!
//! - [`ExecutionContext`]: the frame stack every intrinsic call goes
//!   through. [`ExecutionContext::scoped`] makes a backend current and
//!   returns a [`Scope`] guard.
//! - [`qis`]: `x_body`, `cnot_body`, `m_body`, ... forwarding to the backend.
//! - [`rt`]: qubit/result calls, arrays, ranges, callables, `fail`.
//! - [`RuntimeConfig`]: tracking, leak policy, backend choice; YAML file
//!   plus `QIRT_*` environment overrides.
//! - [`tracing_config`]: subscriber setup for binaries.
//!
//! # Example
//!
//! ```rust
//! use qirt_adapter_sim::ToffoliSimulator;
//! use qirt_runtime::{ExecutionContext, RuntimeConfig, qis, rt};
//!
//! let mut sim = ToffoliSimulator::new();
//! let mut ctx = ExecutionContext::new(RuntimeConfig::default());
//! let mut scope = ctx.scoped(&mut sim, true);
//!
//! let q = rt::qubit_allocate(&mut scope).unwrap();
//! qis::x_body(&mut scope, q).unwrap();
//! let r = qis::m_body(&mut scope, q).unwrap();
//! let one = rt::result_get_one(&scope).unwrap();
//! assert!(rt::result_equal(&scope, r, one).unwrap());
//! rt::result_release(&mut scope, r).unwrap();
//! rt::qubit_release(&mut scope, q).unwrap();
//!
//! let report = scope.finish().unwrap();
//! assert!(report.is_clean());
//! ```

pub mod config;
pub mod context;
pub mod error;
pub mod qis;
pub mod rt;
pub mod tracing_config;
pub mod tracker;

pub use config::{LeakPolicy, RuntimeConfig};
pub use context::{ExecutionContext, Scope, run_program};
pub use error::{RuntimeError, RuntimeResult};
pub use tracker::{AllocationTracker, LeakReport};
