//! qirt Simulator Backends
//!
//! Backends a QIR program can be run against, all implementing
//! [`qirt_hal::Backend`].
//!
//! # Backends
//!
//! | Name | Type | Simulates | Notes |
//! |------|------|-----------|-------|
//! | `fullstate` | [`FullStateSimulator`] | Full statevector | Exact, ~24 live qubits |
//! | `toffoli` | [`ToffoliSimulator`] | Classical bits | X/Y and diagonal gates only |
//! | `tracer` | [`TracerBackend`] | Nothing | Counts gates, width and depth |
//! | `stub` | [`qirt_hal::StubBackend`] | Nothing | Every operation unsupported |
//!
//! # Memory
//!
//! | Live qubits | Statevector |
//! |-------------|-------------|
//! | 10 | ~16 KB |
//! | 20 | ~16 MB |
//! | 24 | ~256 MB |
//!
//! # Example
//!
//! ```rust
//! use qirt_adapter_sim::register_builtins;
//! use qirt_hal::{BackendConfig, BackendRegistry};
//! use qirt_ir::{Gate, Pauli};
//!
//! let mut registry = BackendRegistry::new();
//! register_builtins(&mut registry);
//!
//! let config = BackendConfig::new("fullstate").with_extra("seed", serde_json::json!(1));
//! let mut backend = registry.create(config).unwrap();
//!
//! let q = backend.allocate_qubit().unwrap();
//! backend.apply(Gate::X, q).unwrap();
//! let r = backend.measure(&[Pauli::Z], &[q]).unwrap();
//! assert!(backend.result_value(r).unwrap());
//! backend.release_result(r).unwrap();
//! backend.release_qubit(q).unwrap();
//! ```

mod fullstate;
pub mod statevector;
mod toffoli;
mod tracer;

pub use fullstate::{DEFAULT_MAX_QUBITS, FullStateSimulator, MAX_ADDRESSABLE_QUBITS};
pub use statevector::Statevector;
pub use toffoli::{ResultMode, ToffoliSimulator};
pub use tracer::{TraceMetrics, TracerBackend};

use qirt_hal::{BackendRegistry, StubBackend};

/// Register every built-in backend under its default name.
pub fn register_builtins(registry: &mut BackendRegistry) {
    registry.register::<StubBackend>("stub");
    registry.register::<ToffoliSimulator>("toffoli");
    registry.register::<FullStateSimulator>("fullstate");
    registry.register::<TracerBackend>("tracer");
}
