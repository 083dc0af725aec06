//! qirt intermediate types
//!
//! The vocabulary shared between compiled QIR programs, the execution
//! context and every simulator backend:
//!
//! - [`QubitId`] / [`ResultId`]: opaque handles naming a qubit slot or a
//!   measurement outcome. They replace the pointer-sized tokens that
//!   compiled programs pass around.
//! - [`Pauli`]: measurement bases, with the QIR numeric encoding.
//! - [`Gate`]: the intrinsic gate set a backend may be asked to apply.
//!
//! # Example
//!
//! ```rust
//! use qirt_ir::{Gate, QubitId, ResultId};
//!
//! let q = QubitId(3);
//! assert_eq!(q.to_string(), "q3");
//!
//! assert_ne!(ResultId::ZERO, ResultId::ONE);
//! assert_eq!(Gate::S.adjoint(), Gate::Sdg);
//! assert_eq!(Gate::from_name("rz", &[0.5]).unwrap(), Gate::Rz(0.5));
//! ```

pub mod error;
pub mod gate;
pub mod handle;
pub mod pauli;

pub use error::{IrError, IrResult};
pub use gate::Gate;
pub use handle::{Handle, QubitId, ResultId};
pub use pauli::Pauli;
