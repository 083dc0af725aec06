//! Runtime support calls (`__quantum__rt__*`).
//!
//! Qubit and result management goes through the [`ExecutionContext`] so
//! that allocation tracking sees every handle.

pub mod array;
pub mod array_nd;
pub mod callable;
pub mod range;

pub use array::QirArray;
pub use array_nd::QirArrayNd;
pub use callable::{CallArgs, Callable, Operation};
pub use range::QirRange;

use qirt_ir::{QubitId, ResultId};
use tracing::{debug, warn};

use crate::context::ExecutionContext;
use crate::error::{RuntimeError, RuntimeResult};

/// Abort the program with `message`.
///
/// Returns the error rather than unwinding; programs propagate it with `?`.
pub fn fail(message: impl Into<String>) -> RuntimeError {
    let message = message.into();
    debug!("Program failed: {}", message);
    RuntimeError::Fail(message)
}

/// Allocate one qubit.
pub fn qubit_allocate(ctx: &mut ExecutionContext<'_>) -> RuntimeResult<QubitId> {
    ctx.allocate_qubit()
}

/// Allocate `count` qubits.
///
/// If an allocation fails, the qubits allocated so far are released again
/// and the allocation error is returned. Release failures during that
/// rollback are logged.
pub fn qubit_allocate_array(
    ctx: &mut ExecutionContext<'_>,
    count: usize,
) -> RuntimeResult<QirArray<QubitId>> {
    let mut qubits = Vec::with_capacity(count);
    for _ in 0..count {
        match ctx.allocate_qubit() {
            Ok(q) => qubits.push(q),
            Err(e) => {
                for q in qubits {
                    if let Err(release_err) = ctx.release_qubit(q) {
                        warn!("Rollback could not release {}: {}", q, release_err);
                    }
                }
                return Err(e);
            }
        }
    }
    Ok(QirArray::from_vec(qubits))
}

/// Release one qubit.
pub fn qubit_release(ctx: &mut ExecutionContext<'_>, qubit: QubitId) -> RuntimeResult<()> {
    ctx.release_qubit(qubit)
}

/// Release every qubit of an array.
pub fn qubit_release_array(
    ctx: &mut ExecutionContext<'_>,
    qubits: &QirArray<QubitId>,
) -> RuntimeResult<()> {
    for q in qubits {
        ctx.release_qubit(*q)?;
    }
    Ok(())
}

/// Compare two results.
pub fn result_equal(ctx: &ExecutionContext<'_>, r1: ResultId, r2: ResultId) -> RuntimeResult<bool> {
    ctx.are_equal_results(r1, r2)
}

/// The `Zero` constant of the current backend.
pub fn result_get_zero(ctx: &ExecutionContext<'_>) -> RuntimeResult<ResultId> {
    Ok(ctx.backend()?.use_zero())
}

/// The `One` constant of the current backend.
pub fn result_get_one(ctx: &ExecutionContext<'_>) -> RuntimeResult<ResultId> {
    Ok(ctx.backend()?.use_one())
}

/// Release a result. Releasing a constant is a no-op.
pub fn result_release(ctx: &mut ExecutionContext<'_>, result: ResultId) -> RuntimeResult<()> {
    ctx.release_result(result)
}
