//! Demo programs.
//!
//! Each program allocates what it needs, returns every qubit to `|0⟩` and
//! releases all handles before returning, so it runs clean under
//! `LeakPolicy::Fail`.

use qirt_ir::QubitId;
use qirt_runtime::{ExecutionContext, RuntimeResult, qis, rt};

/// Measure `qubit` in Z, release the result and return the bit.
pub fn measure_bit(ctx: &mut ExecutionContext<'_>, qubit: QubitId) -> RuntimeResult<bool> {
    let result = qis::m_body(ctx, qubit)?;
    let one = rt::result_get_one(ctx)?;
    let bit = rt::result_equal(ctx, result, one)?;
    rt::result_release(ctx, result)?;
    Ok(bit)
}

/// Prepare `(|00⟩ + |11⟩)/√2` and measure both qubits.
pub fn bell_pair(ctx: &mut ExecutionContext<'_>) -> RuntimeResult<(bool, bool)> {
    let qs = rt::qubit_allocate_array(ctx, 2)?;
    let (a, b) = (*qs.get(0)?, *qs.get(1)?);

    qis::h_body(ctx, a)?;
    qis::cnot_body(ctx, a, b)?;
    let bits = (measure_bit(ctx, a)?, measure_bit(ctx, b)?);

    qis::reset_body(ctx, a)?;
    qis::reset_body(ctx, b)?;
    rt::qubit_release_array(ctx, &qs)?;
    Ok(bits)
}

/// Prepare an `n`-qubit GHZ state and measure every qubit.
pub fn ghz(ctx: &mut ExecutionContext<'_>, n: usize) -> RuntimeResult<Vec<bool>> {
    if n == 0 {
        return Err(rt::fail("GHZ state needs at least one qubit"));
    }
    let qs = rt::qubit_allocate_array(ctx, n)?;
    qis::h_body(ctx, *qs.get(0)?)?;
    for pair in qs.as_slice().windows(2) {
        qis::cnot_body(ctx, pair[0], pair[1])?;
    }

    let mut bits = Vec::with_capacity(n);
    for q in &qs {
        bits.push(measure_bit(ctx, *q)?);
        qis::reset_body(ctx, *q)?;
    }
    rt::qubit_release_array(ctx, &qs)?;
    Ok(bits)
}

/// Teleport `Rx(theta)|0⟩` from one qubit to another and measure the
/// receiving qubit.
pub fn teleport(ctx: &mut ExecutionContext<'_>, theta: f64) -> RuntimeResult<bool> {
    let qs = rt::qubit_allocate_array(ctx, 3)?;
    let (message, alice, bob) = (*qs.get(0)?, *qs.get(1)?, *qs.get(2)?);

    qis::rx_body(ctx, theta, message)?;
    qis::h_body(ctx, alice)?;
    qis::cnot_body(ctx, alice, bob)?;

    qis::cnot_body(ctx, message, alice)?;
    qis::h_body(ctx, message)?;
    if measure_bit(ctx, alice)? {
        qis::x_body(ctx, bob)?;
    }
    if measure_bit(ctx, message)? {
        qis::z_body(ctx, bob)?;
    }
    let received = measure_bit(ctx, bob)?;

    for q in &qs {
        qis::reset_body(ctx, *q)?;
    }
    rt::qubit_release_array(ctx, &qs)?;
    Ok(received)
}
