//! End-to-end programs run through the runtime.

use std::sync::Arc;
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};

use qirt_adapter_sim::{ResultMode, ToffoliSimulator};
use qirt_ir::QubitId;
use qirt_runtime::rt::{CallArgs, Callable, Operation, QirArray, QirArrayNd, QirRange};
use qirt_runtime::{
    ExecutionContext, LeakPolicy, RuntimeConfig, RuntimeError, RuntimeResult, qis, rt,
};

fn strict() -> RuntimeConfig {
    RuntimeConfig {
        leak_policy: LeakPolicy::Fail,
        ..RuntimeConfig::default()
    }
}

// ============================================================================
// Arrays
// ============================================================================

/// Writes `value` at `index`, then sums every other element from `index`
/// back to the start followed by every element from `index` to the end.
fn sum_around(array: &QirArray<i64>, index: i64, value: i64) -> RuntimeResult<i64> {
    let mut copy = array.clone();
    copy.set(index, value)?;

    let backwards = copy.slice_1d(&QirRange::new(index, -2, 0)?)?;
    let forwards = copy.slice_1d(&QirRange::inclusive(index, copy.len() as i64 - 1))?;
    Ok(backwards.concatenate(&forwards).iter().sum())
}

#[test]
fn test_one_dimensional_arrays() {
    let mut ctx = ExecutionContext::new(strict());
    let scope = ctx.scoped_classical(true);

    let array = QirArray::from_vec(vec![0, 1, 2, 3, 4]);
    let sum = sum_around(&array, 2, 42).unwrap();

    assert_eq!(sum, 91);
    assert_eq!(array.as_slice(), &[0, 1, 2, 3, 4]);
    assert!(scope.finish().unwrap().is_clean());
}

#[test]
fn test_array_index_out_of_range() {
    let array = QirArray::from_vec(vec![0, 1, 2]);
    let err = sum_around(&array, 3, 1).unwrap_err();
    assert!(matches!(err, RuntimeError::IndexOutOfRange { index: 3, len: 3 }));
}

/// Writes `value` into a `dim0 x dim1 x dim2` array at `[1, 1, 1]`, projects
/// on index 1 of the middle dimension and reads `[1, 1]` back from the
/// projection. Returns that value plus the mean of the projection's sizes.
fn multidim_arrays(value: i8, dim0: usize, dim1: usize, dim2: usize) -> RuntimeResult<i64> {
    let mut cube = QirArrayNd::create(&[dim0, dim1, dim2], 0_i8);
    cube.set(&[1, 1, 1], value)?;

    let plane = cube.project(1, 1)?;
    let dims = plane.dims();
    let mean = (dims[0] + dims[1]) as i64 / 2;
    Ok(i64::from(*plane.get(&[1, 1])?) + mean)
}

#[test]
fn test_multidimensional_arrays() {
    let mut ctx = ExecutionContext::new(strict());
    let scope = ctx.scoped_classical(true);

    assert_eq!(multidim_arrays(42, 2, 4, 8).unwrap(), 42 + (2 + 8) / 2);
    assert_eq!(multidim_arrays(17, 3, 5, 7).unwrap(), 17 + (3 + 7) / 2);
    assert!(scope.finish().unwrap().is_clean());
}

#[test]
fn test_multidimensional_array_too_small() {
    let err = multidim_arrays(1, 2, 1, 2).unwrap_err();
    assert!(matches!(err, RuntimeError::IndexOutOfRange { index: 1, len: 1 }));
}

// ============================================================================
// Partial application
// ============================================================================

/// An operation that stores `a - b`.
fn subtract(out: &Arc<AtomicI64>) -> Callable<(i64, i64)> {
    let out = out.clone();
    Callable::new(Operation::new("Subtract", move |_ctx, (a, b): (i64, i64)| {
        out.store(a - b, Ordering::SeqCst);
        Ok(())
    }))
}

#[test]
fn test_partial_application() {
    let out = Arc::new(AtomicI64::new(0));
    let mut ctx = ExecutionContext::new(strict());
    let mut scope = ctx.scoped_classical(true);

    let from_42 = subtract(&out).partial(42_i64, |a: &i64, b: i64| (*a, b));
    from_42.invoke(&mut scope, CallArgs::new(17)).unwrap();
    assert_eq!(out.load(Ordering::SeqCst), 42 - 17);

    // The captured value is reused on every call.
    from_42.invoke(&mut scope, CallArgs::new(50)).unwrap();
    assert_eq!(out.load(Ordering::SeqCst), -8);
    assert!(scope.finish().unwrap().is_clean());
}

// ============================================================================
// Functors
// ============================================================================

#[derive(Default)]
struct KCalls {
    direct: AtomicUsize,
    controlled: AtomicUsize,
}

/// A hand-written intrinsic `K` that behaves like X and counts its calls.
fn k_operation(calls: &Arc<KCalls>) -> Callable<QubitId> {
    let (body, adj, ctl, ctladj) = (calls.clone(), calls.clone(), calls.clone(), calls.clone());
    Callable::new(
        Operation::new("K", move |ctx, q: QubitId| {
            body.direct.fetch_add(1, Ordering::SeqCst);
            qis::x_body(ctx, q)
        })
        .with_adjoint(move |ctx, q: QubitId| {
            adj.direct.fetch_add(1, Ordering::SeqCst);
            qis::x_body(ctx, q)
        })
        .with_controlled(move |ctx, controls: &QirArray<QubitId>, q: QubitId| {
            ctl.controlled.fetch_add(1, Ordering::SeqCst);
            qis::x_ctl(ctx, controls, q)
        })
        .with_controlled_adjoint(move |ctx, controls: &QirArray<QubitId>, q: QubitId| {
            ctladj.controlled.fetch_add(1, Ordering::SeqCst);
            qis::x_ctl(ctx, controls, q)
        }),
    )
}

fn expect_state(ctx: &mut ExecutionContext<'_>, q: QubitId, one: bool) -> RuntimeResult<()> {
    let r = qis::m_body(ctx, q)?;
    let expected = if one {
        rt::result_get_one(ctx)?
    } else {
        rt::result_get_zero(ctx)?
    };
    let matches = rt::result_equal(ctx, r, expected)?;
    rt::result_release(ctx, r)?;
    if matches {
        Ok(())
    } else {
        Err(rt::fail(format!("{q} is not in the expected state")))
    }
}

fn functors_program(ctx: &mut ExecutionContext<'_>, k: &Callable<QubitId>) -> RuntimeResult<()> {
    let controls = rt::qubit_allocate_array(ctx, 3)?;
    let target = rt::qubit_allocate(ctx)?;
    for c in &controls {
        qis::x_body(ctx, *c)?;
    }
    let c = |i: i64| controls.get(i).copied();

    k.invoke(ctx, CallArgs::new(target))?;
    k.adjoint().invoke(ctx, CallArgs::new(target))?;
    k.adjoint().adjoint().invoke(ctx, CallArgs::new(target))?;
    expect_state(ctx, target, true)?;

    k.controlled()
        .invoke(ctx, CallArgs::new(target).with_controls(vec![c(0)?]))?;
    k.controlled()
        .adjoint()
        .invoke(ctx, CallArgs::new(target).with_controls(vec![c(1)?]))?;
    k.controlled().controlled().invoke(
        ctx,
        CallArgs::new(target)
            .with_controls(vec![c(0)?])
            .with_controls(vec![c(1)?]),
    )?;
    k.adjoint().controlled().controlled().invoke(
        ctx,
        CallArgs::new(target)
            .with_controls(vec![c(0)?, c(1)?])
            .with_controls(vec![c(2)?]),
    )?;
    expect_state(ctx, target, true)?;

    // One inactive control: the call happens but the target stays put.
    qis::x_body(ctx, c(2)?)?;
    k.controlled()
        .invoke(ctx, CallArgs::new(target).with_controls(vec![c(2)?, c(0)?]))?;
    expect_state(ctx, target, true)?;

    rt::qubit_release(ctx, target)?;
    rt::qubit_release_array(ctx, &controls)
}

#[test]
fn test_nested_controlled_functors() {
    let calls = Arc::new(KCalls::default());
    let k = k_operation(&calls);
    let mut sim = ToffoliSimulator::with_mode(ResultMode::Canonical);
    let mut ctx = ExecutionContext::new(strict());

    let mut scope = ctx.scoped(&mut sim, true);
    functors_program(&mut scope, &k).unwrap();
    assert!(scope.finish().unwrap().is_clean());

    assert_eq!(calls.direct.load(Ordering::SeqCst), 3);
    assert_eq!(calls.controlled.load(Ordering::SeqCst), 5);
    assert_eq!(sim.live_qubits(), 0);
}

#[test]
fn test_controlled_without_controls() {
    let calls = Arc::new(KCalls::default());
    let k = k_operation(&calls);
    let mut sim = ToffoliSimulator::new();
    let mut ctx = ExecutionContext::new(strict());

    let mut scope = ctx.scoped(&mut sim, true);
    let target = rt::qubit_allocate(&mut scope).unwrap();
    // An empty control list always applies the base gate.
    k.controlled()
        .invoke(
            &mut scope,
            CallArgs::new(target).with_controls(Vec::<QubitId>::new()),
        )
        .unwrap();
    expect_state(&mut scope, target, true).unwrap();
    k.controlled()
        .adjoint()
        .invoke(
            &mut scope,
            CallArgs::new(target).with_controls(Vec::<QubitId>::new()),
        )
        .unwrap();
    expect_state(&mut scope, target, false).unwrap();
    rt::qubit_release(&mut scope, target).unwrap();
    assert!(scope.finish().unwrap().is_clean());

    assert_eq!(calls.direct.load(Ordering::SeqCst), 0);
    assert_eq!(calls.controlled.load(Ordering::SeqCst), 2);
}

// ============================================================================
// Qubit and result management
// ============================================================================

fn qubit_result_management(ctx: &mut ExecutionContext<'_>) -> RuntimeResult<()> {
    let qs = rt::qubit_allocate_array(ctx, 2)?;
    qis::x_body(ctx, *qs.get(1)?)?;
    let q = rt::qubit_allocate(ctx)?;

    let one = rt::result_get_one(ctx)?;
    let r1 = qis::m_body(ctx, *qs.get(1)?)?;
    if rt::result_equal(ctx, r1, one)? {
        qis::x_body(ctx, q)?;
    }

    let r0 = qis::m_body(ctx, *qs.get(0)?)?;
    let rq = qis::m_body(ctx, q)?;
    let unexpected = rt::result_equal(ctx, r0, rq)?;

    for r in [r1, r0, rq] {
        rt::result_release(ctx, r)?;
    }
    if unexpected {
        return Err(rt::fail("Unexpected measurement result"));
    }

    rt::qubit_release(ctx, q)?;
    rt::qubit_release_array(ctx, &qs)
}

#[test]
fn test_qubit_result_management() {
    let mut sim = ToffoliSimulator::new();
    let mut ctx = ExecutionContext::new(strict());

    let mut scope = ctx.scoped(&mut sim, true);
    qubit_result_management(&mut scope).unwrap();
    let report = scope.finish().unwrap();

    assert!(report.is_clean());
    assert_eq!(sim.live_qubits(), 0);
    assert_eq!(sim.live_results(), 0);
}

// ============================================================================
// Failure
// ============================================================================

fn fail_with_range(start: i64, step: i64, end: i64) -> RuntimeResult<()> {
    let range = QirRange::new(start, step, end)?;
    Err(rt::fail(range.to_string()))
}

#[test]
fn test_range_in_failure_message() {
    let mut ctx = ExecutionContext::new(strict());
    let scope = ctx.scoped_classical(true);

    let err = fail_with_range(0, 5, 42).unwrap_err();
    assert!(matches!(err, RuntimeError::Fail(_)));
    assert_eq!(err.to_string(), "0..5..42");
    scope.finish().unwrap();
}

#[test]
fn test_failure_leaves_handles_for_teardown() {
    let mut sim = ToffoliSimulator::new();
    let mut ctx = ExecutionContext::new(strict());

    let result = qirt_runtime::run_program(&mut ctx, &mut sim, true, |ctx| {
        let q = rt::qubit_allocate(ctx)?;
        qis::x_body(ctx, q)?;
        fail_with_range(1, 1, 3)
    });

    assert_eq!(result.unwrap_err().to_string(), "1..1..3");
    assert_eq!(ctx.depth(), 0);
    // No reclaim configured: the qubit is still live in the backend.
    assert_eq!(sim.live_qubits(), 1);
}
