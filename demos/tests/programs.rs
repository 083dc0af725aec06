//! Integration tests for the demo programs.
//!
//! Programs run under `LeakPolicy::Fail`, so a clean finish also checks
//! that they release everything they allocate.

use qirt_adapter_sim::{FullStateSimulator, ToffoliSimulator, TracerBackend};
use qirt_demos::programs::{bell_pair, ghz, measure_bit, teleport};
use qirt_runtime::{ExecutionContext, LeakPolicy, RuntimeConfig, qis, rt, run_program};

fn strict() -> RuntimeConfig {
    RuntimeConfig {
        leak_policy: LeakPolicy::Fail,
        ..RuntimeConfig::default()
    }
}

#[test]
fn test_bell_pair_is_correlated() {
    let mut sim = FullStateSimulator::with_seed(42);
    let mut ctx = ExecutionContext::new(strict());

    let (pairs, report) = run_program(&mut ctx, &mut sim, true, |ctx| {
        (0..50).map(|_| bell_pair(ctx)).collect::<Result<Vec<_>, _>>()
    })
    .unwrap();

    assert!(pairs.iter().all(|(a, b)| a == b));
    assert!(pairs.iter().any(|(a, _)| *a));
    assert!(pairs.iter().any(|(a, _)| !*a));
    assert!(report.is_clean());
    assert_eq!(sim.num_qubits(), 0);
}

#[test]
fn test_ghz_bits_agree() {
    let mut sim = FullStateSimulator::with_seed(7);
    let mut ctx = ExecutionContext::new(strict());

    let (bits, _) = run_program(&mut ctx, &mut sim, true, |ctx| ghz(ctx, 5)).unwrap();
    assert_eq!(bits.len(), 5);
    assert!(bits.iter().all(|b| *b == bits[0]));
}

#[test]
fn test_ghz_needs_a_qubit() {
    let mut sim = FullStateSimulator::with_seed(7);
    let mut ctx = ExecutionContext::new(strict());

    let err = run_program(&mut ctx, &mut sim, true, |ctx| ghz(ctx, 0)).unwrap_err();
    assert_eq!(err.to_string(), "GHZ state needs at least one qubit");
}

#[test]
fn test_teleport_basis_states() {
    let mut sim = FullStateSimulator::with_seed(3);
    let mut ctx = ExecutionContext::new(strict());

    let ((zeros, ones), report) = run_program(&mut ctx, &mut sim, true, |ctx| {
        let mut zeros = Vec::new();
        let mut ones = Vec::new();
        for _ in 0..20 {
            zeros.push(teleport(ctx, 0.0)?);
            ones.push(teleport(ctx, std::f64::consts::PI)?);
        }
        Ok((zeros, ones))
    })
    .unwrap();

    assert!(zeros.iter().all(|b| !*b));
    assert!(ones.iter().all(|b| *b));
    assert!(report.is_clean());
}

#[test]
fn test_measure_bit_on_classical_backend() {
    let mut sim = ToffoliSimulator::new();
    let mut ctx = ExecutionContext::new(strict());

    let (bits, report) = run_program(&mut ctx, &mut sim, true, |ctx| {
        let q = rt::qubit_allocate(ctx)?;
        let before = measure_bit(ctx, q)?;
        qis::x_body(ctx, q)?;
        let after = measure_bit(ctx, q)?;
        rt::qubit_release(ctx, q)?;
        Ok((before, after))
    })
    .unwrap();

    assert_eq!(bits, (false, true));
    assert!(report.is_clean());
    assert_eq!(sim.live_results(), 0);
}

#[test]
fn test_traced_ghz_metrics() {
    let mut tracer = TracerBackend::new();
    let mut ctx = ExecutionContext::new(strict());

    run_program(&mut ctx, &mut tracer, true, |ctx| ghz(ctx, 4)).unwrap();
    let metrics = tracer.metrics();

    assert_eq!(metrics.qubits_allocated, 4);
    assert_eq!(metrics.peak_width, 4);
    // One measurement per qubit plus one per reset.
    assert_eq!(metrics.measurements, 8);
    assert_eq!(metrics.controlled_counts.get("x"), Some(&3));
}
