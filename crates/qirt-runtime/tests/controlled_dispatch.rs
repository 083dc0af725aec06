//! Controlled gates apply their base gate only when every control is set.

use proptest::prelude::*;
use qirt_adapter_sim::{FullStateSimulator, ToffoliSimulator};
use qirt_hal::{Backend, HalResult, check_distinct};
use qirt_ir::{Gate, Pauli, QubitId, ResultId};
use qirt_runtime::rt::QirArray;
use qirt_runtime::{ExecutionContext, RuntimeConfig, qis, rt};

/// Wraps a Toffoli simulator and counts base-gate applications of
/// controlled calls.
struct Counting {
    inner: ToffoliSimulator,
    base_applications: usize,
}

impl Counting {
    fn new() -> Self {
        Self {
            inner: ToffoliSimulator::new(),
            base_applications: 0,
        }
    }
}

impl Backend for Counting {
    fn name(&self) -> &str {
        "counting"
    }

    fn allocate_qubit(&mut self) -> HalResult<QubitId> {
        self.inner.allocate_qubit()
    }

    fn release_qubit(&mut self, qubit: QubitId) -> HalResult<()> {
        self.inner.release_qubit(qubit)
    }

    fn apply(&mut self, gate: Gate, target: QubitId) -> HalResult<()> {
        self.inner.apply(gate, target)
    }

    fn apply_controlled(
        &mut self,
        gate: Gate,
        controls: &[QubitId],
        target: QubitId,
    ) -> HalResult<()> {
        check_distinct(controls, target)?;
        self.inner.qubit_state(target)?;
        let mut active = true;
        for c in controls {
            active &= self.inner.qubit_state(*c)?;
        }
        if active {
            self.base_applications += 1;
            self.inner.apply(gate, target)?;
        }
        Ok(())
    }

    fn measure(&mut self, bases: &[Pauli], targets: &[QubitId]) -> HalResult<ResultId> {
        self.inner.measure(bases, targets)
    }

    fn release_result(&mut self, result: ResultId) -> HalResult<()> {
        self.inner.release_result(result)
    }

    fn are_equal_results(&self, r1: ResultId, r2: ResultId) -> HalResult<bool> {
        self.inner.are_equal_results(r1, r2)
    }

    fn use_zero(&self) -> ResultId {
        self.inner.use_zero()
    }

    fn use_one(&self) -> ResultId {
        self.inner.use_one()
    }
}

#[test]
fn test_all_active_controls_apply_once() {
    let mut backend = Counting::new();
    let mut ctx = ExecutionContext::new(RuntimeConfig::default());
    let mut scope = ctx.scoped(&mut backend, true);

    let controls = rt::qubit_allocate_array(&mut scope, 3).unwrap();
    let target = rt::qubit_allocate(&mut scope).unwrap();
    for c in &controls {
        qis::x_body(&mut scope, *c).unwrap();
    }
    qis::x_ctl(&mut scope, &controls, target).unwrap();

    rt::qubit_release(&mut scope, target).unwrap();
    rt::qubit_release_array(&mut scope, &controls).unwrap();
    scope.finish().unwrap();

    assert_eq!(backend.base_applications, 1);
}

#[test]
fn test_inactive_control_applies_nothing() {
    let mut backend = Counting::new();
    let mut ctx = ExecutionContext::new(RuntimeConfig::default());
    let mut scope = ctx.scoped(&mut backend, false);

    let a = rt::qubit_allocate(&mut scope).unwrap();
    let b = rt::qubit_allocate(&mut scope).unwrap();
    let target = rt::qubit_allocate(&mut scope).unwrap();
    qis::x_body(&mut scope, a).unwrap();
    qis::x_ctl(&mut scope, &QirArray::from_vec(vec![a, b]), target).unwrap();
    scope.finish().unwrap();

    assert_eq!(backend.base_applications, 0);
    assert!(!backend.inner.qubit_state(target).unwrap());
    assert!(backend.inner.qubit_state(a).unwrap());
}

#[test]
fn test_target_among_controls_is_rejected() {
    let mut sim = ToffoliSimulator::new();
    let mut ctx = ExecutionContext::new(RuntimeConfig::default());
    let mut scope = ctx.scoped(&mut sim, false);

    let a = rt::qubit_allocate(&mut scope).unwrap();
    let err = qis::x_ctl(&mut scope, &QirArray::from_vec(vec![a]), a).unwrap_err();
    assert!(err.is_contract_violation());
}

proptest! {
    #[test]
    fn base_gate_applies_only_with_all_controls(
        active in proptest::collection::vec(any::<bool>(), 0..6),
    ) {
        let mut backend = Counting::new();
        let mut ctx = ExecutionContext::new(RuntimeConfig::default());
        let mut scope = ctx.scoped(&mut backend, false);

        let controls = rt::qubit_allocate_array(&mut scope, active.len()).unwrap();
        let target = rt::qubit_allocate(&mut scope).unwrap();
        for (c, on) in controls.iter().zip(&active) {
            if *on {
                qis::x_body(&mut scope, *c).unwrap();
            }
        }
        qis::x_ctl(&mut scope, &controls, target).unwrap();
        scope.finish().unwrap();

        let all = active.iter().all(|on| *on);
        prop_assert_eq!(backend.base_applications, usize::from(all));
        prop_assert_eq!(backend.inner.qubit_state(target).unwrap(), all);
        for (c, on) in controls.iter().zip(&active) {
            prop_assert_eq!(backend.inner.qubit_state(*c).unwrap(), *on);
        }
    }

    /// The state-vector simulator agrees: the target is flipped exactly when
    /// every control is set.
    #[test]
    fn fullstate_controlled_x_matches(active in proptest::collection::vec(any::<bool>(), 0..5)) {
        let mut sim = FullStateSimulator::with_seed(5);
        let mut ctx = ExecutionContext::new(RuntimeConfig::default());
        let mut scope = ctx.scoped(&mut sim, false);

        let controls = rt::qubit_allocate_array(&mut scope, active.len()).unwrap();
        let target = rt::qubit_allocate(&mut scope).unwrap();
        for (c, on) in controls.iter().zip(&active) {
            if *on {
                qis::x_body(&mut scope, *c).unwrap();
            }
        }
        qis::x_ctl(&mut scope, &controls, target).unwrap();
        scope.finish().unwrap();

        let expected = if active.iter().all(|on| *on) { 1.0 } else { 0.0 };
        let p = sim.probability_one(target).unwrap();
        prop_assert!((p - expected).abs() < 1e-9);
    }
}
