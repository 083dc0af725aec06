//! Full-state simulator backend.

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, instrument, trace};

use qirt_hal::{
    Backend, BackendConfig, BackendFactory, HalError, HalResult, HandleTable, check_distinct,
    single_measurement,
};
use qirt_ir::{Gate, Pauli, QubitId, ResultId};

use crate::statevector::Statevector;

/// Default cap on simultaneously live qubits.
pub const DEFAULT_MAX_QUBITS: usize = 24;

/// Largest qubit cap for which a basis index still fits in a `usize`.
pub const MAX_ADDRESSABLE_QUBITS: usize = usize::BITS as usize - 1;

/// Statevector simulator with dynamic qubit allocation.
///
/// Every live qubit occupies one bit position of the statevector.
/// Releasing a qubit measures it, resets it to `|0⟩` and removes it from
/// the state, so memory tracks the number of live qubits.
pub struct FullStateSimulator {
    name: String,
    state: Statevector,
    /// Qubit handle to bit position.
    qubits: HandleTable<QubitId, usize>,
    /// Result handle to recorded outcome.
    results: HandleTable<ResultId, bool>,
    rng: StdRng,
    max_qubits: usize,
}

impl FullStateSimulator {
    /// Create a simulator seeded from system entropy.
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Create a simulator with a fixed seed, for reproducible runs.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            name: "fullstate".to_string(),
            state: Statevector::new(0),
            qubits: HandleTable::new(),
            results: HandleTable::new().with_base(ResultId::FIRST_DYNAMIC),
            rng,
            max_qubits: DEFAULT_MAX_QUBITS,
        }
    }

    /// Recycle released qubit handles.
    pub fn with_qubit_reuse(mut self) -> Self {
        self.qubits = HandleTable::with_reuse();
        self
    }

    /// Cap the number of simultaneously live qubits.
    ///
    /// Values above [`MAX_ADDRESSABLE_QUBITS`] are clamped to it.
    pub fn with_max_qubits(mut self, max_qubits: usize) -> Self {
        self.max_qubits = max_qubits.min(MAX_ADDRESSABLE_QUBITS);
        self
    }

    /// Number of live qubits.
    pub fn num_qubits(&self) -> usize {
        self.qubits.live_count()
    }

    /// Number of live (non-constant) results.
    pub fn num_results(&self) -> usize {
        self.results.live_count()
    }

    /// Probability of measuring `qubit` as `|1⟩`, without collapsing it.
    pub fn probability_one(&self, qubit: QubitId) -> HalResult<f64> {
        let position = *self.qubits.get(qubit, "probability_one")?;
        Ok(self.state.probability_one(position))
    }

    fn value(&self, result: ResultId, operation: &'static str) -> HalResult<bool> {
        match result.constant_value() {
            Some(bit) => Ok(bit),
            None => self.results.get(result, operation).copied(),
        }
    }

    /// Measure the qubit at `position` in `basis` and leave it in the
    /// corresponding eigenstate.
    fn measure_position(&mut self, position: usize, basis: Pauli) -> bool {
        match basis {
            Pauli::I => false,
            Pauli::Z => self.state.measure(position, &mut self.rng),
            Pauli::X => {
                self.state.apply_gate(Gate::H, 0, position);
                let bit = self.state.measure(position, &mut self.rng);
                self.state.apply_gate(Gate::H, 0, position);
                bit
            }
            Pauli::Y => {
                self.state.apply_gate(Gate::Sdg, 0, position);
                self.state.apply_gate(Gate::H, 0, position);
                let bit = self.state.measure(position, &mut self.rng);
                self.state.apply_gate(Gate::H, 0, position);
                self.state.apply_gate(Gate::S, 0, position);
                bit
            }
        }
    }
}

impl Default for FullStateSimulator {
    fn default() -> Self {
        Self::new()
    }
}

impl Backend for FullStateSimulator {
    fn name(&self) -> &str {
        &self.name
    }

    fn allocate_qubit(&mut self) -> HalResult<QubitId> {
        if self.qubits.live_count() >= self.max_qubits {
            return Err(HalError::unsupported(
                &self.name,
                format!("allocate_qubit beyond {} live qubits", self.max_qubits),
            ));
        }
        let position = self.state.add_qubit();
        let qubit = self.qubits.insert(position);
        debug!("Allocated {} at position {}", qubit, position);
        Ok(qubit)
    }

    #[instrument(skip(self))]
    fn release_qubit(&mut self, qubit: QubitId) -> HalResult<()> {
        let position = self.qubits.release(qubit, "release_qubit")?;

        if self.state.measure(position, &mut self.rng) {
            self.state.apply_gate(Gate::X, 0, position);
        }
        self.state.remove_qubit(position);

        for p in self.qubits.values_mut() {
            if *p > position {
                *p -= 1;
            }
        }
        debug!("Released {}, {} qubits remain", qubit, self.state.num_qubits());
        Ok(())
    }

    fn apply(&mut self, gate: Gate, target: QubitId) -> HalResult<()> {
        let position = *self.qubits.get(target, "apply")?;
        trace!("{} {}", gate, target);
        self.state.apply_gate(gate, 0, position);
        Ok(())
    }

    fn apply_controlled(
        &mut self,
        gate: Gate,
        controls: &[QubitId],
        target: QubitId,
    ) -> HalResult<()> {
        let position = *self.qubits.get(target, "apply_controlled")?;
        let mut mask = 0;
        for control in controls {
            mask |= 1 << *self.qubits.get(*control, "apply_controlled")?;
        }
        check_distinct(controls, target)?;

        trace!("c{} {:?} -> {}", gate, controls, target);
        self.state.apply_gate(gate, mask, position);
        Ok(())
    }

    fn measure(&mut self, bases: &[Pauli], targets: &[QubitId]) -> HalResult<ResultId> {
        let (basis, target) = single_measurement(&self.name, bases, targets)?;
        let position = *self.qubits.get(target, "measure")?;
        let bit = self.measure_position(position, basis);
        let result = self.results.insert(bit);
        trace!("measure {} {} -> {} ({})", basis, target, result, bit);
        Ok(result)
    }

    fn are_equal_results(&self, r1: ResultId, r2: ResultId) -> HalResult<bool> {
        Ok(self.value(r1, "result_equal")? == self.value(r2, "result_equal")?)
    }

    fn release_result(&mut self, result: ResultId) -> HalResult<()> {
        if result.is_constant() {
            return Ok(());
        }
        self.results.release(result, "release_result").map(|_| ())
    }

    fn result_value(&self, result: ResultId) -> HalResult<bool> {
        self.value(result, "result_value")
    }
}

impl BackendFactory for FullStateSimulator {
    fn from_config(config: BackendConfig) -> HalResult<Self> {
        let mut sim = match config.extra_u64("seed") {
            Some(seed) => Self::with_seed(seed),
            None => Self::new(),
        };
        if config.extra_bool("reuse_qubits").unwrap_or(false) {
            sim = sim.with_qubit_reuse();
        }
        if let Some(max) = config.extra_u64("max_qubits") {
            let max = usize::try_from(max)
                .ok()
                .filter(|max| *max <= MAX_ADDRESSABLE_QUBITS)
                .ok_or_else(|| {
                    HalError::Configuration(format!(
                        "max_qubits {max} exceeds the addressable limit of \
                         {MAX_ADDRESSABLE_QUBITS}"
                    ))
                })?;
            sim = sim.with_max_qubits(max);
        }
        sim.name = config.name;
        Ok(sim)
    }
}
