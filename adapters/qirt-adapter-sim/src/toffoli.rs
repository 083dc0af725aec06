//! Classical (Toffoli) simulator backend.
//!
//! Tracks one classical bit per qubit. Only gates that keep basis states
//! as basis states are supported: `X`/`Y` flip the bit, diagonal gates
//! leave it untouched, and controlled forms of either are evaluated
//! classically. Anything that creates superposition is rejected.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use qirt_hal::{
    Backend, BackendConfig, BackendFactory, HalError, HalResult, HandleTable, check_distinct,
    single_measurement,
};
use qirt_ir::{Gate, Pauli, QubitId, ResultId};

/// How measurement results are represented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultMode {
    /// Every measurement allocates a fresh result that must be released.
    #[default]
    Tracked,
    /// Measurements return the shared `Zero`/`One` constants.
    Canonical,
}

impl fmt::Display for ResultMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResultMode::Tracked => f.write_str("tracked"),
            ResultMode::Canonical => f.write_str("canonical"),
        }
    }
}

impl FromStr for ResultMode {
    type Err = HalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "tracked" => Ok(ResultMode::Tracked),
            "canonical" => Ok(ResultMode::Canonical),
            other => Err(HalError::Configuration(format!(
                "unknown result_mode '{other}' (expected 'tracked' or 'canonical')"
            ))),
        }
    }
}

/// Classical bit-vector simulator.
#[derive(Debug)]
pub struct ToffoliSimulator {
    name: String,
    qubits: HandleTable<QubitId, bool>,
    results: HandleTable<ResultId, bool>,
    mode: ResultMode,
}

impl ToffoliSimulator {
    /// Create a simulator with tracked results.
    pub fn new() -> Self {
        Self::with_mode(ResultMode::Tracked)
    }

    /// Create a simulator with the given result representation.
    pub fn with_mode(mode: ResultMode) -> Self {
        Self {
            name: "toffoli".to_string(),
            qubits: HandleTable::new(),
            results: HandleTable::new().with_base(ResultId::FIRST_DYNAMIC),
            mode,
        }
    }

    /// Recycle released qubit handles.
    pub fn with_qubit_reuse(mut self) -> Self {
        self.qubits = HandleTable::with_reuse();
        self
    }

    /// The result representation in use.
    pub fn mode(&self) -> ResultMode {
        self.mode
    }

    /// Current classical value of a live qubit.
    pub fn qubit_state(&self, qubit: QubitId) -> HalResult<bool> {
        self.qubits.get(qubit, "qubit_state").copied()
    }

    /// Number of live qubits.
    pub fn live_qubits(&self) -> usize {
        self.qubits.live_count()
    }

    /// Number of live (non-constant) results.
    pub fn live_results(&self) -> usize {
        self.results.live_count()
    }

    fn check_gate(&self, gate: Gate, operation: &str) -> HalResult<()> {
        if gate.is_bit_flip() || gate.is_diagonal() {
            Ok(())
        } else {
            Err(HalError::unsupported(
                &self.name,
                format!("{operation}({gate}) creates superposition"),
            ))
        }
    }

    fn value(&self, result: ResultId, operation: &'static str) -> HalResult<bool> {
        match result.constant_value() {
            Some(bit) => Ok(bit),
            None => self.results.get(result, operation).copied(),
        }
    }
}

impl Default for ToffoliSimulator {
    fn default() -> Self {
        Self::new()
    }
}

impl Backend for ToffoliSimulator {
    fn name(&self) -> &str {
        &self.name
    }

    fn allocate_qubit(&mut self) -> HalResult<QubitId> {
        let qubit = self.qubits.insert(false);
        debug!("Allocated {}", qubit);
        Ok(qubit)
    }

    fn release_qubit(&mut self, qubit: QubitId) -> HalResult<()> {
        self.qubits.release(qubit, "release_qubit")?;
        debug!("Released {}", qubit);
        Ok(())
    }

    fn apply(&mut self, gate: Gate, target: QubitId) -> HalResult<()> {
        self.qubits.get(target, "apply")?;
        self.check_gate(gate, "apply")?;
        let bit = self.qubits.get_mut(target, "apply")?;
        if gate.is_bit_flip() {
            *bit = !*bit;
        }
        trace!("{} {}", gate, target);
        Ok(())
    }

    fn apply_controlled(
        &mut self,
        gate: Gate,
        controls: &[QubitId],
        target: QubitId,
    ) -> HalResult<()> {
        self.qubits.get(target, "apply_controlled")?;
        for control in controls {
            self.qubits.get(*control, "apply_controlled")?;
        }
        check_distinct(controls, target)?;
        self.check_gate(gate, "apply_controlled")?;

        // Evaluation stops at the first control in |0⟩.
        for control in controls {
            if !*self.qubits.get(*control, "apply_controlled")? {
                trace!("c{} skipped: {} is |0⟩", gate, control);
                return Ok(());
            }
        }
        let bit = self.qubits.get_mut(target, "apply_controlled")?;
        if gate.is_bit_flip() {
            *bit = !*bit;
        }
        trace!("c{} {:?} -> {}", gate, controls, target);
        Ok(())
    }

    fn measure(&mut self, bases: &[Pauli], targets: &[QubitId]) -> HalResult<ResultId> {
        let (basis, target) = single_measurement(&self.name, bases, targets)?;
        let bit = *self.qubits.get(target, "measure")?;
        let bit = match basis {
            Pauli::Z => bit,
            Pauli::I => false,
            Pauli::X | Pauli::Y => {
                return Err(HalError::unsupported(
                    &self.name,
                    format!("measure in the {basis} basis"),
                ));
            }
        };

        let result = match self.mode {
            ResultMode::Tracked => self.results.insert(bit),
            ResultMode::Canonical => ResultId::from_bool(bit),
        };
        trace!("measure {} -> {}", target, result);
        Ok(result)
    }

    fn are_equal_results(&self, r1: ResultId, r2: ResultId) -> HalResult<bool> {
        match self.mode {
            ResultMode::Tracked => {
                Ok(self.value(r1, "result_equal")? == self.value(r2, "result_equal")?)
            }
            ResultMode::Canonical => Ok(r1 == r2),
        }
    }

    fn release_result(&mut self, result: ResultId) -> HalResult<()> {
        if result.is_constant() || self.mode == ResultMode::Canonical {
            return Ok(());
        }
        self.results.release(result, "release_result").map(|_| ())
    }

    fn result_value(&self, result: ResultId) -> HalResult<bool> {
        self.value(result, "result_value")
    }
}

impl BackendFactory for ToffoliSimulator {
    fn from_config(config: BackendConfig) -> HalResult<Self> {
        let mode = match config.extra_str("result_mode") {
            Some(mode) => mode.parse()?,
            None => ResultMode::default(),
        };
        let mut sim = Self::with_mode(mode);
        if config.extra_bool("reuse_qubits").unwrap_or(false) {
            sim = sim.with_qubit_reuse();
        }
        sim.name = config.name;
        Ok(sim)
    }
}
