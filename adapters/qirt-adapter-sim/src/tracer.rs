//! Resource-tracing backend.
//!
//! Executes nothing; records what a program would need: gate counts,
//! measurements, peak simultaneous width and circuit depth.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use qirt_hal::{
    Backend, BackendConfig, BackendFactory, HalResult, HandleTable, check_distinct,
    single_measurement,
};
use qirt_ir::{Gate, Pauli, QubitId, ResultId};

/// Resource counts gathered by a [`TracerBackend`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceMetrics {
    /// Uncontrolled applications, by gate name.
    pub gate_counts: BTreeMap<String, u64>,
    /// Controlled applications, by gate name.
    pub controlled_counts: BTreeMap<String, u64>,
    /// Number of measurements.
    pub measurements: u64,
    /// Total number of qubit allocations.
    pub qubits_allocated: u64,
    /// Largest number of qubits live at once.
    pub peak_width: usize,
    /// Number of layers when every operation is scheduled as early as its
    /// qubits allow.
    pub depth: u64,
}

impl TraceMetrics {
    /// Total gate applications, controlled or not.
    pub fn total_gates(&self) -> u64 {
        self.gate_counts.values().sum::<u64>() + self.controlled_counts.values().sum::<u64>()
    }
}

/// Backend that counts instead of simulating.
///
/// Measurements cannot be known, so every measurement reports `Zero`.
#[derive(Debug)]
pub struct TracerBackend {
    name: String,
    /// Per-qubit layer of the last operation that touched it.
    qubits: HandleTable<QubitId, u64>,
    metrics: TraceMetrics,
}

impl TracerBackend {
    /// Create a tracer with empty metrics.
    pub fn new() -> Self {
        Self {
            name: "tracer".to_string(),
            qubits: HandleTable::new(),
            metrics: TraceMetrics::default(),
        }
    }

    /// The metrics recorded so far.
    pub fn metrics(&self) -> &TraceMetrics {
        &self.metrics
    }

    /// Take the metrics, leaving empty counters behind.
    pub fn take_metrics(&mut self) -> TraceMetrics {
        std::mem::take(&mut self.metrics)
    }

    fn schedule(&mut self, layer: u64) {
        self.metrics.depth = self.metrics.depth.max(layer);
    }
}

impl Default for TracerBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl Backend for TracerBackend {
    fn name(&self) -> &str {
        &self.name
    }

    fn allocate_qubit(&mut self) -> HalResult<QubitId> {
        let qubit = self.qubits.insert(0);
        self.metrics.qubits_allocated += 1;
        self.metrics.peak_width = self.metrics.peak_width.max(self.qubits.live_count());
        Ok(qubit)
    }

    fn release_qubit(&mut self, qubit: QubitId) -> HalResult<()> {
        self.qubits.release(qubit, "release_qubit").map(|_| ())
    }

    fn apply(&mut self, gate: Gate, target: QubitId) -> HalResult<()> {
        let layer = self.qubits.get_mut(target, "apply")?;
        *layer += 1;
        let layer = *layer;
        self.schedule(layer);
        *self
            .metrics
            .gate_counts
            .entry(gate.name().to_string())
            .or_default() += 1;
        Ok(())
    }

    fn apply_controlled(
        &mut self,
        gate: Gate,
        controls: &[QubitId],
        target: QubitId,
    ) -> HalResult<()> {
        let mut layer = *self.qubits.get(target, "apply_controlled")?;
        for control in controls {
            layer = layer.max(*self.qubits.get(*control, "apply_controlled")?);
        }
        check_distinct(controls, target)?;

        let layer = layer + 1;
        for qubit in controls.iter().chain(std::iter::once(&target)) {
            *self.qubits.get_mut(*qubit, "apply_controlled")? = layer;
        }
        self.schedule(layer);
        *self
            .metrics
            .controlled_counts
            .entry(gate.name().to_string())
            .or_default() += 1;
        Ok(())
    }

    fn measure(&mut self, bases: &[Pauli], targets: &[QubitId]) -> HalResult<ResultId> {
        let (_, target) = single_measurement(&self.name, bases, targets)?;
        let layer = self.qubits.get_mut(target, "measure")?;
        *layer += 1;
        let layer = *layer;
        self.schedule(layer);
        self.metrics.measurements += 1;
        Ok(ResultId::ZERO)
    }

    fn are_equal_results(&self, r1: ResultId, r2: ResultId) -> HalResult<bool> {
        Ok(r1 == r2)
    }

    fn release_result(&mut self, _result: ResultId) -> HalResult<()> {
        Ok(())
    }
}

impl Drop for TracerBackend {
    fn drop(&mut self) {
        debug!(
            "Tracer '{}' finished: {} gates, {} measurements, width {}, depth {}",
            self.name,
            self.metrics.total_gates(),
            self.metrics.measurements,
            self.metrics.peak_width,
            self.metrics.depth
        );
    }
}

impl BackendFactory for TracerBackend {
    fn from_config(config: BackendConfig) -> HalResult<Self> {
        let mut tracer = Self::new();
        tracer.name = config.name;
        Ok(tracer)
    }
}
