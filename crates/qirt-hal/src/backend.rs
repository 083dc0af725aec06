//! Backend trait and configuration.
//!
//! # Capability set
//!
//! Every simulator a QIR program can run against implements [`Backend`]:
//!
//! | Method | Required | Returns |
//! |--------|----------|---------|
//! | `name()` | yes | `&str` |
//! | `allocate_qubit()` | provided (unsupported) | `HalResult<QubitId>` |
//! | `release_qubit()` | provided (unsupported) | `HalResult<()>` |
//! | `apply()` | provided (unsupported) | `HalResult<()>` |
//! | `apply_controlled()` | provided (unsupported) | `HalResult<()>` |
//! | `measure()` | provided (unsupported) | `HalResult<ResultId>` |
//! | `are_equal_results()` | provided (unsupported) | `HalResult<bool>` |
//! | `release_result()` | provided (unsupported) | `HalResult<()>` |
//! | `use_zero()` / `use_one()` | provided | `ResultId` |
//! | `result_value()` | provided | `HalResult<bool>` |
//!
//! The provided defaults fail with [`HalError::Unsupported`], so a new
//! backend only implements what it actually supports. [`StubBackend`]
//! implements nothing and is useful as a placeholder in tests.
//!
//! # Lifetimes
//!
//! ```text
//! qubit:   Unallocated ──allocate──→ Live ──apply/measure──→ Live ──release──→ Released
//! result:  measure | use_zero | use_one ──→ Live ──release──→ Released
//!          (Zero/One constants never transition to Released)
//! ```
//!
//! Using a handle outside its live range is a
//! [`HalError::ContractViolation`]; backends detect it through their
//! [`HandleTable`](crate::HandleTable).

use std::fmt;

use qirt_ir::{Gate, Pauli, QubitId, ResultId};
use serde::{Deserialize, Serialize};

use crate::error::{HalError, HalResult};

/// Trait for simulator backends.
///
/// A backend is exclusively borrowed by one execution scope at a time, so
/// all mutating operations take `&mut self` and no internal locking is
/// needed.
pub trait Backend: Send {
    /// Get the name of this backend.
    fn name(&self) -> &str;

    /// Allocate a fresh qubit in the `|0⟩` state.
    ///
    /// The returned handle MUST differ from every currently-live handle.
    fn allocate_qubit(&mut self) -> HalResult<QubitId> {
        Err(HalError::unsupported(self.name(), "allocate_qubit"))
    }

    /// Release a live qubit.
    ///
    /// Releasing a handle that is not live MUST fail with a contract
    /// violation.
    fn release_qubit(&mut self, qubit: QubitId) -> HalResult<()> {
        let _ = qubit;
        Err(HalError::unsupported(self.name(), "release_qubit"))
    }

    /// Apply `gate` to a live qubit.
    fn apply(&mut self, gate: Gate, target: QubitId) -> HalResult<()> {
        let _ = target;
        Err(HalError::unsupported(self.name(), format!("apply({gate})")))
    }

    /// Apply `gate` to `target` conditioned on every control being `|1⟩`.
    ///
    /// All controls and the target MUST be live and pairwise distinct.
    fn apply_controlled(
        &mut self,
        gate: Gate,
        controls: &[QubitId],
        target: QubitId,
    ) -> HalResult<()> {
        let _ = (controls, target);
        Err(HalError::unsupported(
            self.name(),
            format!("apply_controlled({gate})"),
        ))
    }

    /// Measure `targets` in the given `bases` and return a fresh result.
    ///
    /// Only single-qubit measurement is required; joint measurement over
    /// more than one basis MAY fail with [`HalError::Unsupported`].
    fn measure(&mut self, bases: &[Pauli], targets: &[QubitId]) -> HalResult<ResultId> {
        let _ = (bases, targets);
        Err(HalError::unsupported(self.name(), "measure"))
    }

    /// Compare the recorded outcomes of two results.
    fn are_equal_results(&self, r1: ResultId, r2: ResultId) -> HalResult<bool> {
        let _ = (r1, r2);
        Err(HalError::unsupported(self.name(), "are_equal_results"))
    }

    /// Release a measurement result.
    ///
    /// Releasing the `Zero`/`One` constants is a no-op.
    fn release_result(&mut self, result: ResultId) -> HalResult<()> {
        let _ = result;
        Err(HalError::unsupported(self.name(), "release_result"))
    }

    /// The constant `Zero` result.
    fn use_zero(&self) -> ResultId {
        ResultId::ZERO
    }

    /// The constant `One` result.
    fn use_one(&self) -> ResultId {
        ResultId::ONE
    }

    /// The classical bit a result stands for.
    fn result_value(&self, result: ResultId) -> HalResult<bool> {
        let one = self.use_one();
        self.are_equal_results(result, one)
    }
}

impl fmt::Debug for dyn Backend + '_ {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Backend").field("name", &self.name()).finish()
    }
}

/// Check the argument shape shared by every single-target measurement.
///
/// Returns the basis and target of a one-qubit measurement, or the error
/// a backend should report.
pub fn single_measurement(
    backend: &str,
    bases: &[Pauli],
    targets: &[QubitId],
) -> HalResult<(Pauli, QubitId)> {
    if bases.len() != targets.len() {
        return Err(HalError::invalid_argument(
            "measure",
            format!(
                "{} bases given for {} targets",
                bases.len(),
                targets.len()
            ),
        ));
    }
    match (bases, targets) {
        ([basis], [target]) => Ok((*basis, *target)),
        ([], []) => Err(HalError::invalid_argument("measure", "no targets given")),
        _ => Err(HalError::unsupported(
            backend,
            format!("joint measurement over {} qubits", targets.len()),
        )),
    }
}

/// Check that a target does not appear among its controls and that no
/// control is repeated.
pub fn check_distinct(controls: &[QubitId], target: QubitId) -> HalResult<()> {
    for (i, c) in controls.iter().enumerate() {
        if *c == target {
            return Err(HalError::invalid_argument(
                "apply_controlled",
                format!("target {target} is also a control"),
            ));
        }
        if controls[..i].contains(c) {
            return Err(HalError::invalid_argument(
                "apply_controlled",
                format!("control {c} is repeated"),
            ));
        }
    }
    Ok(())
}

/// Configuration for a backend instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Name of the backend.
    pub name: String,
    /// Backend-specific options (`seed`, `result_mode`, `reuse_qubits`, ...).
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl BackendConfig {
    /// Create a new backend configuration.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            extra: serde_json::Map::new(),
        }
    }

    /// Add extra configuration.
    pub fn with_extra(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// Read an unsigned integer option.
    pub fn extra_u64(&self, key: &str) -> Option<u64> {
        self.extra.get(key).and_then(serde_json::Value::as_u64)
    }

    /// Read a boolean option.
    pub fn extra_bool(&self, key: &str) -> Option<bool> {
        self.extra.get(key).and_then(serde_json::Value::as_bool)
    }

    /// Read a string option.
    pub fn extra_str(&self, key: &str) -> Option<&str> {
        self.extra.get(key).and_then(serde_json::Value::as_str)
    }
}

/// Trait for creating backends from configuration.
pub trait BackendFactory: Backend + Sized {
    /// Create a backend from configuration.
    fn from_config(config: BackendConfig) -> HalResult<Self>;
}

/// A backend that supports nothing.
///
/// Every operation fails with [`HalError::Unsupported`]; only the result
/// constants are available.
#[derive(Debug, Clone)]
pub struct StubBackend {
    name: String,
}

impl StubBackend {
    /// Create a stub named `"stub"`.
    pub fn new() -> Self {
        Self {
            name: "stub".to_string(),
        }
    }
}

impl Default for StubBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl Backend for StubBackend {
    fn name(&self) -> &str {
        &self.name
    }
}

impl BackendFactory for StubBackend {
    fn from_config(config: BackendConfig) -> HalResult<Self> {
        Ok(Self { name: config.name })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_config() {
        let config = BackendConfig::new("fullstate")
            .with_extra("seed", serde_json::json!(42))
            .with_extra("reuse_qubits", serde_json::json!(true))
            .with_extra("result_mode", serde_json::json!("canonical"));

        assert_eq!(config.name, "fullstate");
        assert_eq!(config.extra_u64("seed"), Some(42));
        assert_eq!(config.extra_bool("reuse_qubits"), Some(true));
        assert_eq!(config.extra_str("result_mode"), Some("canonical"));
        assert_eq!(config.extra_u64("missing"), None);
    }

    #[test]
    fn test_stub_rejects_everything() {
        let mut stub = StubBackend::new();

        let err = stub.allocate_qubit().unwrap_err();
        assert!(err.is_unsupported());
        assert!(stub.apply(Gate::X, QubitId(0)).unwrap_err().is_unsupported());
        assert!(
            stub.apply_controlled(Gate::X, &[QubitId(1)], QubitId(0))
                .unwrap_err()
                .is_unsupported()
        );
        assert!(
            stub.measure(&[Pauli::Z], &[QubitId(0)])
                .unwrap_err()
                .is_unsupported()
        );
        assert!(stub.release_result(ResultId(2)).unwrap_err().is_unsupported());
        assert!(stub.result_value(ResultId::ONE).unwrap_err().is_unsupported());
    }

    #[test]
    fn test_stub_constants() {
        let stub = StubBackend::new();
        assert_eq!(stub.use_zero(), ResultId::ZERO);
        assert_eq!(stub.use_one(), ResultId::ONE);
        assert_ne!(stub.use_zero(), stub.use_one());
        assert_eq!(stub.use_one(), stub.use_one());
    }

    #[test]
    fn test_single_measurement() {
        assert_eq!(
            single_measurement("t", &[Pauli::Z], &[QubitId(1)]).unwrap(),
            (Pauli::Z, QubitId(1))
        );
        assert!(
            single_measurement("t", &[Pauli::Z, Pauli::Z], &[QubitId(0), QubitId(1)])
                .unwrap_err()
                .is_unsupported()
        );
        assert!(
            single_measurement("t", &[Pauli::Z], &[QubitId(0), QubitId(1)])
                .unwrap_err()
                .is_contract_violation()
        );
        assert!(
            single_measurement("t", &[], &[])
                .unwrap_err()
                .is_contract_violation()
        );
    }

    #[test]
    fn test_check_distinct() {
        assert!(check_distinct(&[QubitId(0), QubitId(1)], QubitId(2)).is_ok());
        assert!(check_distinct(&[], QubitId(2)).is_ok());
        assert!(check_distinct(&[QubitId(2)], QubitId(2)).is_err());
        assert!(check_distinct(&[QubitId(0), QubitId(0)], QubitId(2)).is_err());
    }
}
