//! Allocation tracking and leak reports.

use std::fmt;

use qirt_ir::{Handle, QubitId, ResultId};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

/// Handles created in one scope and not yet released.
#[derive(Debug, Default)]
pub struct AllocationTracker {
    qubits: FxHashSet<QubitId>,
    results: FxHashSet<ResultId>,
}

impl AllocationTracker {
    /// Create an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a freshly allocated qubit.
    pub fn track_qubit(&mut self, qubit: QubitId) {
        self.qubits.insert(qubit);
    }

    /// Forget a released qubit. Returns `false` if it was not tracked.
    pub fn untrack_qubit(&mut self, qubit: QubitId) -> bool {
        self.qubits.remove(&qubit)
    }

    /// Record a result produced by a measurement.
    ///
    /// The `Zero`/`One` constants are never tracked.
    pub fn track_result(&mut self, result: ResultId) {
        if !result.is_constant() {
            self.results.insert(result);
        }
    }

    /// Forget a released result. Returns `false` if it was not tracked.
    pub fn untrack_result(&mut self, result: ResultId) -> bool {
        self.results.remove(&result)
    }

    /// Number of tracked handles of either kind.
    pub fn len(&self) -> usize {
        self.qubits.len() + self.results.len()
    }

    /// Whether nothing is outstanding.
    pub fn is_empty(&self) -> bool {
        self.qubits.is_empty() && self.results.is_empty()
    }

    /// Turn the outstanding handles into a report, sorted by handle value.
    pub fn into_report(self) -> LeakReport {
        let mut qubits: Vec<_> = self.qubits.into_iter().collect();
        let mut results: Vec<_> = self.results.into_iter().collect();
        qubits.sort_unstable();
        results.sort_unstable();
        LeakReport {
            qubits,
            results,
            reclaimed: Vec::new(),
        }
    }
}

/// Handles still live when a scope ended.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeakReport {
    /// Qubits allocated in the scope and never released.
    pub qubits: Vec<QubitId>,
    /// Measurement results never released.
    pub results: Vec<ResultId>,
    /// Leaked handles the runtime released on the program's behalf.
    pub reclaimed: Vec<Handle>,
}

impl LeakReport {
    /// Whether any handle is still live in the backend.
    pub fn has_leaks(&self) -> bool {
        !self.qubits.is_empty() || !self.results.is_empty()
    }

    /// Whether the program released everything itself.
    pub fn is_clean(&self) -> bool {
        !self.has_leaks() && self.reclaimed.is_empty()
    }
}

impl fmt::Display for LeakReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_clean() {
            return f.write_str("no leaked handles");
        }
        write!(
            f,
            "{} qubit(s) and {} result(s) leaked",
            self.qubits.len(),
            self.results.len()
        )?;
        let live: Vec<String> = self
            .qubits
            .iter()
            .map(ToString::to_string)
            .chain(self.results.iter().map(ToString::to_string))
            .collect();
        if !live.is_empty() {
            write!(f, ": {}", live.join(", "))?;
        }
        if !self.reclaimed.is_empty() {
            write!(f, "; {} reclaimed", self.reclaimed.len())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_track_and_untrack() {
        let mut tracker = AllocationTracker::new();
        tracker.track_qubit(QubitId(0));
        tracker.track_qubit(QubitId(1));
        tracker.track_result(ResultId(2));
        assert_eq!(tracker.len(), 3);

        assert!(tracker.untrack_qubit(QubitId(0)));
        assert!(!tracker.untrack_qubit(QubitId(0)));
        assert!(tracker.untrack_result(ResultId(2)));

        let report = tracker.into_report();
        assert_eq!(report.qubits, vec![QubitId(1)]);
        assert!(report.results.is_empty());
        assert!(report.has_leaks());
    }

    #[test]
    fn test_constants_not_tracked() {
        let mut tracker = AllocationTracker::new();
        tracker.track_result(ResultId::ZERO);
        tracker.track_result(ResultId::ONE);
        assert!(tracker.is_empty());
    }

    #[test]
    fn test_report_display() {
        let report = LeakReport {
            qubits: vec![QubitId(0), QubitId(3)],
            results: vec![ResultId(4)],
            reclaimed: Vec::new(),
        };
        assert_eq!(
            report.to_string(),
            "2 qubit(s) and 1 result(s) leaked: q0, q3, r4"
        );
        assert_eq!(LeakReport::default().to_string(), "no leaked handles");
    }

    #[test]
    fn test_reclaimed_only() {
        let report = LeakReport {
            reclaimed: vec![Handle::Qubit(QubitId(1))],
            ..LeakReport::default()
        };
        assert!(!report.has_leaks());
        assert!(!report.is_clean());
        assert_eq!(report.to_string(), "0 qubit(s) and 0 result(s) leaked; 1 reclaimed");
    }
}
