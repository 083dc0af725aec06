//! Execution context and scopes.
//!
//! An [`ExecutionContext`] owns a stack of frames. Each frame names the
//! backend that is current while it is on top, and optionally tracks the
//! handles allocated through it:
//!
//! ```text
//!   ctx.scoped(&mut sim, true) ──→ push Frame { backend, tracker }
//!        │
//!        ├── qis::* / rt::*  ──→ ctx.current_backend() ──→ Backend
//!        │
//!   scope.finish() / drop ──→ pop Frame ──→ LeakReport ──→ LeakPolicy
//! ```
//!
//! The context borrows each backend for `'b`; whoever constructed the
//! backend keeps ownership and can inspect it after the scope ends.

use std::ops::{Deref, DerefMut};

use qirt_hal::Backend;
use qirt_ir::{Gate, Handle, Pauli, QubitId, ResultId};
use tracing::{debug, error, instrument, trace, warn};

use crate::config::{LeakPolicy, RuntimeConfig};
use crate::error::{RuntimeError, RuntimeResult};
use crate::tracker::{AllocationTracker, LeakReport};

struct Frame<'b> {
    backend: Option<&'b mut dyn Backend>,
    tracker: Option<AllocationTracker>,
}

/// Runtime state threaded through every intrinsic call.
pub struct ExecutionContext<'b> {
    config: RuntimeConfig,
    frames: Vec<Frame<'b>>,
}

impl<'b> ExecutionContext<'b> {
    /// Create a context with no active scope.
    pub fn new(config: RuntimeConfig) -> Self {
        Self {
            config,
            frames: Vec::new(),
        }
    }

    /// The configuration this context was created with.
    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Number of active scopes.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Make `backend` current until the returned scope ends.
    pub fn scoped<'c>(
        &'c mut self,
        backend: &'b mut dyn Backend,
        track_allocations: bool,
    ) -> Scope<'c, 'b> {
        debug!(
            "Entering scope {} on backend '{}' (tracking: {})",
            self.frames.len() + 1,
            backend.name(),
            track_allocations
        );
        self.push(Some(backend), track_allocations)
    }

    /// Open a scope without a backend, for purely classical code.
    pub fn scoped_classical<'c>(&'c mut self, track_allocations: bool) -> Scope<'c, 'b> {
        debug!("Entering classical scope {}", self.frames.len() + 1);
        self.push(None, track_allocations)
    }

    fn push<'c>(
        &'c mut self,
        backend: Option<&'b mut dyn Backend>,
        track_allocations: bool,
    ) -> Scope<'c, 'b> {
        self.frames.push(Frame {
            backend,
            tracker: track_allocations.then(AllocationTracker::new),
        });
        Scope {
            ctx: self,
            finished: false,
        }
    }

    fn frame_mut(&mut self) -> RuntimeResult<&mut Frame<'b>> {
        self.frames.last_mut().ok_or(RuntimeError::NoActiveScope)
    }

    /// The backend of the innermost scope.
    pub fn current_backend(&mut self) -> RuntimeResult<&mut dyn Backend> {
        match self.frame_mut()?.backend.as_deref_mut() {
            Some(backend) => Ok(backend),
            None => Err(RuntimeError::NoBackend),
        }
    }

    /// Read-only access to the backend of the innermost scope.
    pub fn backend(&self) -> RuntimeResult<&dyn Backend> {
        let frame = self.frames.last().ok_or(RuntimeError::NoActiveScope)?;
        frame.backend.as_deref().ok_or(RuntimeError::NoBackend)
    }

    /// Split the innermost frame into its backend and tracker.
    fn parts(
        &mut self,
    ) -> RuntimeResult<(&mut (dyn Backend + 'b), Option<&mut AllocationTracker>)> {
        let frame = self.frame_mut()?;
        match frame.backend.as_deref_mut() {
            Some(backend) => Ok((backend, frame.tracker.as_mut())),
            None => Err(RuntimeError::NoBackend),
        }
    }

    // =========================================================================
    // Tracked operations
    // =========================================================================

    /// Allocate a qubit on the current backend.
    pub fn allocate_qubit(&mut self) -> RuntimeResult<QubitId> {
        let (backend, tracker) = self.parts()?;
        let qubit = backend.allocate_qubit()?;
        if let Some(tracker) = tracker {
            tracker.track_qubit(qubit);
        }
        Ok(qubit)
    }

    /// Release a qubit on the current backend.
    pub fn release_qubit(&mut self, qubit: QubitId) -> RuntimeResult<()> {
        let (backend, tracker) = self.parts()?;
        backend.release_qubit(qubit)?;
        if let Some(tracker) = tracker {
            tracker.untrack_qubit(qubit);
        }
        Ok(())
    }

    /// Measure on the current backend; the result is tracked.
    pub fn measure(&mut self, bases: &[Pauli], targets: &[QubitId]) -> RuntimeResult<ResultId> {
        let (backend, tracker) = self.parts()?;
        let result = backend.measure(bases, targets)?;
        if let Some(tracker) = tracker {
            tracker.track_result(result);
        }
        Ok(result)
    }

    /// Release a result on the current backend.
    pub fn release_result(&mut self, result: ResultId) -> RuntimeResult<()> {
        let (backend, tracker) = self.parts()?;
        backend.release_result(result)?;
        if let Some(tracker) = tracker {
            tracker.untrack_result(result);
        }
        Ok(())
    }

    /// Apply a gate on the current backend.
    pub fn apply(&mut self, gate: Gate, target: QubitId) -> RuntimeResult<()> {
        trace!("{} {}", gate, target);
        self.current_backend()?.apply(gate, target)?;
        Ok(())
    }

    /// Apply a controlled gate on the current backend.
    pub fn apply_controlled(
        &mut self,
        gate: Gate,
        controls: &[QubitId],
        target: QubitId,
    ) -> RuntimeResult<()> {
        trace!("c{} {:?} {}", gate, controls, target);
        self.current_backend()?
            .apply_controlled(gate, controls, target)?;
        Ok(())
    }

    /// Compare two results on the current backend.
    pub fn are_equal_results(&self, r1: ResultId, r2: ResultId) -> RuntimeResult<bool> {
        Ok(self.backend()?.are_equal_results(r1, r2)?)
    }

    // =========================================================================
    // Teardown
    // =========================================================================

    /// Pop the innermost frame and apply the leak policy.
    fn close_frame(&mut self) -> RuntimeResult<LeakReport> {
        let frame = self.frames.pop().ok_or(RuntimeError::NoActiveScope)?;
        let depth = self.frames.len() + 1;

        let Some(tracker) = frame.tracker else {
            debug!("Leaving scope {} (untracked)", depth);
            return Ok(LeakReport::default());
        };

        let mut report = tracker.into_report();
        if self.config.release_on_teardown && report.has_leaks() {
            if let Some(backend) = frame.backend {
                reclaim(backend, &mut report);
            }
        }
        debug!("Leaving scope {}: {}", depth, report);

        match self.config.leak_policy {
            LeakPolicy::Ignore => Ok(report),
            LeakPolicy::Warn => {
                if !report.is_clean() {
                    warn!("Scope {} ended with leaked handles: {}", depth, report);
                }
                Ok(report)
            }
            LeakPolicy::Fail if report.has_leaks() => Err(RuntimeError::Leaked(report)),
            LeakPolicy::Fail => {
                if !report.reclaimed.is_empty() {
                    warn!("Scope {} reclaimed leaked handles: {}", depth, report);
                }
                Ok(report)
            }
        }
    }
}

/// Release every handle in `report` through `backend`, moving the ones that
/// succeed to `report.reclaimed`.
fn reclaim(backend: &mut dyn Backend, report: &mut LeakReport) {
    let mut still_live = Vec::new();
    for result in report.results.drain(..) {
        match backend.release_result(result) {
            Ok(()) => report.reclaimed.push(Handle::Result(result)),
            Err(e) => {
                warn!("Could not reclaim {}: {}", result, e);
                still_live.push(result);
            }
        }
    }
    report.results = still_live;

    let mut still_live = Vec::new();
    for qubit in report.qubits.drain(..) {
        match backend.release_qubit(qubit) {
            Ok(()) => report.reclaimed.push(Handle::Qubit(qubit)),
            Err(e) => {
                warn!("Could not reclaim {}: {}", qubit, e);
                still_live.push(qubit);
            }
        }
    }
    report.qubits = still_live;
}

/// Guard for one active frame.
///
/// Dereferences to the [`ExecutionContext`], so programs run against the
/// scope directly. Ending the scope, by [`Scope::finish`] or by drop,
/// restores the previous frame.
pub struct Scope<'c, 'b> {
    ctx: &'c mut ExecutionContext<'b>,
    finished: bool,
}

impl Scope<'_, '_> {
    /// End the scope and return what leaked.
    ///
    /// With [`LeakPolicy::Fail`], leaks are returned as
    /// [`RuntimeError::Leaked`].
    #[instrument(skip(self), fields(depth = self.ctx.depth()))]
    pub fn finish(mut self) -> RuntimeResult<LeakReport> {
        self.finished = true;
        self.ctx.close_frame()
    }
}

impl<'b> Deref for Scope<'_, 'b> {
    type Target = ExecutionContext<'b>;

    fn deref(&self) -> &Self::Target {
        self.ctx
    }
}

impl DerefMut for Scope<'_, '_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.ctx
    }
}

impl Drop for Scope<'_, '_> {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        match self.ctx.close_frame() {
            Ok(_) => {}
            Err(RuntimeError::Leaked(report)) => {
                error!("Scope dropped without finish with leaked handles: {}", report);
            }
            Err(e) => error!("Scope teardown failed: {}", e),
        }
    }
}

/// Run `entry` in a fresh scope on `backend` and close the scope.
///
/// The scope is closed even if `entry` fails; in that case the program's
/// error is returned and the leak report is only logged.
pub fn run_program<'b, T, F>(
    ctx: &mut ExecutionContext<'b>,
    backend: &'b mut dyn Backend,
    track_allocations: bool,
    entry: F,
) -> RuntimeResult<(T, LeakReport)>
where
    F: FnOnce(&mut ExecutionContext<'b>) -> RuntimeResult<T>,
{
    let mut scope = ctx.scoped(backend, track_allocations);
    let outcome = entry(&mut *scope);
    let report = scope.finish();
    match (outcome, report) {
        (Ok(value), Ok(report)) => Ok((value, report)),
        (Ok(_), Err(e)) => Err(e),
        (Err(e), report) => {
            if let Err(leak) = report {
                warn!("Program failed and leaked: {}", leak);
            }
            Err(e)
        }
    }
}
