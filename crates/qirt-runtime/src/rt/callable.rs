//! Callables and functors.
//!
//! An [`Operation`] bundles the specializations of one quantum operation:
//!
//! | Functor | Specialization | Signature |
//! |---------|----------------|-----------|
//! | none | body | `(ctx, args)` |
//! | `Adjoint` | adj | `(ctx, args)` |
//! | `Controlled` | ctl | `(ctx, controls, args)` |
//! | `Adjoint Controlled` | ctladj | `(ctx, controls, args)` |
//!
//! A [`Callable`] is a handle to an operation plus the functors applied to
//! it. Applying `Controlled` twice still dispatches to the single `ctl`
//! specialization: the caller passes one control list per level and the
//! lists are flattened into one.
//!
//! [`Callable::partial`] fixes some arguments up front. The partial is a
//! callable of its own that forwards each functor to the wrapped one.

use std::fmt;
use std::sync::Arc;

use qirt_ir::QubitId;
use tracing::trace;

use crate::context::ExecutionContext;
use crate::error::{RuntimeError, RuntimeResult};
use crate::rt::array::QirArray;

type BodyFn<A> = dyn Fn(&mut ExecutionContext<'_>, A) -> RuntimeResult<()> + Send + Sync;
type ControlledFn<A> =
    dyn Fn(&mut ExecutionContext<'_>, &QirArray<QubitId>, A) -> RuntimeResult<()> + Send + Sync;

/// The specializations of one operation.
pub struct Operation<A> {
    name: String,
    body: Box<BodyFn<A>>,
    adj: Option<Box<BodyFn<A>>>,
    ctl: Option<Box<ControlledFn<A>>>,
    ctladj: Option<Box<ControlledFn<A>>>,
}

impl<A> Operation<A> {
    /// An operation with only a body.
    pub fn new<F>(name: impl Into<String>, body: F) -> Self
    where
        F: Fn(&mut ExecutionContext<'_>, A) -> RuntimeResult<()> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            body: Box::new(body),
            adj: None,
            ctl: None,
            ctladj: None,
        }
    }

    /// Add the adjoint specialization.
    pub fn with_adjoint<F>(mut self, adj: F) -> Self
    where
        F: Fn(&mut ExecutionContext<'_>, A) -> RuntimeResult<()> + Send + Sync + 'static,
    {
        self.adj = Some(Box::new(adj));
        self
    }

    /// Add the controlled specialization.
    pub fn with_controlled<F>(mut self, ctl: F) -> Self
    where
        F: Fn(&mut ExecutionContext<'_>, &QirArray<QubitId>, A) -> RuntimeResult<()>
            + Send
            + Sync
            + 'static,
    {
        self.ctl = Some(Box::new(ctl));
        self
    }

    /// Add the controlled-adjoint specialization.
    pub fn with_controlled_adjoint<F>(mut self, ctladj: F) -> Self
    where
        F: Fn(&mut ExecutionContext<'_>, &QirArray<QubitId>, A) -> RuntimeResult<()>
            + Send
            + Sync
            + 'static,
    {
        self.ctladj = Some(Box::new(ctladj));
        self
    }

    /// Name of the operation.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl<A> fmt::Debug for Operation<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Operation")
            .field("name", &self.name)
            .field("adj", &self.adj.is_some())
            .field("ctl", &self.ctl.is_some())
            .field("ctladj", &self.ctladj.is_some())
            .finish()
    }
}

/// Arguments of a callable invocation.
#[derive(Debug, Clone)]
pub struct CallArgs<A> {
    /// One control list per `Controlled` level, outermost first.
    pub controls: Vec<Vec<QubitId>>,
    /// The operation's own arguments.
    pub args: A,
}

impl<A> CallArgs<A> {
    /// Arguments for an uncontrolled call.
    pub fn new(args: A) -> Self {
        Self {
            controls: Vec::new(),
            args,
        }
    }

    /// Add the control list of one more `Controlled` level.
    pub fn with_controls(mut self, controls: impl Into<Vec<QubitId>>) -> Self {
        self.controls.push(controls.into());
        self
    }
}

/// An operation with functors applied.
pub struct Callable<A> {
    op: Arc<Operation<A>>,
    adjoint: bool,
    controlled_depth: usize,
}

impl<A> Clone for Callable<A> {
    fn clone(&self) -> Self {
        Self {
            op: Arc::clone(&self.op),
            adjoint: self.adjoint,
            controlled_depth: self.controlled_depth,
        }
    }
}

impl<A> fmt::Debug for Callable<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callable")
            .field("op", &self.op.name)
            .field("adjoint", &self.adjoint)
            .field("controlled_depth", &self.controlled_depth)
            .finish()
    }
}

impl<A> Callable<A> {
    /// A callable for `op` with no functors applied.
    pub fn new(op: Operation<A>) -> Self {
        Self {
            op: Arc::new(op),
            adjoint: false,
            controlled_depth: 0,
        }
    }

    /// Apply the `Adjoint` functor. Applying it twice cancels out.
    pub fn adjoint(&self) -> Self {
        Self {
            adjoint: !self.adjoint,
            ..self.clone()
        }
    }

    /// Apply the `Controlled` functor.
    pub fn controlled(&self) -> Self {
        Self {
            controlled_depth: self.controlled_depth + 1,
            ..self.clone()
        }
    }

    /// Whether an odd number of `Adjoint` functors was applied.
    pub fn is_adjoint(&self) -> bool {
        self.adjoint
    }

    /// Number of `Controlled` functors applied.
    pub fn controlled_depth(&self) -> usize {
        self.controlled_depth
    }

    /// Name of the underlying operation.
    pub fn name(&self) -> &str {
        &self.op.name
    }

    fn missing(&self, functor: &'static str) -> RuntimeError {
        RuntimeError::MissingSpecialization {
            callable: self.op.name.clone(),
            functor,
        }
    }

    /// Invoke the specialization selected by the applied functors.
    pub fn invoke(&self, ctx: &mut ExecutionContext<'_>, call: CallArgs<A>) -> RuntimeResult<()> {
        if call.controls.len() != self.controlled_depth {
            return Err(RuntimeError::ControlDepthMismatch {
                expected: self.controlled_depth,
                got: call.controls.len(),
            });
        }

        if self.controlled_depth == 0 {
            trace!("invoke {} (adjoint: {})", self.op.name, self.adjoint);
            return match (self.adjoint, &self.op.adj) {
                (false, _) => (self.op.body)(ctx, call.args),
                (true, Some(adj)) => adj(ctx, call.args),
                (true, None) => Err(self.missing("adjoint")),
            };
        }

        let controls: QirArray<QubitId> = call.controls.into_iter().flatten().collect();
        trace!(
            "invoke {} with {} controls (adjoint: {})",
            self.op.name,
            controls.len(),
            self.adjoint
        );
        let specialization = if self.adjoint {
            self.op
                .ctladj
                .as_ref()
                .ok_or_else(|| self.missing("controlled adjoint"))?
        } else {
            self.op
                .ctl
                .as_ref()
                .ok_or_else(|| self.missing("controlled"))?
        };
        specialization(ctx, &controls, call.args)
    }
}

/// State shared by the specializations of a partial application.
struct Partial<A, C, M> {
    target: Callable<A>,
    captured: C,
    merge: M,
}

impl<A, C, M> Partial<A, C, M> {
    fn args<B>(&self, remaining: B) -> A
    where
        M: Fn(&C, B) -> A,
    {
        (self.merge)(&self.captured, remaining)
    }
}

impl<A: 'static> Callable<A> {
    /// Partially apply this callable.
    ///
    /// `captured` is stored in the new callable and `merge` combines it with
    /// the remaining arguments of every call. The partial starts with this
    /// callable's `Adjoint` state; `Controlled` levels already applied here
    /// are dropped and must be applied to the partial instead.
    pub fn partial<B, C, M>(&self, captured: C, merge: M) -> Callable<B>
    where
        C: Send + Sync + 'static,
        M: Fn(&C, B) -> A + Send + Sync + 'static,
    {
        let shared = Arc::new(Partial {
            target: Callable {
                controlled_depth: 0,
                ..self.clone()
            },
            captured,
            merge,
        });
        let (body, adj, ctl, ctladj) = (
            Arc::clone(&shared),
            Arc::clone(&shared),
            Arc::clone(&shared),
            shared,
        );

        let op = Operation::new(self.op.name.clone(), move |ctx, remaining: B| {
            body.target.invoke(ctx, CallArgs::new(body.args(remaining)))
        })
        .with_adjoint(move |ctx, remaining: B| {
            adj.target
                .adjoint()
                .invoke(ctx, CallArgs::new(adj.args(remaining)))
        })
        .with_controlled(move |ctx, controls: &QirArray<QubitId>, remaining: B| {
            ctl.target.controlled().invoke(
                ctx,
                CallArgs::new(ctl.args(remaining)).with_controls(controls.as_slice()),
            )
        })
        .with_controlled_adjoint(move |ctx, controls: &QirArray<QubitId>, remaining: B| {
            ctladj.target.adjoint().controlled().invoke(
                ctx,
                CallArgs::new(ctladj.args(remaining)).with_controls(controls.as_slice()),
            )
        });
        trace!("partial application of {}", self.op.name);
        Callable::new(op)
    }
}
