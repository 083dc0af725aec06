//! Intrinsic dispatch shims (`__quantum__qis__*`).
//!
//! One function per QIR intrinsic, named `<gate>_<specialization>`. Each
//! shim forwards to the backend of the innermost scope and does nothing
//! else; controlled shims unpack their control array into a slice.

use qirt_ir::{Gate, Pauli, QubitId, ResultId};

use crate::context::ExecutionContext;
use crate::error::RuntimeResult;
use crate::rt::QirArray;

macro_rules! single_qubit_gate {
    ($(#[$meta:meta])* $name:ident, $gate:expr) => {
        $(#[$meta])*
        pub fn $name(ctx: &mut ExecutionContext<'_>, qubit: QubitId) -> RuntimeResult<()> {
            ctx.apply($gate, qubit)
        }
    };
}

macro_rules! controlled_gate {
    ($(#[$meta:meta])* $name:ident, $gate:expr) => {
        $(#[$meta])*
        pub fn $name(
            ctx: &mut ExecutionContext<'_>,
            controls: &QirArray<QubitId>,
            qubit: QubitId,
        ) -> RuntimeResult<()> {
            ctx.apply_controlled($gate, controls.as_slice(), qubit)
        }
    };
}

macro_rules! rotation_gate {
    ($(#[$meta:meta])* $name:ident, $ctl_name:ident, $gate:path) => {
        $(#[$meta])*
        pub fn $name(
            ctx: &mut ExecutionContext<'_>,
            theta: f64,
            qubit: QubitId,
        ) -> RuntimeResult<()> {
            ctx.apply($gate(theta), qubit)
        }

        $(#[$meta])*
        ///
        /// Controlled form.
        pub fn $ctl_name(
            ctx: &mut ExecutionContext<'_>,
            controls: &QirArray<QubitId>,
            theta: f64,
            qubit: QubitId,
        ) -> RuntimeResult<()> {
            ctx.apply_controlled($gate(theta), controls.as_slice(), qubit)
        }
    };
}

single_qubit_gate!(
    /// Pauli X.
    x_body,
    Gate::X
);
controlled_gate!(
    /// Multi-controlled X.
    x_ctl,
    Gate::X
);
single_qubit_gate!(
    /// Pauli Y.
    y_body,
    Gate::Y
);
controlled_gate!(
    /// Multi-controlled Y.
    y_ctl,
    Gate::Y
);
single_qubit_gate!(
    /// Pauli Z.
    z_body,
    Gate::Z
);
controlled_gate!(
    /// Multi-controlled Z.
    z_ctl,
    Gate::Z
);
single_qubit_gate!(
    /// Hadamard.
    h_body,
    Gate::H
);
controlled_gate!(
    /// Multi-controlled Hadamard.
    h_ctl,
    Gate::H
);
single_qubit_gate!(
    /// S.
    s_body,
    Gate::S
);
single_qubit_gate!(
    /// Adjoint S.
    s_adj,
    Gate::Sdg
);
controlled_gate!(
    /// Multi-controlled S.
    s_ctl,
    Gate::S
);
controlled_gate!(
    /// Multi-controlled adjoint S.
    s_ctladj,
    Gate::Sdg
);
single_qubit_gate!(
    /// T.
    t_body,
    Gate::T
);
single_qubit_gate!(
    /// Adjoint T.
    t_adj,
    Gate::Tdg
);
controlled_gate!(
    /// Multi-controlled T.
    t_ctl,
    Gate::T
);
controlled_gate!(
    /// Multi-controlled adjoint T.
    t_ctladj,
    Gate::Tdg
);

rotation_gate!(
    /// Rotation about X by `theta`.
    rx_body,
    rx_ctl,
    Gate::Rx
);
rotation_gate!(
    /// Rotation about Y by `theta`.
    ry_body,
    ry_ctl,
    Gate::Ry
);
rotation_gate!(
    /// Rotation about Z by `theta`.
    rz_body,
    rz_ctl,
    Gate::Rz
);
rotation_gate!(
    /// Phase rotation `diag(1, e^{i theta})`.
    r1_body,
    r1_ctl,
    Gate::R1
);

/// CNOT.
pub fn cnot_body(
    ctx: &mut ExecutionContext<'_>,
    control: QubitId,
    target: QubitId,
) -> RuntimeResult<()> {
    ctx.apply_controlled(Gate::X, &[control], target)
}

/// Controlled Z.
pub fn cz_body(
    ctx: &mut ExecutionContext<'_>,
    control: QubitId,
    target: QubitId,
) -> RuntimeResult<()> {
    ctx.apply_controlled(Gate::Z, &[control], target)
}

/// Swap two qubits (three CNOTs).
pub fn swap_body(ctx: &mut ExecutionContext<'_>, a: QubitId, b: QubitId) -> RuntimeResult<()> {
    cnot_body(ctx, a, b)?;
    cnot_body(ctx, b, a)?;
    cnot_body(ctx, a, b)
}

/// Return a qubit to `|0⟩`.
///
/// Measures, flips on `One` and releases the intermediate result.
pub fn reset_body(ctx: &mut ExecutionContext<'_>, qubit: QubitId) -> RuntimeResult<()> {
    let result = ctx.measure(&[Pauli::Z], &[qubit])?;
    let is_one = ctx.backend()?.result_value(result)?;
    ctx.release_result(result)?;
    if is_one {
        ctx.apply(Gate::X, qubit)?;
    }
    Ok(())
}

/// Measure in the computational basis.
pub fn m_body(ctx: &mut ExecutionContext<'_>, qubit: QubitId) -> RuntimeResult<ResultId> {
    ctx.measure(&[Pauli::Z], &[qubit])
}

/// Measure `qubits` in the given Pauli `bases`.
pub fn measure_body(
    ctx: &mut ExecutionContext<'_>,
    bases: &QirArray<Pauli>,
    qubits: &QirArray<QubitId>,
) -> RuntimeResult<ResultId> {
    ctx.measure(bases.as_slice(), qubits.as_slice())
}

/// Apply any gate of the intrinsic set.
pub fn apply_body(ctx: &mut ExecutionContext<'_>, gate: Gate, qubit: QubitId) -> RuntimeResult<()> {
    ctx.apply(gate, qubit)
}

/// Apply any gate of the intrinsic set, controlled.
pub fn apply_ctl(
    ctx: &mut ExecutionContext<'_>,
    controls: &QirArray<QubitId>,
    gate: Gate,
    qubit: QubitId,
) -> RuntimeResult<()> {
    ctx.apply_controlled(gate, controls.as_slice(), qubit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RuntimeConfig;
    use crate::error::RuntimeError;
    use qirt_hal::{Backend, HalResult, HandleTable};

    /// Records every gate call as text.
    struct Recorder {
        qubits: HandleTable<QubitId, ()>,
        calls: Vec<String>,
    }

    impl Backend for Recorder {
        fn name(&self) -> &str {
            "recorder"
        }

        fn allocate_qubit(&mut self) -> HalResult<QubitId> {
            Ok(self.qubits.insert(()))
        }

        fn apply(&mut self, gate: Gate, target: QubitId) -> HalResult<()> {
            self.qubits.get(target, "apply")?;
            self.calls.push(format!("{gate} {target}"));
            Ok(())
        }

        fn apply_controlled(
            &mut self,
            gate: Gate,
            controls: &[QubitId],
            target: QubitId,
        ) -> HalResult<()> {
            self.calls.push(format!("c{gate} {controls:?} {target}"));
            Ok(())
        }
    }

    #[test]
    fn test_shims_forward_gates() {
        let mut backend = Recorder {
            qubits: HandleTable::new(),
            calls: Vec::new(),
        };
        let mut ctx = ExecutionContext::new(RuntimeConfig::default());
        {
            let mut scope = ctx.scoped(&mut backend, false);
            let a = scope.allocate_qubit().unwrap();
            let b = scope.allocate_qubit().unwrap();
            let ctls = QirArray::from_vec(vec![a]);

            s_adj(&mut scope, a).unwrap();
            t_ctladj(&mut scope, &ctls, b).unwrap();
            rz_body(&mut scope, 0.5, b).unwrap();
            r1_ctl(&mut scope, &ctls, 0.25, b).unwrap();
            cz_body(&mut scope, a, b).unwrap();
            apply_body(&mut scope, Gate::SX, a).unwrap();
            swap_body(&mut scope, a, b).unwrap();
        }

        assert_eq!(
            backend.calls,
            vec![
                "sdg q0",
                "ctdg [QubitId(0)] q1",
                "rz(0.5) q1",
                "cr1(0.25) [QubitId(0)] q1",
                "cz [QubitId(0)] q1",
                "sx q0",
                "cx [QubitId(0)] q1",
                "cx [QubitId(1)] q0",
                "cx [QubitId(0)] q1",
            ]
        );
    }

    #[test]
    fn test_shims_need_a_backend() {
        let mut ctx = ExecutionContext::new(RuntimeConfig::default());
        assert!(matches!(
            x_body(&mut ctx, QubitId(0)),
            Err(RuntimeError::NoActiveScope)
        ));
        let mut scope = ctx.scoped_classical(false);
        assert!(matches!(
            h_body(&mut scope, QubitId(0)),
            Err(RuntimeError::NoBackend)
        ));
    }
}
