//! Intrinsic gate set.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{IrError, IrResult};

/// Single-target gates a backend can be asked to apply.
///
/// Multi-qubit gates (`cnot`, `cz`, `ccx`, ...) are expressed as the
/// controlled form of one of these.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Gate {
    /// Identity gate.
    I,
    /// Pauli-X gate.
    X,
    /// Pauli-Y gate.
    Y,
    /// Pauli-Z gate.
    Z,
    /// Hadamard gate.
    H,
    /// S gate (sqrt(Z)).
    S,
    /// S-dagger gate.
    Sdg,
    /// T gate (fourth root of Z).
    T,
    /// T-dagger gate.
    Tdg,
    /// sqrt(X) gate.
    SX,
    /// sqrt(X)-dagger gate.
    SXdg,
    /// Rotation around X axis.
    Rx(f64),
    /// Rotation around Y axis.
    Ry(f64),
    /// Rotation around Z axis.
    Rz(f64),
    /// Phase rotation `diag(1, e^{iθ})`.
    R1(f64),
}

impl Gate {
    /// The QIR intrinsic name of this gate.
    pub fn name(&self) -> &'static str {
        match self {
            Gate::I => "i",
            Gate::X => "x",
            Gate::Y => "y",
            Gate::Z => "z",
            Gate::H => "h",
            Gate::S => "s",
            Gate::Sdg => "sdg",
            Gate::T => "t",
            Gate::Tdg => "tdg",
            Gate::SX => "sx",
            Gate::SXdg => "sxdg",
            Gate::Rx(_) => "rx",
            Gate::Ry(_) => "ry",
            Gate::Rz(_) => "rz",
            Gate::R1(_) => "r1",
        }
    }

    /// Parse a gate from its QIR name and parameter list.
    pub fn from_name(name: &str, params: &[f64]) -> IrResult<Self> {
        let fixed = |gate: Gate| -> IrResult<Gate> {
            if params.is_empty() {
                Ok(gate)
            } else {
                Err(IrError::ParameterCountMismatch {
                    gate_name: name.to_string(),
                    expected: 0,
                    got: params.len(),
                })
            }
        };
        let rotation = |make: fn(f64) -> Gate| -> IrResult<Gate> {
            match params {
                [theta] => Ok(make(*theta)),
                _ => Err(IrError::ParameterCountMismatch {
                    gate_name: name.to_string(),
                    expected: 1,
                    got: params.len(),
                }),
            }
        };

        match name {
            "i" => fixed(Gate::I),
            "x" => fixed(Gate::X),
            "y" => fixed(Gate::Y),
            "z" => fixed(Gate::Z),
            "h" => fixed(Gate::H),
            "s" => fixed(Gate::S),
            "sdg" | "s__adj" => fixed(Gate::Sdg),
            "t" => fixed(Gate::T),
            "tdg" | "t__adj" => fixed(Gate::Tdg),
            "sx" => fixed(Gate::SX),
            "sxdg" | "sx__adj" => fixed(Gate::SXdg),
            "rx" => rotation(Gate::Rx),
            "ry" => rotation(Gate::Ry),
            "rz" => rotation(Gate::Rz),
            "r1" => rotation(Gate::R1),
            other => Err(IrError::UnknownGate(other.to_string())),
        }
    }

    /// The inverse of this gate.
    pub fn adjoint(&self) -> Gate {
        match *self {
            Gate::S => Gate::Sdg,
            Gate::Sdg => Gate::S,
            Gate::T => Gate::Tdg,
            Gate::Tdg => Gate::T,
            Gate::SX => Gate::SXdg,
            Gate::SXdg => Gate::SX,
            Gate::Rx(theta) => Gate::Rx(-theta),
            Gate::Ry(theta) => Gate::Ry(-theta),
            Gate::Rz(theta) => Gate::Rz(-theta),
            Gate::R1(theta) => Gate::R1(-theta),
            g @ (Gate::I | Gate::X | Gate::Y | Gate::Z | Gate::H) => g,
        }
    }

    /// The rotation angle, for parameterized gates.
    pub fn parameter(&self) -> Option<f64> {
        match *self {
            Gate::Rx(t) | Gate::Ry(t) | Gate::Rz(t) | Gate::R1(t) => Some(t),
            _ => None,
        }
    }

    /// Whether the gate is diagonal in the computational basis.
    ///
    /// Diagonal gates only change phases, so they leave basis states
    /// unchanged.
    pub fn is_diagonal(&self) -> bool {
        matches!(
            self,
            Gate::I
                | Gate::Z
                | Gate::S
                | Gate::Sdg
                | Gate::T
                | Gate::Tdg
                | Gate::Rz(_)
                | Gate::R1(_)
        )
    }

    /// Whether the gate maps each basis state to the other one (up to phase).
    pub fn is_bit_flip(&self) -> bool {
        matches!(self, Gate::X | Gate::Y)
    }
}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.parameter() {
            Some(theta) => write!(f, "{}({theta})", self.name()),
            None => f.write_str(self.name()),
        }
    }
}
