//! Statevector simulation engine.
//!
//! Qubits are addressed by bit position. Positions are dense: adding a
//! qubit appends the highest bit, removing one shifts every higher
//! position down by one.

use num_complex::Complex64;
use rand::Rng;
use std::f64::consts::{FRAC_1_SQRT_2, FRAC_PI_4};

use qirt_ir::Gate;

type Matrix = [[Complex64; 2]; 2];

const ZERO: Complex64 = Complex64::new(0.0, 0.0);
const ONE: Complex64 = Complex64::new(1.0, 0.0);
const I: Complex64 = Complex64::new(0.0, 1.0);

/// A statevector representing a quantum state.
pub struct Statevector {
    /// The state amplitudes (2^n complex numbers).
    amplitudes: Vec<Complex64>,
    /// Number of qubits.
    num_qubits: usize,
}

impl Statevector {
    /// Create a new statevector initialized to |0...0⟩.
    pub fn new(num_qubits: usize) -> Self {
        let size = 1 << num_qubits;
        let mut amplitudes = vec![ZERO; size];
        amplitudes[0] = ONE;
        Self {
            amplitudes,
            num_qubits,
        }
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Append a qubit in |0⟩ and return its position.
    pub fn add_qubit(&mut self) -> usize {
        let size = self.amplitudes.len();
        self.amplitudes.resize(size * 2, ZERO);
        self.num_qubits += 1;
        self.num_qubits - 1
    }

    /// Remove the qubit at `position`, which must be in |0⟩.
    ///
    /// Amplitudes with that bit set are dropped; callers reset the qubit
    /// first.
    pub fn remove_qubit(&mut self, position: usize) {
        let low = (1 << position) - 1;
        let half = self.amplitudes.len() / 2;
        let kept: Vec<Complex64> = (0..half)
            .map(|i| self.amplitudes[(i & low) | ((i & !low) << 1)])
            .collect();
        self.amplitudes = kept;
        self.num_qubits -= 1;
    }

    /// Apply `gate` to `target`, conditioned on every bit in `controls`.
    pub fn apply_gate(&mut self, gate: Gate, controls: usize, target: usize) {
        match gate {
            Gate::I => {}
            Gate::X => self.apply_x(controls, target),
            _ => self.apply_matrix(&gate_matrix(gate), controls, target),
        }
    }

    // =========================================================================
    // Gate kernels
    // =========================================================================

    fn apply_x(&mut self, controls: usize, target: usize) {
        let tgt_mask = 1 << target;
        for i in 0..self.amplitudes.len() {
            if (i & controls == controls) && (i & tgt_mask == 0) {
                let j = i | tgt_mask;
                self.amplitudes.swap(i, j);
            }
        }
    }

    fn apply_matrix(&mut self, m: &Matrix, controls: usize, target: usize) {
        let tgt_mask = 1 << target;
        for i in 0..self.amplitudes.len() {
            if (i & controls == controls) && (i & tgt_mask == 0) {
                let j = i | tgt_mask;
                let a = self.amplitudes[i];
                let b = self.amplitudes[j];
                self.amplitudes[i] = m[0][0] * a + m[0][1] * b;
                self.amplitudes[j] = m[1][0] * a + m[1][1] * b;
            }
        }
    }

    // =========================================================================
    // Measurement
    // =========================================================================

    /// Probability of observing |1⟩ on `qubit`.
    pub fn probability_one(&self, qubit: usize) -> f64 {
        let mask = 1 << qubit;
        self.amplitudes
            .iter()
            .enumerate()
            .filter(|(i, _)| i & mask != 0)
            .map(|(_, amp)| amp.norm_sqr())
            .sum()
    }

    /// Project `qubit` onto `outcome` and renormalize.
    pub fn collapse(&mut self, qubit: usize, outcome: bool) {
        let mask = 1 << qubit;
        let mut norm_sq = 0.0;
        for (i, amp) in self.amplitudes.iter_mut().enumerate() {
            if (i & mask != 0) != outcome {
                *amp = ZERO;
            } else {
                norm_sq += amp.norm_sqr();
            }
        }
        let norm = norm_sq.sqrt();
        if norm > 0.0 {
            for amp in &mut self.amplitudes {
                *amp /= norm;
            }
        }
    }

    /// Measure `qubit` in the computational basis, collapsing the state.
    pub fn measure<R: Rng>(&mut self, qubit: usize, rng: &mut R) -> bool {
        let p_one = self.probability_one(qubit);
        let r: f64 = rng.r#gen();
        let outcome = r < p_one;
        self.collapse(qubit, outcome);
        outcome
    }
}

/// The 2x2 unitary of a single-qubit gate.
fn gate_matrix(gate: Gate) -> Matrix {
    let phase = |theta: f64| Complex64::from_polar(1.0, theta);
    match gate {
        Gate::I => [[ONE, ZERO], [ZERO, ONE]],
        Gate::X => [[ZERO, ONE], [ONE, ZERO]],
        Gate::Y => [[ZERO, -I], [I, ZERO]],
        Gate::Z => [[ONE, ZERO], [ZERO, -ONE]],
        Gate::H => {
            let h = Complex64::new(FRAC_1_SQRT_2, 0.0);
            [[h, h], [h, -h]]
        }
        Gate::S => [[ONE, ZERO], [ZERO, I]],
        Gate::Sdg => [[ONE, ZERO], [ZERO, -I]],
        Gate::T => [[ONE, ZERO], [ZERO, phase(FRAC_PI_4)]],
        Gate::Tdg => [[ONE, ZERO], [ZERO, phase(-FRAC_PI_4)]],
        Gate::SX => {
            let p = Complex64::new(0.5, 0.5);
            let m = Complex64::new(0.5, -0.5);
            [[p, m], [m, p]]
        }
        Gate::SXdg => {
            let p = Complex64::new(0.5, -0.5);
            let m = Complex64::new(0.5, 0.5);
            [[p, m], [m, p]]
        }
        Gate::Rx(theta) => {
            let c = Complex64::new((theta / 2.0).cos(), 0.0);
            let s = Complex64::new(0.0, -(theta / 2.0).sin());
            [[c, s], [s, c]]
        }
        Gate::Ry(theta) => {
            let c = Complex64::new((theta / 2.0).cos(), 0.0);
            let s = Complex64::new((theta / 2.0).sin(), 0.0);
            [[c, -s], [s, c]]
        }
        Gate::Rz(theta) => [[phase(-theta / 2.0), ZERO], [ZERO, phase(theta / 2.0)]],
        Gate::R1(theta) => [[ONE, ZERO], [ZERO, phase(theta)]],
    }
}
