//! Quantum Teleportation Demo
//!
//! Teleports `Rx(θ)|0⟩` on the full-state simulator and compares the
//! measured `|1⟩` frequency on the receiving qubit with `sin²(θ/2)`.

use std::f64::consts::PI;

use anyhow::{Context, Result};

use qirt_adapter_sim::FullStateSimulator;
use qirt_demos::programs::teleport;
use qirt_demos::{print_header, print_result, print_section, print_success};
use qirt_runtime::tracing_config::{TracingConfig, init_tracing};
use qirt_runtime::{ExecutionContext, RuntimeConfig, run_program};

const SHOTS: u32 = 500;

fn main() -> Result<()> {
    init_tracing(TracingConfig::from_env())?;
    let config = RuntimeConfig::load(None).context("loading runtime configuration")?;

    print_header("Quantum Teleportation");

    let mut sim = match config.seed {
        Some(seed) => FullStateSimulator::with_seed(seed),
        None => FullStateSimulator::new(),
    };
    let mut ctx = ExecutionContext::new(config.clone());

    print_section("Teleported states");
    let angles = [0.0, PI / 3.0, PI / 2.0, 2.0 * PI / 3.0, PI];
    let (rows, report) = run_program(&mut ctx, &mut sim, config.track_allocations, |ctx| {
        let mut rows = Vec::with_capacity(angles.len());
        for theta in angles {
            let mut ones = 0u32;
            for _ in 0..SHOTS {
                ones += u32::from(teleport(ctx, theta)?);
            }
            rows.push((theta, f64::from(ones) / f64::from(SHOTS)));
        }
        Ok(rows)
    })?;

    for (theta, observed) in rows {
        let expected = (theta / 2.0).sin().powi(2);
        print_result(
            &format!("θ = {theta:.3}"),
            format!("P(1) observed {observed:.3}, expected {expected:.3}"),
        );
    }

    print_section("Teardown");
    print_result("Leak report", &report);
    print_result("Qubits still live", sim.num_qubits());
    print_success("Teleportation complete");
    Ok(())
}
