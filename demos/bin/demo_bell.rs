//! Bell Pair Sampling Demo
//!
//! Runs a Bell-pair program repeatedly on the backend selected by the
//! runtime configuration (`QIRT_BACKEND`, default `fullstate`) and prints
//! the outcome histogram.

use anyhow::{Context, Result};
use tracing::info;

use qirt_adapter_sim::register_builtins;
use qirt_demos::programs::bell_pair;
use qirt_demos::{
    create_progress_bar, print_header, print_result, print_section, print_success, print_warning,
};
use qirt_hal::BackendRegistry;
use qirt_runtime::tracing_config::{TracingConfig, init_tracing};
use qirt_runtime::{ExecutionContext, RuntimeConfig, run_program};

const SHOTS: u64 = 1000;

fn main() -> Result<()> {
    init_tracing(TracingConfig::from_env())?;
    let config = RuntimeConfig::load(None).context("loading runtime configuration")?;

    print_header("Bell Pair Sampling");

    let mut registry = BackendRegistry::new();
    register_builtins(&mut registry);
    let mut backend = registry
        .create(config.backend_config())
        .with_context(|| format!("creating backend '{}'", config.backend))?;

    print_section("Configuration");
    print_result("Backend", backend.name());
    print_result("Shots", SHOTS);
    print_result("Leak policy", config.leak_policy);

    print_section("Sampling");
    let pb = create_progress_bar(SHOTS, "shots");
    let mut ctx = ExecutionContext::new(config.clone());
    let (counts, report) = run_program(
        &mut ctx,
        backend.as_mut(),
        config.track_allocations,
        |ctx| {
            let mut counts = [0u64; 4];
            for _ in 0..SHOTS {
                let (a, b) = bell_pair(ctx)?;
                counts[(usize::from(a) << 1) | usize::from(b)] += 1;
                pb.inc(1);
            }
            Ok(counts)
        },
    )?;
    pb.finish_and_clear();
    info!("Sampled {} shots on '{}'", SHOTS, config.backend);

    print_section("Results");
    for (outcome, count) in counts.iter().enumerate() {
        print_result(&format!("|{outcome:02b}⟩"), count);
    }

    let correlated = counts[0b00] + counts[0b11];
    if correlated == SHOTS {
        print_success("Every shot measured correlated qubits");
    } else {
        print_warning(&format!(
            "{} of {} shots were uncorrelated",
            SHOTS - correlated,
            SHOTS
        ));
    }
    if report.is_clean() {
        print_success("No leaked handles");
    } else {
        print_warning(&report.to_string());
    }
    Ok(())
}
