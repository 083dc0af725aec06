//! Resource Tracing Demo
//!
//! Runs a GHZ preparation and a teleportation on the tracer backend and
//! prints the collected metrics as JSON.

use anyhow::{Context, Result};
use tracing::info;

use qirt_adapter_sim::TracerBackend;
use qirt_demos::programs::{ghz, teleport};
use qirt_demos::{print_header, print_result, print_section};
use qirt_runtime::tracing_config::{TracingConfig, init_tracing};
use qirt_runtime::{ExecutionContext, RuntimeConfig, run_program};

const GHZ_WIDTH: usize = 8;

fn main() -> Result<()> {
    init_tracing(TracingConfig::from_env())?;
    let config = RuntimeConfig::load(None).context("loading runtime configuration")?;

    print_header("Resource Tracing");

    let mut tracer = TracerBackend::new();
    let mut ctx = ExecutionContext::new(config.clone());

    let ((), report) = run_program(&mut ctx, &mut tracer, config.track_allocations, |ctx| {
        ghz(ctx, GHZ_WIDTH)?;
        teleport(ctx, std::f64::consts::FRAC_PI_2)?;
        Ok(())
    })?;

    let metrics = tracer.take_metrics();
    info!("Traced {} gates", metrics.total_gates());
    print_section("Summary");
    print_result("Total gates", metrics.total_gates());
    print_result("Measurements", metrics.measurements);
    print_result("Peak width", metrics.peak_width);
    print_result("Depth", metrics.depth);
    print_result("Leak report", &report);

    print_section("Metrics (JSON)");
    let json = serde_json::to_string_pretty(&metrics).context("serializing metrics")?;
    println!("{json}");
    Ok(())
}
