//! Bit-width sweep report
//!
//! Runs the exponential and gate calibration sweeps across a range of
//! fixed-point formats and logs a ranked report.
//!
//! Run with: cargo run -p qact-harness --bin sweep --release

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use qact_harness::{exp_sweep, gate_sweep, SweepEntry};
use qact_kernels::GateCoefficients;

/// SiLU calibration shipped with the reference coefficient set.
const SILU_COEFFS: [f64; 5] = [0.0052629, -0.06949947, 0.32063845, -0.02623376, 0.00206111];
const SILU_BOUND: f64 = 4.6;

const SAMPLES: usize = 1000;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sweep=info,qact_harness=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("QAct bit-width sweep, {SAMPLES} samples per configuration");

    // Exponential: integer bits fixed at 8 (covers the divisor constant
    // n = 64 and the [0, 1] output range), fractional bits swept.
    let exp_configs: Vec<(u32, u32)> = [8u32, 12, 14, 16, 18, 20, 22, 24, 26, 28]
        .iter()
        .map(|&frac| (8u32, frac))
        .collect();
    let exp_entries = exp_sweep(&exp_configs, SAMPLES)?;

    tracing::info!("exponential vs float exp over [-13, 0]:");
    for entry in &exp_entries {
        tracing::info!(
            "  Q{}.{} (total {:2}) mean_abs={:.3e} max_abs={:.3e} mean_rel={:.3e}",
            entry.integer_bits,
            entry.fractional_bits,
            entry.total_bits(),
            entry.stats.mean_abs,
            entry.stats.max_abs,
            entry.stats.mean_rel,
        );
    }
    if let Some(best) = SweepEntry::best_by_mean_abs(&exp_entries) {
        tracing::info!(
            "best exponential format by mean abs error: Q{}.{}",
            best.integer_bits,
            best.fractional_bits
        );
    }

    // Gate: SiLU coefficients over [-4.6, 4.6].
    let coefficients = GateCoefficients::new(&SILU_COEFFS, SILU_BOUND)?;
    let gate_entries = gate_sweep(&coefficients, 12, &[8, 10, 12, 14, 16, 18, 20, 24], SAMPLES)?;

    tracing::info!("piecewise gate vs float SiLU over [-{SILU_BOUND}, {SILU_BOUND}]:");
    for entry in &gate_entries {
        tracing::info!(
            "  Q{}.{} (total {:2}) mean_abs={:.3e} max_abs={:.3e}",
            entry.integer_bits,
            entry.fractional_bits,
            entry.total_bits(),
            entry.stats.mean_abs,
            entry.stats.max_abs,
        );
    }
    if let Some(best) = SweepEntry::best_by_mean_abs(&gate_entries) {
        tracing::info!(
            "best gate format by mean abs error: Q{}.{}",
            best.integer_bits,
            best.fractional_bits
        );
    }

    Ok(())
}
