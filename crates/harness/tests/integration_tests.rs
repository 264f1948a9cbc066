//! Calibration sweep integration tests
//!
//! End-to-end checks of the fixed-point kernels against the float
//! references across bit-width configurations.

use qact_harness::{exp_sweep, gate_sweep, softmax, ErrorStats, SweepEntry};
use qact_kernels::GateCoefficients;

const SILU_COEFFS: [f64; 5] = [0.0052629, -0.06949947, 0.32063845, -0.02623376, 0.00206111];
const SILU_BOUND: f64 = 4.6;

#[test]
fn exp_error_does_not_increase_with_fractional_bits() {
    // Integer bits pinned at 8: enough for the n = 64 divisor constant and
    // the [0, 1] output range. Extra integer bits would only waste budget.
    let configs: Vec<(u32, u32)> = [8u32, 12, 16, 20, 24].iter().map(|&f| (8, f)).collect();
    let entries = exp_sweep(&configs, 1000).unwrap();

    for pair in entries.windows(2) {
        assert!(
            pair[1].stats.mean_abs <= pair[0].stats.mean_abs,
            "mean abs error rose from Q8.{} ({:e}) to Q8.{} ({:e})",
            pair[0].fractional_bits,
            pair[0].stats.mean_abs,
            pair[1].fractional_bits,
            pair[1].stats.mean_abs
        );
    }

    // The finest configuration sits at the limit-form approximation floor.
    let finest = entries.last().unwrap();
    assert!(finest.stats.mean_abs < 1.5e-3);
    assert!(finest.stats.max_abs < 5e-3);
}

#[test]
fn gate_error_drops_to_fit_floor() {
    let coefficients = GateCoefficients::new(&SILU_COEFFS, SILU_BOUND).unwrap();

    // Quantization dominates at coarse fractions and shrinks monotonically
    // until the polynomial fit error takes over around 16 bits.
    let entries = gate_sweep(&coefficients, 12, &[8, 10, 12, 14, 16], 1000).unwrap();
    for pair in entries.windows(2) {
        assert!(
            pair[1].stats.mean_abs <= pair[0].stats.mean_abs,
            "gate mean abs error rose between Q12.{} and Q12.{}",
            pair[0].fractional_bits,
            pair[1].fractional_bits
        );
    }

    // Past the floor, deeper fractions neither help nor hurt measurably.
    let deep = gate_sweep(&coefficients, 12, &[16, 20, 24], 1000).unwrap();
    let floor = deep[0].stats.mean_abs;
    for entry in &deep {
        assert!((entry.stats.mean_abs - floor).abs() < 1e-5);
        assert!(entry.stats.mean_abs < 1e-3);
    }
}

#[test]
fn best_ranking_prefers_finer_fractions() {
    let entries = exp_sweep(&[(8, 8), (8, 16), (8, 24)], 500).unwrap();
    let best = SweepEntry::best_by_mean_abs(&entries).unwrap();
    assert_eq!((best.integer_bits, best.fractional_bits), (8, 24));
}

#[test]
fn reference_softmax_matches_hand_computation() {
    let probs = softmax(&[0.0, 0.0]);
    assert!((probs[0] - 0.5).abs() < 1e-12);

    let probs = softmax(&[-0.5, -1.2, -3.5, -0.1]);
    let stats = ErrorStats::measure(&probs, &probs).unwrap();
    assert_eq!(stats.max_abs, 0.0);
    assert!((probs.iter().sum::<f64>() - 1.0).abs() < 1e-12);
}
