//! Bit-width configuration sweeps
//!
//! Calibration utilities that evaluate the fixed-point kernels across many
//! `(integer_bits, fractional_bits)` configurations and rank them by error
//! against the float references. These drive offline format selection;
//! the runtime core never depends on them.

use qact_fixed_point::FixedPointConfig;
use qact_kernels::{ExpKernel, GateCoefficients, GateEvaluator};
use serde::{Deserialize, Serialize};

use crate::error::{HarnessError, Result};
use crate::reference;

/// Input range the exponential is calibrated for.
pub const EXP_CALIBRATION_RANGE: (f64, f64) = (-13.0, 0.0);

/// Absolute and relative error statistics of an approximation against a
/// ground-truth sample set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ErrorStats {
    pub max_abs: f64,
    pub mean_abs: f64,
    pub max_rel: f64,
    pub mean_rel: f64,
}

impl ErrorStats {
    /// Measure element-wise statistics. Relative error is guarded with a
    /// small denominator floor so exact zeros in the truth do not blow up.
    pub fn measure(approx: &[f64], truth: &[f64]) -> Result<Self> {
        if approx.len() != truth.len() {
            return Err(HarnessError::LengthMismatch {
                approx: approx.len(),
                truth: truth.len(),
            });
        }
        if approx.is_empty() {
            return Err(HarnessError::EmptySamples);
        }

        let mut max_abs: f64 = 0.0;
        let mut sum_abs = 0.0;
        let mut max_rel: f64 = 0.0;
        let mut sum_rel = 0.0;
        for (&a, &t) in approx.iter().zip(truth) {
            let abs = (a - t).abs();
            let rel = abs / (t.abs() + 1e-10);
            max_abs = max_abs.max(abs);
            sum_abs += abs;
            max_rel = max_rel.max(rel);
            sum_rel += rel;
        }
        let n = approx.len() as f64;
        Ok(Self {
            max_abs,
            mean_abs: sum_abs / n,
            max_rel,
            mean_rel: sum_rel / n,
        })
    }
}

/// One swept configuration and its measured error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepEntry {
    pub integer_bits: u32,
    pub fractional_bits: u32,
    pub stats: ErrorStats,
}

impl SweepEntry {
    pub fn total_bits(&self) -> u32 {
        self.integer_bits + self.fractional_bits
    }

    /// Rank a sweep by mean absolute error.
    pub fn best_by_mean_abs(entries: &[SweepEntry]) -> Option<&SweepEntry> {
        entries
            .iter()
            .min_by(|a, b| a.stats.mean_abs.total_cmp(&b.stats.mean_abs))
    }
}

fn linspace(range: (f64, f64), samples: usize) -> Vec<f64> {
    let (lo, hi) = range;
    let step = (hi - lo) / (samples - 1) as f64;
    (0..samples).map(|i| lo + i as f64 * step).collect()
}

/// Measure the fixed-point exponential against float `exp` over the
/// calibration range for each candidate configuration.
pub fn exp_sweep(configs: &[(u32, u32)], samples: usize) -> Result<Vec<SweepEntry>> {
    let xs = linspace(EXP_CALIBRATION_RANGE, samples);
    let truth: Vec<f64> = xs.iter().map(|&x| x.exp()).collect();

    let mut entries = Vec::with_capacity(configs.len());
    for &(integer_bits, fractional_bits) in configs {
        let kernel = ExpKernel::new(FixedPointConfig::new(integer_bits, fractional_bits)?);
        let approx = xs
            .iter()
            .map(|&x| kernel.eval(x))
            .collect::<qact_kernels::Result<Vec<_>>>()?;
        entries.push(SweepEntry {
            integer_bits,
            fractional_bits,
            stats: ErrorStats::measure(&approx, &truth)?,
        });
    }
    Ok(entries)
}

/// Measure the piecewise gate against float SiLU over `[-bound, bound]`,
/// sweeping fractional bits at a fixed integer width.
pub fn gate_sweep(
    coefficients: &GateCoefficients,
    integer_bits: u32,
    fractional_bits: &[u32],
    samples: usize,
) -> Result<Vec<SweepEntry>> {
    let bound = coefficients.bound();
    let xs = linspace((-bound, bound), samples);
    let truth: Vec<f64> = xs.iter().map(|&x| reference::silu(x)).collect();

    let mut entries = Vec::with_capacity(fractional_bits.len());
    for &frac in fractional_bits {
        let evaluator = GateEvaluator::new(
            FixedPointConfig::new(integer_bits, frac)?,
            coefficients,
        );
        let approx: Vec<f64> = xs.iter().map(|&x| evaluator.eval(x)).collect();
        entries.push(SweepEntry {
            integer_bits,
            fractional_bits: frac,
            stats: ErrorStats::measure(&approx, &truth)?,
        });
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measure_rejects_mismatched_lengths() {
        assert!(matches!(
            ErrorStats::measure(&[1.0], &[1.0, 2.0]),
            Err(HarnessError::LengthMismatch { .. })
        ));
        assert!(matches!(
            ErrorStats::measure(&[], &[]),
            Err(HarnessError::EmptySamples)
        ));
    }

    #[test]
    fn test_measure_exact_match() {
        let stats = ErrorStats::measure(&[1.0, 2.0], &[1.0, 2.0]).unwrap();
        assert_eq!(stats.max_abs, 0.0);
        assert_eq!(stats.mean_abs, 0.0);
    }

    #[test]
    fn test_best_by_mean_abs() {
        let entries = exp_sweep(&[(8, 8), (8, 24)], 200).unwrap();
        let best = SweepEntry::best_by_mean_abs(&entries).unwrap();
        assert_eq!(best.fractional_bits, 24);
    }

    #[test]
    fn test_sweep_entry_serializes() {
        let entries = exp_sweep(&[(8, 16)], 100).unwrap();
        let json = serde_json::to_string(&entries).unwrap();
        let back: Vec<SweepEntry> = serde_json::from_str(&json).unwrap();
        assert_eq!(back.len(), 1);
        assert_eq!(back[0].total_bits(), 24);
    }
}
