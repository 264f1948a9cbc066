//! Floating-point reference implementations
//!
//! Non-quantized counterparts of the fixed-point kernels, used to measure
//! quantization and approximation error. These are the ground truth the
//! sweeps compare against and are never part of the integer-only runtime
//! path.

use qact_kernels::GateCoefficients;

/// SiLU, `x * sigmoid(x)`.
pub fn silu(x: f64) -> f64 {
    x / (1.0 + (-x).exp())
}

/// Float counterpart of the piecewise degree-4 gate approximation.
pub fn gate_piecewise(x: f64, coefficients: &GateCoefficients) -> f64 {
    let bound = coefficients.bound();
    if x > bound {
        return x;
    }
    if x < -bound {
        return 0.0;
    }
    let t = x.abs();
    let mut poly = 0.0;
    for &c in coefficients.coeffs() {
        poly = poly * t + c;
    }
    poly + 0.5 * x
}

/// The limit-form exponential `(1 + x/n)^n` in floats, isolating the
/// inherent approximation error from the fixed-point quantization error.
pub fn exp_limit(x: f64, n: u32) -> f64 {
    (1.0 + x / n as f64).powi(n as i32)
}

/// Max-stabilized float softmax over one row.
pub fn softmax(logits: &[f64]) -> Vec<f64> {
    let max = logits.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = logits.iter().map(|&x| (x - max).exp()).collect();
    let sum: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}
