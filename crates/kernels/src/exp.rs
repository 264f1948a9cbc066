//! Fixed-point exponential
//!
//! Approximates `exp(x)` over a bounded negative domain (calibration range
//! `[-13, 0]`) through the compound-interest limit `(1 + x/n)^n` with
//! `n = 2^k`, so the whole computation is a divide, an add and `k`
//! squarings on integer codes. Precision is governed entirely by the
//! fractional bit width; integer bits only need to cover the output range
//! `[0, 1]` plus the constant `n` used on the input side.

use qact_fixed_point::FixedPointConfig;

use crate::error::Result;

/// Default `k` for `n = 2^k = 64`, the reference trade-off between
/// approximation quality and squaring count.
pub const DEFAULT_LOG2_N: u32 = 6;

/// Exponential kernel with precomputed constants.
#[derive(Debug, Clone)]
pub struct ExpKernel {
    config: FixedPointConfig,
    n: u32,
    n_code: i64,
}

impl ExpKernel {
    /// Kernel with the default `n = 64`.
    pub fn new(config: FixedPointConfig) -> Self {
        Self::with_log2_n(config, DEFAULT_LOG2_N)
    }

    /// Kernel with `n = 2^log2_n`. The code for `n` is quantized once here;
    /// on formats too narrow to represent `n` it saturates, matching the
    /// behavior of every other out-of-range constant.
    pub fn with_log2_n(config: FixedPointConfig, log2_n: u32) -> Self {
        let n = 1u32 << log2_n;
        Self {
            config,
            n,
            n_code: config.quantize(n as f64),
        }
    }

    pub fn config(&self) -> FixedPointConfig {
        self.config
    }

    pub fn n(&self) -> u32 {
        self.n
    }

    /// `exp` on an already-quantized code, returning the raw result code so
    /// callers composing further fixed-point steps (softmax) avoid any
    /// redundant rounding through floats.
    pub fn eval_code(&self, x: i64) -> Result<i64> {
        let cfg = &self.config;
        let x_over_n = cfg.div(x, self.n_code)?;
        let base = cfg.add(cfg.one(), x_over_n);
        Ok(cfg.pow(base, self.n))
    }

    /// `exp` on a real input: quantizes, evaluates, dequantizes.
    pub fn eval(&self, x: f64) -> Result<f64> {
        let code = self.eval_code(self.config.quantize(x))?;
        Ok(self.config.dequantize(code))
    }
}
