//! Fixed-point softmax pipeline
//!
//! For every row: quantize, subtract the row maximum (exact in integer
//! arithmetic, the standard stabilization trick), exponentiate each shifted
//! element with the fixed-point [`ExpKernel`], sum, and divide each
//! exponential by the sum. All steps stay on raw codes; dequantization is
//! optional and happens only at the edges.

use qact_fixed_point::{FixedPointConfig, FixedVector};
use rayon::prelude::*;

use crate::error::{KernelError, Result};
use crate::exp::ExpKernel;

/// Softmax over fixed-point codes.
#[derive(Debug, Clone)]
pub struct Softmax {
    exp: ExpKernel,
}

impl Softmax {
    pub fn new(config: FixedPointConfig) -> Self {
        Self {
            exp: ExpKernel::new(config),
        }
    }

    /// Build on a custom exponential kernel (non-default `n`).
    pub fn with_exp_kernel(exp: ExpKernel) -> Self {
        Self { exp }
    }

    pub fn config(&self) -> FixedPointConfig {
        self.exp.config()
    }

    /// Normalize a vector of exponential codes: fixed-point sum, then
    /// per-element divide. A sum of exactly zero (all exponentials rounded
    /// away under extreme under-quantization) is an explicit failure, never
    /// silent zeros.
    pub fn normalize_codes(&self, exps: &[i64]) -> Result<Vec<i64>> {
        let cfg = self.config();
        let sum = exps.iter().fold(0i64, |acc, &e| cfg.add(acc, e));
        if sum == 0 {
            return Err(KernelError::ZeroSum);
        }
        exps.iter()
            .map(|&e| cfg.div(e, sum).map_err(KernelError::from))
            .collect()
    }

    /// Softmax over one row of codes, returning probability codes in the
    /// same order.
    pub fn row_codes(&self, row: &[i64]) -> Result<Vec<i64>> {
        if row.is_empty() {
            return Err(KernelError::EmptyInput);
        }
        let cfg = self.config();
        // Max subtraction is plain integer subtraction, hence exact; it
        // also pins one element at exp(0) = one.
        let max = row.iter().copied().max().unwrap_or(0);
        let exps = row
            .iter()
            .map(|&c| self.exp.eval_code(cfg.sub(c, max)))
            .collect::<Result<Vec<_>>>()?;
        self.normalize_codes(&exps)
    }

    /// Quantize a row of real logits and return probability codes for
    /// downstream integer-only consumers.
    pub fn forward_codes(&self, logits: &[f64]) -> Result<Vec<i64>> {
        let row = FixedVector::quantize(logits, self.config());
        self.row_codes(&row.codes)
    }

    /// Softmax over one row of real logits, returning real probabilities.
    pub fn forward(&self, logits: &[f64]) -> Result<Vec<f64>> {
        let cfg = self.config();
        Ok(self
            .forward_codes(logits)?
            .into_iter()
            .map(|c| cfg.dequantize(c))
            .collect())
    }

    /// Softmax along `axis` of a dense row-major tensor.
    ///
    /// The surrounding index arithmetic is bookkeeping around the per-row
    /// pipeline; rows are independent and evaluated in parallel.
    pub fn forward_axis(&self, data: &[f64], shape: &[usize], axis: usize) -> Result<Vec<f64>> {
        let rank = shape.len();
        if axis >= rank {
            return Err(KernelError::InvalidAxis { axis, rank });
        }
        let expected: usize = shape.iter().product();
        if expected != data.len() {
            return Err(KernelError::ShapeMismatch {
                shape: shape.to_vec(),
                len: data.len(),
            });
        }

        let lane = shape[axis];
        let inner: usize = shape[axis + 1..].iter().product();
        let outer: usize = shape[..axis].iter().product();

        let lanes = (0..outer * inner)
            .into_par_iter()
            .map(|id| {
                let o = id / inner;
                let i = id % inner;
                let base = o * lane * inner + i;
                let row: Vec<f64> = (0..lane).map(|j| data[base + j * inner]).collect();
                let probs = self.forward(&row)?;
                Ok((base, probs))
            })
            .collect::<Result<Vec<_>>>()?;

        let mut out = vec![0.0; data.len()];
        for (base, probs) in lanes {
            for (j, p) in probs.into_iter().enumerate() {
                out[base + j * inner] = p;
            }
        }
        Ok(out)
    }
}
