//! Fixed-point vector operations

use crate::config::FixedPointConfig;
use crate::error::{FixedPointError, Result};

/// A vector of raw codes sharing one fixed-point configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedVector {
    /// Raw codes
    pub codes: Vec<i64>,
    /// Common configuration for all elements
    pub config: FixedPointConfig,
}

impl FixedVector {
    /// Wrap existing codes under the given configuration.
    pub fn from_codes(codes: Vec<i64>, config: FixedPointConfig) -> Self {
        Self { codes, config }
    }

    /// Quantize a slice of real values.
    pub fn quantize(values: &[f64], config: FixedPointConfig) -> Self {
        let codes = values.iter().map(|&v| config.quantize(v)).collect();
        Self { codes, config }
    }

    /// Recover the real values.
    pub fn dequantize(&self) -> Vec<f64> {
        self.codes.iter().map(|&c| self.config.dequantize(c)).collect()
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<i64> {
        self.codes.get(index).copied()
    }

    /// Create a zero vector of the given length.
    pub fn zeros(len: usize, config: FixedPointConfig) -> Self {
        Self {
            codes: vec![0; len],
            config,
        }
    }

    /// Largest code, or `None` for an empty vector.
    pub fn max_code(&self) -> Option<i64> {
        self.codes.iter().copied().max()
    }

    /// Subtract a scalar code from every element (saturating).
    pub fn shifted(&self, delta: i64) -> Self {
        let codes = self
            .codes
            .iter()
            .map(|&c| self.config.sub(c, delta))
            .collect();
        Self {
            codes,
            config: self.config,
        }
    }

    /// Saturating sum of all codes.
    pub fn sum_code(&self) -> i64 {
        self.codes
            .iter()
            .fold(0i64, |acc, &c| self.config.add(acc, c))
    }

    fn check_compatible(&self, other: &Self) -> Result<()> {
        if self.config != other.config {
            return Err(FixedPointError::ConfigMismatch {
                expected_int: self.config.integer_bits(),
                expected_frac: self.config.fractional_bits(),
                got_int: other.config.integer_bits(),
                got_frac: other.config.fractional_bits(),
            });
        }
        if self.len() != other.len() {
            return Err(FixedPointError::DimensionMismatch {
                expected: self.len(),
                got: other.len(),
            });
        }
        Ok(())
    }

    /// Element-wise saturating addition.
    pub fn add(&self, other: &Self) -> Result<Self> {
        self.check_compatible(other)?;
        let codes = self
            .codes
            .iter()
            .zip(&other.codes)
            .map(|(&a, &b)| self.config.add(a, b))
            .collect();
        Ok(Self {
            codes,
            config: self.config,
        })
    }

    /// Element-wise saturating subtraction.
    pub fn sub(&self, other: &Self) -> Result<Self> {
        self.check_compatible(other)?;
        let codes = self
            .codes
            .iter()
            .zip(&other.codes)
            .map(|(&a, &b)| self.config.sub(a, b))
            .collect();
        Ok(Self {
            codes,
            config: self.config,
        })
    }
}
