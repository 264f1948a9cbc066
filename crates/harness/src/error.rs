//! Harness error types

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum HarnessError {
    #[error("Fixed-point error: {0}")]
    FixedPoint(#[from] qact_fixed_point::FixedPointError),

    #[error("Kernel error: {0}")]
    Kernel(#[from] qact_kernels::KernelError),

    #[error("Length mismatch between approximation and truth: {approx} vs {truth}")]
    LengthMismatch { approx: usize, truth: usize },

    #[error("Cannot measure error statistics over an empty sample set")]
    EmptySamples,
}

pub type Result<T> = std::result::Result<T, HarnessError>;
