//! Kernel error types

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum KernelError {
    #[error("Fixed-point error: {0}")]
    FixedPoint(#[from] qact_fixed_point::FixedPointError),

    #[error("Expected exactly {expected} polynomial coefficients, got {got}")]
    CoefficientCount { expected: usize, got: usize },

    #[error("Domain bound must be positive, got {0}")]
    InvalidBound(f64),

    #[error("Softmax denominator is zero: all exponentials quantized to zero")]
    ZeroSum,

    #[error("Softmax input must not be empty")]
    EmptyInput,

    #[error("Axis {axis} out of range for rank {rank}")]
    InvalidAxis { axis: usize, rank: usize },

    #[error("Shape {shape:?} does not describe {len} elements")]
    ShapeMismatch { shape: Vec<usize>, len: usize },
}

pub type Result<T> = std::result::Result<T, KernelError>;
