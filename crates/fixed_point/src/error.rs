//! Fixed-point error types

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FixedPointError {
    #[error("Invalid bit width: integer_bits={integer_bits}, fractional_bits={fractional_bits} (both must be >= 1)")]
    InvalidBits { integer_bits: u32, fractional_bits: u32 },

    #[error("Total width {total_bits} exceeds the supported limit of {limit} bits")]
    WidthExceeded { total_bits: u32, limit: u32 },

    #[error("Division by zero")]
    DivisionByZero,

    #[error("Config mismatch: expected Q{expected_int}.{expected_frac}, got Q{got_int}.{got_frac}")]
    ConfigMismatch {
        expected_int: u32,
        expected_frac: u32,
        got_int: u32,
        got_frac: u32,
    },

    #[error("Dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },
}

pub type Result<T> = std::result::Result<T, FixedPointError>;
