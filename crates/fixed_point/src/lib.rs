//! QAct Fixed-Point Arithmetic
//!
//! Deterministic fixed-point number system for environments without
//! floating-point hardware (secure computation, low-precision emulation).
//! Values are `i64` codes interpreted as `code / 2^fractional_bits`; every
//! operation reduces to integer add/multiply/shift so that two independent
//! implementations produce bit-identical results.

mod config;
mod error;
mod vector;

pub use config::{ConfigSpec, FixedPointConfig, MAX_TOTAL_BITS};
pub use error::{FixedPointError, Result};
pub use vector::FixedVector;
