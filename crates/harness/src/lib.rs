//! QAct Calibration Harness
//!
//! Floating-point reference implementations and bit-width sweep utilities
//! for validating the fixed-point kernels. Everything here calls the
//! kernels' pure evaluation functions from the outside; the harness holds
//! no state the runtime core depends on.

mod error;
mod reference;
mod sweep;

pub use error::{HarnessError, Result};
pub use reference::{exp_limit, gate_piecewise, silu, softmax};
pub use sweep::{exp_sweep, gate_sweep, ErrorStats, SweepEntry, EXP_CALIBRATION_RANGE};
