//! QAct Activation Kernels
//!
//! Integer-only approximations of transcendental activation functions:
//! a piecewise degree-4 polynomial smooth gate (SiLU/GeLU family), a
//! limit-form exponential, and a max-stabilized softmax built on top of it.
//! Every step is expressible as add/multiply/shift on fixed-point codes,
//! so results are bit-reproducible across independent implementations.

mod error;
mod exp;
mod gate;
mod softmax;

pub use error::{KernelError, Result};
pub use exp::{ExpKernel, DEFAULT_LOG2_N};
pub use gate::{GateCoefficients, GateEvaluator, GATE_DEGREE};
pub use softmax::Softmax;
