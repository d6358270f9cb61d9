//! # fpfuncs-math
//!
//! Bit-exact 32-bit fixed-point arithmetic for quantized inference: the
//! rounding and saturating scalar operations of the NEON integer ISA, plus
//! `exp(x)` for `x <= 0` and `1 / (1 + x)` for `x` in `(0, 1)` built on them.
//!
//! Values are raw `i32` in Q-format: with `k` integer bits (sign included) a
//! raw value `r` stands for `r / 2^(31 - k)`. The free functions leave `k` to
//! the caller; [`FixedPoint`] tags a raw value with its [`QFormat`].
//!
//! Layers, bottom to top:
//! - [`bits`]: mask generation and per-bit selection
//! - [`rounding`]: rounding shifts, saturating shifts, half sums, [`fp_mult`]
//! - [`transcendental`]: [`exp_restricted`], [`exp_negative`], [`one_over_one_plus_x`]
//!
//! Every function is pure and allocation-free; the same input yields the
//! same output on every platform.

pub mod bits;
pub mod error;
pub mod q_format;
pub mod rounding;
pub mod transcendental;

pub use bits::{mask_if_non_zero, mask_if_zero, select, select_using_mask};
pub use error::{FixedPointError, Result};
pub use q_format::{FixedPoint, QFormat};
pub use rounding::{
    fp_mult, rounding_divide_by_pot, rounding_half_sum, saturating_rounding_mult_by_pot,
    try_rounding_divide_by_pot, try_saturating_rounding_mult_by_pot,
};
pub use transcendental::{
    exp_negative, exp_restricted, exp_underflow_threshold, one_over_one_plus_x,
    try_exp_negative, try_exp_restricted, try_one_over_one_plus_x, MAX_EXP_INTEGER_BITS,
};
