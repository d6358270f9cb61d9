//! Fixed-point `exp(x)` for non-positive `x` and `1 / (1 + x)` for `x` in `(0, 1)`.
//!
//! All constants are Q0 raw values carried over bit-for-bit; they are not
//! recomputed from their real-valued definitions because a one-unit
//! difference would break agreement with existing quantized models.

use crate::bits::{mask_if_non_zero, mask_if_zero, select, select_using_mask};
use crate::error::{FixedPointError, Result};
use crate::rounding::{
    fp_mult, rounding_divide_by_pot, rounding_half_sum, saturating_rounding_mult_by_pot,
};

/// `exp(-1/8)` in Q0.
const EXP_MINUS_ONE_EIGHTH: i32 = 1895147668;
/// `1/3` in Q0.
const ONE_THIRD: i32 = 715827883;

/// Lower bound (inclusive) of the [`exp_restricted`] domain: `-1/4` in Q0.
pub const EXP_RESTRICTED_MIN: i32 = -(1 << 29);

/// Largest integer bit count [`exp_negative`] can range-reduce.
pub const MAX_EXP_INTEGER_BITS: i32 = 29;

/// `(exponent, exp(-2^exponent) in Q0)`, applied in this order.
pub const EXP_BARREL_SHIFTER: [(i32, i32); 7] = [
    (-2, 1672461947),
    (-1, 1302514674),
    (0, 790015084),
    (1, 290630308),
    (2, 39332535),
    (3, 720401),
    (4, 242),
];

/// `48/17` in Q2.
const Q2_48_OVER_17: i32 = 1515870810;
/// `-32/17` in Q2.
const Q2_NEG_32_OVER_17: i32 = -1010580540;
const NEWTON_RAPHSON_ITERATIONS: usize = 3;

/// `exp(a)` for `a` in `[-1/4, 0)`, input and output in Q0.
///
/// Recenters on `-1/8` and evaluates the degree-4 Taylor expansion there,
/// scaled by `exp(-1/8)`. Inputs outside the interval are not rejected but
/// their result is meaningless; see [`try_exp_restricted`].
#[inline]
pub fn exp_restricted(a: i32) -> i32 {
    const FRACTIONAL_BITS: i32 = 31;

    let x = a.wrapping_add(1 << (FRACTIONAL_BITS - 3));
    let x2 = fp_mult(x, x);
    let x3 = fp_mult(x2, x);
    let x4 = fp_mult(x2, x2);
    let x4_over_4 = rounding_divide_by_pot(x4, 2);
    let x4_over_24_plus_x3_over_6_plus_x2 =
        fp_mult(x4_over_4.wrapping_add(x3), ONE_THIRD).wrapping_add(x2);
    let x4_over_24_plus_x3_over_6_plus_x2_over_2 =
        rounding_divide_by_pot(x4_over_24_plus_x3_over_6_plus_x2, 1);

    EXP_MINUS_ONE_EIGHTH.wrapping_add(fp_mult(
        EXP_MINUS_ONE_EIGHTH,
        x.wrapping_add(x4_over_24_plus_x3_over_6_plus_x2_over_2),
    ))
}

/// Checked form of [`exp_restricted`]: rejects inputs outside `[-2^29, 0)`.
pub fn try_exp_restricted(a: i32) -> Result<i32> {
    if !(EXP_RESTRICTED_MIN..0).contains(&a) {
        log::debug!("exp_restricted input {} outside [-1/4, 0)", a);
        return Err(FixedPointError::OutOfDomain {
            value: a,
            name: "exp_restricted",
        });
    }
    Ok(exp_restricted(a))
}

/// Raw input below which [`exp_negative`] returns zero, if the format has one.
///
/// Formats with more than 5 integer bits can express values below `-32`,
/// where `exp` is under one Q0 unit. Narrower formats have no explicit
/// clamp: the ladder already drives the result to zero.
pub fn exp_underflow_threshold(integer_bits: i32) -> Option<i32> {
    if integer_bits > 5 && integer_bits <= MAX_EXP_INTEGER_BITS {
        let fractional_bits = 31 - integer_bits;
        Some(-(1 << (fractional_bits + 5)))
    } else {
        None
    }
}

/// `exp(a)` for `a <= 0` in `Q(integer_bits)`, result in Q0.
///
/// The input is split into a remainder in `[-1/4, 0)` handled by
/// [`exp_restricted`] and a multiple of `1/4` whose bits select factors from
/// [`EXP_BARREL_SHIFTER`]. `exp(0)` returns `i32::MAX`, the closest Q0 value
/// to one.
///
/// # Panics
///
/// Panics if `integer_bits` is outside `[0, 29]`. In debug builds also
/// panics on a positive `a`.
#[inline]
pub fn exp_negative(a: i32, integer_bits: i32) -> i32 {
    assert!(
        (0..=MAX_EXP_INTEGER_BITS).contains(&integer_bits),
        "exp_negative: integer_bits {} out of [0, 29]",
        integer_bits
    );
    debug_assert!(a <= 0, "exp_negative: positive input {}", a);

    let fractional_bits = 31 - integer_bits;
    let one_quarter = 1i32 << (fractional_bits - 2);
    let mask = one_quarter - 1;
    let a_mod_quarter_minus_one_quarter = (a & mask) - one_quarter;
    let mut result = exp_restricted(a_mod_quarter_minus_one_quarter << integer_bits);
    let remainder = a_mod_quarter_minus_one_quarter.wrapping_sub(a);

    for &(exponent, multiplier) in EXP_BARREL_SHIFTER.iter() {
        if integer_bits > exponent {
            let bit = 1i32 << (fractional_bits + exponent);
            result = select_using_mask(
                mask_if_non_zero(remainder & bit),
                fp_mult(result, multiplier),
                result,
            );
        }
    }

    if let Some(clamp) = exp_underflow_threshold(integer_bits) {
        result = select(a < clamp, 0, result);
    }

    select_using_mask(mask_if_zero(a), i32::MAX, result)
}

/// Checked form of [`exp_negative`].
pub fn try_exp_negative(a: i32, integer_bits: i32) -> Result<i32> {
    if !(0..=MAX_EXP_INTEGER_BITS).contains(&integer_bits) {
        log::debug!("exp_negative rejected integer_bits {}", integer_bits);
        return Err(FixedPointError::InvalidIntegerBits(integer_bits));
    }
    if a > 0 {
        log::debug!("exp_negative rejected positive input {}", a);
        return Err(FixedPointError::PositiveInput(a));
    }
    Ok(exp_negative(a, integer_bits))
}

/// `1 / (1 + x)` for `x` in `(0, 1)`, input and output in Q0.
///
/// Newton-Raphson on `half_denominator = (1 + x) / 2`, seeded with the
/// linear approximation `48/17 - 32/17 * d` and refined a fixed three times.
#[inline]
pub fn one_over_one_plus_x(a: i32) -> i32 {
    let q0_one = i32::MAX;
    let q2_one = 1i32 << (31 - 2);

    let half_denominator = rounding_half_sum(a, q0_one);
    let mut x = Q2_48_OVER_17.wrapping_add(fp_mult(half_denominator, Q2_NEG_32_OVER_17));
    for _ in 0..NEWTON_RAPHSON_ITERATIONS {
        let half_denominator_times_x = fp_mult(half_denominator, x);
        let one_minus_half_denominator_times_x = q2_one.wrapping_sub(half_denominator_times_x);
        let correction = fp_mult(x, one_minus_half_denominator_times_x);
        x = x.wrapping_add(saturating_rounding_mult_by_pot(correction, 2));
    }

    saturating_rounding_mult_by_pot(x, 1)
}

/// Checked form of [`one_over_one_plus_x`]: rejects negative inputs.
///
/// Zero is accepted and maps to (almost) one.
pub fn try_one_over_one_plus_x(a: i32) -> Result<i32> {
    if a < 0 {
        log::debug!("one_over_one_plus_x rejected negative input {}", a);
        return Err(FixedPointError::OutOfDomain {
            value: a,
            name: "one_over_one_plus_x",
        });
    }
    Ok(one_over_one_plus_x(a))
}
