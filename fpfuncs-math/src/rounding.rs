//! Rounding and saturating scalar operations on raw Q-format integers.
//!
//! Each function reproduces the exact bit pattern of the corresponding NEON
//! instruction (`SRSHR`, `SQSHL`/`SRSHR`, `VRHADD`, `VQRDMULH`), so results are
//! identical on every platform.

use crate::bits::{mask_if_non_zero, select, select_using_mask};
use crate::error::{FixedPointError, Result};

/// Largest shift a 32-bit raw value can take.
pub const MAX_EXPONENT: i32 = 31;

/// Rounding arithmetic right shift: `round(x / 2^exponent)`, ties away from zero.
///
/// # Panics
///
/// Panics if `exponent` is outside `[0, 31]`. Use [`try_rounding_divide_by_pot`]
/// when the exponent is not a call-site constant.
#[inline]
pub fn rounding_divide_by_pot(x: i32, exponent: i32) -> i32 {
    assert!(
        (0..=MAX_EXPONENT).contains(&exponent),
        "rounding_divide_by_pot: exponent {} out of [0, 31]",
        exponent
    );
    // i64 so that exponent 31 yields i32::MAX instead of overflowing.
    let mask = ((1i64 << exponent) - 1) as i32;
    let threshold = (mask >> 1) + select(x < 0, 1, 0);
    (x >> exponent) + select((x & mask) > threshold, 1, 0)
}

/// Checked form of [`rounding_divide_by_pot`].
pub fn try_rounding_divide_by_pot(x: i32, exponent: i32) -> Result<i32> {
    if !(0..=MAX_EXPONENT).contains(&exponent) {
        log::debug!("rejecting rounding_divide_by_pot exponent {}", exponent);
        return Err(FixedPointError::InvalidExponent {
            exponent,
            min: 0,
            max: MAX_EXPONENT,
        });
    }
    Ok(rounding_divide_by_pot(x, exponent))
}

/// Multiplies `x` by `2^exponent`.
///
/// A positive exponent is a saturating left shift; a negative one is a
/// rounding right shift through [`rounding_divide_by_pot`].
///
/// # Panics
///
/// Panics if `exponent` is outside `[-31, 31]`.
#[inline]
pub fn saturating_rounding_mult_by_pot(x: i32, exponent: i32) -> i32 {
    assert!(
        (-MAX_EXPONENT..=MAX_EXPONENT).contains(&exponent),
        "saturating_rounding_mult_by_pot: exponent {} out of [-31, 31]",
        exponent
    );
    if exponent < 0 {
        return rounding_divide_by_pot(x, -exponent);
    }

    let threshold = ((1i64 << (MAX_EXPONENT - exponent)) - 1) as i32;
    let positive_mask = mask_if_non_zero((x > threshold) as i32);
    let negative_mask = mask_if_non_zero((x < -threshold) as i32);

    let result = x << exponent;
    let result = select_using_mask(positive_mask, i32::MAX, result);
    select_using_mask(negative_mask, i32::MIN, result)
}

/// Checked form of [`saturating_rounding_mult_by_pot`].
pub fn try_saturating_rounding_mult_by_pot(x: i32, exponent: i32) -> Result<i32> {
    if !(-MAX_EXPONENT..=MAX_EXPONENT).contains(&exponent) {
        log::debug!("rejecting saturating_rounding_mult_by_pot exponent {}", exponent);
        return Err(FixedPointError::InvalidExponent {
            exponent,
            min: -MAX_EXPONENT,
            max: MAX_EXPONENT,
        });
    }
    Ok(saturating_rounding_mult_by_pot(x, exponent))
}

/// `round((a + b) / 2)` with ties away from zero. The sum is taken in 64 bits.
#[inline]
pub fn rounding_half_sum(a: i32, b: i32) -> i32 {
    let sum = a as i64 + b as i64;
    let sign = if sum >= 0 { 1 } else { -1 };
    ((sum + sign) / 2) as i32
}

/// Saturating rounding doubling high multiply.
///
/// With `a` in `Qa` and `b` in `Qb` the result is in `Q(a+b)`. The only
/// saturating case is `i32::MIN * i32::MIN`, which returns `i32::MAX`.
#[inline]
pub fn fp_mult(a: i32, b: i32) -> i32 {
    let overflow = a == b && a == i32::MIN;
    let ab = a as i64 * b as i64;
    let nudge: i64 = if ab >= 0 { 1 << 30 } else { 1 - (1 << 30) };
    // Division truncates toward zero, which the nudge relies on.
    let ab_x2_high32 = ((ab + nudge) / (1i64 << 31)) as i32;
    select(overflow, i32::MAX, ab_x2_high32)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sweep(step: i32) -> impl Iterator<Item = i32> {
        (0..16).map(move |i| -step * 5 + step * i)
    }

    #[test]
    fn test_rounding_divide_identity_at_zero() {
        for x in sweep(21_000).chain([i32::MIN, i32::MAX]) {
            assert_eq!(rounding_divide_by_pot(x, 0), x);
        }
    }

    #[test]
    fn test_rounding_divide_by_4096() {
        let got: Vec<i32> = sweep(21_000).map(|x| rounding_divide_by_pot(x, 12)).collect();
        assert_eq!(
            got,
            vec![-26, -21, -15, -10, -5, 0, 5, 10, 15, 21, 26, 31, 36, 41, 46, 51]
        );
    }

    #[test]
    fn test_rounding_divide_ties_away_from_zero() {
        assert_eq!(rounding_divide_by_pot(1, 1), 1);
        assert_eq!(rounding_divide_by_pot(-1, 1), -1);
        assert_eq!(rounding_divide_by_pot(3, 1), 2);
        assert_eq!(rounding_divide_by_pot(-3, 1), -2);
        assert_eq!(rounding_divide_by_pot(-6, 2), -2);
    }

    #[test]
    fn test_rounding_divide_by_2_pow_31() {
        assert_eq!(rounding_divide_by_pot(i32::MAX, 31), 1);
        assert_eq!(rounding_divide_by_pot(i32::MIN, 31), -1);
        assert!(sweep(21_000).all(|x| rounding_divide_by_pot(x, 31) == 0));
    }

    #[test]
    #[should_panic(expected = "out of [0, 31]")]
    fn test_rounding_divide_rejects_negative_exponent() {
        rounding_divide_by_pot(10, -1);
    }

    #[test]
    fn test_try_rounding_divide() {
        assert_eq!(try_rounding_divide_by_pot(-6, 2), Ok(-2));
        assert_eq!(
            try_rounding_divide_by_pot(5, 32),
            Err(FixedPointError::InvalidExponent { exponent: 32, min: 0, max: 31 })
        );
    }

    #[test]
    fn test_saturating_mult_by_pot_shifts() {
        let left: Vec<i32> = sweep(21_000).map(|x| saturating_rounding_mult_by_pot(x, 2)).collect();
        assert_eq!(left[0], -420_000);
        assert_eq!(left[15], 840_000);

        let right: Vec<i32> = sweep(21_000)
            .map(|x| saturating_rounding_mult_by_pot(x, -2))
            .collect();
        assert_eq!(
            right,
            vec![
                -26250, -21000, -15750, -10500, -5250, 0, 5250, 10500, 15750, 21000, 26250,
                31500, 36750, 42000, 47250, 52500
            ]
        );
    }

    #[test]
    fn test_saturating_mult_by_pot_saturates() {
        assert_eq!(saturating_rounding_mult_by_pot(i32::MAX, 1), i32::MAX);
        assert_eq!(saturating_rounding_mult_by_pot(i32::MIN, 1), i32::MIN);
        assert_eq!(saturating_rounding_mult_by_pot(1 << 29, 2), i32::MAX);
        assert_eq!(saturating_rounding_mult_by_pot(-(1 << 29), 2), i32::MIN);
        assert_eq!(saturating_rounding_mult_by_pot((1 << 29) - 1, 2), ((1 << 29) - 1) * 4);
        assert_eq!(saturating_rounding_mult_by_pot(1, 31), i32::MAX);
        assert_eq!(saturating_rounding_mult_by_pot(0, 31), 0);
    }

    #[test]
    fn test_try_saturating_mult_by_pot() {
        assert!(matches!(
            try_saturating_rounding_mult_by_pot(1, -32),
            Err(FixedPointError::InvalidExponent { exponent: -32, .. })
        ));
        assert_eq!(try_saturating_rounding_mult_by_pot(3, 1), Ok(6));
    }

    #[test]
    fn test_rounding_half_sum() {
        let step = 21_000_000;
        let got: Vec<i32> = (0..16)
            .map(|i| rounding_half_sum(-step * 5 + step * i, step * 6 - step * 2 * i))
            .collect();
        assert_eq!(got[0], 10_500_000);
        assert_eq!(got[1], 0);
        assert_eq!(got[15], -147_000_000);

        assert_eq!(rounding_half_sum(1, 0), 1);
        assert_eq!(rounding_half_sum(-1, 0), -1);
        assert_eq!(rounding_half_sum(i32::MAX, i32::MAX), i32::MAX);
        assert_eq!(rounding_half_sum(i32::MIN, i32::MIN), i32::MIN);
    }

    #[test]
    fn test_fp_mult() {
        let step = 21_000_000;
        let got: Vec<i32> = (0..16)
            .map(|i| fp_mult(-step * 5 + step * i, step * 6 - step * 2 * i))
            .collect();
        assert_eq!(
            got,
            vec![
                -6160699, -3285706, -1232140, 0, 410713, 0, -1232140, -3285706, -6160699,
                -9857118, -14374964, -19714236, -25874935, -32857060, -40660612, -49285591
            ]
        );
    }

    #[test]
    fn test_fp_mult_edges() {
        assert_eq!(fp_mult(i32::MIN, i32::MIN), i32::MAX);
        assert_eq!(fp_mult(i32::MAX, i32::MAX), i32::MAX - 1);
        assert_eq!(fp_mult(i32::MAX, 12345), 12345);
        assert_eq!(fp_mult(-1, 1), 0);
    }
}
