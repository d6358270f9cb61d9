//! Branchless mask generation and per-bit selection.
//!
//! These mirror the NEON compare-to-mask / `VBSL` pair that the rest of the
//! crate is modelled on. Everything is expressed on raw `i32` bit patterns.

/// All ones when `a == 0`, zero otherwise.
#[inline]
pub fn mask_if_zero(a: i32) -> i32 {
    if a == 0 {
        !0
    } else {
        0
    }
}

/// All ones when `a != 0`, zero otherwise.
#[inline]
pub fn mask_if_non_zero(a: i32) -> i32 {
    if a != 0 {
        !0
    } else {
        0
    }
}

/// Takes each bit from `then_val` where `if_mask` has a 1, else from `else_val`.
#[inline]
pub fn select_using_mask(if_mask: i32, then_val: i32, else_val: i32) -> i32 {
    (if_mask & then_val) | (!if_mask & else_val)
}

/// Boolean form of [`select_using_mask`] with a full mask.
///
/// `select(c, t, e) == select_using_mask(mask_if_non_zero(c as i32), t, e)`.
#[inline]
pub fn select(cond: bool, then_val: i32, else_val: i32) -> i32 {
    if cond {
        then_val
    } else {
        else_val
    }
}
