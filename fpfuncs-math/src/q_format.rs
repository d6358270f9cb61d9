//! Q-format descriptor and a raw value tagged with its format.
//!
//! The free functions in this crate leave format tracking to the caller.
//! [`FixedPoint`] carries the format alongside the raw value so that
//! multiplication composes formats and mismatched additions are caught.

use std::fmt;

use crate::error::{FixedPointError, Result};
use crate::rounding::{fp_mult, saturating_rounding_mult_by_pot};
use crate::transcendental;

const RAW_BITS: i32 = 32;

/// Number of integer bits (sign included) of a 32-bit fixed-point value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QFormat {
    integer_bits: i32,
}

impl QFormat {
    /// All 31 value bits are fractional: values in `[-1, 1)`.
    pub const Q0: QFormat = QFormat { integer_bits: 0 };

    pub fn new(integer_bits: i32) -> Result<Self> {
        if !(0..RAW_BITS).contains(&integer_bits) {
            return Err(FixedPointError::InvalidIntegerBits(integer_bits));
        }
        Ok(Self { integer_bits })
    }

    pub fn integer_bits(self) -> i32 {
        self.integer_bits
    }

    pub fn fractional_bits(self) -> i32 {
        RAW_BITS - 1 - self.integer_bits
    }

    /// Raw value of `1.0`, saturated to `i32::MAX` in Q0.
    pub fn one_raw(self) -> i32 {
        if self.integer_bits == 0 {
            i32::MAX
        } else {
            1 << self.fractional_bits()
        }
    }

    /// Real value of one raw unit.
    pub fn resolution(self) -> f64 {
        1.0 / (1u64 << self.fractional_bits()) as f64
    }
}

impl Default for QFormat {
    fn default() -> Self {
        Self::Q0
    }
}

impl fmt::Display for QFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Q{}", self.integer_bits)
    }
}

/// A raw 32-bit value together with the format it is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FixedPoint {
    raw: i32,
    format: QFormat,
}

impl FixedPoint {
    pub fn from_raw(raw: i32, format: QFormat) -> Self {
        Self { raw, format }
    }

    /// Rounds `value` to the nearest representable raw value.
    pub fn from_f64(value: f64, format: QFormat) -> Result<Self> {
        let scaled = (value * (1u64 << format.fractional_bits()) as f64).round();
        if !(i32::MIN as f64..=i32::MAX as f64).contains(&scaled) {
            return Err(FixedPointError::Overflow { value });
        }
        Ok(Self {
            raw: scaled as i32,
            format,
        })
    }

    pub fn raw(self) -> i32 {
        self.raw
    }

    pub fn format(self) -> QFormat {
        self.format
    }

    pub fn to_f64(self) -> f64 {
        self.raw as f64 * self.format.resolution()
    }

    /// Wrapping addition; both operands must share a format.
    pub fn add(self, other: Self) -> Result<Self> {
        self.check_same_format(other)?;
        Ok(Self::from_raw(self.raw.wrapping_add(other.raw), self.format))
    }

    /// Wrapping subtraction; both operands must share a format.
    pub fn sub(self, other: Self) -> Result<Self> {
        self.check_same_format(other)?;
        Ok(Self::from_raw(self.raw.wrapping_sub(other.raw), self.format))
    }

    /// `Qa * Qb -> Q(a+b)` through [`fp_mult`]. Fails with `FormatMismatch`
    /// when `a + b` leaves no room in 32 bits.
    pub fn mul(self, other: Self) -> Result<Self> {
        let integer_bits = self.format.integer_bits + other.format.integer_bits;
        let format = QFormat::new(integer_bits).map_err(|_| FixedPointError::FormatMismatch {
            expected: RAW_BITS - 1,
            got: integer_bits,
        })?;
        Ok(Self::from_raw(fp_mult(self.raw, other.raw), format))
    }

    /// Converts to `target`, saturating when the value does not fit and
    /// rounding when fractional bits are dropped.
    pub fn rescale(self, target: QFormat) -> Self {
        let exponent = self.format.integer_bits - target.integer_bits;
        Self::from_raw(saturating_rounding_mult_by_pot(self.raw, exponent), target)
    }

    /// `exp(self)` in Q0 for a non-positive value.
    pub fn exp_negative(self) -> Result<Self> {
        let raw = transcendental::try_exp_negative(self.raw, self.format.integer_bits)?;
        Ok(Self::from_raw(raw, QFormat::Q0))
    }

    /// `1 / (1 + self)` in Q0 for a non-negative Q0 value.
    pub fn one_over_one_plus_x(self) -> Result<Self> {
        if self.format != QFormat::Q0 {
            return Err(FixedPointError::FormatMismatch {
                expected: 0,
                got: self.format.integer_bits,
            });
        }
        let raw = transcendental::try_one_over_one_plus_x(self.raw)?;
        Ok(Self::from_raw(raw, QFormat::Q0))
    }

    fn check_same_format(self, other: Self) -> Result<()> {
        if self.format != other.format {
            return Err(FixedPointError::FormatMismatch {
                expected: self.format.integer_bits,
                got: other.format.integer_bits,
            });
        }
        Ok(())
    }
}

impl fmt::Display for FixedPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.9} ({})", self.to_f64(), self.format)
    }
}
