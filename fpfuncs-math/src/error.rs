use thiserror::Error;

/// Rejections reported by the checked (`try_*`) entry points.
///
/// Saturation is never an error here: the arithmetic clamps and returns a
/// value. These variants only describe inputs that break a documented
/// precondition.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FixedPointError {
    #[error("Invalid exponent {exponent}: must be in [{min}, {max}]")]
    InvalidExponent { exponent: i32, min: i32, max: i32 },

    #[error("Invalid integer bit count {0} for a 32-bit Q-format value")]
    InvalidIntegerBits(i32),

    #[error("exp_negative expects a non-positive input, got raw value {0}")]
    PositiveInput(i32),

    #[error("Raw value {value} is outside the domain of {name}")]
    OutOfDomain { value: i32, name: &'static str },

    #[error("Value {value} does not fit the requested Q-format")]
    Overflow { value: f64 },

    #[error("Format mismatch: expected Q{expected}, got Q{got}")]
    FormatMismatch { expected: i32, got: i32 },
}

pub type Result<T> = std::result::Result<T, FixedPointError>;
