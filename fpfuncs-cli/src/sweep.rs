//! Input sweeps over the fixed-point functions.
//!
//! A sweep evaluates one function over `count` inputs `start + step * i`
//! (binary functions also advance a second operand) and records the raw
//! output next to an `f64` reference where one exists.

use anyhow::{bail, Context, Result};
use clap::ValueEnum;
use fpfuncs_math as fp;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

const Q0_SCALE: f64 = (1u64 << 31) as f64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Function {
    MaskIfZero,
    MaskIfNonZero,
    SelectUsingMask,
    RoundingDivideByPot,
    SaturatingRoundingMultByPot,
    RoundingHalfSum,
    FpMult,
    ExpRestricted,
    ExpNegative,
    OneOverOnePlusX,
}

impl Function {
    pub const ALL: [Function; 10] = [
        Function::MaskIfZero,
        Function::MaskIfNonZero,
        Function::SelectUsingMask,
        Function::RoundingDivideByPot,
        Function::SaturatingRoundingMultByPot,
        Function::RoundingHalfSum,
        Function::FpMult,
        Function::ExpRestricted,
        Function::ExpNegative,
        Function::OneOverOnePlusX,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Function::MaskIfZero => "mask_if_zero",
            Function::MaskIfNonZero => "mask_if_non_zero",
            Function::SelectUsingMask => "select_using_mask",
            Function::RoundingDivideByPot => "rounding_divide_by_pot",
            Function::SaturatingRoundingMultByPot => "saturating_rounding_mult_by_pot",
            Function::RoundingHalfSum => "rounding_half_sum",
            Function::FpMult => "fp_mult",
            Function::ExpRestricted => "exp_restricted",
            Function::ExpNegative => "exp_negative",
            Function::OneOverOnePlusX => "one_over_one_plus_x",
        }
    }

    fn is_binary(self) -> bool {
        matches!(self, Function::RoundingHalfSum | Function::FpMult)
    }

    /// `(start, step)` of the first operand when the sweep does not set one.
    fn default_progression(self) -> (i32, i32) {
        match self {
            Function::MaskIfZero | Function::MaskIfNonZero | Function::SelectUsingMask => (-8, 1),
            Function::RoundingDivideByPot | Function::SaturatingRoundingMultByPot => {
                (-105_000, 21_000)
            }
            Function::RoundingHalfSum | Function::FpMult => (-105_000_000, 21_000_000),
            Function::ExpRestricted | Function::ExpNegative => (0, -10_000_000),
            Function::OneOverOnePlusX => (0, 10_000_000),
        }
    }
}

/// One sweep; unset fields fall back to per-function defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepSpec {
    pub function: Function,
    #[serde(default)]
    pub start: Option<i32>,
    #[serde(default)]
    pub step: Option<i32>,
    #[serde(default = "default_count")]
    pub count: usize,
    /// Shift for the power-of-two operations.
    #[serde(default)]
    pub exponent: Option<i32>,
    /// Integer bits of the `exp_negative` input format.
    #[serde(default)]
    pub integer_bits: Option<i32>,
    #[serde(default)]
    pub second_start: Option<i32>,
    #[serde(default)]
    pub second_step: Option<i32>,
    #[serde(default = "default_then_val")]
    pub then_val: i32,
    #[serde(default = "default_else_val")]
    pub else_val: i32,
}

fn default_count() -> usize {
    16
}

fn default_then_val() -> i32 {
    100
}

fn default_else_val() -> i32 {
    200
}

impl SweepSpec {
    pub fn new(function: Function) -> Self {
        Self {
            function,
            start: None,
            step: None,
            count: default_count(),
            exponent: None,
            integer_bits: None,
            second_start: None,
            second_step: None,
            then_val: default_then_val(),
            else_val: default_else_val(),
        }
    }

    fn exponent_or_default(&self) -> i32 {
        self.exponent.unwrap_or(match self.function {
            Function::SaturatingRoundingMultByPot => 2,
            _ => 12,
        })
    }

    fn integer_bits_or_default(&self) -> i32 {
        self.integer_bits.unwrap_or(5)
    }

    /// First operand of every row.
    pub fn inputs(&self) -> Result<Vec<i32>> {
        let (default_start, default_step) = self.function.default_progression();
        progression(
            self.start.unwrap_or(default_start),
            self.step.unwrap_or(default_step),
            self.count,
        )
    }

    /// Second operand of every row, for binary functions.
    pub fn second_inputs(&self) -> Result<Option<Vec<i32>>> {
        if !self.function.is_binary() {
            return Ok(None);
        }
        let (_, default_step) = self.function.default_progression();
        let start = self.second_start.unwrap_or(default_step * 6);
        let step = self.second_step.unwrap_or(-default_step * 2);
        progression(start, step, self.count).map(Some)
    }
}

fn progression(start: i32, step: i32, count: usize) -> Result<Vec<i32>> {
    (0..count)
        .map(|i| {
            let value = start as i64 + step as i64 * i as i64;
            i32::try_from(value).with_context(|| {
                format!("input {} of progression {} + {} * i leaves the i32 range", i, start, step)
            })
        })
        .collect()
}

/// One evaluated input.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Row {
    pub function: &'static str,
    pub input: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub second: Option<i32>,
    pub output: i32,
    /// Real value of `output`, when it is a Q-format number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_real: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<f64>,
    /// `output - reference`, in units of the output's last bit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_units: Option<f64>,
}

impl Row {
    fn bare(function: Function, input: i32, second: Option<i32>, output: i32) -> Self {
        Self {
            function: function.name(),
            input,
            second,
            output,
            output_real: None,
            reference: None,
            error_units: None,
        }
    }

    /// Output is an integer-valued result compared to an exact real.
    fn exact(mut self, reference: f64) -> Self {
        self.output_real = Some(self.output as f64);
        self.reference = Some(reference);
        self.error_units = Some(self.output as f64 - reference);
        self
    }

    /// Output is Q0 compared to a real reference.
    fn q0(mut self, reference: f64) -> Self {
        let real = self.output as f64 / Q0_SCALE;
        self.output_real = Some(real);
        self.reference = Some(reference);
        self.error_units = Some((real - reference) * Q0_SCALE);
        self
    }
}

/// Evaluates every input of `spec`.
pub fn run_sweep(spec: &SweepSpec) -> Result<Vec<Row>> {
    let inputs = spec.inputs()?;
    let seconds = spec.second_inputs()?;
    debug!("{} over {} inputs", spec.function.name(), inputs.len());

    inputs
        .iter()
        .enumerate()
        .map(|(i, &x)| {
            let second = seconds.as_ref().map(|s| s[i]);
            evaluate(spec, x, second)
                .with_context(|| format!("{} failed on input {}", spec.function.name(), x))
        })
        .collect()
}

fn evaluate(spec: &SweepSpec, x: i32, second: Option<i32>) -> Result<Row> {
    let function = spec.function;
    let row = match function {
        Function::MaskIfZero => Row::bare(function, x, None, fp::mask_if_zero(x)),
        Function::MaskIfNonZero => Row::bare(function, x, None, fp::mask_if_non_zero(x)),
        Function::SelectUsingMask => Row::bare(
            function,
            x,
            None,
            fp::select_using_mask(x, spec.then_val, spec.else_val),
        ),
        Function::RoundingDivideByPot => {
            let exponent = spec.exponent_or_default();
            let output = fp::try_rounding_divide_by_pot(x, exponent)?;
            Row::bare(function, x, None, output).exact(x as f64 / 2f64.powi(exponent))
        }
        Function::SaturatingRoundingMultByPot => {
            let exponent = spec.exponent_or_default();
            let output = fp::try_saturating_rounding_mult_by_pot(x, exponent)?;
            Row::bare(function, x, None, output).exact(x as f64 * 2f64.powi(exponent))
        }
        Function::RoundingHalfSum => {
            let b = second_operand(second)?;
            let output = fp::rounding_half_sum(x, b);
            Row::bare(function, x, Some(b), output).exact((x as f64 + b as f64) / 2.0)
        }
        Function::FpMult => {
            let b = second_operand(second)?;
            let output = fp::fp_mult(x, b);
            Row::bare(function, x, Some(b), output).exact(x as f64 * b as f64 / Q0_SCALE)
        }
        Function::ExpRestricted => {
            if fp::try_exp_restricted(x).is_err() {
                warn!("exp_restricted input {} is outside [-1/4, 0)", x);
            }
            let output = fp::exp_restricted(x);
            Row::bare(function, x, None, output).q0((x as f64 / Q0_SCALE).exp())
        }
        Function::ExpNegative => {
            let integer_bits = spec.integer_bits_or_default();
            let output = fp::try_exp_negative(x, integer_bits)?;
            let format = fp::QFormat::new(integer_bits)?;
            let real = fp::FixedPoint::from_raw(x, format).to_f64();
            Row::bare(function, x, None, output).q0(real.exp())
        }
        Function::OneOverOnePlusX => {
            let output = fp::try_one_over_one_plus_x(x)?;
            Row::bare(function, x, None, output).q0(1.0 / (1.0 + x as f64 / Q0_SCALE))
        }
    };
    Ok(row)
}

fn second_operand(second: Option<i32>) -> Result<i32> {
    match second {
        Some(b) => Ok(b),
        None => bail!("binary function evaluated without a second operand"),
    }
}
