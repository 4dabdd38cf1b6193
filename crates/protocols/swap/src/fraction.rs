//! Exact Rational Arithmetic
//!
//! Arbitrary-precision fractions. Operations never round; rounding happens
//! only when a value is rendered as a decimal string or collapsed to an
//! integer with an explicit [`Rounding`] policy.

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Mul, Sub};
use std::str::FromStr;

use num_bigint::BigInt;
use num_traits::{One, Signed, Zero};

use crate::state::{Result, SwapError};
use warpgate_core::{BasisPoints, BPS_DENOMINATOR};

/// Rounding policy for decimal rendering and integer collapse
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rounding {
    /// Truncate toward zero
    RoundDown,
    /// Round half away from zero
    RoundHalfUp,
    /// Round away from zero
    RoundUp,
}

/// `10^exp` as a big integer
pub(crate) fn pow10(exp: u32) -> BigInt {
    num_traits::pow(BigInt::from(10u8), exp as usize)
}

/// Divide with an explicit rounding policy. `denominator` must be positive.
fn div_round(numerator: &BigInt, denominator: &BigInt, rounding: Rounding) -> BigInt {
    let quotient = numerator / denominator;
    let remainder = numerator % denominator;
    if remainder.is_zero() {
        return quotient;
    }

    let step = if numerator.is_negative() {
        -BigInt::one()
    } else {
        BigInt::one()
    };

    match rounding {
        Rounding::RoundDown => quotient,
        Rounding::RoundUp => quotient + step,
        Rounding::RoundHalfUp => {
            if remainder.abs() * BigInt::from(2u8) >= *denominator {
                quotient + step
            } else {
                quotient
            }
        }
    }
}

/// Render a scaled integer with `decimals` implied decimal places
fn format_scaled(scaled: &BigInt, decimals: u32) -> String {
    let digits = scaled.magnitude().to_string();
    let decimals = decimals as usize;

    let body = if decimals == 0 {
        digits
    } else {
        let padded = format!("{:0>width$}", digits, width = decimals + 1);
        let (whole, fraction) = padded.split_at(padded.len() - decimals);
        format!("{}.{}", whole, fraction)
    };

    if scaled.is_negative() {
        format!("-{}", body)
    } else {
        body
    }
}

fn trim_trailing_zeros(mut text: String) -> String {
    if text.contains('.') {
        while text.ends_with('0') {
            text.pop();
        }
        if text.ends_with('.') {
            text.pop();
        }
    }
    text
}

/// Immutable rational number with a positive denominator
#[derive(Debug, Clone)]
pub struct Fraction {
    numerator: BigInt,
    denominator: BigInt,
}

impl Fraction {
    /// Create `numerator / denominator`. Fails on a zero denominator.
    pub fn new(numerator: impl Into<BigInt>, denominator: impl Into<BigInt>) -> Result<Self> {
        let numerator = numerator.into();
        let denominator = denominator.into();
        if denominator.is_zero() {
            return Err(SwapError::DivisionByZero);
        }
        if denominator.is_negative() {
            return Ok(Self {
                numerator: -numerator,
                denominator: -denominator,
            });
        }
        Ok(Self {
            numerator,
            denominator,
        })
    }

    /// Whole number `value / 1`
    pub fn from_integer(value: impl Into<BigInt>) -> Self {
        Self {
            numerator: value.into(),
            denominator: BigInt::one(),
        }
    }

    /// `bps / 10000`
    pub fn from_bps(bps: BasisPoints) -> Self {
        Self {
            numerator: BigInt::from(bps),
            denominator: BigInt::from(BPS_DENOMINATOR),
        }
    }

    /// `value / 10^decimals`
    pub fn from_scaled(value: impl Into<BigInt>, decimals: u32) -> Self {
        Self {
            numerator: value.into(),
            denominator: pow10(decimals),
        }
    }

    pub fn zero() -> Self {
        Self::from_integer(0u8)
    }

    pub fn one() -> Self {
        Self::from_integer(1u8)
    }

    pub fn numerator(&self) -> &BigInt {
        &self.numerator
    }

    pub fn denominator(&self) -> &BigInt {
        &self.denominator
    }

    pub fn is_zero(&self) -> bool {
        self.numerator.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.numerator.is_negative()
    }

    /// Integer part, truncated toward zero
    pub fn quotient(&self) -> BigInt {
        &self.numerator / &self.denominator
    }

    /// What remains after removing the quotient
    pub fn remainder(&self) -> Fraction {
        Self {
            numerator: &self.numerator % &self.denominator,
            denominator: self.denominator.clone(),
        }
    }

    /// Collapse to an integer with the given rounding policy
    pub fn round_to_integer(&self, rounding: Rounding) -> BigInt {
        div_round(&self.numerator, &self.denominator, rounding)
    }

    /// Swap numerator and denominator. Fails when the value is zero.
    pub fn invert(&self) -> Result<Fraction> {
        Self::new(self.denominator.clone(), self.numerator.clone())
    }

    /// Exact division. Fails when `other` is zero.
    pub fn divide(&self, other: &Fraction) -> Result<Fraction> {
        Self::new(
            &self.numerator * &other.denominator,
            &self.denominator * &other.numerator,
        )
    }

    /// Render with `significant_digits` significant digits, trailing zeros
    /// after the decimal point removed.
    pub fn to_significant(&self, significant_digits: u32, rounding: Rounding) -> Result<String> {
        if significant_digits == 0 {
            return Err(SwapError::InvalidAmount {
                message: "significant digits must be positive".to_string(),
            });
        }
        if self.numerator.is_zero() {
            return Ok("0".to_string());
        }

        let magnitude = self.numerator.abs();
        let whole = &magnitude / &self.denominator;

        // Decimal exponent of the leading digit
        let exponent: i64 = if !whole.is_zero() {
            whole.to_string().len() as i64 - 1
        } else {
            let ten = BigInt::from(10u8);
            let mut scaled = magnitude.clone();
            let mut shift: i64 = 0;
            while scaled < self.denominator {
                scaled *= &ten;
                shift += 1;
            }
            -shift
        };

        let scale = significant_digits as i64 - 1 - exponent;
        let rounded = if scale >= 0 {
            div_round(
                &(&magnitude * pow10(scale as u32)),
                &self.denominator,
                rounding,
            )
        } else {
            div_round(
                &magnitude,
                &(&self.denominator * pow10((-scale) as u32)),
                rounding,
            )
        };
        let signed = if self.numerator.is_negative() {
            -rounded
        } else {
            rounded
        };

        let text = if scale > 0 {
            trim_trailing_zeros(format_scaled(&signed, scale as u32))
        } else {
            let mut text = signed.to_string();
            text.push_str(&"0".repeat((-scale) as usize));
            text
        };
        Ok(text)
    }

    /// Render with exactly `decimal_places` digits after the decimal point
    pub fn to_fixed(&self, decimal_places: u32, rounding: Rounding) -> String {
        let scaled = div_round(
            &(&self.numerator * pow10(decimal_places)),
            &self.denominator,
            rounding,
        );
        format_scaled(&scaled, decimal_places)
    }
}

impl PartialEq for Fraction {
    fn eq(&self, other: &Self) -> bool {
        &self.numerator * &other.denominator == &other.numerator * &self.denominator
    }
}

impl Eq for Fraction {}

impl PartialOrd for Fraction {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Fraction {
    fn cmp(&self, other: &Self) -> Ordering {
        (&self.numerator * &other.denominator).cmp(&(&other.numerator * &self.denominator))
    }
}

impl<'a> Add<&'a Fraction> for &'a Fraction {
    type Output = Fraction;

    fn add(self, other: &'a Fraction) -> Fraction {
        if self.denominator == other.denominator {
            return Fraction {
                numerator: &self.numerator + &other.numerator,
                denominator: self.denominator.clone(),
            };
        }
        Fraction {
            numerator: &self.numerator * &other.denominator + &other.numerator * &self.denominator,
            denominator: &self.denominator * &other.denominator,
        }
    }
}

impl<'a> Sub<&'a Fraction> for &'a Fraction {
    type Output = Fraction;

    fn sub(self, other: &'a Fraction) -> Fraction {
        if self.denominator == other.denominator {
            return Fraction {
                numerator: &self.numerator - &other.numerator,
                denominator: self.denominator.clone(),
            };
        }
        Fraction {
            numerator: &self.numerator * &other.denominator - &other.numerator * &self.denominator,
            denominator: &self.denominator * &other.denominator,
        }
    }
}

impl<'a> Mul<&'a Fraction> for &'a Fraction {
    type Output = Fraction;

    fn mul(self, other: &'a Fraction) -> Fraction {
        Fraction {
            numerator: &self.numerator * &other.numerator,
            denominator: &self.denominator * &other.denominator,
        }
    }
}

impl FromStr for Fraction {
    type Err = SwapError;

    /// Parse a plain decimal string such as `"-12.345"`
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || SwapError::InvalidAmount {
            message: format!("not a decimal number: {:?}", s),
        };

        let trimmed = s.trim();
        let (negative, body) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
        };
        let (whole, fraction) = body.split_once('.').unwrap_or((body, ""));

        if whole.is_empty() && fraction.is_empty() {
            return Err(invalid());
        }
        if !whole.chars().all(|c| c.is_ascii_digit())
            || !fraction.chars().all(|c| c.is_ascii_digit())
        {
            return Err(invalid());
        }

        let digits = format!("{}{}", whole, fraction);
        let numerator: BigInt = digits.parse().map_err(|_| invalid())?;
        let numerator = if negative { -numerator } else { numerator };
        Self::new(numerator, pow10(fraction.len() as u32))
    }
}

impl fmt::Display for Fraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}
