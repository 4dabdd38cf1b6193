//! Percentages as exact fractions

use std::fmt;

use num_bigint::BigInt;

use crate::fraction::{Fraction, Rounding};
use crate::state::Result;
use warpgate_core::BasisPoints;

/// A fraction interpreted as a share of one (1/2 renders as "50")
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Percent(Fraction);

impl Percent {
    pub fn new(numerator: impl Into<BigInt>, denominator: impl Into<BigInt>) -> Result<Self> {
        Ok(Self(Fraction::new(numerator, denominator)?))
    }

    /// `bps / 10000`
    pub fn from_bps(bps: BasisPoints) -> Self {
        Self(Fraction::from_bps(bps))
    }

    pub fn from_fraction(fraction: Fraction) -> Self {
        Self(fraction)
    }

    pub fn zero() -> Self {
        Self(Fraction::zero())
    }

    pub fn one_hundred() -> Self {
        Self(Fraction::one())
    }

    pub fn as_fraction(&self) -> &Fraction {
        &self.0
    }

    pub fn is_negative(&self) -> bool {
        self.0.is_negative()
    }

    pub fn to_significant(&self, significant_digits: u32, rounding: Rounding) -> Result<String> {
        (&self.0 * &Fraction::from_integer(100u8)).to_significant(significant_digits, rounding)
    }

    pub fn to_fixed(&self, decimal_places: u32, rounding: Rounding) -> String {
        (&self.0 * &Fraction::from_integer(100u8)).to_fixed(decimal_places, rounding)
    }
}

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.to_fixed(2, Rounding::RoundHalfUp))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_bps() {
        let half_percent = Percent::from_bps(50);
        assert_eq!(half_percent.to_fixed(2, Rounding::RoundDown), "0.50");
        assert_eq!(half_percent, Percent::new(1, 200).unwrap());
        assert_eq!(Percent::from_bps(10_000), Percent::one_hundred());
    }

    #[test]
    fn test_to_significant() {
        let third = Percent::new(1, 3).unwrap();
        assert_eq!(third.to_significant(4, Rounding::RoundHalfUp).unwrap(), "33.33");
        assert_eq!(third.to_string(), "33.33%");
    }

    #[test]
    fn test_ordering() {
        assert!(Percent::from_bps(49) < Percent::from_bps(50));
        assert!(Percent::new(-1, 100).unwrap().is_negative());
    }
}
