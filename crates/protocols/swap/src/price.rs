//! Exchange rates between two tokens
//!
//! A price stores the ratio of raw quote units per raw base unit. Rendering
//! applies the decimal difference between the two tokens so that a price of
//! 1 USDC (6 decimals) per MOVE (8 decimals) reads as "1".

use std::fmt;

use num_bigint::BigInt;

use crate::amount::CurrencyAmount;
use crate::fraction::{pow10, Fraction, Rounding};
use crate::state::{Result, SwapError};
use crate::token::Token;

/// Rate at which `base` converts into `quote`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Price {
    base: Token,
    quote: Token,
    /// Raw quote units per raw base unit
    ratio: Fraction,
}

impl Price {
    /// `numerator` raw quote units for every `denominator` raw base units
    pub fn new(
        base: Token,
        quote: Token,
        denominator: impl Into<BigInt>,
        numerator: impl Into<BigInt>,
    ) -> Result<Self> {
        let ratio = Fraction::new(numerator, denominator)?;
        Ok(Self { base, quote, ratio })
    }

    /// Price implied by exchanging `base_amount` for `quote_amount`
    pub fn from_amounts(base_amount: &CurrencyAmount, quote_amount: &CurrencyAmount) -> Result<Self> {
        Self::new(
            base_amount.token().clone(),
            quote_amount.token().clone(),
            base_amount.raw().clone(),
            quote_amount.raw().clone(),
        )
    }

    pub fn base(&self) -> &Token {
        &self.base
    }

    pub fn quote_token(&self) -> &Token {
        &self.quote
    }

    /// Ratio in raw units
    pub fn raw_ratio(&self) -> &Fraction {
        &self.ratio
    }

    /// Ratio in whole-token units
    pub fn adjusted(&self) -> Fraction {
        let scalar = Fraction::from_scaled(pow10(self.base.decimals as u32), self.quote.decimals as u32);
        &self.ratio * &scalar
    }

    /// Same rate seen from the quote token
    pub fn invert(&self) -> Result<Price> {
        Ok(Self {
            base: self.quote.clone(),
            quote: self.base.clone(),
            ratio: self.ratio.invert()?,
        })
    }

    /// Chain two rates: `base -> quote` times `quote -> other.quote`
    pub fn multiply(&self, other: &Price) -> Result<Price> {
        if self.quote != other.base {
            return Err(SwapError::TokenMismatch {
                expected: self.quote.address.to_string(),
                found: other.base.address.to_string(),
            });
        }
        Ok(Self {
            base: self.base.clone(),
            quote: other.quote.clone(),
            ratio: &self.ratio * &other.ratio,
        })
    }

    /// Exact raw quote value of a base amount, before any rounding
    pub fn quote_exact(&self, amount: &CurrencyAmount) -> Result<Fraction> {
        if amount.token() != &self.base {
            return Err(SwapError::TokenMismatch {
                expected: self.base.address.to_string(),
                found: amount.token().address.to_string(),
            });
        }
        Ok(&Fraction::from_integer(amount.raw().clone()) * &self.ratio)
    }

    /// Convert a base amount into quote units, rounded down
    pub fn quote(&self, amount: &CurrencyAmount) -> Result<CurrencyAmount> {
        let exact = self.quote_exact(amount)?;
        CurrencyAmount::from_raw(self.quote.clone(), exact.round_to_integer(Rounding::RoundDown))
    }

    pub fn to_significant(&self, significant_digits: u32, rounding: Rounding) -> Result<String> {
        self.adjusted().to_significant(significant_digits, rounding)
    }

    pub fn to_fixed(&self, decimal_places: u32, rounding: Rounding) -> String {
        self.adjusted().to_fixed(decimal_places, rounding)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = self
            .to_significant(6, Rounding::RoundHalfUp)
            .unwrap_or_else(|_| self.to_fixed(6, Rounding::RoundHalfUp));
        write!(f, "{} {}/{}", value, self.quote, self.base)
    }
}
