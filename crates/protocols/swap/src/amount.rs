//! Token-tagged amounts
//!
//! A [`CurrencyAmount`] is a raw integer quantity in a token's smallest unit.
//! Arithmetic between amounts of different tokens is rejected, and every
//! amount is kept inside the ledger's unsigned 64-bit range.

use std::fmt;

use num_bigint::BigInt;
use num_traits::{Signed, ToPrimitive, Zero};

use crate::constants::MAX_RAW_AMOUNT;
use crate::fraction::{Fraction, Rounding};
use crate::state::{Result, SwapError};
use crate::token::Token;

/// Raw amount of a specific token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrencyAmount {
    token: Token,
    raw: BigInt,
}

impl CurrencyAmount {
    /// Wrap a raw quantity. Fails outside `0..=u64::MAX`.
    pub fn from_raw(token: Token, raw: impl Into<BigInt>) -> Result<Self> {
        let raw = raw.into();
        if raw.is_negative() || raw > BigInt::from(MAX_RAW_AMOUNT) {
            return Err(SwapError::AmountOutOfRange {
                amount: raw.to_string(),
            });
        }
        Ok(Self { token, raw })
    }

    pub fn zero(token: Token) -> Self {
        Self {
            token,
            raw: BigInt::zero(),
        }
    }

    /// Convert a human-readable decimal string ("1.5") into raw units.
    ///
    /// The fractional part is right-padded to the token's decimals; more
    /// fractional digits than the token supports is an error.
    pub fn parse_units(token: Token, amount: &str) -> Result<Self> {
        let invalid = |reason: &str| SwapError::InvalidAmount {
            message: format!("{:?} for {}: {}", amount, token, reason),
        };

        let trimmed = amount.trim();
        let (whole, fraction) = trimmed.split_once('.').unwrap_or((trimmed, ""));
        if whole.is_empty() && fraction.is_empty() {
            return Err(invalid("empty amount"));
        }
        if !whole.chars().all(|c| c.is_ascii_digit())
            || !fraction.chars().all(|c| c.is_ascii_digit())
        {
            return Err(invalid("not an unsigned decimal number"));
        }

        let decimals = token.decimals as usize;
        if fraction.len() > decimals {
            return Err(invalid(&format!("more than {} decimal places", decimals)));
        }

        let digits = format!("{}{:0<width$}", whole, fraction, width = decimals);
        let raw: BigInt = digits.parse().map_err(|_| invalid("not a number"))?;
        Self::from_raw(token, raw)
    }

    pub fn token(&self) -> &Token {
        &self.token
    }

    pub fn raw(&self) -> &BigInt {
        &self.raw
    }

    pub fn is_zero(&self) -> bool {
        self.raw.is_zero()
    }

    /// Raw quantity as the ledger's native integer
    pub fn to_u64(&self) -> Result<u64> {
        self.raw.to_u64().ok_or_else(|| SwapError::AmountOutOfRange {
            amount: self.raw.to_string(),
        })
    }

    /// Raw quantity as a decimal string, the form transaction parameters use
    pub fn raw_string(&self) -> String {
        self.raw.to_string()
    }

    /// Value in whole token units (`raw / 10^decimals`)
    pub fn as_fraction(&self) -> Fraction {
        Fraction::from_scaled(self.raw.clone(), self.token.decimals as u32)
    }

    fn ensure_same_token(&self, other: &CurrencyAmount) -> Result<()> {
        if self.token != other.token {
            return Err(SwapError::TokenMismatch {
                expected: self.token.address.to_string(),
                found: other.token.address.to_string(),
            });
        }
        Ok(())
    }

    pub fn add(&self, other: &CurrencyAmount) -> Result<CurrencyAmount> {
        self.ensure_same_token(other)?;
        Self::from_raw(self.token.clone(), &self.raw + &other.raw)
    }

    pub fn subtract(&self, other: &CurrencyAmount) -> Result<CurrencyAmount> {
        self.ensure_same_token(other)?;
        Self::from_raw(self.token.clone(), &self.raw - &other.raw)
    }

    /// Scale by a fraction, collapsing the result to raw units
    pub fn multiply(&self, factor: &Fraction, rounding: Rounding) -> Result<CurrencyAmount> {
        let scaled = &Fraction::from_integer(self.raw.clone()) * factor;
        Self::from_raw(self.token.clone(), scaled.round_to_integer(rounding))
    }

    /// Every significant decimal of the amount, trailing zeros removed
    pub fn to_exact(&self) -> String {
        let text = self
            .as_fraction()
            .to_fixed(self.token.decimals as u32, Rounding::RoundDown);
        if !text.contains('.') {
            return text;
        }
        let text = text.trim_end_matches('0');
        text.trim_end_matches('.').to_string()
    }

    /// Render with `decimal_places` decimals, at most the token's precision
    pub fn to_fixed(&self, decimal_places: u32, rounding: Rounding) -> Result<String> {
        if decimal_places > self.token.decimals as u32 {
            return Err(SwapError::InvalidAmount {
                message: format!(
                    "{} supports at most {} decimal places",
                    self.token, self.token.decimals
                ),
            });
        }
        Ok(self.as_fraction().to_fixed(decimal_places, rounding))
    }

    pub fn to_significant(&self, significant_digits: u32, rounding: Rounding) -> Result<String> {
        self.as_fraction().to_significant(significant_digits, rounding)
    }
}

impl fmt::Display for CurrencyAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.to_exact(), self.token)
    }
}
