//! Core type definitions for Warpgate

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::AddressError;

/// Number of hex digits in a fully padded account address (32 bytes).
pub const ACCOUNT_HEX_LEN: usize = 64;

/// Chain identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChainId(pub u16);

impl ChainId {
    /// Movement mainnet
    pub const MOVE_MAINNET: ChainId = ChainId(126);

    /// Movement testnet
    pub const MOVE_TESTNET: ChainId = ChainId(250);

    pub fn as_u16(&self) -> u16 {
        self.0
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// On-chain address, optionally followed by a `::module::Name<...>` type path.
///
/// The account part is stored left-padded to 64 lowercase hex digits, so the
/// derived ordering matches the numeric ordering of accounts. Everything that
/// needs a canonical token order relies on this.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address(String);

impl Address {
    /// Parse and normalize an address string.
    pub fn parse(input: &str) -> Result<Self, AddressError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(AddressError::Empty);
        }

        let body = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);

        let (account, suffix) = match body.split_once("::") {
            Some((account, suffix)) => (account, Some(suffix)),
            None => (body, None),
        };

        if account.is_empty() {
            return Err(AddressError::Empty);
        }
        if account.len() > ACCOUNT_HEX_LEN {
            return Err(AddressError::TooLong {
                address: input.to_string(),
            });
        }

        let padded = format!("{:0>64}", account.to_ascii_lowercase());
        hex::decode(&padded).map_err(|_| AddressError::InvalidHex {
            address: input.to_string(),
        })?;

        let mut normalized = format!("0x{}", padded);
        if let Some(suffix) = suffix {
            if suffix.is_empty() {
                return Err(AddressError::InvalidTypePath {
                    address: input.to_string(),
                });
            }
            normalized.push_str("::");
            normalized.push_str(suffix);
        }

        Ok(Self(normalized))
    }

    /// The all-zero account, used as the namespace for derived identities.
    pub fn zero() -> Self {
        Self(format!("0x{}", "0".repeat(ACCOUNT_HEX_LEN)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The padded `0x`-prefixed account part, without any type path.
    pub fn account(&self) -> &str {
        &self.0[..ACCOUNT_HEX_LEN + 2]
    }

    /// The `module::Name<...>` suffix, if this address names a type.
    pub fn type_path(&self) -> Option<&str> {
        self.0.get(ACCOUNT_HEX_LEN + 4..)
    }

    /// Short form with leading zeros of the account stripped (`0x1::coin::Coin`).
    pub fn short_string(&self) -> String {
        let digits = self.account()[2..].trim_start_matches('0');
        let digits = if digits.is_empty() { "0" } else { digits };
        match self.type_path() {
            Some(path) => format!("0x{}::{}", digits, path),
            None => format!("0x{}", digits),
        }
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Address {
    type Error = AddressError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Address> for String {
    fn from(address: Address) -> Self {
        address.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Basis points (10000 = 100%)
pub type BasisPoints = u32;

/// Basis-point denominator
pub const BPS_DENOMINATOR: BasisPoints = 10_000;
