//! Token identity
//!
//! A token is identified by its chain and address. Decimals, symbol and name
//! are carried along for display and unit conversion but never take part in
//! equality or ordering.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};
use warpgate_core::{Address, ChainId};

use crate::state::{Result, SwapError};

/// Fungible token on a specific chain
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub chain_id: ChainId,
    pub address: Address,
    pub decimals: u8,
    pub symbol: String,
    pub name: String,
}

impl Token {
    pub fn new(
        chain_id: ChainId,
        address: Address,
        decimals: u8,
        symbol: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            chain_id,
            address,
            decimals,
            symbol: symbol.into(),
            name: name.into(),
        }
    }

    /// Whether `self` comes first in canonical pair order.
    ///
    /// Fails when the tokens live on different chains or are the same token,
    /// since neither case can form a pair.
    pub fn sorts_before(&self, other: &Token) -> Result<bool> {
        if self.chain_id != other.chain_id {
            return Err(SwapError::ChainMismatch {
                left: self.chain_id.as_u16(),
                right: other.chain_id.as_u16(),
            });
        }
        if self.address == other.address {
            return Err(SwapError::IdenticalTokens {
                address: self.address.to_string(),
            });
        }
        Ok(self.address < other.address)
    }
}

/// Put two tokens in canonical (token0, token1) order
pub fn sort_tokens(token_a: Token, token_b: Token) -> Result<(Token, Token)> {
    if token_a.sorts_before(&token_b)? {
        Ok((token_a, token_b))
    } else {
        Ok((token_b, token_a))
    }
}

impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        self.chain_id == other.chain_id && self.address == other.address
    }
}

impl Eq for Token {}

impl Hash for Token {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.chain_id.hash(state);
        self.address.hash(state);
    }
}

impl PartialOrd for Token {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Token {
    fn cmp(&self, other: &Self) -> Ordering {
        self.chain_id
            .cmp(&other.chain_id)
            .then_with(|| self.address.cmp(&other.address))
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.symbol.is_empty() {
            write!(f, "{}", self.address.short_string())
        } else {
            write!(f, "{}", self.symbol)
        }
    }
}
