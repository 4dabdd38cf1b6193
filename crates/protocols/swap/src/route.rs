//! Routes
//!
//! An ordered chain of pairs leading from an input token to an output token.
//! All validation happens in [`Route::new`]; a built route is always
//! walk-connected.

use warpgate_core::ChainId;

use crate::pair::Pair;
use crate::price::Price;
use crate::state::{Result, SwapError};
use crate::token::Token;

/// Validated path through one or more pairs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pairs: Vec<Pair>,
    path: Vec<Token>,
}

impl Route {
    /// Build a route, checking that consecutive pairs share a token and that
    /// the walk starts at `input` and ends at `output`.
    pub fn new(pairs: Vec<Pair>, input: Token, output: Token) -> Result<Self> {
        let first = pairs.first().ok_or_else(|| SwapError::RouteEndpoint {
            expected: input.address.to_string(),
            found: "empty route".to_string(),
        })?;

        let chain_id = first.chain_id();
        if let Some(other) = pairs.iter().find(|p| p.chain_id() != chain_id) {
            return Err(SwapError::ChainMismatch {
                left: chain_id.as_u16(),
                right: other.chain_id().as_u16(),
            });
        }

        if !first.involves_token(&input) {
            return Err(SwapError::RouteEndpoint {
                expected: input.address.to_string(),
                found: format!("{} / {}", first.token0().address, first.token1().address),
            });
        }

        let mut path = Vec::with_capacity(pairs.len() + 1);
        path.push(input);
        for (hop, pair) in pairs.iter().enumerate() {
            let current = &path[hop];
            if !pair.involves_token(current) {
                return Err(SwapError::RouteContinuity {
                    hop,
                    token: current.address.to_string(),
                });
            }
            let next = pair.other_token(current)?.clone();
            path.push(next);
        }

        let reached = &path[path.len() - 1];
        if reached != &output {
            return Err(SwapError::RouteEndpoint {
                expected: output.address.to_string(),
                found: reached.address.to_string(),
            });
        }

        Ok(Self { pairs, path })
    }

    pub fn pairs(&self) -> &[Pair] {
        &self.pairs
    }

    /// Tokens visited, input first
    pub fn path(&self) -> &[Token] {
        &self.path
    }

    pub fn input(&self) -> &Token {
        &self.path[0]
    }

    pub fn output(&self) -> &Token {
        &self.path[self.path.len() - 1]
    }

    pub fn chain_id(&self) -> ChainId {
        self.input().chain_id
    }

    /// Number of pairs
    pub fn hops(&self) -> usize {
        self.pairs.len()
    }

    /// Product of each hop's spot price, quoted in output per input
    pub fn mid_price(&self) -> Result<Price> {
        let mut price = self.pairs[0].price_of(&self.path[0])?;
        for (pair, token) in self.pairs.iter().zip(&self.path).skip(1) {
            price = price.multiply(&pair.price_of(token)?)?;
        }
        Ok(price)
    }
}
