//! Swap State Types
//!
//! Transaction parameter tuples handed to the ledger transaction builder, and
//! the error taxonomy of the pricing engine.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use warpgate_core::{Address, AddressError, LedgerError};

/// Direction of a trade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TradeType {
    /// Input amount is fixed, output is quoted
    ExactInput,
    /// Output amount is fixed, input is quoted
    ExactOutput,
}

/// Parameters for an add-liquidity call.
///
/// Tokens are passed through in caller order; the on-chain entry function
/// canonicalizes them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddLiquidityParameters {
    pub amount_a: String,
    pub amount_b: String,
    pub min_amount_a: String,
    pub min_amount_b: String,
    pub token_a: Address,
    pub token_b: Address,
    pub fee_basis_points: String,
}

/// Parameters for a remove-liquidity call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveLiquidityParameters {
    pub lp_amount: String,
    pub min_amount_a: String,
    pub min_amount_b: String,
    pub token_a: Address,
    pub token_b: Address,
}

/// Parameters for a swap call.
///
/// For `ExactInput`, `amount_in` is exact and `amount_out` is the
/// slippage-bounded minimum. For `ExactOutput`, `amount_out` is exact and
/// `amount_in` is the slippage-bounded maximum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapParameters {
    pub trade_type: TradeType,
    pub amount_in: String,
    pub amount_out: String,
    /// Token addresses from input to output
    pub path: Vec<Address>,
}

/// Swap engine errors
#[derive(Debug, Error)]
pub enum SwapError {
    #[error("Insufficient reserves")]
    InsufficientReserves,

    #[error("Insufficient input amount")]
    InsufficientInputAmount,

    #[error("Token mismatch: expected {expected}, found {found}")]
    TokenMismatch { expected: String, found: String },

    #[error("Route broken at hop {hop}: pair does not involve {token}")]
    RouteContinuity { hop: usize, token: String },

    #[error("Route endpoint mismatch: expected {expected}, found {found}")]
    RouteEndpoint { expected: String, found: String },

    #[error("Invalid slippage tolerance: {slippage}")]
    InvalidSlippage { slippage: String },

    #[error("Division by zero")]
    DivisionByZero,

    #[error("Amount out of range: {amount}")]
    AmountOutOfRange { amount: String },

    #[error("Invalid amount: {message}")]
    InvalidAmount { message: String },

    #[error("Invalid fee: {bps} basis points")]
    InvalidFee { bps: u32 },

    #[error("Tokens are on different chains: {left} and {right}")]
    ChainMismatch { left: u16, right: u16 },

    #[error("Tokens are identical: {address}")]
    IdenticalTokens { address: String },

    #[error("Invalid liquidity: {message}")]
    InvalidLiquidity { message: String },

    #[error("Invalid search options: {message}")]
    InvalidOptions { message: String },

    #[error("No route from {from} to {to}")]
    NoRoute { from: String, to: String },

    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),

    #[error("Address error: {0}")]
    Address(#[from] AddressError),
}

impl SwapError {
    /// Get a stable machine-readable error code
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InsufficientReserves => "insufficient_reserves",
            Self::InsufficientInputAmount => "insufficient_input_amount",
            Self::TokenMismatch { .. } => "token_mismatch",
            Self::RouteContinuity { .. } => "route_continuity",
            Self::RouteEndpoint { .. } => "route_endpoint",
            Self::InvalidSlippage { .. } => "invalid_slippage",
            Self::DivisionByZero => "division_by_zero",
            Self::AmountOutOfRange { .. } => "amount_out_of_range",
            Self::InvalidAmount { .. } => "invalid_amount",
            Self::InvalidFee { .. } => "invalid_fee",
            Self::ChainMismatch { .. } => "chain_mismatch",
            Self::IdenticalTokens { .. } => "identical_tokens",
            Self::InvalidLiquidity { .. } => "invalid_liquidity",
            Self::InvalidOptions { .. } => "invalid_options",
            Self::NoRoute { .. } => "no_route",
            Self::Ledger(e) => e.error_code(),
            Self::Address(_) => "invalid_address",
        }
    }
}

/// Result type alias for swap engine operations
pub type Result<T> = std::result::Result<T, SwapError>;
