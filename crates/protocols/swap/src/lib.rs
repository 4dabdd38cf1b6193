//! Warpgate Swap Protocol Implementation
//!
//! Exact-arithmetic pricing for constant-product pools: reserve pairs,
//! routes, trades and best-route search, plus the builders that turn them
//! into ledger transaction parameters.

pub mod amount;
pub mod constants;
pub mod fetch;
pub mod fraction;
pub mod pair;
pub mod percent;
pub mod price;
pub mod route;
pub mod router;
pub mod sdk;
pub mod state;
pub mod token;
pub mod trade;

// Re-exports
pub use amount::CurrencyAmount;
pub use constants::{fees, lp, search, DEFAULT_SLIPPAGE_BPS, MAX_RAW_AMOUNT};
pub use fetch::{fetch_pool, fetch_pool_with_supply, fetch_pools, fetch_total_supply, PoolState};
pub use fraction::{Fraction, Rounding};
pub use pair::{Pair, SwapFee};
pub use percent::Percent;
pub use price::Price;
pub use route::Route;
pub use router::{
    add_liquidity_parameters, maximum_amount_with_slippage, minimum_amount_with_slippage,
    remove_liquidity_parameters, swap_call_parameters, validate_slippage, SwapOptions,
};
pub use sdk::{
    AddLiquidityRequest, RemoveLiquidityRequest, SwapQuote, SwapRequest, SwapSdk, TokenInfo,
};
pub use state::{
    AddLiquidityParameters, RemoveLiquidityParameters, Result, SwapError, SwapParameters,
    TradeType,
};
pub use token::{sort_tokens, Token};
pub use trade::{
    best_trade_exact_in, best_trade_exact_out, sorted_insert, trade_comparator, BestTradeOptions,
    Trade,
};
