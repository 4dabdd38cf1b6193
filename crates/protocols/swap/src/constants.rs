//! Swap Constants
//!
//! Fee parameters, liquidity-token metadata and search defaults for Warpgate
//! pools.

/// Largest raw amount the ledger can hold (u64 coin values)
pub const MAX_RAW_AMOUNT: u64 = u64::MAX;

/// Fee constants
pub mod fees {
    /// Fee denominator (basis points)
    pub const FEE_DENOMINATOR: u32 = 10_000;

    /// Default fee numerator (0.25% fee = 9975/10000)
    pub const DEFAULT_FEE_NUMERATOR: u32 = 9_975;

    /// Default pool fee in basis points
    pub const DEFAULT_FEE_BPS: u32 = 25;
}

/// LP token constants
pub mod lp {
    /// Liquidity permanently locked by the first mint
    pub const MINIMUM_LIQUIDITY: u64 = 1_000;

    /// LP tokens always use 8 decimals
    pub const LP_DECIMALS: u8 = 8;

    /// Symbol shared by every pool's LP token
    pub const LP_SYMBOL: &str = "Warpgate-LP";

    /// Module and struct of the on-chain LP coin type
    pub const LP_TYPE_PATH: &str = "swap::LPToken";

    /// Module and struct of the on-chain reserve resource
    pub const RESERVES_TYPE_PATH: &str = "swap::TokenPairReserve";

    /// Protocol fee takes 1/(PROTOCOL_FEE_DIVISOR + 1) of growth in sqrt(k)
    pub const PROTOCOL_FEE_DIVISOR: u64 = 5;
}

/// Best-route search defaults
pub mod search {
    /// Maximum number of pairs in a route
    pub const DEFAULT_MAX_HOPS: usize = 3;

    /// Number of trades kept by best-trade search
    pub const DEFAULT_MAX_RESULTS: usize = 3;
}

/// Default slippage tolerance (0.5%)
pub const DEFAULT_SLIPPAGE_BPS: u32 = 50;
