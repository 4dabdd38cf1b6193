//! High-level SDK
//!
//! [`SwapSdk`] turns human-readable requests into ledger transaction
//! parameters: it parses amounts, reads pool state through a
//! [`LedgerReader`], prices the trade and applies slippage.

use ledger_client::LedgerReader;
use serde::{Deserialize, Serialize};
use warpgate_core::{Address, BasisPoints, ChainId, LedgerError, SdkConfig};

use crate::amount::CurrencyAmount;
use crate::fetch::{fetch_pool, fetch_pool_with_supply, fetch_pools};
use crate::pair::{Pair, SwapFee};
use crate::percent::Percent;
use crate::route::Route;
use crate::router::{
    add_liquidity_parameters, minimum_amount_with_slippage, remove_liquidity_parameters,
    swap_call_parameters, SwapOptions,
};
use crate::state::{
    AddLiquidityParameters, RemoveLiquidityParameters, Result, SwapError, SwapParameters,
    TradeType,
};
use crate::token::Token;
use crate::trade::{best_trade_exact_in, best_trade_exact_out, BestTradeOptions, Trade};

/// Token as described by the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenInfo {
    pub address: Address,
    pub decimals: u8,
    pub symbol: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// Add liquidity with human-readable amounts
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddLiquidityRequest {
    pub token_a: TokenInfo,
    pub token_b: TokenInfo,
    pub amount_a: String,
    pub amount_b: String,
    #[serde(default)]
    pub slippage_bps: Option<BasisPoints>,
    /// Fee for a pool that does not exist yet; ignored otherwise
    #[serde(default)]
    pub fee_bps: Option<BasisPoints>,
}

/// Swap with a human-readable amount on the fixed side
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapRequest {
    pub from_token: TokenInfo,
    pub to_token: TokenInfo,
    /// Input amount for exact-input trades, output amount for exact-output
    pub amount: String,
    pub trade_type: TradeType,
    #[serde(default)]
    pub slippage_bps: Option<BasisPoints>,
    /// Intermediate tokens a multi-hop route may pass through
    #[serde(default)]
    pub via: Vec<TokenInfo>,
}

/// Burn LP tokens, amount in LP units (8 decimals)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveLiquidityRequest {
    pub token_a: TokenInfo,
    pub token_b: TokenInfo,
    pub lp_amount: String,
    #[serde(default)]
    pub slippage_bps: Option<BasisPoints>,
}

/// A priced swap and the parameters to submit
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapQuote {
    pub parameters: SwapParameters,
    pub input_amount: String,
    pub output_amount: String,
    pub execution_price: String,
    pub price_impact: String,
    /// Token symbols from input to output
    pub route: Vec<String>,
    pub fee_bps: BasisPoints,
}

/// Swap SDK over a ledger reader
#[derive(Debug, Clone)]
pub struct SwapSdk<R> {
    reader: R,
    chain_id: ChainId,
    default_slippage_bps: BasisPoints,
    search: BestTradeOptions,
}

impl<R: LedgerReader> SwapSdk<R> {
    pub fn new(reader: R, config: &SdkConfig) -> Self {
        Self {
            reader,
            chain_id: config.chain_id,
            default_slippage_bps: config.swap.default_slippage_bps,
            search: BestTradeOptions {
                max_hops: config.swap.max_hops,
                max_results: config.swap.max_results,
            },
        }
    }

    pub fn reader(&self) -> &R {
        &self.reader
    }

    pub fn chain_id(&self) -> ChainId {
        self.chain_id
    }

    pub fn token(&self, info: &TokenInfo) -> Token {
        Token::new(
            self.chain_id,
            info.address.clone(),
            info.decimals,
            info.symbol.clone(),
            info.name.clone().unwrap_or_else(|| info.symbol.clone()),
        )
    }

    fn slippage(&self, bps: Option<BasisPoints>) -> Percent {
        Percent::from_bps(bps.unwrap_or(self.default_slippage_bps))
    }

    /// Add-liquidity parameters. Uses the pool's fee when the pool exists,
    /// otherwise the request must carry one.
    pub async fn add_liquidity(
        &self,
        request: &AddLiquidityRequest,
    ) -> Result<AddLiquidityParameters> {
        let token_a = self.token(&request.token_a);
        let token_b = self.token(&request.token_b);
        let amount_a = CurrencyAmount::parse_units(token_a.clone(), &request.amount_a)?;
        let amount_b = CurrencyAmount::parse_units(token_b.clone(), &request.amount_b)?;

        let slippage = self.slippage(request.slippage_bps);
        let min_a = minimum_amount_with_slippage(&amount_a, &slippage)?;
        let min_b = minimum_amount_with_slippage(&amount_b, &slippage)?;

        let fee_bps = match self.reader.get_fee(&token_a.address, &token_b.address).await {
            Ok(fee) => {
                tracing::info!("Pool {}/{} exists, using its fee of {} bps", token_a, token_b, fee);
                fee
            }
            Err(err @ LedgerError::PoolNotFound { .. }) => match request.fee_bps {
                Some(fee) => {
                    tracing::info!(
                        "Pool {}/{} does not exist yet, creating it with fee {} bps",
                        token_a,
                        token_b,
                        fee
                    );
                    fee
                }
                None => return Err(err.into()),
            },
            Err(e) => return Err(e.into()),
        };

        add_liquidity_parameters(&amount_a, &amount_b, &min_a, &min_b, fee_bps)
    }

    /// Price a swap and build its parameters.
    ///
    /// Without `via` tokens the trade uses the direct pool. With them, every
    /// pool among the endpoints and intermediates is fetched and the best
    /// route is chosen.
    pub async fn swap(&self, request: &SwapRequest) -> Result<SwapQuote> {
        let token_in = self.token(&request.from_token);
        let token_out = self.token(&request.to_token);
        let fixed_token = match request.trade_type {
            TradeType::ExactInput => &token_in,
            TradeType::ExactOutput => &token_out,
        };
        let amount = CurrencyAmount::parse_units(fixed_token.clone(), &request.amount)?;

        let (trade, fee) = if request.via.is_empty() {
            let pool = fetch_pool(&self.reader, &token_in, &token_out).await?;
            let route = Route::new(vec![pool.pair], token_in.clone(), token_out.clone())?;
            (
                Trade::new(route, &amount, request.trade_type, pool.fee)?,
                pool.fee,
            )
        } else {
            self.best_trade(&token_in, &token_out, &amount, request)
                .await?
        };

        let options = SwapOptions {
            allowed_slippage: self.slippage(request.slippage_bps),
        };
        let parameters = swap_call_parameters(&trade, &options)?;

        tracing::info!(
            "Quoted {} -> {} over {} hop(s), impact {}",
            trade.input_amount(),
            trade.output_amount(),
            trade.route().hops(),
            trade.price_impact()
        );

        Ok(SwapQuote {
            parameters,
            input_amount: trade.input_amount().to_exact(),
            output_amount: trade.output_amount().to_exact(),
            execution_price: trade.execution_price().to_string(),
            price_impact: trade.price_impact().to_string(),
            route: trade
                .route()
                .path()
                .iter()
                .map(|token| token.to_string())
                .collect(),
            fee_bps: fee.bps(),
        })
    }

    /// Best trade over all pools among the endpoints and `via` tokens.
    /// Priced with the highest fee among those pools.
    async fn best_trade(
        &self,
        token_in: &Token,
        token_out: &Token,
        amount: &CurrencyAmount,
        request: &SwapRequest,
    ) -> Result<(Trade, SwapFee)> {
        let mut tokens = vec![token_in.clone(), token_out.clone()];
        for info in &request.via {
            let token = self.token(info);
            if !tokens.contains(&token) {
                tokens.push(token);
            }
        }

        let pools = fetch_pools(&self.reader, &tokens).await?;
        let no_route = || SwapError::NoRoute {
            from: token_in.to_string(),
            to: token_out.to_string(),
        };
        let fee = pools
            .iter()
            .map(|pool| pool.fee)
            .min_by_key(|fee| fee.numerator())
            .ok_or_else(no_route)?;
        let pairs: Vec<Pair> = pools.into_iter().map(|pool| pool.pair).collect();

        let trades = match request.trade_type {
            TradeType::ExactInput => {
                best_trade_exact_in(&pairs, amount, token_out, fee, &self.search)?
            }
            TradeType::ExactOutput => {
                best_trade_exact_out(&pairs, token_in, amount, fee, &self.search)?
            }
        };
        tracing::debug!("{} candidate trades from {} pools", trades.len(), pairs.len());

        let trade = trades.into_iter().next().ok_or_else(no_route)?;
        Ok((trade, fee))
    }

    /// Remove-liquidity parameters with minimums taken from the LP share of
    /// current reserves, reduced by slippage.
    pub async fn remove_liquidity(
        &self,
        request: &RemoveLiquidityRequest,
    ) -> Result<RemoveLiquidityParameters> {
        let token_a = self.token(&request.token_a);
        let token_b = self.token(&request.token_b);

        let pool = fetch_pool_with_supply(&self.reader, &token_a, &token_b).await?;
        let Some(total_supply) = pool.total_supply.as_ref() else {
            return Err(SwapError::InvalidLiquidity {
                message: "liquidity token supply unavailable".to_string(),
            });
        };
        let lp_amount =
            CurrencyAmount::parse_units(pool.pair.liquidity_token().clone(), &request.lp_amount)?;

        let value_a = pool
            .pair
            .get_liquidity_value(&token_a, total_supply, &lp_amount, false, None)?;
        let value_b = pool
            .pair
            .get_liquidity_value(&token_b, total_supply, &lp_amount, false, None)?;

        let slippage = self.slippage(request.slippage_bps);
        let min_a = minimum_amount_with_slippage(&value_a, &slippage)?;
        let min_b = minimum_amount_with_slippage(&value_b, &slippage)?;

        tracing::info!(
            "Burning {} of {} for at least {} and {}",
            lp_amount.to_exact(),
            total_supply.to_exact(),
            min_a,
            min_b
        );
        remove_liquidity_parameters(&lp_amount, &min_a, &min_b)
    }
}
