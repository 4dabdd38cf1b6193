//! Pool Discovery and Fetching
//!
//! Builds [`Pair`] snapshots from a [`LedgerReader`].

use futures::future::join_all;
use ledger_client::LedgerReader;
use warpgate_core::LedgerError;

use crate::amount::CurrencyAmount;
use crate::pair::{Pair, SwapFee};
use crate::state::{Result, SwapError};
use crate::token::Token;

/// A pool as read from the ledger
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolState {
    pub pair: Pair,
    pub fee: SwapFee,
    /// Liquidity token supply, when it was fetched
    pub total_supply: Option<CurrencyAmount>,
}

/// Fetch reserves and fee for the pool between two tokens
pub async fn fetch_pool<R: LedgerReader>(
    reader: &R,
    token_a: &Token,
    token_b: &Token,
) -> Result<PoolState> {
    let (reserves, fee_bps) = futures::try_join!(
        reader.get_reserves(&token_a.address, &token_b.address),
        reader.get_fee(&token_a.address, &token_b.address),
    )?;
    let (reserve_a, reserve_b) = reserves;

    tracing::debug!(
        "Pool {}/{}: reserves {} / {}, fee {} bps",
        token_a,
        token_b,
        reserve_a,
        reserve_b,
        fee_bps
    );

    let pair = Pair::new(
        CurrencyAmount::from_raw(token_a.clone(), reserve_a)?,
        CurrencyAmount::from_raw(token_b.clone(), reserve_b)?,
    )?;
    Ok(PoolState {
        pair,
        fee: SwapFee::from_bps(fee_bps)?,
        total_supply: None,
    })
}

/// Supply of a pair's liquidity token, as an amount of that token
pub async fn fetch_total_supply<R: LedgerReader>(reader: &R, pair: &Pair) -> Result<CurrencyAmount> {
    let lp_token = pair.liquidity_token();
    let supply = reader.get_liquidity_token_supply(&lp_token.address).await?;
    CurrencyAmount::from_raw(lp_token.clone(), supply)
}

/// Fetch a pool together with its ledger LP identity and supply
pub async fn fetch_pool_with_supply<R: LedgerReader>(
    reader: &R,
    token_a: &Token,
    token_b: &Token,
) -> Result<PoolState> {
    let (pool, lp_address) = futures::try_join!(
        fetch_pool(reader, token_a, token_b),
        async {
            reader
                .get_lp_token(&token_a.address, &token_b.address)
                .await
                .map_err(SwapError::from)
        },
    )?;

    let pair = pool.pair.with_liquidity_token(lp_address);
    let total_supply = fetch_total_supply(reader, &pair).await?;
    Ok(PoolState {
        pair,
        fee: pool.fee,
        total_supply: Some(total_supply),
    })
}

/// Fetch every existing pool among `tokens`.
///
/// Pairs with no pool on the ledger are skipped; any other failure aborts.
pub async fn fetch_pools<R: LedgerReader>(reader: &R, tokens: &[Token]) -> Result<Vec<PoolState>> {
    let mut candidates = Vec::new();
    for (i, token_a) in tokens.iter().enumerate() {
        for token_b in &tokens[i + 1..] {
            if token_a != token_b {
                candidates.push((token_a, token_b));
            }
        }
    }

    let results = join_all(
        candidates
            .iter()
            .map(|(token_a, token_b)| fetch_pool(reader, token_a, token_b)),
    )
    .await;

    let mut pools = Vec::with_capacity(results.len());
    for ((token_a, token_b), result) in candidates.iter().zip(results) {
        match result {
            Ok(pool) => pools.push(pool),
            Err(SwapError::Ledger(LedgerError::PoolNotFound { .. })) => {
                tracing::warn!("No pool for {}/{}, skipping", token_a, token_b);
            }
            Err(SwapError::InvalidFee { bps }) => {
                tracing::warn!(
                    "Pool {}/{} has unusable fee {} bps, skipping",
                    token_a,
                    token_b,
                    bps
                );
            }
            Err(e) => return Err(e),
        }
    }

    tracing::info!(
        "Fetched {} pools from {} candidate pairs",
        pools.len(),
        candidates.len()
    );
    Ok(pools)
}
