//! Command handlers
//!
//! Tokens are addressed by symbol and resolved against the snapshot.

pub mod liquidity;
pub mod swap;

use anyhow::{anyhow, bail};
use ledger_client::SnapshotLedger;
use warpgate_swap::{SwapSdk, TokenInfo};

/// Look up a token by symbol, checking it lives on the configured chain
pub fn resolve_token(sdk: &SwapSdk<SnapshotLedger>, symbol: &str) -> anyhow::Result<TokenInfo> {
    let token = sdk
        .reader()
        .token_by_symbol(symbol)
        .ok_or_else(|| anyhow!("Unknown token symbol: {}", symbol))?;

    if token.chain_id != sdk.chain_id() {
        bail!(
            "Token {} is on chain {}, expected {}",
            token.symbol,
            token.chain_id,
            sdk.chain_id()
        );
    }

    Ok(TokenInfo {
        address: token.address.clone(),
        decimals: token.decimals,
        symbol: token.symbol.clone(),
        name: (!token.name.is_empty()).then(|| token.name.clone()),
    })
}
