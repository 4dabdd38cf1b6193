use clap::Args;
use ledger_client::SnapshotLedger;
use warpgate_swap::{
    AddLiquidityParameters, AddLiquidityRequest, RemoveLiquidityParameters,
    RemoveLiquidityRequest, SwapSdk,
};

use super::resolve_token;

#[derive(Debug, Args)]
pub struct AddLiquidityArgs {
    pub token_a: String,
    pub token_b: String,

    /// Human-readable amount of token A
    pub amount_a: String,

    /// Human-readable amount of token B
    pub amount_b: String,

    #[arg(long)]
    pub slippage_bps: Option<u32>,

    /// Fee for a new pool, required when the pool does not exist yet.
    /// An existing pool keeps its own.
    #[arg(long)]
    pub fee_bps: Option<u32>,
}

#[derive(Debug, Args)]
pub struct RemoveLiquidityArgs {
    pub token_a: String,
    pub token_b: String,

    /// LP tokens to burn (8 decimals)
    pub lp_amount: String,

    #[arg(long)]
    pub slippage_bps: Option<u32>,
}

pub async fn add_liquidity(
    sdk: &SwapSdk<SnapshotLedger>,
    args: AddLiquidityArgs,
) -> anyhow::Result<AddLiquidityParameters> {
    let request = AddLiquidityRequest {
        token_a: resolve_token(sdk, &args.token_a)?,
        token_b: resolve_token(sdk, &args.token_b)?,
        amount_a: args.amount_a,
        amount_b: args.amount_b,
        slippage_bps: args.slippage_bps,
        fee_bps: args.fee_bps,
    };
    Ok(sdk.add_liquidity(&request).await?)
}

pub async fn remove_liquidity(
    sdk: &SwapSdk<SnapshotLedger>,
    args: RemoveLiquidityArgs,
) -> anyhow::Result<RemoveLiquidityParameters> {
    let request = RemoveLiquidityRequest {
        token_a: resolve_token(sdk, &args.token_a)?,
        token_b: resolve_token(sdk, &args.token_b)?,
        lp_amount: args.lp_amount,
        slippage_bps: args.slippage_bps,
    };
    Ok(sdk.remove_liquidity(&request).await?)
}
