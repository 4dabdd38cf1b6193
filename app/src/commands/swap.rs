use clap::Args;
use ledger_client::SnapshotLedger;
use warpgate_swap::{SwapQuote, SwapRequest, SwapSdk, TradeType};

use super::resolve_token;

#[derive(Debug, Args)]
pub struct SwapArgs {
    /// Symbol of the token to sell
    pub from: String,

    /// Symbol of the token to buy
    pub to: String,

    /// Human-readable amount; the output amount with --exact-out
    pub amount: String,

    /// Fix the output amount instead of the input
    #[arg(long)]
    pub exact_out: bool,

    /// Slippage tolerance in basis points (config default when omitted)
    #[arg(long)]
    pub slippage_bps: Option<u32>,

    /// Intermediate token symbols to route through, comma separated
    #[arg(long, value_delimiter = ',')]
    pub via: Vec<String>,
}

/// Quote a swap
pub async fn quote_swap(
    sdk: &SwapSdk<SnapshotLedger>,
    args: SwapArgs,
) -> anyhow::Result<SwapQuote> {
    let via = args
        .via
        .iter()
        .map(|symbol| resolve_token(sdk, symbol))
        .collect::<anyhow::Result<Vec<_>>>()?;

    let request = SwapRequest {
        from_token: resolve_token(sdk, &args.from)?,
        to_token: resolve_token(sdk, &args.to)?,
        amount: args.amount,
        trade_type: if args.exact_out {
            TradeType::ExactOutput
        } else {
            TradeType::ExactInput
        },
        slippage_bps: args.slippage_bps,
        via,
    };

    Ok(sdk.swap(&request).await?)
}
