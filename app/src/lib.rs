//! Warpgate command-line application library

pub mod commands;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use ledger_client::SnapshotLedger;
use warpgate_core::SdkConfig;
use warpgate_swap::SwapSdk;

use commands::liquidity::{AddLiquidityArgs, RemoveLiquidityArgs};
use commands::swap::SwapArgs;

#[derive(Debug, Parser)]
#[command(name = "warpgate")]
#[command(about = "Quote Warpgate swaps and liquidity operations", long_about = None)]
#[command(version)]
pub struct Cli {
    /// JSON snapshot of tokens and pool reserves
    #[arg(short, long)]
    pub snapshot: PathBuf,

    /// SDK configuration file (JSON)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Quote a swap and print its transaction parameters
    Swap(SwapArgs),

    /// Build add-liquidity parameters
    AddLiquidity(AddLiquidityArgs),

    /// Build remove-liquidity parameters
    RemoveLiquidity(RemoveLiquidityArgs),
}

/// Install the log subscriber. Logs go to stderr so stdout stays JSON.
pub fn init_tracing() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("warpgate=debug".parse()?)
                .add_directive("info".parse()?),
        )
        .init();
    Ok(())
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<SdkConfig> {
    let Some(path) = path else {
        return Ok(SdkConfig::default());
    };
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    Ok(SdkConfig::from_json_str(&json)?)
}

/// Execute a parsed command and return its output as pretty JSON
pub async fn run(cli: Cli) -> anyhow::Result<String> {
    let config = load_config(cli.config.as_ref())?;
    let snapshot = std::fs::read_to_string(&cli.snapshot)
        .with_context(|| format!("reading snapshot {}", cli.snapshot.display()))?;
    let ledger = SnapshotLedger::from_json_str(&snapshot)?;

    tracing::info!(
        "Loaded {} tokens and {} pools from {}",
        ledger.tokens().len(),
        ledger.snapshot().pools.len(),
        cli.snapshot.display()
    );

    let sdk = SwapSdk::new(ledger, &config);
    let output = match cli.command {
        Commands::Swap(args) => {
            let quote = commands::swap::quote_swap(&sdk, args).await?;
            serde_json::to_string_pretty(&quote)?
        }
        Commands::AddLiquidity(args) => {
            let params = commands::liquidity::add_liquidity(&sdk, args).await?;
            serde_json::to_string_pretty(&params)?
        }
        Commands::RemoveLiquidity(args) => {
            let params = commands::liquidity::remove_liquidity(&sdk, args).await?;
            serde_json::to_string_pretty(&params)?
        }
    };
    Ok(output)
}
