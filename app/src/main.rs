use clap::Parser;
use warpgate_app::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    warpgate_app::init_tracing()?;
    let cli = Cli::parse();
    let output = warpgate_app::run(cli).await?;
    println!("{}", output);
    Ok(())
}
