use anyhow::Result;
use clap::Parser;
use rebal::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Path to the holdings configuration file
    #[arg(long)]
    holdings: String,

    /// Amount of new cash to invest
    #[arg(long)]
    amount: f64,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    if cli.amount <= 0.0 {
        anyhow::bail!("--amount must be a positive value");
    }

    let result = rebal::run(&cli.holdings, cli.amount).await;

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
