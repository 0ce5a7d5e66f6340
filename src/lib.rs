pub mod cli;
pub mod core;
pub mod providers;

use crate::core::config::{HoldingsConfig, ProviderKind};
use anyhow::Result;
use tracing::{debug, info};

pub async fn run(holdings_path: &str, amount: f64) -> Result<()> {
    info!("Portfolio rebalancer starting...");

    let config = HoldingsConfig::load_from_path(holdings_path)?;
    config.validate()?;
    debug!("Loaded config: {config:#?}");

    match config.provider {
        ProviderKind::Yahoo => {
            let base_url = config
                .providers
                .yahoo
                .as_ref()
                .map_or("https://query1.finance.yahoo.com", |p| &p.base_url);
            let provider = providers::yahoo_finance::YahooFinanceProvider::new(base_url);
            cli::plan::run(&config, amount, &provider).await
        }
        ProviderKind::Vanguard => {
            let base_url = config
                .providers
                .vanguard
                .as_ref()
                .map_or("https://api.vanguard.com", |p| &p.base_url);
            let provider = providers::vanguard::VanguardProvider::new(base_url);
            cli::plan::run(&config, amount, &provider).await
        }
    }
}
