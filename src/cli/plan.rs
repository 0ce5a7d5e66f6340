use super::ui;
use crate::core::config::HoldingsConfig;
use crate::core::fetch;
use crate::core::price::{PriceProvider, PriceQuote};
use crate::core::rebalance;
use anyhow::Result;
use std::collections::{HashMap, HashSet};

pub async fn run(
    config: &HoldingsConfig,
    amount: f64,
    provider: &(dyn PriceProvider + Send + Sync),
) -> Result<()> {
    // Fetch every symbol needed by the computation: held instruments
    // count toward the portfolio total, targeted ones need a price to
    // turn a dollar delta into units.
    let symbols: HashSet<String> = config
        .holdings
        .keys()
        .chain(config.target_ratio.keys())
        .cloned()
        .collect();

    let pb = ui::new_progress_bar(symbols.len() as u64, true);
    pb.set_message("Fetching prices...");

    let quotes = fetch::fetch_all(&symbols, provider, &|| pb.inc(1)).await?;
    pb.finish_and_clear();

    let deltas = rebalance::plan(&config.holdings, &config.target_ratio, amount, &quotes)?;

    display_plan_table(config, amount, &quotes, &deltas);
    Ok(())
}

fn display_plan_table(
    config: &HoldingsConfig,
    amount: f64,
    quotes: &HashMap<String, PriceQuote>,
    deltas: &HashMap<String, f64>,
) {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Symbol"),
        ui::header_cell("Price"),
        ui::header_cell("Weight"),
        ui::header_cell("Buy (units)"),
        ui::header_cell("Buy (value)"),
    ]);

    let mut symbols: Vec<&String> = deltas.keys().collect();
    symbols.sort();

    for symbol in symbols {
        let units = deltas[symbol];
        let price = quotes[symbol].price;
        let weight = config.target_ratio.get(symbol).copied().unwrap_or(0);

        table.add_row(vec![
            comfy_table::Cell::new(symbol),
            ui::value_cell(format!("{price:.2}")),
            ui::value_cell(weight.to_string()),
            ui::delta_cell(units, |u| format!("{u:.3}")),
            ui::delta_cell(units * price, |v| format!("{v:.2}")),
        ]);
    }

    println!(
        "\n{}\n",
        ui::style_text("You should buy:", ui::StyleType::Title)
    );
    println!("{table}");

    let current_total: f64 = config.holdings.values().sum();
    let projected_total = current_total + amount;
    println!(
        "\n{}: {}",
        ui::style_text("Projected Total", ui::StyleType::TotalLabel),
        ui::style_text(&format!("{projected_total:.2}"), ui::StyleType::TotalValue)
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::{ProviderKind, ProvidersConfig};
    use anyhow::anyhow;
    use async_trait::async_trait;

    struct MockPriceProviderImpl;

    #[async_trait]
    impl PriceProvider for MockPriceProviderImpl {
        async fn fetch_price(&self, symbol: &str) -> Result<PriceQuote> {
            match symbol {
                "VTI" => Ok(PriceQuote { price: 220.0 }),
                "VXUS" => Ok(PriceQuote { price: 55.0 }),
                _ => Err(anyhow!("Unknown symbol: {symbol}")),
            }
        }
    }

    fn test_config(holdings: &[(&str, f64)], target: &[(&str, u32)]) -> HoldingsConfig {
        HoldingsConfig {
            holdings: holdings
                .iter()
                .map(|(s, v)| (s.to_string(), *v))
                .collect(),
            target_ratio: target.iter().map(|(s, w)| (s.to_string(), *w)).collect(),
            provider: ProviderKind::Yahoo,
            providers: ProvidersConfig::default(),
        }
    }

    #[tokio::test]
    async fn test_plan_command() {
        let config = test_config(&[("VTI", 6000.0), ("VXUS", 4000.0)], &[("VTI", 1), ("VXUS", 1)]);
        let provider = MockPriceProviderImpl;

        let result = run(&config, 2000.0, &provider).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_plan_command_fails_on_unknown_symbol() {
        let config = test_config(&[("VTI", 6000.0)], &[("VTI", 1), ("BOGUS", 1)]);
        let provider = MockPriceProviderImpl;

        let result = run(&config, 2000.0, &provider).await;
        assert!(result.is_err());
        assert_eq!(
            result.unwrap_err().to_string(),
            "Failed to retrieve price for BOGUS"
        );
    }
}
