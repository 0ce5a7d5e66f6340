use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::core::price::{PriceProvider, PriceQuote};

/// Prices Vanguard funds through a two-step lookup: resolve the ticker to
/// an internal fund id via the autosuggest endpoint, then fetch the fund's
/// price document.
pub struct VanguardProvider {
    base_url: String,
}

impl VanguardProvider {
    pub fn new(base_url: &str) -> Self {
        VanguardProvider {
            base_url: base_url.to_string(),
        }
    }

    async fn find_fund(&self, client: &reqwest::Client, symbol: &str) -> Result<Fund> {
        let url = format!(
            "{}/rs/sae/01/autosuggest.json?types=funds&limit=10&query={}",
            self.base_url, symbol
        );
        debug!("Looking up fund id from {}", url);

        let response = client
            .get(&url)
            .send()
            .await
            .map_err(|e| anyhow!("Request error: {} for symbol: {}", e, symbol))?;
        let text = response.text().await?;

        let suggest: SuggestResponse = serde_json::from_str(&text)
            .map_err(|e| anyhow!("Failed to parse suggest response for {}: {}", symbol, e))?;

        suggest
            .results
            .into_iter()
            .find(|fund| fund.ticker_symbol == symbol)
            .ok_or_else(|| anyhow!("No fund found for symbol: {}", symbol))
    }

    async fn fetch_fund_price(&self, client: &reqwest::Client, fund: &Fund) -> Result<f64> {
        let url = format!("{}/rs/fv/01/funds/{}/price.json", self.base_url, fund.fund_id);
        debug!("Requesting fund price from {}", url);

        let response = client
            .get(&url)
            .send()
            .await
            .map_err(|e| anyhow!("Request error: {} for fund id: {}", e, fund.fund_id))?;
        let text = response.text().await?;

        let price_response: FundPriceResponse = serde_json::from_str(&text).map_err(|e| {
            anyhow!("Failed to parse price response for {}: {}", fund.ticker_symbol, e)
        })?;

        parse_dollar_price(&price_response.price)
            .with_context(|| format!("Invalid price for {}", fund.ticker_symbol))
    }
}

/// Parses a dollar-prefixed price string like `"$123.45"`. The format is
/// validated before any price is returned.
fn parse_dollar_price(raw: &str) -> Result<f64> {
    let trimmed = raw.trim();
    let amount = trimmed
        .strip_prefix('$')
        .ok_or_else(|| anyhow!("Expected price to start with a dollar sign, found '{trimmed}'"))?;
    let price: f64 = amount
        .parse()
        .map_err(|_| anyhow!("Could not parse '{amount}' as a price"))?;
    if !price.is_finite() || price <= 0.0 {
        return Err(anyhow!("Price must be positive, got {price}"));
    }
    Ok(price)
}

// Example response:
// {"type":"autosuggest","results":[{"tickerSymbol":"VXUS","fundID":"3369"}]}
#[derive(Debug, Deserialize)]
struct SuggestResponse {
    #[serde(default)]
    results: Vec<Fund>,
}

#[derive(Debug, Deserialize)]
struct Fund {
    #[serde(rename = "tickerSymbol")]
    ticker_symbol: String,
    #[serde(rename = "fundID")]
    fund_id: String,
}

#[derive(Debug, Deserialize)]
struct FundPriceResponse {
    price: String,
}

#[async_trait]
impl PriceProvider for VanguardProvider {
    #[instrument(
        name = "VanguardPriceFetch",
        skip(self),
        fields(symbol = %symbol)
    )]
    async fn fetch_price(&self, symbol: &str) -> Result<PriceQuote> {
        let client = reqwest::Client::builder().user_agent("rebal/1.0").build()?;

        let fund = self.find_fund(&client, symbol).await?;
        let price = self.fetch_fund_price(&client, &fund).await?;

        Ok(PriceQuote { price })
    }
}
