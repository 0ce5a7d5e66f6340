//! Pricing abstractions and core types

use anyhow::Result;
use async_trait::async_trait;

/// A point-in-time market price for a single instrument, in the account
/// currency per unit. Quotes are fetched fresh for every run and never
/// carried across runs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceQuote {
    pub price: f64,
}

#[async_trait]
pub trait PriceProvider: Send + Sync {
    /// Fetches the current price for a ticker symbol.
    ///
    /// Implementations must return an error for unknown symbols,
    /// unreachable endpoints, or responses that do not parse to a positive
    /// finite price. A garbled price is never surfaced as success.
    async fn fetch_price(&self, symbol: &str) -> Result<PriceQuote>;
}
