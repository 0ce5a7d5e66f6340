//! Concurrent price retrieval for a set of instruments

use crate::core::price::{PriceProvider, PriceQuote};
use anyhow::{Context, Result};
use futures::future::join_all;
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Fetches prices for all `symbols` concurrently and returns a complete
/// quote map, one entry per requested symbol.
///
/// `join_all` acts as a completion barrier: every fetch runs to completion
/// before any result is inspected, so a failing symbol cannot leave sibling
/// fetches in flight past this call. On failure the error names the symbol
/// that could not be priced; no partial map is returned.
///
/// `on_fetched` is invoked once per completed fetch, in completion order,
/// so callers can drive a progress bar.
pub async fn fetch_all(
    symbols: &HashSet<String>,
    provider: &(dyn PriceProvider + Send + Sync),
    on_fetched: &(dyn Fn() + Sync),
) -> Result<HashMap<String, PriceQuote>> {
    let quote_futures = symbols.iter().map(|symbol| async move {
        let result = provider.fetch_price(symbol).await;
        on_fetched();
        (symbol.as_str(), result)
    });

    let results = join_all(quote_futures).await;
    debug!("Fetched {} quotes", results.len());

    let mut quotes = HashMap::with_capacity(symbols.len());
    for (symbol, result) in results {
        let quote =
            result.with_context(|| format!("Failed to retrieve price for {symbol}"))?;
        quotes.insert(symbol.to_string(), quote);
    }
    Ok(quotes)
}
