//! Pure rebalancing arithmetic

use crate::core::price::PriceQuote;
use anyhow::{Result, anyhow, bail};
use std::collections::HashMap;

/// Computes how many units of each targeted instrument to buy so that,
/// after investing `new_cash`, the portfolio's value distribution matches
/// `target_ratio`.
///
/// `holdings` maps a symbol to the dollar value currently held in it, not
/// a share count. The returned map holds fractional unit deltas; a
/// negative delta means the instrument is over target. Instruments held
/// but absent from `target_ratio` keep their value in the portfolio total
/// but receive no recommendation.
///
/// Any invalid input fails the whole call; no partial map is returned.
pub fn plan(
    holdings: &HashMap<String, f64>,
    target_ratio: &HashMap<String, u32>,
    new_cash: f64,
    quotes: &HashMap<String, PriceQuote>,
) -> Result<HashMap<String, f64>> {
    if target_ratio.is_empty() {
        bail!("Target ratio is empty, nothing to allocate");
    }
    let ratio_total: u64 = target_ratio.values().map(|w| u64::from(*w)).sum();
    if ratio_total == 0 {
        bail!("Target ratio weights sum to zero");
    }
    if new_cash < 0.0 {
        bail!("Amount to invest must not be negative, got {new_cash}");
    }

    let mut current_total = 0.0;
    for (symbol, value) in holdings {
        if *value < 0.0 {
            bail!("Holding for {symbol} must not be negative, got {value}");
        }
        if !quotes.contains_key(symbol) {
            bail!("No price available for held instrument {symbol}");
        }
        current_total += value;
    }

    let projected_total = current_total + new_cash;

    let mut deltas = HashMap::with_capacity(target_ratio.len());
    for (symbol, weight) in target_ratio {
        let quote = quotes
            .get(symbol)
            .ok_or_else(|| anyhow!("No price available for targeted instrument {symbol}"))?;
        let current_value = holdings.get(symbol).copied().unwrap_or(0.0);
        let target_value = projected_total * f64::from(*weight) / ratio_total as f64;
        let delta_value = target_value - current_value;
        deltas.insert(symbol.clone(), delta_value / quote.price);
    }

    Ok(deltas)
}
