//! Core business logic abstractions

pub mod config;
pub mod fetch;
pub mod log;
pub mod price;
pub mod rebalance;

// Re-export main types for cleaner imports
pub use price::{PriceProvider, PriceQuote};
