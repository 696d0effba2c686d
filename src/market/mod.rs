//! Price and market data fetching.

pub mod client;
pub mod types;

pub use client::MarketClient;
pub use types::MarketSnapshot;
