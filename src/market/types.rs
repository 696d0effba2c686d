//! Wire and domain types for the price/market data provider.

use std::collections::HashMap;

use serde::Deserialize;

use crate::error::FetchError;

/// Extended market metrics backing the periodic summaries.
#[derive(Debug, Clone, PartialEq)]
pub struct MarketSnapshot {
    /// Provider-reported all-time high in the quote currency.
    pub ath: f64,
    /// 7-day percentage change.
    pub change_7d: f64,
    /// 30-day percentage change.
    pub change_30d: f64,
    /// Market capitalization in the quote currency.
    pub market_cap: f64,
    /// Circulating supply in coin units.
    pub circulating_supply: f64,
}

/// `/simple/price` response: coin id -> currency -> spot price.
pub type SimplePriceResponse = HashMap<String, HashMap<String, f64>>;

/// `/coins/{id}` response, reduced to the fields the summaries need.
#[derive(Debug, Clone, Deserialize)]
pub struct CoinResponse {
    /// Market data block; absent when `market_data=false` is requested.
    pub market_data: Option<CoinMarketData>,
}

/// Market data block of `/coins/{id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct CoinMarketData {
    /// All-time high per quote currency.
    pub ath: Option<HashMap<String, f64>>,
    /// Market cap per quote currency.
    pub market_cap: Option<HashMap<String, f64>>,
    /// 7-day percentage change.
    pub price_change_percentage_7d: Option<f64>,
    /// 30-day percentage change.
    pub price_change_percentage_30d: Option<f64>,
    /// Circulating supply in coin units.
    pub circulating_supply: Option<f64>,
}

impl CoinResponse {
    /// Project the wire payload onto a [`MarketSnapshot`] for the given
    /// quote currency.
    pub fn into_snapshot(self, vs_currency: &str) -> Result<MarketSnapshot, FetchError> {
        let data = self
            .market_data
            .ok_or(FetchError::MissingField { field: "market_data" })?;

        let ath = data
            .ath
            .as_ref()
            .and_then(|m| m.get(vs_currency))
            .copied()
            .ok_or(FetchError::MissingField { field: "market_data.ath" })?;

        let market_cap = data
            .market_cap
            .as_ref()
            .and_then(|m| m.get(vs_currency))
            .copied()
            .ok_or(FetchError::MissingField { field: "market_data.market_cap" })?;

        Ok(MarketSnapshot {
            ath,
            change_7d: data.price_change_percentage_7d.ok_or(FetchError::MissingField {
                field: "market_data.price_change_percentage_7d",
            })?,
            change_30d: data.price_change_percentage_30d.ok_or(FetchError::MissingField {
                field: "market_data.price_change_percentage_30d",
            })?,
            market_cap,
            circulating_supply: data.circulating_supply.ok_or(FetchError::MissingField {
                field: "market_data.circulating_supply",
            })?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coin_response_projects_to_snapshot() {
        let raw = r#"{
            "market_data": {
                "ath": {"usd": 69000.0, "eur": 60000.0},
                "market_cap": {"usd": 1200000000000.0},
                "price_change_percentage_7d": -1.2,
                "price_change_percentage_30d": 4.5,
                "circulating_supply": 19600000.0
            }
        }"#;

        let response: CoinResponse = serde_json::from_str(raw).unwrap();
        let snapshot = response.into_snapshot("usd").unwrap();

        assert_eq!(snapshot.ath, 69000.0);
        assert_eq!(snapshot.change_7d, -1.2);
        assert_eq!(snapshot.change_30d, 4.5);
        assert_eq!(snapshot.market_cap, 1.2e12);
        assert_eq!(snapshot.circulating_supply, 19_600_000.0);
    }

    #[test]
    fn missing_currency_is_a_missing_field() {
        let raw = r#"{
            "market_data": {
                "ath": {"eur": 60000.0},
                "market_cap": {"usd": 1.0},
                "price_change_percentage_7d": 0.0,
                "price_change_percentage_30d": 0.0,
                "circulating_supply": 1.0
            }
        }"#;

        let response: CoinResponse = serde_json::from_str(raw).unwrap();
        let err = response.into_snapshot("usd").unwrap_err();
        assert!(matches!(err, FetchError::MissingField { field: "market_data.ath" }));
    }

    #[test]
    fn missing_market_data_block_is_rejected() {
        let response: CoinResponse = serde_json::from_str("{}").unwrap();
        let err = response.into_snapshot("usd").unwrap_err();
        assert!(matches!(err, FetchError::MissingField { field: "market_data" }));
    }
}
