//! CoinGecko API client with bounded retry.

use tracing::{debug, instrument, warn};

use crate::config::Config;
use crate::error::FetchError;
use crate::retry::RetryPolicy;

use super::types::{CoinResponse, MarketSnapshot, SimplePriceResponse};

/// Read-only client for the price/market data provider.
#[derive(Debug, Clone)]
pub struct MarketClient {
    /// HTTP client for API requests.
    http: reqwest::Client,
    /// Provider base URL.
    base_url: String,
    /// Provider coin identifier.
    coin_id: String,
    /// Quote currency.
    vs_currency: String,
    /// Retry policy shared by both endpoints.
    retry: RetryPolicy,
}

impl MarketClient {
    /// Create a client from config.
    pub fn new(config: &Config) -> Self {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.http_timeout_secs))
            .build()
            .expect("failed to create HTTP client");

        Self {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            coin_id: config.coin_id.clone(),
            vs_currency: config.vs_currency.clone(),
            retry: RetryPolicy::from_config(config),
        }
    }

    /// Fetch the current spot price. Retried; exhaustion propagates and is
    /// fatal to the run.
    #[instrument(skip(self))]
    pub async fn fetch_price(&self) -> Result<f64, FetchError> {
        self.retry.run("price fetch", || self.price_once()).await
    }

    /// Fetch extended market metrics. Retried; exhaustion degrades to `None`
    /// so the caller can skip the dependent summary.
    #[instrument(skip(self))]
    pub async fn fetch_market_data(&self) -> Option<MarketSnapshot> {
        match self.retry.run("market data fetch", || self.market_data_once()).await {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                warn!("market data unavailable after retries: {e}");
                None
            }
        }
    }

    async fn price_once(&self) -> Result<f64, FetchError> {
        let url = format!("{}/simple/price", self.base_url);

        let response = self
            .http
            .get(&url)
            .query(&[("ids", self.coin_id.as_str()), ("vs_currencies", self.vs_currency.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(FetchError::BadStatus {
                endpoint: "/simple/price".to_string(),
                status: response.status(),
            });
        }

        let body: SimplePriceResponse = response.json().await?;
        let price = body
            .get(&self.coin_id)
            .and_then(|quotes| quotes.get(&self.vs_currency))
            .copied()
            .ok_or(FetchError::MissingField { field: "simple_price.coin.currency" })?;

        debug!(price, "fetched spot price");
        Ok(price)
    }

    async fn market_data_once(&self) -> Result<MarketSnapshot, FetchError> {
        let url = format!("{}/coins/{}", self.base_url, self.coin_id);

        let response = self
            .http
            .get(&url)
            .query(&[
                ("localization", "false"),
                ("tickers", "false"),
                ("market_data", "true"),
                ("community_data", "false"),
                ("developer_data", "false"),
                ("sparkline", "false"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(FetchError::BadStatus {
                endpoint: "/coins/{id}".to_string(),
                status: response.status(),
            });
        }

        let body: CoinResponse = response.json().await?;
        body.into_snapshot(&self.vs_currency)
    }
}
