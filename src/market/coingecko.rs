//! CoinGecko API Integration
//!
//! Fetches live market data for a single coin.
//!
//! ## API Reference
//!
//! Endpoint: {base}/coins/markets?vs_currency=usd&ids={coin_id}
//! Returns: Array with zero or one market entry
//!
//! ## Usage
//!
//! ```rust,ignore
//! use sentflow::market::{CoinGeckoClient, MarketDataProvider};
//!
//! let client = CoinGeckoClient::new("https://api.coingecko.com/api/v3", 10)?;
//! let market = client.fetch_coin("bitcoin").await?;
//! ```

use super::{MarketDataProvider, MarketError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One entry of the `/coins/markets` response
///
/// Common fields are typed; everything else CoinGecko sends is kept in
/// `extra` and passed through unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoinMarket {
    pub id: String,
    pub symbol: String,
    pub name: String,
    pub image: Option<String>,
    pub current_price: Option<f64>,
    pub market_cap: Option<f64>,
    pub market_cap_rank: Option<u32>,
    pub total_volume: Option<f64>,
    pub high_24h: Option<f64>,
    pub low_24h: Option<f64>,
    pub price_change_24h: Option<f64>,
    pub price_change_percentage_24h: Option<f64>,
    pub last_updated: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

pub struct CoinGeckoClient {
    client: reqwest::Client,
    base_url: String,
}

impl CoinGeckoClient {
    /// Build a client with a request timeout in seconds
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self, MarketError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn markets_url(&self) -> String {
        format!("{}/coins/markets", self.base_url)
    }
}

#[async_trait]
impl MarketDataProvider for CoinGeckoClient {
    /// Fetch market data for a coin
    ///
    /// # Returns
    /// * `Ok(Some(CoinMarket))` - first entry of the response
    /// * `Ok(None)` - CoinGecko knows no such coin
    /// * `Err(MarketError::Upstream)` - non-success HTTP status
    /// * `Err(MarketError::Http)` - transport or decode failure
    async fn fetch_coin(&self, coin_id: &str) -> Result<Option<CoinMarket>, MarketError> {
        let response = self
            .client
            .get(self.markets_url())
            .query(&[("vs_currency", "usd"), ("ids", coin_id)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(MarketError::Upstream(format!(
                "CoinGecko API error: {}",
                response.status()
            )));
        }

        let markets: Vec<CoinMarket> = response.json().await?;
        log::debug!("CoinGecko returned {} entries for {}", markets.len(), coin_id);

        Ok(markets.into_iter().next())
    }
}
