//! Market data: the supported coin list and the live price provider

pub mod catalog;
pub mod coingecko;

use async_trait::async_trait;

pub use catalog::{find_coin, CoinInfo, POPULAR_COINS};
pub use coingecko::{CoinGeckoClient, CoinMarket};

#[derive(Debug)]
pub enum MarketError {
    /// Transport, timeout or body decode failure
    Http(reqwest::Error),
    /// Provider answered with a non-success status
    Upstream(String),
}

impl From<reqwest::Error> for MarketError {
    fn from(err: reqwest::Error) -> Self {
        MarketError::Http(err)
    }
}

impl std::fmt::Display for MarketError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MarketError::Http(e) => write!(f, "{}", e),
            MarketError::Upstream(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for MarketError {}

/// Source of live market data for a coin
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// `Ok(None)` when the provider has no entry for `coin_id`
    async fn fetch_coin(&self, coin_id: &str) -> Result<Option<CoinMarket>, MarketError>;
}
