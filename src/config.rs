//! Server configuration from environment variables

use crate::sentiment::SeriesOrder;
use std::env;

/// Configuration for the HTTP server
///
/// Loaded from environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    /// Bind address
    pub host: String,

    pub port: u16,

    /// Path to SQLite database file holding alerts
    pub db_path: String,

    /// Directory with the built single-page app (index.html + assets)
    pub static_dir: String,

    /// CoinGecko API base URL (no trailing path)
    pub coingecko_base_url: String,

    /// Outbound market data request timeout in seconds
    pub market_timeout_secs: u64,

    /// Ordering of generated sentiment series
    pub series_order: SeriesOrder,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            db_path: "sentiment.db".to_string(),
            static_dir: "static".to_string(),
            coingecko_base_url: "https://api.coingecko.com/api/v3".to_string(),
            market_timeout_secs: 10,
            series_order: SeriesOrder::OldestFirst,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// Environment variables:
    /// - `SENTFLOW_HOST` (default: 0.0.0.0)
    /// - `SENTFLOW_PORT` (default: 5000)
    /// - `SENTFLOW_DB_PATH` (default: sentiment.db)
    /// - `SENTFLOW_STATIC_DIR` (default: static)
    /// - `COINGECKO_BASE_URL` (default: https://api.coingecko.com/api/v3)
    /// - `MARKET_TIMEOUT_SECS` (default: 10)
    /// - `SENTIMENT_SERIES_ORDER` (default: oldest_first)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key → value source; invalid values fall back to defaults
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let port = match lookup("SENTFLOW_PORT") {
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                log::warn!("Invalid SENTFLOW_PORT '{}', defaulting to {}", raw, defaults.port);
                defaults.port
            }),
            None => defaults.port,
        };

        let market_timeout_secs = lookup("MARKET_TIMEOUT_SECS")
            .and_then(|s| s.parse().ok())
            .filter(|secs| *secs > 0)
            .unwrap_or(defaults.market_timeout_secs);

        let series_order = match lookup("SENTIMENT_SERIES_ORDER") {
            Some(raw) => SeriesOrder::from_str(&raw).unwrap_or_else(|| {
                log::warn!(
                    "Invalid SENTIMENT_SERIES_ORDER '{}', defaulting to {}",
                    raw,
                    defaults.series_order.as_str()
                );
                defaults.series_order
            }),
            None => defaults.series_order,
        };

        Self {
            host: lookup("SENTFLOW_HOST").unwrap_or(defaults.host),
            port,
            db_path: lookup("SENTFLOW_DB_PATH").unwrap_or(defaults.db_path),
            static_dir: lookup("SENTFLOW_STATIC_DIR").unwrap_or(defaults.static_dir),
            coingecko_base_url: lookup("COINGECKO_BASE_URL").unwrap_or(defaults.coingecko_base_url),
            market_timeout_secs,
            series_order,
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
