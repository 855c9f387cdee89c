//! Crypto sentiment dashboard backend
//!
//! Serves the dashboard SPA, proxies CoinGecko market data, generates
//! synthetic sentiment series and keeps user alerts in SQLite.

pub mod alerts;
pub mod api;
pub mod config;
pub mod error;
pub mod export;
pub mod market;
pub mod sentiment;
