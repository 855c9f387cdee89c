//! # Synthetic Sentiment
//!
//! Demonstration-only sentiment series. Nothing here analyses real data:
//! values come from a random source shaped by sinusoidal trend terms, with
//! the optional 24h price change as the only external signal.
//!
//! ## Module Organization
//!
//! - `types` - `SentimentRecord` and its nested groups
//! - `intervals` - time range label → sample count / spacing
//! - `profiles` - per-coin baseline bias and volatility
//! - `generator` - the series walk itself
//! - `summary` - latest sample and per-source views

pub mod types;
pub mod intervals;
pub mod profiles;
pub mod generator;
pub mod summary;

pub use types::{
    AssetProfile, IntervalSpec, MarketContext, MarketPhase, SentimentRecord, SentimentSources,
    TechnicalIndicators,
};
pub use intervals::TimeRange;
pub use profiles::resolve_profile;
pub use generator::{SentimentGenerator, SeriesOrder, SeriesRequest};
