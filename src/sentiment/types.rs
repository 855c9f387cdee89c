//! Sentiment record types
//!
//! One `SentimentRecord` is a single synthesized sample. Every field is
//! derived per request and never persisted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Market phase classification derived from the overall score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketPhase {
    Bull,
    Bear,
    Sideways,
}

impl MarketPhase {
    /// Overall score above this is a bull phase
    pub const BULL_THRESHOLD: f64 = 15.0;

    /// Overall score below this is a bear phase
    pub const BEAR_THRESHOLD: f64 = -15.0;

    pub fn from_overall(overall: f64) -> Self {
        if overall > Self::BULL_THRESHOLD {
            MarketPhase::Bull
        } else if overall < Self::BEAR_THRESHOLD {
            MarketPhase::Bear
        } else {
            MarketPhase::Sideways
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MarketPhase::Bull => "bull",
            MarketPhase::Bear => "bear",
            MarketPhase::Sideways => "sideways",
        }
    }

    /// Numeric encoding used by the ML export (+1 / 0 / -1)
    pub fn encoded(&self) -> f64 {
        match self {
            MarketPhase::Bull => 1.0,
            MarketPhase::Sideways => 0.0,
            MarketPhase::Bear => -1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechnicalIndicators {
    pub rsi: f64,
    pub macd: f64,
    pub bollinger_position: f64,
    pub volume_sma_ratio: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketContext {
    pub btc_dominance: f64,
    pub market_phase: MarketPhase,
    pub correlation_with_btc: f64,
    pub sector_sentiment: f64,
}

/// Per-source sentiment split
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentSources {
    pub twitter: f64,
    pub reddit: f64,
    pub telegram: f64,
    pub news: f64,
    pub trading_signals: f64,
}

/// One synthesized sentiment sample
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentRecord {
    pub timestamp: DateTime<Utc>,
    pub positive: f64,
    pub negative: f64,
    pub neutral: f64,
    pub overall: f64,
    pub confidence: f64,
    pub volume_correlation: f64,
    pub social_mentions: u64,
    pub news_sentiment: f64,
    pub fear_greed_index: f64,
    pub market_cap_influence: f64,
    pub trading_volume_24h: u64,
    pub price_momentum: f64,
    pub volatility_index: f64,
    pub technical_indicators: TechnicalIndicators,
    pub market_context: MarketContext,
    pub sources: SentimentSources,
}

/// Static per-asset baseline used to shape a series
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AssetProfile {
    pub base_positive: f64,
    pub base_negative: f64,
    pub volatility: f64,
}

/// Sample count and spacing for a time range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntervalSpec {
    pub sample_count: usize,
    pub spacing_secs: i64,
}
