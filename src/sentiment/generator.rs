//! Synthetic sentiment series generator
//!
//! Produces a walk of `count` samples backward from `now`, one per interval
//! spacing. Each sample layers uniform jitter on two smooth oscillators so a
//! plotted series shows wave structure instead of pure noise.
//!
//! Randomness and the clock are both inputs: pass a seeded `StdRng` and a
//! fixed instant to get a reproducible series.

use super::intervals::TimeRange;
use super::profiles::resolve_profile;
use super::types::{
    AssetProfile, MarketContext, MarketPhase, SentimentRecord, SentimentSources,
    TechnicalIndicators,
};
use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use std::f64::consts::PI;

const POSITIVE_MIN: f64 = 15.0;
const POSITIVE_MAX: f64 = 75.0;
const NEGATIVE_MIN: f64 = 10.0;
const NEGATIVE_MAX: f64 = 60.0;
const NEUTRAL_FLOOR: f64 = 10.0;

/// Output ordering of a generated series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SeriesOrder {
    /// Oldest sample first, newest last
    #[default]
    OldestFirst,
    /// Newest sample first
    NewestFirst,
}

impl SeriesOrder {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "oldest_first" | "oldest" => Some(SeriesOrder::OldestFirst),
            "newest_first" | "newest" => Some(SeriesOrder::NewestFirst),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SeriesOrder::OldestFirst => "oldest_first",
            SeriesOrder::NewestFirst => "newest_first",
        }
    }
}

/// Inputs for one generated series
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesRequest {
    pub coin_id: String,
    pub time_range: TimeRange,
    pub current_price: Option<f64>,
    pub price_change_24h: Option<f64>,
}

impl SeriesRequest {
    pub fn new(coin_id: impl Into<String>, time_range: TimeRange) -> Self {
        Self {
            coin_id: coin_id.into(),
            time_range,
            current_price: None,
            price_change_24h: None,
        }
    }

    pub fn with_current_price(mut self, price: Option<f64>) -> Self {
        self.current_price = price;
        self
    }

    pub fn with_price_change(mut self, change: Option<f64>) -> Self {
        self.price_change_24h = change;
        self
    }

    /// Price change hint, ignoring zero and non-finite values
    fn price_change(&self) -> Option<f64> {
        self.price_change_24h.filter(|c| c.is_finite() && *c != 0.0)
    }
}

#[derive(Debug, Clone, Default)]
pub struct SentimentGenerator {
    order: SeriesOrder,
}

impl SentimentGenerator {
    pub fn new(order: SeriesOrder) -> Self {
        Self { order }
    }

    pub fn order(&self) -> SeriesOrder {
        self.order
    }

    /// Generate the full series for a request
    ///
    /// Never fails: unknown coins and time ranges resolve to defaults upstream
    /// of this call.
    pub fn generate<R: Rng + ?Sized>(
        &self,
        request: &SeriesRequest,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> Vec<SentimentRecord> {
        let interval = request.time_range.interval();
        let profile = resolve_profile(&request.coin_id);
        let count = interval.sample_count;

        let steps: Box<dyn Iterator<Item = usize>> = match self.order {
            SeriesOrder::OldestFirst => Box::new((0..count).rev()),
            SeriesOrder::NewestFirst => Box::new(0..count),
        };

        steps
            .map(|step| {
                let timestamp = now - Duration::seconds(step as i64 * interval.spacing_secs);
                let time_progress = step as f64 / count as f64;
                generate_sample(request, &profile, timestamp, time_progress, rng)
            })
            .collect()
    }
}

/// Build one record at a given phase of the walk
fn generate_sample<R: Rng + ?Sized>(
    request: &SeriesRequest,
    profile: &AssetProfile,
    timestamp: DateTime<Utc>,
    time_progress: f64,
    rng: &mut R,
) -> SentimentRecord {
    let is_bitcoin = request.coin_id == "bitcoin";

    let market_cycle = (time_progress * PI * 2.0).sin() * 0.3;
    let trend_factor = (time_progress * PI * 4.0).cos() * 0.2;
    let random_noise = centered(rng) * 0.4;

    let price_correlation = request
        .price_change()
        .map(|change| (change / 10.0).tanh() * 15.0)
        .unwrap_or(0.0);

    let positive = (profile.base_positive
        + market_cycle * 20.0
        + trend_factor * 10.0
        + random_noise * profile.volatility * 15.0
        + price_correlation)
        .clamp(POSITIVE_MIN, POSITIVE_MAX);

    let negative = (profile.base_negative
        - market_cycle * 15.0
        - trend_factor * 8.0
        + random_noise * profile.volatility * 12.0
        - price_correlation * 0.7)
        .clamp(NEGATIVE_MIN, NEGATIVE_MAX);

    // overall stays the raw difference of the emitted values, never re-rounded
    let positive = round_to(positive, 1);
    let negative = round_to(negative, 1);
    let neutral = round_to((100.0 - positive - negative).max(NEUTRAL_FLOOR), 1);
    let overall = positive - negative;

    let confidence = (0.7 + (overall.abs() / 50.0) * 0.3 + centered(rng) * 0.2).clamp(0.3, 1.0);

    let social_mentions = (1000.0
        + (time_progress * PI * 6.0).sin() * 500.0
        + rng.gen::<f64>() * 300.0)
        .floor()
        .max(100.0) as u64;

    let fear_greed_index = (50.0 + overall * 0.8 + centered(rng) * 20.0).clamp(0.0, 100.0);
    let news_sentiment = overall * 0.8 + centered(rng) * 20.0;

    let market_cap_influence = if is_bitcoin {
        0.8
    } else {
        0.3 + rng.gen::<f64>() * 0.4
    };

    let trading_volume_24h = (1_000_000.0 + rng.gen::<f64>() * 5_000_000.0).floor() as u64;

    let price_momentum = match request.price_change() {
        Some(change) => change,
        None => centered(rng) * 10.0,
    };

    let volatility_index = profile.volatility + rng.gen::<f64>() * 0.5;

    let technical_indicators = TechnicalIndicators {
        rsi: round_to((50.0 + overall * 0.6 + centered(rng) * 30.0).clamp(0.0, 100.0), 1),
        macd: round_to(centered(rng) * 2.0 + overall * 0.02, 3),
        bollinger_position: round_to(0.5 + overall / 100.0 + centered(rng) * 0.4, 3),
        volume_sma_ratio: round_to(1.0 + centered(rng) * 0.6, 3),
    };

    let btc_dominance =
        (55.0 + (time_progress * PI * 3.0).sin() * 8.0 + centered(rng) * 6.0).clamp(40.0, 70.0);

    let correlation_with_btc = if is_bitcoin {
        1.0
    } else {
        0.4 + rng.gen::<f64>() * 0.5
    };

    let market_context = MarketContext {
        btc_dominance: round_to(btc_dominance, 1),
        market_phase: MarketPhase::from_overall(overall),
        correlation_with_btc: round_to(correlation_with_btc, 3),
        sector_sentiment: round_to(overall + centered(rng) * 30.0, 1),
    };

    let sources = SentimentSources {
        twitter: round_to(positive * 0.4 + rng.gen::<f64>() * 20.0, 1),
        reddit: round_to(positive * 0.3 + rng.gen::<f64>() * 15.0, 1),
        telegram: round_to(positive * 0.2 + rng.gen::<f64>() * 10.0, 1),
        news: round_to(positive * 0.6 + rng.gen::<f64>() * 25.0, 1),
        trading_signals: round_to(overall + 50.0 + rng.gen::<f64>() * 20.0, 1),
    };

    SentimentRecord {
        timestamp,
        positive,
        negative,
        neutral,
        overall,
        confidence: round_to(confidence, 3),
        volume_correlation: round_to(0.3 + overall.abs() / 100.0, 3),
        social_mentions,
        news_sentiment: round_to(news_sentiment, 1),
        fear_greed_index: round_to(fear_greed_index, 1),
        market_cap_influence: round_to(market_cap_influence, 3),
        trading_volume_24h,
        price_momentum: round_to(price_momentum, 2),
        volatility_index: round_to(volatility_index, 3),
        technical_indicators,
        market_context,
        sources,
    }
}

/// Uniform draw in [-0.5, 0.5)
fn centered<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    rng.gen::<f64>() - 0.5
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
