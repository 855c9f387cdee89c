//! ML-ready export: fixed-order feature vectors and supervised labels
//!
//! `social_mentions` is divided by 1 000 and `trading_volume_24h` by
//! 1 000 000 so all features sit on comparable scales. `market_phase` is
//! encoded as +1 / 0 / -1 for bull / sideways / bear.
//!
//! Excluded column groups drop their features and names together, so
//! `feature_names` always lines up with each `features` vector.

use super::{iso_timestamp, ExportColumns, ExportContext, ExportError};
use crate::sentiment::{MarketPhase, SentimentRecord};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Vector width with every column group included
pub const FEATURE_COUNT: usize = 24;

const CORE_FEATURES: usize = 11;
const TECHNICAL_FEATURES: usize = 4;
const MARKET_FEATURES: usize = 4;

/// Overall score must exceed this magnitude to count as directional
const DIRECTION_DEADBAND: f64 = 5.0;

const HIGH_CONFIDENCE: f64 = 0.8;

pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "positive_sentiment",
    "negative_sentiment",
    "confidence",
    "volume_correlation",
    "social_mentions_normalized",
    "news_sentiment",
    "fear_greed_index",
    "market_cap_influence",
    "trading_volume_normalized",
    "price_momentum",
    "volatility_index",
    "rsi",
    "macd",
    "bollinger_position",
    "volume_sma_ratio",
    "btc_dominance",
    "market_phase_encoded",
    "correlation_with_btc",
    "sector_sentiment",
    "twitter_sentiment",
    "reddit_sentiment",
    "telegram_sentiment",
    "news_source_sentiment",
    "trading_signals_sentiment",
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SampleLabels {
    pub sentiment_direction: i8,
    pub sentiment_strength: f64,
    pub market_phase: MarketPhase,
    pub high_confidence: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MlSample {
    pub features: Vec<f64>,
    pub labels: SampleLabels,
    pub timestamp: DateTime<Utc>,
    pub raw_overall_score: f64,
}

#[derive(Debug, Serialize)]
pub struct DatasetInfo {
    pub name: String,
    pub coin_id: String,
    pub time_range: &'static str,
    pub samples: usize,
    pub feature_count: usize,
    pub created_at: String,
    pub description: &'static str,
}

#[derive(Debug, Serialize)]
pub struct LabelDescriptions {
    pub sentiment_direction: &'static str,
    pub sentiment_strength: &'static str,
    pub market_phase: &'static str,
    pub high_confidence: &'static str,
}

impl Default for LabelDescriptions {
    fn default() -> Self {
        Self {
            sentiment_direction: "Sentiment direction: 1=bullish, 0=neutral, -1=bearish",
            sentiment_strength: "Absolute sentiment strength (0-100)",
            market_phase: "Market phase: bull/bear/sideways",
            high_confidence: "High confidence prediction: 1=yes, 0=no",
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MlDataset {
    pub dataset_info: DatasetInfo,
    pub feature_names: Vec<&'static str>,
    pub label_descriptions: LabelDescriptions,
    pub data: Vec<MlSample>,
}

fn full_feature_vector(record: &SentimentRecord) -> [f64; FEATURE_COUNT] {
    let ti = &record.technical_indicators;
    let mc = &record.market_context;
    let src = &record.sources;

    [
        record.positive,
        record.negative,
        record.confidence,
        record.volume_correlation,
        record.social_mentions as f64 / 1_000.0,
        record.news_sentiment,
        record.fear_greed_index,
        record.market_cap_influence,
        record.trading_volume_24h as f64 / 1_000_000.0,
        record.price_momentum,
        record.volatility_index,
        ti.rsi,
        ti.macd,
        ti.bollinger_position,
        ti.volume_sma_ratio,
        mc.btc_dominance,
        mc.market_phase.encoded(),
        mc.correlation_with_btc,
        mc.sector_sentiment,
        src.twitter,
        src.reddit,
        src.telegram,
        src.news,
        src.trading_signals,
    ]
}

/// Keep only the positions of the selected groups from a full-width row
fn select<T: Copy>(full: &[T; FEATURE_COUNT], columns: &ExportColumns) -> Vec<T> {
    let technical_end = CORE_FEATURES + TECHNICAL_FEATURES;
    let market_end = technical_end + MARKET_FEATURES;

    let mut out = full[..CORE_FEATURES].to_vec();
    if columns.technical {
        out.extend_from_slice(&full[CORE_FEATURES..technical_end]);
    }
    if columns.market {
        out.extend_from_slice(&full[technical_end..market_end]);
    }
    if columns.sources {
        out.extend_from_slice(&full[market_end..]);
    }
    out
}

pub fn feature_vector(record: &SentimentRecord, columns: &ExportColumns) -> Vec<f64> {
    select(&full_feature_vector(record), columns)
}

pub fn feature_names(columns: &ExportColumns) -> Vec<&'static str> {
    select(&FEATURE_NAMES, columns)
}

pub fn labels(record: &SentimentRecord) -> SampleLabels {
    let sentiment_direction = if record.overall > DIRECTION_DEADBAND {
        1
    } else if record.overall < -DIRECTION_DEADBAND {
        -1
    } else {
        0
    };

    SampleLabels {
        sentiment_direction,
        sentiment_strength: record.overall.abs(),
        market_phase: record.market_context.market_phase,
        high_confidence: u8::from(record.confidence > HIGH_CONFIDENCE),
    }
}

pub fn build_dataset(series: &[SentimentRecord], ctx: &ExportContext) -> MlDataset {
    let data: Vec<MlSample> = series
        .iter()
        .map(|record| MlSample {
            features: feature_vector(record, &ctx.columns),
            labels: labels(record),
            timestamp: record.timestamp,
            raw_overall_score: record.overall,
        })
        .collect();

    let feature_names = feature_names(&ctx.columns);

    MlDataset {
        dataset_info: DatasetInfo {
            name: format!("{}_sentiment_dataset", ctx.coin_name),
            coin_id: ctx.coin_id.clone(),
            time_range: ctx.time_range.as_str(),
            samples: data.len(),
            feature_count: feature_names.len(),
            created_at: iso_timestamp(&ctx.exported_at),
            description: "Cryptocurrency sentiment analysis dataset ready for ML training",
        },
        feature_names,
        label_descriptions: LabelDescriptions::default(),
        data,
    }
}

pub fn to_ml_ready_json(series: &[SentimentRecord], ctx: &ExportContext) -> Result<Vec<u8>, ExportError> {
    Ok(serde_json::to_vec_pretty(&build_dataset(series, ctx))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sentiment::{SentimentGenerator, SeriesRequest, TimeRange};
    use chrono::TimeZone;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn series(seed: u64) -> Vec<SentimentRecord> {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let mut rng = StdRng::seed_from_u64(seed);
        SentimentGenerator::default().generate(&SeriesRequest::new("ethereum", TimeRange::Week1), now, &mut rng)
    }

    #[test]
    fn test_feature_vector_shape_and_encoding() {
        for record in series(12) {
            let features = feature_vector(&record, &ExportColumns::default());
            assert_eq!(features.len(), FEATURE_COUNT);

            let encoded = features[16];
            assert!([-1.0, 0.0, 1.0].contains(&encoded));
            assert_eq!(encoded, record.market_context.market_phase.encoded());
            assert_eq!(features[4], record.social_mentions as f64 / 1_000.0);
            assert_eq!(features[8], record.trading_volume_24h as f64 / 1_000_000.0);
        }
    }

    #[test]
    fn test_feature_names_align_with_vector() {
        assert_eq!(FEATURE_NAMES.len(), FEATURE_COUNT);
        assert_eq!(FEATURE_NAMES[16], "market_phase_encoded");
        assert_eq!(FEATURE_NAMES[23], "trading_signals_sentiment");
    }

    #[test]
    fn test_labels() {
        for record in series(13) {
            let l = labels(&record);
            let expected_direction = if record.overall > 5.0 {
                1
            } else if record.overall < -5.0 {
                -1
            } else {
                0
            };
            assert_eq!(l.sentiment_direction, expected_direction);
            assert_eq!(l.sentiment_strength, record.overall.abs());
            assert_eq!(l.market_phase, record.market_context.market_phase);
            assert_eq!(l.high_confidence == 1, record.confidence > 0.8);
        }
    }

    #[test]
    fn test_dataset_envelope() {
        let s = series(14);
        let ctx = ExportContext {
            coin_id: "ethereum".to_string(),
            coin_name: "Ethereum".to_string(),
            time_range: TimeRange::Week1,
            current_price: None,
            exported_at: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
            columns: ExportColumns::default(),
        };

        let value: serde_json::Value = serde_json::from_slice(&to_ml_ready_json(&s, &ctx).unwrap()).unwrap();

        assert_eq!(value["dataset_info"]["name"], "Ethereum_sentiment_dataset");
        assert_eq!(value["dataset_info"]["samples"], 168);
        assert_eq!(value["dataset_info"]["feature_count"], 24);
        assert_eq!(value["feature_names"].as_array().unwrap().len(), 24);
        assert!(value["label_descriptions"]["sentiment_direction"].is_string());

        let data = value["data"].as_array().unwrap();
        assert_eq!(data.len(), 168);
        assert_eq!(data[0]["features"].as_array().unwrap().len(), 24);
        assert!(data[0]["labels"]["market_phase"].is_string());
    }

    #[test]
    fn test_excluded_groups_shrink_vector_and_names() {
        let columns = ExportColumns {
            technical: false,
            market: true,
            sources: false,
            metadata: false,
        };
        let names = feature_names(&columns);
        assert_eq!(names.len(), 15);
        assert_eq!(names[10], "volatility_index");
        assert_eq!(names[11], "btc_dominance");
        assert_eq!(names[12], "market_phase_encoded");

        for record in series(15) {
            let features = feature_vector(&record, &columns);
            assert_eq!(features.len(), names.len());
            assert_eq!(features[12], record.market_context.market_phase.encoded());
        }

        let sources_only = ExportColumns {
            technical: false,
            market: false,
            ..Default::default()
        };
        assert_eq!(feature_names(&sources_only)[11], "twitter_sentiment");
        assert_eq!(feature_names(&sources_only).len(), 16);
    }

    #[test]
    fn test_dataset_feature_count_follows_selection() {
        let ctx = ExportContext {
            coin_id: "ethereum".to_string(),
            coin_name: "Ethereum".to_string(),
            time_range: TimeRange::Week1,
            current_price: None,
            exported_at: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
            columns: ExportColumns {
                sources: false,
                ..Default::default()
            },
        };
        let dataset = build_dataset(&series(16), &ctx);

        assert_eq!(dataset.dataset_info.feature_count, 19);
        assert_eq!(dataset.feature_names.len(), 19);
        assert!(dataset.data.iter().all(|sample| sample.features.len() == 19));
    }
}
