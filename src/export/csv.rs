//! Flat CSV export (one row per sample, 31 columns with every group included)

use super::{iso_timestamp, ExportColumns, ExportContext, ExportError};
use crate::sentiment::SentimentRecord;

const CORE_HEADERS: [&str; 14] = [
    "timestamp",
    "positive_sentiment",
    "negative_sentiment",
    "neutral_sentiment",
    "overall_score",
    "confidence",
    "volume_correlation",
    "social_mentions",
    "news_sentiment",
    "fear_greed_index",
    "market_cap_influence",
    "trading_volume_24h",
    "price_momentum",
    "volatility_index",
];

const TECHNICAL_HEADERS: [&str; 4] = ["rsi", "macd", "bollinger_position", "volume_sma_ratio"];

const MARKET_HEADERS: [&str; 4] = ["btc_dominance", "market_phase", "correlation_with_btc", "sector_sentiment"];

const SOURCE_HEADERS: [&str; 5] = [
    "twitter_sentiment",
    "reddit_sentiment",
    "telegram_sentiment",
    "news_source_sentiment",
    "trading_signals_sentiment",
];

const METADATA_HEADERS: [&str; 4] = ["coin_id", "coin_name", "time_range", "export_timestamp"];

/// Width of a row with every column group included
pub const FULL_WIDTH: usize = 31;

/// Header row for the selected column groups, in export order
pub fn headers(columns: &ExportColumns) -> Vec<&'static str> {
    let mut headers = CORE_HEADERS.to_vec();
    if columns.technical {
        headers.extend(TECHNICAL_HEADERS);
    }
    if columns.market {
        headers.extend(MARKET_HEADERS);
    }
    if columns.sources {
        headers.extend(SOURCE_HEADERS);
    }
    if columns.metadata {
        headers.extend(METADATA_HEADERS);
    }
    headers
}

fn to_row(record: &SentimentRecord, ctx: &ExportContext, exported_at: &str) -> Vec<String> {
    let columns = &ctx.columns;
    let mut row = vec![
        iso_timestamp(&record.timestamp),
        record.positive.to_string(),
        record.negative.to_string(),
        record.neutral.to_string(),
        record.overall.to_string(),
        record.confidence.to_string(),
        record.volume_correlation.to_string(),
        record.social_mentions.to_string(),
        record.news_sentiment.to_string(),
        record.fear_greed_index.to_string(),
        record.market_cap_influence.to_string(),
        record.trading_volume_24h.to_string(),
        record.price_momentum.to_string(),
        record.volatility_index.to_string(),
    ];

    if columns.technical {
        let ti = &record.technical_indicators;
        row.extend([
            ti.rsi.to_string(),
            ti.macd.to_string(),
            ti.bollinger_position.to_string(),
            ti.volume_sma_ratio.to_string(),
        ]);
    }
    if columns.market {
        let mc = &record.market_context;
        row.extend([
            mc.btc_dominance.to_string(),
            mc.market_phase.as_str().to_string(),
            mc.correlation_with_btc.to_string(),
            mc.sector_sentiment.to_string(),
        ]);
    }
    if columns.sources {
        let src = &record.sources;
        row.extend([
            src.twitter.to_string(),
            src.reddit.to_string(),
            src.telegram.to_string(),
            src.news.to_string(),
            src.trading_signals.to_string(),
        ]);
    }
    if columns.metadata {
        row.extend([
            ctx.coin_id.clone(),
            ctx.coin_name.clone(),
            ctx.time_range.as_str().to_string(),
            exported_at.to_string(),
        ]);
    }
    row
}

/// Render the series as CSV bytes (header + one row per record)
pub fn to_csv(series: &[SentimentRecord], ctx: &ExportContext) -> Result<Vec<u8>, ExportError> {
    let mut writer = ::csv::Writer::from_writer(Vec::new());
    let exported_at = iso_timestamp(&ctx.exported_at);

    writer.write_record(headers(&ctx.columns))?;
    for record in series {
        writer.write_record(to_row(record, ctx, &exported_at))?;
    }

    writer.flush()?;
    writer.into_inner().map_err(|e| ExportError::Io(e.into_error()))
}
