//! Dataset export
//!
//! Turns a generated series into a downloadable file. Three formats:
//! - `csv` - flat 31-column table
//! - `json` - series wrapped with export metadata
//! - `ml-ready` - numeric feature vectors plus supervised labels
//!
//! All formatters are pure: the export instant comes in through
//! `ExportContext`, so identical input yields identical bytes.

pub mod csv;
pub mod json;
pub mod ml;

use crate::sentiment::{SentimentRecord, TimeRange};
use chrono::{DateTime, SecondsFormat, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
    MlReady,
}

impl Default for ExportFormat {
    fn default() -> Self {
        ExportFormat::MlReady
    }
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
            ExportFormat::MlReady => "ml-ready",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "csv" => Some(ExportFormat::Csv),
            "json" => Some(ExportFormat::Json),
            "ml-ready" => Some(ExportFormat::MlReady),
            _ => None,
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv",
            ExportFormat::Json | ExportFormat::MlReady => "application/json",
        }
    }
}

/// Optional column groups. Core sentiment values are always exported.
///
/// - `technical` - rsi, macd, bollinger position, volume/SMA ratio
/// - `market` - btc dominance, market phase, btc correlation, sector sentiment
/// - `sources` - per-source sentiment
/// - `metadata` - coin/range/export stamp (CSV columns, JSON `metadata` block)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportColumns {
    pub technical: bool,
    pub market: bool,
    pub sources: bool,
    pub metadata: bool,
}

impl Default for ExportColumns {
    fn default() -> Self {
        Self {
            technical: true,
            market: true,
            sources: true,
            metadata: true,
        }
    }
}

impl ExportColumns {
    pub fn is_complete(&self) -> bool {
        *self == Self::default()
    }
}

/// Metadata stamped onto every export
#[derive(Debug, Clone, PartialEq)]
pub struct ExportContext {
    pub coin_id: String,
    pub coin_name: String,
    pub time_range: TimeRange,
    pub current_price: Option<f64>,
    pub exported_at: DateTime<Utc>,
    pub columns: ExportColumns,
}

impl ExportContext {
    /// Download filename, e.g. `bitcoin_sentiment_1d_2024-03-01.csv`
    pub fn filename(&self, format: ExportFormat) -> String {
        let base = format!(
            "{}_sentiment_{}_{}",
            self.coin_id,
            self.time_range.as_str(),
            self.exported_at.format("%Y-%m-%d")
        );
        match format {
            ExportFormat::Csv => format!("{}.csv", base),
            ExportFormat::Json => format!("{}.json", base),
            ExportFormat::MlReady => format!("{}_ml_ready.json", base),
        }
    }
}

/// Rendered export ready to send
#[derive(Debug, Clone)]
pub struct ExportFile {
    pub filename: String,
    pub content_type: &'static str,
    pub body: Vec<u8>,
}

#[derive(Debug)]
pub enum ExportError {
    Io(std::io::Error),
    Csv(::csv::Error),
    Serialization(serde_json::Error),
}

impl From<std::io::Error> for ExportError {
    fn from(err: std::io::Error) -> Self {
        ExportError::Io(err)
    }
}

impl From<::csv::Error> for ExportError {
    fn from(err: ::csv::Error) -> Self {
        ExportError::Csv(err)
    }
}

impl From<serde_json::Error> for ExportError {
    fn from(err: serde_json::Error) -> Self {
        ExportError::Serialization(err)
    }
}

impl std::fmt::Display for ExportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportError::Io(e) => write!(f, "IO error: {}", e),
            ExportError::Csv(e) => write!(f, "CSV error: {}", e),
            ExportError::Serialization(e) => write!(f, "Serialization error: {}", e),
        }
    }
}

impl std::error::Error for ExportError {}

/// Render a series in the requested format
pub fn render(
    format: ExportFormat,
    series: &[SentimentRecord],
    ctx: &ExportContext,
) -> Result<ExportFile, ExportError> {
    let body = match format {
        ExportFormat::Csv => csv::to_csv(series, ctx)?,
        ExportFormat::Json => json::to_annotated_json(series, ctx)?,
        ExportFormat::MlReady => ml::to_ml_ready_json(series, ctx)?,
    };

    Ok(ExportFile {
        filename: ctx.filename(format),
        content_type: format.content_type(),
        body,
    })
}

/// ISO-8601 with millisecond precision, `Z` suffix
pub(crate) fn iso_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ctx() -> ExportContext {
        ExportContext {
            coin_id: "bitcoin".to_string(),
            coin_name: "Bitcoin".to_string(),
            time_range: TimeRange::Day1,
            current_price: Some(64000.0),
            exported_at: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
            columns: ExportColumns::default(),
        }
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!(ExportFormat::from_str("csv"), Some(ExportFormat::Csv));
        assert_eq!(ExportFormat::from_str("json"), Some(ExportFormat::Json));
        assert_eq!(ExportFormat::from_str("ml-ready"), Some(ExportFormat::MlReady));
        assert_eq!(ExportFormat::from_str("xlsx"), None);
        assert_eq!(ExportFormat::default(), ExportFormat::MlReady);
    }

    #[test]
    fn test_filenames() {
        let ctx = ctx();
        assert_eq!(ctx.filename(ExportFormat::Csv), "bitcoin_sentiment_1d_2024-03-01.csv");
        assert_eq!(ctx.filename(ExportFormat::Json), "bitcoin_sentiment_1d_2024-03-01.json");
        assert_eq!(
            ctx.filename(ExportFormat::MlReady),
            "bitcoin_sentiment_1d_2024-03-01_ml_ready.json"
        );
    }

    #[test]
    fn test_iso_timestamp_millis() {
        assert_eq!(iso_timestamp(&ctx().exported_at), "2024-03-01T12:00:00.000Z");
    }

    #[test]
    fn test_render_empty_series() {
        let file = render(ExportFormat::Csv, &[], &ctx()).unwrap();
        assert_eq!(file.content_type, "text/csv");
        assert_eq!(String::from_utf8(file.body).unwrap().lines().count(), 1);
    }

    #[test]
    fn test_every_group_included_by_default() {
        let columns = ExportColumns::default();
        assert!(columns.technical && columns.market && columns.sources && columns.metadata);
        assert!(columns.is_complete());
        assert!(!ExportColumns { metadata: false, ..columns }.is_complete());
    }
}
