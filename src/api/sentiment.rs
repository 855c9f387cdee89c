//! Sentiment series and export handlers

use super::AppState;
use crate::error::AppError;
use crate::export::{self, ExportColumns, ExportContext, ExportFormat};
use crate::market::find_coin;
use crate::sentiment::summary::{latest_record, source_breakdown, SourceBreakdown};
use crate::sentiment::{SentimentGenerator, SentimentRecord, SeriesRequest, TimeRange};
use axum::extract::{Path, Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, SubsecRound, Utc};
use serde::Deserialize;

/// Query string shared by the series endpoints
///
/// Numbers arrive as raw strings: anything unparseable counts as absent.
#[derive(Debug, Default, Deserialize)]
pub struct SeriesQuery {
    #[serde(rename = "timeRange")]
    pub time_range: Option<String>,
    #[serde(rename = "currentPrice")]
    pub current_price: Option<String>,
    #[serde(rename = "priceChange24h")]
    pub price_change_24h: Option<String>,
    pub format: Option<String>,
    #[serde(rename = "includeTechnicalIndicators")]
    pub include_technical: Option<String>,
    #[serde(rename = "includeMarketContext")]
    pub include_market: Option<String>,
    #[serde(rename = "includeSources")]
    pub include_sources: Option<String>,
    #[serde(rename = "includeMetadata")]
    pub include_metadata: Option<String>,
}

fn parse_number(raw: Option<&str>) -> Option<f64> {
    raw.and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

/// Groups stay included unless explicitly switched off
fn parse_flag(raw: Option<&str>) -> bool {
    !matches!(
        raw.map(|s| s.trim().to_ascii_lowercase()).as_deref(),
        Some("false" | "0" | "no")
    )
}

impl SeriesQuery {
    pub fn time_range(&self) -> TimeRange {
        self.time_range
            .as_deref()
            .map(TimeRange::resolve)
            .unwrap_or_default()
    }

    pub fn to_request(&self, coin_id: &str) -> SeriesRequest {
        SeriesRequest::new(coin_id, self.time_range())
            .with_current_price(parse_number(self.current_price.as_deref()))
            .with_price_change(parse_number(self.price_change_24h.as_deref()))
    }

    pub fn columns(&self) -> ExportColumns {
        ExportColumns {
            technical: parse_flag(self.include_technical.as_deref()),
            market: parse_flag(self.include_market.as_deref()),
            sources: parse_flag(self.include_sources.as_deref()),
            metadata: parse_flag(self.include_metadata.as_deref()),
        }
    }
}

/// Current instant at the millisecond precision the wire format carries
pub(crate) fn now_millis() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

/// Generate with the thread-local RNG; kept synchronous so the RNG never
/// lives across an await point
pub(crate) fn generate_series(
    generator: &SentimentGenerator,
    request: &SeriesRequest,
    now: DateTime<Utc>,
) -> Vec<SentimentRecord> {
    let mut rng = rand::thread_rng();
    generator.generate(request, now, &mut rng)
}

/// `GET /api/sentiment/{coin_id}`
pub async fn get_sentiment(
    State(state): State<AppState>,
    Path(coin_id): Path<String>,
    Query(query): Query<SeriesQuery>,
) -> Json<Vec<SentimentRecord>> {
    let request = query.to_request(&coin_id);
    Json(generate_series(&state.generator, &request, now_millis()))
}

/// `GET /api/sentiment/{coin_id}/current` — newest sample of a 1h series
pub async fn get_current_sentiment(
    State(state): State<AppState>,
    Path(coin_id): Path<String>,
) -> Result<Json<SentimentRecord>, AppError> {
    let request = SeriesRequest::new(coin_id, TimeRange::Hour1);
    let series = generate_series(&state.generator, &request, now_millis());

    latest_record(&series)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::Internal("empty sentiment series".to_string()))
}

/// `GET /api/sentiment/{coin_id}/sources`
pub async fn get_sentiment_sources(
    State(state): State<AppState>,
    Path(coin_id): Path<String>,
    Query(query): Query<SeriesQuery>,
) -> Json<Vec<SourceBreakdown>> {
    let request = query.to_request(&coin_id);
    let series = generate_series(&state.generator, &request, now_millis());
    Json(source_breakdown(&series))
}

/// `GET /api/export/{coin_id}` — file download
///
/// Unknown coin → 404, unsupported `format` → 400. `format` defaults to
/// `ml-ready`.
pub async fn export_sentiment(
    State(state): State<AppState>,
    Path(coin_id): Path<String>,
    Query(query): Query<SeriesQuery>,
) -> Result<Response, AppError> {
    let coin = find_coin(&coin_id).ok_or_else(|| AppError::NotFound("Coin not found".to_string()))?;

    let format = match query.format.as_deref() {
        None => ExportFormat::default(),
        Some(raw) => ExportFormat::from_str(raw)
            .ok_or_else(|| AppError::BadRequest(format!("Unsupported export format: {}", raw)))?,
    };

    let request = query.to_request(coin.id);
    let now = now_millis();
    let series = generate_series(&state.generator, &request, now);

    let ctx = ExportContext {
        coin_id: coin.id.to_string(),
        coin_name: coin.name.to_string(),
        time_range: request.time_range,
        current_price: request.current_price,
        exported_at: now,
        columns: query.columns(),
    };
    let file = export::render(format, &series, &ctx)?;

    log::info!(
        "📦 Exported {} {} samples for {} as {}",
        series.len(),
        ctx.time_range.as_str(),
        coin.id,
        format.as_str()
    );

    let headers = [
        (header::CONTENT_TYPE, file.content_type.to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", file.filename),
        ),
    ];
    Ok((headers, file.body).into_response())
}

#[cfg(test)]
mod tests {
    use super::super::api_router;
    use super::super::test_support::*;
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    async fn get(uri: &str) -> Response {
        let app = api_router(state(StubMarket::Found));
        let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
        app.oneshot(req).await.unwrap()
    }

    #[test]
    fn test_query_parsing_is_lenient() {
        let query = SeriesQuery {
            time_range: Some("6h".to_string()),
            current_price: Some("abc".to_string()),
            price_change_24h: Some(" -4.5 ".to_string()),
            ..Default::default()
        };
        let request = query.to_request("solana");

        assert_eq!(request.time_range, TimeRange::Hour6);
        assert_eq!(request.current_price, None);
        assert_eq!(request.price_change_24h, Some(-4.5));
        assert_eq!(SeriesQuery::default().time_range(), TimeRange::Day1);
    }

    #[test]
    fn test_column_flags_default_to_included() {
        assert!(SeriesQuery::default().columns().is_complete());

        let query = SeriesQuery {
            include_technical: Some("false".to_string()),
            include_market: Some("0".to_string()),
            include_sources: Some("No".to_string()),
            include_metadata: Some("true".to_string()),
            ..Default::default()
        };
        let columns = query.columns();
        assert!(!columns.technical && !columns.market && !columns.sources);
        assert!(columns.metadata);
    }

    #[tokio::test]
    async fn test_sentiment_series_1h() {
        let resp = get("/api/sentiment/bitcoin?timeRange=1h").await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body = body_json(resp).await;
        let records = body.as_array().unwrap();
        assert_eq!(records.len(), 60);

        for r in records {
            let positive = r["positive"].as_f64().unwrap();
            let negative = r["negative"].as_f64().unwrap();
            let overall = r["overall"].as_f64().unwrap();
            assert!((15.0..=75.0).contains(&positive));
            assert!((10.0..=60.0).contains(&negative));
            assert!(r["neutral"].as_f64().unwrap() >= 0.0);
            assert_eq!(overall, positive - negative);
            assert!(r["timestamp"].is_string());
            assert!(r["technical_indicators"]["volume_sma_ratio"].is_number());
            assert!(r["market_context"]["sector_sentiment"].is_number());
            assert!(r["sources"]["telegram"].is_number());
        }
    }

    #[tokio::test]
    async fn test_unknown_time_range_defaults_to_day() {
        let body = body_json(get("/api/sentiment/dogecoin?timeRange=5y").await).await;
        assert_eq!(body.as_array().unwrap().len(), 24);
    }

    #[tokio::test]
    async fn test_current_sentiment() {
        let resp = get("/api/sentiment/ethereum/current").await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body = body_json(resp).await;
        assert!(body["overall"].is_number());
        assert!(body["market_context"]["market_phase"].is_string());
    }

    #[tokio::test]
    async fn test_sources_breakdown() {
        let body = body_json(get("/api/sentiment/solana/sources?timeRange=6h").await).await;
        let items = body.as_array().unwrap();

        assert_eq!(items.len(), 72);
        assert!(items[0]["timestamp"].is_string());
        assert!(items[0]["sources"]["twitter"].is_number());
    }

    #[tokio::test]
    async fn test_export_ml_ready() {
        let resp = get("/api/export/ethereum?format=ml-ready&timeRange=1d").await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()[header::CONTENT_TYPE], "application/json");

        let body = body_json(resp).await;
        let data = body["data"].as_array().unwrap();
        assert_eq!(data.len(), 24);
        for sample in data {
            assert_eq!(sample["features"].as_array().unwrap().len(), 24);
            let direction = sample["labels"]["sentiment_direction"].as_i64().unwrap();
            assert!([-1, 0, 1].contains(&direction));
        }
    }

    #[tokio::test]
    async fn test_export_csv_download() {
        let resp = get("/api/export/bitcoin?format=csv&timeRange=1h&currentPrice=64000").await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()[header::CONTENT_TYPE], "text/csv");

        let disposition = resp.headers()[header::CONTENT_DISPOSITION].to_str().unwrap().to_string();
        assert!(disposition.starts_with("attachment; filename=\"bitcoin_sentiment_1h_"));
        assert!(disposition.ends_with(".csv\""));

        let body = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let text = String::from_utf8(body.to_vec()).unwrap();
        assert_eq!(text.lines().count(), 61);
        assert!(text.lines().all(|line| line.split(',').count() == 31));
    }

    #[tokio::test]
    async fn test_export_json_metadata() {
        let body = body_json(get("/api/export/cardano?format=json&currentPrice=0.45").await).await;

        assert_eq!(body["metadata"]["coin_name"], "Cardano");
        assert_eq!(body["metadata"]["time_range"], "1d");
        assert_eq!(body["metadata"]["current_price"], 0.45);
        assert_eq!(body["metadata"]["data_points"], 24);
        assert_eq!(body["sentiment_data"].as_array().unwrap().len(), 24);
    }

    #[tokio::test]
    async fn test_export_csv_without_sources_and_metadata() {
        let resp = get("/api/export/solana?format=csv&timeRange=1h&includeSources=false&includeMetadata=false").await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let text = String::from_utf8(body.to_vec()).unwrap();
        let header = text.lines().next().unwrap();
        assert!(header.ends_with("btc_dominance,market_phase,correlation_with_btc,sector_sentiment"));
        assert!(text.lines().all(|line| line.split(',').count() == 22));
    }

    #[tokio::test]
    async fn test_export_ml_ready_filename() {
        let resp = get("/api/export/bitcoin").await;
        let disposition = resp.headers()[header::CONTENT_DISPOSITION].to_str().unwrap().to_string();
        assert!(disposition.ends_with("_ml_ready.json\""));
    }

    #[tokio::test]
    async fn test_export_unknown_format() {
        let resp = get("/api/export/bitcoin?format=xlsx").await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(resp).await["error"], "Unsupported export format: xlsx");
    }

    #[tokio::test]
    async fn test_export_unknown_coin() {
        let resp = get("/api/export/dogecoin?format=csv").await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
