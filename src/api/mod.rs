//! HTTP API
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/health` | Liveness probe |
//! | `GET` | `/api/coins` | Supported coins |
//! | `GET` | `/api/coin/{id}` | Live market data (CoinGecko proxy) |
//! | `GET` | `/api/sentiment/{id}` | Synthetic sentiment series |
//! | `GET` | `/api/sentiment/{id}/current` | Newest sample of a 1h series |
//! | `GET` | `/api/sentiment/{id}/sources` | Per-source split of a series |
//! | `GET` | `/api/export/{id}` | Series as csv / json / ml-ready download |
//! | `GET` | `/api/alerts` | List alerts (optional `coin_id` filter) |
//! | `POST` | `/api/alerts` | Create alert |
//! | `GET` | `/api/alerts/{id}` | One alert |
//! | `PUT` | `/api/alerts/{id}` | Partial update |
//! | `DELETE` | `/api/alerts/{id}` | Delete alert |
//! | `GET` | `/api/alerts/check/{coin_id}` | Alerts crossed by the latest samples |
//!
//! Anything else is served from the static SPA directory, falling back to
//! `index.html` so client-side routes resolve.

pub mod alerts;
pub mod market;
pub mod sentiment;

use crate::alerts::{AlertCooldown, AlertRepository};
use crate::market::MarketDataProvider;
use crate::sentiment::SentimentGenerator;
use axum::extract::Request;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::get;
use axum::{Json, Router};
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Instant;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub generator: SentimentGenerator,
    pub market: Arc<dyn MarketDataProvider>,
    pub alerts: Arc<dyn AlertRepository>,
    pub cooldown: Arc<Mutex<AlertCooldown>>,
}

impl AppState {
    pub fn new(
        generator: SentimentGenerator,
        market: Arc<dyn MarketDataProvider>,
        alerts: Arc<dyn AlertRepository>,
    ) -> Self {
        Self {
            generator,
            market,
            alerts,
            cooldown: Arc::new(Mutex::new(AlertCooldown::default())),
        }
    }
}

/// Liveness probe
async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "alive",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// One log line per request: method, path, status, latency
async fn log_requests(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let uri = req.uri().clone();
    let started = Instant::now();

    let response = next.run(req).await;

    log::info!(
        "{} {} → {} ({}ms)",
        method,
        uri,
        response.status().as_u16(),
        started.elapsed().as_millis()
    );
    response
}

/// API routes only, without static file serving
pub fn api_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/coins", get(market::list_coins))
        .route("/api/coin/{coin_id}", get(market::get_coin))
        .route("/api/sentiment/{coin_id}", get(sentiment::get_sentiment))
        .route("/api/sentiment/{coin_id}/current", get(sentiment::get_current_sentiment))
        .route("/api/sentiment/{coin_id}/sources", get(sentiment::get_sentiment_sources))
        .route("/api/export/{coin_id}", get(sentiment::export_sentiment))
        .route("/api/alerts", get(alerts::list_alerts).post(alerts::create_alert))
        .route(
            "/api/alerts/{id}",
            get(alerts::get_alert).put(alerts::update_alert).delete(alerts::delete_alert),
        )
        .route("/api/alerts/check/{coin_id}", get(alerts::check_alerts))
        .with_state(state)
}

/// Full application: API routes, SPA fallback, CORS and request logging
pub fn router(state: AppState, static_dir: &str) -> Router {
    let index = Path::new(static_dir).join("index.html");
    let spa = ServeDir::new(static_dir).fallback(ServeFile::new(index));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    api_router(state)
        .fallback_service(spa)
        .layer(middleware::from_fn(log_requests))
        .layer(cors)
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_health() {
        let app = api_router(state(StubMarket::Found));

        let req = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let resp = app.oneshot(req).await.unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await["status"], "alive");
    }

    #[tokio::test]
    async fn test_unknown_path_serves_spa_index() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<html>sentflow</html>").unwrap();
        let app = router(state(StubMarket::Found), dir.path().to_str().unwrap());

        let req = Request::builder().uri("/dashboard/bitcoin").body(Body::empty()).unwrap();
        let resp = app.oneshot(req).await.unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"<html>sentflow</html>");
    }
}
