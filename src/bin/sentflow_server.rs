//! Sentiment dashboard server
//!
//! Usage:
//!   cargo run --release --bin sentflow_server
//!
//! Environment variables:
//!   SENTFLOW_HOST / SENTFLOW_PORT - bind address (default: 0.0.0.0:5000)
//!   SENTFLOW_DB_PATH - SQLite alert database (default: sentiment.db)
//!   SENTFLOW_STATIC_DIR - built SPA directory (default: static)
//!   COINGECKO_BASE_URL - market data API (default: https://api.coingecko.com/api/v3)
//!   MARKET_TIMEOUT_SECS - outbound request timeout (default: 10)
//!   SENTIMENT_SERIES_ORDER - oldest_first | newest_first (default: oldest_first)

use dotenv::dotenv;
use log::info;
use sentflow::alerts::{AlertRepository, SqliteAlertRepository};
use sentflow::api::{router, AppState};
use sentflow::config::ServerConfig;
use sentflow::market::{CoinGeckoClient, MarketDataProvider};
use sentflow::sentiment::SentimentGenerator;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("🚀 Sentflow server v{}", env!("CARGO_PKG_VERSION"));

    let config = ServerConfig::from_env();
    info!("   ├─ Bind: {}", config.bind_addr());
    info!("   ├─ Database: {}", config.db_path);
    info!("   ├─ Static dir: {}", config.static_dir);
    info!("   └─ CoinGecko: {} (timeout {}s)", config.coingecko_base_url, config.market_timeout_secs);

    info!("🔧 Initializing alert database...");
    let alerts: Arc<dyn AlertRepository> = Arc::new(SqliteAlertRepository::open(&config.db_path)?);
    info!("✅ Alert database ready");

    let market: Arc<dyn MarketDataProvider> = Arc::new(CoinGeckoClient::new(
        &config.coingecko_base_url,
        config.market_timeout_secs,
    )?);

    let generator = SentimentGenerator::new(config.series_order);
    info!("📈 Sentiment series order: {}", generator.order().as_str());

    let state = AppState::new(generator, market, alerts);
    let app = router(state, &config.static_dir);

    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    info!("✅ Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("👋 Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("❌ Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("🛑 Shutdown signal received");
}
