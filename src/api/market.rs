//! Coin list and market data proxy handlers

use super::AppState;
use crate::error::AppError;
use crate::market::{CoinInfo, CoinMarket, POPULAR_COINS};
use axum::extract::{Path, State};
use axum::Json;

/// `GET /api/coins`
pub async fn list_coins() -> Json<&'static [CoinInfo]> {
    Json(&POPULAR_COINS[..])
}

/// `GET /api/coin/{coin_id}` — live market data from the provider
pub async fn get_coin(
    State(state): State<AppState>,
    Path(coin_id): Path<String>,
) -> Result<Json<CoinMarket>, AppError> {
    match state.market.fetch_coin(&coin_id).await? {
        Some(market) => Ok(Json(market)),
        None => Err(AppError::NotFound("Coin not found".to_string())),
    }
}
