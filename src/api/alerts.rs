//! Alert CRUD and threshold checks

use super::sentiment::{generate_series, now_millis};
use super::AppState;
use crate::alerts::types::validate_threshold;
use crate::alerts::{Alert, AlertUpdate, NewAlert, TriggeredAlert};
use crate::error::AppError;
use crate::sentiment::summary::latest_pair;
use crate::sentiment::{SeriesRequest, TimeRange};
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct AlertFilter {
    pub coin_id: Option<String>,
}

fn body_or_400<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    body.map(|Json(value)| value)
        .map_err(|rejection| AppError::BadRequest(rejection.body_text()))
}

fn id_or_400(path: Result<Path<i64>, PathRejection>) -> Result<i64, AppError> {
    path.map(|Path(id)| id)
        .map_err(|rejection| AppError::BadRequest(rejection.body_text()))
}

/// `GET /api/alerts`
pub async fn list_alerts(
    State(state): State<AppState>,
    Query(filter): Query<AlertFilter>,
) -> Result<Json<Vec<Alert>>, AppError> {
    let alerts = state.alerts.list(filter.coin_id.as_deref()).await?;
    Ok(Json(alerts))
}

/// `POST /api/alerts` → 201 with the stored alert
pub async fn create_alert(
    State(state): State<AppState>,
    body: Result<Json<NewAlert>, JsonRejection>,
) -> Result<(StatusCode, Json<Alert>), AppError> {
    let new_alert = body_or_400(body)?;
    validate_threshold(new_alert.threshold).map_err(AppError::BadRequest)?;

    let alert = state.alerts.create(new_alert).await?;
    log::info!(
        "➕ Alert {} created: {} {} {} {}",
        alert.id,
        alert.coin_id,
        alert.alert_type.as_str(),
        alert.condition.as_str(),
        alert.threshold
    );
    Ok((StatusCode::CREATED, Json(alert)))
}

/// `GET /api/alerts/{id}`
pub async fn get_alert(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<Alert>, AppError> {
    let id = id_or_400(path)?;
    match state.alerts.get(id).await? {
        Some(alert) => Ok(Json(alert)),
        None => Err(AppError::NotFound("Alert not found".to_string())),
    }
}

/// `PUT /api/alerts/{id}` — partial update
pub async fn update_alert(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
    body: Result<Json<AlertUpdate>, JsonRejection>,
) -> Result<Json<Alert>, AppError> {
    let id = id_or_400(path)?;
    let update = body_or_400(body)?;
    if let Some(threshold) = update.threshold {
        validate_threshold(threshold).map_err(AppError::BadRequest)?;
    }

    match state.alerts.update(id, update).await? {
        Some(alert) => Ok(Json(alert)),
        None => Err(AppError::NotFound("Alert not found".to_string())),
    }
}

/// `DELETE /api/alerts/{id}` → 204
pub async fn delete_alert(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, AppError> {
    let id = id_or_400(path)?;
    if state.alerts.delete(id).await? {
        log::info!("➖ Alert {} deleted", id);
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound("Alert not found".to_string()))
    }
}

/// `GET /api/alerts/check/{coin_id}`
///
/// Generates a fresh 1h series and reports enabled alerts whose threshold
/// lies between the last two samples. Alerts that fired within the cooldown
/// window are left out.
pub async fn check_alerts(
    State(state): State<AppState>,
    Path(coin_id): Path<String>,
) -> Result<Json<Vec<TriggeredAlert>>, AppError> {
    let alerts = state.alerts.list(Some(&coin_id)).await?;
    if alerts.is_empty() {
        return Ok(Json(Vec::new()));
    }

    let now = now_millis();
    let request = SeriesRequest::new(coin_id.as_str(), TimeRange::Hour1);
    let series = generate_series(&state.generator, &request, now);
    let (previous, current) = latest_pair(&series)
        .ok_or_else(|| AppError::Internal("sentiment series too short".to_string()))?;

    let mut cooldown = state
        .cooldown
        .lock()
        .map_err(|_| AppError::Internal("alert cooldown lock poisoned".to_string()))?;
    Ok(Json(cooldown.evaluate(&alerts, previous, current, now)))
}
