//! Request-level error taxonomy and its HTTP mapping

use crate::alerts::AlertStoreError;
use crate::export::ExportError;
use crate::market::MarketError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

#[derive(Debug)]
pub enum AppError {
    /// Market data provider answered with a non-success status
    Upstream(String),
    /// Outbound request failed before a usable response arrived
    Http(reqwest::Error),
    NotFound(String),
    BadRequest(String),
    Store(AlertStoreError),
    Export(ExportError),
    Internal(String),
}

impl From<MarketError> for AppError {
    fn from(err: MarketError) -> Self {
        match err {
            MarketError::Http(e) => AppError::Http(e),
            MarketError::Upstream(msg) => AppError::Upstream(msg),
        }
    }
}

impl From<AlertStoreError> for AppError {
    fn from(err: AlertStoreError) -> Self {
        AppError::Store(err)
    }
}

impl From<ExportError> for AppError {
    fn from(err: ExportError) -> Self {
        AppError::Export(err)
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::Upstream(msg) => write!(f, "{}", msg),
            AppError::Http(e) => write!(f, "{}", e),
            AppError::NotFound(msg) => write!(f, "{}", msg),
            AppError::BadRequest(msg) => write!(f, "{}", msg),
            AppError::Store(e) => write!(f, "{}", e),
            AppError::Export(e) => write!(f, "{}", e),
            AppError::Internal(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Upstream(_) => StatusCode::BAD_GATEWAY,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Http(_) | AppError::Store(_) | AppError::Export(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            log::error!("❌ {} {}", status.as_u16(), self);
        } else {
            log::debug!("{} {}", status.as_u16(), self);
        }

        (status, Json(ErrorResponse { error: self.to_string() })).into_response()
    }
}
