use super::AppState;
use super::dto::{ErrorResponse, PredictRequest, PredictResponse, PriceResponse};
use crate::domain::errors::ForecastError;
use crate::domain::market::Period;
use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use std::str::FromStr;
use tracing::{error, warn};

/// Error body plus status code, rendered as `{"error": "..."}`
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    /// Maps a pipeline failure for `ticker` onto an HTTP status.
    pub fn from_forecast(ticker: &str, err: ForecastError) -> Self {
        let status = match &err {
            ForecastError::InvalidTicker { .. }
            | ForecastError::InvalidPeriod { .. }
            | ForecastError::InsufficientData { .. } => StatusCode::BAD_REQUEST,
            ForecastError::NotFound { .. } => StatusCode::NOT_FOUND,
            ForecastError::Upstream { .. } | ForecastError::Computation { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let message = match &err {
            ForecastError::InsufficientData { .. } => {
                format!("Not enough data to predict for {}", ticker)
            }
            other => other.to_string(),
        };

        if status.is_server_error() {
            error!("HTTP API: request for {} failed: {}", ticker, err);
        } else {
            warn!("HTTP API: request for {} rejected: {}", ticker, err);
        }

        Self { status, message }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorResponse {
                error: self.message,
            }),
        )
            .into_response()
    }
}

pub async fn predict(
    State(state): State<AppState>,
    payload: Result<Json<PredictRequest>, JsonRejection>,
) -> Result<Json<PredictResponse>, ApiError> {
    let Json(request) = payload
        .map_err(|e| ApiError::bad_request(format!("Invalid request body: {}", e.body_text())))?;

    let ticker = request.ticker.trim().to_uppercase();
    if ticker.is_empty() {
        return Err(ApiError::bad_request("Ticker symbol is required"));
    }

    let report = match request.period.as_deref() {
        Some(raw) => {
            let period =
                Period::from_str(raw).map_err(|e| ApiError::from_forecast(&ticker, e))?;
            state.service.forecast_over(&ticker, period).await
        }
        None => state.service.forecast(&ticker).await,
    }
    .map_err(|e| ApiError::from_forecast(&ticker, e))?;

    Ok(Json(PredictResponse::from(report)))
}

pub async fn price(
    State(state): State<AppState>,
    Path(ticker): Path<String>,
) -> Result<Json<PriceResponse>, ApiError> {
    let ticker = ticker.trim().to_uppercase();
    let quote = state
        .service
        .quote(&ticker)
        .await
        .map_err(|e| ApiError::from_forecast(&ticker, e))?;
    Ok(Json(PriceResponse::from(quote)))
}

pub async fn health() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
