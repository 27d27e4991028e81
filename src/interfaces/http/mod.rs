//! JSON HTTP API over the prediction pipeline.
//!
//! - `POST /api/predict` trains a fresh model for the ticker and predicts the
//!   next move
//! - `GET /api/price/:ticker` returns the latest close and daily change
//! - `GET /api/health` liveness probe
//! - everything else is served from the static directory

pub mod dto;
pub mod handlers;

use crate::application::PredictionService;
use axum::Router;
use axum::routing::{get, post};
use std::path::Path;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<PredictionService>,
}

pub fn router(service: Arc<PredictionService>, static_dir: impl AsRef<Path>) -> Router {
    Router::new()
        .route("/api/predict", post(handlers::predict))
        .route("/api/price/:ticker", get(handlers::price))
        .route("/api/health", get(handlers::health))
        .fallback_service(ServeDir::new(static_dir))
        .layer(CorsLayer::permissive())
        .with_state(AppState { service })
}
