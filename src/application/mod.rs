// Market data processing
pub mod market_data;

// Model training and inference
pub mod ml;

// Pipeline orchestration
pub mod prediction_service;

pub use prediction_service::{PredictionService, analyze};
