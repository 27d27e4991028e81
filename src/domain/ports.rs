use crate::config::ModelConfig;
use crate::domain::errors::ForecastError;
use crate::domain::market::{Period, PriceSeries, StockProfile, Ticker};
use async_trait::async_trait;

// Need async_trait for async functions in trait objects
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Daily OHLCV history for `ticker` over `period`.
    /// Returns `ForecastError::NotFound` when the provider has no rows.
    async fn fetch(&self, ticker: &Ticker, period: Period) -> Result<PriceSeries, ForecastError>;

    /// Descriptive metadata for `ticker`
    async fn profile(&self, ticker: &Ticker) -> Result<StockProfile, ForecastError>;

    /// Provider name for logs
    fn name(&self) -> &str;
}

/// Interface for binary direction classifiers.
///
/// Class 1 means "next close is higher", class 0 everything else.
pub trait BinaryClassifier: Send + Sync {
    fn fit(features: &[Vec<f64>], labels: &[u8], params: &ModelConfig) -> Result<Self, ForecastError>
    where
        Self: Sized;

    fn predict(&self, features: &[Vec<f64>]) -> Result<Vec<u8>, ForecastError>;

    /// Probabilities of `[class 0, class 1]` for a single sample
    fn predict_probability(&self, features: &[f64]) -> Result<[f64; 2], ForecastError>;

    /// Get model name/type
    fn name(&self) -> &str;
}
