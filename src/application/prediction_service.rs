//! Request-scoped orchestration of the prediction pipeline.
//!
//! Every call fetches its own history and fits its own classifier; the service
//! itself only holds immutable configuration and the provider handle.

use crate::application::market_data::enrich;
use crate::application::ml::{TrainedModel, predict_latest, train};
use crate::config::ModelConfig;
use crate::domain::errors::ForecastError;
use crate::domain::market::{Period, PriceChange, PriceSeries, StockProfile, Ticker};
use crate::domain::ml::{EnrichedRow, Prediction};
use crate::domain::ports::MarketDataProvider;
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

/// Output of one synchronous enrich → train → predict run
#[derive(Debug)]
pub struct Analysis {
    pub rows: Vec<EnrichedRow>,
    pub model: TrainedModel,
    pub prediction: Prediction,
}

/// Runs the CPU-bound part of the pipeline on an already fetched series.
pub fn analyze(series: &PriceSeries, config: &ModelConfig) -> Result<Analysis, ForecastError> {
    let rows = enrich(series);
    let model = train(&rows, config)?;
    let prediction = predict_latest(&model, &rows)?;
    Ok(Analysis {
        rows,
        model,
        prediction,
    })
}

/// Latest indicator values reported next to a prediction
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IndicatorSnapshot {
    pub sma_10: f64,
    pub sma_50: f64,
    pub rsi_14: f64,
    pub volume: u64,
}

impl From<&EnrichedRow> for IndicatorSnapshot {
    fn from(row: &EnrichedRow) -> Self {
        Self {
            sma_10: row.sma_10,
            sma_50: row.sma_50,
            rsi_14: row.rsi_14,
            volume: row.bar.volume,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ForecastReport {
    pub ticker: Ticker,
    pub prediction: Prediction,
    pub precision: f64,
    /// Close of the predicted row against the enriched row before it. The
    /// newest fetched bar has no label and is not part of the report.
    pub price: PriceChange,
    pub indicators: IndicatorSnapshot,
    pub rows_used: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct PriceQuote {
    pub ticker: Ticker,
    pub price: PriceChange,
}

pub struct PredictionService {
    provider: Arc<dyn MarketDataProvider>,
    model_config: ModelConfig,
    default_period: Period,
}

impl PredictionService {
    pub fn new(
        provider: Arc<dyn MarketDataProvider>,
        model_config: ModelConfig,
        default_period: Period,
    ) -> Self {
        Self {
            provider,
            model_config,
            default_period,
        }
    }

    pub fn model_config(&self) -> &ModelConfig {
        &self.model_config
    }

    /// Fetches history over the default period and predicts the next move.
    pub async fn forecast(&self, ticker: &str) -> Result<ForecastReport, ForecastError> {
        self.forecast_over(ticker, self.default_period).await
    }

    pub async fn forecast_over(
        &self,
        ticker: &str,
        period: Period,
    ) -> Result<ForecastReport, ForecastError> {
        let ticker = Ticker::parse(ticker)?;
        let series = self.provider.fetch(&ticker, period).await?;
        info!(
            "PredictionService: {} returned {} bars for {} ({})",
            self.provider.name(),
            series.len(),
            ticker,
            period
        );

        let config = self.model_config.clone();
        let analysis = tokio::task::spawn_blocking(move || analyze(&series, &config))
            .await
            .map_err(|e| ForecastError::computation(format!("Model task failed: {}", e)))??;

        let [.., previous, latest] = analysis.rows.as_slice() else {
            return Err(ForecastError::computation("Fewer than two enriched rows after training"));
        };
        let price = PriceChange::between(previous.bar.close, latest.bar.close);

        info!(
            "PredictionService: {} -> {} (confidence {:.2}, precision {:.2})",
            ticker,
            analysis.prediction.signal,
            analysis.prediction.confidence,
            analysis.model.precision()
        );

        Ok(ForecastReport {
            indicators: IndicatorSnapshot::from(latest),
            rows_used: analysis.rows.len(),
            precision: analysis.model.precision(),
            prediction: analysis.prediction,
            price,
            ticker,
        })
    }

    /// Latest price and change against the previous close, from a five-day window.
    pub async fn quote(&self, ticker: &str) -> Result<PriceQuote, ForecastError> {
        let ticker = Ticker::parse(ticker)?;
        let series = self.provider.fetch(&ticker, Period::FiveDays).await?;
        let price = series
            .price_change()
            .ok_or(ForecastError::InsufficientData {
                available: series.len(),
                required: 2,
            })?;
        Ok(PriceQuote { ticker, price })
    }

    pub async fn profile(&self, ticker: &str) -> Result<(Ticker, StockProfile), ForecastError> {
        let ticker = Ticker::parse(ticker)?;
        let profile = self.provider.profile(&ticker).await?;
        Ok((ticker, profile))
    }
}
