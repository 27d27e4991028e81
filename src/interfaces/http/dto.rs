use crate::application::prediction_service::{ForecastReport, PriceQuote};
use crate::domain::ml::Signal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PredictRequest {
    #[serde(default)]
    pub ticker: String,
    #[serde(default)]
    pub period: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictResponse {
    pub ticker: String,
    pub prediction: Signal,
    pub confidence: f64,
    pub precision: f64,
    pub current_price: f64,
    pub price_change: f64,
    pub percent_change: f64,
    pub indicators: IndicatorsDto,
}

#[derive(Debug, Clone, Serialize)]
pub struct IndicatorsDto {
    pub sma10: f64,
    pub sma50: f64,
    pub rsi: f64,
    pub volume: u64,
}

impl From<ForecastReport> for PredictResponse {
    fn from(report: ForecastReport) -> Self {
        Self {
            ticker: report.ticker.to_string(),
            prediction: report.prediction.signal,
            confidence: report.prediction.confidence,
            precision: report.precision,
            current_price: report.price.current,
            price_change: report.price.change,
            percent_change: report.price.percent_change,
            indicators: IndicatorsDto {
                sma10: report.indicators.sma_10,
                sma50: report.indicators.sma_50,
                rsi: report.indicators.rsi_14,
                volume: report.indicators.volume,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceResponse {
    pub ticker: String,
    pub price: f64,
    pub change: f64,
    pub percent_change: f64,
}

impl From<PriceQuote> for PriceResponse {
    fn from(quote: PriceQuote) -> Self {
        Self {
            ticker: quote.ticker.to_string(),
            price: quote.price.current,
            change: quote.price.change,
            percent_change: quote.price.percent_change,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
