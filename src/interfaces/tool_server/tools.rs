//! Tool and resource bodies. Pipeline failures are reported inside the tool
//! result text, never as JSON-RPC errors. Texts echo the ticker as the caller
//! typed it; the pipeline itself works on the normalized symbol.

use crate::application::PredictionService;
use crate::application::prediction_service::{ForecastReport, PriceQuote};
use crate::domain::errors::ForecastError;
use serde_json::{Value, json};
use tracing::warn;

pub const PREDICT_TREND: &str = "predict_trend";
pub const GET_STOCK_PRICE: &str = "get_stock_price";
pub const STOCK_INFO_TEMPLATE: &str = "stock://{ticker}/info";

/// Text plus error flag of a `tools/call` result
#[derive(Debug, Clone, PartialEq)]
pub struct ToolOutput {
    pub text: String,
    pub is_error: bool,
}

impl ToolOutput {
    fn ok(text: String) -> Self {
        Self {
            text,
            is_error: false,
        }
    }

    fn error(text: String) -> Self {
        Self {
            text,
            is_error: true,
        }
    }

    pub fn to_value(&self) -> Value {
        json!({
            "content": [{ "type": "text", "text": self.text }],
            "isError": self.is_error,
        })
    }
}

fn ticker_schema(description: &str) -> Value {
    json!({
        "type": "object",
        "properties": {
            "ticker": { "type": "string", "description": description }
        },
        "required": ["ticker"]
    })
}

pub fn tool_definitions() -> Value {
    json!([
        {
            "name": PREDICT_TREND,
            "description": "Train a random forest on the ticker's recent daily history and predict whether the next close is higher (Buy) or not (Sell).",
            "inputSchema": ticker_schema("Ticker symbol, e.g. AAPL"),
        },
        {
            "name": GET_STOCK_PRICE,
            "description": "Latest closing price of a ticker and its change against the previous close.",
            "inputSchema": ticker_schema("Ticker symbol, e.g. AAPL"),
        }
    ])
}

pub fn resource_templates() -> Value {
    json!([
        {
            "uriTemplate": STOCK_INFO_TEMPLATE,
            "name": "Stock info",
            "description": "Company name, sector, industry, market cap and valuation ratios",
            "mimeType": "application/json",
        }
    ])
}

pub fn format_prediction(ticker: &str, report: &ForecastReport) -> String {
    format!(
        "Prediction for {}: {} (Confidence: {:.2})\nModel Precision on Test Data: {:.2}",
        ticker, report.prediction.signal, report.prediction.confidence, report.precision
    )
}

pub fn format_quote(ticker: &str, quote: &PriceQuote) -> String {
    format!(
        "{} Price: ${:.2} ({:+.2} / {:+.2}%)",
        ticker, quote.price.current, quote.price.change, quote.price.percent_change
    )
}

pub async fn predict_trend(service: &PredictionService, ticker: &str) -> ToolOutput {
    match service.forecast(ticker).await {
        Ok(report) => ToolOutput::ok(format_prediction(ticker, &report)),
        Err(ForecastError::InsufficientData { .. }) => {
            ToolOutput::ok(format!("Not enough data to predict for {}", ticker))
        }
        Err(e) => {
            warn!("ToolServer: predict_trend({}) failed: {}", ticker, e);
            ToolOutput::error(format!("Error predicting for {}: {}", ticker, e))
        }
    }
}

pub async fn get_stock_price(service: &PredictionService, ticker: &str) -> ToolOutput {
    match service.quote(ticker).await {
        Ok(quote) => ToolOutput::ok(format_quote(ticker, &quote)),
        Err(e) => {
            warn!("ToolServer: get_stock_price({}) failed: {}", ticker, e);
            ToolOutput::error(format!("Error fetching price for {}: {}", ticker, e))
        }
    }
}

/// Extracts `{ticker}` from `stock://{ticker}/info`
pub fn parse_stock_uri(uri: &str) -> Option<&str> {
    uri.strip_prefix("stock://")?
        .strip_suffix("/info")
        .filter(|t| !t.is_empty() && !t.contains('/'))
}

pub async fn read_stock_info(
    service: &PredictionService,
    ticker: &str,
) -> Result<String, ForecastError> {
    let (_, profile) = service.profile(ticker).await?;
    serde_json::to_string_pretty(&profile)
        .map_err(|e| ForecastError::computation(format!("Failed to encode profile: {}", e)))
}
