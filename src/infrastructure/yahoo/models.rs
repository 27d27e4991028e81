//! Yahoo Finance API response structures

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct YahooApiError {
    pub code: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl YahooApiError {
    pub fn is_not_found(&self) -> bool {
        self.code.eq_ignore_ascii_case("Not Found")
    }

    pub fn message(&self) -> String {
        match &self.description {
            Some(description) => format!("{}: {}", self.code, description),
            None => self.code.clone(),
        }
    }
}

// ===== Chart endpoint (v8) =====

#[derive(Debug, Clone, Deserialize)]
pub struct YahooChartResponse {
    pub chart: YahooChartData,
}

#[derive(Debug, Clone, Deserialize)]
pub struct YahooChartData {
    #[serde(default)]
    pub result: Option<Vec<YahooChartResult>>,
    #[serde(default)]
    pub error: Option<YahooApiError>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct YahooChartResult {
    #[serde(default)]
    pub timestamp: Option<Vec<i64>>,
    pub indicators: YahooChartIndicators,
}

#[derive(Debug, Clone, Deserialize)]
pub struct YahooChartIndicators {
    #[serde(default)]
    pub quote: Vec<YahooChartQuote>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct YahooChartQuote {
    #[serde(default)]
    pub open: Vec<Option<f64>>,
    #[serde(default)]
    pub high: Vec<Option<f64>>,
    #[serde(default)]
    pub low: Vec<Option<f64>>,
    #[serde(default)]
    pub close: Vec<Option<f64>>,
    #[serde(default)]
    pub volume: Vec<Option<f64>>,
}

// ===== Quote summary endpoint (v10) =====

#[derive(Debug, Clone, Deserialize)]
pub struct YahooQuoteSummaryResponse {
    #[serde(rename = "quoteSummary")]
    pub quote_summary: YahooQuoteSummaryData,
}

#[derive(Debug, Clone, Deserialize)]
pub struct YahooQuoteSummaryData {
    #[serde(default)]
    pub result: Option<Vec<YahooQuoteSummaryResult>>,
    #[serde(default)]
    pub error: Option<YahooApiError>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct YahooQuoteSummaryResult {
    #[serde(default)]
    pub price: Option<YahooPriceModule>,
    #[serde(rename = "assetProfile", default)]
    pub asset_profile: Option<YahooAssetProfile>,
    #[serde(rename = "summaryDetail", default)]
    pub summary_detail: Option<YahooSummaryDetail>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct YahooPriceModule {
    #[serde(rename = "longName", default)]
    pub long_name: Option<String>,
    #[serde(rename = "marketCap", default)]
    pub market_cap: Option<YahooRawValue>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct YahooAssetProfile {
    #[serde(default)]
    pub sector: Option<String>,
    #[serde(default)]
    pub industry: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct YahooSummaryDetail {
    #[serde(rename = "trailingPE", default)]
    pub trailing_pe: Option<YahooRawValue>,
    #[serde(rename = "forwardPE", default)]
    pub forward_pe: Option<YahooRawValue>,
    #[serde(rename = "dividendYield", default)]
    pub dividend_yield: Option<YahooRawValue>,
}

/// Yahoo wraps numbers as `{"raw": 1.23, "fmt": "1.23"}` and sends `{}` when
/// a value is unavailable.
#[derive(Debug, Clone, Deserialize)]
pub struct YahooRawValue {
    #[serde(default)]
    pub raw: Option<f64>,
}

impl YahooRawValue {
    pub fn value(&self) -> Option<f64> {
        self.raw.filter(|v| v.is_finite())
    }
}
