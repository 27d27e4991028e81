use super::models::{YahooChartResponse, YahooQuoteSummaryResponse};
use crate::config::YahooConfig;
use crate::domain::errors::ForecastError;
use crate::domain::market::{Period, PriceBar, PriceSeries, StockProfile, Ticker};
use crate::domain::ports::MarketDataProvider;
use crate::infrastructure::core::http_client_factory::{HttpClientFactory, build_url};
use async_trait::async_trait;
use chrono::DateTime;
use reqwest_middleware::ClientWithMiddleware;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

const PROFILE_MODULES: &str = "price,assetProfile,summaryDetail";

/// Daily history and profile data from Yahoo Finance
pub struct YahooMarketDataProvider {
    client: ClientWithMiddleware,
    base_url: String,
    cookie_url: String,
}

impl YahooMarketDataProvider {
    pub fn new(config: &YahooConfig) -> Self {
        Self {
            client: HttpClientFactory::create_client(
                Duration::from_secs(config.timeout_secs),
                config.max_retries,
            ),
            base_url: config.base_url.clone(),
            cookie_url: config.cookie_url.clone(),
        }
    }

    fn url(&self, segments: &[&str], params: &[(&str, &str)]) -> Result<Url, ForecastError> {
        build_url(&self.base_url, segments, params)
            .map_err(|e| ForecastError::upstream(format!("Invalid Yahoo URL: {}", e)))
    }

    async fn get(&self, url: Url) -> Result<(u16, String), ForecastError> {
        debug!("YahooMarketDataProvider: GET {}", url);
        let response = self
            .client
            .get(url)
            .header("referer", "https://finance.yahoo.com/")
            .send()
            .await
            .map_err(|e| ForecastError::upstream(format!("Yahoo transport error: {}", e)))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| ForecastError::upstream(format!("Failed to read Yahoo response: {}", e)))?;
        Ok((status, body))
    }

    /// The quote summary endpoint needs a session cookie plus a matching crumb.
    async fn fetch_crumb(&self) -> Result<String, ForecastError> {
        match Url::parse(&self.cookie_url) {
            Ok(cookie_url) => {
                // Only the Set-Cookie header matters; this endpoint answers 404.
                if let Err(e) = self.client.get(cookie_url).send().await {
                    warn!("YahooMarketDataProvider: cookie request failed: {}", e);
                }
            }
            Err(e) => warn!("YahooMarketDataProvider: invalid cookie URL {}: {}", self.cookie_url, e),
        }

        let url = self.url(&["v1", "test", "getcrumb"], &[])?;
        let (status, body) = self.get(url).await?;
        let crumb = body.trim();
        if !(200..300).contains(&status) || crumb.is_empty() || crumb.starts_with('{') {
            return Err(ForecastError::upstream(format!(
                "Could not obtain Yahoo crumb (status {})",
                status
            )));
        }
        Ok(crumb.to_string())
    }
}

#[async_trait]
impl MarketDataProvider for YahooMarketDataProvider {
    async fn fetch(&self, ticker: &Ticker, period: Period) -> Result<PriceSeries, ForecastError> {
        let url = self.url(
            &["v8", "finance", "chart", ticker.as_str()],
            &[
                ("range", period.as_range()),
                ("interval", "1d"),
                ("includePrePost", "false"),
            ],
        )?;

        let (status, body) = self.get(url).await?;
        let series = parse_chart_response(ticker, status, &body)?;
        info!(
            "YahooMarketDataProvider: Fetched {} bars for {} over {}",
            series.len(),
            ticker,
            period
        );
        Ok(series)
    }

    async fn profile(&self, ticker: &Ticker) -> Result<StockProfile, ForecastError> {
        let crumb = self.fetch_crumb().await?;
        let url = self.url(
            &["v10", "finance", "quoteSummary", ticker.as_str()],
            &[("modules", PROFILE_MODULES), ("crumb", crumb.as_str())],
        )?;
        let (status, body) = self.get(url).await?;
        parse_profile_response(ticker, status, &body)
    }

    fn name(&self) -> &str {
        "Yahoo Finance"
    }
}

fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}

/// Converts a chart payload into a price series.
///
/// Yahoo reports unknown symbols either as HTTP 404 or as a chart error with
/// code "Not Found"; both become `NotFound`, as does a result without bars.
pub fn parse_chart_response(ticker: &Ticker, status: u16, body: &str) -> Result<PriceSeries, ForecastError> {
    let not_found = || ForecastError::NotFound {
        ticker: ticker.to_string(),
    };

    let response: YahooChartResponse = match serde_json::from_str(body) {
        Ok(r) => r,
        Err(_) if status == 404 => return Err(not_found()),
        Err(_) if !is_success(status) => {
            return Err(ForecastError::upstream(format!("Yahoo returned status {}", status)));
        }
        Err(e) => {
            return Err(ForecastError::upstream(format!("Failed to parse Yahoo chart: {}", e)));
        }
    };

    if let Some(error) = &response.chart.error {
        if error.is_not_found() || status == 404 {
            return Err(not_found());
        }
        return Err(ForecastError::upstream(format!("Yahoo chart API error: {}", error.message())));
    }
    if status == 404 {
        return Err(not_found());
    }
    if !is_success(status) {
        return Err(ForecastError::upstream(format!("Yahoo returned status {}", status)));
    }

    let result = response
        .chart
        .result
        .and_then(|r| r.into_iter().next())
        .ok_or_else(not_found)?;
    let timestamps = result.timestamp.unwrap_or_default();
    let Some(quote) = result.indicators.quote.into_iter().next() else {
        return Err(not_found());
    };

    let mut bars = Vec::with_capacity(timestamps.len());
    for (i, &ts) in timestamps.iter().enumerate() {
        // Only keep bars where every OHLC value is present
        let (Some(Some(open)), Some(Some(high)), Some(Some(low)), Some(Some(close))) = (
            quote.open.get(i),
            quote.high.get(i),
            quote.low.get(i),
            quote.close.get(i),
        ) else {
            continue;
        };
        let Some(timestamp) = DateTime::from_timestamp(ts, 0) else {
            continue;
        };
        let volume = quote
            .volume
            .get(i)
            .copied()
            .flatten()
            .filter(|v| v.is_finite() && *v >= 0.0)
            .map(|v| v as u64)
            .unwrap_or(0);

        bars.push(PriceBar {
            timestamp,
            open: *open,
            high: *high,
            low: *low,
            close: *close,
            volume,
        });
    }

    if bars.is_empty() {
        return Err(not_found());
    }
    Ok(PriceSeries::new(ticker.as_str(), bars))
}

pub fn parse_profile_response(ticker: &Ticker, status: u16, body: &str) -> Result<StockProfile, ForecastError> {
    let not_found = || ForecastError::NotFound {
        ticker: ticker.to_string(),
    };

    let response: YahooQuoteSummaryResponse = match serde_json::from_str(body) {
        Ok(r) => r,
        Err(_) if status == 404 => return Err(not_found()),
        Err(_) if !is_success(status) => {
            return Err(ForecastError::upstream(format!("Yahoo returned status {}", status)));
        }
        Err(e) => {
            return Err(ForecastError::upstream(format!("Failed to parse Yahoo summary: {}", e)));
        }
    };

    if let Some(error) = &response.quote_summary.error {
        if error.is_not_found() || status == 404 {
            return Err(not_found());
        }
        return Err(ForecastError::upstream(format!("Yahoo summary API error: {}", error.message())));
    }
    if !is_success(status) {
        return Err(ForecastError::upstream(format!("Yahoo returned status {}", status)));
    }

    let result = response
        .quote_summary
        .result
        .and_then(|r| r.into_iter().next())
        .ok_or_else(not_found)?;

    let mut profile = StockProfile::default();
    if let Some(price) = result.price {
        profile.long_name = price.long_name;
        profile.market_cap = price.market_cap.and_then(|v| v.value());
    }
    if let Some(asset) = result.asset_profile {
        profile.sector = asset.sector;
        profile.industry = asset.industry;
    }
    if let Some(detail) = result.summary_detail {
        profile.trailing_pe = detail.trailing_pe.and_then(|v| v.value());
        profile.forward_pe = detail.forward_pe.and_then(|v| v.value());
        profile.dividend_yield = detail.dividend_yield.and_then(|v| v.value());
    }
    Ok(profile)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ticker() -> Ticker {
        Ticker::parse("AAPL").unwrap()
    }

    const CHART_OK: &str = r#"{
        "chart": {
            "result": [{
                "meta": {"symbol": "AAPL"},
                "timestamp": [1704205800, 1704292200, 1704378600],
                "indicators": {
                    "quote": [{
                        "open": [187.15, 184.22, null],
                        "high": [188.44, 185.88, 183.09],
                        "low": [183.89, 183.43, 180.88],
                        "close": [185.64, 184.25, 181.91],
                        "volume": [82488700, 58414500, 71983600]
                    }]
                }
            }],
            "error": null
        }
    }"#;

    #[test]
    fn test_parse_chart_skips_incomplete_bars() {
        let series = parse_chart_response(&ticker(), 200, CHART_OK).unwrap();
        assert_eq!(series.ticker, "AAPL");
        assert_eq!(series.len(), 2);
        assert_eq!(series.bars[0].close, 185.64);
        assert_eq!(series.bars[1].volume, 58_414_500);
        assert_eq!(series.bars[0].timestamp.timestamp(), 1_704_205_800);
    }

    #[test]
    fn test_parse_chart_not_found_error() {
        let body = r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found, symbol may be delisted"}}}"#;
        let err = parse_chart_response(&ticker(), 404, body).unwrap_err();
        assert!(matches!(err, ForecastError::NotFound { ref ticker } if ticker == "AAPL"));
    }

    #[test]
    fn test_parse_chart_empty_result_is_not_found() {
        let body = r#"{"chart":{"result":[{"indicators":{"quote":[{}]}}],"error":null}}"#;
        let err = parse_chart_response(&ticker(), 200, body).unwrap_err();
        assert!(matches!(err, ForecastError::NotFound { .. }));
    }

    #[test]
    fn test_parse_chart_other_api_error_is_upstream() {
        let body = r#"{"chart":{"result":null,"error":{"code":"Bad Request","description":"Invalid input - interval=1x is not supported"}}}"#;
        let err = parse_chart_response(&ticker(), 400, body).unwrap_err();
        assert!(matches!(err, ForecastError::Upstream { .. }));
        assert!(err.to_string().contains("Bad Request"));
    }

    #[test]
    fn test_parse_chart_non_json_status() {
        let err = parse_chart_response(&ticker(), 429, "Too Many Requests").unwrap_err();
        assert!(matches!(err, ForecastError::Upstream { .. }));
        let err = parse_chart_response(&ticker(), 404, "<html></html>").unwrap_err();
        assert!(matches!(err, ForecastError::NotFound { .. }));
    }

    #[test]
    fn test_parse_profile() {
        let body = r#"{
            "quoteSummary": {
                "result": [{
                    "price": {"longName": "Apple Inc.", "marketCap": {"raw": 2950000000000, "fmt": "2.95T"}},
                    "assetProfile": {"sector": "Technology", "industry": "Consumer Electronics"},
                    "summaryDetail": {
                        "trailingPE": {"raw": 30.5, "fmt": "30.50"},
                        "forwardPE": {},
                        "dividendYield": {"raw": 0.0052, "fmt": "0.52%"}
                    }
                }],
                "error": null
            }
        }"#;
        let profile = parse_profile_response(&ticker(), 200, body).unwrap();
        assert_eq!(profile.long_name.as_deref(), Some("Apple Inc."));
        assert_eq!(profile.sector.as_deref(), Some("Technology"));
        assert_eq!(profile.market_cap, Some(2_950_000_000_000.0));
        assert_eq!(profile.trailing_pe, Some(30.5));
        assert_eq!(profile.forward_pe, None);
        assert_eq!(profile.dividend_yield, Some(0.0052));
    }

    #[test]
    fn test_parse_profile_not_found() {
        let body = r#"{"quoteSummary":{"result":null,"error":{"code":"Not Found","description":"Quote not found for symbol: ZZZZQ"}}}"#;
        let err = parse_profile_response(&ticker(), 404, body).unwrap_err();
        assert!(matches!(err, ForecastError::NotFound { .. }));
    }
}
