use crate::config::MockConfig;
use crate::domain::errors::ForecastError;
use crate::domain::market::{Period, PriceBar, PriceSeries, StockProfile, Ticker};
use crate::domain::ports::MarketDataProvider;
use async_trait::async_trait;
use chrono::{DateTime, Datelike, Duration, TimeZone, Utc, Weekday};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::{HashMap, HashSet};
use tracing::debug;

const START_PRICE: f64 = 100.0;

/// Offline market data: a seeded random walk per ticker.
///
/// The same `(seed, ticker, period)` always yields the same series. Fixed
/// series can be registered per ticker and tickers can be marked unknown.
#[derive(Debug, Clone)]
pub struct MockMarketDataProvider {
    config: MockConfig,
    fixtures: HashMap<String, PriceSeries>,
    missing: HashSet<String>,
}

impl MockMarketDataProvider {
    pub fn new(config: MockConfig) -> Self {
        Self {
            config,
            fixtures: HashMap::new(),
            missing: HashSet::new(),
        }
    }

    /// Serves `series` for its ticker instead of a generated walk
    pub fn with_series(mut self, series: PriceSeries) -> Self {
        self.fixtures.insert(series.ticker.to_uppercase(), series);
        self
    }

    /// Makes `ticker` answer `NotFound`
    pub fn with_missing(mut self, ticker: &str) -> Self {
        self.missing.insert(ticker.trim().to_uppercase());
        self
    }

    /// Generates `bars` daily bars on weekdays, ending on a fixed date.
    pub fn generate(&self, ticker: &str, bars: usize) -> PriceSeries {
        let mut rng = StdRng::seed_from_u64(self.config.seed ^ ticker_hash(ticker));
        let dates = weekdays_ending(anchor_date(), bars);

        let mut close = START_PRICE;
        let series = dates
            .into_iter()
            .map(|timestamp| {
                let open = close;
                let noise = rng.random::<f64>() * 2.0 - 1.0;
                let ret = self.config.drift + self.config.volatility * noise;
                close = (open * (1.0 + ret)).max(0.01);
                let high = open.max(close) * (1.0 + rng.random::<f64>() * 0.005);
                let low = open.min(close) * (1.0 - rng.random::<f64>() * 0.005);
                PriceBar {
                    timestamp,
                    open,
                    high,
                    low,
                    close,
                    volume: rng.random_range(1_000_000..5_000_000),
                }
            })
            .collect();

        PriceSeries::new(ticker, series)
    }
}

impl Default for MockMarketDataProvider {
    fn default() -> Self {
        Self::new(MockConfig::default())
    }
}

#[async_trait]
impl MarketDataProvider for MockMarketDataProvider {
    async fn fetch(&self, ticker: &Ticker, period: Period) -> Result<PriceSeries, ForecastError> {
        if self.missing.contains(ticker.as_str()) {
            return Err(ForecastError::NotFound {
                ticker: ticker.to_string(),
            });
        }

        let series = match self.fixtures.get(ticker.as_str()) {
            Some(fixture) => {
                let keep = period.trading_days().min(fixture.len());
                PriceSeries::new(
                    ticker.as_str(),
                    fixture.bars[fixture.len() - keep..].to_vec(),
                )
            }
            None => self.generate(ticker.as_str(), period.trading_days()),
        };

        if series.is_empty() {
            return Err(ForecastError::NotFound {
                ticker: ticker.to_string(),
            });
        }

        debug!("MockMarketDataProvider: {} bars for {}", series.len(), ticker);
        Ok(series)
    }

    async fn profile(&self, ticker: &Ticker) -> Result<StockProfile, ForecastError> {
        if self.missing.contains(ticker.as_str()) {
            return Err(ForecastError::NotFound {
                ticker: ticker.to_string(),
            });
        }

        Ok(StockProfile {
            long_name: Some(format!("{} Holdings (mock)", ticker)),
            sector: Some("Technology".to_string()),
            industry: Some("Software".to_string()),
            market_cap: Some(1.0e10),
            trailing_pe: Some(25.0),
            forward_pe: Some(22.0),
            dividend_yield: None,
        })
    }

    fn name(&self) -> &str {
        "Mock"
    }
}

fn anchor_date() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 12, 31, 21, 0, 0)
        .single()
        .unwrap_or_default()
}

fn weekdays_ending(end: DateTime<Utc>, count: usize) -> Vec<DateTime<Utc>> {
    let mut dates = Vec::with_capacity(count);
    let mut day = end;
    while dates.len() < count {
        if !matches!(day.weekday(), Weekday::Sat | Weekday::Sun) {
            dates.push(day);
        }
        day -= Duration::days(1);
    }
    dates.reverse();
    dates
}

/// FNV-1a, so different tickers walk differently under one seed
fn ticker_hash(ticker: &str) -> u64 {
    ticker.bytes().fold(0xcbf2_9ce4_8422_2325, |hash, b| {
        (hash ^ u64::from(b)).wrapping_mul(0x0100_0000_01b3)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ticker(s: &str) -> Ticker {
        Ticker::parse(s).unwrap()
    }

    #[tokio::test]
    async fn test_generated_series_is_deterministic() {
        let provider = MockMarketDataProvider::default();
        let a = provider.fetch(&ticker("AAPL"), Period::OneYear).await.unwrap();
        let b = provider.fetch(&ticker("aapl"), Period::OneYear).await.unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), Period::OneYear.trading_days());
    }

    #[tokio::test]
    async fn test_tickers_differ() {
        let provider = MockMarketDataProvider::default();
        let a = provider.fetch(&ticker("AAPL"), Period::OneMonth).await.unwrap();
        let b = provider.fetch(&ticker("MSFT"), Period::OneMonth).await.unwrap();
        assert_ne!(a.closes(), b.closes());
    }

    #[tokio::test]
    async fn test_missing_ticker_is_not_found() {
        let provider = MockMarketDataProvider::default().with_missing("zzzzq");
        let err = provider.fetch(&ticker("ZZZZQ"), Period::TwoYears).await.unwrap_err();
        assert!(matches!(err, ForecastError::NotFound { ref ticker } if ticker == "ZZZZQ"));
        assert!(provider.profile(&ticker("ZZZZQ")).await.is_err());
    }

    #[tokio::test]
    async fn test_fixture_is_trimmed_to_period() {
        let base = MockMarketDataProvider::default().generate("FIX", 30);
        let provider = MockMarketDataProvider::default().with_series(base.clone());
        let five = provider.fetch(&ticker("FIX"), Period::FiveDays).await.unwrap();
        assert_eq!(five.bars, base.bars[25..].to_vec());
        let all = provider.fetch(&ticker("FIX"), Period::TwoYears).await.unwrap();
        assert_eq!(all.len(), 30);
    }

    #[test]
    fn test_bars_are_weekdays_and_consistent() {
        let series = MockMarketDataProvider::default().generate("AAPL", 60);
        assert_eq!(series.len(), 60);
        for bar in &series.bars {
            assert!(!matches!(bar.timestamp.weekday(), Weekday::Sat | Weekday::Sun));
            assert!(bar.high >= bar.open.max(bar.close));
            assert!(bar.low <= bar.open.min(bar.close));
        }
        assert_eq!(series.bars.last().unwrap().timestamp, anchor_date());
    }

    #[test]
    fn test_drift_shows_in_series() {
        let provider = MockMarketDataProvider::new(MockConfig {
            seed: 3,
            drift: 0.01,
            volatility: 0.005,
        });
        let series = provider.generate("UP", 100);
        let closes = series.closes();
        assert!(closes.windows(2).all(|w| w[1] > w[0]));
    }
}
