use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One trading period of OHLCV data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

/// Chronological price history for a single ticker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    pub ticker: String,
    pub bars: Vec<PriceBar>,
}

impl PriceSeries {
    /// Builds a series, ordering bars by timestamp and dropping duplicates.
    pub fn new(ticker: impl Into<String>, mut bars: Vec<PriceBar>) -> Self {
        bars.sort_by_key(|b| b.timestamp);
        bars.dedup_by_key(|b| b.timestamp);
        Self {
            ticker: ticker.into(),
            bars,
        }
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn last(&self) -> Option<&PriceBar> {
        self.bars.last()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    /// Change between the last two closes, `None` with fewer than two bars.
    pub fn price_change(&self) -> Option<PriceChange> {
        let n = self.bars.len();
        if n < 2 {
            return None;
        }
        Some(PriceChange::between(self.bars[n - 2].close, self.bars[n - 1].close))
    }
}

/// Latest close relative to the previous one
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PriceChange {
    pub current: f64,
    pub previous: f64,
    pub change: f64,
    pub percent_change: f64,
}

impl PriceChange {
    pub fn between(previous: f64, current: f64) -> Self {
        let change = current - previous;
        let percent_change = if previous != 0.0 {
            change / previous * 100.0
        } else {
            0.0
        };
        Self {
            current,
            previous,
            change,
            percent_change,
        }
    }
}
