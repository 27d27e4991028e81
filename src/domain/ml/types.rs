use crate::domain::market::PriceBar;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A price bar together with its derived indicators and direction label
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedRow {
    pub bar: PriceBar,
    pub sma_10: f64,
    pub sma_50: f64,
    pub rsi_14: f64,
    /// 1 if the next bar closed strictly higher, 0 otherwise
    pub label: u8,
}

/// Directional call emitted by the predictor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Signal {
    Buy,
    Sell,
}

impl Signal {
    pub fn from_class(class: u8) -> Self {
        if class == 1 { Signal::Buy } else { Signal::Sell }
    }

    pub fn class(&self) -> u8 {
        match self {
            Signal::Buy => 1,
            Signal::Sell => 0,
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Signal::Buy => write!(f, "Buy"),
            Signal::Sell => write!(f, "Sell"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Prediction {
    pub signal: Signal,
    /// Probability the model assigns to `signal`, in [0, 1]
    pub confidence: f64,
    pub as_of: DateTime<Utc>,
}
