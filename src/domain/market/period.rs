use crate::domain::errors::ForecastError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lookback window requested from the market data provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Period {
    OneDay,
    FiveDays,
    OneMonth,
    ThreeMonths,
    SixMonths,
    OneYear,
    #[default]
    TwoYears,
    FiveYears,
    TenYears,
    YearToDate,
    Max,
}

impl Period {
    /// Range token understood by the Yahoo chart endpoint
    pub fn as_range(&self) -> &'static str {
        match self {
            Period::OneDay => "1d",
            Period::FiveDays => "5d",
            Period::OneMonth => "1mo",
            Period::ThreeMonths => "3mo",
            Period::SixMonths => "6mo",
            Period::OneYear => "1y",
            Period::TwoYears => "2y",
            Period::FiveYears => "5y",
            Period::TenYears => "10y",
            Period::YearToDate => "ytd",
            Period::Max => "max",
        }
    }

    /// Approximate number of daily trading bars covered by this window
    pub fn trading_days(&self) -> usize {
        match self {
            Period::OneDay => 1,
            Period::FiveDays => 5,
            Period::OneMonth => 21,
            Period::ThreeMonths => 63,
            Period::SixMonths => 126,
            Period::OneYear => 252,
            Period::TwoYears => 504,
            Period::FiveYears => 1260,
            Period::TenYears => 2520,
            // Assumes mid-year for ytd
            Period::YearToDate => 126,
            Period::Max => 5040,
        }
    }
}

impl FromStr for Period {
    type Err = ForecastError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "1d" | "1day" => Ok(Period::OneDay),
            "5d" | "5days" => Ok(Period::FiveDays),
            "1mo" | "1month" => Ok(Period::OneMonth),
            "3mo" | "3months" => Ok(Period::ThreeMonths),
            "6mo" | "6months" => Ok(Period::SixMonths),
            "1y" | "1year" => Ok(Period::OneYear),
            "2y" | "2years" => Ok(Period::TwoYears),
            "5y" | "5years" => Ok(Period::FiveYears),
            "10y" | "10years" => Ok(Period::TenYears),
            "ytd" => Ok(Period::YearToDate),
            "max" => Ok(Period::Max),
            _ => Err(ForecastError::InvalidPeriod {
                input: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_range())
    }
}
