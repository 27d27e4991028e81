use crate::domain::errors::ForecastError;
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

const MAX_TICKER_LEN: usize = 16;

/// Normalized ticker symbol (trimmed, upper-case).
///
/// Accepts the characters Yahoo uses in symbols: letters, digits and
/// `.` `-` `^` `=` (e.g. `BRK-B`, `^GSPC`, `EURUSD=X`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Ticker(String);

impl Ticker {
    pub fn parse(input: &str) -> Result<Self, ForecastError> {
        let symbol = input.trim().to_uppercase();

        if symbol.is_empty() {
            return Err(ForecastError::InvalidTicker {
                input: input.to_string(),
                reason: "Ticker symbol is required".to_string(),
            });
        }

        if symbol.len() > MAX_TICKER_LEN {
            return Err(ForecastError::InvalidTicker {
                input: input.to_string(),
                reason: format!("longer than {} characters", MAX_TICKER_LEN),
            });
        }

        if let Some(bad) = symbol
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '^' | '=')))
        {
            return Err(ForecastError::InvalidTicker {
                input: input.to_string(),
                reason: format!("unexpected character '{}'", bad),
            });
        }

        Ok(Self(symbol))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Ticker {
    type Err = ForecastError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Ticker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for Ticker {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_normalizes_case_and_whitespace() {
        let ticker = Ticker::parse("  nvda ").unwrap();
        assert_eq!(ticker.as_str(), "NVDA");
        assert_eq!(ticker.to_string(), "NVDA");
    }

    #[test]
    fn test_parse_accepts_yahoo_symbols() {
        assert!(Ticker::parse("BRK-B").is_ok());
        assert!(Ticker::parse("^GSPC").is_ok());
        assert!(Ticker::parse("EURUSD=X").is_ok());
        assert!(Ticker::parse("RDS.A").is_ok());
    }

    #[test]
    fn test_parse_rejects_empty() {
        let err = Ticker::parse("   ").unwrap_err();
        assert!(err.to_string().contains("Ticker symbol is required"));
    }

    #[test]
    fn test_parse_rejects_bad_characters() {
        assert!(Ticker::parse("AAPL/../x").is_err());
        assert!(Ticker::parse("A B").is_err());
        assert!(Ticker::parse("ABCDEFGHIJKLMNOPQ").is_err());
    }
}
