//! Market data provider configuration parsing from environment variables.

use super::{Lookup, parse_or};
use anyhow::Result;

/// Yahoo Finance endpoints and HTTP client settings
#[derive(Debug, Clone)]
pub struct YahooConfig {
    pub base_url: String,
    pub cookie_url: String,
    pub timeout_secs: u64,
    pub max_retries: u32,
}

impl Default for YahooConfig {
    fn default() -> Self {
        Self {
            base_url: "https://query1.finance.yahoo.com".to_string(),
            cookie_url: "https://fc.yahoo.com".to_string(),
            timeout_secs: 30,
            max_retries: 0,
        }
    }
}

impl YahooConfig {
    pub fn from_lookup(lookup: Lookup<'_>) -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            base_url: lookup("YAHOO_BASE_URL").unwrap_or(defaults.base_url),
            cookie_url: lookup("YAHOO_COOKIE_URL").unwrap_or(defaults.cookie_url),
            timeout_secs: parse_or(lookup, "HTTP_TIMEOUT_SECS", defaults.timeout_secs)?,
            max_retries: parse_or(lookup, "HTTP_MAX_RETRIES", defaults.max_retries)?,
        })
    }
}

/// Synthetic random-walk settings for offline mode
#[derive(Debug, Clone, PartialEq)]
pub struct MockConfig {
    pub seed: u64,
    /// Mean daily return
    pub drift: f64,
    /// Half-width of the uniform daily return noise
    pub volatility: f64,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            drift: 0.0005,
            volatility: 0.02,
        }
    }
}

impl MockConfig {
    pub fn from_lookup(lookup: Lookup<'_>) -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            seed: parse_or(lookup, "MOCK_SEED", defaults.seed)?,
            drift: parse_or(lookup, "MOCK_DRIFT", defaults.drift)?,
            volatility: parse_or(lookup, "MOCK_VOLATILITY", defaults.volatility)?,
        })
    }
}
