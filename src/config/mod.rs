//! Configuration module for stockcast.
//!
//! Configuration is loaded from environment variables (a `.env` file is read by
//! the binaries through `dotenvy`), organized by concern: Provider, Model and
//! Server.

mod model_config;
mod provider_config;
mod server_config;

pub use model_config::ModelConfig;
pub use provider_config::{MockConfig, YahooConfig};
pub use server_config::ServerConfig;

use crate::domain::market::Period;
use anyhow::{Context, Result};
use std::env;
use std::str::FromStr;

/// Key lookup used by every `from_lookup` constructor.
/// `Config::from_env` passes the process environment; tests pass a map.
pub type Lookup<'a> = &'a dyn Fn(&str) -> Option<String>;

pub(crate) fn parse_or<T>(lookup: Lookup<'_>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Failed to parse {}", key)),
        None => Ok(default),
    }
}

/// Which market data provider backs the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Yahoo,
    Mock,
}

impl FromStr for Mode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "yahoo" => Ok(Mode::Yahoo),
            "mock" => Ok(Mode::Mock),
            _ => anyhow::bail!("Invalid MODE: {}. Must be 'yahoo' or 'mock'", s),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub mode: Mode,
    pub default_period: Period,
    pub yahoo: YahooConfig,
    pub mock: MockConfig,
    pub model: ModelConfig,
    pub server: ServerConfig,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(&|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: Lookup<'_>) -> Result<Self> {
        let mode = Mode::from_str(&lookup("MODE").unwrap_or_else(|| "yahoo".to_string()))?;

        let default_period = match lookup("DEFAULT_PERIOD") {
            Some(raw) => Period::from_str(&raw).context("Failed to parse DEFAULT_PERIOD")?,
            None => Period::default(),
        };

        Ok(Self {
            mode,
            default_period,
            yahoo: YahooConfig::from_lookup(lookup)?,
            mock: MockConfig::from_lookup(lookup)?,
            model: ModelConfig::from_lookup(lookup)?,
            server: ServerConfig::from_lookup(lookup)?,
        })
    }
}
