use crate::application::PredictionService;
use crate::config::{Config, Mode};
use crate::domain::ports::MarketDataProvider;
use crate::infrastructure::mock::MockMarketDataProvider;
use crate::infrastructure::yahoo::YahooMarketDataProvider;
use std::sync::Arc;
use tracing::info;

pub struct ServiceFactory;

impl ServiceFactory {
    pub fn create_provider(config: &Config) -> Arc<dyn MarketDataProvider> {
        match config.mode {
            Mode::Mock => {
                info!(
                    "ServiceFactory: Using mock market data (seed={}, drift={}, volatility={})",
                    config.mock.seed, config.mock.drift, config.mock.volatility
                );
                Arc::new(MockMarketDataProvider::new(config.mock.clone()))
            }
            Mode::Yahoo => {
                info!("ServiceFactory: Using Yahoo Finance at {}", config.yahoo.base_url);
                Arc::new(YahooMarketDataProvider::new(&config.yahoo))
            }
        }
    }

    pub fn create_prediction_service(config: &Config) -> PredictionService {
        PredictionService::new(
            Self::create_provider(config),
            config.model.clone(),
            config.default_period,
        )
    }
}
