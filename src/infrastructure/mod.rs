pub mod core;
pub mod factory;
pub mod mock;
pub mod observability;
pub mod yahoo;

pub use factory::ServiceFactory;
pub use mock::MockMarketDataProvider;
pub use yahoo::YahooMarketDataProvider;
