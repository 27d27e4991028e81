// Market data domain
pub mod period;
pub mod price_series;
pub mod profile;
pub mod ticker;

pub use period::Period;
pub use price_series::{PriceBar, PriceChange, PriceSeries};
pub use profile::StockProfile;
pub use ticker::Ticker;
