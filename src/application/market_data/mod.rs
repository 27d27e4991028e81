// Indicator calculation over fetched price history
pub mod indicators;

pub use indicators::enrich;
