pub mod feature_registry;
pub mod types;

pub use types::{EnrichedRow, Prediction, Signal};
