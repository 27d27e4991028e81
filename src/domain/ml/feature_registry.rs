use crate::domain::ml::types::EnrichedRow;

/// Ordered list of predictor column names.
/// Training and inference both build vectors through `predictor_vector`,
/// so this order is the contract between them.
pub const PREDICTOR_NAMES: &[&str] = &["Close", "Volume", "SMA_10", "SMA_50", "RSI"];

/// Owned copy of the registry, stored alongside a trained model
pub fn predictor_names() -> Vec<String> {
    PREDICTOR_NAMES.iter().map(|s| s.to_string()).collect()
}

/// Converts an enriched row into the predictor vector, in registry order.
pub fn predictor_vector(row: &EnrichedRow) -> Vec<f64> {
    vec![
        row.bar.close,
        row.bar.volume as f64,
        row.sma_10,
        row.sma_50,
        row.rsi_14,
    ]
}

/// True when `columns` matches the registry exactly, order included.
pub fn matches_registry(columns: &[String]) -> bool {
    columns.len() == PREDICTOR_NAMES.len()
        && columns.iter().zip(PREDICTOR_NAMES).all(|(a, b)| a == b)
}
