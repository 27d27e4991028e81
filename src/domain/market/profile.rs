use serde::Serialize;

/// Descriptive metadata for a ticker. Every field is optional since providers
/// omit them freely (ETFs have no sector, many stocks pay no dividend).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockProfile {
    pub long_name: Option<String>,
    pub sector: Option<String>,
    pub industry: Option<String>,
    pub market_cap: Option<f64>,
    #[serde(rename = "trailingPE")]
    pub trailing_pe: Option<f64>,
    #[serde(rename = "forwardPE")]
    pub forward_pe: Option<f64>,
    pub dividend_yield: Option<f64>,
}

impl StockProfile {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
