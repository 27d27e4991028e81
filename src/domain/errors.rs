use thiserror::Error;

/// Errors surfaced by the data-to-prediction pipeline.
///
/// Front-ends translate these into their own wire formats; the pipeline never
/// retries on its own.
#[derive(Debug, Error)]
pub enum ForecastError {
    #[error("Invalid ticker symbol '{input}': {reason}")]
    InvalidTicker { input: String, reason: String },

    #[error("Invalid period '{input}'. Expected one of 1d, 5d, 1mo, 3mo, 6mo, 1y, 2y, 5y, 10y, ytd, max")]
    InvalidPeriod { input: String },

    #[error("No data found for ticker {ticker}")]
    NotFound { ticker: String },

    #[error("Insufficient data: {available} usable rows, need at least {required}")]
    InsufficientData { available: usize, required: usize },

    #[error("Market data provider failure: {reason}")]
    Upstream { reason: String },

    #[error("Model computation failed: {reason}")]
    Computation { reason: String },
}

impl ForecastError {
    pub fn upstream(reason: impl Into<String>) -> Self {
        Self::Upstream {
            reason: reason.into(),
        }
    }

    pub fn computation(reason: impl Into<String>) -> Self {
        Self::Computation {
            reason: reason.into(),
        }
    }

    /// True for failures caused by the caller's input rather than by the
    /// provider or the model.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidTicker { .. } | Self::InvalidPeriod { .. } | Self::InsufficientData { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_carries_ticker() {
        let err = ForecastError::NotFound {
            ticker: "ZZZZQ".to_string(),
        };
        assert!(err.to_string().contains("ZZZZQ"));
        assert!(!err.is_validation());
    }

    #[test]
    fn test_insufficient_data_formatting() {
        let err = ForecastError::InsufficientData {
            available: 100,
            required: 101,
        };
        let msg = err.to_string();
        assert!(msg.contains("100"));
        assert!(msg.contains("101"));
        assert!(err.is_validation());
    }

    #[test]
    fn test_helper_constructors() {
        assert!(matches!(
            ForecastError::upstream("timeout"),
            ForecastError::Upstream { .. }
        ));
        assert!(matches!(
            ForecastError::computation("fit failed"),
            ForecastError::Computation { .. }
        ));
    }
}
