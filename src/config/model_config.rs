//! Classifier configuration parsing from environment variables.

use super::{Lookup, parse_or};
use anyhow::{Result, bail};

/// Random forest hyperparameters and evaluation split
#[derive(Debug, Clone, PartialEq)]
pub struct ModelConfig {
    pub n_trees: u16,
    /// Minimum samples required to split an internal node
    pub min_samples_split: usize,
    pub seed: u64,
    /// Number of trailing rows held out for evaluation
    pub evaluation_window: usize,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            n_trees: 100,
            min_samples_split: 10,
            seed: 1,
            evaluation_window: 100,
        }
    }
}

impl ModelConfig {
    pub fn from_lookup(lookup: Lookup<'_>) -> Result<Self> {
        let defaults = Self::default();
        let config = Self {
            n_trees: parse_or(lookup, "MODEL_N_TREES", defaults.n_trees)?,
            min_samples_split: parse_or(
                lookup,
                "MODEL_MIN_SAMPLES_SPLIT",
                defaults.min_samples_split,
            )?,
            seed: parse_or(lookup, "MODEL_SEED", defaults.seed)?,
            evaluation_window: parse_or(
                lookup,
                "MODEL_EVALUATION_WINDOW",
                defaults.evaluation_window,
            )?,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Smallest number of enriched rows `train` accepts
    pub fn min_rows(&self) -> usize {
        self.evaluation_window + 1
    }

    pub fn validate(&self) -> Result<()> {
        if self.n_trees == 0 {
            bail!("MODEL_N_TREES must be at least 1");
        }
        if self.min_samples_split < 2 {
            bail!("MODEL_MIN_SAMPLES_SPLIT must be at least 2");
        }
        if self.evaluation_window == 0 {
            bail!("MODEL_EVALUATION_WINDOW must be at least 1");
        }
        Ok(())
    }
}
