use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::ConfigError;
use crate::dataset::{LoaderOptions, SplitOptions};
use crate::ml::perceptron::PerceptronOptions;
use crate::text::FeaturizerOptions;

/// Text scored after evaluation when none is configured.
pub const DEFAULT_SAMPLE_TEXT: &str = "good movie";

/// Immutable settings for one pipeline run, one table per stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Seed for the split, weight init and shuffling. `None` draws one at random.
    pub seed: Option<u64>,
    /// Text scored by the trained model at the end of the run.
    pub sample_text: String,
    /// Optional JSON export of the trained model.
    pub model_out: Option<PathBuf>,
    pub dataset: LoaderOptions,
    pub split: SplitOptions,
    pub featurizer: FeaturizerOptions,
    pub trainer: PerceptronOptions,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            seed: None,
            sample_text: DEFAULT_SAMPLE_TEXT.to_string(),
            model_out: None,
            dataset: LoaderOptions::default(),
            split: SplitOptions::default(),
            featurizer: FeaturizerOptions::default(),
            trainer: PerceptronOptions::default(),
        }
    }
}

impl PipelineConfig {
    /// Reject settings that would make any stage fail before it starts.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.split.validate().is_err() {
            return Err(ConfigError::InvalidTestFraction(self.split.test_fraction));
        }
        if self.dataset.text_column == self.dataset.label_column {
            return Err(ConfigError::SameColumn(self.dataset.text_column));
        }
        self.featurizer.validate()?;
        self.trainer.validate().map_err(ConfigError::Trainer)?;
        Ok(())
    }

    /// The configured seed, or a fresh random one that is logged so the run can be repeated.
    pub fn resolve_seed(&self) -> u64 {
        match self.seed {
            Some(seed) => seed,
            None => {
                let seed = rand::random::<u64>();
                warn!("No seed configured; using random seed {seed}");
                seed
            }
        }
    }
}
