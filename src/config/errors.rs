use std::path::PathBuf;

use thiserror::Error;

use crate::ml::perceptron::TrainError;
use crate::text::FeaturizeError;

/// Errors that may occur while loading or validating the run configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to create the config directory.
    #[error("Unable to create config directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to read a config file.
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to parse TOML config.
    #[error("Invalid config at {path}: {source}")]
    ParseToml {
        path: PathBuf,
        source: toml::de::Error,
    },
    /// No usable config directory found.
    #[error("No suitable config directory found")]
    NoConfigDir,
    #[error("test fraction must lie strictly between 0 and 1 (got {0})")]
    InvalidTestFraction(f64),
    #[error("text and label both read column {0}")]
    SameColumn(usize),
    #[error("invalid featurizer settings: {0}")]
    Featurizer(#[from] FeaturizeError),
    #[error("invalid trainer settings: {0}")]
    Trainer(TrainError),
}
