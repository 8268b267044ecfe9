//! Top-level error for an end-to-end pipeline run.

use thiserror::Error;

use crate::config::ConfigError;
use crate::dataset::{DatasetError, SplitError};
use crate::ml::perceptron::TrainError;
use crate::pipeline::{EvaluateError, ModelIoError};
use crate::text::FeaturizeError;

/// Coarse failure category of a [`PipelineError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    FileNotFound,
    Parse,
    Config,
    InsufficientData,
    Training,
    Evaluation,
    Io,
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Dataset(#[from] DatasetError),
    #[error(transparent)]
    Split(#[from] SplitError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("training failed: {0}")]
    Train(#[from] TrainError),
    #[error("evaluation failed: {0}")]
    Evaluate(#[from] EvaluateError),
    #[error(transparent)]
    Model(#[from] ModelIoError),
}

impl PipelineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PipelineError::Dataset(DatasetError::FileNotFound { .. }) => ErrorKind::FileNotFound,
            PipelineError::Dataset(err) if err.is_parse_error() => ErrorKind::Parse,
            PipelineError::Dataset(_) => ErrorKind::Io,
            PipelineError::Split(SplitError::InvalidTestFraction(_)) => ErrorKind::Config,
            PipelineError::Split(SplitError::NotEnoughRecords { .. }) => {
                ErrorKind::InsufficientData
            }
            PipelineError::Config(ConfigError::Read { source, .. })
                if source.kind() == std::io::ErrorKind::NotFound =>
            {
                ErrorKind::FileNotFound
            }
            PipelineError::Config(_) => ErrorKind::Config,
            PipelineError::Train(
                TrainError::InvalidOptions(_) | TrainError::Featurize(FeaturizeError::NoNgrams),
            ) => ErrorKind::Config,
            PipelineError::Train(_) => ErrorKind::Training,
            PipelineError::Evaluate(_) => ErrorKind::Evaluation,
            PipelineError::Model(_) => ErrorKind::Io,
        }
    }
}
