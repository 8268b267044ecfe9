//! Fit / evaluate / predict orchestration over the dataset, text and ml modules.

mod evaluate;
mod model;
mod predict;
mod run;

pub use evaluate::{EvaluateError, evaluate};
pub use model::{MODEL_FORMAT_VERSION, ModelIoError, TrainedModel};
pub use predict::{Prediction, PredictionEngine};
pub use run::{RunReport, run};

use tracing::info;

use crate::dataset::Record;
use crate::ml::calibration::PlattCalibrator;
use crate::ml::perceptron::{PerceptronOptions, TrainDataset, TrainError, train_averaged_perceptron};
use crate::text::{FeaturizerOptions, TextFeaturizer};

/// Immutable description of the featurize-then-train pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingPipeline {
    featurizer: FeaturizerOptions,
    trainer: PerceptronOptions,
    seed: u64,
}

impl TrainingPipeline {
    pub fn new(featurizer: FeaturizerOptions, trainer: PerceptronOptions, seed: u64) -> Self {
        Self {
            featurizer,
            trainer,
            seed,
        }
    }

    /// Fit the featurizer, the perceptron and its probability calibrator on `records`.
    pub fn fit(&self, records: &[Record]) -> Result<TrainedModel, TrainError> {
        if records.is_empty() {
            return Err(TrainError::EmptyTrainingSet);
        }
        let labels = records
            .iter()
            .enumerate()
            .map(|(index, record)| record.label().ok_or(TrainError::MissingLabel { index }))
            .collect::<Result<Vec<bool>, _>>()?;

        let featurizer = TextFeaturizer::fit(&self.featurizer, records.iter().map(Record::text))?;
        let dataset = TrainDataset {
            dim: featurizer.dim(),
            x: records
                .iter()
                .map(|record| featurizer.transform(record.text()))
                .collect(),
            y: labels,
        };
        let classifier = train_averaged_perceptron(&dataset, &self.trainer, self.seed)?;

        let scores: Vec<f32> = dataset.x.iter().map(|x| classifier.score(x)).collect();
        let calibrator = PlattCalibrator::fit(&scores, &dataset.y);
        info!(
            "Calibrated scores: slope={:.4} offset={:.4}",
            calibrator.slope, calibrator.offset
        );
        Ok(TrainedModel::new(featurizer, classifier, calibrator))
    }
}
