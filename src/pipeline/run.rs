use std::fmt;

use tracing::{debug, info};

use super::{Prediction, TrainedModel, TrainingPipeline, evaluate};
use crate::config::PipelineConfig;
use crate::dataset::{load_records, train_test_split};
use crate::error::PipelineError;
use crate::ml::metrics::BinaryMetrics;

const TOP_FEATURES_LOGGED: usize = 10;

/// Everything one end-to-end run produced.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub seed: u64,
    pub train_len: usize,
    pub test_len: usize,
    pub metrics: BinaryMetrics,
    pub prediction: Prediction,
    pub model: TrainedModel,
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Accuracy: {}", self.metrics.accuracy)?;
        writeln!(f, "AUC: {}", self.metrics.auc)?;
        writeln!(f, "F1 score: {}", self.metrics.f1_score)?;
        write!(f, "{}", self.prediction)
    }
}

/// Load, split, train, evaluate, then score `config.sample_text`.
pub fn run(config: &PipelineConfig) -> Result<RunReport, PipelineError> {
    config.validate()?;
    let seed = config.resolve_seed();

    let records = load_records(&config.dataset)?;
    let split = train_test_split(records, &config.split, seed)?;
    let (train_len, test_len) = (split.train.len(), split.test.len());

    let pipeline = TrainingPipeline::new(config.featurizer.clone(), config.trainer.clone(), seed);
    let model = pipeline.fit(&split.train)?;
    for (name, weight) in model.top_features(TOP_FEATURES_LOGGED) {
        debug!("feature {name:?} weight {weight:.4}");
    }

    let metrics = evaluate(&model, &split.test)?;
    if let Some(path) = &config.model_out {
        model.save(path)?;
    }

    let prediction = model.prediction_engine().predict_text(&config.sample_text);
    info!(
        "Predicted {:?} as {} (score {:.4})",
        config.sample_text,
        prediction.sentiment(),
        prediction.score
    );
    Ok(RunReport {
        seed,
        train_len,
        test_len,
        metrics,
        prediction,
        model,
    })
}
