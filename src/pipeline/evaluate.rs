use thiserror::Error;
use tracing::{info, warn};

use super::TrainedModel;
use crate::dataset::Record;
use crate::ml::metrics::{BinaryMetrics, ScoredLabel};

#[derive(Debug, Error, PartialEq)]
pub enum EvaluateError {
    #[error("empty test set")]
    EmptyTestSet,
    #[error("test record {index} has no label")]
    MissingLabel { index: usize },
}

/// Score every held-out record and compute binary classification metrics.
pub fn evaluate(model: &TrainedModel, records: &[Record]) -> Result<BinaryMetrics, EvaluateError> {
    if records.is_empty() {
        return Err(EvaluateError::EmptyTestSet);
    }
    let engine = model.prediction_engine();
    let mut scored = Vec::with_capacity(records.len());
    for (index, record) in records.iter().enumerate() {
        let label = record.label().ok_or(EvaluateError::MissingLabel { index })?;
        let prediction = engine.predict(record);
        scored.push(ScoredLabel {
            label,
            score: prediction.score,
            probability: prediction.probability,
            predicted: prediction.predicted_label,
        });
    }

    let positives = scored.iter().filter(|s| s.label).count();
    if positives == 0 || positives == scored.len() {
        warn!(
            "Test set holds a single class ({} records); AUC is undefined and reported as 0.5",
            scored.len()
        );
    }
    let metrics = BinaryMetrics::compute(&scored);
    info!(
        "Evaluated {} records: accuracy={:.4} auc={:.4} f1={:.4} log_loss={:.4}",
        scored.len(),
        metrics.accuracy,
        metrics.auc,
        metrics.f1_score,
        metrics.log_loss
    );
    Ok(metrics)
}
