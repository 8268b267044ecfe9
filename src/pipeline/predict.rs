use std::fmt;

use serde::Serialize;

use super::TrainedModel;
use crate::dataset::Record;

/// Model output for one record, carried alongside the record itself.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub record: Record,
    pub predicted_label: bool,
    /// Calibrated probability of the positive class.
    pub probability: f32,
    /// Raw perceptron margin.
    pub score: f32,
}

impl Prediction {
    pub fn sentiment(&self) -> &'static str {
        if self.predicted_label {
            "Positive"
        } else {
            "Negative"
        }
    }
}

impl fmt::Display for Prediction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Predicted sentiment: {}", self.sentiment())?;
        writeln!(f, "Probability: {}", self.probability)?;
        write!(f, "Score: {}", self.score)
    }
}

/// Borrowing single-record scorer over a trained model.
#[derive(Debug, Clone, Copy)]
pub struct PredictionEngine<'a> {
    model: &'a TrainedModel,
}

impl<'a> PredictionEngine<'a> {
    pub fn new(model: &'a TrainedModel) -> Self {
        Self { model }
    }

    /// Score one record; its label, if any, is ignored.
    pub fn predict(&self, record: &Record) -> Prediction {
        let features = self.model.featurize(record.text());
        let score = self.model.classifier().score(&features);
        Prediction {
            record: record.clone(),
            predicted_label: score > 0.0,
            probability: self.model.calibrator().probability(score),
            score,
        }
    }

    pub fn predict_text(&self, text: &str) -> Prediction {
        self.predict(&Record::unlabeled(text))
    }
}
