use rand::rngs::StdRng;
use rand::{Rng, SeedableRng, seq::SliceRandom};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use super::PerceptronModel;
use crate::ml::SparseVector;
use crate::text::FeaturizeError;

#[derive(Debug, Error, PartialEq)]
pub enum TrainError {
    #[error("empty training set")]
    EmptyTrainingSet,
    #[error("training record {index} has no label")]
    MissingLabel { index: usize },
    #[error("mismatched training inputs/labels ({inputs} vs {labels})")]
    LengthMismatch { inputs: usize, labels: usize },
    #[error("training row {index} has dimension {found} (expected {expected})")]
    DimensionMismatch {
        index: usize,
        expected: usize,
        found: usize,
    },
    #[error("invalid trainer options: {0}")]
    InvalidOptions(String),
    #[error("featurizer: {0}")]
    Featurize(#[from] FeaturizeError),
    #[error("training diverged: {0}")]
    Diverged(String),
}

/// Loss whose derivative drives the perceptron update.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LossFunction {
    /// `max(0, margin - y·s)`.
    Hinge { margin: f32 },
    /// `ln(1 + exp(-y·s))`.
    Log,
    /// Hinge with a quadratic region of width `smoothing` below the margin of 1.
    SmoothedHinge { smoothing: f32 },
}

impl Default for LossFunction {
    fn default() -> Self {
        Self::Hinge { margin: 1.0 }
    }
}

impl LossFunction {
    /// Derivative of the loss with respect to the score, for `y` in `{-1, +1}`.
    pub fn derivative(&self, score: f32, y: f32) -> f32 {
        let z = y * score;
        match *self {
            Self::Hinge { margin } => {
                if z < margin {
                    -y
                } else {
                    0.0
                }
            }
            Self::Log => -y / (1.0 + z.exp()),
            Self::SmoothedHinge { smoothing } => {
                if z >= 1.0 {
                    0.0
                } else if z <= 1.0 - smoothing {
                    -y
                } else {
                    -y * (1.0 - z) / smoothing
                }
            }
        }
    }

    fn validate(&self) -> Result<(), String> {
        match *self {
            Self::Hinge { margin } if !margin.is_finite() || margin < 0.0 => {
                Err(format!("hinge margin must be >= 0 (got {margin})"))
            }
            Self::SmoothedHinge { smoothing } if !smoothing.is_finite() || smoothing <= 0.0 => {
                Err(format!("smoothing must be > 0 (got {smoothing})"))
            }
            _ => Ok(()),
        }
    }
}

/// Training options for the averaged perceptron.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerceptronOptions {
    pub number_of_iterations: usize,
    pub learning_rate: f32,
    /// Divide the learning rate by `sqrt(t)`, `t` counting examples seen.
    pub decrease_learning_rate: bool,
    /// Shrinks the weights touched by each update.
    pub l2_regularization: f32,
    /// Initial weights are drawn from `[-d/2, d/2]`; 0 starts from zeros.
    pub initial_weights_diameter: f32,
    pub shuffle: bool,
    pub loss: LossFunction,
}

impl Default for PerceptronOptions {
    fn default() -> Self {
        Self {
            number_of_iterations: 10,
            learning_rate: 1.0,
            decrease_learning_rate: false,
            l2_regularization: 0.0,
            initial_weights_diameter: 0.0,
            shuffle: true,
            loss: LossFunction::default(),
        }
    }
}

impl PerceptronOptions {
    pub fn validate(&self) -> Result<(), TrainError> {
        if self.number_of_iterations == 0 {
            return Err(TrainError::InvalidOptions(
                "number_of_iterations must be > 0".to_string(),
            ));
        }
        if !self.learning_rate.is_finite() || self.learning_rate <= 0.0 {
            return Err(TrainError::InvalidOptions(format!(
                "learning_rate must be > 0 (got {})",
                self.learning_rate
            )));
        }
        if !self.l2_regularization.is_finite() || self.l2_regularization < 0.0 {
            return Err(TrainError::InvalidOptions(format!(
                "l2_regularization must be >= 0 (got {})",
                self.l2_regularization
            )));
        }
        if !self.initial_weights_diameter.is_finite() || self.initial_weights_diameter < 0.0 {
            return Err(TrainError::InvalidOptions(format!(
                "initial_weights_diameter must be >= 0 (got {})",
                self.initial_weights_diameter
            )));
        }
        self.loss.validate().map_err(TrainError::InvalidOptions)
    }
}

/// In-memory featurized training set.
#[derive(Debug, Clone)]
pub struct TrainDataset {
    pub dim: usize,
    pub x: Vec<SparseVector>,
    pub y: Vec<bool>,
}

/// Fit an averaged perceptron.
///
/// The returned weights are the average of the weight vector over every
/// example step, tracked lazily: each update `delta` made at step `c` also adds
/// `c * delta` to an accumulator, and the average is `w - acc / c_final`.
pub fn train_averaged_perceptron(
    dataset: &TrainDataset,
    options: &PerceptronOptions,
    seed: u64,
) -> Result<PerceptronModel, TrainError> {
    options.validate()?;
    if dataset.x.is_empty() {
        return Err(TrainError::EmptyTrainingSet);
    }
    if dataset.x.len() != dataset.y.len() {
        return Err(TrainError::LengthMismatch {
            inputs: dataset.x.len(),
            labels: dataset.y.len(),
        });
    }
    let dim = dataset.dim;
    if let Some((index, row)) = dataset.x.iter().enumerate().find(|(_, row)| row.dim() != dim) {
        return Err(TrainError::DimensionMismatch {
            index,
            expected: dim,
            found: row.dim(),
        });
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut weights = vec![0.0f64; dim];
    let mut bias = 0.0f64;
    let diameter = f64::from(options.initial_weights_diameter);
    if diameter > 0.0 {
        for w in &mut weights {
            *w = (rng.random::<f64>() - 0.5) * diameter;
        }
        bias = (rng.random::<f64>() - 0.5) * diameter;
    }
    let mut weight_acc = vec![0.0f64; dim];
    let mut bias_acc = 0.0f64;

    let base_rate = f64::from(options.learning_rate);
    let l2 = f64::from(options.l2_regularization);
    let mut step = 1.0f64;
    let mut order: Vec<usize> = (0..dataset.x.len()).collect();
    let mut last_updates = 0usize;

    for iteration in 0..options.number_of_iterations {
        if options.shuffle {
            order.shuffle(&mut rng);
        }
        let mut updates = 0usize;
        for &idx in &order {
            let x = &dataset.x[idx];
            let y = if dataset.y[idx] { 1.0f32 } else { -1.0f32 };
            let score = bias + x.iter().map(|(j, v)| weights[j] * f64::from(v)).sum::<f64>();
            let derivative = f64::from(options.loss.derivative(score as f32, y));
            if derivative != 0.0 {
                let rate = if options.decrease_learning_rate {
                    base_rate / step.sqrt()
                } else {
                    base_rate
                };
                let delta = -rate * derivative;
                for (j, v) in x.iter() {
                    let change = delta * f64::from(v) - rate * l2 * weights[j];
                    weights[j] += change;
                    weight_acc[j] += step * change;
                }
                bias += delta;
                bias_acc += step * delta;
                updates += 1;
            }
            step += 1.0;
        }
        debug!(iteration, updates, "perceptron pass");
        last_updates = updates;
    }

    let model = PerceptronModel {
        weights: weights
            .iter()
            .zip(&weight_acc)
            .map(|(w, acc)| (w - acc / step) as f32)
            .collect(),
        bias: (bias - bias_acc / step) as f32,
    };
    model.validate().map_err(TrainError::Diverged)?;
    info!(
        "Trained averaged perceptron on {} rows x {} features ({} iterations, {} updates in final pass)",
        dataset.x.len(),
        dim,
        options.number_of_iterations,
        last_updates
    );
    Ok(model)
}
