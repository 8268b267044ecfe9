//! Averaged perceptron for binary classification over sparse features.

use serde::{Deserialize, Serialize};

use crate::ml::SparseVector;

mod train;
pub use train::{LossFunction, PerceptronOptions, TrainDataset, TrainError, train_averaged_perceptron};

/// Linear decision function `score = w·x + b`; positive scores predict `true`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerceptronModel {
    pub weights: Vec<f32>,
    pub bias: f32,
}

impl PerceptronModel {
    pub fn dim(&self) -> usize {
        self.weights.len()
    }

    /// Raw margin for a feature vector. Indices beyond the model dimension count as zero.
    pub fn score(&self, features: &SparseVector) -> f32 {
        features.dot(&self.weights) + self.bias
    }

    pub fn predict(&self, features: &SparseVector) -> bool {
        self.score(features) > 0.0
    }

    /// Check that every parameter is finite.
    pub fn validate(&self) -> Result<(), String> {
        if !self.bias.is_finite() {
            return Err("bias is not finite".to_string());
        }
        if let Some(idx) = self.weights.iter().position(|w| !w.is_finite()) {
            return Err(format!("weight {idx} is not finite"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_is_dot_plus_bias() {
        let model = PerceptronModel {
            weights: vec![0.5, -1.0, 2.0],
            bias: -0.25,
        };
        let x = SparseVector::from_pairs(3, vec![(0, 2.0), (2, 1.0)]);
        assert_eq!(model.score(&x), 2.75);
        assert!(model.predict(&x));
        assert!(!model.predict(&SparseVector::zeros(3)));
    }

    #[test]
    fn validate_rejects_non_finite_parameters() {
        let mut model = PerceptronModel {
            weights: vec![0.0, f32::NAN],
            bias: 0.0,
        };
        assert!(model.validate().is_err());
        model.weights[1] = 1.0;
        assert!(model.validate().is_ok());
        model.bias = f32::INFINITY;
        assert!(model.validate().is_err());
    }
}
