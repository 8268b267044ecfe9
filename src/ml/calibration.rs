//! Platt scaling: maps raw classifier scores to probabilities.
//!
//! Fits `P(y = 1 | s) = 1 / (1 + exp(A·s + B))` by Newton's method with a
//! backtracking line search, using the smoothed targets of Lin, Lin and Weng
//! ("A note on Platt's probabilistic outputs for support vector machines").

use serde::{Deserialize, Serialize};
use tracing::debug;

const MAX_ITERATIONS: usize = 100;
const MIN_STEP: f64 = 1e-10;
const HESSIAN_RIDGE: f64 = 1e-12;
const GRADIENT_TOLERANCE: f64 = 1e-5;

/// Sigmoid parameters; `slope` is negative when higher scores mean positive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlattCalibrator {
    pub slope: f64,
    pub offset: f64,
}

impl Default for PlattCalibrator {
    /// Plain logistic of the score.
    fn default() -> Self {
        Self {
            slope: -1.0,
            offset: 0.0,
        }
    }
}

impl PlattCalibrator {
    /// Fit on paired scores and labels. Empty input yields the default sigmoid.
    pub fn fit(scores: &[f32], labels: &[bool]) -> Self {
        let n = scores.len().min(labels.len());
        if n == 0 {
            return Self::default();
        }
        let scores: Vec<f64> = scores[..n].iter().map(|&s| f64::from(s)).collect();
        let labels = &labels[..n];
        let positives = labels.iter().filter(|&&label| label).count() as f64;
        let negatives = n as f64 - positives;
        let hi = (positives + 1.0) / (positives + 2.0);
        let lo = 1.0 / (negatives + 2.0);
        let targets: Vec<f64> = labels
            .iter()
            .map(|&label| if label { hi } else { lo })
            .collect();

        let mut a = 0.0f64;
        let mut b = ((negatives + 1.0) / (positives + 1.0)).ln();
        let mut fval = objective(&scores, &targets, a, b);

        for iteration in 0..MAX_ITERATIONS {
            let mut h11 = HESSIAN_RIDGE;
            let mut h22 = HESSIAN_RIDGE;
            let mut h21 = 0.0;
            let mut g1 = 0.0;
            let mut g2 = 0.0;
            for (&s, &t) in scores.iter().zip(&targets) {
                let (p, q) = split_sigmoid(s * a + b);
                let d2 = p * q;
                h11 += s * s * d2;
                h22 += d2;
                h21 += s * d2;
                let d1 = t - p;
                g1 += s * d1;
                g2 += d1;
            }
            if g1.abs() < GRADIENT_TOLERANCE && g2.abs() < GRADIENT_TOLERANCE {
                debug!(iteration, "platt calibration converged");
                break;
            }

            let det = h11 * h22 - h21 * h21;
            let da = -(h22 * g1 - h21 * g2) / det;
            let db = -(-h21 * g1 + h11 * g2) / det;
            let gd = g1 * da + g2 * db;

            let mut step = 1.0;
            while step >= MIN_STEP {
                let new_a = a + step * da;
                let new_b = b + step * db;
                let new_f = objective(&scores, &targets, new_a, new_b);
                if new_f < fval + 1e-4 * step * gd {
                    a = new_a;
                    b = new_b;
                    fval = new_f;
                    break;
                }
                step /= 2.0;
            }
            if step < MIN_STEP {
                debug!(iteration, "platt line search stalled");
                break;
            }
        }

        Self {
            slope: a,
            offset: b,
        }
    }

    /// Calibrated probability of the positive class.
    pub fn probability(&self, score: f32) -> f32 {
        split_sigmoid(self.slope * f64::from(score) + self.offset).0 as f32
    }
}

/// For `z = A·s + B`, return `(1 / (1 + e^z), e^z / (1 + e^z))` without overflow.
fn split_sigmoid(z: f64) -> (f64, f64) {
    if z >= 0.0 {
        let e = (-z).exp();
        (e / (1.0 + e), 1.0 / (1.0 + e))
    } else {
        let e = z.exp();
        (1.0 / (1.0 + e), e / (1.0 + e))
    }
}

/// Cross-entropy of the smoothed targets.
fn objective(scores: &[f64], targets: &[f64], a: f64, b: f64) -> f64 {
    scores
        .iter()
        .zip(targets)
        .map(|(&s, &t)| {
            let z = s * a + b;
            if z >= 0.0 {
                t * z + (-z).exp().ln_1p()
            } else {
                (t - 1.0) * z + z.exp().ln_1p()
            }
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn higher_scores_get_higher_probability() {
        let scores = [-3.0, -2.0, -1.5, -0.5, 0.2, 0.5, 1.0, 2.0, 2.5, 3.0];
        let labels = [false, false, false, true, false, true, true, true, true, true];
        let calibrator = PlattCalibrator::fit(&scores, &labels);
        assert!(calibrator.slope < 0.0);
        let low = calibrator.probability(-2.0);
        let mid = calibrator.probability(0.0);
        let high = calibrator.probability(2.0);
        assert!(low < mid && mid < high);
        assert!(low < 0.5 && high > 0.5);
    }

    #[test]
    fn probabilities_stay_in_unit_interval_for_extreme_scores() {
        let calibrator = PlattCalibrator::fit(&[-1.0, 1.0], &[false, true]);
        for score in [-1e6f32, -50.0, 0.0, 50.0, 1e6] {
            let p = calibrator.probability(score);
            assert!((0.0..=1.0).contains(&p), "p={p} for {score}");
        }
    }

    #[test]
    fn single_class_input_still_fits() {
        let calibrator = PlattCalibrator::fit(&[0.5, 1.0, 1.5], &[true, true, true]);
        assert!(calibrator.slope.is_finite() && calibrator.offset.is_finite());
        assert!(calibrator.probability(1.0) > 0.5);
    }

    #[test]
    fn empty_input_is_plain_logistic() {
        let calibrator = PlattCalibrator::fit(&[], &[]);
        assert_eq!(calibrator, PlattCalibrator::default());
        assert!((calibrator.probability(0.0) - 0.5).abs() < 1e-6);
    }
}
