//! Evaluation metrics for binary classifiers.

use std::fmt;

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

const PROBABILITY_EPSILON: f64 = 1e-15;

/// Confusion counts with `true` as the positive class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinaryConfusionMatrix {
    pub true_positives: u32,
    pub false_positives: u32,
    pub true_negatives: u32,
    pub false_negatives: u32,
}

impl BinaryConfusionMatrix {
    pub fn add(&mut self, truth: bool, predicted: bool) {
        let slot = match (truth, predicted) {
            (true, true) => &mut self.true_positives,
            (false, true) => &mut self.false_positives,
            (false, false) => &mut self.true_negatives,
            (true, false) => &mut self.false_negatives,
        };
        *slot = slot.saturating_add(1);
    }

    pub fn total(&self) -> u32 {
        self.true_positives + self.false_positives + self.true_negatives + self.false_negatives
    }

    /// `(TP + TN) / total`.
    pub fn accuracy(&self) -> f64 {
        ratio(self.true_positives + self.true_negatives, self.total())
    }

    /// `TP / (TP + FP)`.
    pub fn positive_precision(&self) -> f64 {
        ratio(self.true_positives, self.true_positives + self.false_positives)
    }

    /// `TP / (TP + FN)`.
    pub fn positive_recall(&self) -> f64 {
        ratio(self.true_positives, self.true_positives + self.false_negatives)
    }

    /// `TN / (TN + FN)`.
    pub fn negative_precision(&self) -> f64 {
        ratio(self.true_negatives, self.true_negatives + self.false_negatives)
    }

    /// `TN / (TN + FP)`.
    pub fn negative_recall(&self) -> f64 {
        ratio(self.true_negatives, self.true_negatives + self.false_positives)
    }

    pub fn f1_score(&self) -> f64 {
        f1_score(self.positive_precision(), self.positive_recall())
    }
}

impl fmt::Display for BinaryConfusionMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "            pred+  pred-")?;
        writeln!(
            f,
            "truth+  {:>7}{:>7}",
            self.true_positives, self.false_negatives
        )?;
        write!(
            f,
            "truth-  {:>7}{:>7}",
            self.false_positives, self.true_negatives
        )
    }
}

/// Metrics for a binary classifier over a labeled evaluation set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinaryMetrics {
    pub accuracy: f64,
    /// Area under the ROC curve; 0.5 when only one class is present.
    pub auc: f64,
    pub f1_score: f64,
    pub positive_precision: f64,
    pub positive_recall: f64,
    pub negative_precision: f64,
    pub negative_recall: f64,
    /// Mean cross-entropy in bits.
    pub log_loss: f64,
    /// Relative log-loss improvement over predicting the label prior.
    pub log_loss_reduction: f64,
    /// Average precision (area under the precision-recall curve).
    pub area_under_precision_recall_curve: f64,
    pub confusion_matrix: BinaryConfusionMatrix,
}

/// One evaluated example.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredLabel {
    pub label: bool,
    pub score: f32,
    pub probability: f32,
    pub predicted: bool,
}

impl BinaryMetrics {
    /// Compute every metric; AUC falls back to 0.5 when it is undefined.
    pub fn compute(examples: &[ScoredLabel]) -> Self {
        let mut confusion = BinaryConfusionMatrix::default();
        for example in examples {
            confusion.add(example.label, example.predicted);
        }
        let labels: Vec<bool> = examples.iter().map(|e| e.label).collect();
        let scores: Vec<f32> = examples.iter().map(|e| e.score).collect();
        let probabilities: Vec<f32> = examples.iter().map(|e| e.probability).collect();

        let log_loss = log_loss(&probabilities, &labels);
        let prior = prior_entropy(&labels);
        let log_loss_reduction = if prior > 0.0 {
            (prior - log_loss) / prior
        } else {
            0.0
        };

        Self {
            accuracy: confusion.accuracy(),
            auc: area_under_roc_curve(&scores, &labels).unwrap_or(0.5),
            f1_score: confusion.f1_score(),
            positive_precision: confusion.positive_precision(),
            positive_recall: confusion.positive_recall(),
            negative_precision: confusion.negative_precision(),
            negative_recall: confusion.negative_recall(),
            log_loss,
            log_loss_reduction,
            area_under_precision_recall_curve: average_precision(&scores, &labels),
            confusion_matrix: confusion,
        }
    }
}

/// Harmonic mean of precision and recall; 0 when both are 0.
pub fn f1_score(precision: f64, recall: f64) -> f64 {
    if precision + recall == 0.0 {
        0.0
    } else {
        2.0 * precision * recall / (precision + recall)
    }
}

/// ROC AUC via the rank-sum statistic; tied scores share their average rank.
///
/// Returns `None` unless both classes are present.
pub fn area_under_roc_curve(scores: &[f32], labels: &[bool]) -> Option<f64> {
    let mut pairs: Vec<(OrderedFloat<f32>, bool)> = scores
        .iter()
        .zip(labels)
        .map(|(&score, &label)| (OrderedFloat(score), label))
        .collect();
    let positives = pairs.iter().filter(|(_, label)| *label).count() as f64;
    let negatives = pairs.len() as f64 - positives;
    if positives == 0.0 || negatives == 0.0 {
        return None;
    }
    pairs.sort_by_key(|&(score, _)| score);

    let mut positive_rank_sum = 0.0f64;
    let mut start = 0usize;
    while start < pairs.len() {
        let mut end = start;
        while end < pairs.len() && pairs[end].0 == pairs[start].0 {
            end += 1;
        }
        // Ranks are 1-based: the group spans ranks start+1 ..= end.
        let average_rank = (start + 1 + end) as f64 / 2.0;
        let group_positives = pairs[start..end].iter().filter(|(_, label)| *label).count();
        positive_rank_sum += average_rank * group_positives as f64;
        start = end;
    }
    Some((positive_rank_sum - positives * (positives + 1.0) / 2.0) / (positives * negatives))
}

/// Average precision over descending score thresholds, ties handled as one threshold.
pub fn average_precision(scores: &[f32], labels: &[bool]) -> f64 {
    let mut pairs: Vec<(OrderedFloat<f32>, bool)> = scores
        .iter()
        .zip(labels)
        .map(|(&score, &label)| (OrderedFloat(score), label))
        .collect();
    let positives = pairs.iter().filter(|(_, label)| *label).count();
    if positives == 0 {
        return 0.0;
    }
    pairs.sort_by(|a, b| b.0.cmp(&a.0));

    let mut true_positives = 0usize;
    let mut seen = 0usize;
    let mut previous_recall = 0.0f64;
    let mut area = 0.0f64;
    let mut start = 0usize;
    while start < pairs.len() {
        let mut end = start;
        while end < pairs.len() && pairs[end].0 == pairs[start].0 {
            if pairs[end].1 {
                true_positives += 1;
            }
            end += 1;
        }
        seen += end - start;
        let recall = true_positives as f64 / positives as f64;
        let precision = true_positives as f64 / seen as f64;
        area += (recall - previous_recall) * precision;
        previous_recall = recall;
        start = end;
    }
    area
}

/// Mean binary cross-entropy in bits, with probabilities clamped away from 0 and 1.
pub fn log_loss(probabilities: &[f32], labels: &[bool]) -> f64 {
    let n = probabilities.len().min(labels.len());
    if n == 0 {
        return 0.0;
    }
    let total: f64 = probabilities
        .iter()
        .zip(labels)
        .map(|(&p, &label)| {
            let p = f64::from(p).clamp(PROBABILITY_EPSILON, 1.0 - PROBABILITY_EPSILON);
            if label { -p.log2() } else { -(1.0 - p).log2() }
        })
        .sum();
    total / n as f64
}

/// Entropy (bits) of the empirical label distribution.
fn prior_entropy(labels: &[bool]) -> f64 {
    if labels.is_empty() {
        return 0.0;
    }
    let p = labels.iter().filter(|&&label| label).count() as f64 / labels.len() as f64;
    if p == 0.0 || p == 1.0 {
        return 0.0;
    }
    -(p * p.log2() + (1.0 - p) * (1.0 - p).log2())
}

fn ratio(numerator: u32, denominator: u32) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        f64::from(numerator) / f64::from(denominator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn confusion_counts_and_rates() {
        // 3 TP, 1 FP, 2 TN, 1 FN
        let truth = [true, true, true, false, false, false, true];
        let preds = [true, true, true, true, false, false, false];
        let mut cm = BinaryConfusionMatrix::default();
        for (&t, &p) in truth.iter().zip(&preds) {
            cm.add(t, p);
        }
        assert_eq!(cm.true_positives, 3);
        assert_eq!(cm.false_positives, 1);
        assert_eq!(cm.true_negatives, 2);
        assert_eq!(cm.false_negatives, 1);
        assert!(close(cm.accuracy(), 5.0 / 7.0));
        assert!(close(cm.positive_precision(), 0.75));
        assert!(close(cm.positive_recall(), 0.75));
        assert!(close(cm.negative_precision(), 2.0 / 3.0));
        assert!(close(cm.negative_recall(), 2.0 / 3.0));
        assert!(close(cm.f1_score(), 0.75));
    }

    #[test]
    fn empty_matrix_reports_zeros() {
        let cm = BinaryConfusionMatrix::default();
        assert_eq!(cm.accuracy(), 0.0);
        assert_eq!(cm.f1_score(), 0.0);
    }

    #[test]
    fn auc_perfect_inverted_and_tied() {
        let labels = [false, false, true, true];
        assert_eq!(area_under_roc_curve(&[0.1, 0.2, 0.8, 0.9], &labels), Some(1.0));
        assert_eq!(area_under_roc_curve(&[0.9, 0.8, 0.2, 0.1], &labels), Some(0.0));
        assert_eq!(area_under_roc_curve(&[0.5, 0.5, 0.5, 0.5], &labels), Some(0.5));
    }

    #[test]
    fn auc_counts_partial_ordering() {
        // Pairs (pos, neg): 0.7>0.3, 0.7>0.6, 0.4>0.3, 0.4<0.6 -> 3/4.
        let auc = area_under_roc_curve(&[0.3, 0.6, 0.4, 0.7], &[false, false, true, true]);
        assert!(close(auc.unwrap(), 0.75));
    }

    #[test]
    fn auc_undefined_for_single_class() {
        assert_eq!(area_under_roc_curve(&[0.1, 0.9], &[true, true]), None);
    }

    #[test]
    fn average_precision_cases() {
        assert!(close(average_precision(&[0.9, 0.8, 0.1], &[true, true, false]), 1.0));
        // Ranked: pos, neg, pos -> (1/2)*1 + (1/2)*(2/3)
        let ap = average_precision(&[0.9, 0.5, 0.1], &[true, false, true]);
        assert!(close(ap, 0.5 + 1.0 / 3.0));
        assert_eq!(average_precision(&[0.4], &[false]), 0.0);
    }

    #[test]
    fn log_loss_of_coin_flip_is_one_bit() {
        assert!(close(log_loss(&[0.5, 0.5], &[true, false]), 1.0));
        assert!(log_loss(&[0.0], &[true]).is_finite());
    }

    #[test]
    fn compute_combines_everything() {
        let examples: Vec<ScoredLabel> = [
            (true, 2.0, 0.9),
            (true, 0.5, 0.6),
            (false, -1.0, 0.2),
            (false, 0.2, 0.55),
        ]
        .into_iter()
        .map(|(label, score, probability)| ScoredLabel {
            label,
            score,
            probability,
            predicted: score > 0.0,
        })
        .collect();
        let metrics = BinaryMetrics::compute(&examples);
        assert!(close(metrics.accuracy, 0.75));
        assert!(close(metrics.auc, 1.0));
        assert!(close(metrics.f1_score, 0.8));
        assert!(metrics.log_loss_reduction > 0.0);
        assert_eq!(metrics.confusion_matrix.total(), 4);
    }
}
