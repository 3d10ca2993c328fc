//! Evaluation metrics for assessing match quality.
//!
//! Scores each labeled pair of a [`TrainingSet`], predicts a match when the
//! similarity reaches a threshold, and reports precision, recall and
//! F-score against the labels.

use crate::algorithms::Similarity;
use crate::optimize::dataset::TrainingSet;
use crate::PARALLEL_THRESHOLD;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Confusion matrix values for classification evaluation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    /// True positives: correctly predicted matches
    pub true_positives: usize,
    /// False positives: incorrectly predicted matches
    pub false_positives: usize,
    /// False negatives: missed matches
    pub false_negatives: usize,
    /// True negatives: correctly rejected non-matches
    pub true_negatives: usize,
}

impl ConfusionMatrix {
    /// Tally predictions against labels, position by position.
    pub fn from_predictions<I>(outcomes: I) -> Self
    where
        I: IntoIterator<Item = (bool, bool)>,
    {
        let mut cm = Self::default();
        for (predicted, actual) in outcomes {
            cm.record(predicted, actual);
        }
        cm
    }

    /// Add one `(predicted, actual)` outcome.
    pub fn record(&mut self, predicted: bool, actual: bool) {
        match (predicted, actual) {
            (true, true) => self.true_positives += 1,
            (true, false) => self.false_positives += 1,
            (false, true) => self.false_negatives += 1,
            (false, false) => self.true_negatives += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.true_positives + self.false_positives + self.false_negatives + self.true_negatives
    }

    /// Calculate precision from confusion matrix values.
    pub fn precision(&self) -> f64 {
        let denominator = self.true_positives + self.false_positives;
        if denominator == 0 {
            if self.false_negatives == 0 {
                1.0 // No predictions and no actual positives = perfect
            } else {
                0.0 // No predictions but there were actual positives
            }
        } else {
            self.true_positives as f64 / denominator as f64
        }
    }

    /// Calculate recall from confusion matrix values.
    pub fn recall(&self) -> f64 {
        let denominator = self.true_positives + self.false_negatives;
        if denominator == 0 {
            if self.false_positives == 0 {
                1.0 // No actual positives and no false positives = perfect
            } else {
                0.0 // No actual positives but there were predictions
            }
        } else {
            self.true_positives as f64 / denominator as f64
        }
    }

    /// Fraction of pairs classified correctly; 1.0 when empty.
    pub fn accuracy(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            1.0
        } else {
            (self.true_positives + self.true_negatives) as f64 / total as f64
        }
    }

    /// Calculate F-beta score from confusion matrix values.
    ///
    /// F1 score (beta=1.0) gives equal weight to precision and recall.
    /// F0.5 (beta=0.5) weighs precision higher than recall.
    /// F2 (beta=2.0) weighs recall higher than precision.
    pub fn f_score(&self, beta: f64) -> f64 {
        let p = self.precision();
        let r = self.recall();
        if p + r == 0.0 {
            0.0
        } else {
            let beta_sq = beta * beta;
            (1.0 + beta_sq) * p * r / (beta_sq * p + r)
        }
    }

    pub fn f1(&self) -> f64 {
        self.f_score(1.0)
    }
}

fn pair_scores<S: Similarity + ?Sized>(scorer: &S, pairs: &TrainingSet) -> Vec<f64> {
    if pairs.len() >= PARALLEL_THRESHOLD {
        pairs
            .pairs()
            .par_iter()
            .map(|p| scorer.similarity(&p.left, &p.right))
            .collect()
    } else {
        pairs.iter().map(|p| scorer.similarity(&p.left, &p.right)).collect()
    }
}

fn classify(scores: &[f64], pairs: &TrainingSet, threshold: f64) -> ConfusionMatrix {
    ConfusionMatrix::from_predictions(
        scores
            .iter()
            .zip(pairs)
            .map(|(&score, pair)| (score >= threshold, pair.matching)),
    )
}

/// Classify each pair as a match when its similarity is at least
/// `threshold` and compare against the labels.
///
/// # Arguments
/// * `scorer` - Any similarity metric, typically a configured `SoftBisim`
/// * `pairs` - Labeled ground truth
/// * `threshold` - Minimum similarity for a predicted match
pub fn evaluate_threshold<S: Similarity + ?Sized>(
    scorer: &S,
    pairs: &TrainingSet,
    threshold: f64,
) -> ConfusionMatrix {
    classify(&pair_scores(scorer, pairs), pairs, threshold)
}

/// Threshold with the highest F1 on `pairs`, with its confusion matrix.
///
/// Every observed similarity is tried as a threshold; ties keep the higher
/// threshold. Returns `None` for an empty set.
pub fn best_threshold<S: Similarity + ?Sized>(
    scorer: &S,
    pairs: &TrainingSet,
) -> Option<(f64, ConfusionMatrix)> {
    let scores = pair_scores(scorer, pairs);
    let mut candidates: Vec<f64> = scores.iter().copied().filter(|s| !s.is_nan()).collect();
    candidates.sort_by(|a, b| b.total_cmp(a));
    candidates.dedup();

    let mut best: Option<(f64, ConfusionMatrix)> = None;
    for threshold in candidates {
        let cm = classify(&scores, pairs, threshold);
        if best.as_ref().map_or(true, |(_, b)| cm.f1() > b.f1()) {
            best = Some((threshold, cm));
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::normalize::NormalizationMode;
    use crate::algorithms::soft_bisim::SoftBisim;
    use crate::algorithms::weights::CostModel;
    use crate::optimize::dataset::LabeledPair;

    fn labeled() -> TrainingSet {
        TrainingSet::new(vec![
            LabeledPair::positive("Schwarz", "Schwartz"),
            LabeledPair::positive("Шварц", "Swarz"),
            LabeledPair::negative("Schwarz", "Kowalczyk"),
            LabeledPair::negative("Juan", "Abramowitz"),
        ])
    }

    #[test]
    fn test_record() {
        let cm = ConfusionMatrix::from_predictions([(true, true), (true, false), (false, true), (false, false), (true, true)]);
        assert_eq!(cm.true_positives, 2);
        assert_eq!(cm.false_positives, 1);
        assert_eq!(cm.false_negatives, 1);
        assert_eq!(cm.true_negatives, 1);
        assert_eq!(cm.total(), 5);
        assert!((cm.precision() - 2.0 / 3.0).abs() < 1e-12);
        assert!((cm.recall() - 2.0 / 3.0).abs() < 1e-12);
        assert!((cm.accuracy() - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_precision_empty() {
        let cm = ConfusionMatrix::default();
        assert_eq!(cm.precision(), 1.0);
        assert_eq!(cm.recall(), 1.0);
        assert_eq!(cm.f1(), 1.0);
    }

    #[test]
    fn test_f_score_zero() {
        let cm = ConfusionMatrix {
            false_positives: 1,
            false_negatives: 1,
            ..Default::default()
        };
        assert_eq!(cm.f1(), 0.0);
    }

    #[test]
    fn test_evaluate_threshold() {
        let scorer = SoftBisim::default();
        let cm = evaluate_threshold(&scorer, &labeled(), 0.9);
        assert_eq!(cm.true_positives, 2);
        assert_eq!(cm.false_negatives, 0);
        assert_eq!(cm.false_positives, 0);
        assert_eq!(cm.f1(), 1.0);

        // Everything is a match at a threshold no score can miss
        let cm = evaluate_threshold(&scorer, &labeled(), f64::NEG_INFINITY);
        assert_eq!(cm.false_positives, 2);
        assert_eq!(cm.recall(), 1.0);
    }

    #[test]
    fn test_best_threshold() {
        let scorer = SoftBisim::with_normalizer(CostModel::balanced(), NormalizationMode::Lowercase).unwrap();
        let set = TrainingSet::new(vec![
            LabeledPair::positive("abcdef", "abcdef"),
            LabeledPair::positive("abcdef", "abcdeg"),
            LabeledPair::negative("abcdef", "uvwxyz"),
        ]);
        let (threshold, cm) = best_threshold(&scorer, &set).unwrap();
        assert_eq!(cm.f1(), 1.0);
        assert!(threshold > scorer.score("abcdef", "uvwxyz"));
        assert!(threshold <= scorer.score("abcdef", "abcdeg"));
    }

    #[test]
    fn test_best_threshold_empty() {
        assert!(best_threshold(&SoftBisim::default(), &TrainingSet::default()).is_none());
    }
}
