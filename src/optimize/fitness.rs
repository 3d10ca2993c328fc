//! Fitness of a cost model over a labeled corpus
//!
//! Normalization does not depend on the cost model, so every distinct name
//! is normalized and split into bigrams once, up front. Scoring a cost model
//! then only runs the alignment for each pair.

use crate::algorithms::normalize::{Normalizer, PhoneticNormalizer};
use crate::algorithms::similarity::ScoreMode;
use crate::algorithms::soft_bisim::{prepared_similarity, PreparedName};
use crate::algorithms::weights::CostModel;
use crate::error::{Error, Result};
use crate::optimize::dataset::TrainingSet;
use crate::PARALLEL_THRESHOLD;
use ahash::AHashMap;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// What the optimizer maximizes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitnessObjective {
    /// Mean similarity over every pair, whatever its label
    #[default]
    MeanSimilarity,
    /// Mean similarity of matching pairs minus mean similarity of
    /// non-matching pairs; needs both kinds
    Separation,
}

#[derive(Debug, Clone, Copy)]
struct PairRef {
    left: usize,
    right: usize,
    matching: bool,
}

/// Scores a [`CostModel`] against a fixed training set.
///
/// # Example
///
/// ```
/// use soft_bisim::optimize::{FitnessEvaluator, TrainingSet};
/// use soft_bisim::CostModel;
///
/// let set = TrainingSet::from_positive_pairs([("Schwarz", "Schwartz"), ("Шварц", "Swarz")]);
/// let evaluator = FitnessEvaluator::new(&set).unwrap();
/// assert_eq!(evaluator.evaluate(&CostModel::balanced()), 1.0);
/// ```
#[derive(Debug, Clone)]
pub struct FitnessEvaluator {
    names: Vec<PreparedName>,
    pairs: Vec<PairRef>,
    objective: FitnessObjective,
    mode: ScoreMode,
    parallel: bool,
}

impl FitnessEvaluator {
    /// Prepare `set` with the default phonetic normalizer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyTrainingSet`] if `set` has no pairs.
    pub fn new(set: &TrainingSet) -> Result<Self> {
        Self::with_normalizer(set, &PhoneticNormalizer::default())
    }

    /// Prepare `set` with a custom normalizer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyTrainingSet`] if `set` has no pairs.
    pub fn with_normalizer<N: Normalizer + ?Sized>(set: &TrainingSet, normalizer: &N) -> Result<Self> {
        if set.is_empty() {
            return Err(Error::EmptyTrainingSet);
        }

        let mut index: AHashMap<&str, usize> = AHashMap::with_capacity(set.len() * 2);
        let mut names = Vec::new();

        let mut pairs = Vec::with_capacity(set.len());
        for pair in set {
            let left = *index.entry(pair.left.as_str()).or_insert_with(|| {
                names.push(PreparedName::new(&pair.left, normalizer));
                names.len() - 1
            });
            let right = *index.entry(pair.right.as_str()).or_insert_with(|| {
                names.push(PreparedName::new(&pair.right, normalizer));
                names.len() - 1
            });
            pairs.push(PairRef {
                left,
                right,
                matching: pair.matching,
            });
        }

        log::debug!(
            "Prepared fitness evaluator: {} pairs, {} distinct names",
            pairs.len(),
            names.len()
        );

        Ok(Self {
            names,
            pairs,
            objective: FitnessObjective::default(),
            mode: ScoreMode::default(),
            parallel: true,
        })
    }

    /// Switch the objective.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingLabel`] if [`FitnessObjective::Separation`] is
    /// requested and the set lacks matching or non-matching pairs.
    pub fn with_objective(mut self, objective: FitnessObjective) -> Result<Self> {
        if objective == FitnessObjective::Separation {
            if !self.pairs.iter().any(|p| p.matching) {
                return Err(Error::MissingLabel("matching"));
            }
            if !self.pairs.iter().any(|p| !p.matching) {
                return Err(Error::MissingLabel("non-matching"));
            }
        }
        self.objective = objective;
        Ok(self)
    }

    #[must_use]
    pub fn with_score_mode(mut self, mode: ScoreMode) -> Self {
        self.mode = mode;
        self
    }

    /// Enable or disable rayon for per-pair scoring.
    #[must_use]
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    #[must_use]
    pub fn objective(&self) -> FitnessObjective {
        self.objective
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Always false: empty sets are rejected at construction.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Match labels in training-set order.
    pub fn labels(&self) -> impl Iterator<Item = bool> + '_ {
        self.pairs.iter().map(|p| p.matching)
    }

    fn score_pair(&self, pair: &PairRef, weights: &CostModel) -> f64 {
        prepared_similarity(&self.names[pair.left], &self.names[pair.right], weights, self.mode)
    }

    /// Similarity of every pair in training-set order.
    ///
    /// Collected in order even when computed in parallel, so sums over the
    /// result are reproducible.
    #[must_use]
    pub fn pair_scores(&self, weights: &CostModel) -> Vec<f64> {
        if self.parallel && self.pairs.len() >= PARALLEL_THRESHOLD {
            self.pairs
                .par_iter()
                .map(|pair| self.score_pair(pair, weights))
                .collect()
        } else {
            self.pairs.iter().map(|pair| self.score_pair(pair, weights)).collect()
        }
    }

    /// Fitness of `weights`; higher is better.
    #[must_use]
    pub fn evaluate(&self, weights: &CostModel) -> f64 {
        let scores = self.pair_scores(weights);
        match self.objective {
            FitnessObjective::MeanSimilarity => scores.iter().sum::<f64>() / scores.len() as f64,
            FitnessObjective::Separation => {
                let (mut pos_sum, mut pos_n, mut neg_sum, mut neg_n) = (0.0, 0usize, 0.0, 0usize);
                for (score, pair) in scores.iter().zip(&self.pairs) {
                    if pair.matching {
                        pos_sum += score;
                        pos_n += 1;
                    } else {
                        neg_sum += score;
                        neg_n += 1;
                    }
                }
                pos_sum / pos_n as f64 - neg_sum / neg_n as f64
            }
        }
    }
}

/// Mean similarity of `weights` over `set` with the default normalizer.
///
/// # Errors
///
/// Returns [`Error::EmptyTrainingSet`] if `set` has no pairs.
pub fn fitness(set: &TrainingSet, weights: &CostModel) -> Result<f64> {
    Ok(FitnessEvaluator::new(set)?.evaluate(weights))
}
