//! Soft-Bisim - cross-script fuzzy name similarity
//!
//! A weighted edit distance over character bigrams of phonetically
//! normalized names, with a random-search optimizer that tunes the edit
//! costs against labeled name pairs.
//!
//! # Features
//! - Language-aware normalization (German, Polish, Spanish, Russian, Hebrew)
//! - Nine tunable edit costs, serializable as JSON
//! - Parallel fitness evaluation and batch scoring
//! - Python bindings behind the `python` feature
//!
//! # Example
//! ```
//! use soft_bisim::{soft_bisim_similarity, CostModel};
//!
//! let sim = soft_bisim_similarity("Шварц", "Swarz", &CostModel::balanced());
//! assert!(sim > 0.9);
//! ```

pub mod algorithms;
pub mod batch;
pub mod error;
pub mod metrics;
pub mod optimize;

#[cfg(feature = "python")]
mod python;

pub use algorithms::{
    detect_language, normalize_name, soft_bisim_distance, soft_bisim_similarity, CostModel,
    LanguageTag, NormalizationMode, Normalizer, PhoneticNormalizer, ScoreMode, Similarity, SoftBisim,
};
pub use batch::MatchResult;
pub use error::{Error, Result};
pub use optimize::{
    optimize_weights, FitnessEvaluator, FitnessObjective, LabeledPair, OptimizationResult,
    OptimizerConfig, TrainingSet, WeightOptimizer,
};

/// Minimum input size for parallel processing.
///
/// Below this, rayon's coordination overhead outweighs the per-item work
/// of a short-name alignment.
pub(crate) const PARALLEL_THRESHOLD: usize = 100;
