//! Name similarity building blocks
//!
//! Leaves first: bigram extraction, the cost model, language detection and
//! phonetic normalization, then the weighted alignment and scoring built on
//! top of them.

pub mod bigram;
pub mod language;
pub mod normalize;
pub mod phonetic;
pub mod similarity;
pub mod soft_bisim;
pub mod weights;

pub use bigram::{extract_bigrams, Bigram};
pub use language::{detect_language, LanguageDetector, LanguageTag};
pub use normalize::{normalize_as, normalize_name, NormalizationMode, NormalizedName, Normalizer, PhoneticNormalizer};
pub use similarity::{similarity_from_distance, ScoreMode};
pub use soft_bisim::*;
pub use weights::CostModel;

/// Trait for all similarity metrics.
///
/// Usually in `[0.0, 1.0]`; a Soft-Bisim scorer in [`ScoreMode::Raw`] can
/// go below zero for expensive cost models.
pub trait Similarity: Send + Sync {
    fn similarity(&self, a: &str, b: &str) -> f64;

    /// Convenience method for distance (1.0 - similarity)
    fn distance(&self, a: &str, b: &str) -> f64 {
        1.0 - self.similarity(a, b)
    }

    /// Name of the algorithm for debugging/logging
    fn name(&self) -> &'static str;
}
