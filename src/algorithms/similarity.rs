//! Distance-to-similarity conversion

use serde::{Deserialize, Serialize};

/// How a similarity score is bounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoreMode {
    /// `1 - distance / max_len` with no floor; can go negative when the
    /// alignment cost exceeds the longer name's length
    #[default]
    Raw,
    /// Raw score clamped to `[0.0, 1.0]`
    Clamped,
}

/// Convert an alignment cost into a length-normalized similarity.
///
/// Lengths are code-point counts of the original, pre-normalization names.
/// Two empty names are identical and score 1.0.
///
/// # Examples
/// ```
/// use soft_bisim::algorithms::similarity::{similarity_from_distance, ScoreMode};
/// assert_eq!(similarity_from_distance(1.0, 4, 2, ScoreMode::Raw), 0.75);
/// assert_eq!(similarity_from_distance(9.0, 3, 3, ScoreMode::Clamped), 0.0);
/// ```
#[inline]
#[must_use]
pub fn similarity_from_distance(distance: f64, len_a: usize, len_b: usize, mode: ScoreMode) -> f64 {
    let max_len = len_a.max(len_b);
    if max_len == 0 {
        return 1.0;
    }
    let score = 1.0 - distance / max_len as f64;
    match mode {
        ScoreMode::Raw => score,
        ScoreMode::Clamped => score.clamp(0.0, 1.0),
    }
}
