//! Soft-Bisim distance: weighted edit distance over bigram sequences
//!
//! A restricted Damerau-style alignment where the alphabet is bigrams
//! rather than characters and every operation has its own cost from a
//! [`CostModel`]. Adjacent bigram swaps are priced as a single
//! transposition.
//!
//! # Complexity
//! - Time: O(m*n) in the bigram counts
//! - Space: O(min(m, n)) for [`weighted_bigram_distance`]; O(m*n) for
//!   [`alignment_matrix`], which exists for inspection and testing

use super::bigram::{eq_ignore_case, extract_bigrams, Bigram, Bigrams};
use super::normalize::{Normalizer, PhoneticNormalizer};
use super::similarity::{similarity_from_distance, ScoreMode};
use super::weights::CostModel;
use super::Similarity;
use crate::error::Result;
use smallvec::SmallVec;

/// Substitution cost for two bigrams that are known to differ.
#[inline]
fn substitution_cost(a: &Bigram, b: &Bigram, weights: &CostModel) -> f64 {
    if eq_ignore_case(a, b) {
        weights.case_change
    } else {
        weights.replace
    }
}

#[inline]
fn is_transposition(a: &[Bigram], b: &[Bigram], i: usize, j: usize) -> bool {
    i > 1 && j > 1 && a[i - 1] == b[j - 2] && a[i - 2] == b[j - 1]
}

/// Minimum cost of transforming bigram sequence `a` into `b`.
///
/// Keeps three rows of the alignment matrix, sized to the shorter input.
/// When `b` is longer the inputs are exchanged together with the
/// insert/delete costs, which leaves every cell value unchanged.
///
/// # Examples
/// ```
/// use soft_bisim::algorithms::bigram::extract_bigrams;
/// use soft_bisim::algorithms::soft_bisim::weighted_bigram_distance;
/// use soft_bisim::CostModel;
///
/// let a = extract_bigrams("abcd");
/// let b = extract_bigrams("abdc");
/// let d = weighted_bigram_distance(&a, &b, &CostModel::default());
/// assert_eq!(d, 2.0);
/// ```
#[must_use]
pub fn weighted_bigram_distance(a: &[Bigram], b: &[Bigram], weights: &CostModel) -> f64 {
    if b.len() > a.len() {
        return rolling_distance(b, a, &weights.transposed());
    }
    rolling_distance(a, b, weights)
}

fn rolling_distance(a: &[Bigram], b: &[Bigram], weights: &CostModel) -> f64 {
    let m = a.len();
    let n = b.len();

    if m == 0 {
        return n as f64 * weights.insert;
    }
    if n == 0 {
        return m as f64 * weights.delete;
    }

    let mut prev2_row: SmallVec<[f64; 64]> = smallvec::smallvec![0.0; n + 1];
    let mut prev_row: SmallVec<[f64; 64]> = (0..=n).map(|j| j as f64 * weights.insert).collect();
    let mut curr_row: SmallVec<[f64; 64]> = smallvec::smallvec![0.0; n + 1];

    for i in 1..=m {
        curr_row[0] = i as f64 * weights.delete;

        for j in 1..=n {
            curr_row[j] = if a[i - 1] == b[j - 1] {
                prev_row[j - 1] + weights.match_cost
            } else {
                let subst = substitution_cost(&a[i - 1], &b[j - 1], weights);
                let mut cell = (prev_row[j] + weights.delete)
                    .min(curr_row[j - 1] + weights.insert)
                    .min(prev_row[j - 1] + subst);

                if is_transposition(a, b, i, j) {
                    cell = cell.min(prev2_row[j - 2] + weights.transposition);
                }
                cell
            };
        }

        // Rotate rows
        std::mem::swap(&mut prev2_row, &mut prev_row);
        std::mem::swap(&mut prev_row, &mut curr_row);
    }

    prev_row[n]
}

/// Full (m+1)×(n+1) grid of partial alignment costs.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignmentMatrix {
    rows: usize,
    cols: usize,
    cells: Vec<f64>,
}

impl AlignmentMatrix {
    /// Number of rows (`m + 1`).
    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns (`n + 1`).
    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Cost of aligning the first `i` bigrams of `a` with the first `j` of `b`.
    ///
    /// # Panics
    ///
    /// Panics if `i >= rows()` or `j >= cols()`.
    #[must_use]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        assert!(i < self.rows && j < self.cols, "cell ({i}, {j}) out of bounds");
        self.cells[i * self.cols + j]
    }

    /// The bottom-right cell: the full alignment cost.
    #[must_use]
    pub fn distance(&self) -> f64 {
        self.cells[self.cells.len() - 1]
    }

    fn set(&mut self, i: usize, j: usize, value: f64) {
        self.cells[i * self.cols + j] = value;
    }
}

/// Build the complete alignment matrix for `a` against `b`.
///
/// Produces the same bottom-right value as [`weighted_bigram_distance`].
#[must_use]
pub fn alignment_matrix(a: &[Bigram], b: &[Bigram], weights: &CostModel) -> AlignmentMatrix {
    let m = a.len();
    let n = b.len();
    let mut d = AlignmentMatrix {
        rows: m + 1,
        cols: n + 1,
        cells: vec![0.0; (m + 1) * (n + 1)],
    };

    for i in 0..=m {
        d.set(i, 0, i as f64 * weights.delete);
    }
    for j in 0..=n {
        d.set(0, j, j as f64 * weights.insert);
    }

    for i in 1..=m {
        for j in 1..=n {
            let cell = if a[i - 1] == b[j - 1] {
                d.get(i - 1, j - 1) + weights.match_cost
            } else {
                let subst = substitution_cost(&a[i - 1], &b[j - 1], weights);
                let mut cell = (d.get(i - 1, j) + weights.delete)
                    .min(d.get(i, j - 1) + weights.insert)
                    .min(d.get(i - 1, j - 1) + subst);
                if is_transposition(a, b, i, j) {
                    cell = cell.min(d.get(i - 2, j - 2) + weights.transposition);
                }
                cell
            };
            d.set(i, j, cell);
        }
    }

    d
}

/// A name after normalization, ready for repeated alignment.
///
/// Normalization does not depend on the cost model, so callers scoring the
/// same names under many models should prepare them once.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedName {
    /// Bigrams of the normalized form
    pub bigrams: Bigrams,
    /// Code-point length of the original, pre-normalization name
    pub original_len: usize,
}

impl PreparedName {
    /// Normalize `name` and extract its bigrams.
    #[must_use]
    pub fn new<N: Normalizer + ?Sized>(name: &str, normalizer: &N) -> Self {
        let normalized = normalizer.normalize(name);
        Self {
            bigrams: extract_bigrams(normalized.as_str()),
            original_len: name.chars().count(),
        }
    }
}

/// Distance between two prepared names.
#[inline]
#[must_use]
pub fn prepared_distance(a: &PreparedName, b: &PreparedName, weights: &CostModel) -> f64 {
    weighted_bigram_distance(&a.bigrams, &b.bigrams, weights)
}

/// Similarity between two prepared names.
#[inline]
#[must_use]
pub fn prepared_similarity(
    a: &PreparedName,
    b: &PreparedName,
    weights: &CostModel,
    mode: ScoreMode,
) -> f64 {
    let distance = prepared_distance(a, b, weights);
    similarity_from_distance(distance, a.original_len, b.original_len, mode)
}

/// Soft-Bisim scorer: normalization, bigram alignment and scoring in one.
///
/// # Parameters
/// - `weights`: validated cost model
/// - `normalizer`: phonetic normalizer applied to both inputs
/// - `mode`: whether similarity is clamped to `[0, 1]`
#[derive(Debug, Clone)]
pub struct SoftBisim<N = PhoneticNormalizer> {
    weights: CostModel,
    normalizer: N,
    mode: ScoreMode,
}

impl Default for SoftBisim {
    fn default() -> Self {
        Self {
            weights: CostModel::default(),
            normalizer: PhoneticNormalizer::default(),
            mode: ScoreMode::default(),
        }
    }
}

impl SoftBisim {
    /// Scorer with the default phonetic normalizer.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidCost`] if `weights` fails validation.
    pub fn new(weights: CostModel) -> Result<Self> {
        Self::with_normalizer(weights, PhoneticNormalizer::default())
    }
}

impl<N: Normalizer> SoftBisim<N> {
    /// Scorer with a custom normalizer.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidCost`] if `weights` fails validation.
    pub fn with_normalizer(weights: CostModel, normalizer: N) -> Result<Self> {
        weights.validate()?;
        Ok(Self {
            weights,
            normalizer,
            mode: ScoreMode::default(),
        })
    }

    #[must_use]
    pub fn with_score_mode(mut self, mode: ScoreMode) -> Self {
        self.mode = mode;
        self
    }

    #[must_use]
    pub fn weights(&self) -> &CostModel {
        &self.weights
    }

    #[must_use]
    pub fn normalizer(&self) -> &N {
        &self.normalizer
    }

    #[must_use]
    pub fn score_mode(&self) -> ScoreMode {
        self.mode
    }

    /// Normalize and extract bigrams for `name`.
    #[must_use]
    pub fn prepare(&self, name: &str) -> PreparedName {
        PreparedName::new(name, &self.normalizer)
    }

    /// Alignment cost between two raw names.
    #[must_use]
    pub fn distance(&self, a: &str, b: &str) -> f64 {
        prepared_distance(&self.prepare(a), &self.prepare(b), &self.weights)
    }

    /// Length-normalized similarity between two raw names.
    #[must_use]
    pub fn score(&self, a: &str, b: &str) -> f64 {
        prepared_similarity(&self.prepare(a), &self.prepare(b), &self.weights, self.mode)
    }

    /// Full alignment matrix between two raw names after normalization.
    #[must_use]
    pub fn matrix(&self, a: &str, b: &str) -> AlignmentMatrix {
        alignment_matrix(&self.prepare(a).bigrams, &self.prepare(b).bigrams, &self.weights)
    }
}

impl<N: Normalizer> Similarity for SoftBisim<N> {
    fn similarity(&self, a: &str, b: &str) -> f64 {
        self.score(a, b)
    }

    fn name(&self) -> &'static str {
        "soft_bisim"
    }
}

/// Soft-Bisim distance between two raw names using the default phonetic
/// normalizer. Costs are not validated.
#[must_use]
pub fn soft_bisim_distance(a: &str, b: &str, weights: &CostModel) -> f64 {
    let normalizer = PhoneticNormalizer::default();
    prepared_distance(
        &PreparedName::new(a, &normalizer),
        &PreparedName::new(b, &normalizer),
        weights,
    )
}

/// Unclamped Soft-Bisim similarity between two raw names using the default
/// phonetic normalizer. Costs are not validated.
#[must_use]
pub fn soft_bisim_similarity(a: &str, b: &str, weights: &CostModel) -> f64 {
    let normalizer = PhoneticNormalizer::default();
    prepared_similarity(
        &PreparedName::new(a, &normalizer),
        &PreparedName::new(b, &normalizer),
        weights,
        ScoreMode::Raw,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::normalize::NormalizationMode;

    fn raw_distance(a: &str, b: &str, w: &CostModel) -> f64 {
        weighted_bigram_distance(&extract_bigrams(a), &extract_bigrams(b), w)
    }

    fn unit_costs() -> CostModel {
        CostModel::default()
    }

    #[test]
    fn test_identical_sequences() {
        let w = CostModel {
            match_cost: 0.25,
            ..unit_costs()
        };
        // 4 bigrams, every position an exact match
        assert_eq!(raw_distance("abcde", "abcde", &w), 1.0);
        assert_eq!(raw_distance("abcde", "abcde", &unit_costs()), 0.0);
    }

    #[test]
    fn test_empty_boundaries() {
        let w = CostModel {
            insert: 2.0,
            delete: 3.0,
            ..unit_costs()
        };
        assert_eq!(raw_distance("", "", &w), 0.0);
        assert_eq!(raw_distance("", "abcd", &w), 6.0);
        assert_eq!(raw_distance("abcd", "", &w), 9.0);
        // Single characters have no bigrams
        assert_eq!(raw_distance("a", "z", &w), 0.0);
    }

    #[test]
    fn test_transposition_cheaper_than_two_substitutions() {
        // ab bc cd vs ab bd dc: a character swap is never a bigram swap,
        // so the best script is two substitutions.
        let w = unit_costs();
        assert_eq!(raw_distance("abcd", "abdc", &w), 2.0 * w.replace);

        let a = [['a', 'b'], ['b', 'a']];
        let b = [['b', 'a'], ['a', 'b']];
        let cheap = CostModel {
            transposition: 0.5,
            ..unit_costs()
        };
        assert_eq!(weighted_bigram_distance(&a, &b, &cheap), 0.5);
        let expensive = CostModel {
            transposition: 5.0,
            ..unit_costs()
        };
        assert_eq!(weighted_bigram_distance(&a, &b, &expensive), 2.0);
    }

    #[test]
    fn test_case_change_cost() {
        let w = CostModel {
            case_change: 0.1,
            ..unit_costs()
        };
        let d = raw_distance("Ab", "aB", &w);
        assert!((d - 0.1).abs() < 1e-12);
        assert_eq!(raw_distance("ab", "cd", &w), 1.0);
    }

    #[test]
    fn test_asymmetric_insert_delete() {
        let w = CostModel {
            insert: 0.5,
            delete: 2.0,
            ..unit_costs()
        };
        // "abc" -> "abcd": one bigram inserted
        assert_eq!(raw_distance("abc", "abcd", &w), 0.5);
        // reverse direction: one bigram deleted
        assert_eq!(raw_distance("abcd", "abc", &w), 2.0);
    }

    #[test]
    fn test_rolling_matches_full_matrix() {
        let w = CostModel::from_array([0.1, 0.7, 0.3, 0.9, 0.2, 0.5, 0.5, 0.4, 0.6]);
        let pairs = [
            ("schwarz", "schwartz"),
            ("abcd", "abdc"),
            ("kowalski", "kovalsky"),
            ("ab", "abcdefgh"),
            ("abcdefgh", "ba"),
            ("", "abc"),
        ];
        for (a, b) in pairs {
            let ba = extract_bigrams(a);
            let bb = extract_bigrams(b);
            let full = alignment_matrix(&ba, &bb, &w);
            assert_eq!(full.distance(), weighted_bigram_distance(&ba, &bb, &w), "{a} vs {b}");
        }
    }

    #[test]
    fn test_matrix_boundaries() {
        let w = CostModel {
            insert: 2.0,
            delete: 3.0,
            ..unit_costs()
        };
        let m = alignment_matrix(&extract_bigrams("abcd"), &extract_bigrams("xyz"), &w);
        assert_eq!(m.rows(), 4);
        assert_eq!(m.cols(), 3);
        assert_eq!(m.get(0, 0), 0.0);
        assert_eq!(m.get(3, 0), 9.0);
        assert_eq!(m.get(0, 2), 4.0);
    }

    #[test]
    fn test_scorer_rejects_invalid_weights() {
        let w = CostModel {
            insert: -1.0,
            ..unit_costs()
        };
        assert!(SoftBisim::new(w).is_err());
    }

    #[test]
    fn test_scorer_raw_normalizer() {
        let scorer = SoftBisim::with_normalizer(unit_costs(), NormalizationMode::Raw).unwrap();
        assert_eq!(scorer.distance("abcd", "abcd"), 0.0);
        assert_eq!(scorer.score("abcd", "abcd"), 1.0);
        assert_eq!(scorer.name(), "soft_bisim");
    }

    #[test]
    fn test_schwarz_schwartz() {
        let sim = soft_bisim_similarity("Schwarz", "Schwartz", &CostModel::balanced());
        assert!(sim > 0.9, "similarity was {sim}");
    }

    #[test]
    fn test_cross_script() {
        let sim = soft_bisim_similarity("Шварц", "Swarz", &CostModel::balanced());
        assert!(sim > 0.9, "similarity was {sim}");
        let unrelated = soft_bisim_similarity("Шварц", "Kowalczyk", &CostModel::balanced());
        assert!(unrelated < sim);
    }

    #[test]
    fn test_similarity_can_go_negative_unclamped() {
        let w = CostModel {
            replace: 10.0,
            insert: 10.0,
            delete: 10.0,
            transposition: 10.0,
            ..unit_costs()
        };
        let scorer = SoftBisim::with_normalizer(w, NormalizationMode::Raw).unwrap();
        assert!(scorer.score("abc", "xyz") < 0.0);
        let clamped = scorer.with_score_mode(ScoreMode::Clamped);
        assert_eq!(clamped.score("abc", "xyz"), 0.0);
    }
}
