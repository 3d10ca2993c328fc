//! One-to-many and many-to-many scoring
//!
//! Each distinct input is normalized once; only the alignment runs per
//! pair. Work is spread over rayon once an input list reaches
//! `PARALLEL_THRESHOLD` items.

use crate::algorithms::normalize::Normalizer;
use crate::algorithms::soft_bisim::{prepared_similarity, PreparedName, SoftBisim};
use crate::PARALLEL_THRESHOLD;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// A scored candidate from [`extract`].
#[cfg_attr(feature = "python", pyo3::pyclass(get_all, name = "MatchResult"))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    /// The matched text
    pub text: String,
    /// Similarity score
    pub score: f64,
    /// Position of the text in the input list
    pub id: Option<usize>,
}

fn prepare_all<N, S>(scorer: &SoftBisim<N>, names: &[S]) -> Vec<PreparedName>
where
    N: Normalizer,
    S: AsRef<str> + Sync,
{
    if names.len() >= PARALLEL_THRESHOLD {
        names.par_iter().map(|s| scorer.prepare(s.as_ref())).collect()
    } else {
        names.iter().map(|s| scorer.prepare(s.as_ref())).collect()
    }
}

/// Best-scoring `choices` for `query`, highest first.
///
/// Results below `min_similarity` are dropped, and at most `limit` are
/// returned. Equal scores keep input order.
///
/// # Example
/// ```
/// use soft_bisim::batch::extract;
/// use soft_bisim::SoftBisim;
///
/// let scorer = SoftBisim::default();
/// let hits = extract(&scorer, "Schwarz", &["Kowalski", "Schwartz", "Huan"], 1, 0.5);
/// assert_eq!(hits[0].text, "Schwartz");
/// ```
pub fn extract<N, S>(
    scorer: &SoftBisim<N>,
    query: &str,
    choices: &[S],
    limit: usize,
    min_similarity: f64,
) -> Vec<MatchResult>
where
    N: Normalizer,
    S: AsRef<str> + Sync,
{
    let query = scorer.prepare(query);
    let score_one = |(i, choice): (usize, &S)| {
        let score = prepared_similarity(
            &query,
            &scorer.prepare(choice.as_ref()),
            scorer.weights(),
            scorer.score_mode(),
        );
        MatchResult {
            text: choice.as_ref().to_string(),
            score,
            id: Some(i),
        }
    };

    let mut results: Vec<MatchResult> = if choices.len() >= PARALLEL_THRESHOLD {
        choices
            .par_iter()
            .enumerate()
            .map(score_one)
            .filter(|r| r.score >= min_similarity)
            .collect()
    } else {
        choices
            .iter()
            .enumerate()
            .map(score_one)
            .filter(|r| r.score >= min_similarity)
            .collect()
    };

    results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    results.truncate(limit);
    results
}

/// Similarity of every query against every choice.
///
/// Row `i` holds the scores of `queries[i]` against `choices` in order.
pub fn similarity_matrix<N, Q, C>(scorer: &SoftBisim<N>, queries: &[Q], choices: &[C]) -> Vec<Vec<f64>>
where
    N: Normalizer,
    Q: AsRef<str> + Sync,
    C: AsRef<str> + Sync,
{
    let prepared_choices = prepare_all(scorer, choices);
    let row = |query: &Q| -> Vec<f64> {
        let query = scorer.prepare(query.as_ref());
        prepared_choices
            .iter()
            .map(|choice| prepared_similarity(&query, choice, scorer.weights(), scorer.score_mode()))
            .collect()
    };

    if queries.len() >= PARALLEL_THRESHOLD {
        queries.par_iter().map(row).collect()
    } else {
        queries.iter().map(row).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::normalize::NormalizationMode;
    use crate::algorithms::weights::CostModel;

    #[test]
    fn test_extract_orders_and_limits() {
        let scorer = SoftBisim::default();
        let choices = ["Kowalczyk", "Schwartz", "Swarz", "Abramowitz"];
        let hits = extract(&scorer, "Schwarz", &choices, 2, 0.0);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].text, "Schwartz");
        assert_eq!(hits[0].id, Some(1));
        assert!(hits[0].score >= hits[1].score);
    }

    #[test]
    fn test_extract_min_similarity() {
        let scorer = SoftBisim::default();
        let hits = extract(&scorer, "Schwarz", &["Schwartz", "Kowalczyk"], 10, 0.9);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].text, "Schwartz");
    }

    #[test]
    fn test_extract_parallel_path() {
        let scorer = SoftBisim::with_normalizer(CostModel::balanced(), NormalizationMode::Lowercase).unwrap();
        let mut choices: Vec<String> = (0..PARALLEL_THRESHOLD + 5).map(|i| format!("zz{i:04}")).collect();
        choices.push("target".to_string());
        let hits = extract(&scorer, "Target", &choices, 1, 0.0);
        assert_eq!(hits[0].text, "target");
        assert_eq!(hits[0].score, 1.0);
        assert_eq!(hits[0].id, Some(PARALLEL_THRESHOLD + 5));
    }

    #[test]
    fn test_similarity_matrix() {
        let scorer = SoftBisim::default();
        let queries = ["Schwarz", "Шварц"];
        let choices = ["Schwartz", "Swarz", "Kowalczyk"];
        let m = similarity_matrix(&scorer, &queries, &choices);
        assert_eq!(m.len(), 2);
        assert!(m.iter().all(|row| row.len() == 3));
        assert_eq!(m[0][0], scorer.score("Schwarz", "Schwartz"));
        assert_eq!(m[1][1], scorer.score("Шварц", "Swarz"));
        assert!(m[1][2] < m[1][1]);
    }

    #[test]
    fn test_empty_inputs() {
        let scorer = SoftBisim::default();
        let none: [&str; 0] = [];
        assert!(extract(&scorer, "x", &none, 5, 0.0).is_empty());
        assert!(similarity_matrix(&scorer, &none, &["a"]).is_empty());
    }
}
