//! Labeled name pairs used as training data
//!
//! JSON input is an array whose items are either objects
//! `{"left": .., "right": .., "matching": ..}` (with `matching` defaulting to
//! `true`) or bare `[left, right]` arrays. Tab-separated input has one pair per
//! line with an optional third `1`/`0` column.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::io::Read;

/// A pair of raw names with a match label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawPair")]
pub struct LabeledPair {
    pub left: String,
    pub right: String,
    /// Whether the two names denote the same person
    pub matching: bool,
}

impl LabeledPair {
    /// A should-match pair.
    pub fn positive(left: impl Into<String>, right: impl Into<String>) -> Self {
        Self {
            left: left.into(),
            right: right.into(),
            matching: true,
        }
    }

    /// A should-not-match pair.
    pub fn negative(left: impl Into<String>, right: impl Into<String>) -> Self {
        Self {
            left: left.into(),
            right: right.into(),
            matching: false,
        }
    }
}

impl<A: Into<String>, B: Into<String>> From<(A, B)> for LabeledPair {
    fn from((left, right): (A, B)) -> Self {
        Self::positive(left, right)
    }
}

fn default_matching() -> bool {
    true
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawPair {
    Object {
        left: String,
        right: String,
        #[serde(default = "default_matching")]
        matching: bool,
    },
    Labeled(String, String, bool),
    Bare(String, String),
}

impl From<RawPair> for LabeledPair {
    fn from(raw: RawPair) -> Self {
        match raw {
            RawPair::Object {
                left,
                right,
                matching,
            }
            | RawPair::Labeled(left, right, matching) => Self {
                left,
                right,
                matching,
            },
            RawPair::Bare(left, right) => Self::positive(left, right),
        }
    }
}

/// An ordered collection of labeled pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrainingSet {
    pairs: Vec<LabeledPair>,
}

impl TrainingSet {
    #[must_use]
    pub fn new(pairs: Vec<LabeledPair>) -> Self {
        Self { pairs }
    }

    /// Every pair labeled as a match.
    pub fn from_positive_pairs<I, A, B>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (A, B)>,
        A: Into<String>,
        B: Into<String>,
    {
        Self {
            pairs: pairs.into_iter().map(LabeledPair::from).collect(),
        }
    }

    /// Parse a JSON array of pairs.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`] for malformed input.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a JSON array of pairs.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`] for malformed input or a failing reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Parse tab-separated pairs. Blank lines and `#` comments are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] with the 1-based line number of the first bad line.
    pub fn from_tsv(text: &str) -> Result<Self> {
        let mut pairs = Vec::new();
        for (idx, line) in text.lines().enumerate() {
            let line = line.trim_end_matches('\r');
            if line.trim().is_empty() || line.starts_with('#') {
                continue;
            }
            let cols: Vec<&str> = line.split('\t').collect();
            let matching = match cols.as_slice() {
                [_, _] => true,
                [_, _, label] => parse_label(label.trim()).ok_or_else(|| Error::Parse {
                    line: idx + 1,
                    message: format!("expected label 1/0/true/false, got '{}'", label),
                })?,
                _ => {
                    return Err(Error::Parse {
                        line: idx + 1,
                        message: format!("expected 2 or 3 tab-separated columns, got {}", cols.len()),
                    })
                }
            };
            pairs.push(LabeledPair {
                left: cols[0].to_string(),
                right: cols[1].to_string(),
                matching,
            });
        }
        Ok(Self { pairs })
    }

    /// Serialize to pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`] if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    #[must_use]
    pub fn pairs(&self) -> &[LabeledPair] {
        &self.pairs
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn push(&mut self, pair: LabeledPair) {
        self.pairs.push(pair);
    }

    /// Number of pairs labeled as matches.
    #[must_use]
    pub fn positive_count(&self) -> usize {
        self.pairs.iter().filter(|p| p.matching).count()
    }

    /// Number of pairs labeled as non-matches.
    #[must_use]
    pub fn negative_count(&self) -> usize {
        self.len() - self.positive_count()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LabeledPair> {
        self.pairs.iter()
    }
}

impl FromIterator<LabeledPair> for TrainingSet {
    fn from_iter<I: IntoIterator<Item = LabeledPair>>(iter: I) -> Self {
        Self {
            pairs: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a TrainingSet {
    type Item = &'a LabeledPair;
    type IntoIter = std::slice::Iter<'a, LabeledPair>;

    fn into_iter(self) -> Self::IntoIter {
        self.pairs.iter()
    }
}

fn parse_label(label: &str) -> Option<bool> {
    match label.to_lowercase().as_str() {
        "1" | "true" | "yes" | "match" => Some(true),
        "0" | "false" | "no" | "nonmatch" => Some(false),
        _ => None,
    }
}
