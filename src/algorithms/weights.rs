//! Cost model for the weighted bigram alignment

use crate::error::{Error, Result};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Number of coefficients in a [`CostModel`].
pub const COST_COUNT: usize = 9;

/// Coefficient names in field order, as used in serialized form and errors.
pub const COST_NAMES: [&str; COST_COUNT] = [
    "match",
    "replace",
    "insert",
    "delete",
    "transposition",
    "merge",
    "split",
    "case_change",
    "phonetic_change",
];

/// Per-operation costs governing the Soft-Bisim alignment.
///
/// `merge`, `split` and `phonetic_change` are carried as configuration but are
/// not read by the alignment recurrence.
///
/// Fields are public for cheap construction in hot loops; use
/// [`CostModel::new`] or [`CostModel::validate`] for input from outside the
/// process.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostModel {
    /// Cost of an exact bigram match
    #[serde(rename = "match")]
    pub match_cost: f64,
    /// Cost of substituting one bigram for another
    pub replace: f64,
    /// Cost of inserting a bigram from the second sequence
    pub insert: f64,
    /// Cost of deleting a bigram from the first sequence
    pub delete: f64,
    /// Cost of swapping two adjacent bigrams
    pub transposition: f64,
    /// Reserved: two bigrams into one
    pub merge: f64,
    /// Reserved: one bigram into two
    pub split: f64,
    /// Cost of a substitution that differs only in letter case
    pub case_change: f64,
    /// Reserved: phonetically equivalent substitution
    pub phonetic_change: f64,
}

impl Default for CostModel {
    /// Balanced model: every operation costs 1.0 except an exact match.
    fn default() -> Self {
        Self::from_array([0.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0])
    }
}

impl CostModel {
    /// Build a validated cost model.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCost`] if any coefficient is negative or not finite.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        match_cost: f64,
        replace: f64,
        insert: f64,
        delete: f64,
        transposition: f64,
        merge: f64,
        split: f64,
        case_change: f64,
        phonetic_change: f64,
    ) -> Result<Self> {
        let model = Self {
            match_cost,
            replace,
            insert,
            delete,
            transposition,
            merge,
            split,
            case_change,
            phonetic_change,
        };
        model.validate()?;
        Ok(model)
    }

    /// The balanced model (same as `Default`).
    #[must_use]
    pub fn balanced() -> Self {
        Self::default()
    }

    /// Draw every coefficient independently and uniformly from `[0, 1)`.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut values = [0.0; COST_COUNT];
        for v in &mut values {
            *v = rng.gen::<f64>();
        }
        Self::from_array(values)
    }

    /// Build from coefficients in [`COST_NAMES`] order. Not validated.
    #[must_use]
    pub fn from_array(values: [f64; COST_COUNT]) -> Self {
        let [match_cost, replace, insert, delete, transposition, merge, split, case_change, phonetic_change] =
            values;
        Self {
            match_cost,
            replace,
            insert,
            delete,
            transposition,
            merge,
            split,
            case_change,
            phonetic_change,
        }
    }

    /// Coefficients in [`COST_NAMES`] order.
    #[must_use]
    pub fn to_array(&self) -> [f64; COST_COUNT] {
        [
            self.match_cost,
            self.replace,
            self.insert,
            self.delete,
            self.transposition,
            self.merge,
            self.split,
            self.case_change,
            self.phonetic_change,
        ]
    }

    /// Check that every coefficient is finite and non-negative.
    ///
    /// The `min` in the recurrence is only monotone for non-negative costs.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCost`] naming the first offending coefficient.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in COST_NAMES.into_iter().zip(self.to_array()) {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::InvalidCost { name, value });
            }
        }
        Ok(())
    }

    /// Same model with `insert` and `delete` exchanged.
    ///
    /// Aligning `b` against `a` under the swapped model gives exactly the
    /// distance of `a` against `b` under this one.
    #[inline]
    #[must_use]
    pub fn transposed(&self) -> Self {
        Self {
            insert: self.delete,
            delete: self.insert,
            ..*self
        }
    }

    /// Deserialize and validate a model from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`] for malformed input and [`Error::InvalidCost`]
    /// for out-of-range coefficients.
    pub fn from_json(json: &str) -> Result<Self> {
        let model: Self = serde_json::from_str(json)?;
        model.validate()?;
        Ok(model)
    }

    /// Serialize to pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`] if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
