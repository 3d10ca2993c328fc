//! Name normalization
//!
//! The boundary between raw names and the alignment engine. A
//! [`Normalizer`] must be applied to both inputs of any distance
//! computation; the default [`PhoneticNormalizer`] detects the name's
//! origin, applies the matching rewrite table and reduces vowels.

use super::language::{HeuristicDetector, LanguageDetector, LanguageTag};
use super::phonetic::{phonetic_transform, reduce_vowels};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A lowercased, phonetically rewritten name. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NormalizedName(String);

impl NormalizedName {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<String> for NormalizedName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl AsRef<str> for NormalizedName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NormalizedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Turns a raw name into the form that gets aligned.
///
/// Implementations must be deterministic and side-effect free.
pub trait Normalizer: Send + Sync {
    fn normalize(&self, name: &str) -> NormalizedName;
}

impl<T: Normalizer + ?Sized> Normalizer for &T {
    fn normalize(&self, name: &str) -> NormalizedName {
        (**self).normalize(name)
    }
}

/// Language-aware phonetic normalizer.
///
/// # Parameters
/// - `detector`: chooses the rewrite table for each name
/// - `vowel_reduction`: drop vowels after the first character (default: on)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhoneticNormalizer<D = HeuristicDetector> {
    detector: D,
    vowel_reduction: bool,
}

impl Default for PhoneticNormalizer {
    fn default() -> Self {
        Self::new(HeuristicDetector)
    }
}

impl<D: LanguageDetector> PhoneticNormalizer<D> {
    #[must_use]
    pub fn new(detector: D) -> Self {
        Self {
            detector,
            vowel_reduction: true,
        }
    }

    #[must_use]
    pub fn without_vowel_reduction(mut self) -> Self {
        self.vowel_reduction = false;
        self
    }

    #[must_use]
    pub fn detector(&self) -> &D {
        &self.detector
    }

    /// The tag the detector assigns to `name`.
    #[must_use]
    pub fn language_of(&self, name: &str) -> LanguageTag {
        self.detector.detect(name)
    }
}

impl<D: LanguageDetector> Normalizer for PhoneticNormalizer<D> {
    fn normalize(&self, name: &str) -> NormalizedName {
        let rewritten = phonetic_transform(name, self.detector.detect(name));
        if self.vowel_reduction {
            NormalizedName(reduce_vowels(&rewritten))
        } else {
            NormalizedName(rewritten)
        }
    }
}

/// Normalization mode for string preprocessing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NormalizationMode {
    /// Detect language, rewrite phonetically, reduce vowels
    #[default]
    Phonetic,
    /// Convert to lowercase only
    Lowercase,
    /// Leave the string untouched
    Raw,
}

impl NormalizationMode {
    /// Parse a mode name as accepted by the Python bindings.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "phonetic" => Some(NormalizationMode::Phonetic),
            "lowercase" => Some(NormalizationMode::Lowercase),
            "raw" | "none" => Some(NormalizationMode::Raw),
            _ => None,
        }
    }
}

impl Normalizer for NormalizationMode {
    fn normalize(&self, name: &str) -> NormalizedName {
        NormalizedName(normalize_string(name, *self))
    }
}

/// Normalize a string according to the specified mode
#[must_use]
pub fn normalize_string(s: &str, mode: NormalizationMode) -> String {
    match mode {
        NormalizationMode::Phonetic => PhoneticNormalizer::default().normalize(s).into_string(),
        NormalizationMode::Lowercase => s.to_lowercase(),
        NormalizationMode::Raw => s.to_string(),
    }
}

/// Normalize a name with the default phonetic normalizer.
///
/// # Examples
/// ```
/// use soft_bisim::algorithms::normalize::normalize_name;
/// assert_eq!(normalize_name("Schwarz").as_str(), "shwrts");
/// assert_eq!(normalize_name("Шварц").as_str(), "svrz");
/// ```
#[must_use]
pub fn normalize_name(name: &str) -> NormalizedName {
    PhoneticNormalizer::default().normalize(name)
}

/// Normalize a name under an already known language tag.
#[must_use]
pub fn normalize_as(name: &str, tag: LanguageTag) -> NormalizedName {
    NormalizedName(reduce_vowels(&phonetic_transform(name, tag)))
}
