//! Name-origin detection
//!
//! Guesses which rewrite table applies to a name from surface patterns.
//! The heuristic is an ordered list of `(predicate, tag)` rules evaluated
//! top to bottom; the first matching rule wins and [`LanguageTag::Generic`]
//! is the fallback.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Closed set of rewrite-table selectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LanguageTag {
    German,
    Polish,
    Spanish,
    Russian,
    Hebrew,
    /// Language-independent rules
    Generic,
}

impl LanguageTag {
    pub const ALL: [LanguageTag; 6] = [
        LanguageTag::German,
        LanguageTag::Polish,
        LanguageTag::Spanish,
        LanguageTag::Russian,
        LanguageTag::Hebrew,
        LanguageTag::Generic,
    ];

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            LanguageTag::German => "german",
            LanguageTag::Polish => "polish",
            LanguageTag::Spanish => "spanish",
            LanguageTag::Russian => "russian",
            LanguageTag::Hebrew => "hebrew",
            LanguageTag::Generic => "generic",
        }
    }

    /// Whether names with this tag are transliterated from a non-Latin script.
    #[must_use]
    pub fn is_transliterated(&self) -> bool {
        matches!(self, LanguageTag::Russian | LanguageTag::Hebrew)
    }
}

impl fmt::Display for LanguageTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LanguageTag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LanguageTag::ALL
            .into_iter()
            .find(|tag| tag.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                format!(
                    "Unknown language: '{}'. Valid: german, polish, spanish, russian, hebrew, generic",
                    s
                )
            })
    }
}

/// Upstream classifier choosing a [`LanguageTag`] for a raw name.
///
/// Must be deterministic and total.
pub trait LanguageDetector: Send + Sync {
    fn detect(&self, name: &str) -> LanguageTag;
}

/// One detection rule: a predicate over the lowercased name.
struct DetectionRule {
    matches: fn(&str) -> bool,
    tag: LanguageTag,
}

/// Detection rules in priority order.
const RULES: &[DetectionRule] = &[
    DetectionRule {
        matches: |s| s.contains("sch") || s.ends_with("mann"),
        tag: LanguageTag::German,
    },
    DetectionRule {
        matches: |s| s.contains("cz") || s.contains("sz"),
        tag: LanguageTag::Polish,
    },
    DetectionRule {
        matches: |s| s.starts_with("ch") || s.ends_with("ez"),
        tag: LanguageTag::Spanish,
    },
    DetectionRule {
        matches: |s| s.chars().any(is_cyrillic),
        tag: LanguageTag::Russian,
    },
    DetectionRule {
        matches: |s| s.chars().any(is_hebrew),
        tag: LanguageTag::Hebrew,
    },
    DetectionRule {
        matches: |s| s.contains(['ä', 'ö', 'ü', 'ß']),
        tag: LanguageTag::German,
    },
    DetectionRule {
        matches: |s| s.contains(['ł', 'ą', 'ę', 'ś', 'ź', 'ż', 'ń']),
        tag: LanguageTag::Polish,
    },
    DetectionRule {
        matches: |s| s.contains('ñ'),
        tag: LanguageTag::Spanish,
    },
];

/// Cyrillic blocks, including supplements and extensions.
#[inline]
#[must_use]
pub fn is_cyrillic(c: char) -> bool {
    matches!(c,
        '\u{0400}'..='\u{052F}'
        | '\u{1C80}'..='\u{1C8F}'
        | '\u{2DE0}'..='\u{2DFF}'
        | '\u{A640}'..='\u{A69F}')
}

/// Hebrew block and Hebrew presentation forms.
#[inline]
#[must_use]
pub fn is_hebrew(c: char) -> bool {
    matches!(c, '\u{0591}'..='\u{05F4}' | '\u{FB1D}'..='\u{FB4F}')
}

/// Pattern-based detector using the built-in rule list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeuristicDetector;

impl LanguageDetector for HeuristicDetector {
    fn detect(&self, name: &str) -> LanguageTag {
        detect_language(name)
    }
}

/// Detector that always returns the same tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedLanguage(pub LanguageTag);

impl LanguageDetector for FixedLanguage {
    fn detect(&self, _name: &str) -> LanguageTag {
        self.0
    }
}

/// Detect the likely origin of a name.
///
/// # Examples
/// ```
/// use soft_bisim::algorithms::language::{detect_language, LanguageTag};
/// assert_eq!(detect_language("Schwarz"), LanguageTag::German);
/// assert_eq!(detect_language("Kowalczyk"), LanguageTag::Polish);
/// assert_eq!(detect_language("Шварц"), LanguageTag::Russian);
/// assert_eq!(detect_language("Smith"), LanguageTag::Generic);
/// ```
#[must_use]
pub fn detect_language(name: &str) -> LanguageTag {
    let lower = name.to_lowercase();
    RULES
        .iter()
        .find(|rule| (rule.matches)(&lower))
        .map_or(LanguageTag::Generic, |rule| rule.tag)
}
