//! Bigram extraction
//!
//! Slides a two-code-point window over a string. Windows are taken over
//! `char`s rather than bytes so Cyrillic and Hebrew input splits correctly.

use smallvec::SmallVec;

/// An ordered pair of adjacent code points.
pub type Bigram = [char; 2];

/// Bigram sequence with inline storage for typical name lengths.
pub type Bigrams = SmallVec<[Bigram; 32]>;

/// Extract overlapping bigrams with stride 1.
///
/// A string of `L` code points yields `max(L - 1, 0)` bigrams; empty and
/// single-character input yield an empty sequence.
///
/// # Examples
/// ```
/// use soft_bisim::algorithms::bigram::extract_bigrams;
/// let bigrams = extract_bigrams("abc");
/// assert_eq!(bigrams.as_slice(), &[['a', 'b'], ['b', 'c']]);
/// ```
#[must_use]
pub fn extract_bigrams(s: &str) -> Bigrams {
    let chars: SmallVec<[char; 32]> = s.chars().collect();
    chars.windows(2).map(|w| [w[0], w[1]]).collect()
}

/// Number of bigrams `extract_bigrams` would produce, without allocating.
#[inline]
#[must_use]
pub fn bigram_count(s: &str) -> usize {
    s.chars().count().saturating_sub(1)
}

/// Render a bigram as a two-character string.
#[inline]
#[must_use]
pub fn bigram_to_string(bigram: &Bigram) -> String {
    bigram.iter().collect()
}

/// Case-insensitive bigram comparison.
///
/// Compares full lowercase expansions, so characters whose lowercase form
/// is more than one code point compare correctly.
#[inline]
#[must_use]
pub fn eq_ignore_case(a: &Bigram, b: &Bigram) -> bool {
    a.iter()
        .flat_map(|c| c.to_lowercase())
        .eq(b.iter().flat_map(|c| c.to_lowercase()))
}
