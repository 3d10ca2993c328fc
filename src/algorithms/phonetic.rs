//! Phonetic rewrite tables and transliteration
//!
//! Each language has an ordered rewrite table applied in a single
//! left-to-right pass: at every position the first rule (in table order)
//! whose pattern matches is applied, and the replacement is not rescanned.
//! Cyrillic and Hebrew are transliterated character by character and then
//! folded with the generic rules, so their Latin digraphs meet names that
//! were written in Latin to begin with.
//!
//! A light rule set, not a Soundex/Metaphone encoder.

use super::language::LanguageTag;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Ordered `(pattern, replacement)` rewrite table.
pub type RewriteTable = &'static [(&'static str, &'static str)];

pub const GERMAN_RULES: RewriteTable = &[
    ("sch", "sh"),
    ("ch", "k"),
    ("tz", "ts"),
    ("z", "ts"),
    ("ss", "s"),
    ("eu", "oy"),
    ("ä", "ae"),
    ("ö", "oe"),
    ("ü", "ue"),
    ("ß", "ss"),
];

pub const POLISH_RULES: RewriteTable = &[
    ("cz", "ch"),
    ("sz", "sh"),
    ("w", "v"),
    ("ł", "l"),
    ("ń", "n"),
    ("ś", "s"),
    ("ź", "z"),
    ("ż", "z"),
    ("ą", "a"),
    ("ę", "e"),
];

pub const SPANISH_RULES: RewriteTable = &[
    ("ll", "y"),
    ("ch", "k"),
    ("ñ", "n"),
    ("v", "b"),
    ("ce", "se"),
    ("ci", "si"),
    ("z", "s"),
    ("j", "h"),
    ("h", ""),
];

/// Language-independent digraph simplification.
///
/// The trailing `tz`/`ts`/`w` folds let "Шварц" (shvarts) and "Swarz"
/// meet. `wr` and `wh` still win at a `w` because they come first, so `wh`
/// must produce `v` itself.
pub const GENERIC_RULES: RewriteTable = &[
    ("ph", "f"),
    ("ck", "k"),
    ("gh", "g"),
    ("sch", "sh"),
    ("ch", "k"),
    ("th", "t"),
    ("sh", "s"),
    ("cz", "c"),
    ("qu", "k"),
    ("gn", "n"),
    ("wr", "r"),
    ("kn", "n"),
    ("wh", "v"),
    ("dg", "g"),
    ("tz", "z"),
    ("ts", "z"),
    ("w", "v"),
];

/// Letters whose doubled form collapses to one in the generic pass.
/// Pairs collapse left to right without rescanning, so `ttt` becomes `tt`.
const COLLAPSIBLE: &[char] = &['t', 'l', 's', 'p', 'r', 'm'];

const VOWELS: &[char] = &['a', 'e', 'i', 'o', 'u'];

/// Apply a rewrite table in one non-overlapping left-to-right pass.
///
/// # Examples
/// ```
/// use soft_bisim::algorithms::phonetic::{apply_rewrites, GERMAN_RULES};
/// assert_eq!(apply_rewrites("schwarz", GERMAN_RULES), "shwarts");
/// ```
#[must_use]
pub fn apply_rewrites(s: &str, table: RewriteTable) -> String {
    let mut out = String::with_capacity(s.len() + s.len() / 2);
    let mut rest = s;

    'scan: while !rest.is_empty() {
        for &(pattern, replacement) in table {
            if let Some(tail) = rest.strip_prefix(pattern) {
                out.push_str(replacement);
                rest = tail;
                continue 'scan;
            }
        }
        let mut chars = rest.chars();
        if let Some(c) = chars.next() {
            out.push(c);
        }
        rest = chars.as_str();
    }

    out
}

/// Latin rendering of a lowercase Russian Cyrillic letter.
#[must_use]
pub fn cyrillic_to_latin(c: char) -> Option<&'static str> {
    let latin = match c {
        'а' => "a",
        'б' => "b",
        'в' => "v",
        'г' => "g",
        'д' => "d",
        'е' => "e",
        'ё' => "yo",
        'ж' => "zh",
        'з' => "z",
        'и' => "i",
        'й' => "y",
        'к' => "k",
        'л' => "l",
        'м' => "m",
        'н' => "n",
        'о' => "o",
        'п' => "p",
        'р' => "r",
        'с' => "s",
        'т' => "t",
        'у' => "u",
        'ф' => "f",
        'х' => "kh",
        'ц' => "ts",
        'ч' => "ch",
        'ш' => "sh",
        'щ' => "shch",
        'ъ' | 'ь' => "",
        'ы' => "i",
        'э' => "e",
        'ю' => "yu",
        'я' => "ya",
        _ => return None,
    };
    Some(latin)
}

/// Latin rendering of a Hebrew letter, final forms included.
#[must_use]
pub fn hebrew_to_latin(c: char) -> Option<&'static str> {
    let latin = match c {
        'א' => "a",
        'ב' => "b",
        'ג' => "g",
        'ד' => "d",
        'ה' => "h",
        'ו' => "v",
        'ז' => "z",
        'ח' => "ch",
        'ט' => "t",
        'י' => "y",
        'כ' | 'ך' => "k",
        'ל' => "l",
        'מ' | 'ם' => "m",
        'נ' | 'ן' => "n",
        'ס' => "s",
        'ע' => "a",
        'פ' => "p",
        'ף' => "f",
        'צ' | 'ץ' => "tz",
        'ק' => "k",
        'ר' => "r",
        'ש' => "sh",
        'ת' => "t",
        _ => return None,
    };
    Some(latin)
}

fn transliterate(s: &str, map: fn(char) -> Option<&'static str>) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match map(c) {
            Some(latin) => out.push_str(latin),
            None => out.push(c),
        }
    }
    out
}

/// Transliterate Russian Cyrillic to Latin. Unmapped characters pass through.
#[must_use]
pub fn transliterate_russian(s: &str) -> String {
    transliterate(&s.to_lowercase(), cyrillic_to_latin)
}

/// Transliterate Hebrew to Latin. Unmapped characters pass through.
#[must_use]
pub fn transliterate_hebrew(s: &str) -> String {
    transliterate(&s.to_lowercase(), hebrew_to_latin)
}

/// Drop combining marks after canonical decomposition ("José" → "jose").
#[must_use]
pub fn strip_diacritics(s: &str) -> String {
    s.nfkd().filter(|c| !is_combining_mark(*c)).collect()
}

/// Language-independent phonetic simplification.
///
/// Lowercases, folds diacritics, applies [`GENERIC_RULES`], removes every
/// `h`, then collapses each doubled `t l s p r m` pair.
///
/// # Examples
/// ```
/// use soft_bisim::algorithms::phonetic::generic_transform;
/// assert_eq!(generic_transform("Phillips"), "filips");
/// assert_eq!(generic_transform("Knight"), "nigt");
/// ```
#[must_use]
pub fn generic_transform(s: &str) -> String {
    let folded = strip_diacritics(&s.to_lowercase());
    let rewritten = apply_rewrites(&folded, GENERIC_RULES);

    let mut out = String::with_capacity(rewritten.len());
    let mut chars = rewritten.chars().filter(|&c| c != 'h').peekable();
    while let Some(c) = chars.next() {
        out.push(c);
        if COLLAPSIBLE.contains(&c) && chars.peek() == Some(&c) {
            chars.next();
        }
    }
    out
}

/// Keep the first character and drop every `a e i o u` after it.
///
/// # Examples
/// ```
/// use soft_bisim::algorithms::phonetic::reduce_vowels;
/// assert_eq!(reduce_vowels("abraham"), "abrhm");
/// assert_eq!(reduce_vowels("e"), "e");
/// ```
#[must_use]
pub fn reduce_vowels(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => std::iter::once(first)
            .chain(chars.filter(|c| !VOWELS.contains(c)))
            .collect(),
        None => String::new(),
    }
}

/// Lowercase and rewrite a name with the rules for `tag`.
///
/// Vowel reduction is not applied here; see
/// [`PhoneticNormalizer`](super::normalize::PhoneticNormalizer).
#[must_use]
pub fn phonetic_transform(name: &str, tag: LanguageTag) -> String {
    let lower = name.to_lowercase();
    match tag {
        LanguageTag::German => apply_rewrites(&lower, GERMAN_RULES),
        LanguageTag::Polish => apply_rewrites(&lower, POLISH_RULES),
        LanguageTag::Spanish => apply_rewrites(&lower, SPANISH_RULES),
        LanguageTag::Russian => generic_transform(&transliterate_russian(&lower)),
        LanguageTag::Hebrew => generic_transform(&transliterate_hebrew(&lower)),
        LanguageTag::Generic => generic_transform(&lower),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_rule_wins() {
        // "sch" is listed before "ch"
        assert_eq!(apply_rewrites("schach", GERMAN_RULES), "shak");
        // replacement output is not rescanned: "z" -> "ts" stays "ts"
        assert_eq!(apply_rewrites("zz", GERMAN_RULES), "tsts");
    }

    #[test]
    fn test_german() {
        assert_eq!(phonetic_transform("Schwarz", LanguageTag::German), "shwarts");
        assert_eq!(phonetic_transform("Schwartz", LanguageTag::German), "shwarts");
        assert_eq!(phonetic_transform("Müller", LanguageTag::German), "mueller");
        assert_eq!(phonetic_transform("Strauß", LanguageTag::German), "strauss");
    }

    #[test]
    fn test_polish() {
        assert_eq!(phonetic_transform("Kowalczyk", LanguageTag::Polish), "kovalchyk");
        assert_eq!(phonetic_transform("Wałęsa", LanguageTag::Polish), "valesa");
    }

    #[test]
    fn test_spanish() {
        assert_eq!(phonetic_transform("Chávez", LanguageTag::Spanish), "kábes");
        assert_eq!(phonetic_transform("Llorente", LanguageTag::Spanish), "yorente");
        assert_eq!(phonetic_transform("Juan", LanguageTag::Spanish), "huan");
        assert_eq!(phonetic_transform("Hernández", LanguageTag::Spanish), "ernándes");
    }

    #[test]
    fn test_russian() {
        assert_eq!(transliterate_russian("Шварц"), "shvarts");
        assert_eq!(transliterate_russian("Щукин"), "shchukin");
        assert_eq!(transliterate_russian("Ильич"), "ilich");
        assert_eq!(phonetic_transform("Шварц", LanguageTag::Russian), "svarz");
    }

    #[test]
    fn test_hebrew() {
        assert_eq!(transliterate_hebrew("כהן"), "khn");
        assert_eq!(transliterate_hebrew("שלום"), "shlvm");
        assert_eq!(phonetic_transform("כהן", LanguageTag::Hebrew), "kn");
    }

    #[test]
    fn test_generic() {
        assert_eq!(generic_transform("Swarz"), "svarz");
        assert_eq!(generic_transform("Thompson"), "tompson");
        assert_eq!(generic_transform("Wright"), "rigt");
        assert_eq!(generic_transform("José"), "jose");
        assert_eq!(generic_transform("Mitterrand"), "miterand");
    }

    #[test]
    fn test_wh_folds_like_w() {
        assert_eq!(generic_transform("Whitman"), generic_transform("Witman"));
        assert_eq!(generic_transform("Whalen"), "valen");
        assert_eq!(
            crate::algorithms::normalize::normalize_name("Whitman"),
            crate::algorithms::normalize::normalize_name("Witman")
        );
    }

    #[test]
    fn test_doubles_collapse_pairwise() {
        assert_eq!(generic_transform("atta"), "ata");
        assert_eq!(generic_transform("attta"), "atta");
        assert_eq!(generic_transform("atttta"), "atta");
        // 'h' is dropped before collapsing
        assert_eq!(generic_transform("lhl"), "l");
    }

    #[test]
    fn test_reduce_vowels() {
        assert_eq!(reduce_vowels(""), "");
        assert_eq!(reduce_vowels("svarz"), "svrz");
        assert_eq!(reduce_vowels("anna"), "ann");
        // only Latin vowels are dropped
        assert_eq!(reduce_vowels("шура"), "шура");
    }

    #[test]
    fn test_strip_diacritics() {
        assert_eq!(strip_diacritics("čeština"), "cestina");
        assert_eq!(strip_diacritics("plain"), "plain");
    }
}
