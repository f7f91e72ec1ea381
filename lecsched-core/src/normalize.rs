//! Diacritic-insensitive name matching for Vietnamese text.

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Strip diacritics: canonical decomposition, drop combining marks, and
/// fold `đ`/`Đ` (which have no decomposition) to `d`/`D`.
pub fn fold_diacritics(s: &str) -> String {
    s.nfd()
        .filter(|c| !is_combining_mark(*c))
        .map(|c| match c {
            'đ' => 'd',
            'Đ' => 'D',
            other => other,
        })
        .collect()
}

/// Comparison key: trimmed, diacritic-folded, lowercase.
pub fn fold_key(s: &str) -> String {
    fold_diacritics(s.trim()).to_lowercase()
}

/// Whether two names are equal ignoring case, diacritics and surrounding whitespace.
pub fn names_match(a: &str, b: &str) -> bool {
    fold_key(a) == fold_key(b)
}
