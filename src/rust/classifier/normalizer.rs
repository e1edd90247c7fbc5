//! Text canonicalization applied to both training examples and incoming
//! utterances before they reach the vectorizer.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Canonicalizes text so that case and accent variants of a word collide.
///
/// The text is lowercased, decomposed (NFD) with its combining marks dropped,
/// and stripped of every character that is neither alphanumeric nor
/// whitespace. Whitespace runs are kept as-is; splitting is left to
/// [`tokenize`].
///
/// ```
/// use weatherwiz::classifier::normalize;
///
/// assert_eq!(normalize("¿Qué DÍA es hoy?"), "que dia es hoy");
/// ```
pub fn normalize(text: &str) -> String {
    text.to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect()
}

/// Splits normalized text into tokens on whitespace.
pub fn tokenize(normalized: &str) -> impl Iterator<Item = &str> {
    normalized.split_whitespace()
}
