use std::collections::HashMap;

use ndarray::{Array1, Array2};

use super::normalizer::tokenize;

/// Bag-of-words vocabulary mapping each distinct token to a feature index.
///
/// Indices are assigned in first-seen order while fitting. Documents are
/// expected to be normalized already.
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    index: HashMap<String, usize>,
    tokens: Vec<String>,
}

impl Vocabulary {
    /// Builds the vocabulary from a collection of normalized documents.
    pub fn fit<'a, I>(documents: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut vocabulary = Self::default();
        for document in documents {
            for token in tokenize(document) {
                if !vocabulary.index.contains_key(token) {
                    vocabulary.index.insert(token.to_string(), vocabulary.tokens.len());
                    vocabulary.tokens.push(token.to_string());
                }
            }
        }
        vocabulary
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Returns the feature index of a token, if it was seen while fitting.
    pub fn get(&self, token: &str) -> Option<usize> {
        self.index.get(token).copied()
    }

    /// Tokens in index order.
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Converts a normalized document into a raw token-count vector.
    /// Out-of-vocabulary tokens are dropped.
    pub fn transform(&self, document: &str) -> Array1<f64> {
        let mut counts = Array1::zeros(self.len());
        for token in tokenize(document) {
            if let Some(i) = self.get(token) {
                counts[i] += 1.0;
            }
        }
        counts
    }

    /// Stacks the count vectors of several documents into a `(documents, vocabulary)` matrix.
    pub fn transform_all(&self, documents: &[String]) -> Array2<f64> {
        let mut matrix = Array2::zeros((documents.len(), self.len()));
        for (row, document) in documents.iter().enumerate() {
            matrix.row_mut(row).assign(&self.transform(document));
        }
        matrix
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_seen_order() {
        let vocabulary = Vocabulary::fit(["que clima hay", "va a llover", "hay sol"]);
        assert_eq!(
            vocabulary.tokens(),
            &["que", "clima", "hay", "va", "a", "llover", "sol"]
        );
        assert_eq!(vocabulary.get("hay"), Some(2));
        assert_eq!(vocabulary.get("nieve"), None);
    }

    #[test]
    fn test_transform_counts_and_ignores_unknown() {
        let vocabulary = Vocabulary::fit(["va a llover"]);
        let counts = vocabulary.transform("llover llover mucho");
        assert_eq!(counts.to_vec(), vec![0.0, 0.0, 2.0]);
    }

    #[test]
    fn test_transform_all_shape() {
        let vocabulary = Vocabulary::fit(["hola", "buenas tardes"]);
        let docs = vec!["hola".to_string(), "buenas buenas".to_string()];
        let matrix = vocabulary.transform_all(&docs);
        assert_eq!(matrix.dim(), (2, 3));
        assert_eq!(matrix[[1, 1]], 2.0);
    }

    #[test]
    fn test_empty_documents() {
        let vocabulary = Vocabulary::fit(["", "   "]);
        assert!(vocabulary.is_empty());
        assert_eq!(vocabulary.transform("anything").len(), 0);
    }
}
