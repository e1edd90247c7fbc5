mod error;
mod naive_bayes;
mod normalizer;
mod response;
mod utils;
mod vectorizer;
pub mod builder;
#[allow(clippy::module_inception)]
mod classifier;

pub use error::ClassifierError;
pub use classifier::{Classifier, ClassificationResult};
pub use builder::{ClassifierBuilder, ClassDefinition};
pub use naive_bayes::MultinomialNaiveBayes;
pub use normalizer::{normalize, tokenize};
pub use response::{select_response, ResponseOutcome};
pub use vectorizer::Vocabulary;

/// Information about the current state and configuration of a classifier
#[derive(Debug, Clone)]
pub struct ClassifierInfo {
    /// Number of categories the classifier is trained on
    pub num_classes: usize,
    /// Labels of the categories, in score order
    pub class_labels: Vec<String>,
    /// Number of distinct tokens seen while fitting
    pub vocabulary_size: usize,
    /// Minimum confidence for a match
    pub threshold: f64,
}
