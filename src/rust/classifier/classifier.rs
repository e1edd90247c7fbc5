use std::sync::Arc;

use indexmap::IndexMap;
use log::debug;
use rand::Rng;

use super::error::ClassifierError;
use super::naive_bayes::MultinomialNaiveBayes;
use super::normalizer::normalize;
use super::response::{select_response, ResponseOutcome};
use super::utils::argmax;
use super::vectorizer::Vocabulary;
use crate::config::ClassifierConfig;
use crate::corpus::CategoryMap;

/// The predicted category and the probability of every known category.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationResult {
    /// Category with the highest probability
    pub label: String,
    /// Probabilities in label order; they sum to one
    pub probabilities: IndexMap<String, f64>,
    /// Number of utterance tokens found in the vocabulary
    pub known_tokens: usize,
}

impl ClassificationResult {
    /// Probability of the predicted category.
    pub fn confidence(&self) -> f64 {
        self.probability(&self.label).unwrap_or(0.0)
    }

    pub fn probability(&self, label: &str) -> Option<f64> {
        self.probabilities.get(label).copied()
    }

    /// Categories sorted by descending probability.
    pub fn ranked(&self) -> Vec<(&str, f64)> {
        let mut ranked: Vec<(&str, f64)> = self
            .probabilities
            .iter()
            .map(|(label, &p)| (label.as_str(), p))
            .collect();
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        ranked
    }
}

/// A fitted bag-of-words Naive Bayes intent classifier.
///
/// # Thread Safety
///
/// The fitted state is immutable and held in `Arc`s, so a classifier can be
/// shared across threads for concurrent `predict`/`classify` calls:
///
/// ```rust
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use weatherwiz::{Classifier, ClassDefinition};
/// use std::sync::Arc;
/// use std::thread;
///
/// let classifier = Arc::new(Classifier::builder()
///     .add_class(
///         ClassDefinition::new("saludo")
///             .with_examples(vec!["hola"])
///             .with_responses(vec!["¡Hola!"])
///     )?
///     .build()?);
///
/// let classifier_clone = Arc::clone(&classifier);
/// thread::spawn(move || {
///     classifier_clone.predict("hola");
/// }).join().unwrap();
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Classifier {
    pub(crate) vocabulary: Arc<Vocabulary>,
    pub(crate) model: Arc<MultinomialNaiveBayes>,
    pub(crate) responses: Arc<CategoryMap>,
    pub(crate) config: ClassifierConfig,
}

// Compile-time verification of thread-safety
const _: () = {
    fn assert_send_sync<T: Send + Sync>() {}
    fn verify_thread_safety() {
        assert_send_sync::<Classifier>();
    }
};

impl Classifier {
    /// Creates a new ClassifierBuilder for fluent construction
    pub fn builder() -> super::builder::ClassifierBuilder {
        super::builder::ClassifierBuilder::new()
    }

    /// Returns information about the classifier's current state
    pub fn info(&self) -> super::ClassifierInfo {
        super::ClassifierInfo {
            num_classes: self.model.labels().len(),
            class_labels: self.model.labels().to_vec(),
            vocabulary_size: self.vocabulary.len(),
            threshold: self.config.threshold,
        }
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Candidate responses configured for a category
    pub fn responses(&self, label: &str) -> Option<&[String]> {
        self.responses.get(label).map(Vec::as_slice)
    }

    /// Computes the probability distribution over all categories.
    ///
    /// Never fails: tokens outside the vocabulary are ignored, so an
    /// utterance without known tokens scores from the class priors alone.
    /// On an exact tie the lexicographically smallest label wins.
    pub fn predict(&self, text: &str) -> ClassificationResult {
        let normalized = normalize(text);
        let counts = self.vocabulary.transform(&normalized);
        let known_tokens = counts.sum() as usize;
        let probs = self.model.predict_proba(&counts);

        let labels = self.model.labels();
        // the model always has at least one class
        let best = argmax(&probs).unwrap_or(0);
        let probabilities = labels.iter().cloned().zip(probs.iter().copied()).collect();

        ClassificationResult {
            label: labels[best].clone(),
            probabilities,
            known_tokens,
        }
    }

    /// Classifies an utterance and picks a reply.
    ///
    /// The outcome is `Unrecognized` (carrying the fallback text) when the
    /// best category scores below the threshold, or when the utterance shares
    /// no token with the training corpus.
    ///
    /// # Errors
    /// - `MissingResponsesError` if the predicted category has no responses
    ///
    /// # Example
    /// ```rust
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// use weatherwiz::{Classifier, ClassDefinition};
    /// use rand::{rngs::StdRng, SeedableRng};
    ///
    /// let classifier = Classifier::builder()
    ///     .add_class(ClassDefinition::new("saludo")
    ///         .with_examples(vec!["hola", "buenas"])
    ///         .with_responses(vec!["¡Hola!"]))?
    ///     .add_class(ClassDefinition::new("clima")
    ///         .with_examples(vec!["que clima hay", "va a llover"])
    ///         .with_responses(vec!["Hoy está soleado."]))?
    ///     .build()?;
    ///
    /// let mut rng = StdRng::seed_from_u64(1);
    /// let outcome = classifier.classify("¡Hola!", &mut rng)?;
    /// assert_eq!(outcome.text(), "¡Hola!");
    /// # Ok(())
    /// # }
    /// ```
    pub fn classify<R>(&self, text: &str, rng: &mut R) -> Result<ResponseOutcome, ClassifierError>
    where
        R: Rng + ?Sized,
    {
        let result = self.predict(text);
        debug!(
            "Classified {:?} as '{}' ({:.3}, {} known tokens)",
            text,
            result.label,
            result.confidence(),
            result.known_tokens
        );

        if result.known_tokens == 0 || result.confidence() < self.config.threshold {
            return Ok(ResponseOutcome::Unrecognized {
                message: self.config.fallback_message.clone(),
            });
        }

        let response = select_response(&result.label, &self.responses, rng)?;
        Ok(ResponseOutcome::Matched {
            label: result.label,
            response: response.to_string(),
        })
    }
}
