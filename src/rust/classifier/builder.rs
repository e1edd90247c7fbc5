use std::sync::Arc;

use indexmap::IndexMap;
use log::{debug, info, warn};

use super::classifier::Classifier;
use super::error::ClassifierError;
use super::naive_bayes::MultinomialNaiveBayes;
use super::normalizer::normalize;
use super::vectorizer::Vocabulary;
use crate::config::ClassifierConfig;
use crate::corpus::{CategoryMap, Corpus};

/// Represents a category with its example utterances and candidate responses
#[derive(Debug, Clone)]
pub struct ClassDefinition {
    /// The unique identifier for the category
    pub label: String,
    /// Utterances that belong to this category; used for training
    pub examples: Vec<String>,
    /// Replies the bot may give when this category is recognized
    pub responses: Vec<String>,
}

impl ClassDefinition {
    /// Creates a new class definition with no examples or responses
    ///
    /// # Example
    /// ```
    /// use weatherwiz::ClassDefinition;
    ///
    /// let class = ClassDefinition::new("saludo")
    ///     .with_examples(vec!["hola", "buenas"])
    ///     .with_responses(vec!["¡Hola!"]);
    /// assert_eq!(class.examples.len(), 2);
    /// ```
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            examples: Vec::new(),
            responses: Vec::new(),
        }
    }

    pub fn with_examples(mut self, examples: Vec<impl Into<String>>) -> Self {
        self.examples = examples.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_responses(mut self, responses: Vec<impl Into<String>>) -> Self {
        self.responses = responses.into_iter().map(Into::into).collect();
        self
    }
}

/// A builder for fitting a Classifier with a fluent interface.
#[derive(Default, Debug)]
pub struct ClassifierBuilder {
    class_examples: IndexMap<String, Vec<String>>,
    class_responses: CategoryMap,
    config: ClassifierConfig,
}

impl ClassifierBuilder {
    /// Creates a new empty ClassifierBuilder instance with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the decision threshold and fallback text
    ///
    /// # Example
    /// ```
    /// use weatherwiz::{ClassifierBuilder, ClassifierConfig};
    ///
    /// let builder = ClassifierBuilder::new()
    ///     .with_config(ClassifierConfig::default().with_threshold(0.6))
    ///     .unwrap();
    /// ```
    pub fn with_config(mut self, config: ClassifierConfig) -> Result<Self, ClassifierError> {
        config.validate()?;
        self.config = config;
        Ok(self)
    }

    /// Validates class data according to the following rules:
    /// - Label must not be empty
    /// - Must have at least one example
    /// - No example text can be empty
    /// - Label must not already be registered
    fn validate_class_data(&self, label: &str, examples: &[impl AsRef<str>]) -> Result<(), ClassifierError> {
        if label.trim().is_empty() {
            return Err(ClassifierError::ValidationError("Class label cannot be empty".into()));
        }
        if examples.is_empty() {
            return Err(ClassifierError::ValidationError(
                format!("Class '{}' must have at least one example", label)
            ));
        }
        if let Some(pos) = examples.iter().position(|e| e.as_ref().trim().is_empty()) {
            return Err(ClassifierError::ValidationError(
                format!("Example {} of class '{}' cannot be empty", pos + 1, label)
            ));
        }
        if self.class_examples.contains_key(label) {
            return Err(ClassifierError::ValidationError(
                format!("Class '{}' is already defined", label)
            ));
        }
        Ok(())
    }

    /// Adds a category with its examples and responses
    ///
    /// # Returns
    /// * `Result<Self, ClassifierError>` - The builder instance if successful, or an error if:
    ///   - The class label is empty or already defined
    ///   - No examples are provided
    ///   - Any example text is empty
    ///
    /// Missing responses are only reported by [`build`](Self::build), so that
    /// responses can also come from a corpus.
    pub fn add_class(mut self, class: ClassDefinition) -> Result<Self, ClassifierError> {
        self.validate_class_data(&class.label, &class.examples)?;
        self.class_examples.insert(class.label.clone(), class.examples);
        if !class.responses.is_empty() {
            self.class_responses.insert(class.label, class.responses);
        }
        Ok(self)
    }

    /// Adds every category of a merged corpus.
    ///
    /// Categories without examples are skipped. Responses are taken from the
    /// corpus outputs; outputs without a matching input category are kept so
    /// they stay available to response selection.
    pub fn with_corpus(mut self, corpus: &Corpus) -> Result<Self, ClassifierError> {
        for (label, examples) in &corpus.inputs {
            if examples.is_empty() {
                warn!("Skipping category '{}': no examples", label);
                continue;
            }
            self.validate_class_data(label, examples)?;
            self.class_examples.insert(label.clone(), examples.clone());
        }
        for (label, responses) in &corpus.outputs {
            self.class_responses
                .entry(label.clone())
                .or_insert_with(|| responses.clone());
        }
        Ok(self)
    }

    /// Fits the vocabulary and the Naive Bayes model and returns the Classifier
    ///
    /// # Returns
    /// * `Result<Classifier, ClassifierError>` - The fitted Classifier if successful, or an error if:
    ///   - No classes have been added (`EmptyCorpusError`)
    ///   - A class has no candidate responses (`MissingResponsesError`)
    ///
    /// # Example
    /// ```
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// use weatherwiz::{ClassifierBuilder, ClassDefinition};
    ///
    /// let classifier = ClassifierBuilder::new()
    ///     .add_class(
    ///         ClassDefinition::new("saludo")
    ///             .with_examples(vec!["hola", "buenas"])
    ///             .with_responses(vec!["¡Hola!"])
    ///     )?
    ///     .build()?;
    /// assert_eq!(classifier.info().num_classes, 1);
    /// # Ok(())
    /// # }
    /// ```
    pub fn build(self) -> Result<Classifier, ClassifierError> {
        if self.class_examples.is_empty() {
            return Err(ClassifierError::EmptyCorpusError(
                "At least one class with examples must be added".to_string(),
            ));
        }
        if let Some(label) = self
            .class_examples
            .keys()
            .find(|label| self.class_responses.get(*label).map_or(true, Vec::is_empty))
        {
            return Err(ClassifierError::MissingResponsesError(label.clone()));
        }

        let mut documents = Vec::new();
        let mut targets = Vec::new();
        for (label, examples) in &self.class_examples {
            debug!("Processing class '{}' ({} examples)", label, examples.len());
            for example in examples {
                documents.push(normalize(example));
                targets.push(label.clone());
            }
        }

        let vocabulary = Vocabulary::fit(documents.iter().map(String::as_str));
        let features = vocabulary.transform_all(&documents);
        let model = MultinomialNaiveBayes::fit(&features, &targets)?;

        info!(
            "Classifier fitted: {} classes, {} examples, vocabulary of {} tokens",
            model.labels().len(),
            documents.len(),
            vocabulary.len()
        );

        Ok(Classifier {
            vocabulary: Arc::new(vocabulary),
            model: Arc::new(model),
            responses: Arc::new(self.class_responses),
            config: self.config,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn saludo() -> ClassDefinition {
        ClassDefinition::new("saludo")
            .with_examples(vec!["hola", "buenas"])
            .with_responses(vec!["¡Hola!"])
    }

    #[test]
    fn test_class_validation() {
        assert!(ClassifierBuilder::new()
            .add_class(ClassDefinition::new("").with_examples(vec!["hola"]))
            .is_err());
        assert!(ClassifierBuilder::new()
            .add_class(ClassDefinition::new("saludo"))
            .is_err());
        assert!(ClassifierBuilder::new()
            .add_class(ClassDefinition::new("saludo").with_examples(vec!["hola", " "]))
            .is_err());
    }

    #[test]
    fn test_duplicate_class() {
        let result = ClassifierBuilder::new()
            .add_class(saludo())
            .and_then(|builder| builder.add_class(saludo()));
        assert!(matches!(result, Err(ClassifierError::ValidationError(_))));
    }

    #[test]
    fn test_build_without_classes() {
        let result = ClassifierBuilder::new().build();
        assert!(matches!(result, Err(ClassifierError::EmptyCorpusError(_))));
    }

    #[test]
    fn test_build_without_responses() {
        let result = ClassifierBuilder::new()
            .add_class(ClassDefinition::new("clima").with_examples(vec!["va a llover"]))
            .and_then(ClassifierBuilder::build);
        assert!(matches!(result, Err(ClassifierError::MissingResponsesError(label)) if label == "clima"));
    }

    #[test]
    fn test_corpus_with_only_empty_categories() {
        let mut corpus = Corpus::default();
        corpus.inputs.insert("saludo".into(), vec![]);
        corpus.outputs.insert("saludo".into(), vec!["¡Hola!".into()]);
        let result = ClassifierBuilder::new().with_corpus(&corpus).and_then(ClassifierBuilder::build);
        assert!(matches!(result, Err(ClassifierError::EmptyCorpusError(_))));
    }

    #[test]
    fn test_invalid_config() {
        let result = ClassifierBuilder::new().with_config(ClassifierConfig::default().with_threshold(-0.1));
        assert!(matches!(result, Err(ClassifierError::ValidationError(_))));
    }
}
