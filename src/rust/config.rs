use crate::classifier::ClassifierError;

/// Minimum winning probability for an utterance to count as recognized.
pub const DEFAULT_THRESHOLD: f64 = 0.5;

/// Reply used when no category is confident enough.
pub const DEFAULT_FALLBACK_MESSAGE: &str = "Lo siento, no entendí bien tu consulta.";

/// Decision settings applied on top of the fitted model.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifierConfig {
    /// An utterance whose best category scores below this is unrecognized
    pub threshold: f64,
    /// Text returned for unrecognized utterances
    pub fallback_message: String,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            fallback_message: DEFAULT_FALLBACK_MESSAGE.to_string(),
        }
    }
}

impl ClassifierConfig {
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_fallback_message(mut self, message: impl Into<String>) -> Self {
        self.fallback_message = message.into();
        self
    }

    pub fn validate(&self) -> Result<(), ClassifierError> {
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(ClassifierError::ValidationError(format!(
                "Threshold must be within [0, 1], got {}",
                self.threshold
            )));
        }
        if self.fallback_message.trim().is_empty() {
            return Err(ClassifierError::ValidationError(
                "Fallback message cannot be empty".into(),
            ));
        }
        Ok(())
    }
}
