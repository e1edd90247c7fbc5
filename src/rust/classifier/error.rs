use std::fmt;

use crate::corpus::CorpusError;

/// Represents the different types of errors that can occur while building or
/// querying the intent classifier.
#[derive(Debug)]
pub enum ClassifierError {
    /// The corpus source is missing or malformed, or a requested section is invalid
    ConfigError(String),
    /// No training examples were available for the requested sections
    EmptyCorpusError(String),
    /// A category has no candidate responses configured
    MissingResponsesError(String),
    /// Error occurred due to invalid input parameters
    ValidationError(String),
}

impl fmt::Display for ClassifierError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigError(msg) => write!(f, "Config error: {}", msg),
            Self::EmptyCorpusError(msg) => write!(f, "Empty corpus: {}", msg),
            Self::MissingResponsesError(label) => {
                write!(f, "No responses configured for category '{}'", label)
            }
            Self::ValidationError(msg) => write!(f, "Validation error: {}", msg),
        }
    }
}

impl std::error::Error for ClassifierError {}

impl From<CorpusError> for ClassifierError {
    fn from(err: CorpusError) -> Self {
        ClassifierError::ConfigError(err.to_string())
    }
}
