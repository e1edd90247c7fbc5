//! Intent classification and reply selection for a conversational weather bot.
//!
//! Utterances are normalized (lowercase, no accents, no punctuation), turned
//! into bag-of-words counts and scored by a multinomial Naive Bayes model
//! trained on example utterances per category. A confident match yields one
//! of the category's configured responses; anything else yields a fallback
//! message.
//!
//! # Basic Usage
//!
//! ```rust
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use weatherwiz::{Classifier, ClassDefinition};
//! use rand::thread_rng;
//!
//! let classifier = Classifier::builder()
//!     .add_class(
//!         ClassDefinition::new("saludo")
//!             .with_examples(vec!["hola", "buenas"])
//!             .with_responses(vec!["¡Hola!"])
//!     )?
//!     .add_class(
//!         ClassDefinition::new("clima")
//!             .with_examples(vec!["que clima hay", "va a llover"])
//!             .with_responses(vec!["Hoy está soleado."])
//!     )?
//!     .build()?;
//!
//! let result = classifier.predict("hola");
//! println!("Predicted class: {} ({:.2})", result.label, result.confidence());
//!
//! let outcome = classifier.classify("xyz123", &mut thread_rng())?;
//! assert_eq!(outcome.text(), "Lo siento, no entendí bien tu consulta.");
//! # Ok(())
//! # }
//! ```
//!
//! # Corpus files
//!
//! Training data usually lives in a YAML document split into sections
//! (`conversation`, `weather`, `weather_status`). [`ModelManager`] loads it
//! and caches one fitted classifier per section set:
//!
//! ```rust,no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use weatherwiz::ModelManager;
//!
//! let manager = ModelManager::new("data/dataset.yml");
//! let classifier = manager.classifier(["conversation", "weather"])?;
//! println!("{:?}", classifier.info());
//! # Ok(())
//! # }
//! ```

pub mod classifier;
pub mod config;
pub mod corpus;
pub mod dispatch;
pub mod location;
pub mod model_manager;

pub use classifier::{
    ClassDefinition, ClassificationResult, Classifier, ClassifierBuilder, ClassifierError,
    ClassifierInfo, ResponseOutcome,
};
pub use config::{ClassifierConfig, DEFAULT_FALLBACK_MESSAGE, DEFAULT_THRESHOLD};
pub use corpus::{Corpus, CorpusError, CorpusFile, Section};
pub use dispatch::{
    build_message, ChatAction, DayAndTime, WeatherBot, WeatherDetails, WeatherMessage, WeatherQuery,
};
pub use location::{validate_location, LocationBook, LocationUpdate};
pub use model_manager::ModelManager;

pub fn init_logger() {
    env_logger::init();
}
