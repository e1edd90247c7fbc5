//! Training corpus: example utterances and candidate responses per category,
//! grouped into topic sections of a YAML document.
//!
//! ```yaml
//! conversation:
//!   user_conversation:
//!     saludo: ["hola", "buenas"]
//!   chatbot_conversation:
//!     saludo: ["¡Hola!"]
//! weather:
//!   weather_user_inquiries: { ... }
//!   weather_chatbot_answers: { ... }
//! weather_status:
//!   weather_status: { ... }
//!   chatbot_recomendations: { ... }
//! ```

use std::collections::BTreeSet;
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;
use std::str::FromStr;

use indexmap::IndexMap;
use log::{debug, info};
use serde::Deserialize;

/// Category label to an ordered list of strings.
pub type CategoryMap = IndexMap<String, Vec<String>>;

#[derive(Debug, thiserror::Error)]
pub enum CorpusError {
    #[error("Unknown section: {0} (expected one of conversation, weather, weather_status)")]
    UnknownSection(String),
    #[error("Section '{0}' not found in corpus")]
    MissingSection(Section),
    #[error("Duplicate category '{label}' in {kind} of section '{section}'")]
    DuplicateCategory {
        label: String,
        kind: &'static str,
        section: Section,
    },
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
    #[error("Corpus is not valid UTF-8: {0}")]
    EncodingError(#[from] std::string::FromUtf8Error),
    #[error("Malformed corpus: {0}")]
    ParseError(#[from] serde_yaml::Error),
}

/// The topic sections a corpus document may contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Section {
    Conversation,
    Weather,
    WeatherStatus,
}

impl Section {
    pub const ALL: [Section; 3] = [Section::Conversation, Section::Weather, Section::WeatherStatus];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Conversation => "conversation",
            Self::Weather => "weather",
            Self::WeatherStatus => "weather_status",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Section {
    type Err = CorpusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|section| section.name() == s.trim())
            .ok_or_else(|| CorpusError::UnknownSection(s.to_string()))
    }
}

/// Parses a list of section names into a deduplicated, ordered set.
pub fn parse_sections<I, S>(names: I) -> Result<BTreeSet<Section>, CorpusError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    names.into_iter().map(|name| name.as_ref().parse()).collect()
}

/// Inputs and outputs of a single section.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SectionData {
    pub inputs: CategoryMap,
    pub outputs: CategoryMap,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConversationSection {
    user_conversation: CategoryMap,
    chatbot_conversation: CategoryMap,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct WeatherSection {
    weather_user_inquiries: CategoryMap,
    weather_chatbot_answers: CategoryMap,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct WeatherStatusSection {
    weather_status: CategoryMap,
    chatbot_recomendations: CategoryMap,
}

impl From<ConversationSection> for SectionData {
    fn from(s: ConversationSection) -> Self {
        Self { inputs: s.user_conversation, outputs: s.chatbot_conversation }
    }
}

impl From<WeatherSection> for SectionData {
    fn from(s: WeatherSection) -> Self {
        Self { inputs: s.weather_user_inquiries, outputs: s.weather_chatbot_answers }
    }
}

impl From<WeatherStatusSection> for SectionData {
    fn from(s: WeatherStatusSection) -> Self {
        Self { inputs: s.weather_status, outputs: s.chatbot_recomendations }
    }
}

#[derive(Debug, Deserialize)]
struct RawCorpusFile {
    conversation: Option<ConversationSection>,
    weather: Option<WeatherSection>,
    weather_status: Option<WeatherStatusSection>,
}

/// A parsed corpus document holding every section it defines.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CorpusFile {
    sections: IndexMap<Section, SectionData>,
}

impl CorpusFile {
    /// Reads and parses a corpus document from disk.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, CorpusError> {
        let path = path.as_ref();
        info!("Loading corpus from {:?}", path);
        let text = String::from_utf8(fs::read(path)?)?;
        Self::from_yaml_str(&text)
    }

    pub fn from_yaml_str(text: &str) -> Result<Self, CorpusError> {
        let raw: RawCorpusFile = serde_yaml::from_str(text)?;
        let mut sections = IndexMap::new();
        if let Some(s) = raw.conversation {
            sections.insert(Section::Conversation, s.into());
        }
        if let Some(s) = raw.weather {
            sections.insert(Section::Weather, s.into());
        }
        if let Some(s) = raw.weather_status {
            sections.insert(Section::WeatherStatus, s.into());
        }
        debug!("Corpus defines sections: {:?}", sections.keys().collect::<Vec<_>>());
        Ok(Self { sections })
    }

    pub fn section(&self, section: Section) -> Option<&SectionData> {
        self.sections.get(&section)
    }

    pub fn sections(&self) -> impl Iterator<Item = Section> + '_ {
        self.sections.keys().copied()
    }

    /// Merges the requested sections into one flat corpus.
    ///
    /// # Errors
    /// - `MissingSection` if a requested section is not defined in the document
    /// - `DuplicateCategory` if two sections share a category label
    pub fn merge(&self, sections: &BTreeSet<Section>) -> Result<Corpus, CorpusError> {
        let mut corpus = Corpus::default();
        for &section in sections {
            let data = self.section(section).ok_or(CorpusError::MissingSection(section))?;
            corpus.extend(section, data)?;
        }
        info!(
            "Merged sections {:?}: {} categories, {} examples",
            corpus.sections,
            corpus.inputs.len(),
            corpus.num_examples()
        );
        Ok(corpus)
    }
}

/// Training data for one classifier: the union of one or more sections.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Corpus {
    pub sections: Vec<Section>,
    pub inputs: CategoryMap,
    pub outputs: CategoryMap,
}

impl Corpus {
    /// Reads `path` and merges the named sections.
    ///
    /// # Example
    /// ```no_run
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// use weatherwiz::Corpus;
    ///
    /// let corpus = Corpus::load("data/dataset.yml", ["conversation", "weather"])?;
    /// println!("{} categories", corpus.inputs.len());
    /// # Ok(())
    /// # }
    /// ```
    pub fn load<P, I, S>(path: P, section_names: I) -> Result<Self, CorpusError>
    where
        P: AsRef<Path>,
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let sections = parse_sections(section_names)?;
        CorpusFile::from_path(path)?.merge(&sections)
    }

    /// Adds the categories of a section, rejecting labels that are already present.
    pub fn extend(&mut self, section: Section, data: &SectionData) -> Result<(), CorpusError> {
        for (kind, source, target) in [
            ("inputs", &data.inputs, &self.inputs),
            ("outputs", &data.outputs, &self.outputs),
        ] {
            if let Some(label) = source.keys().find(|label| target.contains_key(*label)) {
                return Err(CorpusError::DuplicateCategory {
                    label: label.clone(),
                    kind,
                    section,
                });
            }
        }
        self.inputs.extend(data.inputs.iter().map(|(k, v)| (k.clone(), v.clone())));
        self.outputs.extend(data.outputs.iter().map(|(k, v)| (k.clone(), v.clone())));
        self.sections.push(section);
        Ok(())
    }

    pub fn num_examples(&self) -> usize {
        self.inputs.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.num_examples() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CORPUS: &str = r#"
conversation:
  user_conversation:
    saludo: ["hola", "buenas"]
    despedida: ["chau"]
  chatbot_conversation:
    saludo: ["¡Hola!"]
    despedida: ["¡Hasta luego!"]
weather:
  weather_user_inquiries:
    clima actual: ["que clima hay"]
  weather_chatbot_answers:
    clima actual: ["clima actual"]
"#;

    #[test]
    fn test_section_names() {
        assert_eq!("weather_status".parse::<Section>().unwrap(), Section::WeatherStatus);
        assert!(matches!("forecast".parse::<Section>(), Err(CorpusError::UnknownSection(_))));
        let set = parse_sections(["weather", "conversation", "weather"]).unwrap();
        assert_eq!(set.into_iter().collect::<Vec<_>>(), vec![Section::Conversation, Section::Weather]);
    }

    #[test]
    fn test_merge_keeps_document_order() {
        let file = CorpusFile::from_yaml_str(CORPUS).unwrap();
        let corpus = file.merge(&parse_sections(["conversation", "weather"]).unwrap()).unwrap();
        let labels: Vec<&str> = corpus.inputs.keys().map(String::as_str).collect();
        assert_eq!(labels, vec!["saludo", "despedida", "clima actual"]);
        assert_eq!(corpus.num_examples(), 4);
        assert_eq!(corpus.outputs["saludo"], vec!["¡Hola!".to_string()]);
    }

    #[test]
    fn test_missing_section() {
        let file = CorpusFile::from_yaml_str(CORPUS).unwrap();
        let result = file.merge(&parse_sections(["weather_status"]).unwrap());
        assert!(matches!(result, Err(CorpusError::MissingSection(Section::WeatherStatus))));
    }

    #[test]
    fn test_duplicate_category_across_sections() {
        let mut corpus = Corpus::default();
        let data = SectionData {
            inputs: [("saludo".to_string(), vec!["hola".to_string()])].into_iter().collect(),
            outputs: CategoryMap::new(),
        };
        corpus.extend(Section::Conversation, &data).unwrap();
        let result = corpus.extend(Section::Weather, &data);
        assert!(matches!(
            result,
            Err(CorpusError::DuplicateCategory { kind: "inputs", section: Section::Weather, .. })
        ));
    }

    #[test]
    fn test_malformed_documents() {
        assert!(matches!(
            CorpusFile::from_yaml_str("conversation: [1, 2"),
            Err(CorpusError::ParseError(_))
        ));
        // outputs mapping is required
        assert!(matches!(
            CorpusFile::from_yaml_str("conversation:\n  user_conversation: {}\n"),
            Err(CorpusError::ParseError(_))
        ));
    }
}
