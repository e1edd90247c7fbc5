use std::collections::{BTreeSet, HashMap};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use dirs;
use log;
use parking_lot::RwLock;
use sha2::{Digest, Sha256};

use crate::classifier::{Classifier, ClassifierError};
use crate::config::ClassifierConfig;
use crate::corpus::{parse_sections, CorpusError, CorpusFile, Section};

/// A fitted classifier and the SHA-256 digest of the corpus it was fitted on.
#[derive(Debug)]
struct CachedModel {
    model: Arc<Classifier>,
    corpus_digest: String,
}

/// Fitted classifiers keyed by the set of sections they were trained on.
type ModelCache = HashMap<BTreeSet<Section>, CachedModel>;

/// Loads the corpus file and keeps one fitted classifier per distinct
/// section set.
///
/// Lookups share models through `Arc`; `refit` and `evict_all` take the write
/// lock, so a refit never races a concurrent fit of the same set.
#[derive(Clone, Debug)]
pub struct ModelManager {
    corpus_path: PathBuf,
    config: ClassifierConfig,
    models: Arc<RwLock<ModelCache>>,
}

impl ModelManager {
    /// Creates a ModelManager reading the corpus at the default location
    pub fn new_default() -> Self {
        Self::new(Self::default_corpus_path())
    }

    /// Returns the default corpus file path
    pub fn default_corpus_path() -> PathBuf {
        // 1. Check environment variable
        if let Ok(path) = env::var("WEATHERWIZ_CORPUS") {
            return PathBuf::from(path);
        }

        // 2. Use platform-specific config directory
        if let Some(config_dir) = dirs::config_dir() {
            return config_dir.join("weatherwiz").join("dataset.yml");
        }

        // 3. Fallback to user's home directory
        if let Some(home_dir) = dirs::home_dir() {
            return home_dir.join(".config").join("weatherwiz").join("dataset.yml");
        }

        // 4. If all else fails, use system temp directory
        env::temp_dir().join("weatherwiz").join("dataset.yml")
    }

    pub fn new<P: AsRef<Path>>(corpus_path: P) -> Self {
        Self {
            corpus_path: corpus_path.as_ref().to_path_buf(),
            config: ClassifierConfig::default(),
            models: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Sets the decision settings used for every model fitted from now on
    pub fn with_config(mut self, config: ClassifierConfig) -> Result<Self, ClassifierError> {
        config.validate()?;
        self.config = config;
        Ok(self)
    }

    pub fn corpus_path(&self) -> &Path {
        &self.corpus_path
    }

    /// Returns the classifier for the given sections, fitting it on first use.
    ///
    /// # Errors
    /// - `ConfigError` for unknown sections or an unreadable/malformed corpus
    /// - `EmptyCorpusError` / `MissingResponsesError` from fitting
    pub fn classifier<I, S>(&self, section_names: I) -> Result<Arc<Classifier>, ClassifierError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let sections = parse_sections(section_names)?;

        if let Some(cached) = self.models.read().get(&sections) {
            log::debug!("Using cached model for {:?}", sections);
            return Ok(Arc::clone(&cached.model));
        }

        let mut models = self.models.write();
        // another caller may have fitted it while we waited for the lock
        if let Some(cached) = models.get(&sections) {
            return Ok(Arc::clone(&cached.model));
        }
        let cached = self.fit(&sections)?;
        let model = Arc::clone(&cached.model);
        models.insert(sections, cached);
        Ok(model)
    }

    /// Reloads the corpus and replaces the cached model for the given sections.
    pub fn refit<I, S>(&self, section_names: I) -> Result<Arc<Classifier>, ClassifierError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let sections = parse_sections(section_names)?;
        let mut models = self.models.write();
        log::info!("Refitting model for {:?}", sections);
        let cached = self.fit(&sections)?;
        let model = Arc::clone(&cached.model);
        models.insert(sections, cached);
        Ok(model)
    }

    pub fn is_cached<I, S>(&self, section_names: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        match parse_sections(section_names) {
            Ok(sections) => self.models.read().contains_key(&sections),
            Err(_) => false,
        }
    }

    pub fn evict_all(&self) {
        let mut models = self.models.write();
        log::info!("Evicting {} cached models", models.len());
        models.clear();
    }

    /// Whether any cached model was fitted on a corpus that differs from the
    /// file on disk. Returns `false` if nothing is cached.
    pub fn corpus_changed(&self) -> Result<bool, ClassifierError> {
        let models = self.models.read();
        if models.is_empty() {
            return Ok(false);
        }
        let actual = digest_file(&self.corpus_path)?;
        log::debug!("Corpus digest on disk: {}", actual);
        Ok(models.values().any(|cached| cached.corpus_digest != actual))
    }

    /// Evicts every cached model if the corpus file changed on disk.
    /// Returns whether anything was evicted.
    pub fn reload_if_changed(&self) -> Result<bool, ClassifierError> {
        if !self.corpus_changed()? {
            return Ok(false);
        }
        log::warn!("Corpus {:?} changed on disk, dropping cached models", self.corpus_path);
        self.evict_all();
        Ok(true)
    }

    fn fit(&self, sections: &BTreeSet<Section>) -> Result<CachedModel, ClassifierError> {
        log::info!("Fitting model for sections {:?} from {:?}", sections, self.corpus_path);
        let bytes = fs::read(&self.corpus_path).map_err(CorpusError::from)?;
        let corpus_digest = hex_digest(&bytes);

        let text = String::from_utf8(bytes).map_err(CorpusError::from)?;
        let corpus = CorpusFile::from_yaml_str(&text)?.merge(sections)?;

        let model = Classifier::builder()
            .with_config(self.config.clone())?
            .with_corpus(&corpus)?
            .build()?;
        Ok(CachedModel {
            model: Arc::new(model),
            corpus_digest,
        })
    }
}

fn hex_digest(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

fn digest_file(path: &Path) -> Result<String, ClassifierError> {
    let bytes = fs::read(path).map_err(CorpusError::from)?;
    Ok(hex_digest(&bytes))
}
