use std::path::PathBuf;

use tracing::{debug, error, info, warn};

use super::classifier::{load_classifier, LanguageClassifier, FASTTEXT_LABEL_PREFIX};
use super::DetectorBackend;
use crate::data_model::LanguageGuess;
use crate::error::Result;
use crate::utils::text::flatten_for_classifier;

/// Code reported when a loaded model returns no prediction at all.
pub const UNKNOWN_LANGUAGE: &str = "un";
pub const TOP_K_PREDICTIONS: usize = 5;

#[derive(Debug, Clone)]
pub struct DetectorConfig {
    pub backend: DetectorBackend,
    pub model_path: PathBuf,
}

enum DetectorState {
    /// Nothing attempted yet; the first `detect` call loads the model.
    Unloaded(DetectorConfig),
    Loaded(Box<dyn LanguageClassifier>),
    /// No model available. Every call answers `{language: None, confidence: 0}`.
    Shallow,
}

/// Lazily initialised language detection capability.
///
/// Each worker owns one detector. The load is attempted once; if it yields no
/// model the detector stays in shallow mode and never retries.
pub struct LanguageDetector {
    state: DetectorState,
}

impl LanguageDetector {
    pub fn new(config: DetectorConfig) -> Self {
        LanguageDetector {
            state: DetectorState::Unloaded(config),
        }
    }

    pub fn shallow() -> Self {
        LanguageDetector {
            state: DetectorState::Shallow,
        }
    }

    pub fn with_classifier(classifier: Box<dyn LanguageClassifier>) -> Self {
        LanguageDetector {
            state: DetectorState::Loaded(classifier),
        }
    }

    pub fn is_shallow(&self) -> bool {
        matches!(self.state, DetectorState::Shallow)
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self.state, DetectorState::Loaded(_))
    }

    fn ensure_initialized(&mut self) {
        let DetectorState::Unloaded(config) = &self.state else {
            return;
        };
        let config = config.clone();

        self.state = match load_classifier(config.backend, &config.model_path) {
            Ok(Some(classifier)) => {
                info!(
                    backend = classifier.name(),
                    path = %config.model_path.display(),
                    "Language detection model loaded"
                );
                DetectorState::Loaded(classifier)
            }
            Ok(None) => {
                warn!(
                    "No language detection model was found at: {}. Language detection will be executed in shallow mode.",
                    config.model_path.display()
                );
                DetectorState::Shallow
            }
            Err(e) => {
                error!(error = %e, "Failed to load language detection model. Falling back to shallow mode.");
                DetectorState::Shallow
            }
        };
    }

    /// Detects the language of `text`, loading the model on first use.
    pub fn detect(&mut self, text: &str) -> Result<LanguageGuess> {
        self.ensure_initialized();

        let classifier = match &self.state {
            DetectorState::Loaded(classifier) => classifier,
            _ => return Ok(LanguageGuess::shallow()),
        };

        let line = flatten_for_classifier(text);
        let predictions = classifier.predict(&line, TOP_K_PREDICTIONS)?;
        // Ties keep the model's own ranking.
        let best = predictions
            .into_iter()
            .reduce(|best, p| if p.score > best.score { p } else { best });

        let guess = match best {
            Some(prediction) => LanguageGuess {
                language: Some(
                    prediction
                        .label
                        .replace(FASTTEXT_LABEL_PREFIX, "")
                        .to_lowercase(),
                ),
                confidence: prediction.score,
            },
            None => LanguageGuess {
                language: Some(UNKNOWN_LANGUAGE.to_string()),
                confidence: 0.0,
            },
        };
        debug!(language = ?guess.language, confidence = guess.confidence, "Detected language");
        Ok(guess)
    }
}
