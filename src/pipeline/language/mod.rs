// src/pipeline/language/mod.rs

mod classifier;
mod detector;

use serde::Deserialize;

pub use classifier::{
    load_classifier, LanguageClassifier, Prediction, WhatlangClassifier, FASTTEXT_LABEL_PREFIX,
};
#[cfg(feature = "fasttext")]
pub use classifier::FastTextClassifier;
pub use detector::{DetectorConfig, LanguageDetector, TOP_K_PREDICTIONS, UNKNOWN_LANGUAGE};

/// Which language identification backend a detector loads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DetectorBackend {
    /// fastText model read from the configured model path.
    #[default]
    #[value(name = "fasttext")]
    FastText,
    /// Built-in `whatlang` detector, no model file needed.
    Whatlang,
}
