use std::path::Path;

#[cfg(feature = "fasttext")]
use crate::error::PipelineError;
use crate::error::Result;

/// Label prefix used by fastText supervised models (`__label__en`).
pub const FASTTEXT_LABEL_PREFIX: &str = "__label__";

/// One labelled guess returned by a classifier.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub label: String,
    pub score: f32,
}

/// A language identification model treated as a black box: text in, scored
/// labels out. Implementations expect single-line input.
pub trait LanguageClassifier {
    fn name(&self) -> &'static str;

    /// Returns up to `k` predictions, best first.
    fn predict(&self, text: &str, k: usize) -> Result<Vec<Prediction>>;
}

/// fastText `lid.176` style model loaded from disk.
#[cfg(feature = "fasttext")]
pub struct FastTextClassifier {
    model: fasttext::FastText,
}

#[cfg(feature = "fasttext")]
impl FastTextClassifier {
    pub fn load(path: &Path) -> Result<Self> {
        let path_str = path.to_str().ok_or_else(|| {
            PipelineError::ModelError(format!("Model path is not valid UTF-8: {}", path.display()))
        })?;
        let mut model = fasttext::FastText::new();
        model.load_model(path_str).map_err(|e| {
            PipelineError::ModelError(format!(
                "Failed to load fastText model '{}': {}",
                path.display(),
                e
            ))
        })?;
        Ok(FastTextClassifier { model })
    }
}

#[cfg(feature = "fasttext")]
impl LanguageClassifier for FastTextClassifier {
    fn name(&self) -> &'static str {
        "fasttext"
    }

    fn predict(&self, text: &str, k: usize) -> Result<Vec<Prediction>> {
        let predictions = self
            .model
            .predict(text, k as i32, 0.0)
            .map_err(PipelineError::ModelError)?;
        Ok(predictions
            .into_iter()
            .map(|p| Prediction {
                label: p.label,
                score: p.prob,
            })
            .collect())
    }
}

/// Built-in trigram detector from `whatlang`; needs no model file.
///
/// Labels follow the fastText convention but carry ISO 639-3 codes (`__label__eng`).
#[derive(Debug, Default)]
pub struct WhatlangClassifier;

impl LanguageClassifier for WhatlangClassifier {
    fn name(&self) -> &'static str {
        "whatlang"
    }

    fn predict(&self, text: &str, k: usize) -> Result<Vec<Prediction>> {
        let predictions = whatlang::detect(text)
            .map(|info| Prediction {
                label: format!("{}{}", FASTTEXT_LABEL_PREFIX, info.lang().code()),
                score: info.confidence() as f32,
            })
            .into_iter()
            .take(k)
            .collect();
        Ok(predictions)
    }
}

/// Builds the classifier for `backend`, or `None` when it cannot be used
/// (model file missing, feature disabled). Load failures are errors.
pub fn load_classifier(
    backend: super::DetectorBackend,
    model_path: &Path,
) -> Result<Option<Box<dyn LanguageClassifier>>> {
    match backend {
        super::DetectorBackend::Whatlang => Ok(Some(Box::new(WhatlangClassifier))),
        super::DetectorBackend::FastText => load_fasttext(model_path),
    }
}

#[cfg(feature = "fasttext")]
fn load_fasttext(model_path: &Path) -> Result<Option<Box<dyn LanguageClassifier>>> {
    if !model_path.exists() {
        return Ok(None);
    }
    Ok(Some(Box::new(FastTextClassifier::load(model_path)?)))
}

#[cfg(not(feature = "fasttext"))]
fn load_fasttext(model_path: &Path) -> Result<Option<Box<dyn LanguageClassifier>>> {
    tracing::warn!(
        path = %model_path.display(),
        "Built without the `fasttext` feature; the fastText model cannot be used"
    );
    Ok(None)
}
