use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{PipelineError, Result};
use crate::pipeline::language::{DetectorBackend, DetectorConfig};

pub const DEFAULT_INPUT_GLOB: &str = "input/*.fb2";
pub const DEFAULT_OUTPUT_DIR: &str = "output";
pub const DEFAULT_LD_MODEL_PATH: &str = "models/lid.176.bin";
// A compact (<1MB) alternative is lid.176.ftz from the same location.
pub const DEFAULT_LD_MODEL_URL: &str =
    "https://dl.fbaipublicfiles.com/fasttext/supervised-models/lid.176.bin";

fn default_input() -> String {
    DEFAULT_INPUT_GLOB.to_string()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_DIR)
}

fn default_model_path() -> PathBuf {
    PathBuf::from(DEFAULT_LD_MODEL_PATH)
}

fn default_model_url() -> Option<String> {
    Some(DEFAULT_LD_MODEL_URL.to_string())
}

fn default_true() -> bool {
    true
}

/// Settings of one conversion batch, from YAML and/or the command line.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct BatchConfig {
    /// Glob pattern selecting the input documents.
    #[serde(default = "default_input")]
    pub input: String,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Reprocess files whose outputs already exist.
    #[serde(default)]
    pub force: bool,
    /// Number of parallel workers; defaults to the available parallelism.
    #[serde(default)]
    pub workers: Option<usize>,
    #[serde(default)]
    pub language: LanguageModelConfig,
}

impl Default for BatchConfig {
    fn default() -> Self {
        BatchConfig {
            input: default_input(),
            output_dir: default_output_dir(),
            force: false,
            workers: None,
            language: LanguageModelConfig::default(),
        }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct LanguageModelConfig {
    #[serde(default)]
    pub backend: DetectorBackend,
    #[serde(default = "default_model_path")]
    pub model_path: PathBuf,
    /// Where to download the model from when it is missing locally.
    /// `None` means shallow mode in that case.
    #[serde(default = "default_model_url")]
    pub model_url: Option<String>,
    #[serde(default = "default_true")]
    pub fetch: bool,
}

impl Default for LanguageModelConfig {
    fn default() -> Self {
        LanguageModelConfig {
            backend: DetectorBackend::default(),
            model_path: default_model_path(),
            model_url: default_model_url(),
            fetch: true,
        }
    }
}

impl LanguageModelConfig {
    /// The URL to fetch from, if fetching applies at all.
    pub fn remote_source(&self) -> Option<&str> {
        if !self.fetch || self.backend != DetectorBackend::FastText {
            return None;
        }
        self.model_url.as_deref().filter(|url| !url.trim().is_empty())
    }

    pub fn detector_config(&self) -> DetectorConfig {
        DetectorConfig {
            backend: self.backend,
            model_path: self.model_path.clone(),
        }
    }
}

impl BatchConfig {
    pub fn validate(&self) -> Result<()> {
        if self.input.trim().is_empty() {
            return Err(PipelineError::ConfigValidationError(
                "input: glob pattern must not be empty".to_string(),
            ));
        }
        if self.output_dir.as_os_str().is_empty() {
            return Err(PipelineError::ConfigValidationError(
                "output_dir must not be empty".to_string(),
            ));
        }
        if self.workers == Some(0) {
            return Err(PipelineError::ConfigValidationError(
                "workers must be greater than 0".to_string(),
            ));
        }
        if self.language.model_path.as_os_str().is_empty() {
            return Err(PipelineError::ConfigValidationError(
                "language.model_path must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Worker count to use: the configured one, else the available parallelism.
    pub fn worker_count(&self) -> usize {
        self.workers.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        })
    }
}

/// Loads and parses a batch configuration YAML file.
pub fn load_batch_config<P: AsRef<Path>>(config_path: P) -> Result<BatchConfig> {
    let path_ref = config_path.as_ref();
    let config_content = fs::read_to_string(path_ref).map_err(|e| {
        PipelineError::ConfigError(format!(
            "Failed to read batch config file '{}': {}",
            path_ref.display(),
            e
        ))
    })?;

    serde_yaml::from_str(&config_content).map_err(|e| {
        PipelineError::ConfigError(format!(
            "Failed to parse batch config YAML from '{}': {}",
            path_ref.display(),
            e
        ))
    })
}
