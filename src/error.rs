use std::path::PathBuf;

use thiserror::Error;

/// Custom Result type for this crate.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// The Error type for conversion operations.
///
/// Per-file errors (input, decode, I/O) are caught by the batch dispatcher and
/// counted; setup errors (config, discovery, model fetch) reach `main`.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Configuration validation error: {0}")]
    ConfigValidationError(String),

    #[error("I/O error: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },

    #[error("Input file does not exist: {}", .0.display())]
    InputNotFound(PathBuf),

    #[error("Unsupported encoding: '{0}'")]
    UnsupportedEncoding(String),

    #[error("Error in pipeline stage '{step_name}': {source}")]
    StepError {
        step_name: String,
        source: Box<PipelineError>,
    },

    #[error("Fetch error: {0}")]
    FetchError(String),

    #[error("Language model error: {0}")]
    ModelError(String),

    #[error("Input discovery error: {0}")]
    DiscoveryError(String),

    #[error("Serialization/Deserialization error: {source}")]
    SerializationError {
        #[from]
        source: serde_yaml::Error,
    },

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl From<reqwest::Error> for PipelineError {
    fn from(err: reqwest::Error) -> Self {
        PipelineError::FetchError(err.to_string())
    }
}

impl From<glob::PatternError> for PipelineError {
    fn from(err: glob::PatternError) -> Self {
        PipelineError::DiscoveryError(err.to_string())
    }
}
