use std::path::PathBuf;

use clap::Parser;

use crate::config::batch::{load_batch_config, BatchConfig};
use crate::error::Result;
use crate::pipeline::language::DetectorBackend;

/// Converts book-like XML documents into tab-separated, language-tagged records.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Glob pattern of input documents [default: input/*.fb2]
    pub input: Option<String>,

    /// Directory receiving `<name>.xml` and `<name>.tsv` per input [default: output]
    pub output_dir: Option<PathBuf>,

    /// Reprocess files even if both outputs already exist
    #[arg(long)]
    pub force: bool,

    /// Path of the language detection model [default: models/lid.176.bin]
    #[arg(long, env = "LD_MODEL_PATH")]
    pub ld_model_path: Option<PathBuf>,

    /// Where to download the model from if it is missing; empty disables the download
    #[arg(long, env = "LD_MODEL_URL")]
    pub ld_model_url: Option<String>,

    /// Never download the model; run in shallow mode if it is missing
    #[arg(long)]
    pub no_fetch: bool,

    /// Number of parallel workers [default: available parallelism]
    #[arg(short = 'j', long)]
    pub workers: Option<usize>,

    /// Language detection backend
    #[arg(long, value_enum)]
    pub detector: Option<DetectorBackend>,

    /// Optional YAML file with batch settings; command line values take precedence
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Optional: Port for the Prometheus metrics HTTP endpoint
    #[arg(long)]
    pub metrics_port: Option<u16>,

    /// Validate the configuration and exit
    #[arg(long)]
    pub validate_config: bool,
}

impl Args {
    /// Merges the optional config file with the command line and validates the result.
    pub fn resolve(&self) -> Result<BatchConfig> {
        let mut config = match &self.config {
            Some(path) => load_batch_config(path)?,
            None => BatchConfig::default(),
        };

        if let Some(input) = &self.input {
            config.input = input.clone();
        }
        if let Some(output_dir) = &self.output_dir {
            config.output_dir = output_dir.clone();
        }
        if self.force {
            config.force = true;
        }
        if let Some(path) = &self.ld_model_path {
            config.language.model_path = path.clone();
        }
        if let Some(url) = &self.ld_model_url {
            config.language.model_url = Some(url.clone()).filter(|u| !u.trim().is_empty());
        }
        if self.no_fetch {
            config.language.fetch = false;
        }
        if let Some(workers) = self.workers {
            config.workers = Some(workers);
        }
        if let Some(backend) = self.detector {
            config.language.backend = backend;
        }

        config.validate()?;
        Ok(config)
    }
}
