// src/config/mod.rs

pub mod batch;
pub mod cli;

pub use batch::{load_batch_config, BatchConfig, LanguageModelConfig};
pub use cli::Args;
