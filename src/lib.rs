#![allow(non_snake_case)]

// Declare the modules that form the library's public API
pub mod config;
pub mod data_model;
pub mod error;
pub mod executor;
pub mod pipeline;
pub mod producer_logic;
pub mod utils;
pub mod worker_logic;

pub use data_model::{BatchSummary, ExtractedRecord, RecordType, WorkerOutcome};
pub use error::{PipelineError, Result};
pub use executor::{DocumentPipeline, PipelineContext};
