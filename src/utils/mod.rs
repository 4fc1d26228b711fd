// Utils

pub mod common;
pub mod discovery;
pub mod fetch;
pub mod prometheus_metrics;
pub mod text;

pub use discovery::discover_inputs;
pub use fetch::fetch;
pub use text::{flatten_field, normalize_text};
