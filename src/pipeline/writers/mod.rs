pub mod base_writer;
pub mod tsv_writer;

pub use base_writer::BaseWriter;
pub use tsv_writer::{commit, stage_metadata, stage_records, TsvWriter};
