// src/pipeline/readers/mod.rs

pub mod document_reader;

pub use document_reader::{decode_document, read_raw_document, resolve_encoding, DEFAULT_ENCODING};
