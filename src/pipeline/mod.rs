// src/pipeline/mod.rs

pub mod language;
pub mod markup;
pub mod readers;
pub mod writers;
