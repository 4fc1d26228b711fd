// src/utils/prometheus_metrics.rs

use once_cell::sync::Lazy;
use prometheus::{register_counter, register_gauge, register_histogram, Counter, Gauge, Histogram};

// Per-file outcomes
pub static FILES_PROCESSED_TOTAL: Lazy<Counter> = Lazy::new(|| {
    register_counter!(
        "files_processed_total",
        "Total number of input files converted."
    )
    .expect("Failed to register FILES_PROCESSED_TOTAL counter")
});

pub static FILES_IGNORED_TOTAL: Lazy<Counter> = Lazy::new(|| {
    register_counter!(
        "files_ignored_total",
        "Total number of input files skipped because their outputs already exist."
    )
    .expect("Failed to register FILES_IGNORED_TOTAL counter")
});

pub static FILES_FAILED_TOTAL: Lazy<Counter> = Lazy::new(|| {
    register_counter!(
        "files_failed_total",
        "Total number of input files that failed to convert."
    )
    .expect("Failed to register FILES_FAILED_TOTAL counter")
});

pub static RECORDS_EMITTED_TOTAL: Lazy<Counter> = Lazy::new(|| {
    register_counter!(
        "records_emitted_total",
        "Total number of records written to records files."
    )
    .expect("Failed to register RECORDS_EMITTED_TOTAL counter")
});

pub static FILE_PROCESSING_DURATION_SECONDS: Lazy<Histogram> = Lazy::new(|| {
    register_histogram!(
        "file_processing_duration_seconds",
        "Histogram of per-file conversion durations."
    )
    .expect("Failed to register FILE_PROCESSING_DURATION_SECONDS histogram")
});

pub static ACTIVE_WORKERS: Lazy<Gauge> = Lazy::new(|| {
    register_gauge!(
        "active_workers",
        "Number of batch workers currently running."
    )
    .expect("Failed to register ACTIVE_WORKERS gauge")
});
