// src/producer_logic.rs

use std::fs;
use std::path::PathBuf;

use crossbeam_channel::unbounded;
use tracing::{info, info_span, warn};

use crate::config::LanguageModelConfig;
use crate::data_model::{BatchSummary, WorkerOutcome};
use crate::error::{PipelineError, Result};
use crate::executor::{DocumentPipeline, PipelineContext};
use crate::pipeline::language::{DetectorBackend, DetectorConfig};
use crate::utils::common::BatchProgress;
use crate::utils::fetch::fetch;
use crate::worker_logic::{run_worker, WorkerEvent};

/// Makes the language model available before any file is processed.
///
/// A missing model is downloaded when a remote source is configured; a failed
/// download aborts the batch. Without a source the batch runs in shallow mode.
pub async fn prepare_model(config: &LanguageModelConfig) -> Result<()> {
    if config.backend != DetectorBackend::FastText || config.model_path.exists() {
        return Ok(());
    }

    match config.remote_source() {
        Some(url) => {
            info!(
                "Downloading language detection model {} --> {} ...",
                url,
                config.model_path.display()
            );
            fetch(url, &config.model_path, true).await?;
            info!("Language detection model ready");
        }
        None => {
            warn!(
                "No language detection model was found at: {}. Language detection will be executed in shallow mode.",
                config.model_path.display()
            );
        }
    }
    Ok(())
}

/// Fans `files` out over `workers` parallel workers and aggregates the outcomes.
///
/// Workers pull paths from a shared queue, so there is no ordering across
/// files. Per-file failures are counted, never returned; only setup problems
/// (output directory, thread pool) make this fail.
pub fn dispatch_batch(
    files: Vec<PathBuf>,
    context: PipelineContext,
    detector_config: DetectorConfig,
    workers: usize,
    progress: &BatchProgress,
) -> Result<BatchSummary> {
    let span = info_span!("dispatch_batch", files = files.len(), workers);
    let _enter = span.enter();

    fs::create_dir_all(&context.output_dir)?;

    let total = files.len() as u64;
    let mut summary = BatchSummary::new(total);
    if files.is_empty() {
        warn!("No input files to process.");
        return Ok(summary);
    }
    let workers = workers.clamp(1, files.len());

    let (task_tx, task_rx) = unbounded::<PathBuf>();
    for path in files {
        task_tx
            .send(path)
            .map_err(|e| PipelineError::Unexpected(format!("Task queue closed: {}", e)))?;
    }
    drop(task_tx);

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|i| format!("worker-{}", i))
        .build()
        .map_err(|e| PipelineError::Unexpected(format!("Failed to build worker pool: {}", e)))?;

    let pipeline = DocumentPipeline::new(context);
    let (event_tx, event_rx) = unbounded::<WorkerEvent>();
    let mut running = vec![BatchSummary::default(); workers];
    let mut finished = BatchSummary::default();

    pool.in_place_scope(|scope| {
        for worker_id in 0..workers {
            let tasks = task_rx.clone();
            let events = event_tx.clone();
            let config = detector_config.clone();
            let pipeline = &pipeline;
            scope.spawn(move |_| {
                run_worker(worker_id, pipeline, config, tasks, events);
            });
        }
        drop(event_tx);

        for event in event_rx.iter() {
            match event {
                WorkerEvent::Outcome {
                    worker_id,
                    path,
                    outcome,
                } => {
                    summary.record(&outcome);
                    let view = &mut running[worker_id];
                    view.record(&outcome);
                    let display = BatchSummary { total, ..*view };
                    let shown = pipeline.context().relative_input_path(&path);
                    progress.tick(worker_id, &display, &shown);
                    if let WorkerOutcome::Failed(reason) = outcome {
                        progress.println(&format!("[{}] failed {}: {}", worker_id, shown, reason));
                    }
                }
                WorkerEvent::Finished {
                    worker_id,
                    summary: worker_summary,
                } => {
                    info!(worker_id, done = worker_summary.done(), "Worker summary received");
                    finished += worker_summary;
                }
            }
        }
    });
    progress.finish();

    if finished.done() != summary.done() {
        warn!(
            reported = finished.done(),
            observed = summary.done(),
            "Worker summaries disagree with observed outcomes"
        );
    }
    info!(
        processed = summary.processed,
        ignored = summary.ignored,
        failed = summary.failed,
        total = summary.total,
        "Batch complete"
    );
    Ok(summary)
}
