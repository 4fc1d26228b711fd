// src/worker_logic.rs

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::{Path, PathBuf};

use crossbeam_channel::{Receiver, Sender};
use tracing::{debug, error, info, warn};

use crate::data_model::{BatchSummary, WorkerOutcome};
use crate::executor::DocumentPipeline;
use crate::pipeline::language::{DetectorConfig, LanguageDetector};
use crate::utils::prometheus_metrics::*;

/// Messages a worker sends to the batch supervisor.
#[derive(Debug, Clone, PartialEq)]
pub enum WorkerEvent {
    /// One file finished, whatever the result.
    Outcome {
        worker_id: usize,
        path: PathBuf,
        outcome: WorkerOutcome,
    },
    /// The task queue is drained; `summary` covers every file this worker saw.
    Finished {
        worker_id: usize,
        summary: BatchSummary,
    },
}

/// Runs the document pipeline on one file and classifies the result.
///
/// Errors and panics are turned into `Failed` so the caller can move on to the
/// next file.
pub fn process_single_file(
    pipeline: &DocumentPipeline,
    detector: &mut LanguageDetector,
    path: &Path,
) -> WorkerOutcome {
    let result = catch_unwind(AssertUnwindSafe(|| pipeline.process_file(path, detector)));

    let outcome = match result {
        Ok(Ok(outcome)) => outcome,
        Ok(Err(e)) => {
            error!(file = %path.display(), error = %e, "Failed to process file");
            WorkerOutcome::Failed(e.to_string())
        }
        Err(panic) => {
            let reason = panic
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| panic.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            error!(file = %path.display(), %reason, "Panic while processing file");
            WorkerOutcome::Failed(format!("panic: {}", reason))
        }
    };

    match &outcome {
        WorkerOutcome::Processed => FILES_PROCESSED_TOTAL.inc(),
        WorkerOutcome::Ignored => FILES_IGNORED_TOTAL.inc(),
        WorkerOutcome::Failed(_) => FILES_FAILED_TOTAL.inc(),
    }
    outcome
}

/// Worker loop: pulls paths until the queue is closed and drained, reporting
/// every outcome to the supervisor.
///
/// The worker owns its own language detector; the model is loaded on the
/// first record that needs it.
pub fn run_worker(
    worker_id: usize,
    pipeline: &DocumentPipeline,
    detector_config: DetectorConfig,
    tasks: Receiver<PathBuf>,
    events: Sender<WorkerEvent>,
) -> BatchSummary {
    ACTIVE_WORKERS.inc();
    debug!(worker_id, "Worker started");

    let mut detector = LanguageDetector::new(detector_config);
    let mut summary = BatchSummary::default();

    for path in tasks.iter() {
        let outcome = process_single_file(pipeline, &mut detector, &path);
        summary.total += 1;
        summary.record(&outcome);

        let event = WorkerEvent::Outcome {
            worker_id,
            path,
            outcome,
        };
        if events.send(event).is_err() {
            warn!(worker_id, "Supervisor is gone; worker stopping early");
            break;
        }
    }

    let _ = events.send(WorkerEvent::Finished { worker_id, summary });
    info!(
        worker_id,
        processed = summary.processed,
        ignored = summary.ignored,
        failed = summary.failed,
        "Worker finished"
    );
    ACTIVE_WORKERS.dec();
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::PipelineContext;
    use crossbeam_channel::unbounded;
    use std::fs;
    use tempfile::tempdir;

    fn pipeline_into(output_dir: &Path) -> DocumentPipeline {
        DocumentPipeline::new(PipelineContext {
            output_dir: output_dir.to_path_buf(),
            force: false,
            working_dir: output_dir.to_path_buf(),
        })
    }

    #[test]
    fn test_missing_file_is_failed_not_fatal() {
        let dir = tempdir().unwrap();
        let pipeline = pipeline_into(dir.path());
        let mut detector = LanguageDetector::shallow();
        let outcome = process_single_file(&pipeline, &mut detector, &dir.path().join("nope.fb2"));
        match outcome {
            WorkerOutcome::Failed(reason) => assert!(reason.contains("does not exist")),
            other => panic!("Expected Failed, got {:?}", other),
        }
    }

    #[test]
    fn test_worker_drains_queue_and_reports() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("book.fb2");
        fs::write(&input, "<body><p>Hello world</p></body>").unwrap();
        let out = dir.path().join("out");
        fs::create_dir(&out).unwrap();
        let pipeline = pipeline_into(&out);

        let (task_tx, task_rx) = unbounded();
        let (event_tx, event_rx) = unbounded();
        task_tx.send(input.clone()).unwrap();
        task_tx.send(dir.path().join("missing.fb2")).unwrap();
        task_tx.send(input.clone()).unwrap();
        drop(task_tx);

        let config = DetectorConfig {
            backend: crate::pipeline::language::DetectorBackend::FastText,
            model_path: dir.path().join("no-model.bin"),
        };
        let summary = run_worker(3, &pipeline, config, task_rx, event_tx);

        assert_eq!(
            summary,
            BatchSummary {
                processed: 1,
                ignored: 1,
                failed: 1,
                total: 3
            }
        );
        let events: Vec<WorkerEvent> = event_rx.try_iter().collect();
        assert_eq!(events.len(), 4);
        assert!(matches!(
            events.last(),
            Some(WorkerEvent::Finished { worker_id: 3, .. })
        ));
    }
}
