// src/utils/common.rs

use axum::{http::StatusCode, routing::get, serve, Router};
use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use prometheus::{gather, Encoder, TextEncoder};
use tokio::net::TcpListener;
use tracing::{error, info};

use crate::data_model::BatchSummary;
use crate::error::Result;

const WORKER_TEMPLATE: &str =
    "[{prefix}] Processing {bar:13} {percent:>3}% {eta:>4}    {msg}";

// Axum handler for /metrics
async fn metrics_handler() -> (StatusCode, String) {
    let encoder = TextEncoder::new();
    let mut buffer = vec![];
    if let Err(e) = encoder.encode(&gather(), &mut buffer) {
        error!("Could not encode prometheus metrics: {}", e);
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Could not encode prometheus metrics: {}", e),
        );
    }
    match String::from_utf8(buffer) {
        Ok(s) => (StatusCode::OK, s),
        Err(e) => {
            error!("Prometheus metrics UTF-8 error: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Prometheus metrics UTF-8 error: {}", e),
            )
        }
    }
}

/// Serves `/metrics` on `metrics_port` in a background task, if a port is given.
pub async fn setup_prometheus_metrics(metrics_port: Option<u16>) -> Result<()> {
    let Some(port) = metrics_port else {
        info!("Prometheus metrics endpoint not configured (no port specified).");
        return Ok(());
    };

    let app = Router::new().route("/metrics", get(metrics_handler));
    let listener_addr = format!("0.0.0.0:{}", port);
    let listener = TcpListener::bind(&listener_addr).await?;
    info!(
        "Metrics endpoint will be available at http://{}/metrics",
        listener_addr
    );

    tokio::spawn(async move {
        if let Err(e) = serve(listener, app).await {
            error!("Metrics server error: {}", e);
        }
    });
    Ok(())
}

/// Creates a progress bar with `template`, falling back to the default style.
pub fn create_progress_bar(total_items: u64, message: &str, template: &str) -> ProgressBar {
    let pb = if total_items == 0 {
        ProgressBar::new_spinner()
    } else {
        ProgressBar::new(total_items)
    };
    pb.set_message(message.to_string());
    pb.set_style(
        ProgressStyle::default_bar()
            .template(template)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> "),
    );
    pb
}

fn progress_message(summary: &BatchSummary, current: &str) -> String {
    format!(
        "{} / {} ({} OK + {} failed + {} ignored)    {}",
        summary.done(),
        summary.total,
        summary.processed,
        summary.failed,
        summary.ignored,
        current
    )
}

/// One progress line per worker, owned by the batch supervisor.
///
/// Only the supervisor thread touches the bars; workers report through the
/// outcome channel.
pub struct BatchProgress {
    multi: MultiProgress,
    bars: Vec<ProgressBar>,
}

impl BatchProgress {
    pub fn new(workers: usize, total: u64) -> Self {
        Self::with_target(workers, total, ProgressDrawTarget::stderr())
    }

    pub fn hidden(workers: usize, total: u64) -> Self {
        Self::with_target(workers, total, ProgressDrawTarget::hidden())
    }

    fn with_target(workers: usize, total: u64, target: ProgressDrawTarget) -> Self {
        let multi = MultiProgress::with_draw_target(target);
        let bars = (0..workers)
            .map(|worker_id| {
                let pb = multi.add(create_progress_bar(total, "", WORKER_TEMPLATE));
                pb.set_prefix(worker_id.to_string());
                pb
            })
            .collect();
        BatchProgress { multi, bars }
    }

    /// Advances `worker_id`'s bar and shows its running counters.
    pub fn tick(&self, worker_id: usize, summary: &BatchSummary, current: &str) {
        if let Some(pb) = self.bars.get(worker_id) {
            pb.set_length(summary.total.max(1));
            pb.set_position(summary.done());
            pb.set_message(progress_message(summary, current));
        }
    }

    /// Leaves the last state of every bar on screen.
    pub fn finish(&self) {
        for pb in &self.bars {
            pb.finish();
        }
    }

    /// Prints a line above the bars without tearing them.
    pub fn println(&self, line: &str) {
        if self.multi.println(line).is_err() {
            eprintln!("{}", line);
        }
    }
}
