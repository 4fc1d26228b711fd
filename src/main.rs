use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use BookBlaster::config::Args;
use BookBlaster::error::{PipelineError, Result};
use BookBlaster::executor::PipelineContext;
use BookBlaster::producer_logic::{dispatch_batch, prepare_model};
use BookBlaster::utils::common::{setup_prometheus_metrics, BatchProgress};
use BookBlaster::utils::discover_inputs;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize tracing subscriber
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = args.resolve()?;
    if args.validate_config {
        info!(config = ?config, "Configuration is valid.");
        return Ok(());
    }

    setup_prometheus_metrics(args.metrics_port).await?;

    let working_dir = std::env::current_dir()?;
    let files = discover_inputs(&working_dir, &config.input)?;
    let output_dir = working_dir.join(&config.output_dir);
    info!("INPUT:\t{}\t{} matching files", config.input, files.len());
    info!("OUTPUT:\t{}", output_dir.display());

    // A failed model download aborts the whole batch.
    prepare_model(&config.language).await?;

    let workers = config.worker_count().clamp(1, files.len().max(1));
    let context = PipelineContext {
        output_dir,
        force: config.force,
        working_dir,
    };
    let detector_config = config.language.detector_config();

    let summary = tokio::task::spawn_blocking(move || {
        let progress = BatchProgress::new(workers, files.len() as u64);
        dispatch_batch(files, context, detector_config, workers, &progress)
    })
    .await
    .map_err(|e| PipelineError::Unexpected(format!("Batch task panicked: {}", e)))??;

    info!(
        "Done: {} / {} ({} OK + {} failed + {} ignored)",
        summary.done(),
        summary.total,
        summary.processed,
        summary.failed,
        summary.ignored
    );
    Ok(())
}
