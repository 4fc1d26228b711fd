// src/utils/fetch.rs

use std::path::{Path, PathBuf};

use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{error, info};

use crate::error::{PipelineError, Result};

const FILE_SCHEME: &str = "file://";

/// Makes sure a local copy of `source` exists at `destination`.
///
/// `source` is either `file://<path>` (copied) or an HTTP(S) URL (downloaded).
/// Missing parent directories are created. When a download breaks off midway
/// and `clean_unfinished` is set, the partial file is removed before the
/// error is returned.
pub async fn fetch(source: &str, destination: &Path, clean_unfinished: bool) -> Result<PathBuf> {
    if let Some(parent) = destination.parent() {
        if !parent.as_os_str().is_empty() && !fs::try_exists(parent).await? {
            info!(
                "Target directory: {} does not exist and will be created automatically",
                parent.display()
            );
            fs::create_dir_all(parent).await?;
        }
    }

    if let Some(local) = source.strip_prefix(FILE_SCHEME) {
        fs::copy(local, destination).await.map_err(|e| {
            PipelineError::FetchError(format!("Failed to copy '{}': {}", local, e))
        })?;
        return Ok(destination.to_path_buf());
    }

    let response = reqwest::get(source).await?;
    if !response.status().is_success() {
        return Err(PipelineError::FetchError(format!(
            "Unexpected response: \"{}\"",
            response.status()
        )));
    }

    match stream_to_file(response, destination).await {
        Ok(()) => {
            info!("Download completed {}", source);
            Ok(destination.to_path_buf())
        }
        Err(e) => {
            error!(error = %e, "Error while downloading {}", source);
            if clean_unfinished && fs::try_exists(destination).await.unwrap_or(false) {
                fs::remove_file(destination).await?;
            }
            Err(e)
        }
    }
}

async fn stream_to_file(mut response: reqwest::Response, destination: &Path) -> Result<()> {
    let mut file = fs::File::create(destination).await?;
    while let Some(chunk) = response.chunk().await? {
        file.write_all(&chunk).await?;
    }
    file.flush().await?;
    Ok(())
}
