//! Fetch-model command - download whisper model files.

use crate::cli::Output;
use crate::config::Settings;
use crate::transcription::ModelSize;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;

/// Download the ggml model file for `model` into the configured model
/// directory, staging through a `.part` file and renaming into place.
pub async fn run_fetch_model(model: ModelSize, force: bool, settings: Settings) -> Result<()> {
    let model_dir = settings.model_dir();
    std::fs::create_dir_all(&model_dir)
        .with_context(|| format!("failed to create model dir: {}", model_dir.display()))?;

    let dest = model_dir.join(model.filename());
    if dest.exists() && !force {
        Output::info(&format!("Already exists: {}", dest.display()));
        return Ok(());
    }

    let url = model.download_url();
    Output::info(&format!("Downloading {} ({})", model.filename(), model));
    Output::kv("url", &url);

    let client = reqwest::Client::builder()
        .user_agent("tolk-model-fetch")
        .build()
        .context("failed to build HTTP client")?;

    download_to_path(&client, &url, &dest).await?;

    Output::success(&format!("Saved: {}", dest.display()));
    Ok(())
}

/// Download a URL into `dest` safely: stream to `dest.part`, sync, then
/// rename to the final path. The partial file is removed on failure.
async fn download_to_path(client: &reqwest::Client, url: &str, dest: &Path) -> Result<()> {
    let mut response = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("request failed: {url}"))?
        .error_for_status()
        .with_context(|| format!("download failed (bad status): {url}"))?;

    let pb = Output::download_bar(response.content_length().unwrap_or(0));
    let part = PathBuf::from(format!("{}.part", dest.display()));

    let result: Result<()> = async {
        let mut file = tokio::fs::File::create(&part)
            .await
            .with_context(|| format!("failed to create temp file: {}", part.display()))?;

        while let Some(chunk) = response.chunk().await? {
            file.write_all(&chunk).await?;
            pb.inc(chunk.len() as u64);
        }

        file.sync_all().await?;
        drop(file);

        tokio::fs::rename(&part, dest)
            .await
            .with_context(|| format!("failed to move into place: {}", dest.display()))?;

        Ok(())
    }
    .await;

    pb.finish_and_clear();

    if result.is_err() {
        let _ = tokio::fs::remove_file(&part).await;
    }

    result
}
