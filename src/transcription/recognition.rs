//! Chunked remote speech recognition.
//!
//! Splits the waveform into fixed-size chunks and recognizes them
//! concurrently against a Google-style speech API, reassembling the results
//! in chunk order regardless of completion order.

use super::Engine;
use crate::audio::Waveform;
use crate::chunking::{self, Chunk};
use crate::error::{Result, TolkError};
use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::header::CONTENT_TYPE;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

/// Substituted when the service cannot make sense of a chunk.
pub const UNRECOGNIZED_SENTINEL: &str = "[Unrecognized audio]";

/// Prefix of the text substituted on a request/service failure.
pub const SERVICE_UNAVAILABLE_PREFIX: &str = "[Error: ";

/// Default timeout for recognition requests.
const REQUEST_TIMEOUT_SECS: u64 = 60;

/// Chunked concurrent transcription engine backed by a remote speech API.
pub struct RecognitionEngine {
    client: reqwest::Client,
    endpoint: String,
    language: String,
    api_key: Option<String>,
    chunk_ms: u64,
    max_concurrent: usize,
}

impl RecognitionEngine {
    /// Create a new engine.
    ///
    /// `chunk_ms` is the partition length, `max_concurrent` bounds how many
    /// chunks are in flight at once.
    pub fn new(
        endpoint: &str,
        language: &str,
        api_key: Option<String>,
        chunk_ms: u64,
        max_concurrent: usize,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| TolkError::Config(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
            language: language.to_string(),
            api_key,
            chunk_ms,
            max_concurrent: max_concurrent.max(1),
        })
    }

    /// Export one chunk, recognize it, and remove the transient WAV
    /// immediately after the call returns, success or failure.
    async fn process_chunk(
        &self,
        waveform: &Waveform,
        chunk: Chunk,
        scratch_dir: &Path,
    ) -> Result<String> {
        let chunk_path = scratch_dir.join(format!("chunk_{:04}.wav", chunk.index));
        waveform.export_range(&chunk_path, chunk.start_ms, chunk.end_ms)?;

        let outcome = self.recognize(&chunk_path).await;
        let _ = std::fs::remove_file(&chunk_path);

        outcome
    }

    /// Submit one exported chunk to the recognition service.
    async fn recognize(&self, chunk_path: &Path) -> Result<String> {
        let body = tokio::fs::read(chunk_path).await?;

        let mut request = self
            .client
            .post(&self.endpoint)
            .query(&[("client", "tolk"), ("lang", self.language.as_str())]);

        if let Some(key) = &self.api_key {
            request = request.query(&[("key", key.as_str())]);
        }

        let response = request
            .header(CONTENT_TYPE, "audio/l16; rate=16000")
            .body(body)
            .send()
            .await
            .map_err(|e| TolkError::RecognitionRequest(e.to_string()))?;

        if !response.status().is_success() {
            return Err(TolkError::RecognitionRequest(format!(
                "service returned {}",
                response.status()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| TolkError::RecognitionRequest(e.to_string()))?;

        parse_response(&body)
    }
}

#[async_trait]
impl Engine for RecognitionEngine {
    fn tag(&self) -> &'static str {
        "SpeechRecognition"
    }

    async fn transcribe(&self, waveform: &Waveform) -> Result<String> {
        let chunks = chunking::partition(waveform.duration_ms(), self.chunk_ms)?;
        if chunks.is_empty() {
            return Ok(String::new());
        }

        info!(
            "Splitting audio into {} chunks for recognition",
            chunks.len()
        );

        // Per-run scratch directory, so concurrent runs cannot collide on
        // chunk file names. Removed when the run finishes.
        let scratch = tempfile::tempdir()?;

        let pb = ProgressBar::new(chunks.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("  {spinner:.green} Recognition [{bar:30.cyan/blue}] {pos}/{len}")
                .unwrap()
                .progress_chars("█▓░"),
        );

        let outcomes: Vec<Result<(usize, String)>> = stream::iter(chunks)
            .map(|chunk| {
                let scratch_dir = scratch.path().to_path_buf();
                let pb = pb.clone();
                async move {
                    let outcome = self.process_chunk(waveform, chunk, &scratch_dir).await;
                    pb.inc(1);
                    recover(outcome).map(|text| (chunk.index, text))
                }
            })
            .buffer_unordered(self.max_concurrent)
            .collect()
            .await;

        pb.finish_and_clear();

        let mut pieces = Vec::with_capacity(outcomes.len());
        for outcome in outcomes {
            pieces.push(outcome?);
        }

        debug!("Recognized {} chunks", pieces.len());
        Ok(assemble(pieces))
    }
}

/// Map the two recoverable failure kinds to their substitute strings.
///
/// Anything else propagates and fails the engine.
fn recover(outcome: Result<String>) -> Result<String> {
    match outcome {
        Ok(text) => Ok(text),
        Err(TolkError::RecognitionUnintelligible) => Ok(UNRECOGNIZED_SENTINEL.to_string()),
        Err(TolkError::RecognitionRequest(detail)) => {
            Ok(format!("{SERVICE_UNAVAILABLE_PREFIX}{detail}]"))
        }
        Err(other) => Err(other),
    }
}

/// Reassemble per-chunk texts in chunk-index order and join with spaces.
fn assemble(mut pieces: Vec<(usize, String)>) -> String {
    pieces.sort_by_key(|(index, _)| *index);
    pieces
        .into_iter()
        .map(|(_, text)| text)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Parse the service response: newline-separated JSON objects, where the
/// first object with a non-empty `result` carries the transcript.
fn parse_response(body: &str) -> Result<String> {
    for line in body.lines().filter(|l| !l.trim().is_empty()) {
        let value: serde_json::Value = match serde_json::from_str(line) {
            Ok(v) => v,
            Err(_) => continue,
        };

        let transcript = value
            .get("result")
            .and_then(|r| r.get(0))
            .and_then(|r| r.get("alternative"))
            .and_then(|a| a.get(0))
            .and_then(|a| a.get("transcript"))
            .and_then(|t| t.as_str());

        if let Some(text) = transcript {
            return Ok(text.to_string());
        }
    }

    Err(TolkError::RecognitionUnintelligible)
}
