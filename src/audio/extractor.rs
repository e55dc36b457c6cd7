//! Audio extraction via ffmpeg.

use crate::audio::waveform::{Waveform, TARGET_SAMPLE_RATE};
use crate::error::{Result, TolkError};
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info, instrument};

/// Extracts the audio track of a media file as a mono 16 kHz waveform.
///
/// The decoded WAV lands in a uniquely named temp file under `temp_dir`; the
/// returned waveform owns that file, so it is removed when the waveform is
/// dropped. A nonzero ffmpeg exit is fatal to the run.
#[instrument(skip(temp_dir), fields(source = %source.display()))]
pub async fn extract_audio(source: &Path, temp_dir: &Path) -> Result<Waveform> {
    std::fs::create_dir_all(temp_dir)?;

    let backing = tempfile::Builder::new()
        .prefix("tolk-")
        .suffix(".wav")
        .tempfile_in(temp_dir)?;
    let wav_path = backing.path().to_path_buf();

    info!("Extracting audio from {}", source.display());

    let result = Command::new("ffmpeg")
        .arg("-i").arg(source)
        .arg("-ac").arg("1")
        .arg("-ar").arg(TARGET_SAMPLE_RATE.to_string())
        .arg("-map").arg("a")
        .arg("-y")
        .arg("-loglevel").arg("error")
        .arg(&wav_path)
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .output()
        .await;

    let output = match result {
        Ok(o) => o,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(TolkError::ToolNotFound("ffmpeg".into()));
        }
        Err(e) => {
            return Err(TolkError::Extraction(format!("ffmpeg execution failed: {e}")));
        }
    };

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(TolkError::Extraction(format!("ffmpeg failed: {stderr}")));
    }

    let waveform = Waveform::from_wav_file(&wav_path)?;
    debug!(
        "Extracted {:.1}s of audio",
        waveform.duration_ms() as f64 / 1000.0
    );

    Ok(waveform.with_backing(backing))
}
