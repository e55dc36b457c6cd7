//! Local Whisper transcription via whisper.cpp.

use super::Engine;
use crate::audio::Waveform;
use crate::error::{Result, TolkError};
use async_trait::async_trait;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::os::raw::{c_char, c_void};
use std::path::{Path, PathBuf};
use std::sync::Once;
use tracing::{debug, info};
use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

/// Whisper model size, trading accuracy for speed.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum ModelSize {
    Tiny,
    #[default]
    Base,
    Small,
    Medium,
    Large,
}

impl ModelSize {
    /// Every supported size, smallest first.
    pub const ALL: [ModelSize; 5] = [
        ModelSize::Tiny,
        ModelSize::Base,
        ModelSize::Small,
        ModelSize::Medium,
        ModelSize::Large,
    ];

    /// GGML model filename on disk (whisper.cpp convention).
    pub fn filename(&self) -> &'static str {
        match self {
            ModelSize::Tiny => "ggml-tiny.bin",
            ModelSize::Base => "ggml-base.bin",
            ModelSize::Small => "ggml-small.bin",
            ModelSize::Medium => "ggml-medium.bin",
            ModelSize::Large => "ggml-large-v3.bin",
        }
    }

    /// Download URL in whisper.cpp's Hugging Face repository.
    pub fn download_url(&self) -> String {
        format!(
            "https://huggingface.co/ggerganov/whisper.cpp/resolve/main/{}",
            self.filename()
        )
    }
}

impl std::str::FromStr for ModelSize {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "tiny" => Ok(ModelSize::Tiny),
            "base" => Ok(ModelSize::Base),
            "small" => Ok(ModelSize::Small),
            "medium" => Ok(ModelSize::Medium),
            "large" => Ok(ModelSize::Large),
            _ => Err(format!("Unknown model size: {}", s)),
        }
    }
}

impl std::fmt::Display for ModelSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ModelSize::Tiny => "tiny",
            ModelSize::Base => "base",
            ModelSize::Small => "small",
            ModelSize::Medium => "medium",
            ModelSize::Large => "large",
        };
        write!(f, "{}", name)
    }
}

/// Single-pass local transcription engine.
///
/// Loads the model fresh on every invocation and runs one full pass over the
/// entire waveform; there is no chunking and no partial-failure recovery.
pub struct WhisperEngine {
    model_path: PathBuf,
    model: ModelSize,
    threads: i32,
}

impl WhisperEngine {
    /// Create an engine resolving `model` inside `model_dir`.
    pub fn new(model_dir: &Path, model: ModelSize) -> Self {
        Self {
            model_path: model_dir.join(model.filename()),
            model,
            threads: num_cpus::get() as i32,
        }
    }

    /// Path of the model file this engine will load.
    pub fn model_path(&self) -> &Path {
        &self.model_path
    }
}

#[async_trait]
impl Engine for WhisperEngine {
    fn tag(&self) -> &'static str {
        "Whisper"
    }

    async fn transcribe(&self, waveform: &Waveform) -> Result<String> {
        if !self.model_path.exists() {
            return Err(TolkError::ModelNotFound(
                self.model_path.display().to_string(),
            ));
        }

        info!("Transcribing with Whisper ({} model)", self.model);

        // Inference is CPU-bound; keep it off the async runtime.
        let model_path = self.model_path.clone();
        let threads = self.threads;
        let samples = waveform.to_f32();

        let text = tokio::task::spawn_blocking(move || {
            run_full_pass(&model_path, threads, &samples)
        })
        .await
        .map_err(|e| TolkError::Transcription(format!("whisper task failed: {e}")))??;

        debug!("Whisper produced {} characters", text.len());
        Ok(text)
    }
}

/// Load the model, run whisper over all samples, and join the segment texts.
fn run_full_pass(model_path: &Path, threads: i32, samples: &[f32]) -> Result<String> {
    init_whisper_logging();

    let path = model_path
        .to_str()
        .ok_or_else(|| TolkError::Transcription("model path is not valid UTF-8".to_string()))?;

    let ctx = WhisperContext::new_with_params(path, WhisperContextParameters::default())
        .map_err(|e| {
            TolkError::Transcription(format!(
                "failed to load model from {}: {e}",
                model_path.display()
            ))
        })?;

    let mut state = ctx
        .create_state()
        .map_err(|e| TolkError::Transcription(format!("failed to create whisper state: {e}")))?;

    state
        .full(full_params(threads), samples)
        .map_err(|e| TolkError::Transcription(format!("whisper inference failed: {e}")))?;

    let mut pieces = Vec::new();
    for segment in state.as_iter() {
        let text = segment
            .to_str()
            .map_err(|e| TolkError::Transcription(format!("failed to read segment: {e}")))?;
        let trimmed = text.trim();
        if !trimmed.is_empty() {
            pieces.push(trimmed.to_owned());
        }
    }

    Ok(pieces.join(" "))
}

fn full_params(threads: i32) -> FullParams<'static, 'static> {
    let mut params = FullParams::new(SamplingStrategy::Greedy { best_of: 1 });
    params.set_n_threads(threads);
    params.set_translate(false);
    params.set_language(None);
    params.set_no_context(true);
    params.set_print_progress(false);
    params.set_print_special(false);
    params.set_print_realtime(false);
    params.set_print_timestamps(false);
    params
}

/// A no-op log callback used to silence logs emitted by whisper.cpp.
unsafe extern "C" fn whisper_log_callback(
    _level: u32,
    _c_msg: *const c_char,
    _user_data: *mut c_void,
) {
}

/// Configure whisper logging exactly once for the lifetime of the process.
fn init_whisper_logging() {
    static INIT: Once = Once::new();

    INIT.call_once(|| unsafe {
        whisper_rs::set_log_callback(Some(whisper_log_callback), std::ptr::null_mut());
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_size_round_trips_through_str() {
        for size in ModelSize::ALL {
            assert_eq!(size.to_string().parse::<ModelSize>().unwrap(), size);
        }
        assert!("huge".parse::<ModelSize>().is_err());
    }

    #[test]
    fn test_model_filenames_follow_ggml_convention() {
        assert_eq!(ModelSize::Tiny.filename(), "ggml-tiny.bin");
        assert_eq!(ModelSize::Large.filename(), "ggml-large-v3.bin");
        assert!(ModelSize::Base
            .download_url()
            .ends_with("/ggml-base.bin"));
    }

    #[tokio::test]
    async fn test_missing_model_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let engine = WhisperEngine::new(dir.path(), ModelSize::Tiny);
        let waveform = Waveform::from_samples(vec![0; 16_000], 16_000).unwrap();

        let err = engine.transcribe(&waveform).await.unwrap_err();
        assert!(matches!(err, TolkError::ModelNotFound(_)));
    }

    #[test]
    fn test_engine_resolves_model_path() {
        let engine = WhisperEngine::new(Path::new("/models"), ModelSize::Small);
        assert_eq!(
            engine.model_path(),
            Path::new("/models/ggml-small.bin")
        );
    }
}
