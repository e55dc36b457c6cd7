//! Transcription engines for Tolk.
//!
//! Two independently pluggable strategies over the same waveform:
//!
//! - **Whisper**: one local inference pass over the entire waveform.
//! - **SpeechRecognition**: fixed-size chunks recognized concurrently by a
//!   remote speech API and reassembled in chunk order.

mod recognition;
mod whisper;

pub use recognition::{RecognitionEngine, SERVICE_UNAVAILABLE_PREFIX, UNRECOGNIZED_SENTINEL};
pub use whisper::{ModelSize, WhisperEngine};

use crate::audio::Waveform;
use crate::error::Result;
use async_trait::async_trait;

/// Trait for transcription engines.
#[async_trait]
pub trait Engine: Send + Sync {
    /// Identifying tag, used in output file names and reports.
    fn tag(&self) -> &'static str;

    /// Transcribe the waveform and return the produced text.
    async fn transcribe(&self, waveform: &Waveform) -> Result<String>;
}
