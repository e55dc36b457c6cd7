//! Error types for Tolk.

use thiserror::Error;

/// Library-level error type for Tolk operations.
#[derive(Error, Debug)]
pub enum TolkError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Audio extraction failed: {0}")]
    Extraction(String),

    #[error("Audio error: {0}")]
    Audio(String),

    #[error("Transcription failed: {0}")]
    Transcription(String),

    #[error("Recognition could not understand the audio")]
    RecognitionUnintelligible,

    #[error("Recognition request failed: {0}")]
    RecognitionRequest(String),

    #[error("Model file not found: {0}. Run 'tolk fetch-model' to download it.")]
    ModelNotFound(String),

    #[error("External tool not found: {0}. Please install it and ensure it's in your PATH.")]
    ToolNotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),
}

/// Result type alias for Tolk operations.
pub type Result<T> = std::result::Result<T, TolkError>;
