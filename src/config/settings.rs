//! Configuration settings for Tolk.

use crate::transcription::ModelSize;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable consulted for the recognition API key when the
/// config file does not set one.
pub const RECOGNITION_API_KEY_ENV: &str = "TOLK_RECOGNITION_API_KEY";

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub whisper: WhisperSettings,
    pub recognition: RecognitionSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Directory for temporary files (extracted waveforms).
    pub temp_dir: String,
    /// Directory holding downloaded whisper model files.
    pub model_dir: String,
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            temp_dir: "/tmp/tolk".to_string(),
            model_dir: "~/.tolk/models".to_string(),
            log_level: "info".to_string(),
        }
    }
}

/// Local Whisper engine settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WhisperSettings {
    /// Default model size when none is given on the command line.
    pub model: ModelSize,
}

impl Default for WhisperSettings {
    fn default() -> Self {
        Self {
            model: ModelSize::Base,
        }
    }
}

/// Remote speech-recognition engine settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecognitionSettings {
    /// Default chunk length in milliseconds.
    pub chunk_ms: u64,
    /// Maximum chunks recognized concurrently.
    pub max_concurrent: usize,
    /// Locale sent with every recognition request.
    pub language: String,
    /// Recognition service endpoint.
    pub endpoint: String,
    /// API key sent with requests when set (see also the
    /// `TOLK_RECOGNITION_API_KEY` environment variable).
    pub api_key: Option<String>,
}

impl Default for RecognitionSettings {
    fn default() -> Self {
        Self {
            chunk_ms: 15_000,
            max_concurrent: 4,
            language: "en-US".to_string(),
            endpoint: "http://www.google.com/speech-api/v2/recognize".to_string(),
            api_key: None,
        }
    }
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Save settings to the default configuration file.
    pub fn save(&self) -> crate::error::Result<()> {
        self.save_to(&Self::default_config_path())
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::TolkError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("tolk")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Get the expanded temp directory path.
    pub fn temp_dir(&self) -> PathBuf {
        Self::expand_path(&self.general.temp_dir)
    }

    /// Get the expanded model directory path.
    pub fn model_dir(&self) -> PathBuf {
        Self::expand_path(&self.general.model_dir)
    }

    /// Recognition API key: environment variable first, then config.
    pub fn recognition_api_key(&self) -> Option<String> {
        std::env::var(RECOGNITION_API_KEY_ENV)
            .ok()
            .filter(|k| !k.is_empty())
            .or_else(|| self.recognition.api_key.clone())
    }
}
