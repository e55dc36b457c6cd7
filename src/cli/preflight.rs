//! Pre-flight checks before expensive operations.
//!
//! Validates that required tools and files are available before starting a
//! transcription that would otherwise fail midway.

use crate::config::Settings;
use crate::error::{Result, TolkError};
use crate::orchestrator::EngineChoice;
use crate::transcription::ModelSize;
use std::process::Command;

/// Run pre-flight checks for a transcription run.
///
/// Returns Ok(()) if all checks pass, or an error describing what's missing.
pub fn check(choice: EngineChoice, model: ModelSize, settings: &Settings) -> Result<()> {
    check_tool("ffmpeg")?;

    if choice.uses_whisper() {
        let model_path = settings.model_dir().join(model.filename());
        if !model_path.exists() {
            return Err(TolkError::ModelNotFound(model_path.display().to_string()));
        }
    }

    Ok(())
}

/// Check if an external tool is available.
fn check_tool(name: &str) -> Result<()> {
    // ffmpeg uses -version (single dash)
    let version_arg = match name {
        "ffmpeg" | "ffprobe" => "-version",
        _ => "--version",
    };
    match Command::new(name).arg(version_arg).output() {
        Ok(output) if output.status.success() => Ok(()),
        Ok(_) => Err(TolkError::ToolNotFound(format!(
            "{} is installed but not working correctly",
            name
        ))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(TolkError::ToolNotFound(name.to_string()))
        }
        Err(e) => Err(TolkError::ToolNotFound(format!("{}: {}", name, e))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whisper_check_requires_model_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = Settings::default();
        settings.general.model_dir = dir.path().display().to_string();

        // Recognition-only runs never need a model file, so only the
        // whisper path can fail with ModelNotFound.
        let whisper = check(EngineChoice::Whisper, ModelSize::Tiny, &settings);
        if let Err(e) = whisper {
            assert!(matches!(
                e,
                TolkError::ModelNotFound(_) | TolkError::ToolNotFound(_)
            ));
        }

        let recognition = check(EngineChoice::Recognition, ModelSize::Tiny, &settings);
        if let Err(e) = recognition {
            assert!(matches!(e, TolkError::ToolNotFound(_)));
        }
    }
}
