//! Transcript file writing.

use crate::error::Result;
use std::path::{Path, PathBuf};

/// Derive the output path for a source file and engine tag:
/// `{source dir}/{source stem}_{tag}_transcription.txt`.
pub fn transcription_path(source: &Path, tag: &str) -> PathBuf {
    let dir = source.parent().unwrap_or_else(|| Path::new("."));
    let stem = source
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");

    dir.join(format!("{stem}_{tag}_transcription.txt"))
}

/// Write the transcript next to the source file, overwriting any existing
/// file at that path. Write failures surface to the caller.
pub fn write_transcription(source: &Path, tag: &str, text: &str) -> Result<PathBuf> {
    let path = transcription_path(source, tag);
    std::fs::write(&path, text)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_derivation() {
        assert_eq!(
            transcription_path(Path::new("/media/talks/keynote.mp4"), "Whisper"),
            PathBuf::from("/media/talks/keynote_Whisper_transcription.txt")
        );
        assert_eq!(
            transcription_path(Path::new("clip.mkv"), "SpeechRecognition"),
            PathBuf::from("clip_SpeechRecognition_transcription.txt")
        );
    }

    #[test]
    fn test_write_and_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("talk.mp4");

        let path = write_transcription(&source, "Whisper", "first pass").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "first pass");

        // Re-running with identical inputs is byte-for-byte idempotent.
        let again = write_transcription(&source, "Whisper", "first pass").unwrap();
        assert_eq!(again, path);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "first pass");

        // And a new run replaces the old contents with no backup.
        write_transcription(&source, "Whisper", "second pass").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "second pass");
    }

    #[test]
    fn test_engines_write_disjoint_paths() {
        let source = Path::new("/media/talk.mp4");
        assert_ne!(
            transcription_path(source, "Whisper"),
            transcription_path(source, "SpeechRecognition")
        );
    }

    #[test]
    fn test_write_failure_surfaces() {
        let source = Path::new("/nonexistent-dir-tolk/talk.mp4");
        assert!(write_transcription(source, "Whisper", "text").is_err());
    }
}
