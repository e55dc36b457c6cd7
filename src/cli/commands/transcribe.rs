//! Transcribe command implementation.

use crate::cli::{preflight, prompt, Output};
use crate::config::Settings;
use crate::error::TolkError;
use crate::orchestrator::{EngineChoice, Orchestrator, RunRequest};
use crate::transcription::ModelSize;
use anyhow::Result;
use std::path::PathBuf;

/// Run the transcribe command.
///
/// Values missing from the command line are prompted for interactively, in
/// the same order the prompts validate them: source file, engine, model size
/// (whisper runs only), chunk size (recognition runs only).
pub async fn run_transcribe(
    file: Option<&str>,
    engine: Option<EngineChoice>,
    model: Option<ModelSize>,
    chunk_ms: Option<u64>,
    settings: Settings,
) -> Result<()> {
    let source = match file {
        Some(f) => {
            let path = PathBuf::from(f);
            if !path.exists() {
                Output::error("The file does not exist.");
                return Err(TolkError::InvalidInput(format!("no such file: {f}")).into());
            }
            path
        }
        None => prompt::source_path()?,
    };

    let engine = match engine {
        Some(e) => e,
        None => prompt::engine_choice()?,
    };

    let model = match model {
        Some(m) => m,
        None if engine.uses_whisper() => prompt::model_size()?,
        None => settings.whisper.model,
    };

    let chunk_ms = match chunk_ms {
        Some(0) => {
            Output::error("Chunk size must be positive.");
            return Err(TolkError::InvalidInput("chunk size must be positive".into()).into());
        }
        Some(c) => c,
        None if engine.uses_recognition() => prompt::chunk_ms()?,
        None => settings.recognition.chunk_ms,
    };

    if let Err(e) = preflight::check(engine, model, &settings) {
        Output::error(&format!("{}", e));
        Output::info("Run 'tolk doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    Output::info(&format!("Processing: {}", source.display()));

    let orchestrator = Orchestrator::new(settings)?;
    let request = RunRequest {
        engine,
        model,
        chunk_ms,
    };

    let report = orchestrator.run(&source, request).await?;

    for outcome in &report.outcomes {
        match &outcome.result {
            Ok(path) => Output::success(&format!(
                "{} took {:.2} seconds. Transcription saved to {}",
                outcome.tag,
                outcome.elapsed.as_secs_f64(),
                path.display()
            )),
            Err(e) => Output::error(&format!("{} failed: {}", outcome.tag, e)),
        }
    }

    if report.any_failed() {
        return Err(anyhow::anyhow!(
            "engine(s) failed: {}",
            report.failed_tags().join(", ")
        ));
    }

    Output::success("Done!");
    Ok(())
}
