//! Interactive prompts for values not supplied on the command line.
//!
//! Each prompt pairs with a pure parser so validation is testable without a
//! terminal. Invalid input terminates the run with a printed message.

use crate::error::{Result, TolkError};
use crate::orchestrator::EngineChoice;
use crate::transcription::ModelSize;
use console::style;
use std::io::Write;
use std::path::PathBuf;

/// Default chunk length when the prompt is answered with an empty line.
pub const DEFAULT_CHUNK_MS: u64 = 15_000;

/// Ask for the source file path; the file must exist.
pub fn source_path() -> Result<PathBuf> {
    let answer = ask("Enter the video file path: ")?;
    let path = PathBuf::from(answer.trim());

    if !path.exists() {
        return Err(TolkError::InvalidInput(
            "The file does not exist.".to_string(),
        ));
    }

    Ok(path)
}

/// Ask which engine(s) to run.
pub fn engine_choice() -> Result<EngineChoice> {
    println!("Select transcription engine:");
    println!("  {} - Whisper (local model)", style("1").bold());
    println!("  {} - SpeechRecognition (remote API)", style("2").bold());
    println!("  {} - Both (simultaneously)", style("3").bold());

    let answer = ask("Enter the number: ")?;
    parse_engine_choice(&answer)
}

/// Ask for the whisper model size, defaulting to `base`.
pub fn model_size() -> Result<ModelSize> {
    let answer = ask("Choose Whisper model (tiny, base, small, medium, large) [base]: ")?;
    parse_model_size(&answer)
}

/// Ask for the recognition chunk length, defaulting to 15000 ms.
pub fn chunk_ms() -> Result<u64> {
    let answer = ask(&format!(
        "Enter chunk size in milliseconds [{}]: ",
        DEFAULT_CHUNK_MS
    ))?;
    parse_chunk_ms(&answer)
}

/// Parse a menu answer: the number or the engine name.
pub fn parse_engine_choice(input: &str) -> Result<EngineChoice> {
    match input.trim().to_lowercase().as_str() {
        "1" | "whisper" => Ok(EngineChoice::Whisper),
        "2" | "recognition" | "speechrecognition" => Ok(EngineChoice::Recognition),
        "3" | "both" => Ok(EngineChoice::Both),
        other => Err(TolkError::InvalidInput(format!(
            "Invalid choice: {other}"
        ))),
    }
}

/// Parse a model size answer; empty means the default.
pub fn parse_model_size(input: &str) -> Result<ModelSize> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(ModelSize::default());
    }

    trimmed
        .parse::<ModelSize>()
        .map_err(TolkError::InvalidInput)
}

/// Parse a chunk size answer; empty means the default, zero is rejected.
pub fn parse_chunk_ms(input: &str) -> Result<u64> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(DEFAULT_CHUNK_MS);
    }

    let value: u64 = trimmed
        .parse()
        .map_err(|_| TolkError::InvalidInput(format!("Invalid chunk size: {trimmed}")))?;

    if value == 0 {
        return Err(TolkError::InvalidInput(
            "chunk size must be positive".to_string(),
        ));
    }

    Ok(value)
}

fn ask(prompt: &str) -> Result<String> {
    print!("{prompt}");
    std::io::stdout().flush()?;

    let mut answer = String::new();
    std::io::stdin().read_line(&mut answer)?;
    Ok(answer)
}
