//! CLI module for Tolk.

pub mod commands;
mod output;
pub mod preflight;
pub mod prompt;

pub use output::Output;

use crate::orchestrator::EngineChoice;
use crate::transcription::ModelSize;
use clap::{Parser, Subcommand};

/// Tolk - Video and Audio Transcription
///
/// A batch CLI tool for extracting audio from video files and transcribing it
/// with a local Whisper model, a remote speech API, or both at once.
/// The name "Tolk" comes from the Norwegian word for "interpreter."
#[derive(Parser, Debug)]
#[command(name = "tolk")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Transcribe a video or audio file
    Transcribe {
        /// Source file path (prompted for when omitted)
        file: Option<String>,

        /// Engine selection (prompted for when omitted)
        #[arg(short, long, value_enum)]
        engine: Option<EngineChoice>,

        /// Whisper model size (prompted for when the whisper engine runs)
        #[arg(short, long, value_enum)]
        model: Option<ModelSize>,

        /// Chunk length in milliseconds for the recognition engine
        #[arg(long)]
        chunk_ms: Option<u64>,
    },

    /// Check system requirements and configuration
    Doctor,

    /// Download a whisper model into the model directory
    FetchModel {
        /// Model size to download
        #[arg(value_enum)]
        model: ModelSize,

        /// Re-download even if the model file already exists
        #[arg(short, long)]
        force: bool,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,
}
