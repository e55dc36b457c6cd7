//! Tolk - Video and Audio Transcription
//!
//! A batch CLI tool for extracting audio from video files and transcribing it.
//!
//! The name "Tolk" comes from the Norwegian word for "interpreter."
//!
//! # Overview
//!
//! Tolk allows you to:
//! - Extract the audio track of a video file as a normalized 16 kHz mono waveform
//! - Transcribe it with a local Whisper model (single pass over the whole file)
//! - Transcribe it with a remote speech-recognition API (fixed-size chunks,
//!   processed concurrently and reassembled in order)
//! - Run both engines at the same time against the same waveform
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - `config` - Configuration management
//! - `audio` - Audio extraction and waveform handling
//! - `chunking` - Fixed-size waveform partitioning
//! - `transcription` - Transcription engines
//! - `output` - Transcript file writing
//! - `orchestrator` - Pipeline coordination
//!
//! # Example
//!
//! ```rust,no_run
//! use std::path::Path;
//! use tolk::config::Settings;
//! use tolk::orchestrator::{EngineChoice, Orchestrator, RunRequest};
//! use tolk::transcription::ModelSize;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let orchestrator = Orchestrator::new(settings)?;
//!
//!     let request = RunRequest {
//!         engine: EngineChoice::Both,
//!         model: ModelSize::Base,
//!         chunk_ms: 15_000,
//!     };
//!     let report = orchestrator.run(Path::new("talk.mp4"), request).await?;
//!     println!("Wrote {} transcript(s)", report.written().count());
//!
//!     Ok(())
//! }
//! ```

pub mod audio;
pub mod chunking;
pub mod cli;
pub mod config;
pub mod error;
pub mod orchestrator;
pub mod output;
pub mod transcription;

pub use error::{Result, TolkError};
