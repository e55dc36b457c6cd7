//! CLI command implementations.

mod config;
mod doctor;
mod fetch_model;
mod transcribe;

pub use config::run_config;
pub use doctor::run_doctor;
pub use fetch_model::run_fetch_model;
pub use transcribe::run_transcribe;
