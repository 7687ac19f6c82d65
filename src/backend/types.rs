//! Backend configuration and error types.

use std::path::PathBuf;

use thiserror::Error;

use crate::cli::{ConvertArgs, Engine};

/// Errors that can occur while synthesizing a single utterance.
///
/// These are recoverable at pipeline scope: one segment failing never aborts
/// the run.
#[derive(Error, Debug)]
pub enum SynthesisError {
    #[error("engine init failed: {0}")]
    EngineInit(String),

    #[error("voice unavailable: {0}")]
    VoiceUnavailable(String),

    #[error("network failure: {0}")]
    Network(String),

    #[error("service rejected request: {0}")]
    ServiceRejected(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Per-run synthesis settings.
///
/// Built once from the CLI arguments and the script path, read-only
/// afterwards. The base name is the script file name without its extension.
#[derive(Debug, Clone)]
pub struct SynthesisConfig {
    pub engine: Engine,
    pub lang: String,
    pub rate_wpm: u32,
    pub volume: f32,
    pub slow: bool,
    pub output_dir: PathBuf,
    pub base_name: String,
}

impl SynthesisConfig {
    /// Derive the run configuration from parsed CLI arguments.
    pub fn from_args(args: &ConvertArgs) -> Self {
        let base_name = args
            .script
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("script")
            .to_string();

        Self {
            engine: args.engine,
            lang: args.lang.clone(),
            rate_wpm: args.rate,
            volume: args.volume,
            slow: args.slow,
            output_dir: args.output_dir.clone(),
            base_name,
        }
    }
}
