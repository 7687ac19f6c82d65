//! CLI argument definitions and parsing.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Script-to-narration CLI.
#[derive(Parser, Debug)]
#[command(name = "script-tts")]
#[command(about = "Convert text scripts into narrated audio")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Convert a script file into per-line audio segments
    Convert(ConvertArgs),
}

/// Arguments for the `convert` command.
#[derive(clap::Args, Debug)]
pub struct ConvertArgs {
    /// Path to the script text file (one utterance per line; `#` comments
    /// and blank lines are ignored)
    pub script: PathBuf,

    /// Directory for generated audio files (created if absent)
    pub output_dir: PathBuf,

    /// Synthesis engine
    #[arg(long, value_enum, default_value = "cloud")]
    pub engine: Engine,

    /// ISO language code (en, es, fr, ...), honored by the cloud engine
    #[arg(long, default_value = "en")]
    pub lang: String,

    /// Do not combine segments into a single file
    #[arg(long)]
    pub no_combine: bool,

    /// Speech rate in words per minute, honored by the offline engine
    #[arg(long, default_value = "150")]
    pub rate: u32,

    /// Volume level from 0.0 to 1.0, honored by the offline engine
    #[arg(long, default_value = "1.0")]
    pub volume: f32,

    /// Slow speech mode, honored by the cloud engine
    #[arg(long)]
    pub slow: bool,

    /// Pause inserted between combined segments, in milliseconds
    #[arg(long, default_value = "1000")]
    pub pause_ms: u32,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// Synthesis engine selection.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Engine {
    /// Remote synthesis service (compressed output, requires network)
    #[default]
    Cloud,

    /// Local espeak-ng engine (no network required)
    Offline,
}

impl Engine {
    /// Returns the CLI argument string for this engine.
    pub fn as_str(&self) -> &'static str {
        match self {
            Engine::Cloud => "cloud",
            Engine::Offline => "offline",
        }
    }
}
