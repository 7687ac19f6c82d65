//! Speech synthesis backends.
//!
//! One utterance in, one audio file out. The trait is the seam the pipeline
//! works against; adding an engine means adding an implementation here, not
//! branching inside the pipeline.

mod cloud;
mod offline;
mod types;

pub use cloud::CloudBackend;
pub use offline::OfflineBackend;
pub(crate) use offline::ESPEAK_BIN;
pub use types::{SynthesisConfig, SynthesisError};

use std::path::Path;

use crate::cli::Engine;

/// Capability shared by all synthesis engines.
///
/// Implementations carry their own settings (language, rate, voice), fixed
/// at construction; `synthesize` only needs the text and the target path.
#[cfg_attr(test, mockall::automock)]
pub trait SpeechBackend: Send + Sync {
    /// Synthesize one utterance and write the audio to `output`.
    fn synthesize(&self, text: &str, output: &Path) -> Result<(), SynthesisError>;

    /// File extension of the audio this engine produces.
    fn file_extension(&self) -> &'static str;

    /// Short engine name for logs and the run summary.
    fn name(&self) -> &'static str;
}

/// Create the backend selected by the run configuration.
pub fn create_backend(config: &SynthesisConfig) -> Box<dyn SpeechBackend> {
    match config.engine {
        Engine::Cloud => Box::new(CloudBackend::new(&config.lang, config.slow)),
        Engine::Offline => Box::new(OfflineBackend::new(config.rate_wpm, config.volume)),
    }
}
