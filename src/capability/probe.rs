//! Startup capability probing.

use std::process::{Command, Stdio};

use crate::backend::ESPEAK_BIN;
use crate::cli::Engine;

/// Availability of the synthesis and assembly capabilities, checked once at
/// startup before any file I/O.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapabilityReport {
    pub offline_engine: bool,
    pub cloud_engine: bool,
    pub assembler: bool,
}

impl CapabilityReport {
    /// Whether the selected engine can run on this system.
    pub fn supports(&self, engine: Engine) -> bool {
        match engine {
            Engine::Cloud => self.cloud_engine,
            Engine::Offline => self.offline_engine,
        }
    }
}

/// Probe the system once. The cloud client and the audio decoders are
/// compiled in, so only the offline engine binary is genuinely probeable;
/// network reachability for the cloud engine is a runtime precondition, not
/// something checked here.
pub fn probe() -> CapabilityReport {
    CapabilityReport {
        offline_engine: offline_engine_present(),
        cloud_engine: true,
        assembler: true,
    }
}

fn offline_engine_present() -> bool {
    Command::new(ESPEAK_BIN)
        .arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}
