//! Offline synthesis backend.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

use log::debug;

use super::SpeechBackend;
use super::types::SynthesisError;

/// Binary name of the local engine.
pub(crate) const ESPEAK_BIN: &str = "espeak-ng";

/// Voice identifier used when no female voice is installed.
const DEFAULT_VOICE: &str = "english-us";

/// Local synthesis engine. Spawns `espeak-ng` per utterance with the text on
/// stdin and writes engine-native WAV to the target path. The container
/// format is opaque to the rest of the system.
pub struct OfflineBackend {
    rate_wpm: u32,
    volume: f32,
    voice: Option<String>,
}

impl OfflineBackend {
    /// Create an offline backend with the given speech rate (words per
    /// minute) and volume (0.0 to 1.0).
    ///
    /// The voice is selected once at construction from the installed voice
    /// set: a female voice is preferred, then the known default identifier,
    /// then the engine default.
    pub fn new(rate_wpm: u32, volume: f32) -> Self {
        let voice = installed_voices().and_then(|listing| preferred_voice(&listing));
        if let Some(ref v) = voice {
            debug!("selected voice: {v}");
        }

        Self {
            rate_wpm,
            volume,
            voice,
        }
    }

    /// Engine amplitude for the configured volume (0 to 200 scale).
    fn amplitude(&self) -> u32 {
        (self.volume.clamp(0.0, 1.0) * 100.0).round() as u32
    }
}

impl SpeechBackend for OfflineBackend {
    fn synthesize(&self, text: &str, output: &Path) -> Result<(), SynthesisError> {
        let rate = self.rate_wpm.to_string();
        let amplitude = self.amplitude().to_string();

        let mut command = Command::new(ESPEAK_BIN);
        command
            .arg("-w")
            .arg(output)
            .args(["-s", &rate, "-a", &amplitude]);
        if let Some(ref voice) = self.voice {
            command.args(["-v", voice]);
        }
        command.arg("--stdin");

        let mut child = command
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => {
                    SynthesisError::EngineInit(format!("{ESPEAK_BIN} not installed"))
                }
                _ => SynthesisError::EngineInit(e.to_string()),
            })?;

        let mut stdin = child.stdin.take().ok_or_else(|| {
            SynthesisError::EngineInit(format!("could not open {ESPEAK_BIN} stdin"))
        })?;
        stdin.write_all(text.as_bytes())?;
        drop(stdin);

        let result = child.wait_with_output()?;
        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            let reason = stderr.trim().to_string();
            if reason.to_lowercase().contains("voice") {
                return Err(SynthesisError::VoiceUnavailable(reason));
            }
            return Err(SynthesisError::EngineInit(reason));
        }

        Ok(())
    }

    fn file_extension(&self) -> &'static str {
        "wav"
    }

    fn name(&self) -> &'static str {
        "offline"
    }
}

/// Capture the engine's voice table, or `None` when the engine cannot start.
/// Construction tolerates a missing engine; the synthesis call reports it.
fn installed_voices() -> Option<String> {
    let output = Command::new(ESPEAK_BIN).arg("--voices").output().ok()?;
    if !output.status.success() {
        return None;
    }
    Some(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Pick a voice from a `--voices` table.
///
/// Rows look like ` 5  en-US  M  english-us  gmw/en-US`; the third column is
/// the age/gender descriptor. A female voice wins, then the known default
/// identifier, then `None` for the engine default.
fn preferred_voice(listing: &str) -> Option<String> {
    let mut default_match = None;

    for line in listing.lines().skip(1) {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 4 {
            continue;
        }
        let gender = fields[2];
        let name = fields[3];

        if gender.ends_with('F') {
            return Some(name.to_string());
        }
        if default_match.is_none() && name == DEFAULT_VOICE {
            default_match = Some(name.to_string());
        }
    }

    default_match
}

#[cfg(test)]
mod tests {
    use super::*;

    const VOICE_TABLE: &str = "\
Pty Language       Age/Gender VoiceName          File                 Other Languages
 5  af              --/M      afrikaans          gmw/af
 5  en-US           --/M      english-us         gmw/en-US
 5  en-GB           --/F      english-gb-f       gmw/en-GB-f
 5  de              --/M      german             gmw/de";

    #[test]
    fn test_preferred_voice_picks_female_first() {
        assert_eq!(
            preferred_voice(VOICE_TABLE),
            Some("english-gb-f".to_string())
        );
    }

    #[test]
    fn test_preferred_voice_falls_back_to_default_identifier() {
        let table = "\
Pty Language       Age/Gender VoiceName          File
 5  af              --/M      afrikaans          gmw/af
 5  en-US           --/M      english-us         gmw/en-US";
        assert_eq!(preferred_voice(table), Some("english-us".to_string()));
    }

    #[test]
    fn test_preferred_voice_none_when_nothing_matches() {
        let table = "\
Pty Language       Age/Gender VoiceName          File
 5  de              --/M      german             gmw/de";
        assert_eq!(preferred_voice(table), None);
    }

    #[test]
    fn test_preferred_voice_handles_bare_gender_column() {
        let table = "\
Pty Language Age/Gender VoiceName File
 5  en-GB    F          british   gmw/en-GB";
        assert_eq!(preferred_voice(table), Some("british".to_string()));
    }

    #[test]
    fn test_preferred_voice_empty_listing() {
        assert_eq!(preferred_voice(""), None);
    }

    #[test]
    fn test_amplitude_mapping() {
        let full = OfflineBackend {
            rate_wpm: 150,
            volume: 1.0,
            voice: None,
        };
        assert_eq!(full.amplitude(), 100);

        let half = OfflineBackend {
            rate_wpm: 150,
            volume: 0.5,
            voice: None,
        };
        assert_eq!(half.amplitude(), 50);

        let clamped = OfflineBackend {
            rate_wpm: 150,
            volume: 3.0,
            voice: None,
        };
        assert_eq!(clamped.amplitude(), 100);
    }

    #[test]
    fn test_offline_extension_is_wav() {
        let backend = OfflineBackend {
            rate_wpm: 150,
            volume: 1.0,
            voice: None,
        };
        assert_eq!(backend.file_extension(), "wav");
        assert_eq!(backend.name(), "offline");
    }
}
