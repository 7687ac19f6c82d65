//! Cloud synthesis backend.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use super::SpeechBackend;
use super::types::SynthesisError;

/// Translate-style TTS endpoint used by default.
const TRANSLATE_TTS_ENDPOINT: &str = "https://translate.google.com/translate_tts";

/// Playback speed sent for slow-speech mode; `1` is normal speed.
const SLOW_TTS_SPEED: &str = "0.3";

/// Remote synthesis service client. Sends one utterance per request and
/// writes the returned compressed (MP3) audio to the target path.
///
/// Network reachability is a precondition; there is no retry loop.
pub struct CloudBackend {
    client: reqwest::blocking::Client,
    endpoint: String,
    lang: String,
    slow: bool,
}

impl CloudBackend {
    /// Create a client against the default endpoint.
    pub fn new(lang: &str, slow: bool) -> Self {
        Self::with_endpoint(TRANSLATE_TTS_ENDPOINT, lang, slow)
    }

    /// Create a client against a custom endpoint (used in tests).
    pub fn with_endpoint(endpoint: &str, lang: &str, slow: bool) -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
            endpoint: endpoint.to_string(),
            lang: lang.to_string(),
            slow,
        }
    }

    /// Get the endpoint URL for this backend.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn tts_speed(&self) -> &'static str {
        if self.slow { SLOW_TTS_SPEED } else { "1" }
    }
}

impl SpeechBackend for CloudBackend {
    fn synthesize(&self, text: &str, output: &Path) -> Result<(), SynthesisError> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("ie", "UTF-8"),
                ("client", "tw-ob"),
                ("tl", self.lang.as_str()),
                ("ttsspeed", self.tts_speed()),
                ("q", text),
            ])
            .send()
            .map_err(|e| SynthesisError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(SynthesisError::ServiceRejected(reject_reason(
                status.as_u16(),
                &body,
            )));
        }

        let bytes = response
            .bytes()
            .map_err(|e| SynthesisError::Network(e.to_string()))?;

        fs::write(output, &bytes)?;
        Ok(())
    }

    fn file_extension(&self) -> &'static str {
        "mp3"
    }

    fn name(&self) -> &'static str {
        "cloud"
    }
}

/// Error body shape the service returns for rejected requests.
#[derive(Deserialize)]
struct ServiceErrorBody {
    error: String,
}

/// Build a rejection reason from the HTTP status and response body.
/// Quota and transport-layer rejections carry a JSON error body; anything
/// else falls back to the bare status code.
fn reject_reason(status: u16, body: &str) -> String {
    match serde_json::from_str::<ServiceErrorBody>(body) {
        Ok(parsed) => format!("status {status}: {}", parsed.error),
        Err(_) => format!("status {status}"),
    }
}
