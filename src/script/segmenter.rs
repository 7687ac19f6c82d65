//! Script segmentation.

use thiserror::Error;

/// Lines starting with this marker are treated as comments.
pub const COMMENT_MARKER: char = '#';

/// Errors that can occur while segmenting a script.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ScriptError {
    #[error("script contains no synthesizable lines")]
    EmptyScript,
}

/// One synthesizable utterance taken from a single script line.
///
/// Indices are 1-based and strictly increasing in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptSegment {
    pub index: u32,
    pub text: String,
}

/// Split raw script text into an ordered sequence of segments.
///
/// Each line is trimmed; blank lines and lines starting with `#` are
/// discarded. Pure function of the input text — reading the script file is
/// the caller's responsibility.
///
/// # Errors
/// Returns [`ScriptError::EmptyScript`] when no line qualifies.
pub fn segment_script(raw: &str) -> Result<Vec<ScriptSegment>, ScriptError> {
    let mut segments = Vec::new();

    for line in raw.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with(COMMENT_MARKER) {
            continue;
        }
        segments.push(ScriptSegment {
            index: segments.len() as u32 + 1,
            text: line.to_string(),
        });
    }

    if segments.is_empty() {
        return Err(ScriptError::EmptyScript);
    }

    Ok(segments)
}
