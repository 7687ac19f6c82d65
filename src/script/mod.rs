//! Script parsing: turning raw text into an ordered list of utterances.

mod segmenter;

pub use segmenter::{COMMENT_MARKER, ScriptError, ScriptSegment, segment_script};
