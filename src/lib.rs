//! script-tts-rs: script-to-narration CLI.
//!
//! Splits a plain-text script into per-line utterances, synthesizes each one
//! through an offline or cloud speech engine, and optionally stitches the
//! clips into a single narrated track with pauses in between.

pub mod assembler;
pub mod backend;
pub mod capability;
pub mod cli;
pub mod pipeline;
pub mod script;
