//! CLI argument parsing and validation.

mod args;

pub use args::{Cli, Command, ConvertArgs, Engine};
