//! Command-line host for a technology radar.
//!
//! Reads the radar config and markdown content from disk, runs it through
//! `radar-core` and writes the JSON artifacts the site renders.

pub mod commands;
pub mod loader;

pub use commands::{execute_command, CommandOutput, Commands, Workspace};
pub use loader::{collect_markdown, load_blips, load_config, FileError, LoadedRadar};
