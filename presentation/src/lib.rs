//! Presentation layer for shortlist
//!
//! This crate contains CLI definitions and output formatters. It only
//! reads session snapshots and turns user input into session commands.

pub mod cli;
pub mod config;
pub mod output;

// Re-export commonly used types
pub use cli::commands::{Cli, OutputFormat, SessionCommand};
pub use config::OutputConfig;
pub use output::console::ConsoleFormatter;
