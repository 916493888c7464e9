//! Command implementations for the plq CLI.
//!
//! This module contains the actual command handlers that are invoked by the CLI.

pub mod check;
pub mod compile;
pub mod completions;
pub mod config;

use std::io::{self, Read};

use plastic_parser_rs::CompilerOptions;

use crate::cli::Cli;
use config::Config;

/// Query argument that selects stdin.
const STDIN_MARKER: &str = "-";

/// Error type for command execution.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// Query parsing error.
    #[error("{0}")]
    Parse(#[from] plastic_parser_rs::ParseError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for command execution.
pub type Result<T> = std::result::Result<T, CommandError>;

/// Context for command execution, built from CLI flags layered over the config file.
#[derive(Debug, Clone)]
pub struct CommandContext {
    /// Whether to pretty-print JSON.
    pub pretty: bool,
    /// Whether to use colors.
    pub use_colors: bool,
    /// Whether to be quiet (errors only).
    pub quiet: bool,
    /// Compiler settings from the config file.
    pub compiler: CompilerOptions,
}

impl CommandContext {
    /// Creates a new command context from CLI arguments and the loaded config.
    ///
    /// Flags win over config values; `NO_COLOR` disables colors as well.
    pub fn from_cli(cli: &Cli, config: &Config) -> Self {
        let no_color_env = std::env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty());
        Self {
            pretty: !cli.compact && config.output.pretty.unwrap_or(true),
            use_colors: !cli.no_color && !no_color_env && config.output.color.unwrap_or(true),
            quiet: cli.quiet,
            compiler: config.compiler,
        }
    }

    /// Serializes `value` as JSON honoring the pretty setting.
    pub fn to_json<T: serde::Serialize>(&self, value: &T) -> Result<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };
        Ok(json)
    }
}

/// Returns the query text from the argument, or from stdin for `-` or no argument.
pub fn read_query(query: Option<&str>) -> Result<String> {
    match query {
        Some(text) if text != STDIN_MARKER => Ok(text.to_string()),
        _ => read_query_from(io::stdin().lock()),
    }
}

fn read_query_from(mut reader: impl Read) -> Result<String> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    Ok(text)
}
