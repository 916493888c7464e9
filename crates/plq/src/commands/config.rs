//! Config command implementation.
//!
//! View and manage configuration settings.
//! Config file is located at ~/.config/plq/config.toml.

use std::env;
use std::fs;
use std::path::PathBuf;

use directories::BaseDirs;
use log::debug;
use plastic_parser_rs::CompilerOptions;
use serde::{Deserialize, Serialize};

use super::{CommandContext, CommandError, Result};

/// Current config file version. Increment when making breaking changes to schema.
const CONFIG_VERSION: u32 = 1;

/// Upper bound accepted for `compiler.max_depth` and `--max-depth`.
pub const MAX_DEPTH_LIMIT: u16 = 256;

/// Environment variable that overrides the config file location.
const CONFIG_ENV_VAR: &str = "PLQ_CONFIG";

/// Default config file contents.
const DEFAULT_CONFIG: &str = r#"# plq - query compiler configuration

# Config schema version (do not modify)
version = 1

[compiler]
# max_depth = 32           # Deepest allowed nesting of (...) and [...]

[output]
# pretty = true            # Pretty-print compiled documents
# color = true             # Enable colors (respects NO_COLOR env)
"#;

/// Configuration file structure.
#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    /// Config schema version for migrations.
    /// Defaults to current version when not present in file.
    #[serde(default = "default_version")]
    pub version: u32,

    /// Compiler settings.
    #[serde(default)]
    pub compiler: CompilerOptions,

    /// Output settings.
    #[serde(default)]
    pub output: OutputConfig,
}

/// Returns the current config version (used by serde default).
fn default_version() -> u32 {
    CONFIG_VERSION
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            compiler: CompilerOptions::default(),
            output: OutputConfig::default(),
        }
    }
}

/// Output configuration.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Pretty-print JSON.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pretty: Option<bool>,

    /// Enable colors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<bool>,
}

/// Gets the config file path.
///
/// `PLQ_CONFIG` wins, then `$XDG_CONFIG_HOME/plq`, then `~/.config/plq` on all platforms.
pub fn get_config_path() -> Result<PathBuf> {
    if let Ok(path) = env::var(CONFIG_ENV_VAR) {
        return Ok(PathBuf::from(path));
    }

    let config_dir = if let Ok(xdg_config) = env::var("XDG_CONFIG_HOME") {
        PathBuf::from(xdg_config).join("plq")
    } else {
        BaseDirs::new()
            .map(|dirs| dirs.home_dir().join(".config").join("plq"))
            .ok_or_else(|| {
                CommandError::Config("Could not determine config directory".to_string())
            })?
    };
    Ok(config_dir.join("config.toml"))
}

/// Loads the configuration from disk, falling back to defaults when no file exists.
pub fn load_config() -> Result<Config> {
    let path = get_config_path()?;

    if !path.exists() {
        debug!("no config file at {}, using defaults", path.display());
        return Ok(Config::default());
    }

    let content = fs::read_to_string(&path)
        .map_err(|e| CommandError::Config(format!("Failed to read config: {}", e)))?;

    let config: Config = toml::from_str(&content)
        .map_err(|e| CommandError::Config(format!("Failed to parse config: {}", e)))?;

    debug!("loaded config from {}", path.display());
    migrate_config(config)
}

/// Migrates config to current version if needed.
/// Returns the config as-is if already at current version.
fn migrate_config(mut config: Config) -> Result<Config> {
    let max_depth = config.compiler.max_depth;
    if max_depth == 0 || max_depth > usize::from(MAX_DEPTH_LIMIT) {
        return Err(CommandError::Config(format!(
            "compiler.max_depth must be between 1 and {}, got {}",
            MAX_DEPTH_LIMIT, max_depth
        )));
    }

    // Version 1 is the initial schema; later versions hook in here.
    config.version = CONFIG_VERSION;
    Ok(config)
}

/// Writes `contents` to the config path, creating parent directories.
fn write_config_file(contents: &str) -> Result<PathBuf> {
    let path = get_config_path()?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            CommandError::Config(format!("Failed to create config directory: {}", e))
        })?;
    }

    fs::write(&path, contents)
        .map_err(|e| CommandError::Config(format!("Failed to write config: {}", e)))?;

    Ok(path)
}

/// Executes the config show command.
pub fn execute_show(ctx: &CommandContext) -> Result<()> {
    let config = load_config()?;
    let path = get_config_path()?;

    if ctx.quiet {
        return Ok(());
    }

    use owo_colors::OwoColorize;

    let header = "Configuration";
    if ctx.use_colors {
        println!("{}\n", header.green().bold());
    } else {
        println!("{}\n", header);
    }

    println!("File: {}", path.display());
    println!("Exists: {}\n", path.exists());

    let effective = toml::to_string_pretty(&config)
        .map_err(|e| CommandError::Config(format!("Failed to serialize config: {}", e)))?;
    println!("{}", effective.trim_end());

    if !path.exists() {
        println!("\n(No config file exists. Run 'plq config init' to create one.)");
    }

    Ok(())
}

/// Executes the config path command.
pub fn execute_path() -> Result<()> {
    let path = get_config_path()?;
    println!("{}", path.display());
    Ok(())
}

/// Executes the config init command.
pub fn execute_init(ctx: &CommandContext, force: bool) -> Result<()> {
    let path = get_config_path()?;
    if path.exists() && !force {
        return Err(CommandError::Config(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        )));
    }

    let path = write_config_file(DEFAULT_CONFIG)?;
    if !ctx.quiet {
        println!("Created default config at: {}", path.display());
    }
    Ok(())
}
