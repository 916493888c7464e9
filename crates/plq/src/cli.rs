//! CLI argument parsing using clap derive macros.
//!
//! This module defines the command-line interface for plq.

use clap::{Parser, Subcommand, ValueEnum};

use crate::commands::config::MAX_DEPTH_LIMIT;

/// plq - compile plastic search queries into filtered-query JSON
#[derive(Parser, Debug)]
#[command(name = "plq")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbose output (show debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Print JSON on a single line
    #[arg(long, global = true)]
    pub compact: bool,

    /// Disable colors in output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compile a query and print the document
    #[command(alias = "c")]
    Compile {
        /// Query text ("-" or omitted reads stdin)
        query: Option<String>,

        /// Override the maximum nesting depth
        #[arg(long, value_parser = clap::value_parser!(u16).range(1..=i64::from(MAX_DEPTH_LIMIT)))]
        max_depth: Option<u16>,
    },

    /// Check that a query compiles
    Check {
        /// Query text ("-" or omitted reads stdin)
        query: Option<String>,
    },

    /// View or manage configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

/// Shell types for completions
#[derive(ValueEnum, Clone, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    Powershell,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Show config file path
    Path,

    /// Write a default config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::parse_from(["plq", "--verbose", "check", "a:1"]);
        assert!(cli.verbose);
        assert!(!cli.quiet);
        assert!(!cli.compact);

        let cli = Cli::parse_from(["plq", "--quiet", "--compact", "check", "a:1"]);
        assert!(!cli.verbose);
        assert!(cli.quiet);
        assert!(cli.compact);
    }

    #[test]
    fn test_verbose_conflicts_with_quiet() {
        assert!(Cli::try_parse_from(["plq", "-v", "-q", "check", "a:1"]).is_err());
    }

    #[test]
    fn test_no_color_flag() {
        let cli = Cli::parse_from(["plq", "check", "a:1", "--no-color"]);
        assert!(cli.no_color);
    }

    #[test]
    fn test_compile_command() {
        let cli = Cli::parse_from(["plq", "compile", "type:article a:1", "--max-depth", "4"]);
        if let Some(Commands::Compile { query, max_depth }) = cli.command {
            assert_eq!(query.as_deref(), Some("type:article a:1"));
            assert_eq!(max_depth, Some(4));
        } else {
            panic!("Expected Compile command");
        }
    }

    #[test]
    fn test_max_depth_range() {
        assert!(Cli::try_parse_from(["plq", "compile", "a", "--max-depth", "1"]).is_ok());
        assert!(Cli::try_parse_from(["plq", "compile", "a", "--max-depth", "256"]).is_ok());

        assert!(Cli::try_parse_from(["plq", "compile", "a", "--max-depth", "0"]).is_err());
        assert!(Cli::try_parse_from(["plq", "compile", "a", "--max-depth", "257"]).is_err());
        assert!(Cli::try_parse_from(["plq", "compile", "a", "--max-depth", "-1"]).is_err());
    }

    #[test]
    fn test_compile_alias_and_stdin() {
        let cli = Cli::parse_from(["plq", "c"]);
        assert!(matches!(
            cli.command,
            Some(Commands::Compile {
                query: None,
                max_depth: None
            })
        ));

        let cli = Cli::parse_from(["plq", "compile", "-"]);
        if let Some(Commands::Compile { query, .. }) = cli.command {
            assert_eq!(query.as_deref(), Some("-"));
        } else {
            panic!("Expected Compile command");
        }
    }

    #[test]
    fn test_config_subcommands() {
        let cli = Cli::parse_from(["plq", "config", "path"]);
        assert!(matches!(
            cli.command,
            Some(Commands::Config {
                command: Some(ConfigCommands::Path)
            })
        ));

        let cli = Cli::parse_from(["plq", "config", "init", "--force"]);
        assert!(matches!(
            cli.command,
            Some(Commands::Config {
                command: Some(ConfigCommands::Init { force: true })
            })
        ));

        let cli = Cli::parse_from(["plq", "config"]);
        assert!(matches!(cli.command, Some(Commands::Config { command: None })));
    }

    #[test]
    fn test_completions() {
        let cli = Cli::parse_from(["plq", "completions", "zsh"]);
        if let Some(Commands::Completions { shell }) = cli.command {
            assert!(matches!(shell, Shell::Zsh));
        } else {
            panic!("Expected Completions command");
        }
        assert!(Cli::try_parse_from(["plq", "completions", "tcsh"]).is_err());
    }
}
