use clap::{CommandFactory, Parser};
use log::LevelFilter;
use owo_colors::OwoColorize;
use std::process::ExitCode;

mod cli;
mod commands;

use cli::{Cli, Commands, ConfigCommands};
use commands::compile::CompileOptions;
use commands::config::{load_config, Config};
use commands::{CommandContext, CommandError};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let colored = !cli.no_color && std::env::var_os("NO_COLOR").is_none();
            if colored {
                eprintln!("{} {e}", "Error:".red().bold());
            } else {
                eprintln!("Error: {e}");
            }
            error_exit_code(&e)
        }
    }
}

/// Installs env_logger; `-v` and `-q` take precedence over `RUST_LOG`.
fn init_logging(cli: &Cli) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if cli.verbose {
        builder.filter_level(LevelFilter::Debug);
    } else if cli.quiet {
        builder.filter_level(LevelFilter::Error);
    }
    builder.format_timestamp(None).init();
}

fn run(cli: &Cli) -> commands::Result<()> {
    // Completions and config repair must work even with a broken config file.
    match &cli.command {
        Some(Commands::Completions { shell }) => {
            return commands::completions::execute(shell).map_err(CommandError::Io);
        }
        Some(Commands::Config {
            command: Some(ConfigCommands::Path),
        }) => return commands::config::execute_path(),
        Some(Commands::Config {
            command: Some(ConfigCommands::Init { force }),
        }) => {
            let ctx = CommandContext::from_cli(cli, &Config::default());
            return commands::config::execute_init(&ctx, *force);
        }
        None => {
            Cli::command().print_help()?;
            return Ok(());
        }
        _ => {}
    }

    let config = load_config()?;
    let ctx = CommandContext::from_cli(cli, &config);

    match &cli.command {
        Some(Commands::Compile { query, max_depth }) => {
            let opts = CompileOptions {
                query: query.clone(),
                max_depth: *max_depth,
            };
            commands::compile::execute(&ctx, &opts)
        }
        Some(Commands::Check { query }) => commands::check::execute(&ctx, query.as_deref()),
        Some(Commands::Config { .. }) => commands::config::execute_show(&ctx),
        Some(Commands::Completions { .. }) | None => Ok(()),
    }
}

/// Returns the exit code for an error.
fn error_exit_code(e: &CommandError) -> ExitCode {
    match e {
        CommandError::Parse(_) => ExitCode::from(1),
        CommandError::Io(_) => ExitCode::from(3),
        CommandError::Config(_) => ExitCode::from(5),
        CommandError::Json(_) => ExitCode::from(1),
    }
}
