//! Check command implementation.
//!
//! Validates a query without printing the compiled document.

use owo_colors::OwoColorize;
use plastic_parser_rs::Compiler;

use super::{read_query, CommandContext, Result};

/// Executes the check command.
///
/// Prints `ok` on success; a parse failure is returned to the caller, which reports it.
pub fn execute(ctx: &CommandContext, query: Option<&str>) -> Result<()> {
    let query = read_query(query)?;
    Compiler::new(ctx.compiler).compile(&query)?;

    if !ctx.quiet {
        if ctx.use_colors {
            println!("{}", "ok".green());
        } else {
            println!("ok");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::CommandError;
    use plastic_parser_rs::CompilerOptions;

    fn ctx() -> CommandContext {
        CommandContext {
            pretty: true,
            use_colors: false,
            quiet: true,
            compiler: CompilerOptions::default(),
        }
    }

    #[test]
    fn test_check_valid_query() {
        assert!(execute(&ctx(), Some("type:article a:1 facets:[b]")).is_ok());
    }

    #[test]
    fn test_check_invalid_query() {
        let err = execute(&ctx(), Some("title:\"open")).unwrap_err();
        assert!(matches!(err, CommandError::Parse(_)));
    }
}
