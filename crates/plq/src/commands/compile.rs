//! Compile command implementation.
//!
//! Compiles a query and prints the resulting document as JSON.

use log::debug;
use plastic_parser_rs::{Compiler, CompilerOptions, QueryDocument};

use super::{read_query, CommandContext, Result};

/// Options for the compile command.
#[derive(Debug, Default)]
pub struct CompileOptions {
    /// Query text; `None` or `-` reads stdin.
    pub query: Option<String>,
    /// Overrides the configured nesting limit.
    pub max_depth: Option<u16>,
}

/// Executes the compile command.
pub fn execute(ctx: &CommandContext, opts: &CompileOptions) -> Result<()> {
    let query = read_query(opts.query.as_deref())?;
    debug!("read {} byte(s) of query text", query.len());
    let document = compile_with(ctx, opts, &query)?;
    println!("{}", ctx.to_json(&document)?);
    Ok(())
}

/// Compiles `query` with the configured options, applying any command-line override.
fn compile_with(ctx: &CommandContext, opts: &CompileOptions, query: &str) -> Result<QueryDocument> {
    let options = CompilerOptions {
        max_depth: opts.max_depth.map_or(ctx.compiler.max_depth, usize::from),
    };
    debug!("compiling with max_depth {}", options.max_depth);
    Ok(Compiler::new(options).compile(query)?)
}
