//! Top-level assembly of the query document.

use std::collections::BTreeMap;

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::document::{FilterClause, QueryDocument, QueryStringQuery};
use crate::error::{ParseError, ParseResult};
use crate::grammar::expression::Scope;
use crate::grammar::{ClauseKind, Grammar, NestedSpec, ValueContext};

/// Default bound on parenthesis and bracket nesting.
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Compiler settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerOptions {
    /// Deepest allowed nesting of `(...)` groups and `[...]` clauses.
    pub max_depth: usize,
}

impl CompilerOptions {
    pub const fn new() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl Default for CompilerOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// Compiles query strings into [`QueryDocument`]s.
///
/// A compiler holds only its options; it can be shared freely between
/// threads and reused for any number of queries.
///
/// # Example
///
/// ```
/// use plastic_parser_rs::{Compiler, CompilerOptions};
///
/// let compiler = Compiler::new(CompilerOptions { max_depth: 4 });
/// let doc = compiler.compile("type:article (title:hello OR body:\"world\")").unwrap();
/// assert_eq!(doc.free_text(), Some("(title:hello OR body:\"world\")"));
/// assert!(compiler.compile("((((((deep))))))").is_err());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Compiler {
    options: CompilerOptions,
}

const DEFAULT_COMPILER: Compiler = Compiler::new(CompilerOptions::new());

/// Compiles `raw` with default options.
///
/// Newlines are removed and surrounding whitespace is trimmed before parsing;
/// the rest must be consumed in full.
///
/// # Example
///
/// ```
/// let doc = plastic_parser_rs::compile("type:article a:1 and b:2").unwrap();
/// assert_eq!(doc.free_text(), Some("a:1 AND b:2"));
/// ```
pub fn compile(raw: &str) -> ParseResult<QueryDocument> {
    DEFAULT_COMPILER.compile(raw)
}

impl Compiler {
    pub const fn new(options: CompilerOptions) -> Self {
        Self { options }
    }

    /// Returns the options this compiler was built with.
    pub fn options(&self) -> &CompilerOptions {
        &self.options
    }

    /// Compiles one query string.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] pointing at the first offset (in the
    /// normalized query) the grammar could not consume.
    pub fn compile(&self, raw: &str) -> ParseResult<QueryDocument> {
        let normalized = normalize(raw);
        debug!("compiling query: {:?}", normalized);

        let mut grammar = Grammar::new(&normalized, self.options.max_depth);
        let mut document = QueryDocument::default();
        let mut must = Vec::new();
        let mut fragments = Vec::new();

        if let Some(type_filter) = grammar.parse_type_clause()? {
            must.push(FilterClause::Type(type_filter));
        }

        loop {
            grammar.lexer.skip_whitespace();
            if grammar.lexer.is_at_end() {
                break;
            }

            match grammar.peek_clause() {
                Some(ClauseKind::Facets) => {
                    let facets = document.facets.get_or_insert_with(BTreeMap::new);
                    for spec in grammar.parse_facets_clause()? {
                        // Last write wins for repeated names.
                        facets.insert(spec.name.clone(), spec.to_facet());
                    }
                }
                Some(ClauseKind::Nested) => {
                    let specs = grammar.parse_nested_clause()?;
                    must.extend(specs.iter().map(NestedSpec::to_clause));
                }
                None => {
                    if grammar.lexer.peek() == Some(')') {
                        return Err(ParseError::trailing_input(grammar.lexer.position()));
                    }
                    let fragment = grammar.parse_sequence(Scope::TopLevel)?;
                    let rendered = fragment.render(ValueContext::Query);
                    trace!("fragment {:?}", rendered);
                    fragments.push(rendered);
                }
            }
        }

        let free_text = fragments.join(" ");
        if !free_text.is_empty() {
            document.query.filtered.query = Some(QueryStringQuery::new(free_text));
        }
        document.query.filtered.filter.clauses.must = must;

        debug!(
            "compiled query: {} must clause(s), {} facet(s), free text {:?}",
            document.must().len(),
            document.facets.as_ref().map_or(0, BTreeMap::len),
            document.free_text()
        );
        Ok(document)
    }
}

/// Removes newlines and trims surrounding whitespace.
fn normalize(raw: &str) -> String {
    raw.replace('\n', "").trim().to_string()
}
