//! Recursive descent grammar for query strings.
//!
//! The grammar is split by concern:
//!
//! - [`expression`] - compare-expressions, free-text terms, parenthesized
//!   groups and their composition into a [`LogicalFragment`]
//! - [`facets`] - the `facets:[...]` and `nested:[...]` clauses
//! - [`type_clause`] - the leading `type:<value>` clause
//!
//! Parsing produces small syntax trees; rendering them to query-string text
//! (and applying the escaping rules) happens afterwards, selected by a
//! [`ValueContext`].

pub mod expression;
pub mod facets;
pub mod type_clause;

pub use expression::{CompareExpression, CompareValue, Item, Junction, LogicalFragment};
pub use facets::{ClauseKind, FacetSpec, NestedSpec};

use crate::error::{Expected, ParseError, ParseResult};
use crate::escape::{escape_facet_value, escape_free_text, escape_value};
use crate::lexer::Lexer;

/// Which escaping rules apply to comparison values while rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueContext {
    /// The top-level free-text query.
    Query,
    /// The inner filter of a facet or nested clause.
    Facet,
}

impl ValueContext {
    /// Escapes a bare comparison value.
    pub fn escape(self, value: &str) -> String {
        match self {
            ValueContext::Query => escape_value(value),
            ValueContext::Facet => escape_facet_value(value),
        }
    }

    /// Renders a bare free-text word.
    ///
    /// Facet filters are handed to the backend as written.
    pub fn free_text(self, word: &str) -> String {
        match self {
            ValueContext::Query => escape_free_text(word),
            ValueContext::Facet => word.to_string(),
        }
    }

    /// Renders a quoted phrase.
    ///
    /// In queries the phrase is re-quoted around its escaped text; facet
    /// filters pass the literal through for the backend to parse.
    pub fn phrase(self, raw: &str, text: &str) -> String {
        match self {
            ValueContext::Query => format!("\"{}\"", escape_value(text)),
            ValueContext::Facet => raw.to_string(),
        }
    }
}

/// Parser state shared by the sub-grammars.
pub(crate) struct Grammar<'a> {
    pub(crate) lexer: Lexer<'a>,
    max_depth: usize,
    depth: usize,
}

impl<'a> Grammar<'a> {
    pub(crate) fn new(input: &'a str, max_depth: usize) -> Self {
        Self {
            lexer: Lexer::new(input),
            max_depth,
            depth: 0,
        }
    }

    /// Enters one level of parenthesis or bracket nesting.
    ///
    /// `position` is the offset of the opening character, reported if the
    /// limit is exceeded.
    fn enter(&mut self, position: usize) -> ParseResult<()> {
        if self.depth >= self.max_depth {
            return Err(ParseError::new(position, Expected::ShallowerNesting));
        }
        self.depth += 1;
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }
}
