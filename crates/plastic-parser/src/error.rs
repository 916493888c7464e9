//! Error types for the query compiler.

use std::fmt;

use thiserror::Error;

/// A specialized Result type for query compilation.
pub type ParseResult<T> = Result<T, ParseError>;

/// What the grammar was looking for when it gave up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expected {
    /// A compare-expression, free-text term or parenthesized group.
    Expression,
    /// The value half of a compare-expression.
    Value,
    /// The value of a `type:` clause.
    TypeValue,
    /// A closing `"` for a quoted value.
    ClosingQuote,
    /// A closing `)`.
    ClosingParen,
    /// An opening `(` (required by `nested:` items).
    OpenParen,
    /// An opening `[` after `facets:` or `nested:`.
    OpenBracket,
    /// A closing `]`.
    ClosingBracket,
    /// A facet name (`[A-Za-z0-9_.]`, not starting or ending with `.`).
    FacetName,
    /// Nesting within the configured depth limit.
    ShallowerNesting,
    /// The end of the query.
    EndOfInput,
}

impl fmt::Display for Expected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Expected::Expression => "an expression",
            Expected::Value => "a value",
            Expected::TypeValue => "a type value",
            Expected::ClosingQuote => "a closing '\"'",
            Expected::ClosingParen => "')'",
            Expected::OpenParen => "'('",
            Expected::OpenBracket => "'['",
            Expected::ClosingBracket => "']'",
            Expected::FacetName => "a facet name",
            Expected::ShallowerNesting => "less deeply nested groups",
            Expected::EndOfInput => "end of query",
        };
        f.write_str(text)
    }
}

/// The query could not be consumed in full.
///
/// `offset` is a byte offset into the normalized query (newlines removed,
/// surrounding whitespace trimmed).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid query syntax at offset {offset}: expected {expected}")]
pub struct ParseError {
    /// Byte offset of the first character that could not be consumed.
    pub offset: usize,
    /// What the grammar expected at `offset`.
    pub expected: Expected,
}

impl ParseError {
    /// Creates a parse error at the given offset.
    pub fn new(offset: usize, expected: Expected) -> Self {
        ParseError { offset, expected }
    }

    /// Creates an error for a missing value at `offset`.
    pub fn expected_value(offset: usize) -> Self {
        Self::new(offset, Expected::Value)
    }

    /// Creates an error for a missing expression at `offset`.
    pub fn expected_expression(offset: usize) -> Self {
        Self::new(offset, Expected::Expression)
    }

    /// Creates an error for input left over at `offset`.
    pub fn trailing_input(offset: usize) -> Self {
        Self::new(offset, Expected::EndOfInput)
    }
}
