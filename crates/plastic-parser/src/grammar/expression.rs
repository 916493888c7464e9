//! Compare-expressions, free-text terms and parenthesized groups.
//!
//! # Grammar
//!
//! ```text
//! logical_seq  ::= item ((connector | WS)? item)*
//! item         ::= compare_expr | free_term | "(" logical_seq ")"
//! compare_expr ::= key operator value
//! value        ::= quoted | "(" logical_seq ")" | bare_word
//! connector    ::= "AND" | "OR"            (any case, whole word)
//! ```
//!
//! Between two items the parser records a [`Junction`]: the connector keyword
//! that was written, whitespace, or nothing at all. Whitespace renders as a
//! single space and is left to the backend's `default_operator`; items that
//! touch (`a(b)`) stay touching. Only connectors the user actually wrote are
//! rendered as `AND`/`OR`.

use log::trace;

use super::{Grammar, ValueContext};
use crate::error::{Expected, ParseError, ParseResult};
use crate::lexer::{Connector, Operator, Value};

/// What sits between two adjacent items of a [`LogicalFragment`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Junction {
    /// Items separated only by whitespace.
    Adjacent,
    /// Items written with nothing between them, e.g. `a(b)`.
    Touching,
    /// An explicit `AND` / `OR`.
    Connector(Connector),
}

impl Junction {
    fn render(self) -> &'static str {
        match self {
            Junction::Adjacent => " ",
            Junction::Touching => "",
            Junction::Connector(Connector::And) => " AND ",
            Junction::Connector(Connector::Or) => " OR ",
        }
    }
}

/// The right-hand side of a compare-expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompareValue {
    /// A bare word or quoted phrase.
    Word(Value),
    /// A parenthesized group, e.g. `name:(krace OR kumar)`.
    Group(LogicalFragment),
}

/// `key<operator>value`, e.g. `price:>100`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompareExpression {
    pub key: String,
    pub operator: Operator,
    pub value: CompareValue,
}

impl CompareExpression {
    /// Renders `key<op><escaped-value>`.
    pub fn render(&self, ctx: ValueContext) -> String {
        let value = match &self.value {
            CompareValue::Word(Value::Bare(word)) => ctx.escape(word),
            CompareValue::Word(Value::Quoted { raw, text }) => ctx.phrase(raw, text),
            CompareValue::Group(group) => format!("({})", group.render(ctx)),
        };
        format!("{}{}{}", self.key, self.operator.as_str(), value)
    }
}

/// One element of a logical sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Item {
    Compare(CompareExpression),
    /// A free-text word or phrase.
    FreeText(Value),
    Group(LogicalFragment),
}

impl Item {
    pub fn render(&self, ctx: ValueContext) -> String {
        match self {
            Item::Compare(compare) => compare.render(ctx),
            Item::FreeText(Value::Bare(word)) => ctx.free_text(word),
            Item::FreeText(Value::Quoted { raw, text }) => ctx.phrase(raw, text),
            Item::Group(group) => format!("({})", group.render(ctx)),
        }
    }
}

/// A left-to-right sequence of items and the junctions between them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogicalFragment {
    pub first: Box<Item>,
    pub rest: Vec<(Junction, Item)>,
}

impl LogicalFragment {
    fn new(first: Item) -> Self {
        Self {
            first: Box::new(first),
            rest: Vec::new(),
        }
    }

    /// Renders the sequence as query-string text.
    pub fn render(&self, ctx: ValueContext) -> String {
        let mut out = self.first.render(ctx);
        for (junction, item) in &self.rest {
            out.push_str(junction.render());
            out.push_str(&item.render(ctx));
        }
        out
    }
}

/// Where a logical sequence is being parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Scope {
    /// Top level: a `facets:[` / `nested:[` clause also ends the sequence.
    TopLevel,
    /// Inside parentheses.
    Group,
}

impl Grammar<'_> {
    /// Parses `item ((connector | WS)? item)*`.
    ///
    /// Stops before a `)`, at the end of input, or (at top level) before a
    /// facets or nested clause. Whitespace after the last item is consumed.
    pub(crate) fn parse_sequence(&mut self, scope: Scope) -> ParseResult<LogicalFragment> {
        let mut fragment = LogicalFragment::new(self.parse_item()?);

        loop {
            let spaced = self.lexer.skip_whitespace();
            if self.at_sequence_end(scope) {
                break;
            }

            let junction = match self.lexer.read_connector() {
                Some(connector) => {
                    self.lexer.skip_whitespace();
                    if self.at_sequence_end(scope) {
                        return Err(ParseError::expected_expression(self.lexer.position()));
                    }
                    Junction::Connector(connector)
                }
                None if spaced => Junction::Adjacent,
                None => Junction::Touching,
            };
            trace!("junction {:?} at {}", junction, self.lexer.position());

            let item = self.parse_item()?;
            fragment.rest.push((junction, item));
        }

        Ok(fragment)
    }

    fn at_sequence_end(&self, scope: Scope) -> bool {
        match self.lexer.peek() {
            None | Some(')') => true,
            Some(_) => scope == Scope::TopLevel && self.peek_clause().is_some(),
        }
    }

    /// Parses a single compare-expression, free-text term or group.
    fn parse_item(&mut self) -> ParseResult<Item> {
        let start = self.lexer.position();
        match self.lexer.peek() {
            None | Some(')') => Err(ParseError::expected_expression(start)),
            Some('(') => Ok(Item::Group(self.parse_group()?)),
            Some('"') => Ok(Item::FreeText(self.lexer.read_quoted()?)),
            Some(_) => {
                let Some(key) = self.lexer.read_key() else {
                    // Starts with ':', which no key can.
                    return Ok(Item::FreeText(self.read_bare_value(start)?));
                };

                match self.lexer.read_operator() {
                    Some(operator) => {
                        let value = self.parse_compare_value()?;
                        Ok(Item::Compare(CompareExpression {
                            key: key.to_string(),
                            operator,
                            value,
                        }))
                    }
                    None => Ok(Item::FreeText(Value::Bare(key.to_string()))),
                }
            }
        }
    }

    fn parse_compare_value(&mut self) -> ParseResult<CompareValue> {
        let start = self.lexer.position();
        match self.lexer.peek() {
            Some('"') => Ok(CompareValue::Word(self.lexer.read_quoted()?)),
            Some('(') => Ok(CompareValue::Group(self.parse_group()?)),
            Some(c) if !c.is_whitespace() && c != ')' => {
                Ok(CompareValue::Word(self.read_bare_value(start)?))
            }
            _ => Err(ParseError::expected_value(start)),
        }
    }

    /// Parses `"(" logical_seq ")"` and returns the inner sequence.
    pub(crate) fn parse_group(&mut self) -> ParseResult<LogicalFragment> {
        let start = self.lexer.position();
        if !self.lexer.punct('(') {
            return Err(ParseError::new(start, Expected::OpenParen));
        }
        self.enter(start)?;

        self.lexer.skip_whitespace();
        let inner = self.parse_sequence(Scope::Group)?;
        self.lexer.skip_whitespace();

        if !self.lexer.punct(')') {
            return Err(ParseError::new(
                self.lexer.position(),
                Expected::ClosingParen,
            ));
        }
        self.leave();
        Ok(inner)
    }

    fn read_bare_value(&mut self, start: usize) -> ParseResult<Value> {
        self.lexer
            .read_bare_word()
            .map(|word| Value::Bare(word.to_string()))
            .ok_or_else(|| ParseError::expected_value(start))
    }
}
