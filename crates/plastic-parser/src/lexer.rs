//! Lexer (tokenizer) for query strings.
//!
//! The query syntax is context sensitive (a `:` inside a value is text, a `:`
//! after a key is an operator), so the lexer is a cursor: the grammar asks it
//! for the token class it expects next and the lexer either produces that token
//! or leaves the cursor untouched.

use crate::error::{Expected, ParseError, ParseResult};

/// A comparison operator between a key and a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    /// `:`
    Colon,
    /// `:>`
    Greater,
    /// `:<`
    Less,
    /// `:>=`
    GreaterOrEqual,
    /// `:<=`
    LessOrEqual,
    /// `:=`
    Exact,
}

impl Operator {
    /// Longest spellings first so `:>=` is not read as `:>`.
    const ALL: [Operator; 6] = [
        Operator::GreaterOrEqual,
        Operator::LessOrEqual,
        Operator::Greater,
        Operator::Less,
        Operator::Exact,
        Operator::Colon,
    ];

    /// The operator as written in the query (and in the output).
    pub fn as_str(self) -> &'static str {
        match self {
            Operator::Colon => ":",
            Operator::Greater => ":>",
            Operator::Less => ":<",
            Operator::GreaterOrEqual => ":>=",
            Operator::LessOrEqual => ":<=",
            Operator::Exact => ":=",
        }
    }
}

/// A logical connector keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connector {
    /// `AND`, any case.
    And,
    /// `OR`, any case.
    Or,
}

impl Connector {
    /// The normalized (uppercase) spelling.
    pub fn as_str(self) -> &'static str {
        match self {
            Connector::And => "AND",
            Connector::Or => "OR",
        }
    }
}

/// A value on the right-hand side of a compare-expression, or a free-text term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// An unquoted word.
    Bare(String),
    /// A double-quoted phrase.
    Quoted {
        /// The literal as written, including quotes and escapes.
        raw: String,
        /// The phrase with quotes removed and escapes resolved.
        text: String,
    },
}

fn is_key_char(c: char) -> bool {
    !c.is_whitespace() && c != ':' && c != '(' && c != ')'
}

fn is_word_char(c: char) -> bool {
    !c.is_whitespace() && c != '(' && c != ')'
}

fn is_facet_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '.'
}

/// Cursor over a query string.
#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    input: &'a str,
    /// Current byte position in the input string.
    position: usize,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given input string.
    pub fn new(input: &'a str) -> Self {
        Self { input, position: 0 }
    }

    /// Returns the current byte position.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Moves the cursor back to a position previously returned by [`position`](Self::position).
    pub fn reset(&mut self, position: usize) {
        self.position = position;
    }

    /// Returns the unconsumed remainder of the input.
    pub fn rest(&self) -> &'a str {
        &self.input[self.position..]
    }

    /// Returns true once the whole input has been consumed.
    pub fn is_at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    /// Peeks at the next character without consuming it.
    pub fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn read_while(&mut self, keep: impl Fn(char) -> bool) -> &'a str {
        let rest = self.rest();
        let len = rest
            .char_indices()
            .find(|&(_, c)| !keep(c))
            .map_or(rest.len(), |(i, _)| i);
        self.position += len;
        &rest[..len]
    }

    /// Skips whitespace. Returns true if any was skipped.
    pub fn skip_whitespace(&mut self) -> bool {
        !self.read_while(char::is_whitespace).is_empty()
    }

    /// Consumes `expected` if it is the next character.
    pub fn punct(&mut self, expected: char) -> bool {
        if self.peek() != Some(expected) {
            return false;
        }
        self.position += expected.len_utf8();
        true
    }

    /// Reads a key: everything up to whitespace, `:` or a parenthesis.
    pub fn read_key(&mut self) -> Option<&'a str> {
        let key = self.read_while(is_key_char);
        (!key.is_empty()).then_some(key)
    }

    /// Reads a comparison operator, preferring the longest spelling.
    pub fn read_operator(&mut self) -> Option<Operator> {
        let op = Operator::ALL
            .into_iter()
            .find(|op| self.rest().starts_with(op.as_str()))?;
        self.position += op.as_str().len();
        Some(op)
    }

    /// Reads an unquoted word: everything up to whitespace or a parenthesis.
    pub fn read_bare_word(&mut self) -> Option<&'a str> {
        let word = self.read_while(is_word_char);
        (!word.is_empty()).then_some(word)
    }

    /// Reads a double-quoted string. The cursor must be on the opening quote.
    ///
    /// A backslash escapes the following character.
    pub fn read_quoted(&mut self) -> ParseResult<Value> {
        let start = self.position;
        if !self.punct('"') {
            return Err(ParseError::expected_value(start));
        }

        let mut text = String::new();
        let mut escaped = false;
        for (i, c) in self.rest().char_indices() {
            if escaped {
                text.push(c);
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                let end = self.position + i + 1;
                let raw = self.input[start..end].to_string();
                self.position = end;
                return Ok(Value::Quoted { raw, text });
            } else {
                text.push(c);
            }
        }

        Err(ParseError::new(self.input.len(), Expected::ClosingQuote))
    }

    /// Returns the connector at the cursor, if the next word is `AND` or `OR`.
    ///
    /// The keyword must be a whole word: followed by whitespace, a
    /// parenthesis or the end of input. `andy` and `or:1` are not connectors.
    pub fn peek_connector(&self) -> Option<(Connector, usize)> {
        let rest = self.rest();
        for (connector, len) in [(Connector::And, 3), (Connector::Or, 2)] {
            let Some(word) = rest.get(..len) else {
                continue;
            };
            if !word.eq_ignore_ascii_case(connector.as_str()) {
                continue;
            }
            match rest[len..].chars().next() {
                None => return Some((connector, len)),
                Some(c) if c.is_whitespace() || c == '(' || c == ')' => {
                    return Some((connector, len))
                }
                Some(_) => {}
            }
        }
        None
    }

    /// Consumes a connector keyword if one is next.
    pub fn read_connector(&mut self) -> Option<Connector> {
        let (connector, len) = self.peek_connector()?;
        self.position += len;
        Some(connector)
    }

    /// Reads a facet name (`[A-Za-z0-9_.]+`).
    pub fn read_facet_name(&mut self) -> Option<&'a str> {
        let name = self.read_while(is_facet_name_char);
        (!name.is_empty()).then_some(name)
    }

    /// Reads the run of characters allowed in a `type:` value.
    pub fn read_type_word(&mut self) -> &'a str {
        self.read_while(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    }

    /// Consumes `literal` if the input continues with it exactly.
    pub fn eat_literal(&mut self, literal: &str) -> bool {
        if self.rest().starts_with(literal) {
            self.position += literal.len();
            true
        } else {
            false
        }
    }
}
