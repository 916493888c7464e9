//! The leading `type:<value>` clause.

use log::trace;

use super::Grammar;
use crate::document::TypeFilter;
use crate::error::{Expected, ParseError, ParseResult};
use crate::lexer::Connector;

const TYPE_KEYWORD: &str = "type:";

impl Grammar<'_> {
    /// Parses `"type" ":" word ["AND"]` at the cursor.
    ///
    /// Returns `Ok(None)` without consuming anything when the input does not
    /// start with `type:`, or when `type` is used with another comparison
    /// operator (`type:>1` is a compare-expression). A trailing `AND` is
    /// consumed and discarded.
    pub(crate) fn parse_type_clause(&mut self) -> ParseResult<Option<TypeFilter>> {
        let Some(after) = self.lexer.rest().strip_prefix(TYPE_KEYWORD) else {
            return Ok(None);
        };
        if after.starts_with(&['>', '<', '='][..]) {
            return Ok(None);
        }
        self.lexer.eat_literal(TYPE_KEYWORD);

        let start = self.lexer.position();
        let value = self.lexer.read_type_word();
        if value.is_empty() {
            return Err(ParseError::new(start, Expected::TypeValue));
        }
        if self.lexer.peek().is_some_and(|c| !c.is_whitespace()) {
            return Err(ParseError::new(self.lexer.position(), Expected::TypeValue));
        }

        let save = self.lexer.position();
        self.lexer.skip_whitespace();
        if matches!(self.lexer.peek_connector(), Some((Connector::And, _))) {
            self.lexer.read_connector();
        } else {
            self.lexer.reset(save);
        }

        trace!("type filter {}", value);
        Ok(Some(TypeFilter {
            value: value.to_string(),
        }))
    }
}
