//! The `facets:[...]` and `nested:[...]` clauses.
//!
//! ```text
//! facets_clause ::= "facets:" "[" facet ((",")? facet)* (",")? "]"
//! facet         ::= facet_name ("(" logical_seq ")")?
//! nested_clause ::= "nested:" "[" nested ((",")? nested)* (",")? "]"
//! nested        ::= facet_name "(" logical_seq ")"
//! facet_name    ::= [A-Za-z0-9_.]+
//! ```
//!
//! Both clauses share their surface syntax; the keyword decides the output.
//! A facet becomes an aggregation descriptor, a nested item becomes a `must`
//! filter clause.

use log::trace;

use super::{Grammar, LogicalFragment, ValueContext};
use crate::document::{Facet, FacetFilter, FilterClause, QueryStringQuery, TermsAggregation};
use crate::error::{Expected, ParseError, ParseResult};

/// Which bracketed clause starts at the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClauseKind {
    Facets,
    Nested,
}

impl ClauseKind {
    /// The literal keyword introducing the clause.
    pub fn keyword(self) -> &'static str {
        match self {
            ClauseKind::Facets => "facets:",
            ClauseKind::Nested => "nested:",
        }
    }
}

/// A parsed facet request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FacetSpec {
    /// The name as written, dots included. Keys the facets mapping.
    pub name: String,
    /// Everything before the last `.`, if the name is dotted.
    pub nested_path: Option<String>,
    /// The field after the last `.`.
    pub leaf: String,
    /// Restricts the documents the facet counts.
    pub inner_filter: Option<LogicalFragment>,
}

impl FacetSpec {
    fn new(name: String, inner_filter: Option<LogicalFragment>) -> Self {
        let (nested_path, leaf) = match name.rsplit_once('.') {
            Some((path, leaf)) => (Some(path.to_string()), leaf.to_string()),
            None => (None, name.clone()),
        };
        Self {
            name,
            nested_path,
            leaf,
            inner_filter,
        }
    }

    /// Builds the aggregation descriptor.
    pub fn to_facet(&self) -> Facet {
        Facet {
            nested: self.nested_path.clone(),
            terms: TermsAggregation::for_leaf(&self.leaf),
            facet_filter: self.inner_filter.as_ref().map(|filter| FacetFilter {
                query: QueryStringQuery::new(filter.render(ValueContext::Facet)),
            }),
        }
    }
}

/// A parsed `nested:[path(expr)]` item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NestedSpec {
    pub path: String,
    pub filter: LogicalFragment,
}

impl NestedSpec {
    /// Builds the `must` clause.
    pub fn to_clause(&self) -> FilterClause {
        FilterClause::nested(self.path.clone(), self.filter.render(ValueContext::Facet))
    }
}

impl Grammar<'_> {
    /// Returns the clause starting at the cursor, if any.
    ///
    /// The keyword only introduces a clause when a `[` follows it; otherwise
    /// `facets:x` is an ordinary compare-expression.
    pub(crate) fn peek_clause(&self) -> Option<ClauseKind> {
        let rest = self.lexer.rest();
        [ClauseKind::Facets, ClauseKind::Nested]
            .into_iter()
            .find(|kind| {
                rest.strip_prefix(kind.keyword())
                    .is_some_and(|after| after.trim_start().starts_with('['))
            })
    }

    /// Parses `facets:[...]`.
    pub(crate) fn parse_facets_clause(&mut self) -> ParseResult<Vec<FacetSpec>> {
        self.parse_clause(ClauseKind::Facets, |grammar| {
            let name = grammar.parse_facet_name()?;
            let save = grammar.lexer.position();
            grammar.lexer.skip_whitespace();
            let inner_filter = if grammar.lexer.peek() == Some('(') {
                Some(grammar.parse_group()?)
            } else {
                grammar.lexer.reset(save);
                None
            };
            trace!("facet {} (filtered: {})", name, inner_filter.is_some());
            Ok(FacetSpec::new(name, inner_filter))
        })
    }

    /// Parses `nested:[...]`.
    pub(crate) fn parse_nested_clause(&mut self) -> ParseResult<Vec<NestedSpec>> {
        self.parse_clause(ClauseKind::Nested, |grammar| {
            let path = grammar.parse_facet_name()?;
            grammar.lexer.skip_whitespace();
            let filter = grammar.parse_group()?;
            trace!("nested filter on {}", path);
            Ok(NestedSpec { path, filter })
        })
    }

    fn parse_clause<T>(
        &mut self,
        kind: ClauseKind,
        mut parse_entry: impl FnMut(&mut Self) -> ParseResult<T>,
    ) -> ParseResult<Vec<T>> {
        if !self.lexer.eat_literal(kind.keyword()) {
            return Err(ParseError::expected_expression(self.lexer.position()));
        }
        self.lexer.skip_whitespace();

        let open = self.lexer.position();
        if !self.lexer.punct('[') {
            return Err(ParseError::new(open, Expected::OpenBracket));
        }
        self.enter(open)?;

        let mut entries = Vec::new();
        loop {
            self.lexer.skip_whitespace();
            if !entries.is_empty() && self.lexer.punct(']') {
                break;
            }
            if self.lexer.is_at_end() {
                return Err(ParseError::new(
                    self.lexer.position(),
                    Expected::ClosingBracket,
                ));
            }
            entries.push(parse_entry(self)?);
            self.lexer.skip_whitespace();
            self.lexer.punct(',');
        }

        self.leave();
        Ok(entries)
    }

    /// Reads a facet name, rejecting empty dotted segments (`.a`, `a.`, `a..b`).
    fn parse_facet_name(&mut self) -> ParseResult<String> {
        let start = self.lexer.position();
        match self.lexer.read_facet_name() {
            Some(name) if !name.split('.').any(str::is_empty) => Ok(name.to_string()),
            _ => Err(ParseError::new(start, Expected::FacetName)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn facets(input: &str) -> ParseResult<Vec<FacetSpec>> {
        let mut grammar = Grammar::new(input, 8);
        let specs = grammar.parse_facets_clause()?;
        assert!(grammar.lexer.is_at_end(), "unconsumed: {:?}", grammar.lexer.rest());
        Ok(specs)
    }

    #[test]
    fn test_plain_facet() {
        let specs = facets("facets:[country]").unwrap();
        assert_eq!(specs.len(), 1);
        assert_eq!(specs[0].name, "country");
        assert_eq!(specs[0].leaf, "country");
        assert!(specs[0].nested_path.is_none());
        assert!(specs[0].inner_filter.is_none());
    }

    #[test]
    fn test_dotted_facet_splits_on_last_dot() {
        let specs = facets("facets:[a.b.c]").unwrap();
        assert_eq!(specs[0].nested_path.as_deref(), Some("a.b"));
        assert_eq!(specs[0].leaf, "c");
        assert_eq!(specs[0].to_facet().terms.field, "c_nonngram");
    }

    #[test]
    fn test_separators_and_spacing() {
        for input in [
            "facets:[a,b]",
            "facets:[a b]",
            "facets: [ a , b ]",
            "facets:[a, b,]",
        ] {
            let names: Vec<String> = facets(input).unwrap().into_iter().map(|s| s.name).collect();
            assert_eq!(names, vec!["a", "b"], "for {}", input);
        }
    }

    #[test]
    fn test_facet_filter_rendered_in_facet_context() {
        let specs = facets("facets:[aaa (a:b abc:(def fff) c:\"x y\")]").unwrap();
        let facet = specs[0].to_facet();
        let filter = facet.facet_filter.unwrap();
        assert_eq!(
            filter.query.query_string.query,
            "a:b abc:(def fff) c:\"x y\""
        );
    }

    #[test]
    fn test_empty_list_rejected() {
        let err = facets("facets:[]").unwrap_err();
        assert_eq!(err, ParseError::new(8, Expected::FacetName));
    }

    #[test]
    fn test_unclosed_list_rejected() {
        let err = facets("facets:[a").unwrap_err();
        assert_eq!(err, ParseError::new(9, Expected::ClosingBracket));
    }

    #[test]
    fn test_bad_facet_names_rejected() {
        for input in ["facets:[.a]", "facets:[a.]", "facets:[a..b]", "facets:[-]"] {
            let err = facets(input).unwrap_err();
            assert_eq!(err.expected, Expected::FacetName, "for {}", input);
        }
    }

    #[test]
    fn test_nested_clause() {
        let mut grammar = Grammar::new("nested:[aaa(a:(bb) abc:(def fff)), b.c(x:1)]", 8);
        let specs = grammar.parse_nested_clause().unwrap();
        let clauses: Vec<FilterClause> = specs.iter().map(NestedSpec::to_clause).collect();
        assert_eq!(
            clauses,
            vec![
                FilterClause::nested("aaa", "a:(bb) abc:(def fff)"),
                FilterClause::nested("b.c", "x:1"),
            ]
        );
    }

    #[test]
    fn test_nested_requires_filter() {
        let err = Grammar::new("nested:[aaa]", 8)
            .parse_nested_clause()
            .unwrap_err();
        assert_eq!(err, ParseError::new(11, Expected::OpenParen));
    }

    #[test]
    fn test_peek_clause() {
        assert_eq!(
            Grammar::new("facets: [a]", 8).peek_clause(),
            Some(ClauseKind::Facets)
        );
        assert_eq!(
            Grammar::new("nested:[a(b)]", 8).peek_clause(),
            Some(ClauseKind::Nested)
        );
        assert_eq!(Grammar::new("facets:x", 8).peek_clause(), None);
        assert_eq!(Grammar::new("Facets:[x]", 8).peek_clause(), None);
    }

    #[test]
    fn test_bracket_counts_toward_depth() {
        assert!(facets("facets:[a(b:1)]").is_ok());
        let mut grammar = Grammar::new("facets:[a(b:1)]", 1);
        let err = grammar.parse_facets_clause().unwrap_err();
        assert_eq!(err, ParseError::new(9, Expected::ShallowerNesting));
    }
}
