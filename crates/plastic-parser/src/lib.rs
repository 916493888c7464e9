//! Compiler for a compact search-query syntax.
//!
//! Queries such as
//!
//! ```text
//! type:article (title:hello OR body:"world") facets:[author(country:US)]
//! ```
//!
//! compile into the filtered-query document a search backend expects: boolean
//! filter clauses, a free-text `query_string`, and optional facet requests.
//!
//! # Syntax
//!
//! ## Compare-expressions
//! - `key:value`, `key:>value`, `key:<value`, `key:>=value`, `key:<=value`, `key:=value`
//! - `key:"quoted phrase"`
//! - `key:(grouped OR values)`
//!
//! ## Free text
//! - Bare words and `"quoted phrases"`, escaped for the backend
//!
//! ## Logical composition
//! - `AND`, `OR` (any case) - rendered uppercase
//! - Adjacent terms without a connector are left to the backend's
//!   `default_operator`, which is always `and`
//! - `()` - Grouping
//!
//! ## Clauses
//! - `type:<value>` - must come first; becomes a `type` filter
//! - `facets:[name, nested.name(filter), ...]` - facet requests
//! - `nested:[path(filter), ...]` - nested `must` filters
//!
//! # Example
//!
//! ```
//! use plastic_parser_rs::compile;
//! use serde_json::json;
//!
//! let doc = compile("type:article a:1 b:2 facets:[geo.country(city:paris)]").unwrap();
//! assert_eq!(
//!     doc.to_value().unwrap(),
//!     json!({
//!         "query": {
//!             "filtered": {
//!                 "filter": {"bool": {
//!                     "must": [{"type": {"value": "article"}}],
//!                     "should": [],
//!                     "must_not": []
//!                 }},
//!                 "query": {"query_string": {"query": "a:1 b:2", "default_operator": "and"}}
//!             }
//!         },
//!         "facets": {
//!             "geo.country": {
//!                 "nested": "geo",
//!                 "terms": {"field": "country_nonngram", "size": 20},
//!                 "facet_filter": {"query": {"query_string": {
//!                     "query": "city:paris",
//!                     "default_operator": "and"
//!                 }}}
//!             }
//!         }
//!     })
//! );
//! ```

mod compiler;
pub mod document;
mod error;
pub mod escape;
pub mod grammar;
pub mod lexer;

pub use compiler::{compile, Compiler, CompilerOptions, DEFAULT_MAX_DEPTH};
pub use document::{FilterClause, QueryDocument};
pub use error::{Expected, ParseError, ParseResult};
