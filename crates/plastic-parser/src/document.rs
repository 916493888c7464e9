//! The compiled query document.
//!
//! These types serialize to the backend's filtered-query request body:
//!
//! ```text
//! {
//!   "query": {
//!     "filtered": {
//!       "filter": { "bool": { "must": [...], "should": [], "must_not": [] } },
//!       "query": { "query_string": { "query": "...", "default_operator": "and" } }
//!     }
//!   },
//!   "facets": { ... }
//! }
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Aggregation bucket count requested for every facet.
pub const FACET_SIZE: u32 = 20;

/// Suffix appended to a facet's leaf field to select the non-ngram mapping.
pub const FACET_FIELD_SUFFIX: &str = "_nonngram";

/// Top-level compiled query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryDocument {
    /// The filtered query.
    pub query: QueryEnvelope,

    /// Facet descriptors keyed by facet name. Absent unless a facets clause
    /// was written.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facets: Option<BTreeMap<String, Facet>>,
}

impl QueryDocument {
    /// Returns the compiled free-text fragment, if any.
    pub fn free_text(&self) -> Option<&str> {
        self.query
            .filtered
            .query
            .as_ref()
            .map(|q| q.query_string.query.as_str())
    }

    /// Returns the `must` filter clauses.
    pub fn must(&self) -> &[FilterClause] {
        &self.query.filtered.filter.clauses.must
    }

    /// Converts the document into a JSON value for the search client.
    pub fn to_value(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }
}

/// The `query` key of the document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryEnvelope {
    /// The filtered query.
    pub filtered: Filtered,
}

/// Boolean filter clauses plus an optional free-text query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filtered {
    /// The filter half.
    pub filter: BoolFilter,

    /// The free-text half. Absent when the query had no free text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<QueryStringQuery>,
}

/// Wrapper producing the `{"bool": {...}}` shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoolFilter {
    /// The clause lists.
    #[serde(rename = "bool")]
    pub clauses: BoolClauses,
}

/// `must`, `should` and `must_not` clause lists.
///
/// The grammar only ever appends to `must`; the other two lists are kept for
/// the backend's schema.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoolClauses {
    #[serde(default)]
    pub must: Vec<FilterClause>,
    #[serde(default)]
    pub should: Vec<FilterClause>,
    #[serde(default)]
    pub must_not: Vec<FilterClause>,
}

/// A single boolean filter clause.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterClause {
    /// `{"term": {field: value}}`
    Term(BTreeMap<String, String>),
    /// `{"terms": {field: [values]}}`
    Terms(BTreeMap<String, Vec<String>>),
    /// `{"type": {"value": value}}`
    Type(TypeFilter),
    /// `{"nested": {"path": path, "query": {...}}}`
    Nested(NestedFilter),
}

impl FilterClause {
    /// Creates a single-value term clause.
    pub fn term(field: impl Into<String>, value: impl Into<String>) -> Self {
        FilterClause::Term(BTreeMap::from([(field.into(), value.into())]))
    }

    /// Creates a multi-value terms clause.
    pub fn terms<I, S>(field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values = values.into_iter().map(Into::into).collect();
        FilterClause::Terms(BTreeMap::from([(field.into(), values)]))
    }

    /// Creates a document type clause.
    pub fn type_filter(value: impl Into<String>) -> Self {
        FilterClause::Type(TypeFilter {
            value: value.into(),
        })
    }

    /// Creates a nested clause running `query` against documents under `path`.
    pub fn nested(path: impl Into<String>, query: impl Into<String>) -> Self {
        FilterClause::Nested(NestedFilter {
            path: path.into(),
            query: QueryStringQuery::new(query),
        })
    }
}

/// Restricts results to one document type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeFilter {
    pub value: String,
}

/// Runs a query against nested objects under `path`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NestedFilter {
    pub path: String,
    pub query: QueryStringQuery,
}

/// `{"query_string": {...}}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryStringQuery {
    pub query_string: QueryString,
}

impl QueryStringQuery {
    /// Wraps a rendered fragment, requesting conjunction for adjacent terms.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query_string: QueryString {
                query: query.into(),
                default_operator: DefaultOperator::And,
            },
        }
    }
}

/// A free-text query in the backend's query-string language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryString {
    pub query: String,
    pub default_operator: DefaultOperator,
}

/// How the backend combines adjacent terms that have no explicit connector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DefaultOperator {
    #[default]
    And,
    Or,
}

/// A terms aggregation, optionally scoped to a nested path and filtered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Facet {
    /// Nested object path the aggregation runs under.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nested: Option<String>,

    /// The aggregated field.
    pub terms: TermsAggregation,

    /// Restricts the documents the facet counts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facet_filter: Option<FacetFilter>,
}

/// `{"field": ..., "size": ...}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermsAggregation {
    pub field: String,
    pub size: u32,
}

impl TermsAggregation {
    /// Aggregates the non-ngram variant of `leaf`.
    pub fn for_leaf(leaf: &str) -> Self {
        Self {
            field: format!("{}{}", leaf, FACET_FIELD_SUFFIX),
            size: FACET_SIZE,
        }
    }
}

/// `{"query": {"query_string": {...}}}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetFilter {
    pub query: QueryStringQuery,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_document_is_minimal_skeleton() {
        let doc = QueryDocument::default();
        assert_eq!(
            doc.to_value().unwrap(),
            json!({
                "query": {
                    "filtered": {
                        "filter": {"bool": {"must": [], "should": [], "must_not": []}}
                    }
                }
            })
        );
        assert!(doc.free_text().is_none());
        assert!(doc.must().is_empty());
    }

    #[test]
    fn test_filter_clause_shapes() {
        assert_eq!(
            serde_json::to_value(FilterClause::type_filter("article")).unwrap(),
            json!({"type": {"value": "article"}})
        );
        assert_eq!(
            serde_json::to_value(FilterClause::term("author", "bob")).unwrap(),
            json!({"term": {"author": "bob"}})
        );
        assert_eq!(
            serde_json::to_value(FilterClause::terms("tag", ["a", "b"])).unwrap(),
            json!({"terms": {"tag": ["a", "b"]}})
        );
        assert_eq!(
            serde_json::to_value(FilterClause::nested("geo", "city:paris")).unwrap(),
            json!({"nested": {
                "path": "geo",
                "query": {"query_string": {"query": "city:paris", "default_operator": "and"}}
            }})
        );
    }

    #[test]
    fn test_filter_clause_deserialize() {
        let clause: FilterClause =
            serde_json::from_value(json!({"type": {"value": "post"}})).unwrap();
        assert_eq!(clause, FilterClause::type_filter("post"));

        let clause: FilterClause =
            serde_json::from_value(json!({"terms": {"tag": ["x"]}})).unwrap();
        assert_eq!(clause, FilterClause::terms("tag", ["x"]));
    }

    #[test]
    fn test_facet_skips_absent_parts() {
        let facet = Facet {
            nested: None,
            terms: TermsAggregation::for_leaf("country"),
            facet_filter: None,
        };
        assert_eq!(
            serde_json::to_value(&facet).unwrap(),
            json!({"terms": {"field": "country_nonngram", "size": 20}})
        );
    }

    #[test]
    fn test_deserialize_document_without_optional_keys() {
        let doc: QueryDocument = serde_json::from_value(json!({
            "query": {"filtered": {"filter": {"bool": {"must": []}}}}
        }))
        .unwrap();
        assert_eq!(doc, QueryDocument::default());
    }
}
