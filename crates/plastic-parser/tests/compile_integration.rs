//! Integration tests for the public compile API.
//!
//! These exercise the crate the way a search client would: compile a query,
//! turn it into JSON and inspect the request body.

use plastic_parser_rs::document::{DefaultOperator, FACET_SIZE};
use plastic_parser_rs::{compile, Compiler, CompilerOptions, Expected, FilterClause};
use serde_json::json;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn test_overview_query() {
    init_logging();

    let doc = compile("type:article (title:hello OR body:\"world\") facets:[author(country:US)]")
        .unwrap();

    assert_eq!(
        doc.to_value().unwrap(),
        json!({
            "query": {
                "filtered": {
                    "filter": {"bool": {
                        "must": [{"type": {"value": "article"}}],
                        "should": [],
                        "must_not": []
                    }},
                    "query": {"query_string": {
                        "query": "(title:hello OR body:\"world\")",
                        "default_operator": "and"
                    }}
                }
            },
            "facets": {
                "author": {
                    "terms": {"field": "author_nonngram", "size": 20},
                    "facet_filter": {"query": {"query_string": {
                        "query": "country:US",
                        "default_operator": "and"
                    }}}
                }
            }
        })
    );
}

#[test]
fn test_multiline_query() {
    init_logging();

    let query = "
        type:event
        (city:paris OR city:london)
        date:>=2024-01-01
        facets:[venue.city, organizer]
    ";
    let doc = compile(query).unwrap();

    assert_eq!(doc.must(), &[FilterClause::type_filter("event")]);
    let facets = doc.facets.as_ref().unwrap();
    assert_eq!(facets.len(), 2);
    assert_eq!(facets["venue.city"].nested.as_deref(), Some("venue"));
    assert_eq!(facets["organizer"].terms.size, FACET_SIZE);

    let query_string = &doc.query.filtered.query.as_ref().unwrap().query_string;
    assert_eq!(query_string.default_operator, DefaultOperator::And);
    assert_eq!(
        query_string.query,
        "(city:paris OR city:london) date:>=2024\\-01\\-01"
    );
}

#[test]
fn test_request_body_is_stable_text() {
    let doc = compile("a:1 facets:[b]").unwrap();
    let body = serde_json::to_string(&doc).unwrap();
    assert_eq!(
        body,
        concat!(
            r#"{"query":{"filtered":{"filter":{"bool":{"must":[],"should":[],"must_not":[]}},"#,
            r#""query":{"query_string":{"query":"a:1","default_operator":"and"}}}},"#,
            r#""facets":{"b":{"terms":{"field":"b_nonngram","size":20}}}}"#
        )
    );
}

#[test]
fn test_invalid_queries_fail_without_document() {
    for query in ["type:", "(a:1", "a:1)", "title:\"open", "facets:[]", "nested:[a]"] {
        assert!(compile(query).is_err(), "expected failure for {:?}", query);
    }
}

#[test]
fn test_custom_depth_limit() {
    let compiler = Compiler::new(CompilerOptions { max_depth: 2 });
    assert!(compiler.compile("facets:[a(b:(c))]").is_err());
    assert!(compiler.compile("facets:[a(b:c)]").is_ok());

    let err = compiler.compile("(((x)))").unwrap_err();
    assert_eq!(err.expected, Expected::ShallowerNesting);
    assert_eq!(err.offset, 2);
}

#[test]
fn test_shared_compiler_across_threads() {
    let compiler = Compiler::default();
    std::thread::scope(|scope| {
        for i in 0..4 {
            scope.spawn(move || {
                let doc = compiler.compile(&format!("n:{}", i)).unwrap();
                assert_eq!(doc.free_text(), Some(format!("n:{}", i).as_str()));
            });
        }
    });
}
