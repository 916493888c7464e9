//! Escaping rules applied to raw text before it is embedded in a query string.
//!
//! The backend's free-text query language gives the characters in
//! [`RESERVED_CHARS`] special meaning. Each occurrence is prefixed with a single
//! backslash. Escaping is single-pass: escaping an already escaped string
//! escapes the backslashes again.

/// Characters (and two-character operators) reserved by the backend query
/// language, in the order they are matched.
pub const RESERVED_CHARS: &[&str] = &[
    "\\", "+", "-", "&&", "||", "!", "(", ")", "{", "}", "[", "]", "^", "\"", "~", "*", "?",
    "/", ":",
];

const ESCAPE: char = '\\';

/// Escapes every reserved character. Used for comparison values.
///
/// # Example
///
/// ```
/// use plastic_parser_rs::escape::escape_value;
///
/// assert_eq!(escape_value("dev:ops"), "dev\\:ops");
/// assert_eq!(escape_value("a&&b"), "a\\&&b");
/// ```
pub fn escape_value(value: &str) -> String {
    escape_except(value, &[])
}

/// Escapes every reserved character except the parentheses, so grouping in
/// free text survives.
pub fn escape_free_text(value: &str) -> String {
    escape_except(value, &["(", ")"])
}

/// Escapes every reserved character except `"`. Used for comparison values
/// inside facet and nested filters, where the backend parses phrases itself.
pub fn escape_facet_value(value: &str) -> String {
    escape_except(value, &["\""])
}

fn escape_except(value: &str, kept: &[&str]) -> String {
    let mut escaped = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(c) = rest.chars().next() {
        let reserved = RESERVED_CHARS
            .iter()
            .filter(|r| !kept.contains(r))
            .find(|r| rest.starts_with(**r));

        match reserved {
            Some(r) => {
                escaped.push(ESCAPE);
                escaped.push_str(r);
                rest = &rest[r.len()..];
            }
            None => {
                escaped.push(c);
                rest = &rest[c.len_utf8()..];
            }
        }
    }

    escaped
}
