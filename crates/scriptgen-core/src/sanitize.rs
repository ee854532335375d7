//! Recursive removal of characters the target schema cannot carry inside
//! scalar fields: tab, newline, carriage return, and backslash.

use crate::yaml::Node;

const FORBIDDEN: [char; 4] = ['\t', '\n', '\r', '\\'];

/// Delete forbidden characters from a single string.
pub fn sanitize_str(s: &str) -> String {
    s.chars().filter(|c| !FORBIDDEN.contains(c)).collect()
}

/// Delete forbidden characters from every string value in a node tree.
///
/// Mapping values are sanitized with keys left unchanged; sequences keep
/// their order; non-string scalars pass through untouched. Recursion depth
/// follows the input shape and is not bounded.
pub fn sanitize(node: Node) -> Node {
    match node {
        Node::Str(s, style) => Node::Str(sanitize_str(&s), style),
        Node::Seq(items) => Node::Seq(items.into_iter().map(sanitize).collect()),
        Node::Map(entries) => Node::Map(
            entries
                .into_iter()
                .map(|(key, value)| (key, sanitize(value)))
                .collect(),
        ),
        other => other,
    }
}
