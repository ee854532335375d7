//! Order-preserving YAML document tree and emitter.
//!
//! Generated scripts must render with a fixed key order, literal block
//! scalars for script bodies, forced double-quoting on selected fields,
//! 2-space indentation, and CRLF line endings. A generic writer decides
//! those per its own defaults, so output goes through this emitter: the
//! record is assembled as a [`Node`] tree carrying a per-string style
//! hint, then rendered in one pass.

use crate::error::{Result, ScriptGenError};

pub const INDENT: &str = "  ";
pub const LINE_BREAK: &str = "\r\n";

// ---------------------------------------------------------------------------
// Node / StrStyle
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String, StrStyle),
    Seq(Vec<Node>),
    /// Mapping with insertion order preserved.
    Map(Vec<(String, Node)>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrStyle {
    /// Bare when unambiguous, double-quoted otherwise.
    Plain,
    /// Always double-quoted.
    Quoted,
    /// Literal block (`|`), line breaks preserved verbatim.
    Literal,
}

impl Node {
    pub fn str(value: impl Into<String>) -> Node {
        Node::Str(value.into(), StrStyle::Plain)
    }

    pub fn quoted(value: impl Into<String>) -> Node {
        Node::Str(value.into(), StrStyle::Quoted)
    }

    pub fn literal(value: impl Into<String>) -> Node {
        Node::Str(value.into(), StrStyle::Literal)
    }

    /// Convert a parsed YAML value into a node tree.
    ///
    /// Scalar mapping keys are stringified; a sequence or mapping used as
    /// a key has no stable text form and is rejected.
    pub fn from_yaml(value: &serde_yaml::Value) -> Result<Node> {
        use serde_yaml::Value;
        Ok(match value {
            Value::Null => Node::Null,
            Value::Bool(b) => Node::Bool(*b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Node::Int(i),
                None => Node::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Value::String(s) => Node::str(s.clone()),
            Value::Sequence(items) => {
                Node::Seq(items.iter().map(Node::from_yaml).collect::<Result<_>>()?)
            }
            Value::Mapping(entries) => {
                let mut map = Vec::with_capacity(entries.len());
                for (key, val) in entries {
                    map.push((key_text(key)?, Node::from_yaml(val)?));
                }
                Node::Map(map)
            }
            Value::Tagged(tagged) => Node::from_yaml(&tagged.value)?,
        })
    }
}

fn key_text(key: &serde_yaml::Value) -> Result<String> {
    use serde_yaml::Value;
    match key {
        Value::String(s) => Ok(s.clone()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Null => Ok("null".to_string()),
        other => Err(ScriptGenError::UnsupportedKey(format!("{other:?}"))),
    }
}

// ---------------------------------------------------------------------------
// Emitter
// ---------------------------------------------------------------------------

/// Render a node tree as a YAML document with CRLF line endings.
pub fn to_document(root: &Node) -> Result<String> {
    let mut lines = Vec::new();
    match root {
        Node::Map(entries) if !entries.is_empty() => emit_map(entries, 0, &mut lines),
        Node::Seq(items) if !items.is_empty() => emit_seq(items, 0, &mut lines),
        Node::Str(value, StrStyle::Literal) if !value.is_empty() => {
            lines.push(chomp_header(value).to_string());
            push_literal_body(value, 1, &mut lines);
        }
        other => lines.push(render_scalar(other)),
    }
    let mut doc = String::new();
    for line in &lines {
        doc.push_str(line);
        doc.push_str(LINE_BREAK);
    }
    Ok(doc)
}

fn pad(indent: usize) -> String {
    INDENT.repeat(indent)
}

fn emit_map(entries: &[(String, Node)], indent: usize, lines: &mut Vec<String>) {
    for (key, value) in entries {
        let key = plain_or_quoted(key);
        match value {
            Node::Str(v, StrStyle::Literal) if !v.is_empty() => {
                lines.push(format!("{}{key}: {}", pad(indent), chomp_header(v)));
                push_literal_body(v, indent + 1, lines);
            }
            Node::Seq(items) if items.is_empty() => {
                lines.push(format!("{}{key}: []", pad(indent)));
            }
            Node::Map(inner) if inner.is_empty() => {
                lines.push(format!("{}{key}: {{}}", pad(indent)));
            }
            Node::Seq(items) => {
                lines.push(format!("{}{key}:", pad(indent)));
                emit_seq(items, indent + 1, lines);
            }
            Node::Map(inner) => {
                lines.push(format!("{}{key}:", pad(indent)));
                emit_map(inner, indent + 1, lines);
            }
            scalar => lines.push(format!("{}{key}: {}", pad(indent), render_scalar(scalar))),
        }
    }
}

fn emit_seq(items: &[Node], indent: usize, lines: &mut Vec<String>) {
    for item in items {
        match item {
            Node::Str(v, StrStyle::Literal) if !v.is_empty() => {
                lines.push(format!("{}- {}", pad(indent), chomp_header(v)));
                push_literal_body(v, indent + 1, lines);
            }
            Node::Seq(inner) if inner.is_empty() => {
                lines.push(format!("{}- []", pad(indent)));
            }
            Node::Map(inner) if inner.is_empty() => {
                lines.push(format!("{}- {{}}", pad(indent)));
            }
            Node::Seq(inner) => {
                let first = lines.len();
                emit_seq(inner, indent + 1, lines);
                inline_dash(lines, first, indent);
            }
            Node::Map(inner) => {
                let first = lines.len();
                emit_map(inner, indent + 1, lines);
                inline_dash(lines, first, indent);
            }
            scalar => lines.push(format!("{}- {}", pad(indent), render_scalar(scalar))),
        }
    }
}

/// Fold the first line of a just-emitted nested block onto its `- ` entry
/// marker, so sequence items read `- key: value` rather than a bare dash.
fn inline_dash(lines: &mut Vec<String>, first: usize, indent: usize) {
    let child_pad = INDENT.len() * (indent + 1);
    let rest = lines[first][child_pad..].to_string();
    lines[first] = format!("{}- {rest}", pad(indent));
}

// ---------------------------------------------------------------------------
// Scalars
// ---------------------------------------------------------------------------

fn render_scalar(node: &Node) -> String {
    match node {
        Node::Null => "null".to_string(),
        Node::Bool(b) => b.to_string(),
        Node::Int(i) => i.to_string(),
        Node::Float(f) => render_float(*f),
        Node::Str(s, StrStyle::Quoted) => quote(s),
        Node::Str(s, _) => plain_or_quoted(s),
        Node::Seq(_) => "[]".to_string(),
        Node::Map(_) => "{}".to_string(),
    }
}

fn render_float(f: f64) -> String {
    if f.is_nan() {
        ".nan".to_string()
    } else if f.is_infinite() {
        if f > 0.0 { ".inf" } else { "-.inf" }.to_string()
    } else if f.fract() == 0.0 {
        format!("{f:.1}")
    } else {
        format!("{f}")
    }
}

fn plain_or_quoted(s: &str) -> String {
    if needs_quoting(s) {
        quote(s)
    } else {
        s.to_string()
    }
}

/// Whether the plain form of `s` would be misread by a YAML parser.
fn needs_quoting(s: &str) -> bool {
    let Some(first) = s.chars().next() else {
        return true;
    };
    let last = s.chars().last().unwrap_or(first);
    if first.is_whitespace() || last.is_whitespace() {
        return true;
    }
    if "-?:,[]{}#&*!|>'\"%@`~".contains(first) {
        return true;
    }
    if s.contains(": ") || s.ends_with(':') || s.contains(" #") {
        return true;
    }
    if s.chars().any(char::is_control) {
        return true;
    }
    if matches!(
        s.to_ascii_lowercase().as_str(),
        "true" | "false" | "null" | "yes" | "no" | "on" | "off"
    ) {
        return true;
    }
    // Catches ints, floats, and exponent forms that would scan as numbers.
    s.parse::<f64>().is_ok()
}

fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c if (c as u32) < 0x20 => {
                out.push_str(&format!("\\x{:02X}", c as u32));
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

// ---------------------------------------------------------------------------
// Literal blocks
// ---------------------------------------------------------------------------

fn chomp_header(value: &str) -> &'static str {
    if !value.ends_with('\n') {
        "|-"
    } else if value.ends_with("\n\n") {
        "|+"
    } else {
        "|"
    }
}

fn push_literal_body(value: &str, indent: usize, lines: &mut Vec<String>) {
    let mut parts: Vec<&str> = value.split('\n').collect();
    if value.ends_with('\n') {
        parts.pop();
    }
    for part in parts {
        if part.is_empty() {
            lines.push(String::new());
        } else {
            lines.push(format!("{}{part}", pad(indent)));
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
