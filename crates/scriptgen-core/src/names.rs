//! Command-name derivation.
//!
//! Integration commands are named as lowercase word-segments joined by a
//! separator (`get-incident-info`). The generated script takes the
//! PascalCase form (`GetIncidentInfo`) as both its id and its name, while
//! the original separator-joined name survives in `dependson.must` and in
//! the rendered script body.

/// Separator between word-segments in a command name.
/// Depends on the server's command-naming convention.
pub const NAME_SEPARATOR: char = '-';

/// Derive the PascalCase script name from a separator-joined command name.
///
/// Empty segments (leading, trailing, or doubled separators) contribute
/// nothing.
pub fn derive_name(command_name: &str) -> String {
    command_name
        .split(NAME_SEPARATOR)
        .map(capitalize_first)
        .collect()
}

fn capitalize_first(segment: &str) -> String {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
