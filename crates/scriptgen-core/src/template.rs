//! Script body templates.
//!
//! Each generated script wraps one integration command: it executes the
//! command with the caller's arguments and republishes the result. The
//! command name is the only substitution point, spliced into the quoted
//! `executeCommand` invocation.

use crate::error::ScriptGenError;
use std::fmt;
use std::str::FromStr;

/// Substitution point for the original (separator-joined) command name.
pub const COMMAND_PLACEHOLDER: &str = "{command}";

/// Default body: executes the command and reformats list results as a
/// table entry, falling back to the raw result on error.
const TABLE_FORMATTING_BODY: &str = r#"
resp = demisto.executeCommand("{command}", demisto.args())

if isError(resp[0]):
    demisto.results(resp)
else:
    data = demisto.get(resp[0], "Contents")
    if data:
        data = data if isinstance(data, list) else [data]
        data = [{k: formatCell(row[k]) for k in row} for row in data]
        demisto.results({"ContentsFormat": formats["table"], "Type": entryTypes["note"], "Contents": data} )
    else:
        demisto.results("No results.")
"#;

/// Minimal body: republishes the command result without reshaping it.
const NO_PARSE_BODY: &str = r#"
demisto.results(demisto.executeCommand("{command}", demisto.args()))
"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScriptTemplate {
    #[default]
    TableFormatting,
    NoParse,
}

impl ScriptTemplate {
    pub fn as_str(self) -> &'static str {
        match self {
            ScriptTemplate::TableFormatting => "table-formatting",
            ScriptTemplate::NoParse => "no-parse",
        }
    }

    fn body(self) -> &'static str {
        match self {
            ScriptTemplate::TableFormatting => TABLE_FORMATTING_BODY,
            ScriptTemplate::NoParse => NO_PARSE_BODY,
        }
    }

    /// Substitute the command name into the template body.
    pub fn render(self, command_name: &str) -> String {
        self.body().replace(COMMAND_PLACEHOLDER, command_name)
    }
}

impl fmt::Display for ScriptTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScriptTemplate {
    type Err = ScriptGenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "table-formatting" | "table" => Ok(ScriptTemplate::TableFormatting),
            "no-parse" => Ok(ScriptTemplate::NoParse),
            _ => Err(ScriptGenError::UnknownTemplate(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_template_embeds_command_name() {
        let body = ScriptTemplate::TableFormatting.render("get-incident-info");
        assert!(body.contains("demisto.executeCommand(\"get-incident-info\", demisto.args())"));
        assert!(!body.contains(COMMAND_PLACEHOLDER));
    }

    #[test]
    fn no_parse_template_embeds_command_name() {
        let body = ScriptTemplate::NoParse.render("list-hosts");
        assert_eq!(
            body,
            "\ndemisto.results(demisto.executeCommand(\"list-hosts\", demisto.args()))\n"
        );
    }

    #[test]
    fn table_template_keeps_formatting_branch() {
        let body = ScriptTemplate::TableFormatting.render("x");
        assert!(body.contains("formatCell"));
        assert!(body.contains("\"ContentsFormat\": formats[\"table\"]"));
        assert!(body.contains("No results."));
    }

    #[test]
    fn bodies_start_and_end_with_newline() {
        for template in [ScriptTemplate::TableFormatting, ScriptTemplate::NoParse] {
            let body = template.render("x");
            assert!(body.starts_with('\n'));
            assert!(body.ends_with('\n'));
        }
    }

    #[test]
    fn parse_roundtrip() {
        for template in [ScriptTemplate::TableFormatting, ScriptTemplate::NoParse] {
            assert_eq!(template.as_str().parse::<ScriptTemplate>().unwrap(), template);
        }
        assert_eq!("table".parse::<ScriptTemplate>().unwrap(), ScriptTemplate::TableFormatting);
        assert!("markdown".parse::<ScriptTemplate>().is_err());
    }
}
