//! Generation pipeline: one automation script per integration command.
//!
//! For each command, in definition order: assemble the output record,
//! sanitize the whole record, splice in the rendered script body, emit
//! YAML, write `script-<DerivedName>.yml`. Commands are processed
//! sequentially and independently; a failure aborts the run and leaves
//! already-written files in place.

use crate::definition::{CommandSpec, IntegrationDefinition};
use crate::error::Result;
use crate::io;
use crate::names::derive_name;
use crate::sanitize::{sanitize, sanitize_str};
use crate::template::ScriptTemplate;
use crate::yaml::{self, Node};
use std::path::PathBuf;

pub const SCRIPT_FILE_PREFIX: &str = "script-";
pub const SCRIPT_FILE_EXT: &str = ".yml";

/// Key under which the rendered script body lives in the output record.
const SCRIPT_KEY: &str = "script";

// ---------------------------------------------------------------------------
// Generator
// ---------------------------------------------------------------------------

pub struct Generator {
    out_dir: PathBuf,
    template: ScriptTemplate,
}

impl Generator {
    /// A generator writing into `out_dir` with the default
    /// table-formatting template. The directory must already exist.
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
            template: ScriptTemplate::default(),
        }
    }

    pub fn with_template(mut self, template: ScriptTemplate) -> Self {
        self.template = template;
        self
    }

    /// Destination path for a script, named by its derived name. A later
    /// command deriving the same name overwrites the earlier file.
    pub fn script_path(&self, derived_name: &str) -> PathBuf {
        self.out_dir
            .join(format!("{SCRIPT_FILE_PREFIX}{derived_name}{SCRIPT_FILE_EXT}"))
    }

    /// Generate and write one script file per command, in input order.
    /// Returns the written paths.
    pub fn generate(&self, definition: &IntegrationDefinition) -> Result<Vec<PathBuf>> {
        let mut written = Vec::with_capacity(definition.script.commands.len());
        for command in &definition.script.commands {
            written.push(self.generate_one(definition, command)?);
        }
        Ok(written)
    }

    fn generate_one(
        &self,
        definition: &IntegrationDefinition,
        command: &CommandSpec,
    ) -> Result<PathBuf> {
        let record = self.build_script(definition, command)?;
        let path = self.script_path(&sanitize_str(&derive_name(&command.name)));
        io::atomic_write(&path, yaml::to_document(&record)?.as_bytes())?;
        Ok(path)
    }

    /// Assemble the output record for one command.
    ///
    /// The record is sanitized as a whole after assembly, constants
    /// included. The script body is spliced in afterwards, rendered from
    /// the unsanitized command name, so its line breaks survive.
    fn build_script(
        &self,
        definition: &IntegrationDefinition,
        command: &CommandSpec,
    ) -> Result<Node> {
        let derived = derive_name(&command.name);

        let record = Node::Map(vec![
            (
                "commonfields".into(),
                Node::Map(vec![
                    ("id".into(), Node::str(&derived)),
                    ("version".into(), Node::Int(-1)),
                ]),
            ),
            ("name".into(), Node::str(&derived)),
            (SCRIPT_KEY.into(), Node::literal("")),
            ("type".into(), Node::str("python")),
            (
                "tags".into(),
                Node::Seq(vec![Node::str(&definition.commonfields.id)]),
            ),
            ("comment".into(), Node::str(&command.description)),
            ("system".into(), Node::Bool(false)),
            ("args".into(), Node::from_yaml(&command.arguments)?),
            ("scripttarget".into(), Node::Int(0)),
            ("timeout".into(), Node::quoted("0s")),
            (
                "dependson".into(),
                Node::Map(vec![(
                    "must".into(),
                    Node::Seq(vec![Node::str(&command.name)]),
                )]),
            ),
        ]);

        let mut record = sanitize(record);
        let body = self.template.render(&command.name);
        if let Node::Map(entries) = &mut record {
            for (key, value) in entries.iter_mut() {
                if key == SCRIPT_KEY {
                    *value = Node::literal(body);
                    break;
                }
            }
        }
        Ok(record)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn definition(yaml: &str) -> IntegrationDefinition {
        serde_yaml::from_str(yaml).unwrap()
    }

    const ONE_COMMAND: &str = r#"
commonfields:
  id: CoolVendor
script:
  commands:
    - name: get-incident-info
      arguments:
        - name: id
          required: true
      description: Fetch details for one incident
"#;

    #[test]
    fn writes_file_named_after_derived_name() {
        let dir = TempDir::new().unwrap();
        let written = Generator::new(dir.path())
            .generate(&definition(ONE_COMMAND))
            .unwrap();
        assert_eq!(written.len(), 1);
        assert_eq!(
            written[0],
            dir.path().join("script-GetIncidentInfo.yml")
        );
        assert!(written[0].exists());
    }

    #[test]
    fn record_fields_match_fixed_shape() {
        let dir = TempDir::new().unwrap();
        let written = Generator::new(dir.path())
            .generate(&definition(ONE_COMMAND))
            .unwrap();
        let doc = std::fs::read_to_string(&written[0]).unwrap();
        let value: serde_yaml::Value = serde_yaml::from_str(&doc).unwrap();

        assert_eq!(value["commonfields"]["id"].as_str().unwrap(), "GetIncidentInfo");
        assert_eq!(value["commonfields"]["version"].as_i64().unwrap(), -1);
        assert_eq!(value["name"].as_str().unwrap(), "GetIncidentInfo");
        assert_eq!(value["type"].as_str().unwrap(), "python");
        assert_eq!(value["tags"][0].as_str().unwrap(), "CoolVendor");
        assert_eq!(
            value["comment"].as_str().unwrap(),
            "Fetch details for one incident"
        );
        assert!(!value["system"].as_bool().unwrap());
        assert_eq!(value["args"][0]["name"].as_str().unwrap(), "id");
        assert!(value["args"][0]["required"].as_bool().unwrap());
        assert_eq!(value["scripttarget"].as_i64().unwrap(), 0);
        assert_eq!(value["timeout"].as_str().unwrap(), "0s");
        assert_eq!(
            value["dependson"]["must"][0].as_str().unwrap(),
            "get-incident-info"
        );
    }

    #[test]
    fn script_body_invokes_original_command_name() {
        let dir = TempDir::new().unwrap();
        let written = Generator::new(dir.path())
            .generate(&definition(ONE_COMMAND))
            .unwrap();
        let doc = std::fs::read_to_string(&written[0]).unwrap();
        let value: serde_yaml::Value = serde_yaml::from_str(&doc).unwrap();
        let script = value["script"].as_str().unwrap();
        assert!(script.contains("demisto.executeCommand(\"get-incident-info\", demisto.args())"));
        assert!(script.contains('\n'), "script must keep its line breaks");
    }

    #[test]
    fn key_order_is_fixed() {
        let dir = TempDir::new().unwrap();
        let written = Generator::new(dir.path())
            .generate(&definition(ONE_COMMAND))
            .unwrap();
        let doc = std::fs::read_to_string(&written[0]).unwrap();
        let value: serde_yaml::Value = serde_yaml::from_str(&doc).unwrap();
        let keys: Vec<&str> = value
            .as_mapping()
            .unwrap()
            .keys()
            .map(|k| k.as_str().unwrap())
            .collect();
        assert_eq!(
            keys,
            [
                "commonfields",
                "name",
                "script",
                "type",
                "tags",
                "comment",
                "system",
                "args",
                "scripttarget",
                "timeout",
                "dependson",
            ]
        );
    }

    #[test]
    fn description_control_characters_stripped() {
        let dir = TempDir::new().unwrap();
        let yaml = "commonfields:\n  id: V\nscript:\n  commands:\n    - name: ping\n      arguments: []\n      description: \"tabbed\\there\\nand wrapped\"\n";
        let written = Generator::new(dir.path())
            .generate(&definition(yaml))
            .unwrap();
        let doc = std::fs::read_to_string(&written[0]).unwrap();
        let value: serde_yaml::Value = serde_yaml::from_str(&doc).unwrap();
        assert_eq!(value["comment"].as_str().unwrap(), "tabbedhereand wrapped");
    }

    #[test]
    fn arguments_sanitized_recursively() {
        let dir = TempDir::new().unwrap();
        let yaml = "commonfields:\n  id: V\nscript:\n  commands:\n    - name: ping\n      arguments:\n        - name: target\n          description: \"host\\tname\"\n          nested:\n            deep: \"with\\\\slash\"\n      description: d\n";
        let written = Generator::new(dir.path())
            .generate(&definition(yaml))
            .unwrap();
        let doc = std::fs::read_to_string(&written[0]).unwrap();
        let value: serde_yaml::Value = serde_yaml::from_str(&doc).unwrap();
        assert_eq!(value["args"][0]["description"].as_str().unwrap(), "hostname");
        assert_eq!(
            value["args"][0]["nested"]["deep"].as_str().unwrap(),
            "withslash"
        );
    }

    #[test]
    fn later_duplicate_derived_name_wins() {
        let dir = TempDir::new().unwrap();
        // Both names derive to GetInfo; empty segments contribute nothing.
        let yaml = r#"
commonfields:
  id: V
script:
  commands:
    - name: get-info
      arguments: []
      description: first
    - name: get-info-
      arguments: []
      description: second
"#;
        let written = Generator::new(dir.path())
            .generate(&definition(yaml))
            .unwrap();
        assert_eq!(written[0], written[1]);
        let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
        let doc = std::fs::read_to_string(&written[1]).unwrap();
        let value: serde_yaml::Value = serde_yaml::from_str(&doc).unwrap();
        assert_eq!(value["comment"].as_str().unwrap(), "second");
        assert_eq!(value["dependson"]["must"][0].as_str().unwrap(), "get-info-");
    }

    #[test]
    fn empty_command_list_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let written = Generator::new(dir.path())
            .generate(&definition(
                "commonfields:\n  id: V\nscript:\n  commands: []\n",
            ))
            .unwrap();
        assert!(written.is_empty());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn regeneration_is_byte_identical() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        let def = definition(ONE_COMMAND);
        let a = Generator::new(first.path()).generate(&def).unwrap();
        let b = Generator::new(second.path()).generate(&def).unwrap();
        assert_eq!(
            std::fs::read(&a[0]).unwrap(),
            std::fs::read(&b[0]).unwrap()
        );
    }

    #[test]
    fn document_uses_crlf_throughout() {
        let dir = TempDir::new().unwrap();
        let written = Generator::new(dir.path())
            .generate(&definition(ONE_COMMAND))
            .unwrap();
        let doc = std::fs::read_to_string(&written[0]).unwrap();
        assert!(doc.ends_with("\r\n"));
        assert_eq!(doc.matches('\n').count(), doc.matches("\r\n").count());
    }

    #[test]
    fn no_parse_template_selectable() {
        let dir = TempDir::new().unwrap();
        let written = Generator::new(dir.path())
            .with_template(ScriptTemplate::NoParse)
            .generate(&definition(ONE_COMMAND))
            .unwrap();
        let doc = std::fs::read_to_string(&written[0]).unwrap();
        let value: serde_yaml::Value = serde_yaml::from_str(&doc).unwrap();
        let script = value["script"].as_str().unwrap();
        assert!(script.contains("demisto.results(demisto.executeCommand(\"get-incident-info\""));
        assert!(!script.contains("formatCell"));
    }
}
