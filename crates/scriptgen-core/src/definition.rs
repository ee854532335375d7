//! Input model for an integration definition file.
//!
//! Only the fields the generator consumes are modeled; everything else in
//! the definition (display name, category, configuration, ...) is ignored
//! on deserialization. A missing required key fails the load outright —
//! there is no default substitution.

use crate::error::Result;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct IntegrationDefinition {
    pub commonfields: CommonFields,
    pub script: ScriptSection,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommonFields {
    pub id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScriptSection {
    pub commands: Vec<CommandSpec>,
}

/// One named capability declared by the integration. `arguments` is
/// opaque to the generator and carried through as-is (sanitized only).
#[derive(Debug, Clone, Deserialize)]
pub struct CommandSpec {
    pub name: String,
    pub arguments: serde_yaml::Value,
    pub description: String,
}

impl IntegrationDefinition {
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        let definition: IntegrationDefinition = serde_yaml::from_str(&data)?;
        Ok(definition)
    }
}
