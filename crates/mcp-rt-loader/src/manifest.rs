//! The declarative shape of a component manifest file (§4.10). One
//! `serde_yml::from_str` call per file is the "isolated namespace" — no
//! state is shared between manifests.

use serde::Deserialize;

use mcp_rt_protocol::prompts::PromptArgument;
use mcp_rt_protocol::tools::ToolParameter;

#[derive(Debug, Deserialize)]
pub struct ToolManifest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub parameters: Vec<ToolParameter>,
    pub handler: String,
}

#[derive(Debug, Deserialize)]
pub struct ResourceManifest {
    pub uri: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, rename = "mimeType")]
    pub mime_type: Option<String>,
    pub handler: String,
}

#[derive(Debug, Deserialize)]
pub struct PromptManifest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub arguments: Vec<PromptArgument>,
    pub handler: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tool_manifest_parses_minimal_yaml() {
        let yaml = "name: double\nhandler: double_handler\nparameters:\n  - name: value\n    type: number\n    required: true\n";
        let manifest: ToolManifest = serde_yml::from_str(yaml).unwrap();
        assert_eq!(manifest.name, "double");
        assert_eq!(manifest.handler, "double_handler");
        assert_eq!(manifest.parameters.len(), 1);
        assert!(manifest.parameters[0].is_required());
    }

    #[test]
    fn resource_manifest_defaults_optional_fields() {
        let yaml = "uri: file:///notes.txt\nhandler: notes_handler\n";
        let manifest: ResourceManifest = serde_yml::from_str(yaml).unwrap();
        assert_eq!(manifest.uri, "file:///notes.txt");
        assert!(manifest.name.is_none());
        assert!(manifest.mime_type.is_none());
    }

    #[test]
    fn prompt_manifest_parses_arguments() {
        let yaml = "name: greeting\nhandler: greeting_handler\narguments:\n  - name: name\n    required: true\n";
        let manifest: PromptManifest = serde_yml::from_str(yaml).unwrap();
        assert_eq!(manifest.arguments.len(), 1);
        assert!(manifest.arguments[0].is_required());
    }
}
