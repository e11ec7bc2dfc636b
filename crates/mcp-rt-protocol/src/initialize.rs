//! The `initialize` handshake (§4.6).

use crate::errors::McpError;
use crate::version::McpVersion;
use serde::{Deserialize, Serialize};

/// Describes the name and version of an MCP implementation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Implementation {
    pub name: String,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl Implementation {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            title: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

/// Capabilities a client may declare. Client-side features (roots,
/// sampling, elicitation) are out of scope for this core, so this record
/// carries only the one thing the core actually reads: `experimental`
/// pass-through (DESIGN.md decision #2).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientCapabilities {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experimental: Option<std::collections::HashMap<String, serde_json::Value>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptsCapabilities {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list_changed: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolsCapabilities {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list_changed: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourcesCapabilities {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subscribe: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list_changed: Option<bool>,
}

/// Capabilities a server declares — trimmed to `tools`/`resources`/
/// `prompts` only (DESIGN.md decision #2: `logging`/`completions`/
/// `elicitation` are not part of this core's method surface).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerCapabilities {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompts: Option<PromptsCapabilities>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resources: Option<ResourcesCapabilities>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<ToolsCapabilities>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experimental: Option<std::collections::HashMap<String, serde_json::Value>>,
}

/// `{protocolVersion, capabilities, clientInfo}` (§4.5).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeRequest {
    pub protocol_version: String,
    pub capabilities: ClientCapabilities,
    pub client_info: Implementation,
}

impl InitializeRequest {
    pub fn new(capabilities: ClientCapabilities, client_info: Implementation) -> Self {
        Self {
            protocol_version: McpVersion::CURRENT.as_str().to_string(),
            capabilities,
            client_info,
        }
    }

    /// Reject anything but the exact configured version (§4.6).
    pub fn protocol_version(&self) -> Result<McpVersion, McpError> {
        self.protocol_version.parse::<McpVersion>()
    }
}

/// `{serverInfo, capabilities, protocolVersion, instructions?}` (§4.6).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeResult {
    pub protocol_version: String,
    pub capabilities: ServerCapabilities,
    pub server_info: Implementation,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
}

impl InitializeResult {
    pub fn new(capabilities: ServerCapabilities, server_info: Implementation) -> Self {
        Self {
            protocol_version: McpVersion::CURRENT.as_str().to_string(),
            capabilities,
            server_info,
            instructions: None,
        }
    }

    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = Some(instructions.into());
        self
    }

    pub fn protocol_version(&self) -> Result<McpVersion, McpError> {
        self.protocol_version.parse::<McpVersion>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn implementation_builder() {
        let info = Implementation::new("test-client", "1.0.0").with_title("Test Client");
        assert_eq!(info.name, "test-client");
        assert_eq!(info.title, Some("Test Client".to_string()));
    }

    #[test]
    fn initialize_request_serializes_current_version() {
        let request = InitializeRequest::new(
            ClientCapabilities::default(),
            Implementation::new("test-client", "1.0.0"),
        );
        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains("2025-06-18"));
    }

    #[test]
    fn initialize_request_rejects_other_versions() {
        let mut request = InitializeRequest::new(
            ClientCapabilities::default(),
            Implementation::new("test-client", "1.0.0"),
        );
        request.protocol_version = "2024-11-05".to_string();
        assert!(request.protocol_version().is_err());
    }

    #[test]
    fn initialize_result_creation() {
        let result = InitializeResult::new(
            ServerCapabilities::default(),
            Implementation::new("test-server", "1.0.0"),
        )
        .with_instructions("Welcome!");
        assert_eq!(result.protocol_version, "2025-06-18");
        assert!(result.instructions.is_some());
    }
}
