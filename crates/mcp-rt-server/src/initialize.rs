//! `initialize`, `ping`, and `notifications/initialized` (§4.5, §4.6).

use async_trait::async_trait;
use serde_json::Value;

use mcp_rt_json_rpc::r#async::{JsonRpcHandler, SessionContext};
use mcp_rt_json_rpc::request::RequestParams;
use mcp_rt_protocol::errors::McpError;
use mcp_rt_protocol::initialize::{
    Implementation, InitializeRequest, InitializeResult, PromptsCapabilities,
    ResourcesCapabilities, ServerCapabilities, ToolsCapabilities,
};
use mcp_rt_protocol::observability::{LogFields, Logger, NoopLogger};
use mcp_rt_protocol::ping::EmptyResult;
use std::sync::Arc;

use mcp_rt_session::{InMemorySessionStorage, SessionStorage};

use crate::prompt::PromptRegistry;
use crate::resource::ResourceRegistry;
use crate::tool::ToolRegistry;

/// Handles `initialize`, `ping`, and the `notifications/initialized`
/// lifecycle notification. Capabilities are computed from the registries
/// at the moment of the call (§4.6: "built from the registry at the
/// moment of the initialize call").
pub struct InitializeHandler {
    server_info: Implementation,
    instructions: Option<String>,
    tools: Arc<ToolRegistry>,
    resources: Arc<ResourceRegistry>,
    prompts: Arc<PromptRegistry>,
    sessions: Arc<InMemorySessionStorage>,
    logger: Arc<dyn Logger>,
}

impl InitializeHandler {
    pub fn new(
        server_info: Implementation,
        instructions: Option<String>,
        tools: Arc<ToolRegistry>,
        resources: Arc<ResourceRegistry>,
        prompts: Arc<PromptRegistry>,
        sessions: Arc<InMemorySessionStorage>,
    ) -> Self {
        Self::with_logger(
            server_info,
            instructions,
            tools,
            resources,
            prompts,
            sessions,
            Arc::new(NoopLogger),
        )
    }

    #[allow(clippy::too_many_arguments)]
    pub fn with_logger(
        server_info: Implementation,
        instructions: Option<String>,
        tools: Arc<ToolRegistry>,
        resources: Arc<ResourceRegistry>,
        prompts: Arc<PromptRegistry>,
        sessions: Arc<InMemorySessionStorage>,
        logger: Arc<dyn Logger>,
    ) -> Self {
        Self {
            server_info,
            instructions,
            tools,
            resources,
            prompts,
            sessions,
            logger,
        }
    }

    fn capabilities(&self) -> ServerCapabilities {
        ServerCapabilities {
            tools: (!self.tools.list().is_empty()).then(ToolsCapabilities::default),
            resources: (!self.resources.list().is_empty()).then(ResourcesCapabilities::default),
            prompts: (!self.prompts.list().is_empty()).then(PromptsCapabilities::default),
            experimental: None,
        }
    }

    fn initialize(&self, params: Option<RequestParams>) -> Result<Value, McpError> {
        let request: InitializeRequest = match params {
            Some(params) => serde_json::from_value(params.to_value())?,
            None => return Err(McpError::invalid_params("initialize requires protocolVersion, capabilities, clientInfo")),
        };

        // §4.6: reject any protocolVersion other than the exact configured one.
        request.protocol_version()?;

        let mut result = InitializeResult::new(self.capabilities(), self.server_info.clone());
        if let Some(instructions) = &self.instructions {
            result = result.with_instructions(instructions.clone());
        }
        Ok(serde_json::to_value(result)?)
    }
}

#[async_trait]
impl JsonRpcHandler for InitializeHandler {
    type Error = McpError;

    async fn handle(
        &self,
        method: &str,
        params: Option<RequestParams>,
        _session_context: Option<SessionContext>,
    ) -> Result<Value, Self::Error> {
        match method {
            "initialize" => self.initialize(params),
            "ping" => Ok(serde_json::to_value(EmptyResult {})?),
            other => Err(McpError::method_not_found(other)),
        }
    }

    async fn handle_notification(
        &self,
        method: &str,
        _params: Option<RequestParams>,
        session_context: Option<SessionContext>,
    ) -> Result<(), Self::Error> {
        if method != "notifications/initialized" {
            return Ok(());
        }

        let Some(session) = session_context else {
            self.logger.warn(
                "notifications/initialized received without a session",
                LogFields::new().with_method(method),
            );
            return Ok(());
        };

        let fields = LogFields::new()
            .with_method(method)
            .with_session_id(session.session_id.clone());

        match self.sessions.get_session(&session.session_id).await {
            Ok(Some(mut info)) => {
                info.is_initialized = true;
                if let Err(err) = self.sessions.update_session(info).await {
                    self.logger.warn(
                        &format!("failed to mark session initialized: {err}"),
                        fields,
                    );
                } else {
                    self.logger.info("session initialized", fields);
                }
            }
            Ok(None) => self
                .logger
                .warn("notifications/initialized for unknown session", fields),
            Err(err) => self
                .logger
                .warn(&format!("session lookup failed: {err}"), fields),
        }
        Ok(())
    }

    fn supported_methods(&self) -> Vec<String> {
        vec![
            "initialize".to_string(),
            "ping".to_string(),
            "notifications/initialized".to_string(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mcp_rt_protocol::initialize::ClientCapabilities;
    use mcp_rt_protocol::MCP_PROTOCOL_VERSION;

    fn handler() -> InitializeHandler {
        InitializeHandler::new(
            Implementation::new("test-server", "0.1.0"),
            Some("welcome".to_string()),
            Arc::new(ToolRegistry::new()),
            Arc::new(ResourceRegistry::new()),
            Arc::new(PromptRegistry::new()),
            Arc::new(InMemorySessionStorage::new()),
        )
    }

    #[tokio::test]
    async fn initialize_returns_capabilities_and_instructions() {
        let request = InitializeRequest::new(
            ClientCapabilities::default(),
            Implementation::new("client", "1.0.0"),
        );
        let params = RequestParams::Object(
            serde_json::to_value(&request)
                .unwrap()
                .as_object()
                .unwrap()
                .clone()
                .into_iter()
                .collect(),
        );
        let value = handler().handle("initialize", Some(params), None).await.unwrap();
        assert_eq!(value["protocolVersion"], MCP_PROTOCOL_VERSION);
        assert_eq!(value["instructions"], "welcome");
        assert!(value["capabilities"]["tools"].is_null());
    }

    #[tokio::test]
    async fn initialize_rejects_wrong_protocol_version() {
        let mut request_value = serde_json::json!({
            "protocolVersion": "2024-11-05",
            "capabilities": {},
            "clientInfo": {"name": "client", "version": "1.0.0"},
        });
        let params = RequestParams::Object(
            request_value.as_object_mut().unwrap().clone().into_iter().collect(),
        );
        let error = handler().handle("initialize", Some(params), None).await.unwrap_err();
        assert_eq!(error.to_error_object().code, -32602);
    }

    #[tokio::test]
    async fn ping_returns_empty_object() {
        let value = handler().handle("ping", None, None).await.unwrap();
        assert_eq!(value, serde_json::json!({}));
    }
}
