//! The tool engine (§4.7): registration, `tools/list`, `tools/call`.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use serde_json::Value;

use mcp_rt_json_rpc::r#async::{JsonRpcHandler, SessionContext};
use mcp_rt_json_rpc::request::RequestParams;
use mcp_rt_protocol::errors::McpError;
use mcp_rt_protocol::observability::{LogFields, Logger, NoopLogger};
use mcp_rt_protocol::tools::{
    CallToolParams, CallToolResult, ListToolsParams, ListToolsResult, Tool, ToolOutcome,
    ToolParameter,
};

/// Implemented by a host-supplied tool. `parameters()` feeds the schema
/// and default-merging in §4.7; `call` does the work and returns anything
/// [`ToolOutcome`] can absorb.
#[async_trait]
pub trait McpTool: Send + Sync {
    fn name(&self) -> &str;
    fn description(&self) -> Option<&str> {
        None
    }
    fn parameters(&self) -> Vec<ToolParameter> {
        Vec::new()
    }

    async fn call(
        &self,
        arguments: HashMap<String, Value>,
        session: Option<SessionContext>,
    ) -> Result<ToolOutcome, McpError>;

    fn to_descriptor(&self) -> Tool {
        let mut tool = Tool::new(self.name(), self.parameters());
        if let Some(description) = self.description() {
            tool = tool.with_description(description);
        }
        tool
    }
}

/// Registered tools, keyed by name (§3, §5: read-mostly, written only at
/// registration time).
#[derive(Default)]
pub struct ToolRegistry {
    tools: RwLock<HashMap<String, Arc<dyn McpTool>>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<T: McpTool + 'static>(&self, tool: T) {
        self.tools
            .write()
            .unwrap()
            .insert(tool.name().to_string(), Arc::new(tool));
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn McpTool>> {
        self.tools.read().unwrap().get(name).cloned()
    }

    pub fn list(&self) -> Vec<Tool> {
        self.tools
            .read()
            .unwrap()
            .values()
            .map(|tool| tool.to_descriptor())
            .collect()
    }
}

/// `tools/list` and `tools/call` (§4.7), bound directly to the dispatcher.
pub struct ToolsHandler {
    registry: Arc<ToolRegistry>,
    logger: Arc<dyn Logger>,
}

impl ToolsHandler {
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self::with_logger(registry, Arc::new(NoopLogger))
    }

    pub fn with_logger(registry: Arc<ToolRegistry>, logger: Arc<dyn Logger>) -> Self {
        Self { registry, logger }
    }

    fn list(&self) -> Value {
        let result = ListToolsResult::new(self.registry.list());
        serde_json::to_value(result).expect("ListToolsResult always serializes")
    }

    async fn call(
        &self,
        params: Option<RequestParams>,
        session: Option<SessionContext>,
    ) -> Result<Value, McpError> {
        let call_params: CallToolParams = match params {
            Some(params) => serde_json::from_value(params.to_value())?,
            None => return Err(McpError::invalid_params("tools/call requires {name}")),
        };

        let tool = self
            .registry
            .get(&call_params.name)
            .ok_or_else(|| McpError::tool_not_found(&call_params.name))?;

        // §4.7 step 2: fill in declared defaults for arguments the caller omitted.
        let merged = merge_defaults(&tool.parameters(), call_params.arguments.unwrap_or_default());

        self.logger.debug(
            "invoking tool",
            LogFields::new().with_method(format!("tools/call:{}", call_params.name)),
        );
        let outcome = tool.call(merged, session).await?;
        let result: CallToolResult = outcome.into_result();
        Ok(serde_json::to_value(result)?)
    }
}

fn merge_defaults(
    parameters: &[ToolParameter],
    mut arguments: HashMap<String, Value>,
) -> HashMap<String, Value> {
    for parameter in parameters {
        if !arguments.contains_key(&parameter.name) {
            if let Some(default) = &parameter.default {
                arguments.insert(parameter.name.clone(), default.clone());
            }
        }
    }
    arguments
}

#[async_trait]
impl JsonRpcHandler for ToolsHandler {
    type Error = McpError;

    async fn handle(
        &self,
        method: &str,
        params: Option<RequestParams>,
        session_context: Option<SessionContext>,
    ) -> Result<Value, Self::Error> {
        match method {
            "tools/list" => {
                let _: ListToolsParams = params
                    .map(|p| serde_json::from_value(p.to_value()))
                    .transpose()?
                    .unwrap_or_default();
                Ok(self.list())
            }
            "tools/call" => self.call(params, session_context).await,
            other => Err(McpError::method_not_found(other)),
        }
    }

    fn supported_methods(&self) -> Vec<String> {
        vec!["tools/list".to_string(), "tools/call".to_string()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mcp_rt_protocol::content::ContentBlock;

    struct EchoTool;

    #[async_trait]
    impl McpTool for EchoTool {
        fn name(&self) -> &str {
            "echo"
        }

        fn description(&self) -> Option<&str> {
            Some("echoes its input")
        }

        fn parameters(&self) -> Vec<ToolParameter> {
            vec![
                ToolParameter::new("text", "string").required(),
                ToolParameter::new("shout", "boolean").with_default(Value::Bool(false)),
            ]
        }

        async fn call(
            &self,
            arguments: HashMap<String, Value>,
            _session: Option<SessionContext>,
        ) -> Result<ToolOutcome, McpError> {
            let text = arguments
                .get("text")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            Ok(ToolOutcome::from(ContentBlock::text(text)))
        }
    }

    fn handler() -> ToolsHandler {
        let registry = Arc::new(ToolRegistry::new());
        registry.register(EchoTool);
        ToolsHandler::new(registry)
    }

    #[tokio::test]
    async fn tools_list_includes_registered_tool_with_schema() {
        let value = handler().handle("tools/list", None, None).await.unwrap();
        let tools = value["tools"].as_array().unwrap();
        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0]["name"], "echo");
        assert_eq!(tools[0]["inputSchema"]["required"][0], "text");
    }

    #[tokio::test]
    async fn tools_call_merges_default_for_missing_argument() {
        let params = RequestParams::Object(HashMap::from([
            ("name".to_string(), Value::String("echo".to_string())),
            (
                "arguments".to_string(),
                serde_json::json!({"text": "hi"}),
            ),
        ]));
        let value = handler()
            .handle("tools/call", Some(params), None)
            .await
            .unwrap();
        assert_eq!(value["isError"], false);
        assert_eq!(value["content"][0]["text"], "hi");
    }

    #[tokio::test]
    async fn tools_call_unknown_name_yields_tool_not_found() {
        let params = RequestParams::Object(HashMap::from([(
            "name".to_string(),
            Value::String("missing".to_string()),
        )]));
        let error = handler()
            .handle("tools/call", Some(params), None)
            .await
            .unwrap_err();
        assert_eq!(error.to_error_object().code, -32001);
    }
}
