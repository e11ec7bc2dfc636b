//! Runtime tool construction: a [`ToolBuilder`] that assembles a
//! [`DynamicTool`] from a name, a parameter list, and a boxed handler
//! closure, so a tool can be registered without a dedicated `McpTool` impl
//! (§4.10: the auto-loader builds exactly these from a manifest).

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use mcp_rt_json_rpc::r#async::SessionContext;
use mcp_rt_protocol::errors::McpError;
use mcp_rt_protocol::tools::{ToolOutcome, ToolParameter};
use mcp_rt_server::McpTool;

/// A tool handler boxed so it can be stored and called without knowing the
/// concrete closure type. Takes the merged arguments and the caller's
/// session, same as [`McpTool::call`].
pub type ToolFn = Arc<
    dyn Fn(
            HashMap<String, Value>,
            Option<SessionContext>,
        ) -> Pin<Box<dyn Future<Output = Result<ToolOutcome, McpError>> + Send>>
        + Send
        + Sync,
>;

/// Builds a [`DynamicTool`] from a name, declared parameters, and a handler.
pub struct ToolBuilder {
    name: String,
    description: Option<String>,
    parameters: Vec<ToolParameter>,
    handler: Option<ToolFn>,
}

impl ToolBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            parameters: Vec::new(),
            handler: None,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn parameter(mut self, parameter: ToolParameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Set the handler from a plain async closure; wraps it in the boxed
    /// [`ToolFn`] shape for you.
    pub fn handler<F, Fut>(mut self, handler: F) -> Self
    where
        F: Fn(HashMap<String, Value>, Option<SessionContext>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<ToolOutcome, McpError>> + Send + 'static,
    {
        self.handler = Some(Arc::new(move |args, session| Box::pin(handler(args, session))));
        self
    }

    /// Consumes the builder. Panics if no handler was set — a tool with
    /// nothing to call is a construction error, not a runtime one.
    pub fn build(self) -> DynamicTool {
        DynamicTool {
            name: self.name,
            description: self.description,
            parameters: self.parameters,
            handler: self.handler.expect("ToolBuilder::handler was never called"),
        }
    }
}

/// A tool assembled at runtime rather than through a hand-written
/// [`McpTool`] impl.
pub struct DynamicTool {
    name: String,
    description: Option<String>,
    parameters: Vec<ToolParameter>,
    handler: ToolFn,
}

#[async_trait]
impl McpTool for DynamicTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    fn parameters(&self) -> Vec<ToolParameter> {
        self.parameters.clone()
    }

    async fn call(
        &self,
        arguments: HashMap<String, Value>,
        session: Option<SessionContext>,
    ) -> Result<ToolOutcome, McpError> {
        (self.handler)(arguments, session).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn built_tool_carries_declared_schema_and_runs_handler() {
        let tool = ToolBuilder::new("double")
            .description("doubles a number")
            .parameter(ToolParameter::new("value", "number").required())
            .handler(|args, _session| async move {
                let value = args.get("value").and_then(Value::as_f64).unwrap_or(0.0);
                Ok(ToolOutcome::Json(serde_json::json!({ "result": value * 2.0 })))
            })
            .build();

        assert_eq!(tool.name(), "double");
        assert_eq!(tool.description(), Some("doubles a number"));
        assert_eq!(tool.parameters().len(), 1);

        let args = HashMap::from([("value".to_string(), Value::from(21))]);
        let outcome = tool.call(args, None).await.unwrap();
        let result = outcome.into_result();
        assert!(!result.is_error);
    }

    #[test]
    #[should_panic(expected = "handler was never called")]
    fn build_without_handler_panics() {
        ToolBuilder::new("noop").build();
    }
}
