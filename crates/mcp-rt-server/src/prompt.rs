//! The prompt engine (§4.9): registration, `prompts/list`, `prompts/get`,
//! template rendering.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use serde_json::Value;

use mcp_rt_json_rpc::r#async::{JsonRpcHandler, SessionContext};
use mcp_rt_json_rpc::request::RequestParams;
use mcp_rt_protocol::errors::McpError;
use mcp_rt_protocol::observability::{LogFields, Logger, NoopLogger};
use mcp_rt_protocol::prompts::{
    render_messages, GetPromptParams, GetPromptResult, ListPromptsParams, ListPromptsResult,
    Prompt, PromptArgument, PromptMessage,
};

/// Implemented by a host-supplied prompt. `messages()` returns the raw
/// templates; the engine applies [`render_messages`] against the caller's
/// arguments (§4.9).
pub trait McpPrompt: Send + Sync {
    fn name(&self) -> &str;
    fn description(&self) -> Option<&str> {
        None
    }
    fn arguments(&self) -> Vec<PromptArgument> {
        Vec::new()
    }
    fn messages(&self) -> Vec<PromptMessage>;

    fn to_descriptor(&self) -> Prompt {
        let mut prompt = Prompt::new(self.name());
        if let Some(description) = self.description() {
            prompt = prompt.with_description(description);
        }
        let arguments = self.arguments();
        if !arguments.is_empty() {
            prompt = prompt.with_arguments(arguments);
        }
        prompt
    }
}

#[derive(Default)]
pub struct PromptRegistry {
    prompts: RwLock<HashMap<String, Arc<dyn McpPrompt>>>,
}

impl PromptRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<P: McpPrompt + 'static>(&self, prompt: P) {
        self.prompts
            .write()
            .unwrap()
            .insert(prompt.name().to_string(), Arc::new(prompt));
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn McpPrompt>> {
        self.prompts.read().unwrap().get(name).cloned()
    }

    pub fn list(&self) -> Vec<Prompt> {
        self.prompts
            .read()
            .unwrap()
            .values()
            .map(|prompt| prompt.to_descriptor())
            .collect()
    }
}

pub struct PromptsHandler {
    registry: Arc<PromptRegistry>,
    logger: Arc<dyn Logger>,
}

impl PromptsHandler {
    pub fn new(registry: Arc<PromptRegistry>) -> Self {
        Self::with_logger(registry, Arc::new(NoopLogger))
    }

    pub fn with_logger(registry: Arc<PromptRegistry>, logger: Arc<dyn Logger>) -> Self {
        Self { registry, logger }
    }

    fn list(&self) -> Value {
        let result = ListPromptsResult::new(self.registry.list());
        serde_json::to_value(result).expect("ListPromptsResult always serializes")
    }

    fn get(&self, params: Option<RequestParams>) -> Result<Value, McpError> {
        let get_params: GetPromptParams = match params {
            Some(params) => serde_json::from_value(params.to_value())?,
            None => return Err(McpError::invalid_params("prompts/get requires {name}")),
        };

        let prompt = self
            .registry
            .get(&get_params.name)
            .ok_or_else(|| McpError::prompt_not_found(&get_params.name))?;

        let arguments = get_params.arguments.unwrap_or_default();

        // §4.9 step 2: every declared required argument must be present.
        let missing: Vec<String> = prompt
            .arguments()
            .into_iter()
            .filter(|arg| arg.is_required() && !arguments.contains_key(&arg.name))
            .map(|arg| arg.name)
            .collect();
        if !missing.is_empty() {
            return Err(McpError::missing_required_arguments(missing));
        }

        self.logger.debug(
            "rendering prompt",
            LogFields::new().with_method(format!("prompts/get:{}", get_params.name)),
        );
        let messages = render_messages(&prompt.messages(), &arguments);
        let mut result = GetPromptResult::new(messages);
        if let Some(description) = prompt.description() {
            result = result.with_description(description);
        }
        Ok(serde_json::to_value(result)?)
    }
}

#[async_trait]
impl JsonRpcHandler for PromptsHandler {
    type Error = McpError;

    async fn handle(
        &self,
        method: &str,
        params: Option<RequestParams>,
        _session_context: Option<SessionContext>,
    ) -> Result<Value, Self::Error> {
        match method {
            "prompts/list" => {
                let _: ListPromptsParams = params
                    .map(|p| serde_json::from_value(p.to_value()))
                    .transpose()?
                    .unwrap_or_default();
                Ok(self.list())
            }
            "prompts/get" => self.get(params),
            other => Err(McpError::method_not_found(other)),
        }
    }

    fn supported_methods(&self) -> Vec<String> {
        vec!["prompts/list".to_string(), "prompts/get".to_string()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct GreetingPrompt;

    impl McpPrompt for GreetingPrompt {
        fn name(&self) -> &str {
            "greeting"
        }

        fn description(&self) -> Option<&str> {
            Some("greets a user by name")
        }

        fn arguments(&self) -> Vec<PromptArgument> {
            vec![PromptArgument::new("name").required()]
        }

        fn messages(&self) -> Vec<PromptMessage> {
            vec![PromptMessage::user_text(
                "Hello {name}{?formal?, welcome}!",
            )]
        }
    }

    fn handler() -> PromptsHandler {
        let registry = Arc::new(PromptRegistry::new());
        registry.register(GreetingPrompt);
        PromptsHandler::new(registry)
    }

    #[tokio::test]
    async fn prompts_list_includes_declared_arguments() {
        let value = handler()
            .handle("prompts/list", None, None)
            .await
            .unwrap();
        let prompts = value["prompts"].as_array().unwrap();
        assert_eq!(prompts[0]["arguments"][0]["name"], "name");
        assert_eq!(prompts[0]["arguments"][0]["required"], true);
    }

    #[tokio::test]
    async fn prompts_get_renders_conditional_when_argument_present() {
        let params = RequestParams::Object(HashMap::from([
            (
                "name".to_string(),
                Value::String("greeting".to_string()),
            ),
            (
                "arguments".to_string(),
                serde_json::json!({"name": "Ada", "formal": "yes"}),
            ),
        ]));
        let value = handler()
            .handle("prompts/get", Some(params), None)
            .await
            .unwrap();
        let text = value["messages"][0]["content"]["text"].as_str().unwrap();
        assert_eq!(text, "Hello Ada, welcome!");
    }

    #[tokio::test]
    async fn prompts_get_missing_required_argument_yields_invalid_params() {
        let params = RequestParams::Object(HashMap::from([(
            "name".to_string(),
            Value::String("greeting".to_string()),
        )]));
        let error = handler()
            .handle("prompts/get", Some(params), None)
            .await
            .unwrap_err();
        assert_eq!(error.to_error_object().code, -32602);
    }
}
