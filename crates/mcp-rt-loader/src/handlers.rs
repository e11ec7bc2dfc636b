//! The table a manifest's `handler` key resolves against (§4.10):
//! "linking becomes a table lookup instead of dynamic code loading."

use std::collections::HashMap;
use std::sync::Arc;

use mcp_rt_builders::{ResourceFn, ToolFn};
use mcp_rt_protocol::prompts::PromptMessage;

/// Generates a prompt's message templates on demand. Plain `Vec`
/// generation rather than a boxed future: prompt templates are static
/// data rendered later by the engine (§4.9), so there is nothing to await.
pub type PromptRenderer = Arc<dyn Fn() -> Vec<PromptMessage> + Send + Sync>;

/// Host-populated function table, keyed by the string each manifest names
/// in its `handler` field.
#[derive(Default, Clone)]
pub struct HandlerTable {
    pub(crate) tools: HashMap<String, ToolFn>,
    pub(crate) resources: HashMap<String, ResourceFn>,
    pub(crate) prompts: HashMap<String, PromptRenderer>,
}

impl HandlerTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tool(mut self, key: impl Into<String>, handler: ToolFn) -> Self {
        self.tools.insert(key.into(), handler);
        self
    }

    pub fn resource(mut self, key: impl Into<String>, handler: ResourceFn) -> Self {
        self.resources.insert(key.into(), handler);
        self
    }

    pub fn prompt(mut self, key: impl Into<String>, handler: PromptRenderer) -> Self {
        self.prompts.insert(key.into(), handler);
        self
    }
}
