//! Runtime prompt construction. Unlike [`crate::tool`] and
//! [`crate::resource`], a prompt has nothing to call at request time — its
//! templates are rendered by the engine (§4.9) — so [`DynamicPrompt`] is a
//! plain data holder instead of wrapping a handler closure.

use mcp_rt_protocol::prompts::{PromptArgument, PromptMessage};
use mcp_rt_server::McpPrompt;

pub struct PromptBuilder {
    name: String,
    description: Option<String>,
    arguments: Vec<PromptArgument>,
    messages: Vec<PromptMessage>,
}

impl PromptBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            arguments: Vec::new(),
            messages: Vec::new(),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn argument(mut self, argument: PromptArgument) -> Self {
        self.arguments.push(argument);
        self
    }

    pub fn string_argument(self, name: impl Into<String>, description: impl Into<String>) -> Self {
        self.argument(PromptArgument::new(name).with_description(description).required())
    }

    pub fn user_message(mut self, text: impl Into<String>) -> Self {
        self.messages.push(PromptMessage::user_text(text));
        self
    }

    pub fn assistant_message(mut self, text: impl Into<String>) -> Self {
        self.messages.push(PromptMessage::assistant_text(text));
        self
    }

    /// Append a whole rendered/generated message list at once, for callers
    /// building a prompt from something other than these literal helpers
    /// (e.g. a manifest-driven loader).
    pub fn messages(mut self, messages: Vec<PromptMessage>) -> Self {
        self.messages.extend(messages);
        self
    }

    pub fn build(self) -> DynamicPrompt {
        DynamicPrompt {
            name: self.name,
            description: self.description,
            arguments: self.arguments,
            messages: self.messages,
        }
    }
}

pub struct DynamicPrompt {
    name: String,
    description: Option<String>,
    arguments: Vec<PromptArgument>,
    messages: Vec<PromptMessage>,
}

impl McpPrompt for DynamicPrompt {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    fn arguments(&self) -> Vec<PromptArgument> {
        self.arguments.clone()
    }

    fn messages(&self) -> Vec<PromptMessage> {
        self.messages.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn built_prompt_carries_arguments_and_message_templates() {
        let prompt = PromptBuilder::new("greeting")
            .description("greets a user by name")
            .string_argument("name", "person to greet")
            .user_message("Hello {name}!")
            .build();

        assert_eq!(prompt.name(), "greeting");
        assert_eq!(prompt.arguments().len(), 1);
        assert!(prompt.arguments()[0].is_required());
        assert_eq!(prompt.messages().len(), 1);
    }
}
