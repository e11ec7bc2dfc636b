//! Prompt capability types and the template processor (§3, §4.9).

use crate::content::ContentBlock;
use crate::meta::Cursor;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptArgument {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
}

impl PromptArgument {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            required: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn required(mut self) -> Self {
        self.required = Some(true);
        self
    }

    pub fn is_required(&self) -> bool {
        self.required.unwrap_or(false)
    }
}

/// `{name, description, arguments, messages}` (§3). `messages` holds the
/// message templates rendered by `prompts/get`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prompt {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arguments: Option<Vec<PromptArgument>>,
    #[serde(skip)]
    pub messages: Vec<PromptMessage>,
}

impl Prompt {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            arguments: None,
            messages: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_arguments(mut self, arguments: Vec<PromptArgument>) -> Self {
        self.arguments = Some(arguments);
        self
    }

    pub fn with_messages(mut self, messages: Vec<PromptMessage>) -> Self {
        self.messages = messages;
        self
    }

    pub fn required_arguments(&self) -> impl Iterator<Item = &PromptArgument> {
        self.arguments
            .iter()
            .flatten()
            .filter(|arg| arg.is_required())
    }
}

/// `{role, content}` (§3) — `content` is the shared [`ContentBlock`], the
/// same serialization used by tool results and resource reads.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptMessage {
    pub role: Role,
    pub content: ContentBlock,
}

impl PromptMessage {
    pub fn user_text(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: ContentBlock::text(text),
        }
    }

    pub fn assistant_text(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: ContentBlock::text(text),
        }
    }

    pub fn user_image(data: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: ContentBlock::image(data, mime_type),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPromptsParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor: Option<Cursor>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPromptsResult {
    pub prompts: Vec<Prompt>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<Cursor>,
}

impl ListPromptsResult {
    pub fn new(prompts: Vec<Prompt>) -> Self {
        Self {
            prompts,
            next_cursor: None,
        }
    }

    pub fn with_next_cursor(mut self, cursor: Cursor) -> Self {
        self.next_cursor = Some(cursor);
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetPromptParams {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arguments: Option<HashMap<String, String>>,
}

impl GetPromptParams {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arguments: None,
        }
    }

    pub fn with_arguments(mut self, arguments: HashMap<String, String>) -> Self {
        self.arguments = Some(arguments);
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetPromptResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub messages: Vec<PromptMessage>,
}

impl GetPromptResult {
    pub fn new(messages: Vec<PromptMessage>) -> Self {
        Self {
            description: None,
            messages,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Render a single template string against an argument map (§4.9).
///
/// Two passes: first resolve `{?name?...inner...}` conditional blocks
/// (tracking brace nesting to find each block's true closing brace),
/// dropping the block entirely when `name` is absent and replacing it
/// with its (recursively resolved) inner text when present; then a final
/// pass substitutes any remaining plain `{name}` tokens, leaving
/// unreferenced tokens as literal text.
pub fn render_template(template: &str, arguments: &HashMap<String, String>) -> String {
    let after_conditionals = resolve_conditionals(template, arguments);
    substitute_tokens(&after_conditionals, arguments)
}

fn resolve_conditionals(input: &str, arguments: &HashMap<String, String>) -> String {
    let chars: Vec<char> = input.chars().collect();
    let mut output = String::new();
    let mut i = 0;
    while i < chars.len() {
        if chars[i] == '{' && chars.get(i + 1) == Some(&'?') {
            if let Some(name) = find_conditional(&chars, i) {
                let (name_str, inner, end) = name;
                if arguments.contains_key(&name_str) {
                    output.push_str(&resolve_conditionals(&inner, arguments));
                }
                i = end + 1;
                continue;
            }
        }
        output.push(chars[i]);
        i += 1;
    }
    output
}

/// Parse a `{?name?inner}` block starting at `start` (the index of its
/// opening `{`). Returns `(name, inner, end_index)` where `end_index` is
/// the index of the block's matching closing `}`, or `None` if the block
/// is malformed (missing the second `?` or an unbalanced close).
fn find_conditional(chars: &[char], start: usize) -> Option<(String, String, usize)> {
    let name_start = start + 2;
    let name_end_rel = chars[name_start..].iter().position(|&c| c == '?')?;
    let name_end = name_start + name_end_rel;
    let name: String = chars[name_start..name_end].iter().collect();

    let inner_start = name_end + 1;
    let mut depth = 1i32;
    let mut j = inner_start;
    while j < chars.len() {
        match chars[j] {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    break;
                }
            }
            _ => {}
        }
        j += 1;
    }
    if depth != 0 {
        return None;
    }
    let inner: String = chars[inner_start..j].iter().collect();
    Some((name, inner, j))
}

fn substitute_tokens(input: &str, arguments: &HashMap<String, String>) -> String {
    let chars: Vec<char> = input.chars().collect();
    let mut output = String::new();
    let mut i = 0;
    while i < chars.len() {
        if chars[i] == '{' {
            if let Some(end_rel) = chars[i + 1..].iter().position(|&c| c == '}') {
                let end = i + 1 + end_rel;
                let name: String = chars[i + 1..end].iter().collect();
                if let Some(value) = arguments.get(&name) {
                    output.push_str(value);
                    i = end + 1;
                    continue;
                }
            }
        }
        output.push(chars[i]);
        i += 1;
    }
    output
}

/// Render every `Text` content block in a prompt's messages against the
/// supplied arguments, leaving other content variants untouched (§4.9
/// step 3).
pub fn render_messages(
    messages: &[PromptMessage],
    arguments: &HashMap<String, String>,
) -> Vec<PromptMessage> {
    messages
        .iter()
        .map(|message| match &message.content {
            ContentBlock::Text {
                text,
                annotations,
                meta,
            } => PromptMessage {
                role: message.role.clone(),
                content: ContentBlock::Text {
                    text: render_template(text, arguments),
                    annotations: annotations.clone(),
                    meta: meta.clone(),
                },
            },
            _ => message.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_template_is_identity_with_no_tokens_or_conditionals() {
        assert_eq!(render_template("hello world", &HashMap::new()), "hello world");
    }

    #[test]
    fn render_template_drops_conditional_when_argument_absent() {
        let args = HashMap::new();
        let rendered = render_template("Hello! {?name?Nice to meet you, {name}}", &args);
        assert_eq!(rendered, "Hello! ");
    }

    #[test]
    fn render_template_resolves_conditional_when_argument_present() {
        let mut args = HashMap::new();
        args.insert("name".to_string(), "Grace".to_string());
        let rendered = render_template("Hello! {?name?Nice to meet you, {name}}", &args);
        assert_eq!(rendered, "Hello! Nice to meet you, Grace");
    }

    #[test]
    fn render_template_leaves_unreferenced_plain_token_literal() {
        let rendered = render_template("Hi {name}", &HashMap::new());
        assert_eq!(rendered, "Hi {name}");
    }

    #[test]
    fn render_messages_only_touches_text_content() {
        let mut args = HashMap::new();
        args.insert("lang".to_string(), "en".to_string());
        let messages = vec![
            PromptMessage::user_text("hello [{lang}]"),
            PromptMessage::user_image("base64data", "image/png"),
        ];
        let rendered = render_messages(&messages, &args);
        match &rendered[0].content {
            ContentBlock::Text { text, .. } => assert_eq!(text, "hello [en]"),
            _ => panic!("expected text"),
        }
        assert!(matches!(rendered[1].content, ContentBlock::Image { .. }));
    }

    #[test]
    fn prompt_argument_required_defaults_to_false() {
        let arg = PromptArgument::new("topic");
        assert!(!arg.is_required());
        assert!(arg.required().is_required());
    }

    #[test]
    fn get_prompt_params_carries_string_arguments() {
        let mut args = HashMap::new();
        args.insert("topic".to_string(), "AI Safety".to_string());
        let params = GetPromptParams::new("write_essay").with_arguments(args);
        assert_eq!(params.name, "write_essay");
        assert_eq!(
            params.arguments.unwrap().get("topic"),
            Some(&"AI Safety".to_string())
        );
    }
}
