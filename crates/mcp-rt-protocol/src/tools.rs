//! Tool capability types (§3, §4.7).

use crate::content::ContentBlock;
use crate::meta::Cursor;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// A single declared tool parameter. `schema_type` is the JSON-Schema
/// primitive name (`"string"`, `"number"`, `"boolean"`, `"object"`, …).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolParameter {
    pub name: String,
    #[serde(rename = "type")]
    pub schema_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
}

impl ToolParameter {
    pub fn new(name: impl Into<String>, schema_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            schema_type: schema_type.into(),
            description: None,
            default: None,
            required: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
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

/// `{name, description, inputSchema}` (§3) plus the parameter list the
/// engine needs to merge defaults and build the schema (§4.7).
#[derive(Debug, Clone, Serialize)]
pub struct Tool {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
    #[serde(skip)]
    pub parameters: Vec<ToolParameter>,
}

impl Tool {
    pub fn new(name: impl Into<String>, parameters: Vec<ToolParameter>) -> Self {
        let input_schema = build_input_schema(&parameters);
        Self {
            name: name.into(),
            description: None,
            input_schema,
            parameters,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn required_parameters(&self) -> impl Iterator<Item = &ToolParameter> {
        self.parameters.iter().filter(|p| p.is_required())
    }

    /// Start from the caller-supplied arguments and fill in any declared
    /// default for a parameter the caller omitted (§4.7 step 2).
    pub fn merge_defaults(&self, arguments: HashMap<String, Value>) -> HashMap<String, Value> {
        let mut merged = arguments;
        for param in &self.parameters {
            if !merged.contains_key(&param.name) {
                if let Some(default) = &param.default {
                    merged.insert(param.name.clone(), default.clone());
                }
            }
        }
        merged
    }
}

/// `{type:"object", properties:{<name>: {type, description, default?}}, required:[...]}`.
fn build_input_schema(parameters: &[ToolParameter]) -> Value {
    let mut properties = serde_json::Map::new();
    let mut required = Vec::new();
    for param in parameters {
        let mut property = serde_json::Map::new();
        property.insert("type".to_string(), Value::String(param.schema_type.clone()));
        if let Some(description) = &param.description {
            property.insert("description".to_string(), Value::String(description.clone()));
        }
        if let Some(default) = &param.default {
            property.insert("default".to_string(), default.clone());
        }
        properties.insert(param.name.clone(), Value::Object(property));
        if param.is_required() {
            required.push(Value::String(param.name.clone()));
        }
    }
    serde_json::json!({
        "type": "object",
        "properties": Value::Object(properties),
        "required": required,
    })
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListToolsParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor: Option<Cursor>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListToolsResult {
    pub tools: Vec<Tool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<Cursor>,
}

impl ListToolsResult {
    pub fn new(tools: Vec<Tool>) -> Self {
        Self {
            tools,
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
pub struct CallToolParams {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arguments: Option<HashMap<String, Value>>,
}

impl CallToolParams {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arguments: None,
        }
    }

    pub fn with_arguments(mut self, arguments: HashMap<String, Value>) -> Self {
        self.arguments = Some(arguments);
        self
    }
}

/// `{content:[…],isError:bool}` (§6.3). `is_error: true` flags a
/// tool-domain failure the handler chose to report as a normal,
/// successful JSON-RPC response rather than a transport-level error
/// (§7 propagation policy).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallToolResult {
    pub content: Vec<ContentBlock>,
    pub is_error: bool,
}

impl CallToolResult {
    pub fn success(content: Vec<ContentBlock>) -> Self {
        Self {
            content,
            is_error: false,
        }
    }

    pub fn error(content: Vec<ContentBlock>) -> Self {
        Self {
            content,
            is_error: true,
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::success(vec![ContentBlock::text(text)])
    }

    pub fn error_text(text: impl Into<String>) -> Self {
        Self::error(vec![ContentBlock::text(text)])
    }
}

/// What a tool handler is allowed to hand back to the engine (§4.7 step 3).
/// The engine normalizes any of these into a [`CallToolResult`].
pub enum ToolOutcome {
    Single(ContentBlock),
    Many(Vec<ContentBlock>),
    Text(String),
    Json(Value),
    Image { data: Vec<u8>, mime_type: String },
    Result(CallToolResult),
}

impl ToolOutcome {
    /// Normalize into the wire result shape, base64-encoding image bytes
    /// and JSON-serializing map outcomes as text (§4.7 steps 3-6).
    pub fn into_result(self) -> CallToolResult {
        use base64::Engine as _;
        match self {
            ToolOutcome::Single(content) => CallToolResult::success(vec![content]),
            ToolOutcome::Many(contents) => CallToolResult::success(contents),
            ToolOutcome::Text(text) => CallToolResult::success(vec![ContentBlock::text(text)]),
            ToolOutcome::Json(value) => {
                let text = serde_json::to_string(&value).unwrap_or_else(|_| value.to_string());
                CallToolResult::success(vec![ContentBlock::text(text)])
            }
            ToolOutcome::Image { data, mime_type } => {
                let encoded = base64::engine::general_purpose::STANDARD.encode(data);
                CallToolResult::success(vec![ContentBlock::image(encoded, mime_type)])
            }
            ToolOutcome::Result(result) => result,
        }
    }
}

impl From<String> for ToolOutcome {
    fn from(text: String) -> Self {
        ToolOutcome::Text(text)
    }
}

impl From<ContentBlock> for ToolOutcome {
    fn from(content: ContentBlock) -> Self {
        ToolOutcome::Single(content)
    }
}

impl From<Vec<ContentBlock>> for ToolOutcome {
    fn from(contents: Vec<ContentBlock>) -> Self {
        ToolOutcome::Many(contents)
    }
}

impl From<CallToolResult> for ToolOutcome {
    fn from(result: CallToolResult) -> Self {
        ToolOutcome::Result(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_schema_marks_required_and_carries_default() {
        let tool = Tool::new(
            "greet",
            vec![
                ToolParameter::new("name", "string").required(),
                ToolParameter::new("lang", "string").with_default(Value::String("en".into())),
            ],
        );
        assert_eq!(tool.input_schema["type"], "object");
        assert_eq!(tool.input_schema["required"], serde_json::json!(["name"]));
        assert_eq!(tool.input_schema["properties"]["lang"]["default"], "en");
    }

    #[test]
    fn merge_defaults_fills_in_only_missing_parameters() {
        let tool = Tool::new(
            "greet",
            vec![ToolParameter::new("lang", "string").with_default(Value::String("en".into()))],
        );
        let mut arguments = HashMap::new();
        arguments.insert("name".to_string(), Value::String("Ada".to_string()));
        let merged = tool.merge_defaults(arguments);
        assert_eq!(merged.get("lang"), Some(&Value::String("en".to_string())));
        assert_eq!(merged.get("name"), Some(&Value::String("Ada".to_string())));
    }

    #[test]
    fn single_content_outcome_wraps_in_one_element_list() {
        let result = ToolOutcome::Single(ContentBlock::text("hi")).into_result();
        assert_eq!(result.content.len(), 1);
        assert!(!result.is_error);
    }

    #[test]
    fn text_outcome_wraps_in_text_content() {
        let result = ToolOutcome::Text("hello".to_string()).into_result();
        match &result.content[0] {
            ContentBlock::Text { text, .. } => assert_eq!(text, "hello"),
            _ => panic!("expected text content"),
        }
    }

    #[test]
    fn result_outcome_preserves_is_error_flag() {
        let result = ToolOutcome::Result(CallToolResult::error_text("boom")).into_result();
        assert!(result.is_error);
    }
}
