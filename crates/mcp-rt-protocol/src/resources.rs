//! Resource capability types (§3, §4.8).

use crate::content::ResourceContents;
use crate::meta::{Annotations, Cursor};
use serde::{Deserialize, Serialize};

/// `{uri, name, mimeType, description, annotations}` (§4.8). Annotation
/// defaults (`audience=["assistant"]`, `priority=0.0`) live on
/// [`Annotations::resource_default`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    pub uri: String,
    pub name: String,
    #[serde(rename = "mimeType", skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub annotations: Annotations,
}

impl Resource {
    pub fn new(uri: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            name: name.into(),
            mime_type: None,
            description: None,
            annotations: Annotations::resource_default(),
        }
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_annotations(mut self, annotations: Annotations) -> Self {
        self.annotations = annotations;
        self
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResourcesParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor: Option<Cursor>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResourcesResult {
    pub resources: Vec<Resource>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<Cursor>,
}

impl ListResourcesResult {
    pub fn new(resources: Vec<Resource>) -> Self {
        Self {
            resources,
            next_cursor: None,
        }
    }

    /// `nextCursor` is only emitted when the caller supplied a cursor to
    /// page from (§4.8) — cursors are an opaque pass-through in this core.
    pub fn with_next_cursor(mut self, cursor: Cursor) -> Self {
        self.next_cursor = Some(cursor);
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadResourceParams {
    pub uri: String,
}

impl ReadResourceParams {
    pub fn new(uri: impl Into<String>) -> Self {
        Self { uri: uri.into() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadResourceResult {
    pub contents: Vec<ResourceContents>,
}

impl ReadResourceResult {
    pub fn new(contents: Vec<ResourceContents>) -> Self {
        Self { contents }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resource_carries_default_annotations() {
        let resource = Resource::new("file:///a.txt", "a.txt");
        assert_eq!(resource.annotations.audience, Some(vec!["assistant".to_string()]));
        assert_eq!(resource.annotations.priority, Some(0.0));
    }

    #[test]
    fn list_result_omits_next_cursor_unless_set() {
        let result = ListResourcesResult::new(vec![Resource::new("file:///a.txt", "a.txt")]);
        let json = serde_json::to_value(&result).unwrap();
        assert!(json.get("nextCursor").is_none());
    }

    #[test]
    fn read_result_wraps_contents() {
        let result = ReadResourceResult::new(vec![ResourceContents::text("file:///a.txt", "hi")]);
        assert_eq!(result.contents.len(), 1);
    }
}
