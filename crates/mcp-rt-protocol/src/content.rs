//! Content types carried in tool results, resource reads, and prompt
//! messages, serialized exactly per §6.4.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

use crate::meta::Annotations;

/// `TextResourceContents` (§6.4: `{"uri","mimeType","text"}`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextResourceContents {
    pub uri: String,
    #[serde(rename = "mimeType", skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    pub text: String,
}

/// `BlobResourceContents` (§6.4: `{"uri","mimeType","blob"}`, base64).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlobResourceContents {
    pub uri: String,
    #[serde(rename = "mimeType", skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    pub blob: String,
}

/// `ResourceContents` variant: `Text{uri,text,mime_type} | Blob{uri,bytes,mime_type}` (§3).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResourceContents {
    Text(TextResourceContents),
    Blob(BlobResourceContents),
}

impl ResourceContents {
    pub fn text(uri: impl Into<String>, text: impl Into<String>) -> Self {
        Self::Text(TextResourceContents {
            uri: uri.into(),
            mime_type: None,
            text: text.into(),
        })
    }

    pub fn text_with_mime(
        uri: impl Into<String>,
        text: impl Into<String>,
        mime_type: impl Into<String>,
    ) -> Self {
        Self::Text(TextResourceContents {
            uri: uri.into(),
            mime_type: Some(mime_type.into()),
            text: text.into(),
        })
    }

    pub fn blob(uri: impl Into<String>, blob: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self::Blob(BlobResourceContents {
            uri: uri.into(),
            mime_type: Some(mime_type.into()),
            blob: blob.into(),
        })
    }
}

/// `Content` variant: `Text | Image | Embedded | ResourceLink` (§3), each
/// serialized per the exact shapes in §6.4. There is no `Audio` variant —
/// audio content is out of scope (§1).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ContentBlock {
    #[serde(rename = "text")]
    Text {
        text: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        annotations: Option<Annotations>,
        #[serde(rename = "_meta", skip_serializing_if = "Option::is_none")]
        meta: Option<HashMap<String, Value>>,
    },
    #[serde(rename = "image")]
    Image {
        data: String,
        #[serde(rename = "mimeType")]
        mime_type: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        annotations: Option<Annotations>,
        #[serde(rename = "_meta", skip_serializing_if = "Option::is_none")]
        meta: Option<HashMap<String, Value>>,
    },
    /// Embedded resource (`Embedded` in §3, `"resource"` on the wire).
    #[serde(rename = "resource")]
    Resource {
        resource: ResourceContents,
        #[serde(skip_serializing_if = "Option::is_none")]
        annotations: Option<Annotations>,
        #[serde(rename = "_meta", skip_serializing_if = "Option::is_none")]
        meta: Option<HashMap<String, Value>>,
    },
    /// `{"type":"link","href":<str>,"title"?,"annotations"?,"_meta"?}` — a
    /// flat reference, not a nested resource descriptor (§6.4).
    #[serde(rename = "link")]
    ResourceLink {
        href: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        annotations: Option<Annotations>,
        #[serde(rename = "_meta", skip_serializing_if = "Option::is_none")]
        meta: Option<HashMap<String, Value>>,
    },
}

impl ContentBlock {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text {
            text: text.into(),
            annotations: None,
            meta: None,
        }
    }

    pub fn text_with_annotations(text: impl Into<String>, annotations: Annotations) -> Self {
        Self::Text {
            text: text.into(),
            annotations: Some(annotations),
            meta: None,
        }
    }

    pub fn image(data: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self::Image {
            data: data.into(),
            mime_type: mime_type.into(),
            annotations: None,
            meta: None,
        }
    }

    pub fn resource(resource: ResourceContents) -> Self {
        Self::Resource {
            resource,
            annotations: None,
            meta: None,
        }
    }

    pub fn resource_link(href: impl Into<String>) -> Self {
        Self::ResourceLink {
            href: href.into(),
            title: None,
            annotations: None,
            meta: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        if let Self::ResourceLink { title: t, .. } = &mut self {
            *t = Some(title.into());
        }
        self
    }

    pub fn with_annotations(mut self, annotations: Annotations) -> Self {
        match &mut self {
            ContentBlock::Text { annotations: a, .. }
            | ContentBlock::Image { annotations: a, .. }
            | ContentBlock::Resource { annotations: a, .. }
            | ContentBlock::ResourceLink { annotations: a, .. } => {
                *a = Some(annotations);
            }
        }
        self
    }

    pub fn with_meta(mut self, meta: HashMap<String, Value>) -> Self {
        match &mut self {
            ContentBlock::Text { meta: m, .. }
            | ContentBlock::Image { meta: m, .. }
            | ContentBlock::Resource { meta: m, .. }
            | ContentBlock::ResourceLink { meta: m, .. } => {
                *m = Some(meta);
            }
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resource_link_serializes_to_flat_spec_shape() {
        let block = ContentBlock::resource_link("file:///a.txt").with_title("A");
        let json = serde_json::to_value(&block).unwrap();
        assert_eq!(json["type"], "link");
        assert_eq!(json["href"], "file:///a.txt");
        assert_eq!(json["title"], "A");
        assert!(json.get("uri").is_none());
        assert!(json.get("name").is_none());
    }

    #[test]
    fn resource_link_round_trips() {
        let block = ContentBlock::resource_link("file:///minimal.txt");
        let json = serde_json::to_string(&block).unwrap();
        let back: ContentBlock = serde_json::from_str(&json).unwrap();
        match back {
            ContentBlock::ResourceLink { href, title, .. } => {
                assert_eq!(href, "file:///minimal.txt");
                assert!(title.is_none());
            }
            _ => panic!("expected ResourceLink"),
        }
    }

    #[test]
    fn text_content_omits_absent_optional_fields() {
        let json = serde_json::to_value(ContentBlock::text("hi")).unwrap();
        assert_eq!(json, serde_json::json!({"type": "text", "text": "hi"}));
    }
}
