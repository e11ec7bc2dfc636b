//! Small cross-cutting value types shared by the capability modules:
//! opaque pagination cursors, progress-token correlation, and client
//! annotations attached to content and resources.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// An opaque pagination cursor. This implementation treats cursors as an
/// inert pass-through string — it never inspects or generates one itself
/// (§4.8: "cursors are opaque pass-through in this spec").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cursor(pub String);

impl Cursor {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for Cursor {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for Cursor {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// A token a client attaches to `_meta.progressToken` to correlate
/// server-initiated progress notifications with the request that started
/// the work. Progress push is out of scope for this core; the type exists
/// so `_meta` can be parsed and preserved without acting on it (§4.1:
/// "unknown `_meta` keys are preserved but not acted upon").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProgressToken {
    Number(i64),
    String(String),
}

/// Request/response `_meta` bag: a free-form map of extension fields plus
/// the one key this core actually reads, `progressToken`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Meta {
    #[serde(rename = "progressToken", skip_serializing_if = "Option::is_none")]
    pub progress_token: Option<ProgressToken>,
    #[serde(flatten)]
    pub other: HashMap<String, Value>,
}

/// Client-supplied annotations carried on content and resource descriptors:
/// audience targeting and relative priority.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Annotations {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audience: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<f64>,
}

impl Annotations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_audience(mut self, audience: Vec<String>) -> Self {
        self.audience = Some(audience);
        self
    }

    pub fn with_priority(mut self, priority: f64) -> Self {
        self.priority = Some(priority);
        self
    }

    /// The default annotations §4.8 prescribes for resource listings:
    /// `audience=["assistant"], priority=0.0`.
    pub fn resource_default() -> Self {
        Self {
            title: None,
            audience: Some(vec!["assistant".to_string()]),
            priority: Some(0.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_round_trips_as_plain_string() {
        let cursor = Cursor::new("page-2");
        let json = serde_json::to_string(&cursor).unwrap();
        assert_eq!(json, "\"page-2\"");
        let back: Cursor = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cursor);
    }

    #[test]
    fn annotations_resource_default_matches_spec() {
        let annotations = Annotations::resource_default();
        assert_eq!(annotations.audience, Some(vec!["assistant".to_string()]));
        assert_eq!(annotations.priority, Some(0.0));
    }
}
