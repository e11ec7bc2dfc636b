//! Server-to-client notifications this core actually emits.
//!
//! Progress push, client-side roots, and the logging capability are all
//! out of scope (§1), so their notification types are not carried here —
//! only the list-changed family implied by the capability model (§4.6)
//! and the two notifications the dispatcher itself recognizes
//! (`notifications/initialized` inbound, `notifications/resources/updated`
//! outbound, per the subscribe capability flag in §3's `Resource`
//! descriptor).

use mcp_rt_json_rpc::types::RequestId;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Base notification parameters: optional `_meta` plus pass-through
/// extension fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationParams {
    #[serde(rename = "_meta", skip_serializing_if = "Option::is_none")]
    pub meta: Option<HashMap<String, Value>>,
    #[serde(flatten)]
    pub other: HashMap<String, Value>,
}

impl NotificationParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_meta(mut self, meta: HashMap<String, Value>) -> Self {
        self.meta = Some(meta);
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<NotificationParams>,
}

impl Notification {
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            params: None,
        }
    }

    pub fn with_params(mut self, params: NotificationParams) -> Self {
        self.params = Some(params);
        self
    }
}

macro_rules! list_changed_notification {
    ($name:ident, $method:literal) => {
        #[derive(Debug, Clone, Serialize, Deserialize)]
        #[serde(rename_all = "camelCase")]
        pub struct $name {
            pub method: String,
            #[serde(skip_serializing_if = "Option::is_none")]
            pub params: Option<NotificationParams>,
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl $name {
            pub fn new() -> Self {
                Self {
                    method: $method.to_string(),
                    params: None,
                }
            }

            pub fn with_meta(mut self, meta: HashMap<String, Value>) -> Self {
                self.params = Some(NotificationParams::new().with_meta(meta));
                self
            }
        }
    };
}

list_changed_notification!(ResourceListChangedNotification, "notifications/resources/list_changed");
list_changed_notification!(ToolListChangedNotification, "notifications/tools/list_changed");
list_changed_notification!(PromptListChangedNotification, "notifications/prompts/list_changed");

/// Method: `"notifications/resources/updated"` — emitted for a subscribed
/// resource URI (§3 `ResourcesCapabilities.subscribe`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceUpdatedNotification {
    pub method: String,
    pub params: ResourceUpdatedNotificationParams,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceUpdatedNotificationParams {
    pub uri: String,
    #[serde(rename = "_meta", skip_serializing_if = "Option::is_none")]
    pub meta: Option<HashMap<String, Value>>,
}

impl ResourceUpdatedNotification {
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            method: "notifications/resources/updated".to_string(),
            params: ResourceUpdatedNotificationParams {
                uri: uri.into(),
                meta: None,
            },
        }
    }
}

/// Method: `"notifications/cancelled"` — carries the id of the request
/// being cancelled. The dispatcher does not implement cancellation
/// itself; this type exists so an inbound cancellation notification
/// parses cleanly instead of falling through as an unknown method.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelledNotification {
    pub method: String,
    pub params: CancelledNotificationParams,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelledNotificationParams {
    pub request_id: RequestId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl CancelledNotification {
    pub fn new(request_id: RequestId) -> Self {
        Self {
            method: "notifications/cancelled".to_string(),
            params: CancelledNotificationParams {
                request_id,
                reason: None,
            },
        }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.params.reason = Some(reason.into());
        self
    }
}

/// Method: `"notifications/initialized"` (§4.6) — the one inbound
/// notification the dispatcher recognizes by name.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializedNotification {
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<NotificationParams>,
}

impl Default for InitializedNotification {
    fn default() -> Self {
        Self::new()
    }
}

impl InitializedNotification {
    pub fn new() -> Self {
        Self {
            method: "notifications/initialized".to_string(),
            params: None,
        }
    }
}

pub const INITIALIZED_METHOD: &str = "notifications/initialized";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resource_list_changed_uses_fixed_method_name() {
        assert_eq!(
            ResourceListChangedNotification::new().method,
            "notifications/resources/list_changed"
        );
    }

    #[test]
    fn tool_list_changed_uses_fixed_method_name() {
        assert_eq!(
            ToolListChangedNotification::new().method,
            "notifications/tools/list_changed"
        );
    }

    #[test]
    fn resource_updated_carries_uri() {
        let n = ResourceUpdatedNotification::new("file:///test.txt");
        assert_eq!(n.params.uri, "file:///test.txt");
    }

    #[test]
    fn cancelled_notification_carries_request_id_and_reason() {
        let n = CancelledNotification::new(RequestId::Number(123)).with_reason("user cancelled");
        assert_eq!(n.params.request_id, RequestId::Number(123));
        assert_eq!(n.params.reason, Some("user cancelled".to_string()));
    }

    #[test]
    fn initialized_notification_round_trips() {
        let json = serde_json::to_string(&InitializedNotification::new()).unwrap();
        let back: InitializedNotification = serde_json::from_str(&json).unwrap();
        assert_eq!(back.method, INITIALIZED_METHOD);
    }
}
