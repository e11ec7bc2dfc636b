//! Server-Sent Events formatting and per-transport fan-out (§4.4, §6.5).

use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast;

use mcp_rt_protocol::observability::{LogFields, Logger, NoopLogger};

/// One SSE frame: `event: <name>\nid: <int>\ndata: <line>\n[data: <line>\n]*\n`.
/// `id` is the transport-wide monotonically increasing counter (§5,
/// "SSE events have a strictly monotonic `id` field").
#[derive(Debug, Clone)]
pub struct SseEvent {
    pub name: String,
    pub id: u64,
    pub data: Value,
}

impl SseEvent {
    pub fn format(&self) -> String {
        let mut out = format!("event: {}\nid: {}\n", self.name, self.id);
        let payload = serde_json::to_string(&self.data).unwrap_or_else(|_| "{}".to_string());
        for line in payload.lines() {
            out.push_str("data: ");
            out.push_str(line);
            out.push('\n');
        }
        out.push('\n');
        out
    }
}

/// Broadcasts SSE events to every active GET stream on one HTTP transport
/// instance, assigning each event the next value of a single shared
/// counter so ids stay strictly increasing transport-wide.
pub struct SseManager {
    sender: broadcast::Sender<SseEvent>,
    next_id: Arc<AtomicU64>,
    logger: Arc<dyn Logger>,
}

impl SseManager {
    pub fn new() -> Self {
        Self::with_logger(Arc::new(NoopLogger))
    }

    pub fn with_logger(logger: Arc<dyn Logger>) -> Self {
        let (sender, _) = broadcast::channel(1024);
        Self {
            sender,
            next_id: Arc::new(AtomicU64::new(1)),
            logger,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SseEvent> {
        self.sender.subscribe()
    }

    fn next_event(&self, name: &str, data: Value) -> SseEvent {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        SseEvent {
            name: name.to_string(),
            id,
            data,
        }
    }

    /// The frame a GET handler writes immediately on connect (§4.4 GET step 3).
    /// Not broadcast — it belongs to the one stream that just connected.
    pub fn connection_event(&self) -> SseEvent {
        self.next_event(
            "connection",
            serde_json::json!({"type": "connection", "status": "connected"}),
        )
    }

    /// A notification mirrored to every open stream (§4.4 GET step 4).
    pub fn broadcast_notification(&self, data: Value) {
        let event = self.next_event("message", data);
        if self.sender.send(event).is_err() {
            // No active subscribers; nothing to deliver.
        }
    }

    /// A POST response optionally mirrored to open streams (§4.4 POST step 9).
    pub fn broadcast_response(&self, data: Value) {
        let event = self.next_event("response", data);
        if let Err(err) = self.sender.send(event) {
            self.logger.error(
                &format!("failed to mirror response over SSE: {err}"),
                LogFields::new(),
            );
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for SseManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_splits_multiline_payload_into_one_data_line_each() {
        let event = SseEvent {
            name: "message".to_string(),
            id: 3,
            data: serde_json::json!({"a": 1}),
        };
        let formatted = event.format();
        assert!(formatted.starts_with("event: message\nid: 3\n"));
        assert!(formatted.ends_with("\n\n"));
    }

    #[test]
    fn connection_event_uses_fixed_shape() {
        let manager = SseManager::new();
        let event = manager.connection_event();
        assert_eq!(event.name, "connection");
        assert_eq!(event.data["status"], "connected");
    }

    #[test]
    fn ids_are_strictly_increasing_across_event_kinds() {
        let manager = SseManager::new();
        let first = manager.connection_event();
        let second = manager.next_event("message", serde_json::json!({}));
        let third = manager.next_event("response", serde_json::json!({}));
        assert!(first.id < second.id);
        assert!(second.id < third.id);
    }

    #[tokio::test]
    async fn broadcast_notification_reaches_subscriber() {
        let manager = SseManager::new();
        let mut rx = manager.subscribe();
        manager.broadcast_notification(serde_json::json!({"hello": "world"}));
        let event = rx.recv().await.unwrap();
        assert_eq!(event.name, "message");
        assert_eq!(event.data["hello"], "world");
    }
}
