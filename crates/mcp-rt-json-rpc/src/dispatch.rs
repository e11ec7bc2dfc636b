//! Top-level message classification.
//!
//! [`parse_json_rpc_message`] is the single entry point transports call to
//! turn a raw request body into either a request or a notification. It owns
//! the decision between the two JSON-RPC error codes that can occur before a
//! method handler ever runs: malformed JSON is a parse error, anything that
//! *is* valid JSON but isn't a well-formed single JSON-RPC object (including
//! a top-level batch array, which this implementation does not support) is
//! an invalid request.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{JsonRpcError, JsonRpcErrorCode, JsonRpcErrorObject};
use crate::notification::JsonRpcNotification;
use crate::request::JsonRpcRequest;
use crate::response::JsonRpcResponse;
use crate::types::RequestId;

/// A single inbound JSON-RPC message, classified by the presence of `id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IncomingMessage {
    Request(JsonRpcRequest),
    Notification(JsonRpcNotification),
}

/// What a dispatcher produced for one inbound message.
///
/// Notifications never produce a reply; `NoResponse` lets a transport tell
/// "I handled this, don't write anything to the wire" apart from "I have a
/// response body to write."
#[derive(Debug, Clone)]
pub enum JsonRpcMessageResult {
    Response(JsonRpcResponse),
    Error(JsonRpcError),
    NoResponse,
}

impl JsonRpcMessageResult {
    /// Serialize to a wire body, or `None` for notifications.
    pub fn to_json(&self) -> Option<String> {
        match self {
            Self::Response(r) => serde_json::to_string(r).ok(),
            Self::Error(e) => serde_json::to_string(e).ok(),
            Self::NoResponse => None,
        }
    }
}

/// Classify a raw request body into a request or a notification.
///
/// Rejects top-level JSON arrays outright (batching is not supported by this
/// implementation) and any payload that isn't a JSON object carrying
/// `"jsonrpc": "2.0"` and a `method` field.
pub fn parse_json_rpc_message(body: &str) -> Result<IncomingMessage, JsonRpcError> {
    let value: Value = serde_json::from_str(body).map_err(|_| JsonRpcError::parse_error())?;

    let obj = match &value {
        Value::Object(map) => map,
        Value::Array(_) => {
            return Err(JsonRpcError::new(
                None,
                JsonRpcErrorObject::new(
                    JsonRpcErrorCode::InvalidRequest,
                    Some("Invalid Request: batching not supported".to_string()),
                    None,
                ),
            ));
        }
        _ => return Err(JsonRpcError::invalid_request(None)),
    };

    match obj.get("jsonrpc").and_then(Value::as_str) {
        Some("2.0") => {}
        _ => return Err(JsonRpcError::invalid_request(extract_id(obj))),
    }

    if !obj.contains_key("method") {
        return Err(JsonRpcError::invalid_request(extract_id(obj)));
    }

    if obj.contains_key("id") {
        serde_json::from_value::<JsonRpcRequest>(value)
            .map(IncomingMessage::Request)
            .map_err(|_| JsonRpcError::invalid_request(None))
    } else {
        serde_json::from_value::<JsonRpcNotification>(value)
            .map(IncomingMessage::Notification)
            .map_err(|_| JsonRpcError::invalid_request(None))
    }
}

fn extract_id(obj: &serde_json::Map<String, Value>) -> Option<RequestId> {
    obj.get("id")
        .and_then(|v| serde_json::from_value(v.clone()).ok())
}

/// Build the result the transport should write for an already-dispatched
/// request: `Ok` becomes a success response, `Err` becomes an error
/// response, both addressed to the original request id.
pub fn into_message_result(
    id: RequestId,
    outcome: Result<Value, JsonRpcErrorObject>,
) -> JsonRpcMessageResult {
    match outcome {
        Ok(value) => JsonRpcMessageResult::Response(JsonRpcResponse::success(id, value)),
        Err(error_object) => JsonRpcMessageResult::Error(JsonRpcError::new(Some(id), error_object)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_request_by_id_presence() {
        let body = r#"{"jsonrpc":"2.0","id":1,"method":"ping"}"#;
        match parse_json_rpc_message(body).unwrap() {
            IncomingMessage::Request(req) => assert_eq!(req.method, "ping"),
            IncomingMessage::Notification(_) => panic!("expected request"),
        }
    }

    #[test]
    fn classifies_notification_by_missing_id() {
        let body = r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#;
        match parse_json_rpc_message(body).unwrap() {
            IncomingMessage::Notification(n) => assert_eq!(n.method, "notifications/initialized"),
            IncomingMessage::Request(_) => panic!("expected notification"),
        }
    }

    #[test]
    fn rejects_malformed_json_as_parse_error() {
        let err = parse_json_rpc_message("{not json").unwrap_err();
        assert_eq!(err.error.code, -32700);
    }

    #[test]
    fn rejects_top_level_batch_arrays() {
        let body = r#"[{"jsonrpc":"2.0","id":1,"method":"ping"}]"#;
        let err = parse_json_rpc_message(body).unwrap_err();
        assert_eq!(err.error.code, -32600);
        assert_eq!(err.error.message, "Invalid Request: batching not supported");
    }

    #[test]
    fn rejects_missing_jsonrpc_field() {
        let body = r#"{"id":1,"method":"ping"}"#;
        let err = parse_json_rpc_message(body).unwrap_err();
        assert_eq!(err.error.code, -32600);
    }

    #[test]
    fn rejects_wrong_jsonrpc_version() {
        let body = r#"{"jsonrpc":"1.0","id":1,"method":"ping"}"#;
        let err = parse_json_rpc_message(body).unwrap_err();
        assert_eq!(err.error.code, -32600);
    }
}
