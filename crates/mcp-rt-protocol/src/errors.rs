//! Error taxonomy, one `thiserror` enum per architectural layer.
//!
//! Handlers and the capability engines return these; exactly one place —
//! [`McpError::to_error_object`] — converts them to the wire-level
//! JSON-RPC error object. Nothing in this crate serializes an error ad hoc
//! at its origin.

use mcp_rt_json_rpc::error::JsonRpcErrorObject;

/// Message-codec failures: malformed JSON, batching, or a missing/invalid
/// `jsonrpc` field. These mostly originate in `mcp-rt-json-rpc`; this
/// variant exists so a protocol-level caller can carry one through without
/// reaching back into the codec crate's own error type.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("parse error: {0}")]
    ParseError(String),
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

/// Transport-layer failures (§4.2–§4.4): things that happen before a
/// request ever reaches the dispatcher, or after a handler has already
/// produced a result.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("bind failed: {0}")]
    BindFailed(String),
    #[error("response slot for this request was already written")]
    SlotAlreadyWritten,
    #[error("session ID required")]
    SessionRequired,
    #[error("invalid session")]
    InvalidSession,
    #[error("origin not allowed: {0}")]
    OriginForbidden(String),
    #[error("transport is closed")]
    Closed,
    #[error("unsupported protocol version: {actual}, expected {expected}")]
    UnsupportedProtocolVersion { expected: String, actual: String },
}

/// Dispatch-layer failures (§4.5): routing and parameter binding, before a
/// capability engine is even invoked.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("method not found: {0}")]
    MethodNotFound(String),
    #[error("invalid params: {0}")]
    InvalidParams(String),
    #[error("internal error: {0}")]
    Internal(String),
}

/// Domain failures raised by the capability engines themselves (§4.7–§4.9,
/// §7).
#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("tool not found: {0}")]
    ToolNotFound(String),
    #[error("resource not found: {0}")]
    ResourceNotFound(String),
    #[error("prompt not found: {0}")]
    PromptNotFound(String),
    #[error("invalid URI: {0}")]
    InvalidUri(String),
    #[error("missing required arguments: {0:?}")]
    MissingRequiredArguments(Vec<String>),
    #[error("tool execution failed: {0}")]
    ToolExecutionFailed(String),
    #[error("resource execution failed: {0}")]
    ResourceExecutionFailed(String),
}

/// Top-level error carried across the protocol crate's public API. It is a
/// thin sum of the four layer enums above plus the one cross-cutting case
/// (`VersionMismatch`, surfaced by both `initialize` params and the HTTP
/// transport's header check) — the layer each variant belongs to is
/// unambiguous from its name, and code outside the dispatcher never
/// matches on it beyond routing to [`McpError::to_error_object`].
#[derive(Debug, thiserror::Error)]
pub enum McpError {
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("protocol version mismatch: expected {expected}, got {actual}")]
    VersionMismatch { expected: String, actual: String },
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl McpError {
    pub fn tool_not_found(name: impl Into<String>) -> Self {
        DomainError::ToolNotFound(name.into()).into()
    }

    pub fn resource_not_found(uri: impl Into<String>) -> Self {
        DomainError::ResourceNotFound(uri.into()).into()
    }

    pub fn prompt_not_found(name: impl Into<String>) -> Self {
        DomainError::PromptNotFound(name.into()).into()
    }

    pub fn invalid_uri(uri: impl Into<String>) -> Self {
        DomainError::InvalidUri(uri.into()).into()
    }

    pub fn missing_required_arguments(names: Vec<String>) -> Self {
        DomainError::MissingRequiredArguments(names).into()
    }

    pub fn method_not_found(method: impl Into<String>) -> Self {
        DispatchError::MethodNotFound(method.into()).into()
    }

    pub fn invalid_params(message: impl Into<String>) -> Self {
        DispatchError::InvalidParams(message.into()).into()
    }

    pub fn internal(message: impl Into<String>) -> Self {
        DispatchError::Internal(message.into()).into()
    }

    /// The single conversion point from domain/dispatch/transport/codec
    /// error to wire-level JSON-RPC error object (§7).
    pub fn to_error_object(&self) -> JsonRpcErrorObject {
        match self {
            McpError::Codec(CodecError::ParseError(msg)) => {
                JsonRpcErrorObject::parse_error(Some(serde_json::Value::String(msg.clone())))
            }
            McpError::Codec(CodecError::InvalidRequest(msg)) => {
                JsonRpcErrorObject::invalid_request(Some(serde_json::Value::String(msg.clone())))
            }
            McpError::Dispatch(DispatchError::MethodNotFound(method)) => {
                JsonRpcErrorObject::method_not_found(method)
            }
            McpError::Dispatch(DispatchError::InvalidParams(msg)) => {
                JsonRpcErrorObject::invalid_params(msg)
            }
            McpError::Dispatch(DispatchError::Internal(msg)) => {
                JsonRpcErrorObject::internal_error(Some(msg.clone()))
            }
            McpError::Domain(DomainError::ToolNotFound(name)) => {
                JsonRpcErrorObject::server_error(-32001, &format!("Tool not found: {name}"), None)
            }
            McpError::Domain(DomainError::ResourceNotFound(uri)) => JsonRpcErrorObject::server_error(
                -32002,
                &format!("Resource not found: {uri}"),
                None,
            ),
            McpError::Domain(DomainError::PromptNotFound(name)) => JsonRpcErrorObject::server_error(
                -32003,
                &format!("Prompt not found: {name}"),
                None,
            ),
            McpError::Domain(DomainError::InvalidUri(uri)) => {
                JsonRpcErrorObject::server_error(-32004, &format!("Invalid URI: {uri}"), None)
            }
            McpError::Domain(DomainError::MissingRequiredArguments(names)) => {
                JsonRpcErrorObject::invalid_params(&format!(
                    "missing required arguments: {names:?}"
                ))
            }
            McpError::Domain(DomainError::ToolExecutionFailed(msg)) => JsonRpcErrorObject::internal_error(
                Some(format!("tool execution failed: {msg}")),
            ),
            McpError::Domain(DomainError::ResourceExecutionFailed(msg)) => {
                JsonRpcErrorObject::internal_error(Some(format!("resource execution failed: {msg}")))
            }
            McpError::Transport(TransportError::SessionRequired) => {
                JsonRpcErrorObject::server_error(-32000, "Session ID required", None)
            }
            McpError::Transport(TransportError::InvalidSession) => {
                JsonRpcErrorObject::server_error(-32000, "Invalid session", None)
            }
            McpError::Transport(TransportError::UnsupportedProtocolVersion { expected, actual }) => {
                JsonRpcErrorObject::invalid_params_with_data(
                    &format!("unsupported protocol version, expected {expected}"),
                    serde_json::json!({ "supported": [expected], "received": actual }),
                )
            }
            McpError::Transport(TransportError::OriginForbidden(origin)) => {
                JsonRpcErrorObject::server_error(-32005, &format!("origin not allowed: {origin}"), None)
            }
            McpError::Transport(TransportError::BindFailed(msg)) => {
                JsonRpcErrorObject::internal_error(Some(format!("bind failed: {msg}")))
            }
            McpError::Transport(TransportError::SlotAlreadyWritten) => {
                JsonRpcErrorObject::internal_error(Some(
                    "response slot already written".to_string(),
                ))
            }
            McpError::Transport(TransportError::Closed) => {
                JsonRpcErrorObject::internal_error(Some("transport is closed".to_string()))
            }
            McpError::VersionMismatch { expected, actual } => {
                JsonRpcErrorObject::invalid_params_with_data(
                    &format!("protocol version mismatch: expected {expected}, got {actual}"),
                    serde_json::json!({ "supported": [expected], "received": actual }),
                )
            }
            McpError::Serialization(err) => {
                JsonRpcErrorObject::internal_error(Some(format!("serialization error: {err}")))
            }
        }
    }
}

impl mcp_rt_json_rpc::r#async::ToJsonRpcError for McpError {
    fn to_error_object(&self) -> JsonRpcErrorObject {
        McpError::to_error_object(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tool_not_found_maps_to_reserved_server_error_range() {
        let err = McpError::tool_not_found("greet");
        let obj = err.to_error_object();
        assert_eq!(obj.code, -32001);
    }

    #[test]
    fn missing_required_arguments_maps_to_invalid_params() {
        let err = McpError::missing_required_arguments(vec!["name".to_string()]);
        let obj = err.to_error_object();
        assert_eq!(obj.code, -32602);
    }

    #[test]
    fn version_mismatch_maps_to_invalid_params() {
        let err = McpError::VersionMismatch {
            expected: "2025-06-18".to_string(),
            actual: "2024-11-05".to_string(),
        };
        let obj = err.to_error_object();
        assert_eq!(obj.code, -32602);
        assert_eq!(
            obj.data,
            Some(serde_json::json!({ "supported": ["2025-06-18"], "received": "2024-11-05" }))
        );
    }

    #[test]
    fn unsupported_protocol_version_carries_structured_data() {
        let err = McpError::Transport(TransportError::UnsupportedProtocolVersion {
            expected: "2025-06-18".to_string(),
            actual: "2024-11-05".to_string(),
        });
        let obj = err.to_error_object();
        assert_eq!(obj.code, -32602);
        assert_eq!(
            obj.data,
            Some(serde_json::json!({ "supported": ["2025-06-18"], "received": "2024-11-05" }))
        );
    }
}
