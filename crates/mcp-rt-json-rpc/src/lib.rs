//! # JSON-RPC 2.0 message codec and dispatcher
//!
//! A pure, transport-agnostic JSON-RPC 2.0 implementation with a clean
//! domain/protocol separation. This crate owns message parsing, the wire
//! types, and method dispatch; it knows nothing about stdio, HTTP, or any
//! other transport.
//!
//! ## Architecture
//!
//! ```rust,ignore
//! // Handlers return domain errors only
//! #[async_trait]
//! impl JsonRpcHandler for MyHandler {
//!     type Error = MyDomainError;  // Not JsonRpcError!
//!
//!     async fn handle(&self, ...) -> Result<Value, MyDomainError> {
//!         Err(MyDomainError::InvalidInput("bad data".to_string()))
//!     }
//! }
//!
//! // Dispatcher converts domain errors to protocol errors automatically
//! let dispatcher: JsonRpcDispatcher<MyDomainError> = JsonRpcDispatcher::new();
//! ```

pub mod error;
pub mod request;
pub mod response;
pub mod notification;
pub mod dispatch;
pub mod prelude;
pub mod types;

#[cfg(feature = "async")]
pub mod r#async;

// Re-export main types
pub use error::{JsonRpcError, JsonRpcErrorCode};
pub use request::{JsonRpcRequest, RequestParams};
pub use response::{JsonRpcResponse, ResponseResult, JsonRpcMessage};
pub use notification::JsonRpcNotification;
pub use types::{RequestId, JsonRpcVersion};
pub use dispatch::{IncomingMessage, JsonRpcMessageResult, parse_json_rpc_message};

#[cfg(feature = "async")]
pub use r#async::{JsonRpcHandler, JsonRpcDispatcher, SessionContext};

/// JSON-RPC 2.0 version constant
pub const JSONRPC_VERSION: &str = "2.0";

/// Standard JSON-RPC 2.0 error codes
pub mod error_codes {
    pub const PARSE_ERROR: i64 = -32700;
    pub const INVALID_REQUEST: i64 = -32600;
    pub const METHOD_NOT_FOUND: i64 = -32601;
    pub const INVALID_PARAMS: i64 = -32602;
    pub const INTERNAL_ERROR: i64 = -32603;
    
    // Server error range: -32099 to -32000
    pub const SERVER_ERROR_START: i64 = -32099;
    pub const SERVER_ERROR_END: i64 = -32000;
}