//! Convenient re-exports.
//!
//! ```rust,no_run
//! use mcp_rt_http::prelude::*;
//! ```

pub use crate::cors::CorsLayer;
pub use crate::protocol::{
    accept_allows_event_stream, accept_allows_json_and_event_stream, content_type_is_json,
    extract_last_event_id, extract_origin, extract_protocol_version, extract_session_id,
};
pub use crate::server::{HttpMcpServer, HttpMcpServerBuilder, ServerConfig, ServerStats};
pub use crate::sse::{SseEvent, SseManager};
pub use crate::transport::{BoxBody, HttpTransport, HttpTransportConfig, TransportState};

pub use crate::{JsonRpcDispatcher, JsonRpcHandler};
pub use mcp_rt_protocol::prelude::*;
