//! Streamable-HTTP + SSE transport for the MCP core (§4.4).
//!
//! One endpoint path serves `POST` (JSON-RPC request/notification) and
//! `GET` (`text/event-stream`). There is no multi-protocol-version routing,
//! no progress-token streaming, and no chunked response bodies: exactly the
//! algorithm in §4.4, nothing more.
//!
//! ```rust,no_run
//! use mcp_rt_http::HttpMcpServer;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let server = HttpMcpServer::builder()
//!         .bind_address("127.0.0.1:8080".parse()?)
//!         .build();
//!     server.run().await?;
//!     Ok(())
//! }
//! ```

pub mod cors;
pub mod prelude;
pub mod protocol;
pub mod server;
pub mod sse;
pub mod transport;

pub use cors::CorsLayer;
pub use protocol::{
    accept_allows_event_stream, accept_allows_json_and_event_stream, content_type_is_json,
    extract_last_event_id, extract_origin, extract_protocol_version, extract_session_id,
};
pub use server::{HttpMcpServer, HttpMcpServerBuilder, ServerConfig, ServerStats};
pub use sse::{SseEvent, SseManager};
pub use transport::{BoxBody, HttpTransport, HttpTransportConfig, TransportState};

pub use mcp_rt_json_rpc::r#async::{JsonRpcDispatcher, JsonRpcHandler};
pub use mcp_rt_protocol::*;
