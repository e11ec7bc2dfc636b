//! Model Context Protocol (MCP) domain types, version "2025-06-18" only.
//!
//! This crate carries the wire-shaped request/result/notification types for
//! the three capability families (tools, resources, prompts) plus the
//! `initialize` handshake, the prompt template processor, and the
//! `thiserror` error taxonomy that the dispatcher converts to JSON-RPC
//! error objects at a single boundary. It builds on [`mcp_rt_json_rpc`]
//! for the envelope and has no transport or registry logic of its own.

pub mod content;
pub mod errors;
pub mod initialize;
pub mod meta;
pub mod notifications;
pub mod observability;
pub mod ping;
pub mod prelude;
pub mod prompts;
pub mod resources;
pub mod tools;
pub mod version;

pub use errors::{CodecError, DispatchError, DomainError, McpError, TransportError};
pub use initialize::{ClientCapabilities, Implementation, InitializeRequest, InitializeResult, ServerCapabilities};
pub use observability::{Clock, LogFields, Logger, NoopLogger, SystemClock, TracingLogger};
pub use ping::{EmptyResult, PingParams};
pub use version::{McpVersion, MCP_PROTOCOL_VERSION};

/// Common result type for MCP domain operations.
pub type McpResult<T> = Result<T, McpError>;
