//! The core capability model for a Model Context Protocol server: tool,
//! resource, and prompt registries, the `initialize`/`ping` lifecycle
//! handler, and the builder that wires them behind the stdio or HTTP
//! transport (§4.5-§4.10).
//!
//! ```rust,no_run
//! use mcp_rt_server::McpServerBuilder;
//!
//! #[tokio::main]
//! async fn main() -> std::io::Result<()> {
//!     let server = McpServerBuilder::new("example-server", "0.1.0").build();
//!     server.run_stdio(tokio::io::stdin(), tokio::io::stdout()).await
//! }
//! ```

pub mod builder;
pub mod initialize;
pub mod prelude;
pub mod prompt;
pub mod resource;
pub mod server;
pub mod stdio;
pub mod tool;

pub use builder::McpServerBuilder;
pub use initialize::InitializeHandler;
pub use prompt::{McpPrompt, PromptRegistry, PromptsHandler};
pub use resource::{McpResource, ResourceOutcome, ResourceRegistry, ResourcesHandler};
pub use server::{McpServer, ServerConfig};
pub use stdio::StdioTransport;
pub use tool::{McpTool, ToolRegistry, ToolsHandler};

pub use mcp_rt_json_rpc::r#async::{JsonRpcDispatcher, JsonRpcHandler, SessionContext};
pub use mcp_rt_protocol::errors::McpError;

/// Result type handlers and registries return.
pub type McpResult<T> = Result<T, McpError>;
