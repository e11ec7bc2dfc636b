//! Convenience re-export of the types most call sites need.
//!
//! ```rust,no_run
//! use mcp_rt_server::prelude::*;
//! ```

pub use mcp_rt_protocol::prelude::*;

pub use crate::builder::McpServerBuilder;
pub use crate::prompt::{McpPrompt, PromptRegistry};
pub use crate::resource::{McpResource, ResourceOutcome, ResourceRegistry};
pub use crate::server::{McpServer, ServerConfig};
pub use crate::tool::{McpTool, ToolRegistry};
pub use crate::McpResult;

pub use async_trait::async_trait;
pub use std::sync::Arc;
