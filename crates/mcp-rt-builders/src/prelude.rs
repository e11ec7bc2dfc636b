//! Convenience re-export of the types most call sites need.

pub use crate::prompt::PromptBuilder;
pub use crate::resource::ResourceBuilder;
pub use crate::tool::ToolBuilder;

pub use mcp_rt_protocol::prelude::*;
pub use mcp_rt_server::{McpPrompt, McpResource, McpTool};
