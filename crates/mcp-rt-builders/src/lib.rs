//! Runtime construction of tools, resources, and prompts for hosts that
//! assemble their capability set from data rather than types — the
//! auto-loader (§4.10) builds exactly these from a manifest's `handler` key.
//!
//! ```rust,no_run
//! use mcp_rt_builders::ToolBuilder;
//! use mcp_rt_protocol::tools::{ToolOutcome, ToolParameter};
//!
//! let tool = ToolBuilder::new("echo")
//!     .parameter(ToolParameter::new("text", "string").required())
//!     .handler(|args, _session| async move {
//!         let text = args.get("text").and_then(|v| v.as_str()).unwrap_or_default().to_string();
//!         Ok(ToolOutcome::Text(text))
//!     })
//!     .build();
//! ```

pub mod prelude;
pub mod prompt;
pub mod resource;
pub mod tool;

pub use prompt::{DynamicPrompt, PromptBuilder};
pub use resource::{DynamicResource, ResourceBuilder, ResourceFn};
pub use tool::{DynamicTool, ToolBuilder, ToolFn};
