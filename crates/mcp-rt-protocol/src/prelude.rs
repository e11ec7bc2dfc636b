//! Convenience re-export of the types most call sites need.
//!
//! ```rust,no_run
//! use mcp_rt_protocol::prelude::*;
//! ```

pub use crate::content::{BlobResourceContents, ContentBlock, ResourceContents, TextResourceContents};
pub use crate::errors::{CodecError, DispatchError, DomainError, McpError, TransportError};
pub use crate::initialize::{
    ClientCapabilities, Implementation, InitializeRequest, InitializeResult, PromptsCapabilities,
    ResourcesCapabilities, ServerCapabilities, ToolsCapabilities,
};
pub use crate::meta::{Annotations, Cursor, Meta, ProgressToken};
pub use crate::observability::{Clock, LogFields, Logger, NoopLogger, SystemClock, TracingLogger};
pub use crate::notifications::{
    CancelledNotification, InitializedNotification, Notification, NotificationParams,
    PromptListChangedNotification, ResourceListChangedNotification, ResourceUpdatedNotification,
    ToolListChangedNotification, INITIALIZED_METHOD,
};
pub use crate::ping::{EmptyResult, PingParams};
pub use crate::prompts::{
    GetPromptParams, GetPromptResult, ListPromptsParams, ListPromptsResult, Prompt, PromptArgument,
    PromptMessage, Role, render_messages, render_template,
};
pub use crate::resources::{
    ListResourcesParams, ListResourcesResult, ReadResourceParams, ReadResourceResult, Resource,
};
pub use crate::tools::{
    CallToolParams, CallToolResult, ListToolsParams, ListToolsResult, Tool, ToolOutcome,
    ToolParameter,
};
pub use crate::version::McpVersion;
pub use crate::McpResult;

pub use serde_json::{json, Value};
pub use std::collections::HashMap;
