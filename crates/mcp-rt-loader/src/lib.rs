//! Manifest-driven auto-registration (§4.10): scan a directory of
//! `tools/`, `resources/`, and `prompts/` subfolders, parse each YAML
//! manifest, resolve its `handler` key against a host-supplied
//! [`HandlerTable`], and register the result.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use mcp_rt_loader::{AutoLoader, HandlerTable};
//! use mcp_rt_server::{PromptRegistry, ResourceRegistry, ToolRegistry};
//!
//! let handlers = HandlerTable::new();
//! let loader = AutoLoader::new(handlers);
//! let summary = loader.load_into(
//!     std::path::Path::new("./components"),
//!     &ToolRegistry::new(),
//!     &ResourceRegistry::new(),
//!     &PromptRegistry::new(),
//! );
//! println!("loaded {} tools", summary.tools);
//! ```

pub mod handlers;
pub mod loader;
pub mod manifest;
pub mod prelude;

pub use handlers::{HandlerTable, PromptRenderer};
pub use loader::{AutoLoader, LoadSummary};
