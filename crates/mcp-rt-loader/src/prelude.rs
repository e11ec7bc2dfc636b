//! Convenience re-export of the types most call sites need.

pub use crate::handlers::{HandlerTable, PromptRenderer};
pub use crate::loader::{AutoLoader, LoadSummary};
