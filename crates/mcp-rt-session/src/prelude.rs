//! Convenient re-exports.
//!
//! ```rust,no_run
//! use mcp_rt_session::prelude::*;
//! ```

pub use crate::traits::{BoxedSessionStorage, SessionInfo, SessionStorage, SessionStorageError};

pub use crate::in_memory::{InMemoryConfig, InMemoryError, InMemorySessionStorage, InMemoryStats};

pub use crate::{create_default_storage, create_memory_storage, StorageResult};
