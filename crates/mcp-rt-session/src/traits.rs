//! Session storage trait and the session record it stores.
//!
//! This core keeps sessions in memory only (§4.5, §9 Open Question
//! decision): no SQLite/Postgres/DynamoDB backend, no cross-restart
//! persistence. `SessionStorage` stays a trait rather than a concrete
//! struct so a transport can depend on the interface, but
//! [`crate::in_memory::InMemorySessionStorage`] is the only implementation.
//!
//! SSE event framing and the strictly-monotonic event `id` counter live in
//! `mcp-rt-http`'s `SseManager` (§4.4, §6.5) — this crate only tracks
//! session identity, negotiated capabilities, and the per-session state map.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::time::SystemTime;

use mcp_rt_protocol::{ClientCapabilities, ServerCapabilities};

/// A single MCP session: identity, negotiated capabilities, and arbitrary
/// server-side state keyed by string (§4.5).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionInfo {
    /// Unique session identifier (UUID v7 for temporal ordering; its
    /// hyphenated hex form is already valid `Mcp-Session-Id` text per §6.1).
    pub session_id: String,
    pub client_capabilities: Option<ClientCapabilities>,
    pub server_capabilities: Option<ServerCapabilities>,
    pub state: HashMap<String, Value>,
    pub created_at: u64,
    pub last_activity: u64,
    pub is_initialized: bool,
}

impl SessionInfo {
    /// Create a session with a caller-chosen ID and an explicit creation
    /// time. Callers mint `now` through an injected
    /// [`Clock`](mcp_rt_protocol::observability::Clock) rather than reading
    /// the system time directly — this type has no constructor that reads
    /// the clock itself.
    pub fn with_id_at(session_id: String, now: u64) -> Self {
        Self {
            session_id,
            client_capabilities: None,
            server_capabilities: None,
            state: HashMap::new(),
            created_at: now,
            last_activity: now,
            is_initialized: false,
        }
    }

    pub fn touch_at(&mut self, now: u64) {
        self.last_activity = now;
    }

    pub fn is_expired_at(&self, now: u64, timeout_minutes: u64) -> bool {
        let timeout_millis = timeout_minutes * 60 * 1000;
        now - self.last_activity > timeout_millis
    }
}

/// Session CRUD and state storage. One instance per running server.
#[async_trait]
pub trait SessionStorage: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    fn backend_name(&self) -> &'static str;

    /// Create a session with a freshly generated UUID v7 ID.
    async fn create_session(
        &self,
        capabilities: ServerCapabilities,
    ) -> Result<SessionInfo, Self::Error>;

    /// Create a session with a caller-supplied ID. Reserved for tests that
    /// need a predictable session ID.
    async fn create_session_with_id(
        &self,
        session_id: String,
        capabilities: ServerCapabilities,
    ) -> Result<SessionInfo, Self::Error>;

    async fn get_session(&self, session_id: &str) -> Result<Option<SessionInfo>, Self::Error>;

    async fn update_session(&self, session_info: SessionInfo) -> Result<(), Self::Error>;

    async fn set_session_state(
        &self,
        session_id: &str,
        key: &str,
        value: Value,
    ) -> Result<(), Self::Error>;

    async fn get_session_state(
        &self,
        session_id: &str,
        key: &str,
    ) -> Result<Option<Value>, Self::Error>;

    async fn remove_session_state(
        &self,
        session_id: &str,
        key: &str,
    ) -> Result<Option<Value>, Self::Error>;

    async fn delete_session(&self, session_id: &str) -> Result<bool, Self::Error>;

    async fn list_sessions(&self) -> Result<Vec<String>, Self::Error>;

    /// Remove sessions whose last activity predates `older_than`, returning
    /// the removed IDs so the caller can drop any associated SSE streams.
    async fn expire_sessions(&self, older_than: SystemTime) -> Result<Vec<String>, Self::Error>;

    async fn session_count(&self) -> Result<usize, Self::Error>;

    async fn maintenance(&self) -> Result<(), Self::Error>;
}

/// Unified error type for the in-memory backend.
#[derive(Debug, thiserror::Error)]
pub enum SessionStorageError {
    #[error("session not found: {0}")]
    SessionNotFound(String),

    #[error("maximum sessions limit reached: {0}")]
    MaxSessionsReached(usize),

    #[error("serialization error: {0}")]
    SerializationError(String),

    #[error("generic storage error: {0}")]
    Generic(String),
}

impl From<serde_json::Error> for SessionStorageError {
    fn from(err: serde_json::Error) -> Self {
        SessionStorageError::SerializationError(err.to_string())
    }
}

impl From<crate::in_memory::InMemoryError> for SessionStorageError {
    fn from(err: crate::in_memory::InMemoryError) -> Self {
        match err {
            crate::in_memory::InMemoryError::SessionNotFound(id) => {
                SessionStorageError::SessionNotFound(id)
            }
            crate::in_memory::InMemoryError::MaxSessionsReached(limit) => {
                SessionStorageError::MaxSessionsReached(limit)
            }
            crate::in_memory::InMemoryError::SerializationError(e) => {
                SessionStorageError::SerializationError(e.to_string())
            }
        }
    }
}

/// Boxed session storage with the one error type this core produces.
pub type BoxedSessionStorage = dyn SessionStorage<Error = SessionStorageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_info_creation() {
        let session = SessionInfo::with_id_at("test-session".to_string(), 1_000);
        assert!(!session.session_id.is_empty());
        assert!(!session.is_initialized);
        assert!(session.state.is_empty());
    }

    #[test]
    fn session_expiration() {
        let now = 1_000_000_000;
        let session = SessionInfo::with_id_at("test-session".to_string(), now);
        assert!(!session.is_expired_at(now, 30));

        let later = now + (31 * 60 * 1000);
        assert!(session.is_expired_at(later, 30));
    }
}
