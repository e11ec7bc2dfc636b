//! The only [`SessionStorage`] backend this core ships: sessions live in a
//! `RwLock<HashMap<..>>` for the life of the process (§4.5, §9 decision 2 —
//! no persistent/pluggable backend).

use std::collections::HashMap;
use std::time::SystemTime;

use async_trait::async_trait;
use tokio::sync::RwLock;

use mcp_rt_protocol::observability::{Clock, LogFields, Logger, NoopLogger, SystemClock};
use mcp_rt_protocol::ServerCapabilities;
use crate::{SessionInfo, SessionStorage, SessionStorageError};

fn now_millis(clock: &dyn Clock) -> u64 {
    clock
        .now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

#[derive(Clone)]
pub struct InMemorySessionStorage {
    sessions: std::sync::Arc<RwLock<HashMap<String, SessionInfo>>>,
    config: InMemoryConfig,
    logger: std::sync::Arc<dyn Logger>,
    clock: std::sync::Arc<dyn Clock>,
}

#[derive(Debug, Clone)]
pub struct InMemoryConfig {
    pub max_sessions: usize,
}

impl Default for InMemoryConfig {
    fn default() -> Self {
        Self {
            max_sessions: 100_000,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum InMemoryError {
    #[error("session not found: {0}")]
    SessionNotFound(String),
    #[error("maximum sessions limit reached: {0}")]
    MaxSessionsReached(usize),
    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl InMemorySessionStorage {
    pub fn new() -> Self {
        Self::with_config(InMemoryConfig::default())
    }

    pub fn with_config(config: InMemoryConfig) -> Self {
        Self::with_config_and_logger(config, std::sync::Arc::new(NoopLogger))
    }

    pub fn with_logger(logger: std::sync::Arc<dyn Logger>) -> Self {
        Self::with_config_and_logger(InMemoryConfig::default(), logger)
    }

    pub fn with_logger_and_clock(
        logger: std::sync::Arc<dyn Logger>,
        clock: std::sync::Arc<dyn Clock>,
    ) -> Self {
        Self::with_config_and_logger_and_clock(InMemoryConfig::default(), logger, clock)
    }

    pub fn with_config_and_logger(config: InMemoryConfig, logger: std::sync::Arc<dyn Logger>) -> Self {
        Self::with_config_and_logger_and_clock(config, logger, std::sync::Arc::new(SystemClock))
    }

    pub fn with_config_and_logger_and_clock(
        config: InMemoryConfig,
        logger: std::sync::Arc<dyn Logger>,
        clock: std::sync::Arc<dyn Clock>,
    ) -> Self {
        Self {
            sessions: std::sync::Arc::new(RwLock::new(HashMap::new())),
            config,
            logger,
            clock,
        }
    }

    pub async fn stats(&self) -> InMemoryStats {
        let sessions = self.sessions.read().await;
        InMemoryStats {
            session_count: sessions.len(),
            max_sessions: self.config.max_sessions,
        }
    }
}

impl Default for InMemorySessionStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone)]
pub struct InMemoryStats {
    pub session_count: usize,
    pub max_sessions: usize,
}

#[async_trait]
impl SessionStorage for InMemorySessionStorage {
    type Error = SessionStorageError;

    fn backend_name(&self) -> &'static str {
        "InMemory"
    }

    async fn create_session(&self, capabilities: ServerCapabilities) -> Result<SessionInfo, Self::Error> {
        let mut sessions = self.sessions.write().await;

        if sessions.len() >= self.config.max_sessions {
            return Err(SessionStorageError::MaxSessionsReached(self.config.max_sessions));
        }

        let mut session = SessionInfo::with_id_at(uuid::Uuid::now_v7().to_string(), now_millis(self.clock.as_ref()));
        session.server_capabilities = Some(capabilities);

        let session_id = session.session_id.clone();
        sessions.insert(session_id.clone(), session.clone());

        self.logger.debug(
            "created session",
            LogFields::new().with_session_id(session_id),
        );
        Ok(session)
    }

    async fn create_session_with_id(
        &self,
        session_id: String,
        capabilities: ServerCapabilities,
    ) -> Result<SessionInfo, Self::Error> {
        let mut sessions = self.sessions.write().await;

        if sessions.len() >= self.config.max_sessions {
            return Err(SessionStorageError::MaxSessionsReached(self.config.max_sessions));
        }

        let mut session = SessionInfo::with_id_at(session_id.clone(), now_millis(self.clock.as_ref()));
        session.server_capabilities = Some(capabilities);

        sessions.insert(session_id.clone(), session.clone());

        self.logger.debug(
            "created session with explicit id",
            LogFields::new().with_session_id(session_id),
        );
        Ok(session)
    }

    async fn get_session(&self, session_id: &str) -> Result<Option<SessionInfo>, Self::Error> {
        let sessions = self.sessions.read().await;
        Ok(sessions.get(session_id).cloned())
    }

    async fn update_session(&self, session_info: SessionInfo) -> Result<(), Self::Error> {
        let mut sessions = self.sessions.write().await;
        sessions.insert(session_info.session_id.clone(), session_info);
        Ok(())
    }

    async fn set_session_state(&self, session_id: &str, key: &str, value: serde_json::Value) -> Result<(), Self::Error> {
        let mut sessions = self.sessions.write().await;

        if let Some(session) = sessions.get_mut(session_id) {
            session.state.insert(key.to_string(), value);
            session.touch_at(now_millis(self.clock.as_ref()));
            Ok(())
        } else {
            Err(SessionStorageError::SessionNotFound(session_id.to_string()))
        }
    }

    async fn get_session_state(&self, session_id: &str, key: &str) -> Result<Option<serde_json::Value>, Self::Error> {
        let sessions = self.sessions.read().await;

        if let Some(session) = sessions.get(session_id) {
            Ok(session.state.get(key).cloned())
        } else {
            Err(SessionStorageError::SessionNotFound(session_id.to_string()))
        }
    }

    async fn remove_session_state(&self, session_id: &str, key: &str) -> Result<Option<serde_json::Value>, Self::Error> {
        let mut sessions = self.sessions.write().await;

        if let Some(session) = sessions.get_mut(session_id) {
            let removed = session.state.remove(key);
            session.touch_at(now_millis(self.clock.as_ref()));
            Ok(removed)
        } else {
            Err(SessionStorageError::SessionNotFound(session_id.to_string()))
        }
    }

    async fn delete_session(&self, session_id: &str) -> Result<bool, Self::Error> {
        let mut sessions = self.sessions.write().await;
        let removed = sessions.remove(session_id).is_some();
        if removed {
            self.logger.debug(
                "deleted session",
                LogFields::new().with_session_id(session_id.to_string()),
            );
        }
        Ok(removed)
    }

    async fn list_sessions(&self) -> Result<Vec<String>, Self::Error> {
        let sessions = self.sessions.read().await;
        Ok(sessions.keys().cloned().collect())
    }

    async fn expire_sessions(&self, older_than: SystemTime) -> Result<Vec<String>, Self::Error> {
        let mut sessions = self.sessions.write().await;

        let cutoff_millis = older_than
            .duration_since(SystemTime::UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64;

        let mut expired_sessions = Vec::new();

        sessions.retain(|session_id, session_info| {
            if session_info.last_activity < cutoff_millis {
                expired_sessions.push(session_id.clone());
                false
            } else {
                true
            }
        });

        if !expired_sessions.is_empty() {
            self.logger.info(
                &format!("expired {} sessions", expired_sessions.len()),
                LogFields::new(),
            );
        }

        Ok(expired_sessions)
    }

    async fn session_count(&self) -> Result<usize, Self::Error> {
        let sessions = self.sessions.read().await;
        Ok(sessions.len())
    }

    async fn maintenance(&self) -> Result<(), Self::Error> {
        Ok(())
    }
}
