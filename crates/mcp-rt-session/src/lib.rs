//! In-memory session storage for the MCP core (§4.5).
//!
//! One backend, no features: sessions are scoped to the running process.

mod traits;
pub use traits::*;

pub mod in_memory;
pub mod prelude;

pub use in_memory::{InMemoryConfig, InMemoryError, InMemorySessionStorage, InMemoryStats};

pub type StorageResult<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Create a session store with default limits.
pub fn create_default_storage() -> InMemorySessionStorage {
    InMemorySessionStorage::new()
}

/// Create a session store with custom limits.
pub fn create_memory_storage(config: InMemoryConfig) -> InMemorySessionStorage {
    InMemorySessionStorage::with_config(config)
}

#[cfg(test)]
mod integration_tests {
    use super::*;
    use mcp_rt_protocol::ServerCapabilities;

    #[tokio::test]
    async fn storage_trait_compliance() {
        let storage = create_default_storage();

        let session = storage
            .create_session(ServerCapabilities::default())
            .await
            .unwrap();
        let session_id = session.session_id.clone();

        assert!(storage.get_session(&session_id).await.unwrap().is_some());
        assert_eq!(storage.session_count().await.unwrap(), 1);

        storage
            .set_session_state(&session_id, "test", serde_json::json!("value"))
            .await
            .unwrap();
        let value = storage
            .get_session_state(&session_id, "test")
            .await
            .unwrap();
        assert_eq!(value, Some(serde_json::json!("value")));

        let deleted = storage.delete_session(&session_id).await.unwrap();
        assert!(deleted);
        assert_eq!(storage.session_count().await.unwrap(), 0);
    }
}
