//! Storage Port Module
//!
//! The engine persists through an injected key-value backend. The engine
//! owns a reserved key namespace inside the backend and never enumerates
//! or deletes keys outside it; everything else about the backend is opaque.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::Result;

// == Cache Backend ==
/// Durable key-value storage collaborator.
///
/// Implementations map errors into `CacheError::Storage`. Single-process
/// exclusive ownership of the engine's namespace is assumed; the backend
/// itself makes no atomicity guarantees across keys.
#[async_trait]
pub trait CacheBackend: Send + Sync + 'static {
    /// Reads the raw bytes stored under `key`, or `None` if absent.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Writes `bytes` under `key`, replacing any previous value.
    async fn set(&self, key: &str, bytes: Vec<u8>) -> Result<()>;

    /// Deletes `key`. Deleting an absent key is a no-op.
    async fn delete(&self, key: &str) -> Result<()>;

    /// Lists every key currently present in the backend.
    async fn list_keys(&self) -> Result<Vec<String>>;
}

// == Memory Backend ==
/// In-memory backend, the reference implementation.
///
/// Suitable for tests and for hosts that want a purely in-process cache;
/// real deployments inject their own durable backend.
#[derive(Debug, Default, Clone)]
pub struct MemoryBackend {
    entries: Arc<RwLock<HashMap<String, Vec<u8>>>>,
}

impl MemoryBackend {
    /// Creates an empty in-memory backend.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CacheBackend for MemoryBackend {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let entries = self.entries.read().await;
        Ok(entries.get(key).cloned())
    }

    async fn set(&self, key: &str, bytes: Vec<u8>) -> Result<()> {
        let mut entries = self.entries.write().await;
        entries.insert(key.to_string(), bytes);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let mut entries = self.entries.write().await;
        entries.remove(key);
        Ok(())
    }

    async fn list_keys(&self) -> Result<Vec<String>> {
        let entries = self.entries.read().await;
        Ok(entries.keys().cloned().collect())
    }
}
