//! In-memory implementation of KeyValueBackend for development and testing

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::errors::BackendResult;

use super::r#trait::KeyValueBackend;

/// In-memory key-value backend
///
/// Keys live in a [`BTreeMap`] so prefix scans are ordered range reads.
/// Cloning is cheap; all clones share the same data.
#[derive(Clone, Default)]
pub struct MemoryBackend {
    data: Arc<RwLock<BTreeMap<String, String>>>,
}

impl MemoryBackend {
    /// Create a new empty backend
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys
    pub async fn len(&self) -> usize {
        self.data.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.data.read().await.is_empty()
    }

    /// Copy of every stored key/value pair
    pub async fn snapshot(&self) -> BTreeMap<String, String> {
        self.data.read().await.clone()
    }
}

#[async_trait]
impl KeyValueBackend for MemoryBackend {
    async fn set(&self, key: &str, value: &str) -> BackendResult<()> {
        self.data
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn set_if_absent(&self, key: &str, value: &str) -> BackendResult<bool> {
        let mut data = self.data.write().await;

        if data.contains_key(key) {
            return Ok(false);
        }

        data.insert(key.to_string(), value.to_string());
        Ok(true)
    }

    async fn set_if_present(&self, key: &str, value: &str) -> BackendResult<bool> {
        let mut data = self.data.write().await;

        match data.get_mut(key) {
            Some(existing) => {
                *existing = value.to_string();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn get(&self, key: &str) -> BackendResult<Option<String>> {
        Ok(self.data.read().await.get(key).cloned())
    }

    async fn exists(&self, key: &str) -> BackendResult<bool> {
        Ok(self.data.read().await.contains_key(key))
    }

    async fn delete(&self, key: &str) -> BackendResult<bool> {
        Ok(self.data.write().await.remove(key).is_some())
    }

    async fn scan_prefix(&self, prefix: &str) -> BackendResult<Vec<String>> {
        let data = self.data.read().await;

        Ok(data
            .range(prefix.to_string()..)
            .take_while(|(key, _)| key.starts_with(prefix))
            .map(|(key, _)| key.clone())
            .collect())
    }
}
