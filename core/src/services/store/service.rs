//! Namespaced store: per-token key/value data

use std::sync::Arc;
use tracing::{debug, error, info};

use crate::domain::entities::token::Token;
use crate::domain::keys::{userdata_key, userdata_namespace};
use crate::errors::{RelayError, RelayResult};
use crate::repositories::KeyValueBackend;

/// Maps `(token, key)` pairs onto `userdata:<token>:<key>`
///
/// The store knows nothing about token registration; callers check existence
/// before reading or writing.
pub struct NamespacedStore<B: KeyValueBackend> {
    backend: Arc<B>,
}

impl<B: KeyValueBackend> Clone for NamespacedStore<B> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
        }
    }
}

impl<B: KeyValueBackend> NamespacedStore<B> {
    pub fn new(backend: Arc<B>) -> Self {
        Self { backend }
    }

    /// Write `value` under `(token, key)`, overwriting any previous value
    pub async fn set(&self, token: &Token, key: &str, value: &str) -> RelayResult<()> {
        debug!("Setting token '{}', key '{}'", token, key);
        self.backend.set(&userdata_key(token, key), value).await?;
        Ok(())
    }

    /// Read the value under `(token, key)`
    ///
    /// # Returns
    /// * `Ok(value)` - Stored value
    /// * `Err(RelayError::KeyNotFound)` - Key never set for this token
    /// * `Err(RelayError::Backend)` - Backend failure
    pub async fn get(&self, token: &Token, key: &str) -> RelayResult<String> {
        self.backend
            .get(&userdata_key(token, key))
            .await?
            .ok_or_else(|| RelayError::KeyNotFound {
                token: token.to_string(),
                key: key.to_string(),
            })
    }

    /// Keys currently stored for `token`, without the namespace prefix
    pub async fn keys(&self, token: &Token) -> RelayResult<Vec<String>> {
        let namespace = userdata_namespace(token);
        let keys = self.backend.scan_prefix(&namespace).await?;

        Ok(keys
            .into_iter()
            .filter_map(|key| key.strip_prefix(namespace.as_str()).map(str::to_string))
            .collect())
    }

    /// Remove every entry stored for `token`
    ///
    /// Safe to re-run after a partial failure; an empty namespace is a no-op.
    ///
    /// # Returns
    /// * `Ok(count)` - Number of entries removed by this call
    /// * `Err(RelayError::Backend)` - Enumeration or a delete failed; some entries may remain
    pub async fn delete_all(&self, token: &Token) -> RelayResult<usize> {
        let namespace = userdata_namespace(token);
        let keys = self.backend.scan_prefix(&namespace).await?;

        let mut deleted = 0;
        for key in &keys {
            match self.backend.delete(key).await {
                Ok(true) => deleted += 1,
                Ok(false) => {}
                Err(e) => {
                    error!(
                        "Failed to delete '{}' after removing {} of {} entries for token '{}': {}",
                        key,
                        deleted,
                        keys.len(),
                        token,
                        e
                    );
                    return Err(e.into());
                }
            }
        }

        if deleted > 0 {
            info!("Deleted {} entries for token '{}'", deleted, token);
        }
        Ok(deleted)
    }
}
