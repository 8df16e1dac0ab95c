//! Key-value backend trait defining the storage contract the relay builds on.

use async_trait::async_trait;
use std::sync::Arc;

use crate::errors::BackendResult;

/// Abstraction over a remote key/value store
///
/// Keys and values are strings. Implementations must be safe to share across
/// concurrent requests and the reaper, and must serialize conflicting writes to
/// the same key themselves.
///
/// # Commands
///
/// | Method | Redis equivalent |
/// |--------|------------------|
/// | [`set`](KeyValueBackend::set) | `SET key value` |
/// | [`set_if_absent`](KeyValueBackend::set_if_absent) | `SET key value NX` |
/// | [`set_if_present`](KeyValueBackend::set_if_present) | `SET key value XX` |
/// | [`get`](KeyValueBackend::get) | `GET key` |
/// | [`exists`](KeyValueBackend::exists) | `EXISTS key` |
/// | [`delete`](KeyValueBackend::delete) | `DEL key` |
/// | [`scan_prefix`](KeyValueBackend::scan_prefix) | `SCAN 0 MATCH prefix*` until the cursor wraps |
#[async_trait]
pub trait KeyValueBackend: Send + Sync {
    /// Store a value, overwriting any previous one
    async fn set(&self, key: &str, value: &str) -> BackendResult<()>;

    /// Store a value only if the key does not exist yet
    ///
    /// # Returns
    /// * `Ok(true)` - The value was written
    /// * `Ok(false)` - The key already existed; nothing changed
    async fn set_if_absent(&self, key: &str, value: &str) -> BackendResult<bool>;

    /// Overwrite a value only if the key already exists
    ///
    /// # Returns
    /// * `Ok(true)` - The value was written
    /// * `Ok(false)` - The key did not exist; nothing was created
    async fn set_if_present(&self, key: &str, value: &str) -> BackendResult<bool>;

    /// Read a value, `None` if absent
    async fn get(&self, key: &str) -> BackendResult<Option<String>>;

    /// Check whether a key exists
    async fn exists(&self, key: &str) -> BackendResult<bool>;

    /// Delete a key
    ///
    /// # Returns
    /// * `Ok(true)` - The key existed and was removed
    /// * `Ok(false)` - The key was already absent
    async fn delete(&self, key: &str) -> BackendResult<bool>;

    /// Enumerate every key starting with `prefix`
    ///
    /// The prefix is matched literally. Order is unspecified, and keys written
    /// concurrently with the scan may or may not be included.
    async fn scan_prefix(&self, prefix: &str) -> BackendResult<Vec<String>>;

    /// Check that the backend is reachable
    async fn health_check(&self) -> BackendResult<bool> {
        Ok(true)
    }
}

#[async_trait]
impl<B: KeyValueBackend + ?Sized> KeyValueBackend for Arc<B> {
    async fn set(&self, key: &str, value: &str) -> BackendResult<()> {
        (**self).set(key, value).await
    }

    async fn set_if_absent(&self, key: &str, value: &str) -> BackendResult<bool> {
        (**self).set_if_absent(key, value).await
    }

    async fn set_if_present(&self, key: &str, value: &str) -> BackendResult<bool> {
        (**self).set_if_present(key, value).await
    }

    async fn get(&self, key: &str) -> BackendResult<Option<String>> {
        (**self).get(key).await
    }

    async fn exists(&self, key: &str) -> BackendResult<bool> {
        (**self).exists(key).await
    }

    async fn delete(&self, key: &str) -> BackendResult<bool> {
        (**self).delete(key).await
    }

    async fn scan_prefix(&self, prefix: &str) -> BackendResult<Vec<String>> {
        (**self).scan_prefix(prefix).await
    }

    async fn health_check(&self) -> BackendResult<bool> {
        (**self).health_check().await
    }
}
