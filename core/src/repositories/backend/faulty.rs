//! Fault-injecting backend for failure-path tests

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::errors::{BackendError, BackendResult};

use super::memory::MemoryBackend;
use super::r#trait::KeyValueBackend;

/// Wraps a [`MemoryBackend`] and fails selected operations on demand
#[derive(Default)]
pub struct FaultyBackend {
    inner: MemoryBackend,
    /// Deletes allowed to succeed before every further delete fails
    deletes_before_failure: Mutex<Option<usize>>,
    /// Deletes of keys under these prefixes always fail
    failing_delete_prefixes: Mutex<HashSet<String>>,
    /// Reads of these exact keys always fail
    failing_get_keys: Mutex<HashSet<String>>,
    /// Scans of these exact prefixes always fail
    failing_scan_prefixes: Mutex<HashSet<String>>,
    /// Plain sets of keys under these prefixes always fail
    failing_set_prefixes: Mutex<HashSet<String>>,
    /// Every write fails while set
    fail_writes: Mutex<bool>,
    /// After the first read of a key, overwrite it with the given value
    rewrite_after_read: Mutex<HashMap<String, String>>,
    /// Right before the first delete of a key, write the given pair
    write_before_delete: Mutex<HashMap<String, (String, String)>>,
    writes: AtomicUsize,
}

impl FaultyBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Underlying data, bypassing all faults
    pub fn inner(&self) -> &MemoryBackend {
        &self.inner
    }

    pub fn fail_deletes_after(&self, successes: usize) {
        *self.deletes_before_failure.lock().unwrap() = Some(successes);
    }

    pub fn fail_deletes_under(&self, prefix: &str) {
        self.failing_delete_prefixes
            .lock()
            .unwrap()
            .insert(prefix.to_string());
    }

    pub fn fail_get(&self, key: &str) {
        self.failing_get_keys.lock().unwrap().insert(key.to_string());
    }

    pub fn fail_scan(&self, prefix: &str) {
        self.failing_scan_prefixes
            .lock()
            .unwrap()
            .insert(prefix.to_string());
    }

    pub fn fail_sets_under(&self, prefix: &str) {
        self.failing_set_prefixes
            .lock()
            .unwrap()
            .insert(prefix.to_string());
    }

    pub fn fail_writes(&self, enabled: bool) {
        *self.fail_writes.lock().unwrap() = enabled;
    }

    /// Simulate a concurrent writer refreshing `key` right after it is first read
    pub fn rewrite_after_first_read(&self, key: &str, value: &str) {
        self.rewrite_after_read
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
    }

    /// Simulate a concurrent writer landing `(late_key, late_value)` just
    /// before `key` is deleted
    pub fn write_before_delete(&self, key: &str, late_key: &str, late_value: &str) {
        self.write_before_delete
            .lock()
            .unwrap()
            .insert(key.to_string(), (late_key.to_string(), late_value.to_string()));
    }

    /// Number of successful writes (set, conditional set, delete)
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn clear_faults(&self) {
        *self.deletes_before_failure.lock().unwrap() = None;
        self.failing_delete_prefixes.lock().unwrap().clear();
        self.failing_get_keys.lock().unwrap().clear();
        self.failing_scan_prefixes.lock().unwrap().clear();
        self.failing_set_prefixes.lock().unwrap().clear();
        *self.fail_writes.lock().unwrap() = false;
    }

    fn check_write(&self) -> BackendResult<()> {
        let failing = *self.fail_writes.lock().unwrap();
        if failing {
            return Err(BackendError::new("injected write failure"));
        }
        Ok(())
    }

    fn record_write(&self) {
        self.writes.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl KeyValueBackend for FaultyBackend {
    async fn set(&self, key: &str, value: &str) -> BackendResult<()> {
        self.check_write()?;
        let blocked = self
            .failing_set_prefixes
            .lock()
            .unwrap()
            .iter()
            .any(|prefix| key.starts_with(prefix.as_str()));
        if blocked {
            return Err(BackendError::new(format!("injected write failure for {}", key)));
        }
        self.inner.set(key, value).await?;
        self.record_write();
        Ok(())
    }

    async fn set_if_absent(&self, key: &str, value: &str) -> BackendResult<bool> {
        self.check_write()?;
        let written = self.inner.set_if_absent(key, value).await?;
        if written {
            self.record_write();
        }
        Ok(written)
    }

    async fn set_if_present(&self, key: &str, value: &str) -> BackendResult<bool> {
        self.check_write()?;
        let written = self.inner.set_if_present(key, value).await?;
        if written {
            self.record_write();
        }
        Ok(written)
    }

    async fn get(&self, key: &str) -> BackendResult<Option<String>> {
        let failing = self.failing_get_keys.lock().unwrap().contains(key);
        if failing {
            return Err(BackendError::new(format!("injected read failure for {}", key)));
        }

        let value = self.inner.get(key).await?;

        let rewrite = self.rewrite_after_read.lock().unwrap().remove(key);
        if let Some(new_value) = rewrite {
            self.inner.set(key, &new_value).await?;
        }

        Ok(value)
    }

    async fn exists(&self, key: &str) -> BackendResult<bool> {
        let failing = self.failing_get_keys.lock().unwrap().contains(key);
        if failing {
            return Err(BackendError::new(format!("injected read failure for {}", key)));
        }
        self.inner.exists(key).await
    }

    async fn delete(&self, key: &str) -> BackendResult<bool> {
        let blocked = self
            .failing_delete_prefixes
            .lock()
            .unwrap()
            .iter()
            .any(|prefix| key.starts_with(prefix.as_str()));
        if blocked {
            return Err(BackendError::new(format!("injected delete failure for {}", key)));
        }

        {
            let mut budget = self.deletes_before_failure.lock().unwrap();
            if let Some(remaining) = budget.as_mut() {
                if *remaining == 0 {
                    return Err(BackendError::new("injected delete failure"));
                }
                *remaining -= 1;
            }
        }

        let late_write = self.write_before_delete.lock().unwrap().remove(key);
        if let Some((late_key, late_value)) = late_write {
            self.inner.set(&late_key, &late_value).await?;
        }

        let deleted = self.inner.delete(key).await?;
        self.record_write();
        Ok(deleted)
    }

    async fn scan_prefix(&self, prefix: &str) -> BackendResult<Vec<String>> {
        let failing = self.failing_scan_prefixes.lock().unwrap().contains(prefix);
        if failing {
            return Err(BackendError::new(format!("injected scan failure for {}", prefix)));
        }
        self.inner.scan_prefix(prefix).await
    }
}
