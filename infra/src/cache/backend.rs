//! `KeyValueBackend` implementation over Redis

use async_trait::async_trait;
use relay_core::errors::BackendResult;
use relay_core::repositories::KeyValueBackend;

use super::redis_client::RedisClient;

#[async_trait]
impl KeyValueBackend for RedisClient {
    async fn set(&self, key: &str, value: &str) -> BackendResult<()> {
        Ok(RedisClient::set(self, key, value).await?)
    }

    async fn set_if_absent(&self, key: &str, value: &str) -> BackendResult<bool> {
        Ok(RedisClient::set_if_absent(self, key, value).await?)
    }

    async fn set_if_present(&self, key: &str, value: &str) -> BackendResult<bool> {
        Ok(RedisClient::set_if_present(self, key, value).await?)
    }

    async fn get(&self, key: &str) -> BackendResult<Option<String>> {
        Ok(RedisClient::get(self, key).await?)
    }

    async fn exists(&self, key: &str) -> BackendResult<bool> {
        Ok(RedisClient::exists(self, key).await?)
    }

    async fn delete(&self, key: &str) -> BackendResult<bool> {
        Ok(RedisClient::delete(self, key).await?)
    }

    async fn scan_prefix(&self, prefix: &str) -> BackendResult<Vec<String>> {
        Ok(RedisClient::scan_prefix(self, prefix).await?)
    }

    async fn health_check(&self) -> BackendResult<bool> {
        Ok(RedisClient::health_check(self).await?)
    }
}
