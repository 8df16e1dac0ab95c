//! Cache module for the Redis-backed key-value store
//!
//! This module provides the Redis client the relay runs on, including
//! connection retry, command retry and the `KeyValueBackend` adapter.

mod backend;
pub mod redis_client;


pub use redis_client::RedisClient;

// Re-export commonly used types
pub use relay_shared::config::CacheConfig;
