//! Relay service implementation

use std::sync::Arc;
use tracing::{debug, error};

use crate::domain::entities::token::Token;
use crate::errors::{RelayError, RelayResult};
use crate::repositories::KeyValueBackend;
use crate::services::registry::TokenRegistry;
use crate::services::store::NamespacedStore;

/// Register/set/get orchestration on top of the registry and the store
///
/// The existence check before each set/get is best-effort: a reap can land
/// between the check and the write. The reaper's staleness threshold is far
/// larger than any request, and the touch only updates existing records, so the
/// window only matters for tokens idle for the whole threshold.
pub struct RelayService<B: KeyValueBackend> {
    registry: TokenRegistry<B>,
    store: NamespacedStore<B>,
}

impl<B: KeyValueBackend> RelayService<B> {
    pub fn new(backend: Arc<B>) -> Self {
        Self {
            registry: TokenRegistry::new(Arc::clone(&backend)),
            store: NamespacedStore::new(backend),
        }
    }

    pub fn registry(&self) -> &TokenRegistry<B> {
        &self.registry
    }

    pub fn store(&self) -> &NamespacedStore<B> {
        &self.store
    }

    /// Register a new token
    ///
    /// # Returns
    /// * `Ok(token)` - The registered token, echoed back
    /// * `Err(RelayError::InvalidToken)` - Malformed token
    /// * `Err(RelayError::AlreadyExists)` - Token already registered
    pub async fn handle_register(&self, raw_token: &str) -> RelayResult<String> {
        let token = Token::parse(raw_token)?;

        if self.registry.exists(&token).await {
            return Err(RelayError::AlreadyExists {
                token: token.into_inner(),
            });
        }

        // A concurrent registration can still win between the check and the
        // insert; the insert itself is conditional and reports that as a conflict.
        self.registry.register(&token).await?;
        Ok(token.into_inner())
    }

    /// Store a value under `(token, key)` and refresh the token's last use
    ///
    /// If the touch lands but the write fails, `lastUsed` moves forward with no
    /// data change. The touch is a liveness signal, not a commit point.
    pub async fn handle_set(&self, raw_token: &str, key: &str, value: &str) -> RelayResult<()> {
        let token = self.require_token(raw_token).await?;

        debug!("Setting token [{}], key [{}]", token, key);

        self.registry.touch(&token).await?;

        if let Err(e) = self.store.set(&token, key, value).await {
            error!("Failed to store key '{}' for token '{}': {}", key, token, e);
            return Err(e);
        }

        Ok(())
    }

    /// Read the value under `(token, key)`
    ///
    /// # Returns
    /// * `Ok(value)` - Stored value
    /// * `Err(RelayError::TokenNotFound)` - Unknown token
    /// * `Err(RelayError::KeyNotFound)` - Known token, key never set
    pub async fn handle_get(&self, raw_token: &str, key: &str) -> RelayResult<String> {
        let token = self.require_token(raw_token).await?;
        self.store.get(&token, key).await
    }

    async fn require_token(&self, raw_token: &str) -> RelayResult<Token> {
        let token = Token::parse(raw_token)?;

        if !self.registry.exists(&token).await {
            return Err(RelayError::TokenNotFound {
                token: token.into_inner(),
            });
        }

        Ok(token)
    }
}
