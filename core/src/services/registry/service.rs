//! Token registry: existence and last-used tracking

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::domain::entities::token::{encode_last_used, parse_last_used, Token, TokenRecord};
use crate::domain::keys::{token_from_key, token_key, TOKEN_PREFIX};
use crate::errors::{BackendError, RelayError, RelayResult};
use crate::repositories::KeyValueBackend;

/// Source of truth for which tokens exist and when each was last used
///
/// Every record lives at `tokens:<token>` and holds the last-used timestamp.
/// Timestamp updates are last-write-wins; no read-modify-write is performed.
pub struct TokenRegistry<B: KeyValueBackend> {
    backend: Arc<B>,
}

impl<B: KeyValueBackend> Clone for TokenRegistry<B> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
        }
    }
}

impl<B: KeyValueBackend> TokenRegistry<B> {
    pub fn new(backend: Arc<B>) -> Self {
        Self { backend }
    }

    /// Register a new token with `lastUsed = now`
    ///
    /// # Returns
    /// * `Ok(())` - Token created
    /// * `Err(RelayError::AlreadyExists)` - Token already registered; its record is untouched
    /// * `Err(RelayError::Backend)` - Backend failure
    pub async fn register(&self, token: &Token) -> RelayResult<()> {
        self.register_at(token, Utc::now()).await
    }

    /// Register a token with an explicit last-used time
    pub async fn register_at(&self, token: &Token, last_used: DateTime<Utc>) -> RelayResult<()> {
        let created = self
            .backend
            .set_if_absent(&token_key(token), &encode_last_used(last_used))
            .await?;

        if !created {
            debug!("Token '{}' is already registered", token);
            return Err(RelayError::AlreadyExists {
                token: token.to_string(),
            });
        }

        info!("Registered token '{}'", token);
        Ok(())
    }

    /// Refresh `lastUsed` to now
    ///
    /// The write only lands if the record still exists, so a touch racing a reap
    /// cannot bring a removed token back.
    pub async fn touch(&self, token: &Token) -> RelayResult<()> {
        self.touch_at(token, Utc::now()).await
    }

    /// Refresh `lastUsed` to an explicit time
    pub async fn touch_at(&self, token: &Token, last_used: DateTime<Utc>) -> RelayResult<()> {
        let updated = self
            .backend
            .set_if_present(&token_key(token), &encode_last_used(last_used))
            .await?;

        if !updated {
            return Err(RelayError::TokenNotFound {
                token: token.to_string(),
            });
        }

        debug!("Touched token '{}'", token);
        Ok(())
    }

    /// Whether the token is registered
    ///
    /// Never fails: a backend error is logged and reported as "does not exist".
    pub async fn exists(&self, token: &Token) -> bool {
        match self.backend.exists(&token_key(token)).await {
            Ok(exists) => exists,
            Err(e) => {
                error!("Failed to check existence of token '{}': {}", token, e);
                false
            }
        }
    }

    /// When the token was last used
    pub async fn last_used(&self, token: &Token) -> RelayResult<DateTime<Utc>> {
        let raw = self
            .backend
            .get(&token_key(token))
            .await?
            .ok_or_else(|| RelayError::TokenNotFound {
                token: token.to_string(),
            })?;

        parse_last_used(&raw).ok_or_else(|| {
            warn!("Token '{}' has an unreadable last-used value '{}'", token, raw);
            RelayError::Backend(BackendError::new(format!(
                "malformed last-used timestamp for token {}",
                token
            )))
        })
    }

    /// Full registry record for the token
    pub async fn record(&self, token: &Token) -> RelayResult<TokenRecord> {
        let last_used = self.last_used(token).await?;
        Ok(TokenRecord::new(token.clone(), last_used))
    }

    /// Delete the registry record only; namespaced data is left alone
    pub async fn remove(&self, token: &Token) -> RelayResult<()> {
        let removed = self.backend.delete(&token_key(token)).await?;

        if !removed {
            return Err(RelayError::TokenNotFound {
                token: token.to_string(),
            });
        }

        info!("Removed registry record for token '{}'", token);
        Ok(())
    }

    /// Enumerate every registered token
    ///
    /// Records whose suffix is not a valid token (written before token validation
    /// existed) are skipped with a warning; their namespaces cannot be told apart
    /// safely.
    pub async fn list_tokens(&self) -> RelayResult<Vec<Token>> {
        let keys = self.backend.scan_prefix(TOKEN_PREFIX).await?;

        let tokens = keys
            .iter()
            .filter_map(|key| {
                let raw = token_from_key(key)?;
                match Token::parse(raw) {
                    Ok(token) => Some(token),
                    Err(e) => {
                        warn!("Skipping registry key '{}': {}", key, e);
                        None
                    }
                }
            })
            .collect::<Vec<_>>();

        debug!("Listed {} registered tokens", tokens.len());
        Ok(tokens)
    }
}
