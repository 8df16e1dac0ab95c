//! Expiry reaper for periodic removal of stale tokens and their data
//!
//! A sweep lists every registered token and removes the ones whose last use is
//! older than the configured threshold. Removal is ordered: the token's data goes
//! first and its registry record last, so an interrupted cascade always leaves a
//! registered (and therefore retried) token behind, never unreachable data.

use chrono::{DateTime, TimeDelta, Utc};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use relay_shared::config::ReaperConfig;

use crate::domain::entities::token::{threshold_from_std, Token};
use crate::errors::{RelayError, RelayResult};
use crate::repositories::KeyValueBackend;
use crate::services::registry::TokenRegistry;
use crate::services::store::NamespacedStore;

/// What happened to a single token during a sweep
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReapOutcome {
    /// Used within the threshold
    Fresh,
    /// Stale at enumeration time but touched again before deletion
    Refreshed,
    /// Registry record disappeared before it could be examined
    Vanished,
    /// Data and registry record removed
    Reaped { entries: usize },
}

/// Background service removing stale tokens together with their namespaced data
pub struct ExpiryReaper<B: KeyValueBackend + 'static> {
    registry: TokenRegistry<B>,
    store: NamespacedStore<B>,
    config: ReaperConfig,
}

impl<B: KeyValueBackend + 'static> ExpiryReaper<B> {
    /// Create a new reaper sharing `backend` with the request path
    pub fn new(backend: Arc<B>, config: ReaperConfig) -> Self {
        Self {
            registry: TokenRegistry::new(Arc::clone(&backend)),
            store: NamespacedStore::new(backend),
            config,
        }
    }

    pub fn config(&self) -> &ReaperConfig {
        &self.config
    }

    fn threshold(&self) -> TimeDelta {
        threshold_from_std(self.config.stale_after())
    }

    /// Run a single sweep against the current time
    pub async fn run_sweep(&self) -> RelayResult<SweepResult> {
        self.run_sweep_at(Utc::now()).await
    }

    /// Run a single sweep, judging staleness as of `now`
    ///
    /// Per-token failures are collected in the result and retried by the next
    /// sweep. Only a failure to enumerate the registry aborts the sweep.
    pub async fn run_sweep_at(&self, now: DateTime<Utc>) -> RelayResult<SweepResult> {
        if !self.config.enabled {
            return Ok(SweepResult::default());
        }

        info!("Starting expiry sweep");

        let mut tokens = self.registry.list_tokens().await?;
        if tokens.len() > self.config.max_tokens_per_sweep {
            warn!(
                "{} tokens registered, examining the first {} this sweep",
                tokens.len(),
                self.config.max_tokens_per_sweep
            );
            tokens.truncate(self.config.max_tokens_per_sweep);
        }

        let mut result = SweepResult::default();

        for token in tokens {
            result.scanned += 1;

            match self.examine(&token, now).await {
                Ok(ReapOutcome::Fresh) => result.skipped_fresh += 1,
                Ok(ReapOutcome::Refreshed) => {
                    debug!("Token '{}' was used during the sweep, keeping it", token);
                    result.skipped_refreshed += 1;
                }
                Ok(ReapOutcome::Vanished) => result.skipped_vanished += 1,
                Ok(ReapOutcome::Reaped { entries }) => {
                    result.reaped_tokens += 1;
                    result.deleted_entries += entries;
                }
                Err(e) => {
                    error!("Failed to reap token '{}': {}", token, e);
                    result.failed += 1;
                    result.errors.push(format!("{}: {}", token, e));
                }
            }
        }

        info!(
            "Expiry sweep completed - Scanned: {}, Fresh: {}, Refreshed: {}, Vanished: {}, Reaped: {}, Entries: {}, Failed: {}",
            result.scanned,
            result.skipped_fresh,
            result.skipped_refreshed,
            result.skipped_vanished,
            result.reaped_tokens,
            result.deleted_entries,
            result.failed
        );

        Ok(result)
    }

    /// Decide on one token and reap it if it is still stale
    async fn examine(&self, token: &Token, now: DateTime<Utc>) -> RelayResult<ReapOutcome> {
        let threshold = self.threshold();

        match self.registry.record(token).await {
            Ok(record) if !record.is_stale(now, threshold) => return Ok(ReapOutcome::Fresh),
            Ok(_) => {}
            Err(RelayError::TokenNotFound { .. }) => return Ok(ReapOutcome::Vanished),
            Err(e) => return Err(e),
        }

        // Re-read right before deleting; a client may have touched the token
        // since it was enumerated.
        let record = match self.registry.record(token).await {
            Ok(record) if !record.is_stale(now, threshold) => return Ok(ReapOutcome::Refreshed),
            Ok(record) => record,
            Err(RelayError::TokenNotFound { .. }) => return Ok(ReapOutcome::Vanished),
            Err(e) => return Err(e),
        };

        // Data first. If this fails the registry record stays, so the token
        // remains visible and the next sweep retries the cascade.
        let mut entries = self.store.delete_all(token).await?;

        match self.registry.remove(token).await {
            Ok(()) | Err(RelayError::TokenNotFound { .. }) => {}
            Err(e) => return Err(e),
        }

        // A set that passed its existence check before the removal can still
        // land after the first pass; sweep the namespace once more.
        entries += self.store.delete_all(token).await?;

        info!(
            "Reaped token '{}' idle for {}s and {} entries",
            token,
            record.idle_for(now).num_seconds(),
            entries
        );
        Ok(ReapOutcome::Reaped { entries })
    }

    /// Start the reaper as a background task
    ///
    /// The first sweep runs immediately, then every `interval_seconds`.
    /// Returns `None` when the reaper is disabled.
    pub fn start_background_task(self: Arc<Self>) -> Option<ReaperHandle> {
        if !self.config.enabled {
            warn!("Expiry reaper is disabled");
            return None;
        }

        let interval = self.config.interval();
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);

        let join = tokio::spawn(async move {
            info!(
                "Expiry reaper started - will sweep every {} seconds, reaping tokens idle for {} seconds",
                self.config.interval_seconds, self.config.stale_after_seconds
            );

            let mut interval_timer = tokio::time::interval(interval);
            interval_timer.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = interval_timer.tick() => {}
                    changed = shutdown_rx.changed() => {
                        if changed.is_err() || *shutdown_rx.borrow() {
                            break;
                        }
                        continue;
                    }
                }

                match self.run_sweep().await {
                    Ok(result) => {
                        if !result.is_success() {
                            warn!("Sweep completed with errors: {:?}", result.errors);
                        }
                    }
                    Err(e) => {
                        error!("Expiry sweep failed: {}", e);
                    }
                }
            }

            info!("Expiry reaper stopped");
        });

        Some(ReaperHandle { shutdown_tx, join })
    }
}

/// Handle to a running reaper task
pub struct ReaperHandle {
    shutdown_tx: watch::Sender<bool>,
    join: JoinHandle<()>,
}

impl ReaperHandle {
    /// Signal the task to stop and wait for it; an in-flight sweep finishes first
    pub async fn shutdown(self) {
        // The receiver only disappears if the task already exited.
        let _ = self.shutdown_tx.send(true);
        if let Err(e) = self.join.await {
            error!("Expiry reaper task ended abnormally: {}", e);
        }
    }

    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }
}

/// Result of a sweep
#[derive(Debug, Default, Clone)]
pub struct SweepResult {
    /// Tokens examined
    pub scanned: usize,
    /// Tokens used within the threshold
    pub skipped_fresh: usize,
    /// Tokens refreshed between enumeration and deletion
    pub skipped_refreshed: usize,
    /// Tokens removed by someone else mid-sweep
    pub skipped_vanished: usize,
    /// Tokens fully removed
    pub reaped_tokens: usize,
    /// Namespaced entries removed across all reaped tokens
    pub deleted_entries: usize,
    /// Tokens left for the next sweep because of an error
    pub failed: usize,
    /// Any errors encountered during the sweep
    pub errors: Vec<String>,
}

impl SweepResult {
    /// Check if the sweep was successful (no errors)
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}
