//! Expiry reaper configuration module

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the stale token reaper
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReaperConfig {
    /// Whether to run the background sweep at all
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// How often to run a sweep (in seconds)
    #[serde(default = "default_interval_seconds")]
    pub interval_seconds: u64,

    /// A token untouched for at least this long is reaped (in seconds)
    #[serde(default = "default_stale_after_seconds")]
    pub stale_after_seconds: u64,

    /// Upper bound on tokens examined per sweep; the rest wait for the next one
    #[serde(default = "default_max_tokens_per_sweep")]
    pub max_tokens_per_sweep: usize,
}

impl Default for ReaperConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            interval_seconds: default_interval_seconds(),
            stale_after_seconds: default_stale_after_seconds(),
            max_tokens_per_sweep: default_max_tokens_per_sweep(),
        }
    }
}

impl ReaperConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            enabled: env_parse("REAPER_ENABLED").unwrap_or(defaults.enabled),
            interval_seconds: env_parse("REAPER_INTERVAL_SECONDS")
                .unwrap_or(defaults.interval_seconds),
            stale_after_seconds: env_parse("REAPER_STALE_AFTER_SECONDS")
                .unwrap_or(defaults.stale_after_seconds),
            max_tokens_per_sweep: env_parse("REAPER_MAX_TOKENS_PER_SWEEP")
                .unwrap_or(defaults.max_tokens_per_sweep),
        }
    }

    /// Sweep interval; never zero
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_seconds.max(1))
    }

    /// Staleness threshold
    pub fn stale_after(&self) -> Duration {
        Duration::from_secs(self.stale_after_seconds)
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

fn default_enabled() -> bool {
    true
}

fn default_interval_seconds() -> u64 {
    3600 // Run every hour
}

fn default_stale_after_seconds() -> u64 {
    30 * 24 * 3600 // 30 days
}

fn default_max_tokens_per_sweep() -> usize {
    10_000
}
